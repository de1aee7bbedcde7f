/// Fan triangulation of polygonal faces
///
/// Every N-gon `[v0, v1, ..., vn]` becomes the triangles `(v0, vi, vi+1)`.
/// This is only correct for convex, planar polygons; anything else renders
/// with overlapping or missing fill, which the viewer accepts.
use std::iter::FusedIterator;

/// Three vertex indices of one render triangle.
pub type Triangle = [usize; 3];

/// Lazy fan triangulation of `face`.
///
/// Yields `face.len() - 2` triangles for faces of three or more indices and
/// nothing otherwise. Call again (or clone the iterator) to restart.
pub fn triangulate(face: &[usize]) -> Triangles<'_> {
    Triangles { face, next: 1 }
}

/// Iterator returned by [`triangulate`].
#[derive(Debug, Clone)]
pub struct Triangles<'a> {
    face: &'a [usize],
    next: usize,
}

impl Iterator for Triangles<'_> {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        if self.next + 1 >= self.face.len() {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some([self.face[0], self.face[i], self.face[i + 1]])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.face.len().saturating_sub(self.next + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Triangles<'_> {}

impl FusedIterator for Triangles<'_> {}
