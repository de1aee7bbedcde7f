/// Orbit camera directions from an elevation/azimuth pair
use nalgebra::{Isometry3, Point3, Vector3};

use crate::render::CameraOrientation;

/// Transform helpers for an orbiting, Z-up camera
pub struct Transform;

impl Transform {
    /// Unit vector from the orbit target towards the eye.
    ///
    /// Azimuth 0 looks along -X from the +X side, elevation 90 looks straight down.
    pub fn orbit_direction(orientation: CameraOrientation) -> Vector3<f64> {
        let (el, az) = Self::radians(orientation);
        Vector3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
    }

    /// Screen-up vector for the orbit; perpendicular to [`Self::orbit_direction`] even at the poles.
    pub fn orbit_up(orientation: CameraOrientation) -> Vector3<f64> {
        let (el, az) = Self::radians(orientation);
        Vector3::new(-el.sin() * az.cos(), -el.sin() * az.sin(), el.cos())
    }

    /// World-to-view isometry for an eye at `distance` from `target`.
    pub fn orbit_view(
        orientation: CameraOrientation,
        target: &Point3<f64>,
        distance: f64,
    ) -> Isometry3<f64> {
        let eye = target + Self::orbit_direction(orientation) * distance;
        Isometry3::look_at_rh(&eye, target, &Self::orbit_up(orientation))
    }

    fn radians(orientation: CameraOrientation) -> (f64, f64) {
        (
            orientation.elevation.to_radians(),
            orientation.azimuth.to_radians(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ViewPreset;

    fn close(a: Vector3<f64>, b: Vector3<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn test_preset_directions() {
        let dir = |p: ViewPreset| Transform::orbit_direction(p.orientation());
        assert!(close(dir(ViewPreset::Front), Vector3::x()));
        assert!(close(dir(ViewPreset::Back), -Vector3::x()));
        assert!(close(dir(ViewPreset::Left), Vector3::y()));
        assert!(close(dir(ViewPreset::Right), -Vector3::y()));
        assert!(close(dir(ViewPreset::Top), Vector3::z()));
        assert!(close(dir(ViewPreset::Bottom), -Vector3::z()));
    }

    #[test]
    fn test_up_is_perpendicular_and_unit() {
        for preset in ViewPreset::ALL {
            let o = preset.orientation();
            let dir = Transform::orbit_direction(o);
            let up = Transform::orbit_up(o);
            assert!(dir.dot(&up).abs() < 1e-9, "{preset}");
            assert!((up.norm() - 1.0).abs() < 1e-9, "{preset}");
        }
    }

    #[test]
    fn test_view_puts_target_in_front() {
        let target = Point3::new(1.0, 2.0, 3.0);
        for preset in ViewPreset::ALL {
            let view = Transform::orbit_view(preset.orientation(), &target, 5.0);
            let t = view * target;
            // right-handed view space looks down -Z
            assert!((t - Point3::new(0.0, 0.0, -5.0)).norm() < 1e-9, "{preset}");
        }
    }
}
