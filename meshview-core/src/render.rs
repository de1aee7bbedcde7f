/// Display parameters shared between the UI and the rendering backend
use std::fmt;
use std::str::FromStr;

/// An opaque 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale each channel by `factor` (clamped to `0..=1`).
    pub fn scaled(self, factor: f64) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let s = |c: u8| (c as f64 * f).round() as u8;
        Self::new(s(self.r), s(self.g), s(self.b))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour {0:?}, expected #rrggbb")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRgbError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const DEFAULT_WIREFRAME_COLOR: Rgb = Rgb::new(0x00, 0xff, 0xff);
pub const DEFAULT_VERTEX_COLOR: Rgb = Rgb::new(0x00, 0xff, 0xff);
pub const DEFAULT_FACE_COLOR: Rgb = Rgb::new(0x00, 0x7a, 0xcc);
pub const DEFAULT_BACKGROUND_COLOR: Rgb = Rgb::new(0x00, 0x00, 0x00);

/// Camera direction around the model, in degrees. Z is up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraOrientation {
    pub elevation: f64,
    pub azimuth: f64,
}

impl CameraOrientation {
    pub const fn new(elevation: f64, azimuth: f64) -> Self {
        Self {
            elevation,
            azimuth,
        }
    }

    /// Orbit by the given deltas. Elevation is clamped to the poles and azimuth wraps to `(-180, 180]`.
    pub fn orbit(self, d_elevation: f64, d_azimuth: f64) -> Self {
        let elevation = (self.elevation + d_elevation).clamp(-90.0, 90.0);
        let mut azimuth = (self.azimuth + d_azimuth) % 360.0;
        if azimuth > 180.0 {
            azimuth -= 360.0;
        } else if azimuth <= -180.0 {
            azimuth += 360.0;
        }
        Self::new(elevation, azimuth)
    }
}

/// Fixed camera presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPreset {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 6] = [
        ViewPreset::Front,
        ViewPreset::Back,
        ViewPreset::Left,
        ViewPreset::Right,
        ViewPreset::Top,
        ViewPreset::Bottom,
    ];

    pub fn orientation(self) -> CameraOrientation {
        match self {
            ViewPreset::Front => CameraOrientation::new(0.0, 0.0),
            ViewPreset::Back => CameraOrientation::new(0.0, 180.0),
            ViewPreset::Left => CameraOrientation::new(0.0, 90.0),
            ViewPreset::Right => CameraOrientation::new(0.0, -90.0),
            ViewPreset::Top => CameraOrientation::new(90.0, 0.0),
            ViewPreset::Bottom => CameraOrientation::new(-90.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewPreset::Front => "front",
            ViewPreset::Back => "back",
            ViewPreset::Left => "left",
            ViewPreset::Right => "right",
            ViewPreset::Top => "top",
            ViewPreset::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view {0:?}, expected one of front, back, left, right, top, bottom")]
pub struct ParseViewError(String);

impl FromStr for ViewPreset {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseViewError(s.to_string()))
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the rendering backend needs besides geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    pub wireframe_color: Rgb,
    pub vertex_color: Rgb,
    pub face_color: Rgb,
    pub background_color: Rgb,
    pub wireframe_visible: bool,
    pub faces_visible: bool,
    pub camera: CameraOrientation,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            wireframe_color: DEFAULT_WIREFRAME_COLOR,
            vertex_color: DEFAULT_VERTEX_COLOR,
            face_color: DEFAULT_FACE_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
            wireframe_visible: true,
            faces_visible: false,
            camera: ViewPreset::Front.orientation(),
        }
    }
}

/// Session-long holder of [`RenderParameters`], mutated only by UI actions.
#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    params: RenderParameters,
}

impl RenderSettings {
    pub fn new(params: RenderParameters) -> Self {
        Self { params }
    }

    /// Read-only view for the rendering backend.
    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    pub fn set_wireframe_color(&mut self, color: Rgb) {
        self.params.wireframe_color = color;
    }

    pub fn set_vertex_color(&mut self, color: Rgb) {
        self.params.vertex_color = color;
    }

    pub fn set_face_color(&mut self, color: Rgb) {
        self.params.face_color = color;
    }

    pub fn set_background_color(&mut self, color: Rgb) {
        self.params.background_color = color;
    }

    pub fn set_wireframe_visible(&mut self, visible: bool) {
        self.params.wireframe_visible = visible;
    }

    pub fn set_faces_visible(&mut self, visible: bool) {
        self.params.faces_visible = visible;
    }

    pub fn toggle_wireframe(&mut self) -> bool {
        self.params.wireframe_visible = !self.params.wireframe_visible;
        self.params.wireframe_visible
    }

    pub fn toggle_faces(&mut self) -> bool {
        self.params.faces_visible = !self.params.faces_visible;
        self.params.faces_visible
    }

    pub fn set_view(&mut self, preset: ViewPreset) {
        self.params.camera = preset.orientation();
    }

    pub fn set_camera(&mut self, camera: CameraOrientation) {
        self.params.camera = camera;
    }

    pub fn orbit(&mut self, d_elevation: f64, d_azimuth: f64) {
        self.params.camera = self.params.camera.orbit(d_elevation, d_azimuth);
    }

    /// Restore the four default colours; visibility and camera are kept.
    pub fn reset_colors(&mut self) {
        let defaults = RenderParameters::default();
        self.params.wireframe_color = defaults.wireframe_color;
        self.params.vertex_color = defaults.vertex_color;
        self.params.face_color = defaults.face_color;
        self.params.background_color = defaults.background_color;
    }
}
