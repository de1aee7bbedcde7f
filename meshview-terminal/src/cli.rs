/// Command line arguments and log setup
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::ValueHint;
use meshview_core::render::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_FACE_COLOR, DEFAULT_VERTEX_COLOR, DEFAULT_WIREFRAME_COLOR,
};
use meshview_core::{ProjectionMode, RenderParameters, Rgb, ViewPreset};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about = "View OBJ, PLY and STL meshes in the terminal")]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,meshview_core=info,meshview_terminal=info",
        env = "MESHVIEW_LOG"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Write logs to this file instead of stderr
    #[arg(long, value_hint = ValueHint::FilePath, env = "MESHVIEW_LOG_FILE")]
    pub log_file: Option<PathBuf>,
    /// Wireframe edge colour
    #[arg(long, default_value_t = DEFAULT_WIREFRAME_COLOR, value_name = "#RRGGBB")]
    pub wireframe_color: Rgb,
    /// Vertex marker colour
    #[arg(long, default_value_t = DEFAULT_VERTEX_COLOR, value_name = "#RRGGBB")]
    pub vertex_color: Rgb,
    /// Filled face colour
    #[arg(long, default_value_t = DEFAULT_FACE_COLOR, value_name = "#RRGGBB")]
    pub face_color: Rgb,
    /// Viewport background colour
    #[arg(long, default_value_t = DEFAULT_BACKGROUND_COLOR, value_name = "#RRGGBB")]
    pub background_color: Rgb,
    /// Initial camera view: front, back, left, right, top or bottom
    #[arg(long, default_value_t = ViewPreset::Front)]
    pub view: ViewPreset,
    /// Start with the wireframe hidden
    #[arg(long)]
    pub hide_wireframe: bool,
    /// Start with filled faces shown
    #[arg(long)]
    pub show_faces: bool,
    /// Use a perspective projection instead of orthographic
    #[arg(long)]
    pub perspective: bool,
    /// Render a single frame to this text file and exit
    #[arg(long, value_hint = ValueHint::FilePath, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,
    /// Snapshot width in columns
    #[arg(long, default_value_t = 120)]
    pub width: u16,
    /// Snapshot height in rows
    #[arg(long, default_value_t = 48)]
    pub height: u16,
    /// Directory interactive snapshots are saved to
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath, env = "MESHVIEW_SNAPSHOT_DIR")]
    pub snapshot_dir: PathBuf,
    /// Mesh file to view (.obj, .ply or .stl); a demo cube when omitted
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

impl Cli {
    pub fn render_parameters(&self) -> RenderParameters {
        RenderParameters {
            wireframe_color: self.wireframe_color,
            vertex_color: self.vertex_color,
            face_color: self.face_color,
            background_color: self.background_color,
            wireframe_visible: !self.hide_wireframe,
            faces_visible: self.show_faces,
            camera: self.view.orientation(),
        }
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        if self.perspective {
            ProjectionMode::Perspective
        } else {
            ProjectionMode::Orthographic
        }
    }
}

/// Set up log output, to `log_file` when given and stderr otherwise
pub fn initialize_tracing(
    log_filter: &str,
    log_format: LogFormat,
    log_file: Option<&Path>,
) -> std::io::Result<()> {
    match log_file {
        Some(path) => init_with_writer(log_filter, log_format, Mutex::new(File::create(path)?)),
        None => init_with_writer(log_filter, log_format, std::io::stderr),
    }
    Ok(())
}

fn init_with_writer<W>(log_filter: &str, log_format: LogFormat, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let tsub = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["meshview"]).unwrap();
        assert!(cli.file.is_none());
        assert_eq!(cli.render_parameters(), RenderParameters::default());
        assert_eq!(cli.projection_mode(), ProjectionMode::Orthographic);
    }

    #[test]
    fn test_colours_and_view() {
        let cli = Cli::try_parse_from([
            "meshview",
            "--face-color",
            "#112233",
            "--view",
            "top",
            "--show-faces",
            "--hide-wireframe",
            "model.ply",
        ])
        .unwrap();
        let params = cli.render_parameters();
        assert_eq!(params.face_color, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(params.camera, ViewPreset::Top.orientation());
        assert!(params.faces_visible);
        assert!(!params.wireframe_visible);
        assert_eq!(cli.file.as_deref(), Some(Path::new("model.ply")));
    }

    #[test]
    fn test_bad_colour_rejected() {
        assert!(Cli::try_parse_from(["meshview", "--wireframe-color", "cyan"]).is_err());
    }

    #[test]
    fn test_snapshot_size() {
        let cli =
            Cli::try_parse_from(["meshview", "--snapshot", "out.txt", "--width", "80"]).unwrap();
        assert_eq!(cli.snapshot.as_deref(), Some(Path::new("out.txt")));
        assert_eq!(cli.width, 80);
        assert_eq!(cli.height, 48);
    }
}
