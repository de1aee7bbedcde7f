/// meshview - terminal mesh viewer
///
/// Loads an OBJ, ASCII PLY or ASCII STL mesh and shows it as a wireframe
/// and/or shaded solid. Without a file a demo cube is shown.
/// Controls:
///   - W / F: Toggle wireframe / faces
///   - 1-6: Front, back, left, right, top, bottom views
///   - Arrow Keys: Orbit the camera
///   - C: Reset colours
///   - R: Reload the file from disk
///   - P: Save the current frame as text
///   - Q/ESC: Quit
use clap::Parser;
use meshview_core::{load_mesh, Mesh, RenderSettings};
use meshview_terminal::cli::{initialize_tracing, Cli};
use meshview_terminal::{write_snapshot, AppError, TerminalApp};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = initialize_tracing(&cli.log_filter, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("meshview: could not open log file: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "meshview failed");
            eprintln!("meshview: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = RenderSettings::new(cli.render_parameters());
    let mode = cli.projection_mode();

    let mesh = match &cli.file {
        Some(path) => load_mesh(path)?,
        None => Mesh::cube(2.0),
    };

    if let Some(out) = &cli.snapshot {
        let size = (cli.width as usize, cli.height as usize);
        write_snapshot(&mesh, &settings, mode, size, out)?;
        return Ok(());
    }

    let mut app = TerminalApp::new(mesh, cli.file, settings, mode, cli.snapshot_dir)?;
    app.run()?;
    Ok(())
}
