/// Terminal-based mesh viewer built on meshview-core
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use meshview_core::{
    load_mesh, LoadError, Mesh, ProjectionMode, RenderSettings, ViewBounds, ViewPreset,
};
use std::fs;
use std::io::{self, stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub mod cli;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Degrees the camera orbits per arrow key press
const ORBIT_STEP: f64 = 15.0;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Render one frame of `mesh` and write it as plain text to `path`.
pub fn write_snapshot(
    mesh: &Mesh,
    settings: &RenderSettings,
    mode: ProjectionMode,
    (width, height): (usize, usize),
    path: &Path,
) -> io::Result<()> {
    let mut renderer = AsciiRenderer::new(width, height).with_mode(mode);
    renderer.render_mesh(mesh, &mesh.bounds(), settings.params());
    fs::write(path, renderer.to_text())?;
    info!(?path, width, height, "saved snapshot");
    Ok(())
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    bounds: ViewBounds,
    source: Option<PathBuf>,
    settings: RenderSettings,
    renderer: AsciiRenderer,
    snapshot_dir: PathBuf,
    snapshot_count: u32,
    status: String,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(
        mesh: Mesh,
        source: Option<PathBuf>,
        settings: RenderSettings,
        mode: ProjectionMode,
        snapshot_dir: PathBuf,
    ) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let status = match &source {
            Some(path) => format!("Loaded: {}", display_name(path)),
            None => "Demo cube".to_string(),
        };

        Ok(Self {
            bounds: mesh.bounds(),
            mesh,
            source,
            settings,
            // top row is the status line
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize)
                .with_mode(mode),
            snapshot_dir,
            snapshot_count: 0,
            status,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.renderer
                    .resize(width as usize, height.saturating_sub(1) as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') => {
                let on = self.settings.toggle_wireframe();
                self.status = format!("Wireframe {}", on_off(on));
            }
            KeyCode::Char('f') => {
                let on = self.settings.toggle_faces();
                self.status = format!("Faces {}", on_off(on));
            }
            KeyCode::Char(c @ '1'..='6') => {
                let preset = ViewPreset::ALL[c as usize - '1' as usize];
                self.settings.set_view(preset);
                self.status = format!("View: {preset}");
            }
            KeyCode::Up => self.settings.orbit(ORBIT_STEP, 0.0),
            KeyCode::Down => self.settings.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Left => self.settings.orbit(0.0, -ORBIT_STEP),
            KeyCode::Right => self.settings.orbit(0.0, ORBIT_STEP),
            KeyCode::Char('c') => {
                self.settings.reset_colors();
                self.status = "Colours reset".to_string();
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('p') => self.save_snapshot(),
            _ => {}
        }
    }

    /// Re-read the source file; on failure the current mesh stays on screen.
    fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            self.status = "Nothing to reload".to_string();
            return;
        };
        match load_mesh(&path) {
            Ok(mesh) => {
                self.set_mesh(mesh);
                self.status = format!("Reloaded: {}", display_name(&path));
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    /// Replace the displayed mesh; the previous one is dropped.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.bounds = mesh.bounds();
        self.mesh = mesh;
    }

    fn save_snapshot(&mut self) {
        self.snapshot_count += 1;
        let stem = self
            .source
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("meshview");
        let path = self
            .snapshot_dir
            .join(format!("{stem}-render-{}.txt", self.snapshot_count));

        match fs::write(&path, self.renderer.to_text()) {
            Ok(()) => {
                info!(?path, "saved snapshot");
                self.status = format!("Render saved to {}", path.display());
            }
            Err(err) => {
                warn!(?path, error = %err, "could not save snapshot");
                self.status = format!("Could not save render: {err}");
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer
            .render_mesh(&self.mesh, &self.bounds, self.settings.params());

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let camera = self.settings.params().camera;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "meshview | {} | {} verts {} faces | el {:.0} az {:.0} | FPS: {:.1} | W/F=Toggle 1-6=View Arrows=Orbit C=Colours R=Reload P=Save Q=Quit",
                self.status,
                self.mesh.vertex_count(),
                self.mesh.face_count(),
                camera.elevation,
                camera.azimuth,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
