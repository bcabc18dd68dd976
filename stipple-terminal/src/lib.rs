//! Terminal point-cloud viewer for stipple
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use stipple_core::{PointCloud, SamplingStats};

pub mod projection;
pub mod renderer;
pub mod scene;
pub mod transform;

pub use projection::Camera;
pub use renderer::PointRenderer;
pub use scene::SceneContext;
pub use transform::{RotationState, Transform};

/// Interactive terminal loop around a [`SceneContext`]
pub struct TerminalApp {
    scene: Option<SceneContext>,
    status: String,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(cloud: &PointCloud, stats: &SamplingStats) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene: Some(scene::setup(cloud, width, height)),
            status: format!("{} points", stats.accepted),
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
        if let Some(scene) = self.scene.take() {
            scene::teardown(scene);
        }
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

            let Some(scene) = self.scene.as_mut() else {
                break;
            };
            scene::update(scene);
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
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        match event {
            Event::Resize(width, height) => scene::resize(scene, width, height),
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('w') | KeyCode::Up => {
                    scene.rotation.rotate(0.1, 0.0, 0.0);
                }
                KeyCode::Char('s') | KeyCode::Down => {
                    scene.rotation.rotate(-0.1, 0.0, 0.0);
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    scene.rotation.rotate(0.0, -0.1, 0.0);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    scene.rotation.rotate(0.0, 0.1, 0.0);
                }
                KeyCode::Char('e') => {
                    scene.rotation.rotate(0.0, 0.0, 0.1);
                }
                KeyCode::Char('r') => {
                    scene.rotation.rotate(0.0, 0.0, -0.1);
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };

        let mut stdout = stdout();
        scene::render(scene, &mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Stipple | {} | FPS: {:.1} | Controls: WASD/Arrows=Rotate E/R=Roll Q=Quit",
                self.status, self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
