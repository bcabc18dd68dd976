//! Stipple terminal viewer
//!
//! Samples an STL file into a hollow point cloud and spins it in the
//! terminal. Without a file, a cube is used.
//! Controls:
//!   - WASD / Arrow Keys: Rotate the cloud
//!   - E/R: Roll rotation
//!   - Q/ESC: Quit

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use stipple_core::boundary::DEFAULT_HOLLOW_FRACTION;
use stipple_core::stl::write_binary_stl;
use stipple_core::{run_with_stats, CandidateLayout, Mesh, SamplerParams};
use stipple_terminal::TerminalApp;
use tracing::info;

/// Stipple - STL to hollow point cloud viewer
#[derive(Parser, Debug)]
#[command(name = "stipple-terminal", version, about)]
struct Cli {
    /// STL file (ASCII or binary). Defaults to a cube.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Target number of points
    #[arg(short = 'n', long, default_value_t = 2000)]
    points: usize,

    /// Random seed for a reproducible cloud
    #[arg(long)]
    seed: Option<u64>,

    /// Plain uniform sampling: no hollow, no spacing, no colors
    #[arg(long)]
    uniform: bool,

    /// Use random candidate placement instead of the barycentric grid
    #[arg(long)]
    random_layout: bool,

    /// Hollow radius as a fraction of the largest extent
    #[arg(long, default_value_t = DEFAULT_HOLLOW_FRACTION)]
    hollow: f64,

    /// Print sampling statistics and exit
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn params(&self) -> SamplerParams {
        let mut params = if self.uniform {
            SamplerParams::uniform()
        } else {
            SamplerParams::default()
        }
        .with_hollow_fraction(self.hollow);

        if self.random_layout {
            params = params.with_layout(CandidateLayout::Random);
        }
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        params
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data = match &cli.file {
        Some(path) => {
            info!(path = %path.display(), "Loading STL file");
            fs::read(path).map_err(|e| {
                io::Error::new(e.kind(), format!("Failed to read STL file: {}", e))
            })?
        }
        None => write_binary_stl(&Mesh::cube(2.0)),
    };

    let (cloud, stats) = run_with_stats(&data, cli.points, &cli.params()).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse STL: {}", e))
    })?;

    println!("{}", stats);
    if cli.headless {
        return Ok(());
    }

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(&cloud, &stats)?;
    app.run()?;

    Ok(())
}
