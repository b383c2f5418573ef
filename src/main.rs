// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};

use phantom_control::constants::{DEFAULT_LOG_FILE, DEFAULT_LOG_FILTER, DEFAULT_PROFILE};
use phantom_control::pipelines::preview::WatchSink;
use phantom_control::{
    CameraSession, PreviewController, ProfileController, ProfileStore, SyntheticCamera,
};

#[derive(Parser)]
#[command(name = "phantom-control")]
#[command(about = "Profile-based control and live terminal preview for high-speed cameras")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Camera index to connect to
    #[arg(short, long, default_value = "0")]
    camera: usize,

    /// Log file path
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;

    // Connection failure is fatal: logged, then propagated
    let camera = match SyntheticCamera::connect(cli.camera) {
        Ok(camera) => {
            info!(index = cli.camera, "Camera successfully connected");
            camera
        }
        Err(e) => {
            error!(index = cli.camera, error = %e, "Failed to connect to camera");
            return Err(e.into());
        }
    };

    let session = CameraSession::new(Box::new(camera));
    let store = ProfileStore::with_defaults();
    let mut controller = ProfileController::new(store, session.clone());

    // Push the default profile before the first frame is pulled
    match controller.apply(DEFAULT_PROFILE) {
        Ok(status) if !status.is_clean() => {
            error!(status = %status.message(), "Initial profile apply was incomplete");
        }
        Ok(_) => {}
        Err(e) => error!(error = %e, "Initial profile apply failed"),
    }

    let (sink, frames) = WatchSink::channel();
    let mut preview = PreviewController::start(session.clone(), Box::new(sink));

    let result = phantom_control::terminal::run(&mut controller, &preview, frames);

    // Join the capture thread before releasing the camera
    preview.stop();
    session.close();
    info!("Shutdown complete");

    result
}

fn init_logging(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // Set RUST_LOG to control log level, e.g. RUST_LOG=phantom_control=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .init();

    Ok(())
}
