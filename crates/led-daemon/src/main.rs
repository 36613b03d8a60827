//! led-daemon — the LED display coordinator.
//!
//! Exit codes: 0 after a clean shutdown (`shutdown` command, SIGTERM or
//! SIGINT), 1 on unrecoverable startup failure (socket bind, hardware
//! init outside mock mode).

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use led_protocol::{Command, Priority, Request};
use tracing::{info, warn};

use led_daemon::{
    AnimationEngine, CommandQueue, CoordinatorHandle, DaemonConfig, IpcServer, MockPanel,
    SharedPanel, Worker,
};

#[derive(Parser)]
#[command(name = "led-daemon")]
#[command(about = "Coordinates exclusive access to the 64x64 LED matrix", long_about = None)]
#[command(version)]
struct Cli {
    /// Unix socket to listen on (env: LED_SOCKET_PATH)
    #[arg(long)]
    socket_path: Option<PathBuf>,

    /// Hardware config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without hardware (env: LED_MOCK_MODE)
    #[arg(long)]
    mock: bool,
}

fn build_panel(config: &DaemonConfig) -> Result<SharedPanel> {
    if config.mock_mode {
        info!("running in mock mode, no hardware access");
        return Ok(Arc::new(Mutex::new(MockPanel::new())));
    }

    #[cfg(feature = "hardware")]
    {
        let panel = led_daemon::hub75::Hub75Panel::open(&config.hardware)?;
        Ok(Arc::new(Mutex::new(panel)))
    }

    #[cfg(not(feature = "hardware"))]
    {
        let _ = &config.hardware;
        Err(led_daemon::DaemonError::HardwareInit(
            "built without the `hardware` feature; run with --mock or LED_MOCK_MODE=1".to_owned(),
        )
        .into())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .init();

    let cli = Cli::parse();
    let config = DaemonConfig::resolve(cli.socket_path, cli.config, cli.mock)?;
    info!(socket = %config.socket_path.display(), mock = config.mock_mode, "starting LED coordinator");

    let panel = build_panel(&config)?;
    let queue = Arc::new(CommandQueue::new());
    let engine = Arc::new(AnimationEngine::new(Arc::clone(&panel)));
    let handle = CoordinatorHandle::new(Arc::clone(&queue), Arc::clone(&engine));
    let shutdown = Arc::new(AtomicBool::new(false));

    // SIGTERM/SIGINT submit a regular shutdown command so the worker
    // drains exactly like a producer-initiated shutdown.
    let signal_handle = handle.clone();
    let mut signals =
        signal_hook::iterator::Signals::new([signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM])?;
    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!(signal, "signal received, shutting down");
            signal_handle.submit(Request::new(Command::Shutdown, Priority::High));
        }
    });

    let server = IpcServer::bind(&config.socket_path, handle, Arc::clone(&shutdown))?;

    let worker = Worker::new(queue, engine, panel, shutdown);
    let worker_thread = std::thread::spawn(move || worker.run());

    // The accept loop runs on the main thread until the worker raises the
    // shutdown flag.
    server.run();

    if worker_thread.join().is_err() {
        warn!("worker thread panicked during shutdown");
    }
    info!("shutdown complete");
    Ok(())
}
