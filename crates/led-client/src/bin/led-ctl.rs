//! led-ctl — command-line producer for the LED display coordinator.
//!
//! Handy for poking the panel from a shell:
//!
//! ```sh
//! led-ctl symbol wifi
//! led-ctl animation idle
//! led-ctl progress 75 --priority low
//! led-ctl layout payload.json
//! led-ctl test
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use led_client::LedClient;
use led_protocol::{Animation, LayoutPayload, Priority, Response, Symbol};

#[derive(Parser)]
#[command(name = "led-ctl")]
#[command(about = "Send commands to the LED display coordinator", long_about = None)]
#[command(version)]
struct Cli {
    /// Socket path (defaults to LED_SOCKET_PATH or /tmp/led-manager.sock)
    #[arg(long, global = true)]
    socket_path: Option<PathBuf>,

    /// Command priority
    #[arg(long, global = true, value_enum, default_value_t = PriorityArg::Medium)]
    priority: PriorityArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SymbolArg {
    Wifi,
    WifiError,
    Tunnel,
    Discord,
    Check,
    Error,
    Hourglass,
    Dot,
    AllOn,
    Connected,
}

impl From<SymbolArg> for Symbol {
    fn from(value: SymbolArg) -> Self {
        match value {
            SymbolArg::Wifi => Symbol::Wifi,
            SymbolArg::WifiError => Symbol::WifiError,
            SymbolArg::Tunnel => Symbol::Tunnel,
            SymbolArg::Discord => Symbol::Discord,
            SymbolArg::Check => Symbol::Check,
            SymbolArg::Error => Symbol::Error,
            SymbolArg::Hourglass => Symbol::Hourglass,
            SymbolArg::Dot => Symbol::Dot,
            SymbolArg::AllOn => Symbol::AllOn,
            SymbolArg::Connected => Symbol::Connected,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AnimationArg {
    Boot,
    WifiSearching,
    Activity,
    Idle,
}

impl From<AnimationArg> for Animation {
    fn from(value: AnimationArg) -> Self {
        match value {
            AnimationArg::Boot => Animation::Boot,
            AnimationArg::WifiSearching => Animation::WifiSearching,
            AnimationArg::Activity => Animation::Activity,
            AnimationArg::Idle => Animation::Idle,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show a static symbol
    Symbol {
        #[arg(value_enum)]
        symbol: SymbolArg,
        /// Display duration in seconds
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Start an animation
    Animation {
        #[arg(value_enum)]
        animation: AnimationArg,
        /// Cap in seconds for looping animations
        #[arg(long)]
        duration: Option<f64>,
        /// Seconds between frames
        #[arg(long)]
        frame_delay: Option<f64>,
    },
    /// Show the legacy full-panel progress bar
    Progress {
        /// Percentage 0..=100
        percentage: f32,
    },
    /// Render a layout payload from a JSON file (or `-` for stdin)
    Layout { path: PathBuf },
    /// Stop the running animation
    Stop,
    /// Blank the panel
    Clear,
    /// Run the daemon's self-test sequence
    Test,
    /// Shut the daemon down
    Shutdown,
}

fn read_payload(path: &PathBuf) -> Result<LayoutPayload> {
    let text = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read payload from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).context("invalid layout payload")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut client = match cli.socket_path {
        Some(path) => LedClient::new(path),
        None => LedClient::from_env(),
    };
    let priority: Priority = cli.priority.into();

    let response: Response = match cli.command {
        Commands::Symbol { symbol, duration } => {
            client.show_symbol_with(symbol.into(), duration, None, priority)?
        }
        Commands::Animation {
            animation,
            duration,
            frame_delay,
        } => client.show_animation(animation.into(), duration, frame_delay, priority)?,
        Commands::Progress { percentage } => client.show_progress(percentage, priority)?,
        Commands::Layout { path } => client.show_layout(read_payload(&path)?, priority)?,
        Commands::Stop => client.stop_animation()?,
        Commands::Clear => client.clear(priority)?,
        Commands::Test => client.test()?,
        Commands::Shutdown => client.shutdown()?,
    };

    if let Some(code) = response.error {
        println!(
            "{} {} ({code:?})",
            "ok:".green().bold(),
            response.message,
        );
    } else {
        println!("{} {}", "ok:".green().bold(), response.message);
    }
    Ok(())
}
