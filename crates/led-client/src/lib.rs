//! Client library for the LED display coordinator.
//!
//! A thin, strictly typed facade over the newline-delimited JSON
//! protocol. The connection opens lazily, reconnects on a broken pipe for
//! up to three attempts, and every command carries a 2-second
//! acknowledgment timeout. In mock mode every method is a logged no-op.
//!
//! ```no_run
//! use led_client::LedClient;
//! use led_protocol::Priority;
//!
//! let mut client = LedClient::from_env();
//! client.show_wifi_connected()?;
//! client.show_progress(42.0, Priority::Low)?;
//! # Ok::<(), led_client::ClientError>(())
//! ```

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use led_protocol::{
    Animation, Command, ErrorCode, LayoutPayload, Priority, Request, Response,
    ShowAnimationParams, ShowLayoutParams, ShowProgressParams, ShowSymbolParams, Symbol,
};
use thiserror::Error;
use tracing::{debug, info};

/// Default socket location, shared with the daemon.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/led-manager.sock";

/// Per-command acknowledgment timeout.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection attempts before giving up.
pub const MAX_RETRIES: u32 = 3;

/// Client-side failures.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {path} after {attempts} attempts: {source}")]
    Connect {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
    /// The acknowledgment did not arrive in time; the command may still
    /// execute server-side.
    #[error("timed out waiting for acknowledgment")]
    Timeout,
    #[error("i/o error talking to the daemon: {0}")]
    Io(#[from] std::io::Error),
    #[error("unparseable response from the daemon: {0}")]
    Malformed(String),
    #[error("daemon rejected the command ({code:?}): {message}")]
    Rejected {
        code: Option<ErrorCode>,
        message: String,
    },
}

/// Handle to the coordinator. Cheap to construct; the socket opens on
/// first use.
pub struct LedClient {
    socket_path: PathBuf,
    timeout: Duration,
    max_retries: u32,
    mock: bool,
    connection: Option<BufReader<UnixStream>>,
}

impl LedClient {
    /// Client for the given socket path.
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_owned(),
            timeout: COMMAND_TIMEOUT,
            max_retries: MAX_RETRIES,
            mock: false,
            connection: None,
        }
    }

    /// Client configured from `LED_SOCKET_PATH` and `LED_MOCK_MODE`.
    pub fn from_env() -> Self {
        let path = std::env::var("LED_SOCKET_PATH")
            .unwrap_or_else(|_| DEFAULT_SOCKET_PATH.to_owned());
        let mock = std::env::var("LED_MOCK_MODE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        let mut client = Self::new(path);
        client.mock = mock;
        client
    }

    /// Override the acknowledgment timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the connection retry budget.
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Every method becomes a logged no-op.
    pub fn mock() -> Self {
        let mut client = Self::new(DEFAULT_SOCKET_PATH);
        client.mock = true;
        client
    }

    /// Whether this client is a mock.
    pub fn is_mock(&self) -> bool {
        self.mock
    }

    // -- transport ----------------------------------------------------------

    fn connect(&self) -> Result<BufReader<UnixStream>, ClientError> {
        let mut last_error: Option<std::io::Error> = None;
        for attempt in 0..self.max_retries {
            if attempt > 0 {
                std::thread::sleep(Duration::from_millis(100));
            }
            match UnixStream::connect(&self.socket_path) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    return Ok(BufReader::new(stream));
                }
                Err(e) => last_error = Some(e),
            }
        }
        Err(ClientError::Connect {
            path: self.socket_path.clone(),
            attempts: self.max_retries,
            source: last_error
                .unwrap_or_else(|| std::io::Error::new(ErrorKind::Other, "no attempts made")),
        })
    }

    fn exchange(
        connection: &mut BufReader<UnixStream>,
        line: &str,
    ) -> Result<Response, ClientError> {
        connection.get_mut().write_all(line.as_bytes())?;
        connection.get_mut().flush()?;

        let mut reply = String::new();
        let read = connection.read_line(&mut reply).map_err(|e| {
            if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) {
                ClientError::Timeout
            } else {
                ClientError::Io(e)
            }
        })?;
        if read == 0 {
            // Server closed the connection mid-exchange.
            return Err(ClientError::Io(std::io::Error::new(
                ErrorKind::BrokenPipe,
                "connection closed by daemon",
            )));
        }
        serde_json::from_str(reply.trim()).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    /// Submit a request and surface its acknowledgment.
    ///
    /// Transport errors drop the cached connection and retry on a fresh
    /// one (up to the retry budget); a timeout is surfaced immediately
    /// because the command may still run server-side.
    pub fn send(&mut self, request: Request) -> Result<Response, ClientError> {
        if self.mock {
            info!(command = request.command.name(), priority = ?request.priority, "mock client no-op");
            return Ok(Response::ok("mock"));
        }

        let line = request.to_line();
        let mut last_error = None;
        for attempt in 0..self.max_retries {
            if self.connection.is_none() {
                self.connection = Some(self.connect()?);
            }
            // Checked just above.
            let Some(connection) = self.connection.as_mut() else {
                break;
            };
            match Self::exchange(connection, &line) {
                Ok(response) => {
                    debug!(command = request.command.name(), success = response.success, "ack");
                    if response.success {
                        return Ok(response);
                    }
                    return Err(ClientError::Rejected {
                        code: response.error,
                        message: response.message,
                    });
                }
                Err(ClientError::Io(e)) => {
                    debug!(error = %e, attempt, "transport error, reconnecting");
                    self.connection = None;
                    last_error = Some(ClientError::Io(e));
                }
                Err(other) => {
                    if matches!(other, ClientError::Timeout | ClientError::Malformed(_)) {
                        self.connection = None;
                    }
                    return Err(other);
                }
            }
        }
        Err(last_error.unwrap_or(ClientError::Timeout))
    }

    // -- commands -----------------------------------------------------------

    /// Display a symbol with optional duration/color overrides.
    pub fn show_symbol_with(
        &mut self,
        symbol: Symbol,
        duration: Option<f64>,
        color: Option<[u8; 3]>,
        priority: Priority,
    ) -> Result<Response, ClientError> {
        self.send(Request::new(
            Command::ShowSymbol(ShowSymbolParams {
                symbol,
                duration: duration.filter(|d| d.is_finite() && *d >= 0.0),
                color,
            }),
            priority,
        ))
    }

    /// Display a symbol with its default duration and color.
    pub fn show_symbol(
        &mut self,
        symbol: Symbol,
        priority: Priority,
    ) -> Result<Response, ClientError> {
        self.show_symbol_with(symbol, None, None, priority)
    }

    /// Start an animation.
    pub fn show_animation(
        &mut self,
        animation: Animation,
        duration: Option<f64>,
        frame_delay: Option<f64>,
        priority: Priority,
    ) -> Result<Response, ClientError> {
        self.send(Request::new(
            Command::ShowAnimation(ShowAnimationParams {
                animation,
                duration: duration.filter(|d| d.is_finite() && *d > 0.0),
                frame_delay: frame_delay.filter(|d| d.is_finite() && *d > 0.0),
            }),
            priority,
        ))
    }

    /// Display the legacy full-panel progress bar. The percentage is
    /// clamped to `0..=100` before it leaves the process.
    pub fn show_progress(
        &mut self,
        percentage: f32,
        priority: Priority,
    ) -> Result<Response, ClientError> {
        let percentage = if percentage.is_nan() {
            0.0
        } else {
            percentage.clamp(0.0, 100.0)
        };
        self.send(Request::new(
            Command::ShowProgress(ShowProgressParams { percentage }),
            priority,
        ))
    }

    /// Render a hierarchical layout scene.
    pub fn show_layout(
        &mut self,
        payload: LayoutPayload,
        priority: Priority,
    ) -> Result<Response, ClientError> {
        self.send(Request::new(
            Command::ShowLayout(ShowLayoutParams { payload }),
            priority,
        ))
    }

    /// Stop the running animation (always HIGH priority).
    pub fn stop_animation(&mut self) -> Result<Response, ClientError> {
        self.send(Request::new(Command::StopAnimation, Priority::High))
    }

    /// Blank the panel.
    pub fn clear(&mut self, priority: Priority) -> Result<Response, ClientError> {
        self.send(Request::new(Command::Clear, priority))
    }

    /// Run the daemon's built-in self-test sequence (blocks the worker
    /// for tens of seconds; the ack returns immediately).
    pub fn test(&mut self) -> Result<Response, ClientError> {
        self.send(Request::new(Command::Test, Priority::High))
    }

    /// Shut the daemon down.
    pub fn shutdown(&mut self) -> Result<Response, ClientError> {
        self.send(Request::new(Command::Shutdown, Priority::High))
    }

    // -- producer conveniences ---------------------------------------------

    /// Boot animation (finite, HIGH priority).
    pub fn show_boot(&mut self) -> Result<Response, ClientError> {
        self.show_animation(Animation::Boot, Some(2.0), None, Priority::High)
    }

    /// Looping WiFi search animation.
    pub fn show_wifi_searching(&mut self) -> Result<Response, ClientError> {
        self.show_animation(Animation::WifiSearching, None, None, Priority::Medium)
    }

    /// WiFi connected symbol.
    pub fn show_wifi_connected(&mut self) -> Result<Response, ClientError> {
        self.show_symbol(Symbol::Wifi, Priority::Medium)
    }

    /// WiFi error symbol (HIGH priority).
    pub fn show_wifi_error(&mut self) -> Result<Response, ClientError> {
        self.show_symbol(Symbol::WifiError, Priority::High)
    }

    /// Tunnel-up symbol.
    pub fn show_tunnel_active(&mut self) -> Result<Response, ClientError> {
        self.show_symbol(Symbol::Tunnel, Priority::Medium)
    }

    /// Discord-connected symbol.
    pub fn show_discord_active(&mut self) -> Result<Response, ClientError> {
        self.show_symbol(Symbol::Discord, Priority::Medium)
    }

    /// Success checkmark (HIGH priority).
    pub fn show_success(&mut self) -> Result<Response, ClientError> {
        self.show_symbol(Symbol::Check, Priority::High)
    }

    /// Error cross (HIGH priority).
    pub fn show_error(&mut self) -> Result<Response, ClientError> {
        self.show_symbol(Symbol::Error, Priority::High)
    }

    /// Brief activity blink.
    pub fn show_activity(&mut self, duration: f64) -> Result<Response, ClientError> {
        self.show_animation(Animation::Activity, Some(duration), None, Priority::Low)
    }

    /// Looping idle animation.
    pub fn show_idle(&mut self) -> Result<Response, ClientError> {
        self.show_animation(Animation::Idle, None, None, Priority::Low)
    }

    /// The "CONNECTED" boot diagnostic.
    pub fn show_connected_test(&mut self) -> Result<Response, ClientError> {
        self.show_symbol(Symbol::Connected, Priority::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_is_a_no_op() {
        let mut client = LedClient::mock();
        assert!(client.is_mock());
        let response = client.show_error().unwrap();
        assert!(response.success);
        let response = client.show_progress(250.0, Priority::Low).unwrap();
        assert!(response.success);
    }

    #[test]
    fn connect_failure_reports_attempts() {
        let mut client = LedClient::new("/nonexistent/led.sock").with_retries(2);
        match client.clear(Priority::Low) {
            Err(ClientError::Connect { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected connect error, got {other:?}"),
        }
    }

    #[test]
    fn progress_is_clamped_before_sending() {
        // In mock mode nothing hits the wire, but the clamp still runs;
        // this exercises the NaN path for coverage.
        let mut client = LedClient::mock();
        assert!(client.show_progress(f32::NAN, Priority::Low).is_ok());
    }
}
