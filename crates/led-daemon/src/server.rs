//! IPC server: a Unix stream socket speaking newline-delimited JSON.
//!
//! Each accepted connection gets its own reader thread. A malformed
//! message earns one error response and a closed connection; a decoded
//! command is acknowledged on the same line order it arrived.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use led_protocol::{Request, Response};
use tracing::{debug, error, info, warn};

use crate::coordinator::CoordinatorHandle;
use crate::DaemonError;

/// Poll interval of the accept loop against the shutdown flag.
const ACCEPT_POLL: Duration = Duration::from_millis(100);

/// Socket permissions: any local producer may connect.
const SOCKET_MODE: u32 = 0o666;

/// The accept loop and its listener.
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
    handle: CoordinatorHandle,
    shutdown: Arc<AtomicBool>,
}

impl IpcServer {
    /// Bind the socket, replacing a stale file from a previous run.
    /// Bind failure is fatal (`DaemonError::SocketBindFailed`).
    pub fn bind(
        socket_path: &Path,
        handle: CoordinatorHandle,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, DaemonError> {
        if let Some(parent) = socket_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!(dir = %parent.display(), "creating socket directory");
                std::fs::create_dir_all(parent).map_err(|source| DaemonError::SocketBindFailed {
                    path: socket_path.to_owned(),
                    source,
                })?;
            }
        }
        if socket_path.exists() {
            info!(path = %socket_path.display(), "removing stale socket");
            let _ = std::fs::remove_file(socket_path);
        }

        let listener =
            UnixListener::bind(socket_path).map_err(|source| DaemonError::SocketBindFailed {
                path: socket_path.to_owned(),
                source,
            })?;
        // Permissions are the only access control on this channel.
        if let Err(e) =
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(SOCKET_MODE))
        {
            warn!(error = %e, "failed to set socket permissions");
        }
        listener
            .set_nonblocking(true)
            .map_err(|source| DaemonError::SocketBindFailed {
                path: socket_path.to_owned(),
                source,
            })?;

        info!(path = %socket_path.display(), "listening");
        Ok(Self {
            listener,
            socket_path: socket_path.to_owned(),
            handle,
            shutdown,
        })
    }

    /// Accept connections until the shutdown flag rises, then unlink the
    /// socket. Individual accept failures are logged and survived.
    pub fn run(&self) {
        while !self.shutdown.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, _)) => {
                    let handle = self.handle.clone();
                    std::thread::spawn(move || handle_client(stream, handle));
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL);
                }
                Err(e) => {
                    error!(error = %e, "accept failed");
                    std::thread::sleep(ACCEPT_POLL);
                }
            }
        }
        info!("server stopped accepting connections");
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Serve one connection until EOF or the first malformed message.
fn handle_client(stream: UnixStream, handle: CoordinatorHandle) {
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(e) => {
            warn!(error = %e, "failed to clone client stream");
            return;
        }
    };
    let reader = BufReader::new(stream);

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "client read failed");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match Request::parse_line(&line) {
            Ok(request) => {
                let response = handle.submit(request);
                if write_response(&mut writer, &response).is_err() {
                    return;
                }
            }
            Err(e) => {
                // One error response, then drop the connection; anything
                // already buffered after the bad line is never processed.
                debug!(error = %e, "rejecting malformed request");
                let _ = write_response(&mut writer, &Response::rejected(e.code(), e.to_string()));
                return;
            }
        }
    }
}

fn write_response(writer: &mut UnixStream, response: &Response) -> std::io::Result<()> {
    writer.write_all(response.to_line().as_bytes())?;
    writer.flush()
}
