//! End-to-end tests over a real Unix socket, with the mock panel standing
//! in for hardware.

use std::io::{BufRead, BufReader, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use led_daemon::{
    AnimationEngine, CommandQueue, CoordinatorHandle, IpcServer, MockPanel, SharedPanel, Worker,
};
use led_protocol::{ErrorCode, Response, Symbol};
use matrix_scenes::{render_progress, render_symbol};

struct TestDaemon {
    socket_path: PathBuf,
    mock: Arc<Mutex<MockPanel>>,
    engine: Arc<AnimationEngine>,
    worker: Option<JoinHandle<()>>,
    server: Option<JoinHandle<()>>,
    _dir: tempfile::TempDir,
}

fn start_daemon() -> TestDaemon {
    let dir = tempfile::tempdir().expect("tempdir");
    let socket_path = dir.path().join("led-manager.sock");

    let mock = Arc::new(Mutex::new(MockPanel::new()));
    let shared: SharedPanel = mock.clone();
    let queue = Arc::new(CommandQueue::new());
    let engine = Arc::new(AnimationEngine::new(Arc::clone(&shared)));
    let handle = CoordinatorHandle::new(Arc::clone(&queue), Arc::clone(&engine));
    let shutdown = Arc::new(AtomicBool::new(false));

    let server = IpcServer::bind(&socket_path, handle, Arc::clone(&shutdown)).expect("bind");
    let server_thread = std::thread::spawn(move || server.run());

    let worker = Worker::new(queue, Arc::clone(&engine), shared, shutdown);
    let worker_thread = std::thread::spawn(move || worker.run());

    TestDaemon {
        socket_path,
        mock,
        engine,
        worker: Some(worker_thread),
        server: Some(server_thread),
        _dir: dir,
    }
}

impl TestDaemon {
    fn connect(&self) -> BufReader<UnixStream> {
        let stream = UnixStream::connect(&self.socket_path).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("read timeout");
        BufReader::new(stream)
    }

    fn send(&self, conn: &mut BufReader<UnixStream>, line: &str) -> Response {
        conn.get_mut()
            .write_all(format!("{line}\n").as_bytes())
            .expect("write");
        read_response(conn)
    }

    fn shutdown(&mut self) {
        let mut conn = self.connect();
        let ack = self.send(&mut conn, r#"{"command":"shutdown"}"#);
        assert!(ack.success);
        self.join();
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.join().expect("worker join");
        }
        if let Some(server) = self.server.take() {
            server.join().expect("server join");
        }
    }
}

fn read_response(conn: &mut BufReader<UnixStream>) -> Response {
    let mut line = String::new();
    conn.read_line(&mut line).expect("read response");
    serde_json::from_str(line.trim()).expect("decode response")
}

fn wait_for<F: Fn() -> bool>(what: &str, condition: F) {
    let deadline = Instant::now() + Duration::from_secs(3);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// Mock-mode progress staircase: three acks, three presents, no hardware.
#[test]
fn mock_progress_sequence() {
    let mut daemon = start_daemon();
    let mut conn = daemon.connect();

    for percentage in [0, 50, 100] {
        let ack = daemon.send(
            &mut conn,
            &format!(
                r#"{{"command":"show_progress","priority":"LOW","params":{{"percentage":{percentage}}}}}"#
            ),
        );
        assert!(ack.success, "ack for {percentage}");
    }

    wait_for("three presents", || {
        daemon.mock.lock().unwrap().present_count() == 3
    });
    {
        let mock = daemon.mock.lock().unwrap();
        assert_eq!(mock.presents()[0].lit_rows(), 0);
        assert_eq!(mock.presents()[2].lit_rows(), 64);
    }

    daemon.shutdown();
}

/// A malformed line earns exactly one error response and a closed
/// connection; the rest of the buffer is never processed.
#[test]
fn transport_robustness() {
    let mut daemon = start_daemon();
    let mut conn = daemon.connect();

    conn.get_mut()
        .write_all(b"{not json}\n{\"command\":\"clear\"}\n")
        .expect("write");

    let response = read_response(&mut conn);
    assert!(!response.success);
    assert_eq!(response.error, Some(ErrorCode::InvalidParams));

    // Server closed the connection; nothing further arrives.
    let mut rest = Vec::new();
    conn.get_mut().read_to_end(&mut rest).expect("read to eof");
    assert!(rest.is_empty());

    // The trailing clear was discarded with the connection.
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(daemon.mock.lock().unwrap().clear_count(), 0);

    // The daemon itself is unaffected.
    let mut fresh = daemon.connect();
    let ack = daemon.send(&mut fresh, r#"{"command":"clear"}"#);
    assert!(ack.success);
    wait_for("clear dispatched", || {
        daemon.mock.lock().unwrap().clear_count() == 1
    });

    daemon.shutdown();
}

/// Unknown commands report `InvalidCommand` (and also close the
/// connection, like any rejected message).
#[test]
fn unknown_command_is_rejected() {
    let mut daemon = start_daemon();
    let mut conn = daemon.connect();
    let response = daemon.send(&mut conn, r#"{"command":"dance","params":{}}"#);
    assert!(!response.success);
    assert_eq!(response.error, Some(ErrorCode::InvalidCommand));
    daemon.shutdown();
}

/// Priority preemption: a HIGH symbol interrupts a LOW animation, and a
/// later LOW progress update cannot overwrite the symbol during its
/// display window.
#[test]
fn high_priority_symbol_preempts_idle_animation() {
    let mut daemon = start_daemon();
    let mut conn = daemon.connect();

    let ack = daemon.send(
        &mut conn,
        r#"{"command":"show_animation","priority":"LOW","params":{"animation":"idle","frame_delay":0.1}}"#,
    );
    assert!(ack.success);
    wait_for("animation frames", || {
        daemon.mock.lock().unwrap().present_count() >= 2
    });
    assert!(daemon.engine.is_running());

    // Preempting symbol with a 1 s display window to keep the test quick.
    let t0 = Instant::now();
    let ack = daemon.send(
        &mut conn,
        r#"{"command":"show_symbol","priority":"HIGH","params":{"symbol":"error","duration":1.0}}"#,
    );
    assert!(ack.success);

    let expected = render_symbol(Symbol::Error, None);
    wait_for("error symbol on panel", || {
        daemon.mock.lock().unwrap().current() == &expected
    });
    // Within one frame delay plus the bounded stop window (plus slack).
    assert!(t0.elapsed() < Duration::from_millis(700));
    assert!(!daemon.engine.is_running());

    // A LOW progress update queued 100 ms later must wait out the window.
    std::thread::sleep(Duration::from_millis(100));
    let ack = daemon.send(
        &mut conn,
        r#"{"command":"show_progress","priority":"LOW","params":{"percentage":10}}"#,
    );
    assert!(ack.success);
    std::thread::sleep(Duration::from_millis(300));
    assert_eq!(daemon.mock.lock().unwrap().current(), &expected);

    wait_for("progress after display window", || {
        daemon.mock.lock().unwrap().current() == &render_progress(10.0)
    });

    daemon.shutdown();
}

/// Commands on one connection dispatch in submission order.
#[test]
fn single_connection_preserves_order() {
    let mut daemon = start_daemon();
    let mut conn = daemon.connect();

    for percentage in [10, 20, 30] {
        let ack = daemon.send(
            &mut conn,
            &format!(
                r#"{{"command":"show_progress","priority":"LOW","params":{{"percentage":{percentage}}}}}"#
            ),
        );
        assert!(ack.success);
    }
    wait_for("three presents", || {
        daemon.mock.lock().unwrap().present_count() == 3
    });
    {
        let mock = daemon.mock.lock().unwrap();
        let expected: Vec<_> = [10.0, 20.0, 30.0].iter().map(|&p| render_progress(p)).collect();
        assert_eq!(mock.presents(), expected.as_slice());
    }

    daemon.shutdown();
}

/// Shutdown drains the daemon: worker and server exit, the stale socket
/// file disappears, the panel is cleared.
#[test]
fn shutdown_cleans_up() {
    let mut daemon = start_daemon();
    let mut conn = daemon.connect();
    let ack = daemon.send(&mut conn, r#"{"command":"shutdown","priority":"LOW"}"#);
    assert!(ack.success);

    daemon.join();
    assert!(!daemon.socket_path.exists(), "socket file not removed");
    assert!(daemon.mock.lock().unwrap().current().is_blank());
}

/// Stop with no running animation acknowledges with `NotRunning`.
#[test]
fn stop_when_idle_reports_not_running() {
    let mut daemon = start_daemon();
    let mut conn = daemon.connect();
    let response = daemon.send(&mut conn, r#"{"command":"stop_animation"}"#);
    assert!(response.success);
    assert_eq!(response.error, Some(ErrorCode::NotRunning));
    daemon.shutdown();
}
