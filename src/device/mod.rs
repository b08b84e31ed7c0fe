//! Device side of the wire: receives color datagrams.

use crossbeam::channel::Sender;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

mod frame;
pub use self::frame::{decode_frame, read_frame, ColorFrame, FrameError, FrameResult};

const MAX_PACKET_SIZE: usize = 4096;

/// How often an idle listener checks whether it should stop.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Messages produced by the listener thread.
#[derive(Debug)]
pub enum DeviceMessage {
    Frame { source: SocketAddr, frame: ColorFrame },
}

/// A running listener thread. Dropping it stops and joins the thread.
pub struct Listener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Listener {
    /// True once the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Ask the thread to stop and wait for it.
    pub fn stop(mut self) -> thread::Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> thread::Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if self.shutdown().is_err() {
            warn!("[device] Listener thread panicked");
        }
    }
}

/// Errors that leave the socket usable.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
            | io::ErrorKind::ConnectionReset
    )
}

/// Start a thread that receives color datagrams on `socket` and passes
/// them on.
///
/// The socket's read timeout is replaced with a short poll interval. The
/// thread ends when the returned `Listener` is stopped or dropped, when the
/// receiving side of `sender` is gone (noticed on the next frame), or when
/// the socket fails for good.
pub fn start_listener_thread(
    socket: UdpSocket,
    sender: Sender<DeviceMessage>,
) -> io::Result<Listener> {
    socket.set_read_timeout(Some(POLL_INTERVAL))?;
    match socket.local_addr() {
        Ok(addr) => info!("[device] Listening for colors at {}", addr),
        Err(_) => info!("[device] Listening for colors"),
    }

    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = stop.clone();

    let handle = thread::spawn(move || {
        let mut buf = [0; MAX_PACKET_SIZE];
        while !thread_stop.load(Ordering::SeqCst) {
            let (len, source) = match socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(ref err) if is_transient(err) => continue,
                Err(err) => {
                    warn!("[device] Socket error, exiting thread: {}", err);
                    return;
                }
            };

            let frame = match decode_frame(&buf[0..len]) {
                Ok(frame) => frame,
                Err(err) => {
                    warn!("[device] Bad datagram from {}: {}", source, err);
                    continue;
                }
            };

            if sender.send(DeviceMessage::Frame { source, frame }).is_err() {
                info!("[device] Frame receiver gone. Exiting thread.");
                return;
            }
        }
        info!("[device] Listener stopped.");
    });

    Ok(Listener {
        stop,
        handle: Some(handle),
    })
}
