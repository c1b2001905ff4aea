use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rosc::decoder;
use tracing::{debug, error, info, warn};

use super::dispatcher::Dispatcher;
use super::osc_sender::resolve;
use crate::error::OscError;

/// How often the receive loop wakes up to check the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Receive loop running on a background thread, dispatching every decoded
/// message to the shared [`Dispatcher`].
pub struct OscListener {
    stop_flag: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl OscListener {
    /// Binds `host:port` and spawns the receive thread.
    pub fn start(host: &str, port: u16, dispatcher: Arc<Dispatcher>) -> Result<Self, OscError> {
        let bind_addr = resolve(host, port)?;
        let socket = UdpSocket::bind(bind_addr).map_err(|source| OscError::Bind {
            addr: bind_addr.to_string(),
            source,
        })?;
        socket
            .set_read_timeout(Some(POLL_INTERVAL))
            .map_err(|source| OscError::Bind {
                addr: bind_addr.to_string(),
                source,
            })?;
        let local_addr = socket.local_addr().unwrap_or(bind_addr);
        let listener = Self::spawn(
            move |buf: &mut [u8]| socket.recv_from(buf),
            local_addr,
            dispatcher,
        )?;
        info!(addr = %local_addr, "OSC receiver listening");
        Ok(listener)
    }

    /// Runs the receive loop over `recv` on the "osc-receiver" thread.
    pub(crate) fn spawn<R>(
        recv: R,
        local_addr: SocketAddr,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Self, OscError>
    where
        R: FnMut(&mut [u8]) -> io::Result<(usize, SocketAddr)> + Send + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));
        let stop = stop_flag.clone();
        let alive = running.clone();

        let thread = thread::Builder::new()
            .name("osc-receiver".to_string())
            .spawn(move || {
                receive_loop(recv, &dispatcher, &stop);
                alive.store(false, Ordering::SeqCst);
                debug!("OSC receive loop exited");
            })
            .map_err(OscError::Spawn)?;

        Ok(Self {
            stop_flag,
            running,
            thread: Some(thread),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// False once the loop has exited, either by `stop` or a socket error.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signals the loop to stop and waits for the thread to finish.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("OSC receiver thread panicked");
            }
            info!(addr = %self.local_addr, "OSC receiver stopped");
        }
    }
}

impl Drop for OscListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn receive_loop<R>(mut recv: R, dispatcher: &Dispatcher, stop: &AtomicBool)
where
    R: FnMut(&mut [u8]) -> io::Result<(usize, SocketAddr)>,
{
    let mut buf = [0u8; decoder::MTU];
    while !stop.load(Ordering::SeqCst) {
        match recv(&mut buf) {
            Ok((size, peer_addr)) => match decoder::decode_udp(&buf[..size]) {
                Ok((_, packet)) => {
                    dispatcher.handle_packet(packet);
                }
                Err(err) => {
                    warn!(peer = %peer_addr, error = %err, "OSC decode error");
                }
            },
            Err(ref e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                // Timeout, loop to check the stop flag
                continue;
            }
            // Windows reports ICMP port-unreachable from an earlier send this way.
            Err(ref e) if e.kind() == io::ErrorKind::ConnectionReset => {
                debug!("ignoring connection reset on OSC receive socket");
                continue;
            }
            Err(err) => {
                error!(error = %err, "OSC recv error, receive loop stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Endpoint;
    use rosc::{encoder, OscMessage, OscPacket, OscType};
    use std::sync::mpsc;

    #[test]
    fn start_and_stop() {
        let mut listener = OscListener::start("127.0.0.1", 0, Arc::new(Dispatcher::new())).unwrap();
        assert_ne!(listener.local_addr().port(), 0);
        assert!(listener.is_running());
        listener.stop();
        assert!(!listener.is_running());
    }

    #[test]
    fn dispatches_received_datagrams() {
        let dispatcher = Arc::new(Dispatcher::new());
        let (tx, rx) = mpsc::channel();
        let tx = std::sync::Mutex::new(tx);
        dispatcher.register(
            Endpoint::ConfigReset,
            Arc::new(move |event| {
                let _ = tx.lock().unwrap().send(event.clone());
            }),
        );
        let mut listener = OscListener::start("127.0.0.1", 0, dispatcher).unwrap();

        let packet = OscPacket::Message(OscMessage {
            addr: "/config/reset".to_string(),
            args: vec![OscType::String("null".to_string())],
        });
        let sender_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        // garbage first: the loop must survive it
        sender_socket.send_to(&[0xff, 0x00], listener.local_addr()).unwrap();
        sender_socket
            .send_to(&encoder::encode(&packet).unwrap(), listener.local_addr())
            .unwrap();

        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(event, crate::messages::OscEvent::ConfigReset);
        assert!(listener.is_running());
        listener.stop();
    }

    #[test]
    fn fatal_socket_error_ends_the_loop() {
        let (tx, rx) = mpsc::channel();
        let mut calls = 0;
        let recv = move |_: &mut [u8]| -> io::Result<(usize, SocketAddr)> {
            calls += 1;
            match calls {
                1 => Err(io::Error::from(io::ErrorKind::TimedOut)),
                2 => Err(io::Error::from(io::ErrorKind::ConnectionReset)),
                _ => {
                    let _ = tx.send(());
                    Err(io::Error::from(io::ErrorKind::PermissionDenied))
                }
            }
        };
        let addr: SocketAddr = "127.0.0.1:9001".parse().unwrap();
        let mut listener = OscListener::spawn(recv, addr, Arc::new(Dispatcher::new())).unwrap();

        // timeouts and resets are survived, the third error is fatal
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while listener.is_running() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!listener.is_running());
        listener.stop();
    }

    #[test]
    fn bind_failure_on_used_port() {
        let taken = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let result = OscListener::start("127.0.0.1", port, Arc::new(Dispatcher::new()));
        assert!(matches!(result, Err(OscError::Bind { .. })));
    }
}
