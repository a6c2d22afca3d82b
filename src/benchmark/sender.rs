//! The send engine: concurrent, cancellable UDP emission loops
//!
//! Each loop owns its socket exclusively; the counters and the cancel
//! token are the only shared state. A send that the kernel defers
//! (`WouldBlock`) is the asynchronous-completion case: it is counted,
//! then finished via readiness polling. Any real socket error converts
//! into cancellation for the whole run and is reported once.

use std::io::{self, ErrorKind};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mio::net::UdpSocket;
use mio::{Events, Interest, Poll, Token};
use tracing::{debug, error};

use super::cancel::CancelToken;
use super::counters::SendCounters;

const SENDER: Token = Token(0);

/// Upper bound on one readiness wait, so a loop parked on a deferred
/// send still observes cancellation promptly.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Drives packet emission for one run
///
/// Cheap to clone: all fields are shared handles or plain values, and a
/// clone is handed to each spawned worker thread.
#[derive(Clone)]
pub struct PacketSender {
    message: Arc<[u8]>,
    target: SocketAddr,
    counters: Arc<SendCounters>,
    cancel: Arc<CancelToken>,
}

impl PacketSender {
    pub fn new(
        message: Arc<[u8]>,
        target: SocketAddr,
        counters: Arc<SendCounters>,
        cancel: Arc<CancelToken>,
    ) -> Self {
        Self {
            message,
            target,
            counters,
            cancel,
        }
    }

    /// Run exactly one send loop on the calling thread
    pub fn send_single_threaded(&self) {
        self.run_send_loop();
    }

    /// Run `worker_count` concurrent send loops
    ///
    /// Spawns `worker_count - 1` threads, runs one loop inline, and
    /// returns only after every spawned loop has finished.
    pub fn send_with_workers(&self, worker_count: u32) {
        let spawned: Vec<_> = (1..worker_count)
            .map(|id| {
                let sender = self.clone();
                thread::Builder::new()
                    .name(format!("send-worker-{}", id))
                    .spawn(move || sender.run_send_loop())
                    .expect("failed to spawn send worker")
            })
            .collect();

        self.run_send_loop();

        for handle in spawned {
            handle.join().expect("send worker panicked");
        }
    }

    fn run_send_loop(&self) {
        if let Err(e) = self.send_loop() {
            // A socket error is fatal for the whole run, not just this
            // loop. The first reporter wins; the others drain out on
            // the flag without logging again.
            if self.cancel.cancel() {
                error!("socket error, stopping run: {}", e);
            }
        }
    }

    fn send_loop(&self) -> io::Result<()> {
        let bind_addr = match self.target {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let mut socket = UdpSocket::bind(bind_addr)?;
        let mut poll = Poll::new()?;
        poll.registry()
            .register(&mut socket, SENDER, Interest::WRITABLE)?;
        let mut events = Events::with_capacity(4);

        while !self.cancel.is_cancelled() {
            match socket.send_to(&self.message, self.target) {
                Ok(n) => self.counters.add_bytes(n as u64),
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    self.counters.record_async_completion();
                    self.finish_deferred_send(&mut poll, &mut events, &socket)?;
                }
                Err(e) => return Err(e),
            }
        }

        debug!("send loop observed cancellation, exiting");
        Ok(())
    }

    /// Complete a send the kernel deferred at issue time.
    ///
    /// Waits for writability in bounded slices and re-issues. If
    /// cancellation fires while parked here, the deferred send is
    /// abandoned: its issue was already counted as an asynchronous
    /// completion, its bytes are never added.
    fn finish_deferred_send(
        &self,
        poll: &mut Poll,
        events: &mut Events,
        socket: &UdpSocket,
    ) -> io::Result<()> {
        while !self.cancel.is_cancelled() {
            poll.poll(events, Some(POLL_TIMEOUT))?;
            match socket.send_to(&self.message, self.target) {
                Ok(n) => {
                    self.counters.add_bytes(n as u64);
                    return Ok(());
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::payload::make_message;
    use std::net::UdpSocket as StdUdpSocket;
    use std::time::Instant;

    const DGRAM_SIZE: usize = 1000;

    fn sender_to(target: SocketAddr) -> (PacketSender, Arc<SendCounters>, Arc<CancelToken>) {
        let counters = Arc::new(SendCounters::new());
        let cancel = Arc::new(CancelToken::new());
        let sender = PacketSender::new(
            make_message(DGRAM_SIZE),
            target,
            Arc::clone(&counters),
            Arc::clone(&cancel),
        );
        (sender, counters, cancel)
    }

    fn cancel_after(cancel: &Arc<CancelToken>, after: Duration) -> thread::JoinHandle<()> {
        let cancel = Arc::clone(cancel);
        thread::spawn(move || {
            thread::sleep(after);
            cancel.cancel();
        })
    }

    fn loopback_receiver() -> (StdUdpSocket, SocketAddr) {
        let receiver = StdUdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = receiver.local_addr().unwrap();
        (receiver, addr)
    }

    #[test]
    fn test_single_loop_sends_to_loopback() {
        let (_receiver, target) = loopback_receiver();
        let (sender, counters, cancel) = sender_to(target);
        let timer = cancel_after(&cancel, Duration::from_millis(200));

        sender.send_single_threaded();
        timer.join().unwrap();

        assert!(cancel.is_cancelled());
        assert!(counters.bytes_sent() > 0);
        // Only whole successful datagrams are counted.
        assert_eq!(counters.bytes_sent() % DGRAM_SIZE as u64, 0);
    }

    #[test]
    fn test_workers_all_exit_on_cancellation() {
        let (_receiver, target) = loopback_receiver();
        let (sender, counters, cancel) = sender_to(target);
        let timer = cancel_after(&cancel, Duration::from_millis(200));

        let started = Instant::now();
        sender.send_with_workers(4);
        timer.join().unwrap();

        // Returning from send_with_workers means every spawned loop
        // observed the flag and joined.
        assert!(cancel.is_cancelled());
        assert!(counters.bytes_sent() > 0);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_no_send_when_already_cancelled() {
        let (_receiver, target) = loopback_receiver();
        let (sender, counters, cancel) = sender_to(target);

        cancel.cancel();
        sender.send_single_threaded();

        assert_eq!(counters.bytes_sent(), 0);
        assert_eq!(counters.async_completions(), 0);
    }

    #[test]
    fn test_socket_error_cancels_run() {
        // Destination port 0 is rejected by the kernel on the first
        // send, exercising the error-converts-to-cancellation path.
        let target: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let (sender, counters, cancel) = sender_to(target);

        let started = Instant::now();
        sender.send_single_threaded();

        assert!(cancel.is_cancelled());
        assert_eq!(counters.bytes_sent(), 0);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_socket_error_stops_all_workers() {
        let target: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let (sender, counters, cancel) = sender_to(target);

        let started = Instant::now();
        sender.send_with_workers(3);

        assert!(cancel.is_cancelled());
        assert_eq!(counters.bytes_sent(), 0);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
