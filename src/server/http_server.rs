use crate::server::AppService;
use may::coroutine::JoinHandle;
use may_minihttp::HttpServerWithHeaders;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

/// Header slots reserved per parsed request. Proxied traffic routinely
/// carries more than the transport's default of 8.
const REQUEST_HEADER_SLOTS: usize = 32;

const READY_TIMEOUT: Duration = Duration::from_millis(250);
const READY_POLL: Duration = Duration::from_millis(5);

/// Runs an [`AppService`] on the `may` coroutine runtime.
pub struct HttpServer {
    service: AppService,
}

impl HttpServer {
    #[must_use]
    pub fn new(service: AppService) -> Self {
        Self { service }
    }

    /// Bind the address and start serving, returning a handle for readiness
    /// checks and shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the address resolves to nothing or the port
    /// cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "no socket address resolved")
        })?;
        let handle =
            HttpServerWithHeaders::<_, { REQUEST_HEADER_SLOTS }>(self.service).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}

/// Handle to a running server: readiness polling and shutdown.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server was started on.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll-connect until the listener accepts, so callers can sequence
    /// traffic after startup.
    ///
    /// # Errors
    ///
    /// `TimedOut` if nothing accepts within the readiness window.
    pub fn wait_ready(&self) -> io::Result<()> {
        let deadline = Instant::now() + READY_TIMEOUT;
        loop {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "server not accepting connections",
                ));
            }
            thread::sleep(READY_POLL);
        }
    }

    /// Cancel the accept coroutine and wait for it to unwind.
    pub fn stop(self) {
        // SAFETY: cancellation is the may runtime's shutdown path for a
        // coroutine parked in accept; the handle is still valid here.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block the calling thread for the life of the server.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}
