//! Loopback script-port transport for wc3270
//!
//! wc3270 cannot be scripted through its standard streams. It is told to
//! listen on a free loopback port with `-scriptport`, then we connect to
//! that port once the process is up. The port is picked by binding an
//! ephemeral port and releasing it before the spawn, so another process may
//! grab it in between; that race is accepted.

use crate::{AppCommand, Transport, TransportError};
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::process::Child;
use tracing::{debug, info, warn};

/// Connect retry policy for the script port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of connect attempts
    pub attempts: u32,
    /// Sleep between refused attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 15,
            delay: Duration::from_secs(1),
        }
    }
}

/// Reserve a loopback port for the emulator's script interface
pub fn pick_script_port() -> Result<u16, TransportError> {
    portpicker::pick_unused_port().ok_or(TransportError::NoFreePort)
}

/// Connect to `addr`, retrying while the connection is refused.
///
/// A refused connection means the emulator is not listening yet. Any other
/// error is returned immediately.
pub async fn connect_with_retry(
    addr: SocketAddr,
    policy: RetryPolicy,
) -> Result<TcpStream, TransportError> {
    for attempt in 1..=policy.attempts {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                debug!("Connected to script port {} on attempt {}", addr, attempt);
                return Ok(stream);
            }
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                warn!("Script port {} refused attempt {}: {}", addr, attempt, e);
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(TransportError::ConnectionFailed(format!(
        "script port {addr} refused {} connection attempts",
        policy.attempts
    )))
}

/// wc3270 driven over a loopback TCP connection
pub struct SocketTransport {
    app: AppCommand,
    port: u16,
    retry: RetryPolicy,
    child: Option<Child>,
    stream: Option<BufReader<TcpStream>>,
}

impl SocketTransport {
    /// Reserve a script port; nothing is spawned until `connect`
    pub fn new(app: AppCommand, retry: RetryPolicy) -> Result<Self, TransportError> {
        let port = pick_script_port()?;
        Ok(Self::with_port(app, port, retry))
    }

    pub fn with_port(app: AppCommand, port: u16, retry: RetryPolicy) -> Self {
        Self {
            app,
            port,
            retry,
            child: None,
            stream: None,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_attached(&self) -> bool {
        self.stream.is_some()
    }

    fn stream(&mut self) -> Result<&mut BufReader<TcpStream>, TransportError> {
        self.stream.as_mut().ok_or(TransportError::NotConnected)
    }

    /// Connect to the script port of an emulator that is already running
    pub async fn attach(&mut self) -> Result<(), TransportError> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.port));
        let stream = connect_with_retry(addr, self.retry).await?;
        self.stream = Some(BufReader::new(stream));
        Ok(())
    }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn connect(&mut self, host: &str) -> Result<bool, TransportError> {
        let mut command = self.app.to_script_port_command(self.port, host);
        info!(
            "Spawning {} on script port {} for {}",
            self.app.program(),
            self.port,
            host
        );
        let child = command.spawn().map_err(|source| TransportError::SpawnFailed {
            executable: self.app.program().to_string(),
            source,
        })?;
        self.child = Some(child);

        self.attach().await?;
        Ok(true)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream()?.get_mut();
        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut line = Vec::new();
        self.stream()?.read_until(b'\n', &mut line).await?;
        Ok(line)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.get_mut().shutdown().await {
                debug!("Script socket shutdown: {}", e);
            }
        }
        self.child.take();
        Ok(())
    }
}
