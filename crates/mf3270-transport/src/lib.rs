//! Emulator process transport for Mainframe3270
//!
//! Spawns one of the x3270 family executables and exposes a line-oriented
//! duplex channel to its script interface: either the child's stdin/stdout
//! pipes or a loopback TCP socket opened on the child's script port.

pub mod app;
pub mod pipe;
pub mod socket;

pub use app::{build_args, AppCommand, ExecutableVariant, DEFAULT_MODEL};
pub use pipe::PipeTransport;
pub use socket::{connect_with_retry, pick_script_port, RetryPolicy, SocketTransport};

use async_trait::async_trait;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Not connected to the emulator")]
    NotConnected,

    #[error("Failed to spawn {executable}: {source}")]
    SpawnFailed {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No free script port available")]
    NoFreePort,

    #[error("Transport I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    /// True for the errors an emulator produces when it has already gone
    /// away: a broken pipe or a reset socket.
    pub fn is_disconnect(&self) -> bool {
        match self {
            TransportError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset
            ),
            _ => false,
        }
    }
}

/// Byte channel to a running emulator.
///
/// Implementations must flush every `write` before returning and hand back
/// one line per `read_line`, including its line terminator. End of stream
/// is reported as an empty line.
#[async_trait]
pub trait Transport: Send {
    /// Bring the host connection up at the transport level.
    ///
    /// Returns `true` when the transport itself connected to `host` (the
    /// script-port variant passes the host on the command line), `false`
    /// when the caller still has to send a `Connect` action.
    async fn connect(&mut self, host: &str) -> Result<bool, TransportError>;

    /// Write raw bytes and flush them.
    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Read one line from the emulator.
    async fn read_line(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Release the channel.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Starts emulators for new sessions.
///
/// The production launcher spawns real processes; tests substitute one that
/// hands out in-memory transports.
pub trait Launcher: Send + Sync {
    fn launch(&self, app: AppCommand, retry: RetryPolicy) -> Result<Box<dyn Transport>, TransportError>;
}

/// Launcher that spawns the x3270 executables
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, app: AppCommand, retry: RetryPolicy) -> Result<Box<dyn Transport>, TransportError> {
        open_transport(app, retry)
    }
}

/// Open the transport matching the command's executable variant.
///
/// Pipe variants are spawned immediately. The script-port variant only
/// reserves a port here; its process starts on [`Transport::connect`].
pub fn open_transport(
    app: AppCommand,
    retry: RetryPolicy,
) -> Result<Box<dyn Transport>, TransportError> {
    if app.variant().uses_script_port() {
        Ok(Box::new(SocketTransport::new(app, retry)?))
    } else {
        Ok(Box::new(PipeTransport::spawn(&app)?))
    }
}
