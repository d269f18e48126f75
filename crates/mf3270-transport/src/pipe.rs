//! Pipe transport for s3270, ws3270 and x3270 -script

use crate::{AppCommand, Transport, TransportError};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

/// How long a closed emulator gets to exit before it is killed
const EXIT_GRACE: Duration = Duration::from_secs(2);

/// Emulator driven over its standard input and output
pub struct PipeTransport {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl PipeTransport {
    /// Spawn the emulator described by `app`
    pub fn spawn(app: &AppCommand) -> Result<Self, TransportError> {
        info!("Spawning {} {:?}", app.program(), app.args());
        Self::from_command(app.to_command(), app.program())
    }

    /// Spawn an arbitrary command whose stdin and stdout are piped
    pub fn from_command(mut command: Command, name: &str) -> Result<Self, TransportError> {
        let mut child = command.spawn().map_err(|source| TransportError::SpawnFailed {
            executable: name.to_string(),
            source,
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::ConnectionFailed(format!("{name}: stdin not piped")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::ConnectionFailed(format!("{name}: stdout not piped")))?;

        debug!("{} started with pid {:?}", name, child.id());

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
        })
    }

    /// Process id of the emulator, `None` once it has been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait]
impl Transport for PipeTransport {
    async fn connect(&mut self, _host: &str) -> Result<bool, TransportError> {
        Ok(false)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let stdin = self.stdin.as_mut().ok_or(TransportError::NotConnected)?;
        stdin.write_all(data).await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut line = Vec::new();
        self.stdout.read_until(b'\n', &mut line).await?;
        Ok(line)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        // Dropping stdin delivers EOF, which ends the emulator's script loop
        self.stdin.take();

        match tokio::time::timeout(EXIT_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => debug!("Emulator exited with {}", status),
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                warn!("Emulator still running after {:?}, killing it", EXIT_GRACE);
                self.child.start_kill()?;
            }
        }
        Ok(())
    }
}
