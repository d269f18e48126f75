//! In-memory transports that replay canned emulator responses

use crate::fixtures::data::STATUS_CONNECTED;
use async_trait::async_trait;
use mf3270_transport::{AppCommand, Launcher, RetryPolicy, Transport, TransportError};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct ScriptState {
    lines: VecDeque<Vec<u8>>,
    written: Vec<Vec<u8>>,
    connects: Vec<String>,
    closes: usize,
    detached: bool,
    self_connecting: bool,
    write_error: Option<io::ErrorKind>,
}

/// Transport whose reads come from a queue filled by the test.
///
/// Clones share state, so a test keeps one handle for inspection while the
/// code under test owns another. An exhausted queue reads as end of stream.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects reads and writes with `NotConnected` until `connect` is called
    pub fn detached() -> Self {
        let transport = Self::new();
        transport.lock().detached = true;
        transport
    }

    /// `connect` reports that the transport reached the host itself
    pub fn self_connecting(self) -> Self {
        self.lock().self_connecting = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().expect("script state poisoned")
    }

    pub fn push_line(&self, line: &str) -> &Self {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.lock().lines.push_back(bytes);
        self
    }

    /// Queue one full response: data lines, a status line and a result line
    pub fn respond(&self, data: &[&str], status: &str, result: &str) -> &Self {
        for line in data {
            self.push_line(&format!("data: {line}"));
        }
        self.push_line(status);
        self.push_line(result)
    }

    pub fn respond_ok(&self, data: &[&str]) -> &Self {
        self.respond(data, STATUS_CONNECTED, "ok")
    }

    pub fn respond_error(&self, message: &str) -> &Self {
        self.respond(&[message], STATUS_CONNECTED, "error")
    }

    /// Queue one `ascii` answer per row, as a full-screen read issues them
    pub fn respond_screen<S: AsRef<str>>(&self, rows: &[S]) -> &Self {
        for row in rows {
            self.respond_ok(&[row.as_ref()]);
        }
        self
    }

    /// Every following write fails with an I/O error of `kind`
    pub fn fail_writes_with(&self, kind: io::ErrorKind) -> &Self {
        self.lock().write_error = Some(kind);
        self
    }

    /// Written lines, newline removed
    pub fn written(&self) -> Vec<String> {
        self.lock()
            .written
            .iter()
            .map(|line| String::from_utf8_lossy(line).trim_end_matches('\n').to_string())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.lock().written.len()
    }

    pub fn close_count(&self) -> usize {
        self.lock().closes
    }

    /// Hosts passed to `connect`, in call order
    pub fn connects(&self) -> Vec<String> {
        self.lock().connects.clone()
    }

    /// Lines still queued
    pub fn pending(&self) -> usize {
        self.lock().lines.len()
    }

    pub fn boxed(&self) -> Box<dyn Transport> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self, host: &str) -> Result<bool, TransportError> {
        let mut state = self.lock();
        state.connects.push(host.to_string());
        state.detached = false;
        Ok(state.self_connecting)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut state = self.lock();
        if state.detached {
            return Err(TransportError::NotConnected);
        }
        if let Some(kind) = state.write_error {
            return Err(TransportError::Io(io::Error::from(kind)));
        }
        state.written.push(data.to_vec());
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut state = self.lock();
        if state.detached {
            return Err(TransportError::NotConnected);
        }
        Ok(state.lines.pop_front().unwrap_or_default())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.lock().closes += 1;
        Ok(())
    }
}

/// Launcher that records every command and hands out queued transports.
///
/// When the queue is empty a fresh [`ScriptedTransport`] is created, so a
/// test only needs to queue the transports it wants to script.
#[derive(Clone, Default)]
pub struct ScriptedLauncher {
    transports: Arc<Mutex<VecDeque<ScriptedTransport>>>,
    launched: Arc<Mutex<Vec<AppCommand>>>,
    issued: Arc<Mutex<Vec<ScriptedTransport>>>,
}

impl ScriptedLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, transport: ScriptedTransport) -> &Self {
        self.transports
            .lock()
            .expect("launcher queue poisoned")
            .push_back(transport);
        self
    }

    /// Commands passed to `launch`, in call order
    pub fn launched(&self) -> Vec<AppCommand> {
        self.launched.lock().expect("launch log poisoned").clone()
    }

    /// Handles to every transport given out so far
    pub fn issued(&self) -> Vec<ScriptedTransport> {
        self.issued.lock().expect("issue log poisoned").clone()
    }
}

impl Launcher for ScriptedLauncher {
    fn launch(
        &self,
        app: AppCommand,
        _retry: RetryPolicy,
    ) -> Result<Box<dyn Transport>, TransportError> {
        self.launched.lock().expect("launch log poisoned").push(app);
        let transport = self
            .transports
            .lock()
            .expect("launcher queue poisoned")
            .pop_front()
            .unwrap_or_default();
        self.issued
            .lock()
            .expect("issue log poisoned")
            .push(transport.clone());
        Ok(transport.boxed())
    }
}
