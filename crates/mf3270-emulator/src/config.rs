//! Per-session emulator settings

use mf3270_transport::{RetryPolicy, DEFAULT_MODEL};
use std::time::Duration;

/// Everything an [`Emulator`](crate::Emulator) needs before it spawns.
///
/// `model` is validated when the emulator is created, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Run the windowed emulator instead of the headless one
    pub visible: bool,
    /// Passed to `Wait(..., InputField)`
    pub timeout: Duration,
    /// Caller-supplied command line options
    pub extra_args: Vec<String>,
    pub model: String,
    /// Script-port connect policy (wc3270 only)
    pub connect_retry: RetryPolicy,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            visible: false,
            timeout: Duration::from_secs(30),
            extra_args: Vec::new(),
            model: DEFAULT_MODEL.to_string(),
            connect_retry: RetryPolicy::default(),
        }
    }
}

impl EmulatorConfig {
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_connect_retry(mut self, retry: RetryPolicy) -> Self {
        self.connect_retry = retry;
        self
    }
}
