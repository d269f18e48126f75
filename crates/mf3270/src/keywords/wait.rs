use crate::config::format_duration;
use crate::{KeywordError, Mainframe3270};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// How long `wait_until_string` polls when no timeout is given
pub const DEFAULT_WAIT_UNTIL_TIMEOUT: Duration = Duration::from_secs(5);

impl Mainframe3270 {
    /// Emulator `Wait` timeout for connections opened from now on
    pub fn change_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    /// Pause after keywords that send an AID key
    pub fn change_wait_time(&mut self, wait_time: Duration) {
        self.config.wait_time = wait_time;
    }

    /// Pause after every write
    pub fn change_wait_time_after_write(&mut self, wait_time_after_write: Duration) {
        self.config.wait_time_after_write = wait_time_after_write;
    }

    /// Wait for the host to put the cursor on an input field with the
    /// keyboard unlocked
    pub async fn wait_field_detected(&mut self) -> Result<(), KeywordError> {
        self.mf()?.wait_for_field().await?;
        Ok(())
    }

    /// Poll the screen until a row contains `text` or `timeout` elapses
    pub async fn wait_until_string(
        &mut self,
        text: &str,
        timeout: Duration,
    ) -> Result<String, KeywordError> {
        let deadline = Instant::now() + timeout;
        let mut polls = 0u32;
        while Instant::now() < deadline {
            polls += 1;
            if self.mf()?.search_string(text, false).await? {
                debug!("Found \"{}\" after {} polls", text, polls);
                return Ok(text.to_string());
            }
        }
        Err(KeywordError::Assertion(format!(
            "String \"{text}\" not found in {}",
            format_duration(timeout)
        )))
    }
}
