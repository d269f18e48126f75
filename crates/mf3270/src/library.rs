//! The keyword library instance

use crate::{ConnectionCache, KeywordError, LibraryConfig};
use mf3270_emulator::Emulator;
use mf3270_transport::{Launcher, ProcessLauncher};
use std::time::Duration;

/// Keyword library state: settings, open connections and the launcher used
/// to start new emulators.
///
/// Keywords are grouped by concern in [`crate::keywords`]; all of them act
/// on the current connection.
pub struct Mainframe3270 {
    pub(crate) config: LibraryConfig,
    pub(crate) launcher: Box<dyn Launcher>,
    pub(crate) cache: ConnectionCache<Emulator>,
}

impl Mainframe3270 {
    pub fn new(config: LibraryConfig) -> Self {
        Self::with_launcher(config, ProcessLauncher)
    }

    pub fn with_launcher(config: LibraryConfig, launcher: impl Launcher + 'static) -> Self {
        Self {
            config,
            launcher: Box::new(launcher),
            cache: ConnectionCache::new(),
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn cache(&self) -> &ConnectionCache<Emulator> {
        &self.cache
    }

    /// The current connection
    pub fn mf(&mut self) -> Result<&mut Emulator, KeywordError> {
        self.cache.current_mut()
    }

    pub(crate) async fn pause(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

impl Default for Mainframe3270 {
    fn default() -> Self {
        Self::new(LibraryConfig::default())
    }
}
