use crate::{args, ExtraArgs, KeywordError, Mainframe3270, SessionFile};
use mf3270_emulator::Emulator;
use mf3270_transport::ExecutableVariant;
use std::path::Path;
use tracing::{info, warn};

/// Telnet port used when neither the caller nor the extra arguments pick one
pub const DEFAULT_PORT: u16 = 23;

/// Optional parts of `open_connection`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Logical unit, sent as `LU@host`
    pub lu: Option<String>,
    pub port: u16,
    pub extra_args: Option<ExtraArgs>,
    pub alias: Option<String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            lu: None,
            port: DEFAULT_PORT,
            extra_args: None,
            alias: None,
        }
    }
}

impl ConnectionOptions {
    pub fn with_lu(mut self, lu: impl Into<String>) -> Self {
        self.lu = Some(lu.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_extra_args(mut self, extra_args: impl Into<ExtraArgs>) -> Self {
        self.extra_args = Some(extra_args.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl Mainframe3270 {
    /// Start an emulator, connect it to `host` and make it the current
    /// connection. Returns the connection's index.
    ///
    /// A port chosen in the extra arguments (`-port` or a `port` resource)
    /// takes precedence over `options.port`.
    pub async fn open_connection(
        &mut self,
        host: &str,
        options: ConnectionOptions,
    ) -> Result<usize, KeywordError> {
        let extra_args = match &options.extra_args {
            Some(extra_args) => extra_args.process()?,
            None => Vec::new(),
        };
        let model = args::model_from_args(&extra_args).unwrap_or_else(|| self.config.model.clone());
        let port_in_args = args::port_in_args(&extra_args);

        let config = self.config.emulator_config(extra_args, model);
        let mut emulator = Emulator::with_launcher(config, self.launcher.as_ref())?;

        let host_string = match &options.lu {
            Some(lu) => format!("{lu}@{host}"),
            None => host.to_string(),
        };
        if port_in_args {
            if options.port != DEFAULT_PORT {
                warn!(
                    "The connection port has been specified both in the `port` argument and in `extra_args`. \
                     The port specified in `extra_args` will take precedence over the `port` argument. \
                     To avoid this warning, you can either remove the port command-line option from `extra_args`, \
                     or leave the `port` argument at its default value of {}.",
                    DEFAULT_PORT
                );
            }
            emulator.connect(&host_string).await?;
        } else {
            emulator.connect(&format!("{host_string}:{}", options.port)).await?;
        }

        let index = self.cache.register(emulator, options.alias.as_deref());
        info!("Opened connection {} to {}", index, host);
        Ok(index)
    }

    /// Open a connection described by an x3270 session file.
    ///
    /// The file extension must match the emulator in use and the file must
    /// set the hostname resource.
    pub async fn open_connection_from_session_file(
        &mut self,
        session_file: &Path,
        alias: Option<&str>,
    ) -> Result<usize, KeywordError> {
        let variant = ExecutableVariant::select(self.config.visible);
        let session = SessionFile::load(session_file, variant)?;
        let model = session.model().unwrap_or_else(|| self.config.model.clone());
        let target = session.path().to_string_lossy().into_owned();

        let emulator = if variant.uses_script_port() {
            let config = self.config.emulator_config(Vec::new(), model);
            let mut emulator = Emulator::with_launcher(config, self.launcher.as_ref())?;
            emulator.connect(&target).await?;
            emulator
        } else {
            let config = self.config.emulator_config(vec![target], model);
            Emulator::with_launcher(config, self.launcher.as_ref())?
        };

        let index = self.cache.register(emulator, alias);
        info!(
            "Opened connection {} from session file {}",
            index,
            session_file.display()
        );
        Ok(index)
    }

    /// Make the connection with this alias or index current
    pub fn switch_connection(&mut self, alias_or_index: &str) -> Result<(), KeywordError> {
        self.cache.switch(alias_or_index)?;
        Ok(())
    }

    /// Terminate the current connection
    pub async fn close_connection(&mut self) -> Result<(), KeywordError> {
        self.mf()?.terminate().await?;
        Ok(())
    }

    /// Terminate every connection and restart indexing at 1.
    ///
    /// All connections are closed even if one fails; the first failure is
    /// returned.
    pub async fn close_all_connections(&mut self) -> Result<(), KeywordError> {
        let mut first_error = None;
        for mut emulator in self.cache.take_all() {
            if let Err(e) = emulator.terminate().await {
                warn!("Failed to close connection: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
