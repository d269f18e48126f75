//! The session facade
//!
//! An [`Emulator`] owns one emulator process and its transport. Operations
//! take `&mut self`, so actions on a session never overlap.

use crate::{EmulatorConfig, EmulatorError, Geometry, Model, Position};
use mf3270_protocol::{Action, Command, Response, Status};
use mf3270_transport::{AppCommand, ExecutableVariant, Launcher, ProcessLauncher, Transport};
use regex::RegexBuilder;
use std::time::Duration;
use tracing::{debug, info};

pub struct Emulator {
    variant: ExecutableVariant,
    model: Model,
    geometry: Geometry,
    timeout: Duration,
    transport: Box<dyn Transport>,
    status: Status,
    last_host: Option<String>,
    terminated: bool,
}

impl Emulator {
    /// Spawn the emulator executable matching the platform and `config.visible`
    pub fn new(config: EmulatorConfig) -> Result<Self, EmulatorError> {
        Self::with_launcher(config, &ProcessLauncher)
    }

    /// Start a session through `launcher`.
    ///
    /// The model is validated before anything is launched.
    pub fn with_launcher(
        config: EmulatorConfig,
        launcher: &dyn Launcher,
    ) -> Result<Self, EmulatorError> {
        let model: Model = config.model.parse()?;
        let variant = ExecutableVariant::select(config.visible);
        let app = AppCommand::new(variant, &config.extra_args, model.id());
        info!("Starting {} with model {}", app.program(), model);

        let transport = launcher.launch(app, config.connect_retry)?;
        Ok(Self::from_parts(variant, model, config.timeout, transport))
    }

    /// Drive an already open transport
    pub fn with_transport(
        config: EmulatorConfig,
        transport: Box<dyn Transport>,
    ) -> Result<Self, EmulatorError> {
        let model: Model = config.model.parse()?;
        let variant = ExecutableVariant::select(config.visible);
        Ok(Self::from_parts(variant, model, config.timeout, transport))
    }

    fn from_parts(
        variant: ExecutableVariant,
        model: Model,
        timeout: Duration,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            variant,
            model,
            geometry: model.geometry(),
            timeout,
            transport,
            status: Status::default(),
            last_host: None,
            terminated: false,
        }
    }

    pub fn variant(&self) -> ExecutableVariant {
        self.variant
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Status from the most recent exchange
    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn last_host(&self) -> Option<&str> {
        self.last_host.as_deref()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn ensure_live(&self) -> Result<(), EmulatorError> {
        if self.terminated {
            return Err(EmulatorError::Terminated);
        }
        Ok(())
    }

    /// Send `action` verbatim and return the emulator's response.
    ///
    /// The status is updated whenever a status line arrived, including when
    /// the emulator answered `error`.
    pub async fn exec_command(
        &mut self,
        action: impl Into<Action>,
    ) -> Result<Response, EmulatorError> {
        self.ensure_live()?;

        let mut command = Command::new(action);
        let outcome = command.execute(self.transport.as_mut()).await;
        if let Some(line) = command.status_line() {
            self.status = Status::parse(line);
        }
        let completion = outcome?;
        debug!("{} completed: {:?}", command.action(), completion);
        Ok(command.into_response(completion))
    }

    /// Connect to `host`.
    ///
    /// The script-port transport spawns its emulator with the host already
    /// on the command line; pipe transports are sent a `Connect` action.
    /// Calling this twice on a script-port session spawns a second process.
    pub async fn connect(&mut self, host: &str) -> Result<(), EmulatorError> {
        self.ensure_live()?;

        if !self.transport.connect(host).await? {
            self.exec_command(Action::connect(host)).await?;
        }
        info!("Connected to {}", host);
        self.last_host = Some(host.to_string());
        Ok(())
    }

    /// Disconnect and connect again to the last host
    pub async fn reconnect(&mut self) -> Result<(), EmulatorError> {
        self.ensure_live()?;
        let host = self.last_host.clone().ok_or(EmulatorError::NoHost)?;

        self.exec_command(Action::disconnect()).await?;
        self.connect(&host).await
    }

    /// Whether the emulator is network-connected to a host.
    ///
    /// A transport that was never established counts as not connected.
    pub async fn is_connected(&mut self) -> Result<bool, EmulatorError> {
        match self.exec_command(Action::ignore()).await {
            Ok(_) => Ok(self.status.is_connected()),
            Err(e) if e.is_not_connected() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Wait until the cursor sits on an input field and the keyboard is unlocked
    pub async fn wait_for_field(&mut self) -> Result<(), EmulatorError> {
        self.exec_command(Action::wait_input_field(self.timeout)).await?;
        if !self.status.keyboard_unlocked() {
            let state = self.status.keyboard.clone().unwrap_or_default();
            return Err(EmulatorError::KeyboardState(state));
        }
        Ok(())
    }

    pub fn check_limits(&self, row: u16, col: u16) -> Result<(), EmulatorError> {
        self.geometry.check_limits(row, col)
    }

    pub async fn move_to(&mut self, row: u16, col: u16) -> Result<(), EmulatorError> {
        self.ensure_live()?;
        self.geometry.check_limits(row, col)?;
        self.exec_command(Action::move_cursor(row - 1, col - 1)).await?;
        Ok(())
    }

    /// Type `text` at `position`, or at the cursor when none is given
    pub async fn send_string(
        &mut self,
        text: &str,
        position: Option<Position>,
    ) -> Result<(), EmulatorError> {
        if let Some(Position { row, col }) = position {
            self.move_to(row, col).await?;
        }
        self.exec_command(Action::string(text)).await?;
        Ok(())
    }

    pub async fn send_enter(&mut self) -> Result<(), EmulatorError> {
        self.exec_command(Action::enter()).await?;
        Ok(())
    }

    /// Read `length` characters starting at `(row, col)`
    pub async fn string_get(
        &mut self,
        row: u16,
        col: u16,
        length: usize,
    ) -> Result<String, EmulatorError> {
        self.ensure_live()?;
        self.geometry.check_read(row, col, length)?;

        let response = self
            .exec_command(Action::ascii(row - 1, col - 1, length))
            .await?;
        match response.data.as_slice() {
            [line] => Ok(String::from_utf8_lossy(line).into_owned()),
            lines => Err(EmulatorError::UnexpectedData(format!(
                "expected one line of screen data, got {}",
                lines.len()
            ))),
        }
    }

    /// Whether `text` appears on any single row of the screen.
    ///
    /// Rows are searched one at a time, so text wrapping from one row into
    /// the next is not found.
    pub async fn search_string(
        &mut self,
        text: &str,
        ignore_case: bool,
    ) -> Result<bool, EmulatorError> {
        let needle = if ignore_case {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        for row in 1..=self.geometry.rows {
            let mut line = self.string_get(row, 1, self.geometry.columns as usize).await?;
            if ignore_case {
                line = line.to_lowercase();
            }
            if line.contains(&needle) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every position where `text` starts, top to bottom.
    ///
    /// The screen is searched as one string, so matches may wrap across rows.
    pub async fn get_string_positions(
        &mut self,
        text: &str,
        ignore_case: bool,
    ) -> Result<Vec<Position>, EmulatorError> {
        let screen = self.read_all_screen().await?;
        let geometry = self.geometry;
        let pattern = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(ignore_case)
            .build()?;

        let positions = pattern
            .find_iter(&screen)
            .map(|found| {
                let offset = screen[..found.start()].chars().count();
                geometry.position_of(offset + 1)
            })
            .collect();
        Ok(positions)
    }

    /// The whole screen as one string, rows back to back
    pub async fn read_all_screen(&mut self) -> Result<String, EmulatorError> {
        let columns = self.geometry.columns as usize;
        let mut screen = String::with_capacity(self.geometry.cells());
        for row in 1..=self.geometry.rows {
            screen.push_str(&self.string_get(row, 1, columns).await?);
        }
        Ok(screen)
    }

    /// Clear the field under the cursor and move to its start
    pub async fn delete_field(&mut self) -> Result<(), EmulatorError> {
        self.exec_command(Action::delete_field()).await?;
        Ok(())
    }

    /// Delete the character under the cursor
    pub async fn delete_char(&mut self) -> Result<(), EmulatorError> {
        self.exec_command(Action::delete()).await?;
        Ok(())
    }

    /// Replace the contents of the field at `position` with `text`.
    ///
    /// Fails without touching the screen if `text` is longer than `length`.
    pub async fn fill_field(
        &mut self,
        position: Option<Position>,
        text: &str,
        length: usize,
    ) -> Result<(), EmulatorError> {
        if text.chars().count() > length {
            return Err(EmulatorError::FieldTruncated {
                length,
                text: text.to_string(),
            });
        }
        if let Some(Position { row, col }) = position {
            self.move_to(row, col).await?;
        }
        self.delete_field().await?;
        self.send_string(text, None).await
    }

    pub async fn get_current_position(&mut self) -> Result<Position, EmulatorError> {
        let response = self.exec_command(Action::query_cursor()).await?;
        let line = match response.data.as_slice() {
            [line] => String::from_utf8_lossy(line).into_owned(),
            other => {
                return Err(EmulatorError::UnexpectedData(format!(
                    "Cursor position returned an unexpected value: \"{:?}\"",
                    other
                )))
            }
        };
        parse_cursor(&line).ok_or_else(|| {
            EmulatorError::UnexpectedData(format!(
                "Cursor position returned an unexpected value: \"{line}\""
            ))
        })
    }

    /// Have the emulator write the current screen to `path` as HTML
    pub async fn save_screen(&mut self, path: &str) -> Result<(), EmulatorError> {
        self.exec_command(Action::print_text_html(path)).await?;
        Ok(())
    }

    /// Quit the emulator and release the transport.
    ///
    /// Safe to call repeatedly; only the first call does anything. An
    /// emulator that already closed its end, or was never reached, is not
    /// an error.
    pub async fn terminate(&mut self) -> Result<(), EmulatorError> {
        if self.terminated {
            return Ok(());
        }

        match self.exec_command(Action::quit()).await {
            Ok(_) => {}
            Err(e) if e.is_disconnect() || e.is_not_connected() => {
                debug!("Emulator already gone on quit: {}", e);
            }
            Err(e) => return Err(e),
        }

        self.transport.close().await?;
        self.terminated = true;
        info!("Emulator terminated");
        Ok(())
    }
}

/// `"<row> <col>"`, 0-based, into a 1-based position
fn parse_cursor(line: &str) -> Option<Position> {
    let mut parts = line.split_whitespace();
    let row: u16 = parts.next()?.parse().ok()?;
    let col: u16 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(row + 1, col + 1))
}
