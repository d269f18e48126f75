use crate::{KeywordError, Mainframe3270, PositionValue, ResultMode};
use mf3270_emulator::Position;
use mf3270_protocol::Action;

impl Mainframe3270 {
    /// Send a raw emulator action, e.g. `Enter`, `Clear` or `PF(3)`
    pub async fn execute_command(&mut self, command: &str) -> Result<(), KeywordError> {
        self.mf()?.exec_command(command).await?;
        Self::pause(self.config.wait_time).await;
        Ok(())
    }

    /// Delete the character under the cursor, moving to `position` first if given
    pub async fn delete_char(&mut self, position: Option<Position>) -> Result<(), KeywordError> {
        let mf = self.mf()?;
        if let Some(Position { row, col }) = position {
            mf.move_to(row, col).await?;
        }
        mf.delete_char().await?;
        Ok(())
    }

    /// Clear a field, moving to `position` first if given
    pub async fn delete_field(&mut self, position: Option<Position>) -> Result<(), KeywordError> {
        let mf = self.mf()?;
        if let Some(Position { row, col }) = position {
            mf.move_to(row, col).await?;
        }
        mf.delete_field().await?;
        Ok(())
    }

    pub async fn send_enter(&mut self) -> Result<(), KeywordError> {
        self.mf()?.send_enter().await?;
        Self::pause(self.config.wait_time).await;
        Ok(())
    }

    pub async fn move_next_field(&mut self) -> Result<(), KeywordError> {
        self.mf()?.exec_command(Action::tab()).await?;
        Ok(())
    }

    pub async fn move_previous_field(&mut self) -> Result<(), KeywordError> {
        self.mf()?.exec_command(Action::back_tab()).await?;
        Ok(())
    }

    /// Press program function key `pf`
    pub async fn send_pf(&mut self, pf: &str) -> Result<(), KeywordError> {
        self.mf()?.exec_command(Action::pf(pf)).await?;
        Self::pause(self.config.wait_time).await;
        Ok(())
    }

    pub async fn get_current_position(&mut self, mode: ResultMode) -> Result<PositionValue, KeywordError> {
        let position = self.mf()?.get_current_position().await?;
        Ok(PositionValue::new(position, mode))
    }

    pub async fn move_cursor_to(&mut self, row: u16, col: u16) -> Result<(), KeywordError> {
        self.mf()?.move_to(row, col).await?;
        Ok(())
    }
}
