use crate::result_mode::prepare_positions;
use crate::text::unicode_escape;
use crate::{KeywordError, Mainframe3270, PositionValue, ResultMode};
use mf3270_emulator::Position;

impl Mainframe3270 {
    /// Read `length` characters at `(row, col)`
    pub async fn read(&mut self, row: u16, col: u16, length: usize) -> Result<String, KeywordError> {
        Ok(self.mf()?.string_get(row, col, length).await?)
    }

    pub async fn read_from_current_position(&mut self, length: usize) -> Result<String, KeywordError> {
        let mf = self.mf()?;
        let position = mf.get_current_position().await?;
        Ok(mf.string_get(position.row, position.col, length).await?)
    }

    pub async fn read_all_screen(&mut self) -> Result<String, KeywordError> {
        Ok(self.mf()?.read_all_screen().await?)
    }

    /// Every position of `text` on the screen, shaped by `mode`
    pub async fn get_string_positions(
        &mut self,
        text: &str,
        mode: ResultMode,
        ignore_case: bool,
    ) -> Result<Vec<PositionValue>, KeywordError> {
        let positions = self.mf()?.get_string_positions(text, ignore_case).await?;
        Ok(prepare_positions(positions, mode))
    }

    /// Positions of `text` strictly after `(row, col)` in reading order
    pub async fn get_string_positions_only_after(
        &mut self,
        row: u16,
        col: u16,
        text: &str,
        mode: ResultMode,
        ignore_case: bool,
    ) -> Result<Vec<PositionValue>, KeywordError> {
        let reference = Position::new(row, col);
        let positions = self.filtered_positions(reference, text, ignore_case).await?;
        let after = positions.into_iter().filter(|p| *p > reference).collect();
        Ok(prepare_positions(after, mode))
    }

    /// Positions of `text` strictly before `(row, col)` in reading order
    pub async fn get_string_positions_only_before(
        &mut self,
        row: u16,
        col: u16,
        text: &str,
        mode: ResultMode,
        ignore_case: bool,
    ) -> Result<Vec<PositionValue>, KeywordError> {
        let reference = Position::new(row, col);
        let positions = self.filtered_positions(reference, text, ignore_case).await?;
        let before = positions.into_iter().filter(|p| *p < reference).collect();
        Ok(prepare_positions(before, mode))
    }

    async fn filtered_positions(
        &mut self,
        reference: Position,
        text: &str,
        ignore_case: bool,
    ) -> Result<Vec<Position>, KeywordError> {
        let mf = self.mf()?;
        mf.check_limits(reference.row, reference.col)?;
        Ok(mf.get_string_positions(text, ignore_case).await?)
    }

    /// Type `text` at the cursor and press Enter
    pub async fn write(&mut self, text: &str) -> Result<(), KeywordError> {
        self.write_text(text, None, true).await
    }

    /// Type `text` at the cursor without pressing Enter
    pub async fn write_bare(&mut self, text: &str) -> Result<(), KeywordError> {
        self.write_text(text, None, false).await
    }

    pub async fn write_in_position(&mut self, text: &str, row: u16, col: u16) -> Result<(), KeywordError> {
        self.write_text(text, Some(Position::new(row, col)), true).await
    }

    pub async fn write_bare_in_position(
        &mut self,
        text: &str,
        row: u16,
        col: u16,
    ) -> Result<(), KeywordError> {
        self.write_text(text, Some(Position::new(row, col)), false).await
    }

    /// Type `text` unescaped, for hosts that accept non-ASCII input, then press Enter
    pub async fn write_unicode(&mut self, text: &str) -> Result<(), KeywordError> {
        self.write_unicode_text(text).await?;
        self.mf()?.send_enter().await?;
        Ok(())
    }

    pub async fn write_unicode_bare(&mut self, text: &str) -> Result<(), KeywordError> {
        self.write_unicode_text(text).await
    }

    async fn write_unicode_text(&mut self, text: &str) -> Result<(), KeywordError> {
        self.mf()?.exec_command(format!("String(\"{text}\")")).await?;
        Self::pause(self.config.wait_time_after_write).await;
        Ok(())
    }

    async fn write_text(
        &mut self,
        text: &str,
        position: Option<Position>,
        enter: bool,
    ) -> Result<(), KeywordError> {
        let escaped = unicode_escape(text);
        self.mf()?.send_string(&escaped, position).await?;
        Self::pause(self.config.wait_time_after_write).await;
        if enter {
            self.mf()?.send_enter().await?;
            Self::pause(self.config.wait_time).await;
        }
        Ok(())
    }
}
