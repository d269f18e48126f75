use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestFixtures {
    temp_dir: TempDir,
}

impl TestFixtures {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn create_test_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn create_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.temp_dir.path().join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

// Common status lines and screens
pub mod data {
    pub const STATUS_CONNECTED: &str = "U F U C(pub400.com) I 2 24 80 0 0 0x0 0.000";

    pub const STATUS_MODEL_4: &str = "U U U C(pub400.com) C 4 43 80 4 24 0x0 0.000";

    pub const STATUS_LOCKED: &str = "L F P C(pub400.com) I 2 24 80 0 0 0x0 0.000";

    pub const STATUS_NOT_CONNECTED: &str = "U U U N N 2 24 80 0 0 0x0 -";

    /// `rows` lines of `columns` spaces
    pub fn blank_screen(rows: usize, columns: usize) -> Vec<String> {
        vec![" ".repeat(columns); rows]
    }

    /// Blank screen with `text` written at the 1-based `(row, col)`.
    ///
    /// Text runs on into the next row like it does on a 3270 screen.
    pub fn screen_with(rows: usize, columns: usize, writes: &[(usize, usize, &str)]) -> Vec<String> {
        let mut cells = vec![' '; rows * columns];
        for (row, col, text) in writes {
            let start = (row - 1) * columns + (col - 1);
            for (offset, ch) in text.chars().enumerate() {
                if let Some(cell) = cells.get_mut(start + offset) {
                    *cell = ch;
                }
            }
        }
        cells
            .chunks(columns)
            .map(|row| row.iter().collect())
            .collect()
    }
}
