use crate::{KeywordError, Mainframe3270};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

impl Mainframe3270 {
    /// Store future screenshots in `path`, relative to the output folder.
    ///
    /// The folder must already exist; otherwise the current folder is kept.
    pub fn set_screenshot_folder(&mut self, path: &Path) {
        if self.config.output_folder.join(path).exists() {
            self.config.img_folder = path.to_path_buf();
        } else {
            error!("Given screenshots path \"{}\" does not exist", path.display());
            warn!(
                "Screenshots will be saved in \"{}\"",
                self.config.img_folder.display()
            );
        }
    }

    /// Save the screen as `<img_folder>/<prefix>_<unix millis>.html` under the
    /// output folder. Returns the path relative to the output folder.
    pub async fn take_screenshot(&mut self, filename_prefix: &str) -> Result<PathBuf, KeywordError> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let filepath = self
            .config
            .img_folder
            .join(format!("{filename_prefix}_{millis}.html"));
        let target = self.config.output_folder.join(&filepath);

        self.mf()?.save_screen(&target.to_string_lossy()).await?;
        info!("Screenshot saved to {}", target.display());
        Ok(filepath)
    }
}
