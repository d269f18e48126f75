//! x3270 session files
//!
//! A session file holds `resource: value` lines such as
//! `wc3270.hostname: myhost.com`. Only the hostname is required; a `model`
//! resource, when present, picks the screen size.

use crate::{args, KeywordError};
use mf3270_transport::ExecutableVariant;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
    content: String,
}

impl SessionFile {
    /// Load and validate a session file for `variant`.
    ///
    /// The extension must name the emulator in use and the file must set the
    /// hostname resource.
    pub fn load(path: &Path, variant: ExecutableVariant) -> Result<Self, KeywordError> {
        check_extension(path, variant)?;
        let content = fs::read_to_string(path).map_err(|source| KeywordError::File {
            path: path.to_path_buf(),
            source,
        })?;
        if !content.contains("hostname:") {
            return Err(KeywordError::SessionFile(
                "Your session file needs to specify the hostname resource to set up the connection. \
                 An example for wc3270 looks like this: \nwc3270.hostname: myhost.com\n"
                    .to_string(),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Model resource value, if the file sets one
    pub fn model(&self) -> Option<String> {
        args::model_from_text(&self.content)
    }
}

fn check_extension(path: &Path, variant: ExecutableVariant) -> Result<(), KeywordError> {
    let name = path.to_string_lossy();
    let extension = name.rsplit('.').next().unwrap_or_default();
    let expected = variant.session_file_extension();
    if extension != expected {
        return Err(KeywordError::SessionFile(format!(
            "Based on the emulator that you are using, the session file extension has to be \
             \".{expected}\", but it was \".{extension}\""
        )));
    }
    Ok(())
}
