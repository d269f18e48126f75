//! Extra emulator arguments and the resources scanned out of them

use crate::KeywordError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static MODEL_RESOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[wcxs3270.*]+model:\s*([327892345E-]+)").expect("model resource pattern")
});

static PORT_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[wcxs3270.*-]+port[:]{0,1}").expect("port option pattern"));

/// Command line options added to the emulator invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraArgs {
    List(Vec<String>),
    /// Argument file: one or more options per line, `#` starts a comment line
    File(PathBuf),
}

impl ExtraArgs {
    /// Flatten into the argument list handed to the emulator
    pub fn process(&self) -> Result<Vec<String>, KeywordError> {
        match self {
            ExtraArgs::List(args) => Ok(args.clone()),
            ExtraArgs::File(path) => read_arg_file(path),
        }
    }
}

impl From<Vec<String>> for ExtraArgs {
    fn from(args: Vec<String>) -> Self {
        ExtraArgs::List(args)
    }
}

impl From<PathBuf> for ExtraArgs {
    fn from(path: PathBuf) -> Self {
        ExtraArgs::File(path)
    }
}

fn read_arg_file(path: &Path) -> Result<Vec<String>, KeywordError> {
    let content = fs::read_to_string(path).map_err(|source| KeywordError::File {
        path: path.to_path_buf(),
        source,
    })?;
    parse_arg_lines(&content)
}

/// Shell-split every non-comment line, keeping file order
pub fn parse_arg_lines(content: &str) -> Result<Vec<String>, KeywordError> {
    let mut args = Vec::new();
    for line in content.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let split = shlex::split(line).ok_or_else(|| KeywordError::ArgumentSyntax(line.to_string()))?;
        args.extend(split);
    }
    Ok(args)
}

/// Model set through a `model:` resource among `args`; the last one wins
pub fn model_from_args(args: &[String]) -> Option<String> {
    args.iter().filter_map(|arg| model_from_text(arg)).last()
}

/// Last `model:` resource value in free text, such as a session file
pub fn model_from_text(text: &str) -> Option<String> {
    MODEL_RESOURCE
        .captures_iter(text)
        .last()
        .map(|captures| captures[1].to_string())
}

/// Whether `args` already choose a port, through `-port` or a `port:` resource
pub fn port_in_args(args: &[String]) -> bool {
    args.iter().any(|arg| PORT_OPTION.is_match(arg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arg_lines() {
        let content = "\
# example argfile
-xrm \"wc3270.acceptHostname: myhost.com\"
   # indented comment
-charset french
-port 992
";
        assert_eq!(
            parse_arg_lines(content).unwrap(),
            strings(&[
                "-xrm",
                "wc3270.acceptHostname: myhost.com",
                "-charset",
                "french",
                "-port",
                "992"
            ])
        );
    }

    #[test]
    fn test_arg_lines_single_quotes_and_blank_lines() {
        let content = "-accepthostname 'my host.com'\n\n-trace\n";
        assert_eq!(
            parse_arg_lines(content).unwrap(),
            strings(&["-accepthostname", "my host.com", "-trace"])
        );
    }

    #[test]
    fn test_arg_lines_unbalanced_quote() {
        assert!(matches!(
            parse_arg_lines("-xrm \"unterminated"),
            Err(KeywordError::ArgumentSyntax(_))
        ));
    }

    #[test_case(&["-xrm", "*model: 4"], Some("4"))]
    #[test_case(&["-xrm", "wc3270.model: 3279-5-E"], Some("3279-5-E"))]
    #[test_case(&["-xrm", "s3270.model:3278-3"], Some("3278-3"))]
    #[test_case(&["-xrm", "*model: 4", "-xrm", "*model: 5"], Some("5"))]
    #[test_case(&["-charset", "french"], None)]
    #[test_case(&[], None)]
    fn test_model_from_args(args: &[&str], expected: Option<&str>) {
        assert_eq!(model_from_args(&strings(args)).as_deref(), expected);
    }

    #[test]
    fn test_model_from_text_last_wins() {
        let text = "wc3270.hostname: myhost.com\nwc3270.model: 2\nwc3270.model: 3279-4-E\n";
        assert_eq!(model_from_text(text).as_deref(), Some("3279-4-E"));
    }

    #[test_case(&["-port", "992"], true)]
    #[test_case(&["-xrm", "wc3270.port: 992"], true)]
    #[test_case(&["-xrm", "*port:992"], true)]
    #[test_case(&["-charset", "french"], false)]
    #[test_case(&[], false)]
    fn test_port_in_args(args: &[&str], expected: bool) {
        assert_eq!(port_in_args(&strings(args)), expected);
    }
}
