//! Emulator executables and their command lines

use std::process::Stdio;
use tokio::process::Command;

/// Model resource used when neither the caller nor the extra arguments pick one
pub const DEFAULT_MODEL: &str = "2";

/// The four x3270 front ends, chosen by platform and visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutableVariant {
    /// Windows, visible window, driven over a loopback script port
    Wc3270,
    /// Windows, headless, driven over pipes
    Ws3270,
    /// Unix, visible window, driven over pipes with `-script`
    X3270,
    /// Unix, headless, driven over pipes
    S3270,
}

impl ExecutableVariant {
    /// Pick the variant for the platform this binary was built for
    pub fn select(visible: bool) -> Self {
        Self::for_platform(cfg!(windows), visible)
    }

    pub fn for_platform(windows: bool, visible: bool) -> Self {
        match (windows, visible) {
            (true, true) => Self::Wc3270,
            (true, false) => Self::Ws3270,
            (false, true) => Self::X3270,
            (false, false) => Self::S3270,
        }
    }

    /// Executable name looked up on `PATH`
    pub fn executable(self) -> &'static str {
        match self {
            Self::Wc3270 => "wc3270",
            Self::Ws3270 => "ws3270",
            Self::X3270 => "x3270",
            Self::S3270 => "s3270",
        }
    }

    /// Only wc3270 has no usable stdin/stdout and needs `-scriptport`
    pub fn uses_script_port(self) -> bool {
        matches!(self, Self::Wc3270)
    }

    /// Session files must carry the executable name as their extension
    pub fn session_file_extension(self) -> &'static str {
        self.executable()
    }

    /// Arguments every spawn starts with.
    ///
    /// `unlockDelay` makes the emulator sleep 350ms after each AID key for
    /// hosts that unlocked the keyboard too early; it is always switched off.
    pub fn base_args(self) -> Vec<String> {
        let mut args = vec![
            "-xrm".to_string(),
            format!("{}.unlockDelay: False", self.executable()),
        ];
        if self == Self::X3270 {
            args.push("-script".to_string());
        }
        args
    }
}

/// Build the full argument list: base arguments, caller arguments, then the
/// model resource so it is always the last pair on the command line.
pub fn build_args(variant: ExecutableVariant, extra_args: &[String], model: &str) -> Vec<String> {
    let mut args = variant.base_args();
    args.extend(extra_args.iter().cloned());
    args.push("-xrm".to_string());
    args.push(format!("*model: {model}"));
    args
}

/// A ready-to-spawn emulator command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCommand {
    variant: ExecutableVariant,
    args: Vec<String>,
}

impl AppCommand {
    pub fn new(variant: ExecutableVariant, extra_args: &[String], model: &str) -> Self {
        Self {
            variant,
            args: build_args(variant, extra_args, model),
        }
    }

    pub fn variant(&self) -> ExecutableVariant {
        self.variant
    }

    pub fn program(&self) -> &'static str {
        self.variant.executable()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments for the script-port launch: the usual list followed by the
    /// port flag and the connect target.
    pub fn script_port_args(&self, port: u16, host: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("-scriptport".to_string());
        args.push(port.to_string());
        args.push(host.to_string());
        args
    }

    /// Command for the pipe-driven variants
    pub(crate) fn to_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(&self.args);
        piped(&mut command);
        command
    }

    /// Command for the script-port variant.
    ///
    /// wc3270 opens its own console window, so it is started through
    /// `cmd /C start /wait` exactly as a user would from a shell.
    pub(crate) fn to_script_port_command(&self, port: u16, host: &str) -> Command {
        let mut command = Command::new("cmd");
        command
            .args(["/C", "start", "/wait", self.program()])
            .args(self.script_port_args(port, host));
        piped(&mut command);
        command
    }
}

fn piped(command: &mut Command) {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
}
