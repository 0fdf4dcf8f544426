use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed; unresolvable code is not a failure
/// - `Error` (2): Command failed (config error, missing entry, unreadable tsconfig)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
