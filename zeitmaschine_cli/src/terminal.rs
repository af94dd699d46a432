//! Terminal detection

use is_terminal::IsTerminal;
use std::env;
use std::io::stdout;

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    if !stdout().is_terminal() {
        return false;
    }

    // CI runners may allocate a TTY but nobody is reading it
    if is_ci_environment() {
        return false;
    }

    true
}

/// Check if running in a CI environment
pub fn is_ci_environment() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE", "JENKINS_URL"]
        .iter()
        .any(|var| env::var_os(var).is_some())
}
