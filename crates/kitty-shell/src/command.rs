use std::io;
use std::path::Path;
use std::process::Command;

use crate::setup::EnvMap;

/// Capability to run an executable and capture its stdout, kept behind a
/// trait so the zsh zdotdir probe can be faked in tests.
pub trait CommandRunner {
    /// Run `exe` with `args` and exactly the given environment, blocking
    /// until it exits, and return its stdout as text. A non-zero exit
    /// status is an error.
    fn capture_stdout(&self, exe: &Path, args: &[&str], env: &EnvMap) -> io::Result<String>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn capture_stdout(&self, exe: &Path, args: &[&str], env: &EnvMap) -> io::Result<String> {
        let output = Command::new(exe).args(args).env_clear().envs(env).output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}",
                exe.display(),
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandRunner, SystemCommandRunner};
    use crate::setup::EnvMap;
    use std::path::Path;

    #[test]
    #[cfg(unix)]
    fn capture_stdout_returns_command_output() {
        let runner = SystemCommandRunner;
        let out = runner
            .capture_stdout(Path::new("/bin/sh"), &["-c", "printf hello"], &EnvMap::new())
            .expect("sh should run");
        assert_eq!(out, "hello");
    }

    #[test]
    #[cfg(unix)]
    fn capture_stdout_rejects_nonzero_exit() {
        let runner = SystemCommandRunner;
        let result =
            runner.capture_stdout(Path::new("/bin/sh"), &["-c", "exit 3"], &EnvMap::new());
        assert!(result.is_err());
    }
}
