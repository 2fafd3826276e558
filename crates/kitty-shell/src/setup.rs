use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::assets::AssetStore;
use crate::command::{CommandRunner, SystemCommandRunner};
use crate::error::SetupError;
use crate::extract::extract_shell_integration_for;
use crate::shells::{Shell, bash_setup, fish_setup, zsh_setup};

/// Process environment as handed to a shell being launched.
pub type EnvMap = HashMap<String, String>;

const INSTALLATION_DIR_VAR: &str = "KITTY_INSTALLATION_DIR";
const EXTRACTED_SUBDIR: &str = "extracted-ksi";

/// Entry point for wiring shell integration into a shell launch.
///
/// Holds the collaborators the strategies need: the bundled asset store,
/// the cache root to extract into, and the subprocess capability used by
/// the zsh zdotdir probe.
pub struct ShellIntegration<'a> {
    store: &'a dyn AssetStore,
    runner: Box<dyn CommandRunner>,
    cache_root: PathBuf,
}

impl<'a> ShellIntegration<'a> {
    pub fn new(store: &'a dyn AssetStore, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            runner: Box::new(SystemCommandRunner),
            cache_root: cache_root.into(),
        }
    }

    /// Like [`ShellIntegration::new`] with the cache root taken from the
    /// platform cache directory.
    pub fn from_platform(store: &'a dyn AssetStore) -> Result<Self, SetupError> {
        let paths = kitty_platform::AppPaths::new()?;
        Ok(Self::new(store, paths.cache_dir))
    }

    /// Replace the subprocess capability, for tests.
    #[must_use]
    pub fn with_runner(mut self, runner: Box<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Locate a directory holding `shell`'s integration files, preferring
    /// an installed copy named by `KITTY_INSTALLATION_DIR` in `env` and
    /// falling back to extraction into the cache.
    ///
    /// The installed case returns the per-shell subdirectory; the extracted
    /// case returns the shell-integration root, whose wrapper rc files know
    /// their own layout.
    pub fn ensure_integration_files_for(
        &self,
        shell: Shell,
        env: &EnvMap,
    ) -> Result<PathBuf, SetupError> {
        if let Some(installed) = env.get(INSTALLATION_DIR_VAR).filter(|dir| !dir.is_empty()) {
            let root = Path::new(installed);
            if root.is_dir() {
                let candidate = root.join("shell-integration").join(shell.name());
                if candidate.is_dir() {
                    debug!("using installed shell integration at {}", candidate.display());
                    return Ok(candidate);
                }
            }
        }
        let base = self.cache_root.join(EXTRACTED_SUBDIR);
        fs::create_dir_all(&base)?;
        extract_shell_integration_for(self.store, shell, &base)?;
        Ok(base.join("shell-integration"))
    }

    /// Configure `argv` and `env` so that `shell_name` sources the bundled
    /// integration scripts on startup, and stamp `KITTY_SHELL_INTEGRATION`
    /// with `ksi_var` so those scripts can see how they were launched.
    ///
    /// The caller's argv and env are never mutated; fresh copies come back.
    pub fn setup(
        &self,
        shell_name: &str,
        ksi_var: &str,
        argv: &[String],
        env: &EnvMap,
    ) -> Result<(Vec<String>, EnvMap), SetupError> {
        let shell = Shell::from_name(shell_name)
            .ok_or_else(|| SetupError::UnsupportedShell(shell_name.to_string()))?;
        let integration_dir = self.ensure_integration_files_for(shell, env)?;
        let argv = argv.to_vec();
        let env = env.clone();
        let (argv, mut env) = match shell {
            Shell::Bash => bash_setup(&integration_dir, argv, env)?,
            Shell::Zsh => zsh_setup(&integration_dir, self.runner.as_ref(), argv, env)?,
            Shell::Fish => fish_setup(&integration_dir, argv, env)?,
        };
        env.insert("KITTY_SHELL_INTEGRATION".to_string(), ksi_var.to_string());
        Ok((argv, env))
    }
}
