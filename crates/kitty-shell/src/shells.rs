use std::path::{Path, PathBuf};

use log::debug;

use crate::command::CommandRunner;
use crate::error::SetupError;
use crate::setup::EnvMap;

#[cfg(windows)]
const PATH_LIST_SEP: &str = ";";
#[cfg(not(windows))]
const PATH_LIST_SEP: &str = ":";

const ZSH_RC_FILES: [&str; 4] = [".zshrc", ".zshenv", ".zprofile", ".zlogin"];

/// The shells that ship bundled integration scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }
}

/// Whether `name` is a shell this crate can set up. No side effects.
#[must_use]
pub fn is_supported_shell(name: &str) -> bool {
    Shell::from_name(name).is_some()
}

/// Bash wiring happens through rcfile flags assembled by the launcher, so
/// there is nothing to do here.
pub(crate) fn bash_setup(
    _integration_dir: &Path,
    argv: Vec<String>,
    env: EnvMap,
) -> Result<(Vec<String>, EnvMap), SetupError> {
    Ok((argv, env))
}

/// With ZDOTDIR empty zsh reads rc files from the effective home; if none
/// exist it runs zsh-newuser-install, which bails when rc files show up in
/// $HOME. Fresh means: none of the four standard rc filenames present.
fn is_new_zsh_install(env: &EnvMap, zdotdir: &str) -> bool {
    let dir = if zdotdir.is_empty() {
        match env.get("HOME").filter(|home| !home.is_empty()) {
            Some(home) => PathBuf::from(home),
            None => match dirs::home_dir() {
                Some(home) => home,
                None => return true,
            },
        }
    } else {
        PathBuf::from(zdotdir)
    };
    !ZSH_RC_FILES.iter().any(|rc| dir.join(rc).exists())
}

/// Ask zsh itself what the global zshenv sets ZDOTDIR to, with rc loading
/// suppressed. Best effort: any spawn failure or non-zero exit is treated
/// as "no global zdotdir".
fn zdotdir_from_global_zshenv(runner: &dyn CommandRunner, argv: &[String], env: &EnvMap) -> String {
    let Some(exe) = argv.first() else {
        return String::new();
    };
    let exe = which::which(exe).unwrap_or_else(|_| PathBuf::from(exe));
    match runner.capture_stdout(
        &exe,
        &["--norcs", "--interactive", "-c", "echo -n $ZDOTDIR"],
        env,
    ) {
        Ok(output) => output,
        Err(err) => {
            debug!("zsh zdotdir probe failed: {err}");
            String::new()
        }
    }
}

/// Point zsh at the integration directory via ZDOTDIR, stashing the user's
/// original value in `KITTY_ORIG_ZDOTDIR` so the wrapper rc files can
/// chain-load their real configuration.
pub(crate) fn zsh_setup(
    integration_dir: &Path,
    runner: &dyn CommandRunner,
    argv: Vec<String>,
    mut env: EnvMap,
) -> Result<(Vec<String>, EnvMap), SetupError> {
    let mut zdotdir = env.get("ZDOTDIR").cloned().unwrap_or_default();
    if is_new_zsh_install(&env, &zdotdir) {
        if zdotdir.is_empty() {
            // All startup files are absent; the global zshenv may still
            // relocate ZDOTDIR somewhere populated.
            zdotdir = zdotdir_from_global_zshenv(runner, &argv, &env);
            if zdotdir.is_empty() || is_new_zsh_install(&env, &zdotdir) {
                return Ok((argv, env));
            }
        } else {
            // Dont prevent zsh-newuser-install from running.
            // zsh-newuser-install never runs as root but we assume that it does.
            return Ok((argv, env));
        }
    }
    if zdotdir.is_empty() {
        // KITTY_ORIG_ZDOTDIR can be left over from a previous launch when,
        // for example, the global zshenv overrides ZDOTDIR; drop it so the
        // wrapper rc files fall back to $HOME.
        env.remove("KITTY_ORIG_ZDOTDIR");
    } else {
        env.insert("KITTY_ORIG_ZDOTDIR".to_string(), zdotdir);
    }
    env.insert(
        "ZDOTDIR".to_string(),
        integration_dir.to_string_lossy().into_owned(),
    );
    Ok((argv, env))
}

/// Prepend the integration data directory onto fish's XDG_DATA_DIRS search
/// path for this process only. The directory handed in is the per-shell
/// subdir; fish wants its parent, the data-dir root.
pub(crate) fn fish_setup(
    integration_dir: &Path,
    argv: Vec<String>,
    mut env: EnvMap,
) -> Result<(Vec<String>, EnvMap), SetupError> {
    let data_dir = integration_dir
        .parent()
        .unwrap_or(integration_dir)
        .to_string_lossy()
        .into_owned();
    env.insert("KITTY_FISH_XDG_DATA_DIR".to_string(), data_dir.clone());
    let joined = match env.get("XDG_DATA_DIRS").filter(|val| !val.is_empty()) {
        None => data_dir,
        Some(val) => {
            let mut segments: Vec<&str> = vec![&data_dir];
            segments.extend(val.split(PATH_LIST_SEP).filter(|seg| !seg.is_empty()));
            segments.join(PATH_LIST_SEP)
        }
    };
    env.insert("XDG_DATA_DIRS".to_string(), joined);
    Ok((argv, env))
}
