#![allow(clippy::missing_errors_doc)]

//! Shell startup integration for kitty.
//!
//! Materializes the bundled per-shell integration scripts into a cache
//! directory and rewrites a shell's argv/environment so that bash, zsh or
//! fish sources them on startup without touching the user's own rc files.

mod assets;
mod command;
mod error;
mod extract;
mod setup;
mod shells;

pub use assets::{AssetEntry, AssetKind, AssetStore, MemoryAssetStore};
pub use command::{CommandRunner, SystemCommandRunner};
pub use error::SetupError;
pub use extract::extract_shell_integration_for;
pub use setup::{EnvMap, ShellIntegration};
pub use shells::{Shell, is_supported_shell};
