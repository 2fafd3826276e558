use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Unsupported shell: {0}")]
    UnsupportedShell(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Paths(#[from] kitty_platform::AppPathsError),
}
