use thiserror::Error;

use super::store::StoreError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("registry error: {0}")]
    Registry(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for a failure that escaped `main`.
    pub fn exit_code(&self) -> i32 {
        // 11: config / registry (refuse to start)
        // 20: server bind / io
        // 30: client command failed
        // 50: internal/uncategorized
        match self {
            Self::Config(_) | Self::Registry(_) => 11,
            Self::Server(_) | Self::Io(_) => 20,
            Self::Command(_) => 30,
            Self::Store(_) | Self::Anyhow(_) => 50,
        }
    }
}
