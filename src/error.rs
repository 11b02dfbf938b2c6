use std::{path::PathBuf, process::ExitStatus};

use design_tokens_scss_core::TokenError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not run git: {0}")]
    GitSpawn(#[source] std::io::Error),
    #[error("git clone of {url} failed ({status}): {stderr}")]
    Git {
        url: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error(transparent)]
    Tokens(#[from] TokenError),
    #[error("{} undeclared variable(s) referenced: {}", .0.len(), .0.join(", "))]
    DanglingReferences(Vec<String>),
    #[error("no token source configured; pass --file or --repo")]
    NoSource,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
