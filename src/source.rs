//! Retrieval of the token document.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Where the token document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    File(PathBuf),
    /// A repository cloned into a temporary directory for the duration of
    /// the load; `path` is the document inside it.
    Git {
        url: String,
        branch: Option<String>,
        path: PathBuf,
    },
}

impl TokenSource {
    pub fn load(&self) -> Result<serde_json::Value> {
        match self {
            TokenSource::File(path) => read_json(path),
            TokenSource::Git { url, branch, path } => {
                let checkout = tempfile::Builder::new()
                    .prefix("design-tokens-")
                    .tempdir()
                    .map_err(Error::io(std::env::temp_dir()))?;
                clone(url, branch.as_deref(), checkout.path())?;
                let document = read_json(&checkout.path().join(path));
                debug!(checkout = %checkout.path().display(), "removing checkout");
                document
            }
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::File(path) => write!(f, "{}", path.display()),
            TokenSource::Git { url, branch, path } => {
                write!(f, "{url}")?;
                if let Some(branch) = branch {
                    write!(f, "#{branch}")?;
                }
                write!(f, ":{}", path.display())
            }
        }
    }
}

/// `git clone` of `url` into `into`. The `--` keeps a url starting with `-`
/// from being read as an option.
fn clone_command(url: &str, branch: Option<&str>, into: &Path) -> Command {
    let mut git = Command::new("git");
    git.args(["clone", "--quiet", "--depth", "1"]);
    if let Some(branch) = branch {
        git.args(["--branch", branch]);
    }
    git.arg("--").arg(url).arg(into);
    git
}

fn clone(url: &str, branch: Option<&str>, into: &Path) -> Result<()> {
    info!(url, branch, "cloning token repository");
    let output = clone_command(url, branch, into)
        .output()
        .map_err(Error::GitSpawn)?;
    if !output.status.success() {
        return Err(Error::Git {
            url: url.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Reads and parses a JSON document. Malformed JSON is reported here; the
/// converter only ever sees parsed values.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let data = fs::read_to_string(path).map_err(Error::io(path))?;
    serde_json::from_str(&data).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display() {
        let source = TokenSource::Git {
            url: "git@example.com:t.git".to_string(),
            branch: Some("dev".to_string()),
            path: PathBuf::from("tokens.json"),
        };
        assert_eq!(source.to_string(), "git@example.com:t.git#dev:tokens.json");
        assert_eq!(
            TokenSource::File(PathBuf::from("a/tokens.json")).to_string(),
            "a/tokens.json"
        );
    }

    #[test]
    fn clone_arguments() {
        let git = clone_command("--upload-pack=x", Some("main"), Path::new("/tmp/out"));
        let args: Vec<_> = git.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "clone",
                "--quiet",
                "--depth",
                "1",
                "--branch",
                "main",
                "--",
                "--upload-pack=x",
                "/tmp/out",
            ]
        );
        assert_eq!(git.get_program(), "git");
    }

    #[test]
    fn reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, r#"{ "Color": {} }"#).unwrap();
        let value = TokenSource::File(path).load().unwrap();
        assert_eq!(value, serde_json::json!({ "Color": {} }));
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_json(&missing), Err(Error::Io { path, .. }) if path == missing));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ nope").unwrap();
        assert!(matches!(read_json(&broken), Err(Error::Json { .. })));
    }
}
