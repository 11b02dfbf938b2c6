//! Run configuration (design-tokens.toml)
//!
//! ```toml
//! strict = true
//!
//! [source]
//! repo = "https://github.com/acme/design-tokens.git"
//! branch = "main"
//! path = "tokens/tokens.json"
//!
//! [output]
//! dir = "src/styles/tokens"
//! clean = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    source::TokenSource,
};

pub const DEFAULT_CONFIG: &str = "design-tokens.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Fail instead of warning when a `var()` has no declaration.
    #[serde(default)]
    pub strict: bool,
}

/// Where the token document comes from. `file` wins over `repo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    /// Document path inside the repository
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("tokens.json")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            file: None,
            repo: None,
            branch: None,
            path: default_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Remove the output directory before writing
    #[serde(default)]
    pub clean: bool,
}

fn default_dir() -> PathBuf {
    PathBuf::from("styles")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            clean: false,
        }
    }
}

/// Values given on the command line; any that are set replace the file's.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub file: Option<PathBuf>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub path: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub clean: bool,
    pub strict: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(Error::io(path))?;
        toml::from_str(&data).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, else `design-tokens.toml` in the working
    /// directory if there is one, else the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG).is_file() => Self::load(Path::new(DEFAULT_CONFIG)),
            None => Ok(Self::default()),
        }
    }

    pub fn apply(&mut self, overrides: Overrides) {
        // One source on the command line replaces both of the file's.
        if let Some(file) = overrides.file {
            self.source.file = Some(file);
            self.source.repo = None;
        }
        if let Some(repo) = overrides.repo {
            self.source.repo = Some(repo);
            self.source.file = None;
        }
        if let Some(branch) = overrides.branch {
            self.source.branch = Some(branch);
        }
        if let Some(path) = overrides.path {
            self.source.path = path;
        }
        if let Some(out) = overrides.out {
            self.output.dir = out;
        }
        self.output.clean |= overrides.clean;
        self.strict |= overrides.strict;
    }

    pub fn token_source(&self) -> Result<TokenSource> {
        match (&self.source.file, &self.source.repo) {
            (Some(file), _) => Ok(TokenSource::File(file.clone())),
            (None, Some(url)) => Ok(TokenSource::Git {
                url: url.clone(),
                branch: self.source.branch.clone(),
                path: self.source.path.clone(),
            }),
            (None, None) => Err(Error::NoSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.source.path, PathBuf::from("tokens.json"));
        assert_eq!(config.output.dir, PathBuf::from("styles"));
        assert!(!config.strict);
        assert!(matches!(config.token_source(), Err(Error::NoSource)));
    }

    #[test]
    fn parses_full_file() {
        let config: Config = toml::from_str(
            r#"
            strict = true

            [source]
            repo = "https://example.com/tokens.git"
            branch = "main"
            path = "design/tokens.json"

            [output]
            dir = "out"
            clean = true
            "#,
        )
        .unwrap();
        assert!(config.strict);
        assert!(config.output.clean);
        assert_eq!(
            config.token_source().unwrap(),
            TokenSource::Git {
                url: "https://example.com/tokens.git".to_string(),
                branch: Some("main".to_string()),
                path: PathBuf::from("design/tokens.json"),
            }
        );
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config: Config =
            toml::from_str("[source]\nrepo = \"https://example.com/t.git\"\n").unwrap();
        config.apply(Overrides {
            file: Some(PathBuf::from("local.json")),
            out: Some(PathBuf::from("dist")),
            strict: true,
            ..Overrides::default()
        });
        assert_eq!(
            config.token_source().unwrap(),
            TokenSource::File(PathBuf::from("local.json"))
        );
        assert_eq!(config.output.dir, PathBuf::from("dist"));
        assert!(config.strict);
        assert!(!config.output.clean);
    }
}
