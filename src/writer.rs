use std::{
    fs,
    path::{Path, PathBuf},
};

use design_tokens_scss_core::Stylesheets;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Destination for generated documents. Paths are relative and use `/`.
pub trait OutputWriter {
    fn write(&mut self, path: &str, content: &str) -> Result<()>;
}

/// Writes documents below a root directory, creating it (and, with `clean`,
/// emptying it) before the first write.
#[derive(Debug)]
pub struct FsWriter {
    root: PathBuf,
    clean: bool,
    prepared: bool,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>, clean: bool) -> Self {
        Self {
            root: root.into(),
            clean,
            prepared: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn prepare(&mut self) -> Result<()> {
        if self.prepared {
            return Ok(());
        }
        if self.clean && self.root.exists() {
            info!(dir = %self.root.display(), "cleaning output directory");
            fs::remove_dir_all(&self.root).map_err(Error::io(&self.root))?;
        }
        fs::create_dir_all(&self.root).map_err(Error::io(&self.root))?;
        self.prepared = true;
        Ok(())
    }
}

impl OutputWriter for FsWriter {
    fn write(&mut self, path: &str, content: &str) -> Result<()> {
        self.prepare()?;
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(Error::io(parent))?;
        }
        debug!(path = %target.display(), bytes = content.len(), "writing");
        fs::write(&target, content).map_err(Error::io(&target))
    }
}

/// Keeps documents in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub files: IndexMap<String, String>,
}

impl OutputWriter for MemoryWriter {
    fn write(&mut self, path: &str, content: &str) -> Result<()> {
        self.files.insert(path.to_string(), content.to_string());
        Ok(())
    }
}

/// Writes every document in order and returns the paths written.
pub fn write_stylesheets(writer: &mut dyn OutputWriter, sheets: &Stylesheets) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(sheets.len());
    for (path, content) in sheets.iter() {
        writer.write(path, content)?;
        written.push(path.to_string());
    }
    Ok(written)
}
