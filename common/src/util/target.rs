use crate::db::writer::bookshelf::MANIFEST_EXTENSIONS;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub basename: String,
}

impl OutputTarget {
    pub fn new(dir: impl Into<PathBuf>, basename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            basename: basename.into(),
        }
    }

    // <base_dir>/<basename>/<basename>.<ext>
    pub fn in_base_dir(base_dir: impl AsRef<Path>, basename: &str) -> Self {
        Self::new(base_dir.as_ref().join(basename), basename)
    }

    pub fn file_name(&self, ext: &str) -> String {
        format!("{}.{}", self.basename, ext)
    }

    pub fn path(&self, ext: &str) -> PathBuf {
        self.dir.join(self.file_name(ext))
    }

    pub fn nodes_path(&self) -> PathBuf {
        self.path("nodes")
    }

    pub fn nets_path(&self) -> PathBuf {
        self.path("nets")
    }

    pub fn aux_path(&self) -> PathBuf {
        self.path("aux")
    }

    /// File names the aux manifest refers to, whether or not they exist.
    pub fn manifest_entries(&self) -> Vec<String> {
        MANIFEST_EXTENSIONS
            .iter()
            .map(|ext| self.file_name(ext))
            .collect()
    }

    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if !self.dir.as_os_str().is_empty() && !self.dir.exists() {
            log::info!("Creating output directory: {:?}", self.dir);
            std::fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}
