//! Canonical project directories
//!
//! Everything hangs off one root so binaries and tests agree on where
//! raw downloads, intermediate tables, final datasets and figures live.

use std::path::{Path, PathBuf};

/// Directory layout rooted at a project checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at this crate's manifest directory
    pub fn from_manifest() -> Self {
        Self::new(env!("CARGO_MANIFEST_DIR"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `data/`
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// `data/raw/`: downloads, never edited in place
    pub fn raw_data_dir(&self) -> PathBuf {
        self.data_dir().join("raw")
    }

    /// `data/interim/`: cleaned or merged, not final
    pub fn interim_data_dir(&self) -> PathBuf {
        self.data_dir().join("interim")
    }

    /// `data/processed/`: final datasets for plots and comparisons
    pub fn processed_data_dir(&self) -> PathBuf {
        self.data_dir().join("processed")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    /// `reports/figures/` for final figures, `figures/` for scratch
    pub fn figures_dir(&self, final_output: bool) -> PathBuf {
        if final_output {
            self.reports_dir().join("figures")
        } else {
            self.root.join("figures")
        }
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::from_manifest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = ProjectPaths::new("/tmp/project");
        assert_eq!(paths.data_dir(), PathBuf::from("/tmp/project/data"));
        assert_eq!(paths.raw_data_dir(), PathBuf::from("/tmp/project/data/raw"));
        assert_eq!(
            paths.interim_data_dir(),
            PathBuf::from("/tmp/project/data/interim")
        );
        assert_eq!(
            paths.processed_data_dir(),
            PathBuf::from("/tmp/project/data/processed")
        );
        assert_eq!(paths.reports_dir(), PathBuf::from("/tmp/project/reports"));
        assert_eq!(
            paths.figures_dir(true),
            PathBuf::from("/tmp/project/reports/figures")
        );
        assert_eq!(paths.figures_dir(false), PathBuf::from("/tmp/project/figures"));
    }

    #[test]
    fn test_manifest_root_has_cargo_toml() {
        let paths = ProjectPaths::from_manifest();
        assert!(paths.root().join("Cargo.toml").exists());
    }
}
