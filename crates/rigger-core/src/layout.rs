//! Workspace layout
//!
//! Every path rigger reads or writes lives at a fixed location relative to the
//! workspace root (the directory the operator runs in by default).

use std::path::{Path, PathBuf};

/// State file, relative to the workspace root
pub const STATE_FILE: &str = ".rigger/state.json";

/// Where resolved charts are staged before rendering
pub const CHART_PATH: &str = ".rigger/tmp/chart";

/// Directory of the generated values file
pub const HELM_VALUES_PATH: &str = ".rigger/tmp/values";

/// Rendered helm output, used as the overlay base
pub const RENDERED_HELM_PATH: &str = "base";

/// Overlay directory operators add their patches to
pub const OVERLAY_PATH: &str = "overlays/rigger";

/// Final output of the overlay build
pub const OUTPUT_FILE: &str = "rendered.yaml";

/// Resolved paths of one workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_file(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.root.join(CHART_PATH)
    }

    pub fn helm_values_dir(&self) -> PathBuf {
        self.root.join(HELM_VALUES_PATH)
    }

    /// The generated values file passed to every helm render
    pub fn helm_values_file(&self) -> PathBuf {
        self.helm_values_dir().join("values.yaml")
    }

    pub fn rendered_helm_path(&self) -> PathBuf {
        self.root.join(RENDERED_HELM_PATH)
    }

    pub fn overlay_path(&self) -> PathBuf {
        self.root.join(OVERLAY_PATH)
    }

    pub fn output_file(&self) -> PathBuf {
        self.root.join(OUTPUT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = WorkspaceLayout::new("/work");
        assert_eq!(layout.state_file(), PathBuf::from("/work/.rigger/state.json"));
        assert_eq!(layout.chart_path(), PathBuf::from("/work/.rigger/tmp/chart"));
        assert_eq!(
            layout.helm_values_file(),
            PathBuf::from("/work/.rigger/tmp/values/values.yaml")
        );
        assert_eq!(layout.rendered_helm_path(), PathBuf::from("/work/base"));
        assert_eq!(layout.overlay_path(), PathBuf::from("/work/overlays/rigger"));
        assert_eq!(layout.output_file(), PathBuf::from("/work/rendered.yaml"));
    }
}
