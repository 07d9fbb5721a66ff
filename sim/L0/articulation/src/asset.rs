//! Asset file locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root directory that robot asset paths are resolved against.
///
/// Descriptions never embed absolute paths: the root is supplied by whoever
/// builds the configuration (usually the deployment), and every asset path is
/// a join of this root and a relative path.
///
/// # Example
///
/// ```
/// use sim_articulation::AssetRoot;
///
/// let root = AssetRoot::new("/opt/assets");
/// assert_eq!(root.join("go2_x5a/go2_x5a.urdf"), "/opt/assets/go2_x5a/go2_x5a.urdf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRoot(PathBuf);

impl AssetRoot {
    /// Create an asset root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    /// The root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Join a relative asset path onto the root.
    ///
    /// A leading `/` on `relative` is stripped so the result always stays
    /// under the root.
    #[must_use]
    pub fn join(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        self.0.join(relative).to_string_lossy().into_owned()
    }

    /// Check whether `path` lies under this root.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        Path::new(path).starts_with(&self.0)
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        Self::new("assets")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_join_relative() {
        let root = AssetRoot::new("/data/robots");
        let path = root.join("go2_d1_description/urdf/go2_d1/go2_d1_v1.usd");
        assert_eq!(
            path,
            "/data/robots/go2_d1_description/urdf/go2_d1/go2_d1_v1.usd"
        );
        assert!(root.contains(&path));
    }

    #[test]
    fn test_join_never_escapes_root() {
        let root = AssetRoot::new("/data/robots");
        let path = root.join("/home/someone/go2_d1.usd");
        assert_eq!(path, "/data/robots/home/someone/go2_d1.usd");
        assert!(root.contains(&path));
    }

    #[test]
    fn test_default_root_is_relative() {
        let root = AssetRoot::default();
        assert!(root.path().is_relative());
        assert_eq!(root.join("go2_d1.usd"), "assets/go2_d1.usd");
    }
}
