use relative_path::{RelativePath, RelativePathBuf};
use std::path::Path;

/* 📖 # Why use RelativePathBuf for FilePath?

Every path handed to the PAL is interpreted relative to the PAL root: the base
directory of a RealPal, or the empty root of a MockPal. RelativePathBuf keeps
`/` as the separator on every platform, so paths built in tests and paths
returned from directory listings compare equal everywhere.
*/

/// Path of a file or directory relative to the PAL root.
///
/// # Examples
///
/// ```
/// use corebox_base::FilePath;
///
/// let dir = FilePath::from("data");
/// assert_eq!(dir.join("notes.txt"), FilePath::from("data/notes.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    /// Returns the underlying RelativePath.
    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Converts to a regular Path, without any base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_str())
    }

    /// Appends a child segment.
    pub fn join(&self, child: impl AsRef<str>) -> FilePath {
        Self(self.0.join(child.as_ref()))
    }

    /// Resolves `.` and `..` segments and drops redundant separators.
    pub fn normalized(&self) -> FilePath {
        Self(self.0.normalize())
    }

    /// Parent of the normalized path, `None` for the root.
    pub fn parent(&self) -> Option<FilePath> {
        let normalized = self.0.normalize();
        normalized
            .parent()
            .map(|parent| Self(parent.to_relative_path_buf()))
    }

    /// Final segment of the path, if there is one.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name()
    }

    /// True when the path designates the PAL root itself.
    pub fn is_root(&self) -> bool {
        self.0.normalize().as_str().is_empty()
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<RelativePathBuf> for FilePath {
    fn from(p: RelativePathBuf) -> Self {
        Self(p)
    }
}

impl From<&RelativePath> for FilePath {
    fn from(p: &RelativePath) -> Self {
        Self(p.to_relative_path_buf())
    }
}

impl From<&Path> for FilePath {
    fn from(p: &Path) -> Self {
        Self(RelativePathBuf::from(p.to_string_lossy().replace('\\', "/")))
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<RelativePath> for FilePath {
    fn as_ref(&self) -> &RelativePath {
        &self.0
    }
}

impl AsRef<str> for FilePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
