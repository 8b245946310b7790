use std::path::is_separator;

/// Returns the final segment of `full_path`.
///
/// Unless `keep_extension` is set, the extension of that segment (the text from
/// its last `.` on) is stripped. A leading dot does not start an extension, so
/// `.bashrc` is returned unchanged. Trailing separators are ignored.
///
/// ```
/// use corebox_fs::base_name;
///
/// assert_eq!(base_name("/a/b/file.ext", false), "file");
/// assert_eq!(base_name("/a/b/file.ext", true), "file.ext");
/// assert_eq!(base_name("/a/b", false), "b");
/// ```
pub fn base_name(full_path: impl AsRef<str>, keep_extension: bool) -> String {
    let segment = full_path
        .as_ref()
        .trim_end_matches(is_separator)
        .rsplit(is_separator)
        .next()
        .unwrap_or_default();
    if keep_extension || segment == ".." {
        return segment.to_string();
    }
    match segment.rfind('.') {
        Some(dot) if dot > 0 => segment[..dot].to_string(),
        _ => segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corebox_base::FilePath;

    #[test]
    fn test_strips_extension() {
        assert_eq!(base_name("/dir1/dir2/file.ext", false), "file");
    }

    #[test]
    fn test_keeps_extension() {
        assert_eq!(base_name("/dir1/dir2/file.ext", true), "file.ext");
    }

    #[test]
    fn test_directory_path() {
        assert_eq!(base_name("/dir1/dir2", false), "dir2");
        assert_eq!(base_name("/dir1/dir2/", false), "dir2");
    }

    #[test]
    fn test_only_last_extension_is_stripped() {
        assert_eq!(base_name("archive.tar.gz", false), "archive.tar");
    }

    #[test]
    fn test_dot_files() {
        assert_eq!(base_name("/home/.bashrc", false), ".bashrc");
        assert_eq!(base_name("/home/.config.toml", false), ".config");
        assert_eq!(base_name("/home/..", false), "..");
    }

    #[test]
    fn test_trailing_dot() {
        assert_eq!(base_name("file.", false), "file");
        assert_eq!(base_name("file.", true), "file.");
    }

    #[test]
    fn test_empty_and_root() {
        assert_eq!(base_name("", false), "");
        assert_eq!(base_name("/", false), "");
    }

    #[test]
    fn test_accepts_file_path() {
        assert_eq!(base_name(FilePath::from("data/notes.md"), false), "notes");
    }
}
