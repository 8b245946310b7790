/* 📖 # PAL conformance tests

The same scenarios run against MockPal and a RealPal rooted in a temporary
directory. Code written against the Pal trait must not be able to tell the two
apart for the operations corebox uses.
*/

#[cfg(test)]
mod pal_conformance_tests {
    use std::io::Write;

    use tempfile::TempDir;

    use crate::pal::{FilePath, MockPal, PalHandle, RealPal};

    fn with_each_pal(test: impl Fn(&PalHandle)) {
        test(&PalHandle::new(MockPal::new()));

        let temp_dir = TempDir::new().expect("failed to create temp dir");
        test(&PalHandle::new(RealPal::new(temp_dir.path().to_path_buf())));
    }

    fn write(pal: &PalHandle, path: &str, content: &str) {
        let mut writer = pal.create_file(&FilePath::from(path), 0o644).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_write_then_read() {
        with_each_pal(|pal| {
            write(pal, "note.txt", "hello");
            assert_eq!(
                pal.read_file_to_string(&FilePath::from("note.txt")).unwrap(),
                "hello"
            );
        });
    }

    #[test]
    fn test_overwrite_truncates() {
        with_each_pal(|pal| {
            write(pal, "note.txt", "a much longer text");
            write(pal, "note.txt", "short");
            assert_eq!(
                pal.read_file_to_string(&FilePath::from("note.txt")).unwrap(),
                "short"
            );
        });
    }

    #[test]
    fn test_existence_covers_files_and_directories() {
        with_each_pal(|pal| {
            pal.create_directory_all(&FilePath::from("dir"), 0o755).unwrap();
            write(pal, "dir/file.txt", "");

            assert!(pal.file_exists(&FilePath::from("dir")).unwrap());
            assert!(pal.file_exists(&FilePath::from("dir/file.txt")).unwrap());
            assert!(!pal.file_exists(&FilePath::from("dir/other.txt")).unwrap());
        });
    }

    #[test]
    fn test_missing_targets_are_not_found() {
        with_each_pal(|pal| {
            let missing = FilePath::from("missing");
            assert!(pal.read_file(&missing).err().unwrap().is_not_found());
            assert!(pal.read_directory(&missing).unwrap_err().is_not_found());
            assert!(pal.is_directory(&missing).unwrap_err().is_not_found());
        });
    }

    #[test]
    fn test_write_into_missing_directory_is_file_error() {
        with_each_pal(|pal| {
            let err = pal
                .create_file(&FilePath::from("missing/file.txt"), 0o644)
                .err()
                .unwrap();
            assert!(matches!(err.kind(), crate::ErrorKind::FileError { .. }));
        });
    }

    #[test]
    fn test_listing_returns_joined_paths() {
        with_each_pal(|pal| {
            pal.create_directory_all(&FilePath::from("dir/sub_dir"), 0o755)
                .unwrap();
            write(pal, "dir/file1.txt", "file1 content");

            let mut entries = pal.read_directory(&FilePath::from("dir")).unwrap();
            entries.sort();
            assert_eq!(
                entries,
                vec![
                    FilePath::from("dir/file1.txt"),
                    FilePath::from("dir/sub_dir")
                ]
            );
            assert!(pal.is_directory(&entries[1]).unwrap());
            assert!(!pal.is_directory(&entries[0]).unwrap());
        });
    }

    #[test]
    fn test_listing_normalizes_the_directory_path() {
        with_each_pal(|pal| {
            pal.create_directory_all(&FilePath::from("dir/sub_dir"), 0o755)
                .unwrap();
            write(pal, "dir/file1.txt", "");

            let mut entries = pal
                .read_directory(&FilePath::from("dir/sub_dir/../"))
                .unwrap();
            entries.sort();
            assert_eq!(
                entries,
                vec![
                    FilePath::from("dir/file1.txt"),
                    FilePath::from("dir/sub_dir")
                ]
            );
        });
    }

    #[test]
    fn test_directory_through_file_fails() {
        with_each_pal(|pal| {
            write(pal, "blocker", "");
            assert!(
                pal.create_directory_all(&FilePath::from("blocker/sub"), 0o755)
                    .is_err()
            );
        });
    }
}
