/* 📖 # Helpers against the real filesystem

The unit tests next to each helper use MockPal. These run the same helpers
through a RealPal rooted in a temporary directory laid out like this:

```text
tmp/test.txt        "test content"
tmp/work_dir/
tmp/dir/sub_dir/
tmp/dir/file1.txt   "file1 content"
tmp/empty_dir/
```
*/

#[cfg(test)]
mod tests {
    use std::fs;

    use corebox_base::{FilePath, PalHandle, RealPal};
    use tempfile::TempDir;

    use crate::{
        DEFAULT_DIRECTORY_MODE, Encoding, ListOptions, WriteOptions, init_file, list_dir, load,
        mkdir, save,
    };

    fn setup() -> (TempDir, PalHandle) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("tmp/work_dir")).unwrap();
        fs::create_dir_all(root.join("tmp/dir/sub_dir")).unwrap();
        fs::create_dir_all(root.join("tmp/empty_dir")).unwrap();
        fs::write(root.join("tmp/test.txt"), "test content").unwrap();
        fs::write(root.join("tmp/dir/file1.txt"), "file1 content").unwrap();
        let pal = PalHandle::new(RealPal::new(root.to_path_buf()));
        (temp_dir, pal)
    }

    #[test]
    fn test_load() {
        let (_temp_dir, pal) = setup();
        assert_eq!(
            load(&pal, &FilePath::from("tmp/test.txt"), Encoding::Utf8).unwrap(),
            "test content"
        );
    }

    #[test]
    fn test_save() {
        let (temp_dir, pal) = setup();

        save(
            &pal,
            &FilePath::from("tmp/save.txt"),
            "save content",
            &WriteOptions::default(),
        )
        .unwrap();

        let content = fs::read_to_string(temp_dir.path().join("tmp/save.txt")).unwrap();
        assert_eq!(content, "save content");
    }

    #[test]
    fn test_save_utf16_round_trip() {
        let (_temp_dir, pal) = setup();
        let path = FilePath::from("tmp/wide.txt");

        save(
            &pal,
            &path,
            "wide ✓",
            &WriteOptions::new().with_encoding(Encoding::Utf16Le),
        )
        .unwrap();

        assert_eq!(load(&pal, &path, Encoding::Utf16Le).unwrap(), "wide ✓");
    }

    #[test]
    fn test_init_file() {
        let (_temp_dir, pal) = setup();
        let path = FilePath::from("tmp/init.txt");

        assert!(init_file(&pal, &path, || "init content".to_string()).unwrap());
        assert!(!init_file(&pal, &path, || "other content".to_string()).unwrap());
        assert_eq!(load(&pal, &path, Encoding::Utf8).unwrap(), "init content");
    }

    #[test]
    fn test_mkdir_then_write() {
        let (temp_dir, pal) = setup();
        let dir = FilePath::from("tmp/work_dir/sub_dir");

        mkdir(&pal, &dir, DEFAULT_DIRECTORY_MODE).unwrap();
        mkdir(&pal, &dir, DEFAULT_DIRECTORY_MODE).unwrap();
        save(&pal, &dir.join("test.txt"), "test", &WriteOptions::default()).unwrap();

        let content =
            fs::read_to_string(temp_dir.path().join("tmp/work_dir/sub_dir/test.txt")).unwrap();
        assert_eq!(content, "test");
    }

    #[test]
    fn test_list_dir_filters() {
        let (_temp_dir, pal) = setup();
        let dir = FilePath::from("tmp/dir");
        let empty = FilePath::from("tmp/empty_dir");

        assert_eq!(
            list_dir(&pal, &dir, ListOptions::directories()).unwrap(),
            vec![FilePath::from("tmp/dir/sub_dir")]
        );
        assert_eq!(
            list_dir(&pal, &dir, ListOptions::files()).unwrap(),
            vec![FilePath::from("tmp/dir/file1.txt")]
        );
        assert!(list_dir(&pal, &empty, ListOptions::directories()).unwrap().is_empty());
        assert!(list_dir(&pal, &empty, ListOptions::files()).unwrap().is_empty());
    }

    #[test]
    fn test_list_dir_missing() {
        let (_temp_dir, pal) = setup();

        let err = list_dir(&pal, &FilePath::from("tmp/nope"), ListOptions::all()).unwrap_err();
        assert!(err.is_not_found());
    }
}
