use std::path::{Path, PathBuf};

/// Failures that abort a generator run.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("failed to read {path:?}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path:?}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: fs_extra::error::Error,
    },
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn file_read<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn file_write<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn directory_create<P: AsRef<Path>>(path: P, source: fs_extra::error::Error) -> Self {
        Error::DirectoryCreate {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// `fs_extra::dir::create_all` without erasing what is already there.
pub(crate) fn create_dir_all(path: &Path) -> Result<()> {
    fs_extra::dir::create_all(path, false).map_err(|e| Error::directory_create(path, e))
}

pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))
}

pub(crate) fn write(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::file_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.md");
        let err = read_to_string(&path).unwrap_err();
        assert!(matches!(err, Error::FileRead { path: ref p, .. } if *p == path));
        assert!(err.to_string().contains("absent.md"));
    }

    #[test]
    fn write_into_missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("index.html");
        let err = write(&path, "x").unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }

    #[test]
    fn create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("keep.txt"), "keep").unwrap();
        create_dir_all(&nested).unwrap();
        assert!(nested.join("keep.txt").exists());
    }

    #[test]
    fn create_dir_over_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("docs");
        std::fs::write(&file, "not a dir").unwrap();
        let err = create_dir_all(&file.join("css")).unwrap_err();
        assert!(matches!(err, Error::DirectoryCreate { .. }));
    }
}
