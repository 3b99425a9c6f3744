//! Capability-scoped file access for photo input and output.

use std::io::{self, Read, Write};
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

fn open_parent(path: &Path) -> io::Result<(Dir, &Path)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path must name a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!("open directory '{}': {error}", parent.display()))
    })?;
    Ok((directory, Path::new(file_name)))
}

/// Read the whole file at `path`.
pub(super) fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let (directory, name) = open_parent(path)?;
    let mut file = directory.open(name)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Create or truncate the file at `path` and write `bytes` to it.
pub(super) fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let (directory, name) = open_parent(path)?;
    let mut file = directory.create(name)?;
    file.write_all(bytes)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn written_bytes_read_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("photo.jpg");

        write_file(&path, b"jpeg").expect("write");

        assert_eq!(read_file(&path).expect("read"), b"jpeg");
    }

    #[rstest]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = read_file(&dir.path().join("absent.png")).expect_err("missing");
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn directory_paths_are_rejected() {
        let error = read_file(Path::new("/")).expect_err("no file name");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
