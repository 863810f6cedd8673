use std::io;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait ArtifactSink {
    /// Stores `data` under `name` and returns where it ended up.
    fn persist(&self, name: &str, data: &[u8]) -> io::Result<PathBuf>;
}

pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ArtifactSink for DirectorySink {
    fn persist(&self, name: &str, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(name);
        std::fs::write(&path, data)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path());
        let path = sink.persist("foo.yaml", b"openapi: 3.0.0\n").unwrap();
        assert_eq!(path, dir.path().join("foo.yaml"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "openapi: 3.0.0\n");
    }

    #[test]
    fn test_directory_sink_missing_dir() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path().join("does-not-exist"));
        assert!(sink.persist("foo.yaml", b"").is_err());
    }
}
