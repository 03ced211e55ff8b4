mod error;
pub use error::*;

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use crate::MoscharResult;

/// A device model card resolved on disk, ready to be `.include`d
/// into a netlist.
#[derive(Debug, Clone)]
pub struct ModelCard {
    pub name: String,
    pub path: PathBuf,
}

/// On-disk cache of device model cards.
///
/// `resolve` is idempotent: a present, non-empty model file is reused,
/// otherwise the card is fetched from its URL. The fetch shells out to
/// `curl`, the same way simulators are invoked elsewhere.
pub struct ModelLibrary {
    lib_dir: PathBuf,
}

impl ModelLibrary {
    pub fn open<P: Into<PathBuf>>(lib_dir: P) -> MoscharResult<Self> {
        let lib_dir = lib_dir.into();
        if !lib_dir.exists() {
            std::fs::create_dir_all(&lib_dir)?;
            info!("created model library directory: {:?}", lib_dir);
        }
        Ok(Self { lib_dir })
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    /// Resolve `model_base` to a local model card, downloading it from
    /// `url` when not cached yet. The card is stored with a `.lib`
    /// extension so simulators treat it as a library file.
    pub fn resolve(&self, model_base: &str, url: &str) -> MoscharResult<ModelCard> {
        let path = self.lib_dir.join(format!("{}.lib", model_base));

        if Self::is_cached(&path) {
            debug!("model card {:?} found in cache", path);
        } else {
            info!("downloading model card from {}", url);
            Self::download(url, &path)?;
            if !Self::is_cached(&path) {
                return Err(LibraryError::EmptyModelCard(path))?;
            }
        }

        Ok(ModelCard { name: model_base.to_string(), path })
    }

    fn is_cached(path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
    }

    fn download(url: &str, path: &Path) -> MoscharResult<()> {
        let command = format!("curl -fsSL -o {} {}", path.display(), url);
        let status = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .status()
            .map_err(|e| LibraryError::DownloadError(command.clone(), e.to_string()))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(LibraryError::DownloadError(command, format!("Command returns '{}'", code)))?,
            None => Err(LibraryError::DownloadError(command, "Command quit unnormal".into()))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("lib");
        assert!(!dir.exists());

        let library = ModelLibrary::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(library.lib_dir(), dir.as_path());
    }

    #[test]
    fn test_cached_card_skips_download() {
        let tmp = TempDir::new().unwrap();
        let library = ModelLibrary::open(tmp.path()).unwrap();

        let card_path = tmp.path().join("90nm_bulk.lib");
        let mut file = std::fs::File::create(&card_path).unwrap();
        writeln!(file, ".model nmos nmos level=54").unwrap();

        // The URL is unreachable, so resolving can only succeed via the cache.
        let card = library.resolve("90nm_bulk", "http://invalid.invalid/none.pm").unwrap();
        assert_eq!(card.name, "90nm_bulk");
        assert_eq!(card.path, card_path);
    }

    #[test]
    fn test_empty_file_is_not_cached() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.lib");
        std::fs::File::create(&path).unwrap();
        assert!(!ModelLibrary::is_cached(&path));
    }
}
