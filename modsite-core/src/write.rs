use std::path::{Component, Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::site::SiteFiles;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("refusing to write outside the output directory: {0:?}")]
    UnsafePath(String),
    #[error("failed to remove destination directory {path}: {source}")]
    Clean {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves a `/`-separated relative path below `dest`.
fn destination(dest: &Path, relative: &str) -> Result<PathBuf, WriteError> {
    let relative_path = Path::new(relative);
    let safe = !relative.is_empty()
        && relative_path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !safe {
        return Err(WriteError::UnsafePath(relative.to_string()));
    }
    Ok(relative.split('/').fold(dest.to_path_buf(), |path, part| path.join(part)))
}

/// Replaces `dest` with the given files.
///
/// Every path is checked before anything on disk is touched.
pub fn write_site(dest: &Path, files: &SiteFiles) -> Result<(), WriteError> {
    let targets = files
        .iter()
        .map(|(relative, contents)| destination(dest, relative).map(|path| (path, contents)))
        .collect::<Result<Vec<_>, WriteError>>()?;

    if dest.exists() {
        std::fs::remove_dir_all(dest).map_err(|source| WriteError::Clean {
            path: dest.to_path_buf(),
            source,
        })?;
    }
    std::fs::create_dir_all(dest).map_err(|source| WriteError::CreateDir {
        path: dest.to_path_buf(),
        source,
    })?;

    for (path, contents) in targets {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        debug!("writing {}", path.display());
        std::fs::write(&path, contents).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;
    }

    Ok(())
}
