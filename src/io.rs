//! Async file loader and writer.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{EditError, EditResult};

fn io_error(path: &Path, source: std::io::Error) -> EditError {
    EditError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the whole file as UTF-8 text. A missing file reads as `None` so it
/// can be created on save.
pub async fn load_text(path: &Path) -> EditResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => {
            debug!(path = %path.display(), bytes = text.len(), "loaded file");
            Ok(Some(text))
        }
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_error(path, source)),
    }
}

/// Replace the file's contents with `text` and flush it to disk.
pub async fn write_text(path: &Path, text: &str) -> EditResult<()> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|source| io_error(path, source))?;
    file.write_all(text.as_bytes())
        .await
        .map_err(|source| io_error(path, source))?;
    file.sync_all()
        .await
        .map_err(|source| io_error(path, source))?;
    debug!(path = %path.display(), bytes = text.len(), "wrote file");
    Ok(())
}
