//! Write a generated script to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::error::{CompileResult, CompilerError};

/// Write `content` to `path` through a sibling temp file and a rename, so a
/// failed write never leaves a partial script at `path`.
pub fn write_script(path: &Path, content: &str) -> CompileResult<()> {
    let tmp = temp_sibling(path);

    if let Err(e) = fs::write(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(CompilerError::io(path, &e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(CompilerError::io(path, &e));
    }
    debug!(path = %path.display(), bytes = content.len(), "wrote pipeline script");
    Ok(())
}

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Temp name unique per process and per call, so concurrent writers aimed at
/// the same destination never share a temp file.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pipeline".to_string());
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
}
