//! Attachment byte persistence

use std::fs;
use std::path::Path;

/// Write attachment bytes to `filepath`, creating parent directories as
/// needed. Existing files are overwritten: the path is a deterministic
/// function of the ids, so a re-run regenerates the same files.
pub fn write_attachment(filepath: &str, bytes: &[u8]) -> std::io::Result<()> {
    let path = Path::new(filepath);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, bytes)
}
