use std::path::Path;

/// Hex characters kept from the digest.
pub const ID_LEN: usize = 6;

/// Short identity for an item: the first six hex characters of
/// BLAKE3(`"{line}:{raw}:{mtime}"`). Only stable while neither the line
/// number, the line text nor the file's mtime change.
pub fn generate_id(line: usize, raw: &str, mtime: i64) -> String {
    let source = format!("{line}:{raw}:{mtime}");
    let digest = blake3::hash(source.as_bytes());
    hex::encode(&digest.as_bytes()[..ID_LEN / 2])
}

/// Modification time in whole seconds since the epoch, 0 when unavailable.
pub fn mtime_from(md: &std::fs::Metadata) -> i64 {
    md.modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

pub fn file_mtime(path: &Path) -> std::io::Result<i64> {
    Ok(mtime_from(&std::fs::metadata(path)?))
}
