//! Binary VDF editing for shortcuts.vdf.
//!
//! The file is never parsed as a whole. New shortcuts are appended by
//! locating the highest index key with a byte scan and splicing the new
//! entry in front of the closing `0x08 0x08`, leaving every earlier byte
//! untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::SteamError;
use crate::shortcuts::{Shortcut, build_record};

/// Binary VDF type markers used in shortcuts.vdf.
pub(crate) const VDF_TYPE_OBJECT: u8 = 0x00;
pub(crate) const VDF_TYPE_STRING: u8 = 0x01;
pub(crate) const VDF_TYPE_INT32: u8 = 0x02;
pub(crate) const VDF_TYPE_END: u8 = 0x08;

/// Closes the `shortcuts` map and then the root.
const CONTAINER_TRAILER: [u8; 2] = [VDF_TYPE_END, VDF_TYPE_END];

/// A shortcuts.vdf with no entries.
pub const EMPTY_SHORTCUTS: &[u8] = b"\x00shortcuts\x00\x08\x08";

/// Returns the index to use for the next appended shortcut.
///
/// Scans left to right for non-overlapping `\x00<digits>\x00` runs, the
/// marker that precedes every entry key, and returns the highest value seen
/// plus one, or 0 when there is none. This is a heuristic: a string field
/// holding only digits, or an `appid` whose low byte is an ASCII digit
/// followed by a zero byte, also produces a match and can push the result
/// higher than a structural parse would. Gaps in the numbering are harmless
/// to Steam; reusing an existing key is not, so a container already holding
/// key `4294967295` fails with [`SteamError::IndexExhausted`].
pub fn next_index(data: &[u8]) -> Result<u32, SteamError> {
    let mut highest: Option<u32> = None;
    let mut pos = 0;

    while pos < data.len() {
        if data[pos] != 0x00 {
            pos += 1;
            continue;
        }

        let start = pos + 1;
        let mut end = start;
        while end < data.len() && data[end].is_ascii_digit() {
            end += 1;
        }

        if end > start && end < data.len() && data[end] == 0x00 {
            if let Some(idx) = parse_index(&data[start..end]) {
                highest = Some(highest.map_or(idx, |h| h.max(idx)));
            }
            // The closing null belongs to this match.
            pos = end + 1;
        } else {
            pos += 1;
        }
    }

    match highest {
        Some(h) => h.checked_add(1).ok_or(SteamError::IndexExhausted),
        None => Ok(0),
    }
}

fn parse_index(digits: &[u8]) -> Option<u32> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Splices `entry` in front of the container's closing `0x08 0x08`.
///
/// Fails with [`SteamError::MalformedContainer`] when the data does not end
/// with the two terminators; the input is never modified.
pub fn insert_entry(data: &[u8], entry: &[u8]) -> Result<Vec<u8>, SteamError> {
    if !data.ends_with(&CONTAINER_TRAILER) {
        return Err(SteamError::MalformedContainer);
    }

    let body = &data[..data.len() - CONTAINER_TRAILER.len()];
    let mut out = Vec::with_capacity(data.len() + entry.len());
    out.extend_from_slice(body);
    out.extend_from_slice(entry);
    out.extend_from_slice(&CONTAINER_TRAILER);
    Ok(out)
}

/// Appends `shortcut` under the next free index.
///
/// Returns the index used and the new container bytes.
pub fn append_shortcut(data: &[u8], shortcut: &Shortcut) -> Result<(u32, Vec<u8>), SteamError> {
    let index = next_index(data)?;
    let entry = build_record(index, shortcut);
    let out = insert_entry(data, &entry)?;
    tracing::debug!(
        index,
        app_id = shortcut.app_id,
        entry_len = entry.len(),
        "shortcut entry spliced"
    );
    Ok((index, out))
}

/// Reads a shortcuts file, or returns an empty container if it doesn't exist.
pub fn read_or_init(path: &Path) -> Result<Vec<u8>, SteamError> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "shortcuts file missing, starting from empty");
            Ok(EMPTY_SHORTCUTS.to_vec())
        }
        Err(e) => Err(SteamError::Io(format!(
            "failed to read {}: {e}",
            path.display()
        ))),
    }
}

/// Replaces `path` with `data` via a sibling temp file and a rename.
///
/// Readers see either the old file or the new one, never a partial write.
/// Nothing guards against two writers racing on the same file.
///
/// A symlinked `path` stays a link; the file it points to is replaced. An
/// existing file keeps its permission bits.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), SteamError> {
    let target = resolve_target(path).map_err(|e| {
        SteamError::Io(format!("failed to resolve {}: {e}", path.display()))
    })?;
    let tmp = temp_path(&target);

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(data)?;
        match fs::metadata(&target) {
            Ok(meta) => file.set_permissions(meta.permissions())?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        file.sync_all()?;
        fs::rename(&tmp, &target)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(SteamError::Io(format!(
            "failed to write {}: {e}",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), bytes = data.len(), "shortcuts file written");
    Ok(())
}

/// Follows a symlink at `path` to the file it names; anything else is
/// returned as is.
fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(resolved) => Ok(resolved),
            // Dangling link: create the file it names.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let link = fs::read_link(path)?;
                Ok(path.parent().map_or(link.clone(), |dir| dir.join(&link)))
            }
            Err(e) => Err(e),
        },
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
