//! Build a [`VfsStore`] from a zip archive.
//!
//! The longest common directory prefix of all entry names is stripped, so an
//! archive whose payload sits under one top-level folder mounts that folder
//! as `/`. UTF-8 entries are stored as text, everything else as base64.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use vshell_types::error::{Result, ShellError};

use crate::seed::create_default;
use crate::store::{FileContent, VfsStore};

/// Load the archive at `path`.
pub fn load_from_archive(path: &Path) -> Result<VfsStore> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ShellError::NotFound(path.display().to_string()),
        _ => ShellError::Corrupt(format!("{}: {e}", path.display())),
    })?;
    let vfs = load_from_reader(BufReader::new(file), &path.display().to_string())?;
    log::info!(
        "Mounted {} ({} files, {} directories)",
        path.display(),
        vfs.file_count(),
        vfs.dir_count()
    );
    Ok(vfs)
}

/// Load an archive from any seekable reader. `label` names the source in
/// error messages.
pub fn load_from_reader<R: Read + Seek>(reader: R, label: &str) -> Result<VfsStore> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| ShellError::Corrupt(format!("{label}: {e}")))?;
    if archive.is_empty() {
        return Err(ShellError::Empty(label.to_string()));
    }

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let prefix_len = common_dir_prefix(&names).len();

    let mut vfs = VfsStore::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ShellError::Corrupt(format!("{label}: {e}")))?;
        let name = entry.name().to_string();
        let Some(stripped) = name.get(prefix_len..) else {
            continue;
        };

        if entry.is_dir() {
            let dir = stripped.trim_end_matches('/');
            if !dir.is_empty() {
                vfs.insert_dir(dir);
            }
            continue;
        }
        if stripped.is_empty() {
            continue;
        }

        let mut data = Vec::with_capacity(entry.size().min(1 << 20) as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|e| ShellError::Corrupt(format!("{label}: {name}: {e}")))?;
        vfs.insert_file(stripped, FileContent::from_bytes(data));
    }
    Ok(vfs)
}

/// Load `archive` if given, falling back to the default tree when there is
/// no archive or it cannot be loaded. The load error, if any, is returned
/// alongside the store so the caller can report it.
pub fn load_or_default(archive: Option<&Path>) -> (VfsStore, Option<ShellError>) {
    let Some(path) = archive else {
        return (create_default(), None);
    };
    match load_from_archive(path) {
        Ok(vfs) => (vfs, None),
        Err(e) => {
            log::warn!("Falling back to default tree: {e}");
            (create_default(), Some(e))
        },
    }
}

/// Longest common prefix of `names`, cut back to end on a `/` so a shared
/// partial segment name is never split.
fn common_dir_prefix(names: &[String]) -> &str {
    let Some((first, rest)) = names.split_first() else {
        return "";
    };
    let mut len = first.len();
    for name in rest {
        len = first
            .bytes()
            .zip(name.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    match first.as_bytes()[..len].iter().rposition(|&b| b == b'/') {
        Some(i) => &first[..=i],
        None => "",
    }
}
