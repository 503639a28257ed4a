//! In-memory VFS store.
//!
//! Files and directories live in sorted maps keyed by normalized absolute
//! paths. Every file's ancestor directories are inserted eagerly, so a file is
//! never reachable without its parents. Name comparison is case-sensitive.

use std::collections::{BTreeMap, BTreeSet};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use vshell_types::error::{ModeProblem, Result, ShellError};

use crate::path::{ancestors, normalize};

/// Mode given to every newly inserted file.
pub const DEFAULT_MODE: &str = "644";

/// How a file's payload is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Payload is the file's UTF-8 content.
    Text,
    /// Payload is the standard base64 encoding of the raw bytes.
    Base64,
}

/// Content record of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub payload: String,
    pub encoding: Encoding,
}

impl FileContent {
    /// Store bytes as text when they are valid UTF-8, base64 otherwise.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::text(text),
            Err(e) => Self {
                payload: STANDARD.encode(e.into_bytes()),
                encoding: Encoding::Base64,
            },
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: text.into(),
            encoding: Encoding::Text,
        }
    }

    /// Byte length of the original content.
    pub fn size(&self) -> u64 {
        match self.encoding {
            Encoding::Text => self.payload.len() as u64,
            Encoding::Base64 => {
                let len = self.payload.len();
                let pad = self.payload.bytes().rev().take_while(|&b| b == b'=').count();
                (len / 4 * 3).saturating_sub(pad) as u64
            },
        }
    }

    /// Recover the original bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self.encoding {
            Encoding::Text => Ok(self.payload.as_bytes().to_vec()),
            Encoding::Base64 => STANDARD
                .decode(&self.payload)
                .map_err(|e| ShellError::Corrupt(format!("bad base64 payload: {e}"))),
        }
    }
}

/// The virtual file tree plus the session's current directory.
#[derive(Debug, Clone)]
pub struct VfsStore {
    files: BTreeMap<String, FileContent>,
    dirs: BTreeSet<String>,
    permissions: BTreeMap<String, String>,
    current_dir: String,
}

impl VfsStore {
    /// Create a store holding only the root directory.
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert("/".to_string());
        Self {
            files: BTreeMap::new(),
            dirs,
            permissions: BTreeMap::new(),
            current_dir: "/".to_string(),
        }
    }

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    /// Resolve `path` against the current directory.
    pub fn resolve(&self, path: &str) -> String {
        normalize(path, &self.current_dir)
    }

    /// Change the current directory. The target must already be a directory.
    pub fn set_current_dir(&mut self, path: &str) -> Result<()> {
        let path = self.resolve(path);
        if !self.has_dir(&path) {
            return Err(ShellError::NotFound(path));
        }
        self.current_dir = path;
        Ok(())
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.dirs.contains(path)
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn file(&self, path: &str) -> Option<&FileContent> {
        self.files.get(path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Insert a directory and all of its ancestors.
    pub fn insert_dir(&mut self, path: &str) {
        let path = normalize(path, "/");
        for up in ancestors(&path) {
            self.dirs.insert(up.to_string());
        }
        self.dirs.insert(path);
    }

    /// Insert or replace a file, creating its ancestor directories and
    /// resetting its mode to [`DEFAULT_MODE`].
    pub fn insert_file(&mut self, path: &str, content: FileContent) {
        let path = normalize(path, "/");
        if path == "/" {
            return;
        }
        for up in ancestors(&path) {
            self.dirs.insert(up.to_string());
        }
        self.permissions.insert(path.clone(), DEFAULT_MODE.to_string());
        self.files.insert(path, content);
    }

    /// Direct subdirectory names and direct file names of `path`, each sorted.
    pub fn list_children(&self, path: &str) -> (Vec<String>, Vec<String>) {
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        let dirs = direct_children(self.dirs.range(prefix.clone()..), &prefix);
        let files = direct_children(self.files.range(prefix.clone()..).map(|(k, _)| k), &prefix);
        (dirs, files)
    }

    /// Delete a file and its permission entry. Relative paths are taken
    /// from `/`, as in [`insert_file`](Self::insert_file).
    pub fn remove_file(&mut self, path: &str) -> Result<()> {
        let path = normalize(path, "/");
        if self.files.remove(&path).is_none() {
            return Err(ShellError::NotFound(path));
        }
        self.permissions.remove(&path);
        Ok(())
    }

    pub fn permissions(&self, path: &str) -> Option<&str> {
        self.permissions.get(path).map(String::as_str)
    }

    /// Overwrite a file's mode after validating it.
    pub fn set_permissions(&mut self, path: &str, mode: &str) -> Result<()> {
        let path = normalize(path, "/");
        if !self.files.contains_key(&path) {
            return Err(ShellError::NotFound(path));
        }
        validate_mode(mode)?;
        self.permissions.insert(path, mode.to_string());
        Ok(())
    }

    /// Original byte length of a file's content.
    pub fn size_of(&self, path: &str) -> Result<u64> {
        self.files
            .get(path)
            .map(FileContent::size)
            .ok_or_else(|| ShellError::NotFound(path.to_string()))
    }

    /// Original bytes of a file, decoding base64 payloads.
    pub fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .ok_or_else(|| ShellError::NotFound(path.to_string()))?
            .to_bytes()
    }
}

impl Default for VfsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `mode` is exactly three octal digits.
pub fn validate_mode(mode: &str) -> Result<()> {
    let bytes = mode.as_bytes();
    if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(ShellError::InvalidMode {
            mode: mode.to_string(),
            problem: ModeProblem::Shape,
        });
    }
    if bytes.iter().any(|&b| b > b'7') {
        return Err(ShellError::InvalidMode {
            mode: mode.to_string(),
            problem: ModeProblem::Range,
        });
    }
    Ok(())
}

/// Collect the names directly under `prefix` from a sorted key range.
///
/// Keys sharing a prefix sort the same as their remainders, so the result
/// comes out in lexicographic name order.
fn direct_children<'a>(keys: impl Iterator<Item = &'a String>, prefix: &str) -> Vec<String> {
    keys.take_while(|key| key.starts_with(prefix))
        .filter_map(|key| {
            let rest = &key[prefix.len()..];
            (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VfsStore {
        let mut vfs = VfsStore::new();
        vfs.insert_file("/docs/a.txt", FileContent::text("hello"));
        vfs.insert_file("/docs/b.txt", FileContent::text("hello, world"));
        vfs.insert_file("/docs/deep/c.txt", FileContent::text("c"));
        vfs.insert_dir("/empty");
        vfs
    }

    #[test]
    fn root_exists() {
        let vfs = VfsStore::new();
        assert!(vfs.has_dir("/"));
        assert_eq!(vfs.current_dir(), "/");
    }

    #[test]
    fn insert_file_creates_ancestors() {
        let mut vfs = VfsStore::new();
        vfs.insert_file("/a/b/c/leaf.txt", FileContent::text("x"));
        assert!(vfs.has_dir("/a"));
        assert!(vfs.has_dir("/a/b"));
        assert!(vfs.has_dir("/a/b/c"));
        assert!(vfs.has_file("/a/b/c/leaf.txt"));
    }

    #[test]
    fn insert_file_sets_default_mode() {
        let vfs = sample();
        assert_eq!(vfs.permissions("/docs/a.txt"), Some(DEFAULT_MODE));
    }

    #[test]
    fn insert_dir_normalizes() {
        let mut vfs = VfsStore::new();
        vfs.insert_dir("srv/www/");
        assert!(vfs.has_dir("/srv"));
        assert!(vfs.has_dir("/srv/www"));
    }

    #[test]
    fn list_children_direct_only_and_sorted() {
        let vfs = sample();
        let (dirs, files) = vfs.list_children("/docs");
        assert_eq!(dirs, vec!["deep"]);
        assert_eq!(files, vec!["a.txt", "b.txt"]);

        let (dirs, files) = vfs.list_children("/");
        assert_eq!(dirs, vec!["docs", "empty"]);
        assert!(files.is_empty());
    }

    #[test]
    fn list_children_sibling_prefixes_do_not_leak() {
        let mut vfs = VfsStore::new();
        vfs.insert_file("/ab/x", FileContent::text("1"));
        vfs.insert_file("/a/y", FileContent::text("2"));
        vfs.insert_file("/a-b/z", FileContent::text("3"));
        let (dirs, files) = vfs.list_children("/a");
        assert!(dirs.is_empty());
        assert_eq!(files, vec!["y"]);
    }

    #[test]
    fn list_children_is_case_sensitive() {
        let mut vfs = VfsStore::new();
        vfs.insert_file("/Docs/x", FileContent::text("1"));
        let (dirs, files) = vfs.list_children("/docs");
        assert!(dirs.is_empty() && files.is_empty());
        assert!(!vfs.has_dir("/docs"));
    }

    #[test]
    fn remove_file_drops_permission() {
        let mut vfs = sample();
        vfs.remove_file("/docs/a.txt").unwrap();
        assert!(!vfs.has_file("/docs/a.txt"));
        assert_eq!(vfs.permissions("/docs/a.txt"), None);
        let (_, files) = vfs.list_children("/docs");
        assert_eq!(files, vec!["b.txt"]);
    }

    #[test]
    fn remove_missing_file_fails() {
        let mut vfs = sample();
        let err = vfs.remove_file("/docs/ghost").unwrap_err();
        assert!(matches!(err, ShellError::NotFound(_)));
        assert_eq!(vfs.file_count(), 3);
    }

    #[test]
    fn remove_directory_is_not_found() {
        let mut vfs = sample();
        assert!(vfs.remove_file("/docs").is_err());
        assert!(vfs.has_dir("/docs"));
    }

    #[test]
    fn relative_keys_match_insert() {
        let mut vfs = VfsStore::new();
        vfs.insert_file("docs/a.txt", FileContent::text("a"));
        vfs.set_permissions("docs/./a.txt", "700").unwrap();
        assert_eq!(vfs.permissions("/docs/a.txt"), Some("700"));
        vfs.remove_file("docs/a.txt").unwrap();
        assert!(!vfs.has_file("/docs/a.txt"));
        assert_eq!(vfs.permissions("/docs/a.txt"), None);
    }

    #[test]
    fn set_permissions_valid() {
        let mut vfs = sample();
        vfs.set_permissions("/docs/a.txt", "755").unwrap();
        assert_eq!(vfs.permissions("/docs/a.txt"), Some("755"));
    }

    #[test]
    fn set_permissions_missing_file() {
        let mut vfs = sample();
        let err = vfs.set_permissions("/nope", "755").unwrap_err();
        assert!(matches!(err, ShellError::NotFound(_)));
    }

    #[test]
    fn set_permissions_rejects_bad_modes() {
        let mut vfs = sample();
        for (mode, expected) in [
            ("abc", ModeProblem::Shape),
            ("75", ModeProblem::Shape),
            ("7555", ModeProblem::Shape),
            ("-75", ModeProblem::Shape),
            ("999", ModeProblem::Range),
            ("678", ModeProblem::Range),
        ] {
            match vfs.set_permissions("/docs/a.txt", mode) {
                Err(ShellError::InvalidMode { problem, .. }) => assert_eq!(problem, expected, "{mode}"),
                other => panic!("expected InvalidMode for {mode}, got {other:?}"),
            }
        }
        assert_eq!(vfs.permissions("/docs/a.txt"), Some(DEFAULT_MODE));
    }

    #[test]
    fn size_of_text_is_byte_length() {
        let mut vfs = VfsStore::new();
        vfs.insert_file("/u.txt", FileContent::text("h\u{e9}llo"));
        assert_eq!(vfs.size_of("/u.txt").unwrap(), 6);
    }

    #[test]
    fn binary_content_stored_as_base64() {
        let raw = vec![0x00, 0xFF, 0x10, 0x80, 0xFE];
        let content = FileContent::from_bytes(raw.clone());
        assert_eq!(content.encoding, Encoding::Base64);
        assert_eq!(content.size(), 5);
        assert_eq!(content.to_bytes().unwrap(), raw);
    }

    #[test]
    fn base64_size_matches_decoded_length() {
        for n in 0..12usize {
            let raw: Vec<u8> = (0..n).map(|i| 0xF0 | (i as u8 & 0x0F)).collect();
            let content = FileContent {
                payload: STANDARD.encode(&raw),
                encoding: Encoding::Base64,
            };
            assert_eq!(content.size(), n as u64, "length {n}");
        }
    }

    #[test]
    fn set_current_dir_requires_directory() {
        let mut vfs = sample();
        vfs.set_current_dir("/docs").unwrap();
        assert_eq!(vfs.current_dir(), "/docs");
        assert!(vfs.set_current_dir("a.txt").is_err());
        assert!(vfs.set_current_dir("/missing").is_err());
        assert_eq!(vfs.current_dir(), "/docs");
        vfs.set_current_dir("deep").unwrap();
        assert_eq!(vfs.current_dir(), "/docs/deep");
    }
}
