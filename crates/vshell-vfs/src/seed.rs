//! Built-in demo tree.

use crate::store::{FileContent, VfsStore};

/// Create the fixed demo tree used when no archive is configured or loading
/// fails. The result is identical on every call.
pub fn create_default() -> VfsStore {
    let mut vfs = VfsStore::new();

    vfs.insert_dir("/home/user/projects");
    vfs.insert_dir("/tmp");
    vfs.insert_file(
        "/home/user/readme.txt",
        FileContent::text("Welcome to vshell!\nType 'help' for available commands.\n"),
    );
    vfs.insert_file(
        "/home/user/notes.txt",
        FileContent::text("- try ls, cd and du\n- chmod 755 a file, then ls again\n"),
    );
    vfs.insert_file(
        "/home/user/projects/hello.sh",
        FileContent::text("# Demo script\nls\ncd /etc\nls\nhistory\n"),
    );
    vfs.insert_file("/etc/hostname", FileContent::text("vshell\n"));
    vfs.insert_file("/etc/motd", FileContent::text("Nothing here is real.\n"));
    vfs.insert_file(
        "/var/log/boot.log",
        FileContent::text("[ ok ] mounted demo tree\n"),
    );
    vfs.insert_file(
        "/usr/share/logo.bin",
        FileContent::from_bytes(vec![0x89, b'V', b'S', b'H', 0x0D, 0x0A, 0x1A, 0x0A, 0xFF]),
    );

    log::info!(
        "Created default tree ({} files, {} directories)",
        vfs.file_count(),
        vfs.dir_count()
    );
    vfs
}
