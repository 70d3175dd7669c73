#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Write an executable shell script that stands in for the tunnel binary.
#[cfg(unix)]
pub fn write_fake_tunnel(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    path
}
