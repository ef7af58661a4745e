//! Mount point enumeration for Unix targets other than macOS.

use std::io;
use std::path::PathBuf;

/// Every mount point from `/proc/self/mounts`.
#[cfg(target_os = "linux")]
pub fn list_filesystem_roots() -> io::Result<Vec<PathBuf>> {
    let table = std::fs::read("/proc/self/mounts")?;
    Ok(parse_mount_table(&table))
}

/// No portable mount table here: a single root means "always same disk".
#[cfg(not(target_os = "linux"))]
pub fn list_filesystem_roots() -> io::Result<Vec<PathBuf>> {
    Ok(vec![PathBuf::from("/")])
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_mount_table(table: &[u8]) -> Vec<PathBuf> {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let mut roots: Vec<PathBuf> = Vec::new();
    for line in table.split(|b| *b == b'\n') {
        // device mountpoint fstype options dump pass
        let Some(field) = line
            .split(|b| *b == b' ')
            .filter(|f| !f.is_empty())
            .nth(1)
        else {
            continue;
        };
        let root = PathBuf::from(OsString::from_vec(unescape_octal(field)));
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// The kernel escapes space, tab, newline and backslash as `\ooo`.
fn unescape_octal(field: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;
    while i < field.len() {
        if field[i] == b'\\'
            && i + 3 < field.len()
            && field[i + 1..i + 4].iter().all(|d| (b'0'..=b'7').contains(d))
        {
            let v = field[i + 1..i + 4]
                .iter()
                .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            out.push(v as u8);
            i += 4;
        } else {
            out.push(field[i]);
            i += 1;
        }
    }
    out
}
