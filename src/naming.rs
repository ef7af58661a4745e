//! Destination naming.
//!
//! Library layout: `<library>/<Show>/Season NN/<Show> - SxxEyy - <Title>.<ext>`.
//! Every component goes through [`sanitize_component`] so the same name is
//! legal on Windows, macOS and Linux filesystems.

use std::path::{Path, PathBuf};

const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Make `raw` usable as a single path component.
///
/// - path separators become `-`, `:` becomes ` -`;
/// - `* ? " < > |` and control characters are dropped;
/// - whitespace runs collapse to one space; leading whitespace and trailing
///   dots/spaces are trimmed;
/// - Windows device names get a `_` suffix, an empty result becomes `_`.
pub fn sanitize_component(raw: &str) -> String {
    let mut replaced = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '/' | '\\' => replaced.push('-'),
            ':' => replaced.push_str(" -"),
            '*' | '?' | '"' | '<' | '>' | '|' => {}
            c if c.is_control() => {}
            c => replaced.push(c),
        }
    }

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = collapsed
        .trim_end_matches(|c: char| c == '.' || c == ' ')
        .to_string();

    if out.is_empty() {
        return "_".to_string();
    }
    let stem = out.split('.').next().unwrap_or_default();
    if WINDOWS_RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        out.push('_');
    }
    out
}

/// `Season 01`, `Season 12`; season 0 is `Specials`.
pub fn season_dir_name(season: u32) -> String {
    if season == 0 {
        "Specials".to_string()
    } else {
        format!("Season {season:02}")
    }
}

/// `Show - S01E02 - Title.ext`; the title part is omitted when blank.
pub fn episode_file_name(show: &str, season: u32, episode: u32, title: &str, ext: &str) -> String {
    let mut name = format!("{} - S{season:02}E{episode:02}", sanitize_component(show));
    if !title.trim().is_empty() {
        name.push_str(" - ");
        name.push_str(&sanitize_component(title));
    }
    let ext = ext.trim().trim_start_matches('.');
    if !ext.is_empty() {
        name.push('.');
        name.push_str(&ext.to_ascii_lowercase());
    }
    name
}

/// Full library path for an episode; the extension is taken from `source`.
pub fn destination_for(
    library: &Path,
    show: &str,
    season: u32,
    episode: u32,
    title: &str,
    source: &Path,
) -> PathBuf {
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    library
        .join(sanitize_component(show))
        .join(season_dir_name(season))
        .join(episode_file_name(show, season, episode, title, &ext))
}
