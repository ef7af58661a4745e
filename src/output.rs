//! User-facing console lines, colored only when stdout is a terminal.

use owo_colors::{AnsiColors, OwoColorize};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn tagged(tag: &str, color: AnsiColors, msg: &str) -> String {
    if is_tty() {
        format!("{} {}", tag.color(color).bold(), msg)
    } else {
        format!("{tag} {msg}")
    }
}

pub fn print_info(msg: &str) {
    println!("{}", tagged("info:", AnsiColors::Cyan, msg));
}

pub fn print_warn(msg: &str) {
    eprintln!("{}", tagged("warn:", AnsiColors::Yellow, msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", tagged("error:", AnsiColors::Red, msg));
}

pub fn print_success(msg: &str) {
    println!("{}", tagged("ok:", AnsiColors::Green, msg));
}

/// Plain line without a prefix, for output that scripts may parse
/// (`moved <src> -> <dest>`).
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// `1.5 GiB`, `320.0 KiB`, `12 B`.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
