//! Terminal logging with colored `[module]` prefixes.
//!
//! Everything goes to stderr so that command output on stdout (ids, JSON,
//! rendered feeds) stays pipeable.
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//! warn!("unknown fields in {}", path.display());
//! debug!("store"; "persisted {} channels", count); // --verbose only
//! ```

use owo_colors::{OwoColorize, Stream};
use std::{
    io::{self, Write},
    sync::atomic::{AtomicBool, Ordering},
};

/// Set once from `--verbose`.
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Log a message with a colored module prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log under the `warning` prefix.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::logger::log("warning", &format!($($arg)*))
    }};
}

/// Log only when `--verbose` is set. Arguments are not evaluated otherwise.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let mut stderr = io::stderr().lock();
    write_line(&mut stderr, module, message);
}

/// One line per message; write errors are ignored (a closed stderr must
/// not abort a request).
fn write_line(out: &mut impl Write, module: &str, message: &str) {
    let _ = writeln!(out, "{} {message}", prefix(module));
    let _ = out.flush();
}

/// Colored only when stderr supports it, so `--color` and pipes are honored.
fn prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    let is = |name: &str| module.eq_ignore_ascii_case(name);
    let paint = |style: fn(&String) -> String| {
        tag.if_supports_color(Stream::Stderr, |t| style(t)).to_string()
    };

    if is("serve") {
        paint(|t| t.bright_blue().bold().to_string())
    } else if is("channel") || is("store") {
        paint(|t| t.bright_green().bold().to_string())
    } else if is("error") {
        paint(|t| t.bright_red().bold().to_string())
    } else if is("warning") {
        paint(|t| t.bright_magenta().bold().to_string())
    } else {
        paint(|t| t.bright_yellow().bold().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn test_write_line() {
        owo_colors::set_override(false);
        let mut out = Vec::new();
        write_line(&mut out, "Store", "added channel 1");
        assert_eq!(out, b"[Store] added channel 1\n");
    }
}
