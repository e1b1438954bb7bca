//! Utilities: logging (level from -v/-q, stderr only) and path helpers
//! (application data dirs, `~` / `$VAR` expansion).
//!
//! Key items:
//!   init_logging / derive_level
//!   paths::app_data_dir / paths::expand_path

/// Logging helpers.
pub mod logging {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::EnvFilter;

    /// Map -q / -v counts onto a level. Default is warnings only so that a
    /// plain invocation prints nothing but the result.
    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::ERROR;
        }
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Install the global subscriber. `RUST_LOG` overrides `level`.
    /// Output goes to stderr; stdout carries only the rendered result.
    pub fn init_logging(level: LevelFilter) {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(std::env::var_os("NO_COLOR").is_none())
            .try_init();
    }
}

pub use logging::{derive_level, init_logging};

/// Filesystem path helpers.
pub mod paths {
    use std::path::{Path, PathBuf};

    /// Per-application data directory, following the daemons' convention:
    /// `~/.<app>` on unix-likes, `<local data>/<App>` on Windows and macOS.
    pub fn app_data_dir(app: &str) -> PathBuf {
        let app = app.trim_start_matches('.');
        if cfg!(any(windows, target_os = "macos")) {
            let mut chars = app.chars();
            let capitalized: String = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
            if let Some(base) = dirs::data_local_dir() {
                return base.join(capitalized);
            }
        }
        match dirs::home_dir() {
            Some(home) => home.join(format!(".{app}")),
            None => PathBuf::from("."),
        }
    }

    /// Expand `$VAR` / `${VAR}` and a leading `~` or `~user`.
    ///
    /// `~user` resolves to a sibling of the current home directory; when no
    /// home directory is known `.` is used instead.
    pub fn expand_path(path: &str) -> PathBuf {
        if path.is_empty() {
            return PathBuf::new();
        }
        let expanded = expand_env(path);
        let Some(rest) = expanded.strip_prefix('~') else {
            return PathBuf::from(expanded);
        };

        let (user, tail) = match rest.find(is_separator) {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, ""),
        };
        let home = dirs::home_dir();
        let base = match (user, home) {
            ("", Some(home)) => home,
            (user, Some(home)) => home
                .parent()
                .map(|p| p.join(user))
                .unwrap_or_else(|| PathBuf::from(".")),
            (_, None) => PathBuf::from("."),
        };
        if tail.is_empty() {
            base
        } else {
            base.join(Path::new(tail))
        }
    }

    fn is_separator(c: char) -> bool {
        c == '/' || (cfg!(windows) && c == '\\')
    }

    fn expand_env(input: &str) -> String {
        expand_env_with(input, |name| std::env::var(name).ok())
    }

    /// Unset variables expand to the empty string.
    pub(crate) fn expand_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
                match braced.find('}') {
                    Some(end) => (&braced[..end], end + 2),
                    None => ("", 0),
                }
            } else {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            };
            if name.is_empty() {
                out.push('$');
                rest = after;
                continue;
            }
            out.push_str(&lookup(name).unwrap_or_default());
            rest = &after[consumed..];
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::logging::derive_level;
    use super::paths::{app_data_dir, expand_env_with, expand_path};
    use tracing::level_filters::LevelFilter;

    #[test]
    fn level_mapping() {
        assert_eq!(derive_level(0, false), LevelFilter::WARN);
        assert_eq!(derive_level(1, false), LevelFilter::INFO);
        assert_eq!(derive_level(2, false), LevelFilter::DEBUG);
        assert_eq!(derive_level(9, false), LevelFilter::TRACE);
        assert_eq!(derive_level(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn env_expansion() {
        let lookup = |name: &str| match name {
            "HOME" => Some("/home/u".to_string()),
            "APP" => Some("dcr".to_string()),
            _ => None,
        };
        assert_eq!(expand_env_with("$HOME/.${APP}ctl", lookup), "/home/u/.dcrctl");
        assert_eq!(expand_env_with("/x/$NOPE/y", lookup), "/x//y");
        assert_eq!(expand_env_with("cost$", lookup), "cost$");
        assert_eq!(expand_env_with("${unterminated", lookup), "${unterminated");
    }

    #[test]
    fn tilde_expansion_uses_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_path("~"), home);
        assert_eq!(expand_path("~/rpc.cert"), home.join("rpc.cert"));
        assert_eq!(expand_path("/abs/rpc.cert"), std::path::PathBuf::from("/abs/rpc.cert"));
        assert_eq!(expand_path(""), std::path::PathBuf::new());
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn unix_app_dir_is_dotted() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(app_data_dir("dcrctl"), home.join(".dcrctl"));
        }
    }
}
