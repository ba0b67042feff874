//! Engine options exposed over UCI.

use crate::tt::DEFAULT_HASH_MB;

/// Inclusive bounds advertised for the `Hash` spin option, in megabytes.
pub const HASH_MB_MIN: usize = 1;
pub const HASH_MB_MAX: usize = 1024;

/// Inclusive bounds advertised for the `Threads` spin option.
pub const THREADS_MIN: usize = 1;
pub const THREADS_MAX: usize = 12;

/// Side effects a `setoption` may require from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionAction {
    /// Drop the transposition table and allocate `mb` megabytes.
    ReinitHash(usize),
}

/// Engine configuration, mutated by `setoption`.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Null-move pruning toggle.
    pub nullmove: bool,
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Root search worker count.
    pub threads: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            nullmove: true,
            hash_mb: DEFAULT_HASH_MB,
            threads: 2,
        }
    }
}

impl EngineOptions {
    /// Print the `uci` handshake: id lines, options, `uciok`.
    pub fn print_uci(&self) {
        println!(
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        println!("id author the {} developers", env!("CARGO_PKG_NAME"));
        println!(
            "option name Nullmove type check default {}",
            if self.nullmove { "true" } else { "false" }
        );
        println!("option name Clear Hash type button");
        println!(
            "option name Hash type spin default {} min {HASH_MB_MIN} max {HASH_MB_MAX}",
            self.hash_mb
        );
        println!(
            "option name Threads type spin default {} min {THREADS_MIN} max {THREADS_MAX}",
            self.threads
        );
        println!("uciok");
    }

    /// Apply a parsed `setoption`. Unknown names and bad values are
    /// ignored with a log line, per the protocol-error policy.
    pub fn apply(&mut self, name: &str, value: Option<&str>) -> Option<OptionAction> {
        match name {
            "Nullmove" => {
                if let Some(v) = value {
                    self.nullmove = v.eq_ignore_ascii_case("true");
                }
            }
            "Clear Hash" => return Some(OptionAction::ReinitHash(self.hash_mb)),
            "Hash" => {
                if let Some(mb) = value.and_then(|v| v.parse::<usize>().ok()) {
                    self.hash_mb = mb.clamp(HASH_MB_MIN, HASH_MB_MAX);
                    return Some(OptionAction::ReinitHash(self.hash_mb));
                }
                log::warn!("bad Hash value: {value:?}");
            }
            "Threads" => {
                if let Some(n) = value.and_then(|v| v.parse::<usize>().ok()) {
                    self.threads = n.clamp(THREADS_MIN, THREADS_MAX);
                } else {
                    log::warn!("bad Threads value: {value:?}");
                }
            }
            _ => log::warn!("unknown option: {name}"),
        }
        None
    }
}

/// Split a `setoption` line into its name and optional value.
#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    let name_idx = parts.iter().position(|p| *p == "name")?;
    let value_idx = parts.iter().position(|p| *p == "value");
    let name = match value_idx {
        Some(v_idx) if v_idx > name_idx + 1 => parts[name_idx + 1..v_idx].join(" "),
        None if name_idx + 1 < parts.len() => parts[name_idx + 1..].join(" "),
        _ => return None,
    };
    let value = value_idx.and_then(|v_idx| {
        if v_idx + 1 < parts.len() {
            Some(parts[v_idx + 1..].join(" "))
        } else {
            None
        }
    });
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_advertised_options() {
        let opts = EngineOptions::default();
        assert!(opts.nullmove);
        assert_eq!(opts.hash_mb, DEFAULT_HASH_MB);
        assert_eq!(opts.threads, 2);
    }

    #[test]
    fn parse_setoption_name_and_value() {
        let parts = ["setoption", "name", "Hash", "value", "256"];
        let (name, value) = parse_setoption(&parts).unwrap();
        assert_eq!(name, "Hash");
        assert_eq!(value.as_deref(), Some("256"));
    }

    #[test]
    fn parse_setoption_multiword_name() {
        let parts = ["setoption", "name", "Clear", "Hash"];
        let (name, value) = parse_setoption(&parts).unwrap();
        assert_eq!(name, "Clear Hash");
        assert!(value.is_none());
    }

    #[test]
    fn hash_is_clamped_and_reallocates() {
        let mut opts = EngineOptions::default();
        let action = opts.apply("Hash", Some("4096"));
        assert_eq!(opts.hash_mb, HASH_MB_MAX);
        assert_eq!(action, Some(OptionAction::ReinitHash(HASH_MB_MAX)));

        opts.apply("Hash", Some("0"));
        assert_eq!(opts.hash_mb, HASH_MB_MIN);
    }

    #[test]
    fn threads_are_clamped() {
        let mut opts = EngineOptions::default();
        opts.apply("Threads", Some("99"));
        assert_eq!(opts.threads, THREADS_MAX);
        opts.apply("Threads", Some("0"));
        assert_eq!(opts.threads, THREADS_MIN);
    }

    #[test]
    fn nullmove_toggles() {
        let mut opts = EngineOptions::default();
        opts.apply("Nullmove", Some("false"));
        assert!(!opts.nullmove);
        opts.apply("Nullmove", Some("True"));
        assert!(opts.nullmove);
    }

    #[test]
    fn unknown_options_change_nothing() {
        let mut opts = EngineOptions::default();
        let before = opts;
        assert!(opts.apply("Elo", Some("1500")).is_none());
        assert_eq!(opts.hash_mb, before.hash_mb);
        assert_eq!(opts.threads, before.threads);
    }
}
