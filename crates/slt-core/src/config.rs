//! Pipeline configuration read from `SLT_*` environment variables.

use std::path::PathBuf;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_STORE_PATH: &str = "~/.slt/slt.db";

pub const ENV_WORKERS: &str = "SLT_WORKERS";
pub const ENV_PARALLEL: &str = "SLT_PARALLEL_EXTRACT";
pub const ENV_STORE_PATH: &str = "SLT_STORE_PATH";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Worker threads for extraction; never below 1.
    pub workers: usize,
    /// Parse files on a rayon pool; sequential when false.
    pub parallel: bool,
    pub store_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            parallel: true,
            store_path: expand_tilde(DEFAULT_STORE_PATH),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let workers = lookup(ENV_WORKERS)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_WORKERS)
            .max(1);

        let parallel = match lookup(ENV_PARALLEL) {
            Some(val) => {
                let v = val.trim().to_lowercase();
                !matches!(v.as_str(), "0" | "false" | "no" | "off")
            }
            None => true,
        };

        let store_path = lookup(ENV_STORE_PATH)
            .filter(|v| !v.trim().is_empty())
            .map(|v| expand_tilde(v.trim()))
            .unwrap_or_else(|| expand_tilde(DEFAULT_STORE_PATH));

        Self {
            workers,
            parallel,
            store_path,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Expand a leading `~` to `$HOME`.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            let mut expanded = PathBuf::from(home);
            if path.len() > 2 {
                expanded.push(&path[2..]);
            }
            return expanded;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> PipelineConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PipelineConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.workers, DEFAULT_WORKERS);
        assert!(cfg.parallel);
        assert_eq!(cfg.store_path, expand_tilde(DEFAULT_STORE_PATH));
    }

    #[test]
    fn parses_overrides() {
        let cfg = config(&[
            (ENV_WORKERS, " 8 "),
            (ENV_PARALLEL, "Off"),
            (ENV_STORE_PATH, "/tmp/slt.db"),
        ]);
        assert_eq!(cfg.workers, 8);
        assert!(!cfg.parallel);
        assert_eq!(cfg.store_path, PathBuf::from("/tmp/slt.db"));
    }

    #[test]
    fn workers_never_zero() {
        assert_eq!(config(&[(ENV_WORKERS, "0")]).workers, 1);
        assert_eq!(config(&[(ENV_WORKERS, "many")]).workers, DEFAULT_WORKERS);
        assert_eq!(PipelineConfig::default().with_workers(0).workers, 1);
    }

    #[test]
    fn parallel_is_truthy_unless_disabled() {
        for value in ["1", "yes", "anything"] {
            assert!(config(&[(ENV_PARALLEL, value)]).parallel);
        }
        for value in ["0", "false", "NO", " off "] {
            assert!(!config(&[(ENV_PARALLEL, value)]).parallel);
        }
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/var/slt.db"), PathBuf::from("/var/slt.db"));
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }
}
