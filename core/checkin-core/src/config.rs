//! Configuration loading for checkin.
//!
//! A deployment describes where home directories live, which host serves
//! `public_html`, and which status labels exist. Everything has a default, so
//! a missing config file is the normal case.
//!
//! Lookup order when no explicit path is given:
//! 1. `$XDG_CONFIG_HOME/checkin/config.json` (per-user overrides)
//! 2. `/etc/checkin/config.json` (host-wide)

use crate::error::{CheckinError, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/checkin/config.json";
pub const DEFAULT_FRESHNESS_DAYS: u32 = 14;
pub const DEFAULT_LABEL: &str = "checkin";

/// A named kind of status. Each label owns one hidden file per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// File name inside each home directory, e.g. `.checkin`.
    pub file_name: String,
    /// Question shown by the interactive prompt. `{user}` expands to `~name`.
    pub prompt: String,
}

impl Label {
    pub fn new(name: &str, file_name: &str, prompt: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
            prompt: prompt.to_string(),
        }
    }

    pub fn prompt_for(&self, username: &str) -> String {
        self.prompt.replace("{user}", &format!("~{}", username))
    }
}

fn default_labels() -> Vec<Label> {
    vec![
        Label::new("checkin", ".checkin", "What's {user} up to?"),
        Label::new("venture", ".venture", "What's {user} venturing into?"),
    ]
}

/// Public web settings used for profile links and `public_html` URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub host: String,
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "tilde.town".to_string(),
            public_dir: "public_html".to_string(),
        }
    }
}

impl SiteConfig {
    /// `https://<host>/~<user>/`
    pub fn profile_url(&self, username: &str) -> String {
        format!("https://{}/~{}/", self.host, username)
    }
}

/// What `set` does when the interactive prompt is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelPolicy {
    /// Leave the existing status file untouched.
    #[default]
    Keep,
    /// Treat cancellation as empty input and remove the status.
    Clear,
    /// Save whatever was typed before cancelling.
    Submit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckinConfig {
    /// Directory whose children are home directories (default: /home)
    pub users_root: PathBuf,
    pub site: SiteConfig,
    pub freshness_days: u32,
    /// Permission bits applied to written status files.
    pub file_mode: u32,
    pub on_cancel: CancelPolicy,
    pub labels: Vec<Label>,
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            users_root: PathBuf::from("/home"),
            site: SiteConfig::default(),
            freshness_days: DEFAULT_FRESHNESS_DAYS,
            file_mode: 0o644,
            on_cancel: CancelPolicy::default(),
            labels: default_labels(),
        }
    }
}

impl CheckinConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist and parse. Implicit locations are optional;
    /// a malformed implicit file is logged and skipped.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for path in implicit_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "Loaded config");
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring config file; using defaults");
                }
            }
        }

        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CheckinError::Io {
            context: "reading config".to_string(),
            source: e,
        })?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| CheckinError::ConfigMalformed {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;
        if config.labels.is_empty() {
            return Err(CheckinError::ConfigMalformed {
                path: path.to_path_buf(),
                details: "at least one label is required".to_string(),
            });
        }
        Ok(config)
    }

    pub fn label(&self, name: &str) -> Result<&Label> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| CheckinError::UnknownLabel(name.to_string()))
    }
}

fn implicit_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("checkin").join("config.json"));
    }
    paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_have_both_labels() {
        let config = CheckinConfig::default();
        assert_eq!(config.label("checkin").unwrap().file_name, ".checkin");
        assert_eq!(config.label("venture").unwrap().file_name, ".venture");
        assert_eq!(config.freshness_days, 14);
        assert_eq!(config.on_cancel, CancelPolicy::Keep);
    }

    #[test]
    fn test_unknown_label() {
        let config = CheckinConfig::default();
        assert!(matches!(
            config.label("mood"),
            Err(CheckinError::UnknownLabel(name)) if name == "mood"
        ));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"users_root": "/srv/home", "site": {"host": "example.club"}, "on_cancel": "clear"}"#,
        )
        .unwrap();

        let config = CheckinConfig::load(Some(&path)).unwrap();
        assert_eq!(config.users_root, PathBuf::from("/srv/home"));
        assert_eq!(config.site.host, "example.club");
        assert_eq!(config.site.public_dir, "public_html");
        assert_eq!(config.on_cancel, CancelPolicy::Clear);
        assert_eq!(config.labels.len(), 2);
    }

    #[test]
    fn test_explicit_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = CheckinConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CheckinError::ConfigMalformed { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = CheckinConfig::load(Some(&temp.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, CheckinError::Io { .. }));
    }

    #[test]
    fn test_empty_labels_rejected() {
        let err = CheckinConfig::from_json(Path::new("x.json"), r#"{"labels": []}"#).unwrap_err();
        assert!(matches!(err, CheckinError::ConfigMalformed { .. }));
    }

    #[test]
    fn test_prompt_for_expands_user() {
        let label = Label::new("checkin", ".checkin", "What's {user} up to?");
        assert_eq!(label.prompt_for("alice"), "What's ~alice up to?");
    }

    #[test]
    fn test_profile_url() {
        let site = SiteConfig::default();
        assert_eq!(site.profile_url("alice"), "https://tilde.town/~alice/");
    }
}
