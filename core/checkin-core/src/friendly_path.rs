//! Human-friendly rendering of a working directory.
//!
//! `/home/alice/src/zine` becomes `~alice/src/zine`, and anything under
//! `~alice/public_html` becomes the URL it is served at. Paths that are not
//! inside the home directory are returned as they are.

use crate::config::SiteConfig;
use crate::env::Identity;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Why a path could not be expressed relative to a base at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelativizeError {
    #[error("path is not absolute: {0}")]
    NotAbsolute(PathBuf),
    #[error("paths have different roots: {base} and {target}")]
    DifferentRoots { base: PathBuf, target: PathBuf },
}

/// Why a working directory was left as an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Relativization itself failed.
    NotRelativizable(RelativizeError),
    /// Relativization worked but needs `..` to reach the target.
    OutsideHome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendlyPath {
    PublicUrl(String),
    Home(String),
    Absolute { path: PathBuf, reason: FallbackReason },
}

impl fmt::Display for FriendlyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FriendlyPath::PublicUrl(url) => f.write_str(url),
            FriendlyPath::Home(path) => f.write_str(path),
            FriendlyPath::Absolute { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves `cwd` against `user`'s home directory. First match wins:
/// outside home → absolute path, under the public web dir → URL, else `~user/...`.
pub fn resolve(user: &Identity, cwd: &Path, site: &SiteConfig) -> FriendlyPath {
    let relative = match relativize(&user.home_dir, cwd) {
        Ok(relative) => relative,
        Err(e) => {
            tracing::debug!(error = %e, "Working directory not relative to home");
            return FriendlyPath::Absolute {
                path: cwd.to_path_buf(),
                reason: FallbackReason::NotRelativizable(e),
            };
        }
    };

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.first().is_some_and(|p| p == "..") {
        return FriendlyPath::Absolute {
            path: cwd.to_path_buf(),
            reason: FallbackReason::OutsideHome,
        };
    }

    if parts.first().is_some_and(|p| *p == site.public_dir) {
        return FriendlyPath::PublicUrl(format!(
            "https://{}/~{}/{}",
            site.host,
            user.username,
            parts[1..].join("/")
        ));
    }

    if parts.is_empty() {
        FriendlyPath::Home(user.tilde())
    } else {
        FriendlyPath::Home(format!("{}/{}", user.tilde(), parts.join("/")))
    }
}

/// Lexically computes `target` relative to `base`.
///
/// Both paths are cleaned first (`.` dropped, `..` resolved against the
/// preceding component). The result starts with `..` when `target` is not
/// under `base`, and is empty when they are the same directory.
pub fn relativize(base: &Path, target: &Path) -> Result<PathBuf, RelativizeError> {
    if !base.is_absolute() {
        return Err(RelativizeError::NotAbsolute(base.to_path_buf()));
    }
    if !target.is_absolute() {
        return Err(RelativizeError::NotAbsolute(target.to_path_buf()));
    }

    let base_parts = clean(base);
    let target_parts = clean(target);

    // Prefix (drive/UNC) components must agree before anything else can.
    let base_prefix = base_parts.first().filter(|c| matches!(c, Component::Prefix(_)));
    let target_prefix = target_parts
        .first()
        .filter(|c| matches!(c, Component::Prefix(_)));
    if base_prefix != target_prefix {
        return Err(RelativizeError::DifferentRoots {
            base: base.to_path_buf(),
            target: target.to_path_buf(),
        });
    }

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    Ok(relative)
}

fn clean(path: &Path) -> Vec<Component<'_>> {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }
    parts
}
