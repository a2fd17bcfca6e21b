//! Process context: who is running, from where, and when.
//!
//! Nothing below the binary reads the environment directly. The binary builds
//! a [`Context`] from [`SystemEnv`] once, and tests build one by hand.

use crate::error::{CheckinError, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// The invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub home_dir: PathBuf,
}

impl Identity {
    pub fn new(username: impl Into<String>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            username: username.into(),
            home_dir: home_dir.into(),
        }
    }

    /// The immutable `~user` token that starts every status.
    pub fn tilde(&self) -> String {
        format!("~{}", self.username)
    }
}

/// Source of process-level facts.
pub trait UserEnv {
    fn current_user(&self) -> Result<Identity>;
    fn working_dir(&self) -> Result<PathBuf>;
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Everything a command needs to know about the running process.
#[derive(Debug, Clone)]
pub struct Context {
    pub user: Identity,
    /// None when the working directory could not be resolved (e.g. it was deleted).
    pub cwd: Option<PathBuf>,
    pub now: DateTime<Utc>,
}

impl Context {
    /// Resolves the current user eagerly; a missing working directory only
    /// matters to commands that ask for it.
    pub fn from_env(env: &dyn UserEnv) -> Result<Self> {
        let user = env.current_user()?;
        let cwd = match env.working_dir() {
            Ok(cwd) => Some(cwd),
            Err(e) => {
                tracing::debug!(error = %e, "Working directory unavailable");
                None
            }
        };
        Ok(Self {
            user,
            cwd,
            now: env.now(),
        })
    }

    pub fn require_cwd(&self) -> Result<&Path> {
        self.cwd.as_deref().ok_or_else(|| {
            CheckinError::WorkingDir(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "working directory unavailable",
            ))
        })
    }
}

/// The real process environment, resolved through the passwd database.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl UserEnv for SystemEnv {
    fn current_user(&self) -> Result<Identity> {
        let (username, home) = lookup_passwd()?;
        let home_dir = if home.as_os_str().is_empty() {
            dirs::home_dir().ok_or_else(|| {
                CheckinError::UserLookup(format!("no home directory for {}", username))
            })?
        } else {
            home
        };
        Ok(Identity { username, home_dir })
    }

    fn working_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(CheckinError::WorkingDir)
    }
}

#[cfg(unix)]
fn lookup_passwd() -> Result<(String, PathBuf)> {
    use std::ffi::{CStr, OsStr};
    use std::os::unix::ffi::OsStrExt;

    // SAFETY: getuid() has no failure modes.
    #[allow(unsafe_code)]
    let uid = unsafe { libc::getuid() };

    let mut buf = vec![0 as libc::c_char; 4096];
    loop {
        // SAFETY: `pwd` is plain old data that getpwuid_r fills in. `buf` outlives
        // every pointer stored into `pwd`, and its length is passed alongside it.
        #[allow(unsafe_code)]
        let (rc, found, pwd) = unsafe {
            let mut pwd: libc::passwd = std::mem::zeroed();
            let mut result: *mut libc::passwd = std::ptr::null_mut();
            let rc = libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result);
            (rc, !result.is_null(), pwd)
        };

        if rc == libc::ERANGE && buf.len() < 1 << 20 {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 {
            return Err(CheckinError::UserLookup(
                std::io::Error::from_raw_os_error(rc).to_string(),
            ));
        }
        if !found {
            return Err(CheckinError::UserLookup(format!(
                "uid {} has no passwd entry",
                uid
            )));
        }

        // SAFETY: on success pw_name and pw_dir point to NUL-terminated strings in `buf`.
        #[allow(unsafe_code)]
        let (name, dir) = unsafe { (CStr::from_ptr(pwd.pw_name), CStr::from_ptr(pwd.pw_dir)) };
        let username = name
            .to_str()
            .map_err(|_| CheckinError::UserLookup(format!("uid {} has a non-UTF-8 name", uid)))?
            .to_string();
        let home = PathBuf::from(OsStr::from_bytes(dir.to_bytes()));
        return Ok((username, home));
    }
}

#[cfg(not(unix))]
fn lookup_passwd() -> Result<(String, PathBuf)> {
    Err(CheckinError::UserLookup(
        "passwd lookup is only supported on unix".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEnv;

    impl UserEnv for FixedEnv {
        fn current_user(&self) -> Result<Identity> {
            Ok(Identity::new("alice", "/home/alice"))
        }

        fn working_dir(&self) -> Result<PathBuf> {
            Ok(PathBuf::from("/home/alice/src"))
        }
    }

    struct NoCwdEnv;

    impl UserEnv for NoCwdEnv {
        fn current_user(&self) -> Result<Identity> {
            Ok(Identity::new("alice", "/home/alice"))
        }

        fn working_dir(&self) -> Result<PathBuf> {
            Err(CheckinError::WorkingDir(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "deleted",
            )))
        }
    }

    struct NoUserEnv;

    impl UserEnv for NoUserEnv {
        fn current_user(&self) -> Result<Identity> {
            Err(CheckinError::UserLookup("nobody home".to_string()))
        }

        fn working_dir(&self) -> Result<PathBuf> {
            Ok(PathBuf::from("/"))
        }
    }

    #[test]
    fn test_context_from_env() {
        let ctx = Context::from_env(&FixedEnv).unwrap();
        assert_eq!(ctx.user.username, "alice");
        assert_eq!(ctx.require_cwd().unwrap(), Path::new("/home/alice/src"));
    }

    #[test]
    fn test_missing_cwd_only_fails_when_required() {
        let ctx = Context::from_env(&NoCwdEnv).unwrap();
        assert!(ctx.cwd.is_none());
        assert!(matches!(
            ctx.require_cwd(),
            Err(CheckinError::WorkingDir(_))
        ));
    }

    #[test]
    fn test_context_propagates_user_lookup_failure() {
        let err = Context::from_env(&NoUserEnv).unwrap_err();
        assert!(matches!(err, CheckinError::UserLookup(_)));
    }

    #[test]
    fn test_tilde() {
        assert_eq!(Identity::new("bob", "/home/bob").tilde(), "~bob");
    }
}
