//! Secrets and proxy configuration loading.
//!
//! Every run needs two cookie values before it may issue a single request:
//! `COOKIE_AEC` and `COOKIE_SOCS`. They come from the process environment
//! (optionally seeded from a `.env` file in the working directory), or, when
//! rotation is requested, from a randomly chosen `.env*` profile file inside
//! `./profiles`. Proxy use is opt-in and requires `PROXY_URL`.
//!
//! All failures here are configuration errors: they happen before any network
//! activity and abort the run with a [`ConfigError`].

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::info;

/// Environment variable holding the AEC cookie value.
pub const ENV_COOKIE_AEC: &str = "COOKIE_AEC";
/// Environment variable holding the SOCS cookie value.
pub const ENV_COOKIE_SOCS: &str = "COOKIE_SOCS";
/// Environment variable holding the proxy URL, read only with `--proxies`.
pub const ENV_PROXY_URL: &str = "PROXY_URL";
/// Directory scanned for `.env*` profile files when `--rotate` is set.
pub const PROFILE_DIR: &str = "./profiles";

/// Errors raised while assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required secret is absent or empty.
    #[error("{0} is required")]
    MissingSecret(&'static str),

    /// `--proxies` was set but `PROXY_URL` is absent or empty.
    #[error("the environment variable PROXY_URL is not defined")]
    MissingProxyUrl,

    /// `--rotate` was set but the profile folder does not exist.
    #[error("--rotate selected but profile folder {} not found", .0.display())]
    ProfileDirMissing(PathBuf),

    /// The profile folder exists but could not be read.
    #[error("failed to read profile folder {}: {source}", .path.display())]
    ProfileDirUnreadable {
        path: PathBuf,
        source: io::Error,
    },

    /// `--rotate` was set but no `.env*` file was available to choose from.
    #[error("--rotate selected but the profile folder does not contain any .env file")]
    NoProfiles,

    /// The chosen profile file could not be parsed or read.
    #[error("failed to load profile {}: {source}", .path.display())]
    ProfileLoad {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

/// The cookie values every engine request is authenticated with.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Value for the `AEC` cookie.
    pub aec: String,
    /// Value for the `SOCS` cookie.
    pub socs: String,
}

impl Secrets {
    /// Read both cookie values from the environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingSecret`] if either variable is absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            aec: require_env(ENV_COOKIE_AEC)?,
            socs: require_env(ENV_COOKIE_SOCS)?,
        })
    }
}

/// Load the run's secrets, honoring the rotation flag.
///
/// Without rotation a `.env` file in the working directory is loaded if
/// present, then the environment is read. With rotation a random `.env*`
/// file from `profile_dir` supplies the variables instead.
pub fn load_secrets(rotate: bool, profile_dir: &Path) -> Result<Secrets, ConfigError> {
    if rotate {
        let candidates = profile_candidates(profile_dir)?;
        load_random_profile(&candidates)?;
    } else {
        // A missing .env file is fine; the variables may already be exported.
        let _ = dotenvy::dotenv();
    }
    Secrets::from_env()
}

/// List the `.env*` files in a profile directory, sorted by name.
///
/// Listing is separated from [`load_random_profile`] so the random selection
/// can be exercised against a known candidate set.
pub fn profile_candidates(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !dir.is_dir() {
        return Err(ConfigError::ProfileDirMissing(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::ProfileDirUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_env = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(".env"));
        if is_env && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// Choose one profile at random and load its variables into the environment.
///
/// Returns the chosen path so the caller can log it.
pub fn load_random_profile(candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    let mut rng = rand::rng();
    let chosen = candidates.choose(&mut rng).ok_or(ConfigError::NoProfiles)?;
    dotenvy::from_path(chosen).map_err(|source| ConfigError::ProfileLoad {
        path: chosen.clone(),
        source,
    })?;
    info!(profile = %chosen.display(), "loaded profile env file");
    Ok(chosen.clone())
}

/// Resolve the proxy URL when proxy use is enabled.
///
/// Returns `Ok(None)` when proxying is off; with proxying on, a missing or
/// empty `PROXY_URL` is a configuration error.
pub fn load_proxy(enabled: bool) -> Result<Option<String>, ConfigError> {
    if !enabled {
        return Ok(None);
    }
    match env::var(ENV_PROXY_URL) {
        Ok(url) if !url.is_empty() => Ok(Some(url)),
        _ => Err(ConfigError::MissingProxyUrl),
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // COOKIE_AEC/COOKIE_SOCS and PROXY_URL are process-global, so each is
    // exercised inside a single test to keep the suite race-free.
    #[test]
    fn test_secrets_from_env() {
        unsafe {
            env::remove_var(ENV_COOKIE_AEC);
            env::remove_var(ENV_COOKIE_SOCS);
        }
        assert!(matches!(
            Secrets::from_env(),
            Err(ConfigError::MissingSecret(ENV_COOKIE_AEC))
        ));

        unsafe {
            env::set_var(ENV_COOKIE_AEC, "aec-value");
            env::set_var(ENV_COOKIE_SOCS, "");
        }
        assert!(matches!(
            Secrets::from_env(),
            Err(ConfigError::MissingSecret(ENV_COOKIE_SOCS))
        ));

        unsafe {
            env::set_var(ENV_COOKIE_SOCS, "socs-value");
        }
        let secrets = Secrets::from_env().unwrap();
        assert_eq!(secrets.aec, "aec-value");
        assert_eq!(secrets.socs, "socs-value");
    }

    #[test]
    fn test_load_proxy() {
        assert!(load_proxy(false).unwrap().is_none());

        unsafe {
            env::remove_var(ENV_PROXY_URL);
        }
        assert!(matches!(load_proxy(true), Err(ConfigError::MissingProxyUrl)));

        unsafe {
            env::set_var(ENV_PROXY_URL, "http://127.0.0.1:8888");
        }
        assert_eq!(
            load_proxy(true).unwrap().as_deref(),
            Some("http://127.0.0.1:8888")
        );
    }

    #[test]
    fn test_profile_candidates_lists_env_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env.1"), "# profile one\n").unwrap();
        fs::write(dir.path().join(".env.2"), "# profile two\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();

        let candidates = profile_candidates(dir.path()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(".env"))
        }));
    }

    #[test]
    fn test_profile_candidates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-profiles");
        assert!(matches!(
            profile_candidates(&missing),
            Err(ConfigError::ProfileDirMissing(_))
        ));
    }

    #[test]
    fn test_load_random_profile_picks_from_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join(".env.a");
        let b = dir.path().join(".env.b");
        fs::write(&a, "# empty profile\n").unwrap();
        fs::write(&b, "# empty profile\n").unwrap();

        let candidates = vec![a.clone(), b.clone()];
        let chosen = load_random_profile(&candidates).unwrap();
        assert!(chosen == a || chosen == b);
    }

    #[test]
    fn test_load_random_profile_empty_candidates() {
        assert!(matches!(
            load_random_profile(&[]),
            Err(ConfigError::NoProfiles)
        ));
    }

    #[test]
    fn test_load_random_profile_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join(".env.gone");
        assert!(matches!(
            load_random_profile(&[gone]),
            Err(ConfigError::ProfileLoad { .. })
        ));
    }
}
