//! Cookie file persistence
//!
//! The session is persisted as a single UTF-8 line of `name=value; ...`
//! pairs with a trailing newline. Load is lenient: a missing, empty, or
//! unparseable file means "no session" rather than an error.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::cookie::Session;

pub struct CookieStore {
    path: PathBuf,
}

impl CookieStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if a usable one exists
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            debug!("No cookie file at {}", self.path.display());
            return Ok(None);
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Cannot read cookie file {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        let session = Session::from_header(contents.trim());
        if session.is_empty() {
            warn!("Cookie file {} is empty or unparseable", self.path.display());
            return Ok(None);
        }

        debug!("Loaded session with {} cookies", session.len());
        Ok(Some(session))
    }

    /// Overwrite the cookie file with the given session. Writes to a temp
    /// file and renames so a crash never leaves a half-written file.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create cookie file directory")?;
        }

        let temp = self.path.with_extension("tmp");
        fs::write(&temp, format!("{}\n", session.header_value()))
            .context("Failed to write temp cookie file")?;
        fs::rename(&temp, &self.path).context("Failed to rename cookie file")?;

        debug!("Persisted session to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("cookie.txt"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("cookie.txt"));

        let session = Session::from_header("EA_SID=abc; XSRF-TOKEN=tok");
        store.save(&session).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, session);

        // single line with trailing newline
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.ends_with('\n'));
        assert_eq!(raw.trim().lines().count(), 1);
    }

    #[test]
    fn test_unparseable_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookie.txt");
        fs::write(&path, "this is not a cookie line\n").unwrap();

        let store = CookieStore::new(path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_empty_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookie.txt");
        fs::write(&path, "").unwrap();

        let store = CookieStore::new(path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("cookie.txt"));

        store.save(&Session::from_header("EA_SID=old")).unwrap();
        store.save(&Session::from_header("EA_SID=new")).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.get("EA_SID"), Some("new"));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("nested/deeper/cookie.txt"));
        store.save(&Session::from_header("A=1")).unwrap();
        assert!(store.load().unwrap().is_some());
    }
}
