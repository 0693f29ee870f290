//! Session lifecycle orchestration
//!
//! Ties the cookie store, probe, and interactive login together into one
//! "get me a working session" operation. The fast path (cached session still
//! live) costs exactly one network round trip and touches no files.

use tracing::{debug, info, warn};

use super::cookie::Session;
use super::login::InteractiveLogin;
use super::probe::SessionProbe;
use super::store::CookieStore;
use crate::error::{Error, Result};

pub struct SessionManager<'a> {
    store: &'a CookieStore,
    probe: &'a dyn SessionProbe,
    login: &'a dyn InteractiveLogin,
}

impl<'a> SessionManager<'a> {
    pub fn new(
        store: &'a CookieStore,
        probe: &'a dyn SessionProbe,
        login: &'a dyn InteractiveLogin,
    ) -> Self {
        Self {
            store,
            probe,
            login,
        }
    }

    /// Return a session that currently passes the probe, refreshing through
    /// interactive login at most once. The new session is persisted only
    /// after it has passed the probe.
    pub async fn ensure_valid_session(&self) -> Result<Session> {
        if let Some(cached) = self.store.load().map_err(|e| Error::Other(e.to_string()))? {
            if self.probe.is_authenticated(&cached).await {
                debug!("Cached session is still authenticated");
                return Ok(cached);
            }
            info!("Cached session is stale, refreshing via browser login");
        } else {
            info!("No cached session, starting browser login");
        }

        self.refresh().await
    }

    /// Skip the cached-session fast path and force a fresh login
    pub async fn force_login(&self) -> Result<Session> {
        info!("Forcing a fresh browser login");
        self.refresh().await
    }

    async fn refresh(&self) -> Result<Session> {
        let fresh = self.login.obtain_session().await?;

        if !self.probe.is_authenticated(&fresh).await {
            warn!("Freshly obtained session failed the probe");
            return Err(Error::Authentication(
                "could not obtain a valid authenticated session".to_string(),
            ));
        }

        self.store
            .save(&fresh)
            .map_err(|e| Error::Other(e.to_string()))?;
        info!("New session verified and persisted");
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::login::MockLogin;
    use crate::session::probe::MockSessionProbe;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(dir: &TempDir, contents: Option<&str>) -> CookieStore {
        let path = dir.path().join("cookie.txt");
        if let Some(contents) = contents {
            fs::write(&path, contents).unwrap();
        }
        CookieStore::new(path)
    }

    #[tokio::test]
    async fn test_fast_path_one_probe_no_write_no_login() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, Some("EA_SID=cached\n"));
        let written = fs::metadata(store.path()).unwrap().modified().unwrap();

        let probe = MockSessionProbe::new(vec![true]);
        let login = MockLogin::failing();
        let manager = SessionManager::new(&store, &probe, &login);

        let session = manager.ensure_valid_session().await.unwrap();
        assert_eq!(session.get("EA_SID"), Some("cached"));
        assert_eq!(probe.call_count(), 1);
        assert_eq!(login.call_count(), 0);
        assert_eq!(
            fs::metadata(store.path()).unwrap().modified().unwrap(),
            written
        );
    }

    #[tokio::test]
    async fn test_stale_session_refreshes_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, Some("EA_SID=stale\n"));

        let probe = MockSessionProbe::new(vec![false, true]);
        let login = MockLogin::new(vec![Session::from_header("EA_SID=fresh; XSRF-TOKEN=t")]);
        let manager = SessionManager::new(&store, &probe, &login);

        let session = manager.ensure_valid_session().await.unwrap();
        assert_eq!(session.get("EA_SID"), Some("fresh"));
        assert_eq!(probe.call_count(), 2);
        assert_eq!(login.call_count(), 1);

        let persisted = store.load().unwrap().unwrap();
        assert_eq!(persisted, session);
    }

    #[tokio::test]
    async fn test_missing_store_goes_straight_to_login() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, None);

        let probe = MockSessionProbe::new(vec![true]);
        let login = MockLogin::new(vec![Session::from_header("EA_SID=fresh")]);
        let manager = SessionManager::new(&store, &probe, &login);

        let session = manager.ensure_valid_session().await.unwrap();
        assert_eq!(session.get("EA_SID"), Some("fresh"));
        // only the fresh session was probed
        assert_eq!(probe.call_count(), 1);
    }

    #[tokio::test]
    async fn test_double_failure_is_authentication_error_no_write() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, Some("EA_SID=stale\n"));

        let probe = MockSessionProbe::new(vec![false, false]);
        let login = MockLogin::new(vec![Session::from_header("EA_SID=alsobad")]);
        let manager = SessionManager::new(&store, &probe, &login);

        let err = manager.ensure_valid_session().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(login.call_count(), 1);

        // the stale session was not overwritten
        let persisted = store.load().unwrap().unwrap();
        assert_eq!(persisted.get("EA_SID"), Some("stale"));
    }

    #[tokio::test]
    async fn test_login_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, None);

        let probe = MockSessionProbe::new(vec![]);
        let login = MockLogin::failing();
        let manager = SessionManager::new(&store, &probe, &login);

        assert!(matches!(
            manager.ensure_valid_session().await,
            Err(Error::Login(_))
        ));
    }

    #[tokio::test]
    async fn test_force_login_skips_cached_session() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, Some("EA_SID=cached\n"));

        let probe = MockSessionProbe::new(vec![true]);
        let login = MockLogin::new(vec![Session::from_header("EA_SID=forced")]);
        let manager = SessionManager::new(&store, &probe, &login);

        let session = manager.force_login().await.unwrap();
        assert_eq!(session.get("EA_SID"), Some("forced"));
        assert_eq!(login.call_count(), 1);
    }
}
