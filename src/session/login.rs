//! Interactive browser login
//!
//! Logging in is a human-in-the-loop step: a visible browser opens on the
//! portal login page and the flow blocks until the user finishes signing in.
//! The trait keeps that dependency injectable so the session manager can be
//! tested with canned sessions.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::process::Command;
use tracing::{debug, info};

use super::cookie::Session;
use crate::error::{Error, Result};

#[async_trait]
pub trait InteractiveLogin: Send + Sync {
    /// Block until a fresh authenticated session is available. There is no
    /// timeout; cancellation is only by process termination.
    async fn obtain_session(&self) -> Result<Session>;
}

/// Runs an external helper that drives the actual browser. The helper opens
/// the portal login page, waits for the user to complete login, then prints
/// the captured cookies for the portal domain to stdout, one `name=value`
/// per line. Captured cookies are filtered to the portal allow-list.
pub struct BrowserLogin {
    command: String,
}

impl BrowserLogin {
    pub fn new(command: String) -> Self {
        Self { command }
    }
}

#[async_trait]
impl InteractiveLogin for BrowserLogin {
    async fn obtain_session(&self) -> Result<Session> {
        let parts = shell_words::split(&self.command)
            .map_err(|e| Error::Config(format!("Invalid login command: {e}")))?;
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| Error::Config("Login command is empty".to_string()))?;

        info!("Launching browser login helper: {}", self.command);
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::Login(format!("Failed to run login helper: {e}")))?;

        if !output.status.success() {
            return Err(Error::Login(format!(
                "Login helper exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let pairs = stdout.lines().filter_map(|line| {
            let line = line.trim();
            line.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
        });
        let session = Session::from_pairs_filtered(pairs);

        if session.is_empty() {
            return Err(Error::Login(
                "Login helper produced no cookies for the portal domain".to_string(),
            ));
        }

        debug!("Captured {} cookies from browser login", session.len());
        Ok(session)
    }
}

/// Scripted login for tests: returns queued sessions in order, or fails
/// when the queue is empty.
pub struct MockLogin {
    sessions: Mutex<Vec<Session>>,
    calls: AtomicUsize,
}

impl MockLogin {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InteractiveLogin for MockLogin {
    async fn obtain_session(&self) -> Result<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.is_empty() {
            Err(Error::Login("mock login exhausted".to_string()))
        } else {
            Ok(sessions.remove(0))
        }
    }
}
