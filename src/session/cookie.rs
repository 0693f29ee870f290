//! Session value type
//!
//! A `Session` is the authenticated identity: a set of named cookie values
//! for the portal domain plus the anti-forgery token carried in the
//! `XSRF-TOKEN` cookie. Sessions are replaced wholesale on refresh, never
//! mutated in place.

use std::collections::BTreeMap;
use std::fmt;

/// Cookie carrying the anti-forgery token
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Cookie names relevant to the portal domain. Interactive login filters
/// the browser's cookie jar down to this list.
pub const COOKIE_ALLOW_LIST: &[&str] = &[
    "GCLB",
    "EA_UID",
    "GOR",
    "XSRF-TOKEN",
    "__Secure-GORDONORDERING2",
    "EA_SESSION_SAMPLED",
    "EA_SID",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

impl Session {
    /// Parse a `name=value; name=value` header string. Fragments without an
    /// `=` are skipped; a duplicated name keeps the last value seen, which
    /// matches how the portal's own requests resolve duplicates.
    pub fn from_header(raw: &str) -> Self {
        let mut cookies = BTreeMap::new();
        for fragment in raw.split(';') {
            let fragment = fragment.trim();
            if let Some((name, value)) = fragment.split_once('=') {
                if !name.is_empty() {
                    cookies.insert(name.to_string(), value.to_string());
                }
            }
        }
        Self { cookies }
    }

    /// Build from name/value pairs, keeping only allow-listed names
    pub fn from_pairs_filtered<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut cookies = BTreeMap::new();
        for (name, value) in pairs {
            let name = name.into();
            if COOKIE_ALLOW_LIST.contains(&name.as_str()) {
                cookies.insert(name, value.into());
            }
        }
        Self { cookies }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Encode as a `Cookie:` header value
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Anti-forgery token, if the session carries one. Requests without it
    /// simply omit the `x-xsrf-token` header.
    pub fn xsrf_token(&self) -> Option<&str> {
        self.cookies.get(XSRF_COOKIE).map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header_value())
    }
}
