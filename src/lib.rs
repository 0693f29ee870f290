//! # gfs-orders
//!
//! Pulls a user's order history and ordered material numbers from the GFS
//! ordering portal, authenticating with a browser-captured session cookie.
//!
//! ## Modules
//!
//! - `session` - Cookie session lifecycle: persistence, liveness probe, and
//!   interactive browser login orchestrated by a session manager
//! - `client` - Portal HTTP client for order list, order detail, and
//!   nutrition lookups
//! - `extract` - Tolerant extraction of order and material identifiers from
//!   portal payloads
//! - `pipeline` - Order-to-material collection with a configurable failure
//!   policy
//! - `catalog` - Append-only item code -> description JSON cache
//! - `config` - TOML configuration with per-field defaults

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod session;

pub use error::{Error, Result};
