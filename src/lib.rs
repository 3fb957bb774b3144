//! Database boundary access control
//!
//! Decides, for every inbound connection, whether the remote address may
//! authenticate at all and, if so, what scope of authority the presented
//! credential resolves to.
//!
//! ## Features
//!
//! - **Network admission gate** over IPv4/IPv6 CIDR allow-lists, failing closed
//!   on unparseable addresses
//! - **Hierarchical access levels** - root, namespace, database, scoped, none -
//!   with a total privilege order
//! - **Authorization contexts** whose namespace/database invariants are fixed
//!   at construction
//! - **Layered configuration** via TOML files and environment variables, with
//!   atomic snapshot reload
//!
//! ## Access Model
//!
//! ```text
//! remote address → admission gate → verified credential → authorization context
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [auth]
//! user = "root"
//! # password from SCOPEGATE__AUTH__PASS
//! addr = ["10.0.0.0/8", "::1"]    # empty admits every address
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

pub mod access_control;
pub mod admission;
pub mod config;
pub mod error;
pub mod gatekeeper;
pub mod util;

// Re-export main types
pub use access_control::{AccessLevel, AuthorizationContext, VerifiedCredential, at_least};
pub use admission::{AdmissionGate, NetworkAllowList};
pub use config::{Settings, load_settings};
pub use error::{AppError, Result};
pub use gatekeeper::{Gatekeeper, SharedGatekeeper};
