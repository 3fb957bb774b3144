//! Network admission control
//!
//! The first check every inbound connection goes through. An address is
//! admitted if it falls inside any configured range; an empty allow-list
//! admits everyone.
//!
//! ## Example Configuration
//!
//! ```toml
//! [auth]
//! addr = ["10.0.0.0/8", "192.168.1.20", "::1"]
//! ```

pub mod allow_list;
pub mod gate;

pub use allow_list::{CidrBlock, NetworkAllowList};
pub use gate::{Admission, AdmissionGate, admit, parse_remote};
