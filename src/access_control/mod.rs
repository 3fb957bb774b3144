//! Access control module
//!
//! Hierarchical authorization model for connections at the database boundary.
//!
//! ## Access Levels
//!
//! From most to least privileged:
//!
//! | level             | label | scope                                   |
//! |-------------------|-------|-----------------------------------------|
//! | `RootAccess`      | `KV`  | whole cluster                           |
//! | `NamespaceAccess` | `NS`  | one namespace, all of its databases     |
//! | `DatabaseAccess`  | `DB`  | one database                            |
//! | `ScopedAccess`    | `SC`  | one database, narrowed by claims        |
//! | `NoAccess`        | `NO`  | nothing                                 |
//!
//! Downstream components gate an operation with [`at_least`] plus a match on
//! the resolved namespace/database, or in one step with
//! [`AuthorizationContext::permits`].

pub mod claims;
pub mod context;
pub mod resolver;
pub mod types;

pub use claims::{ClaimValue, Claims, claims_from_json};
pub use context::{AuthorizationContext, Selection};
pub use resolver::{CredentialKind, VerifiedCredential, resolve};
pub use types::{AccessLevel, at_least};
