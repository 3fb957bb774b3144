//! Authorization context
//!
//! The immutable result of resolving a verified credential against a
//! requested namespace/database.

use crate::access_control::claims::Claims;
use crate::access_control::types::AccessLevel;
use serde::Serialize;

/// Namespace/database pair, either requested by a connection or granted by a
/// credential. An empty name is stored as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    namespace: Option<String>,
    database: Option<String>,
}

impl Selection {
    pub fn new(namespace: Option<&str>, database: Option<&str>) -> Self {
        Self {
            namespace: non_empty(namespace).map(str::to_string),
            database: non_empty(database).map(str::to_string),
        }
    }

    /// Selection with nothing requested
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Resolved authorization for one connection attempt.
///
/// Contexts are only built by [`resolve`](crate::access_control::resolve) and
/// expose no mutators: re-authenticating produces a fresh context.
///
/// Per level, the resolved fields are:
///
/// | level             | namespace | database |
/// |-------------------|-----------|----------|
/// | `RootAccess`      | none      | none     |
/// | `NamespaceAccess` | set       | none     |
/// | `DatabaseAccess`  | set       | set      |
/// | `ScopedAccess`    | set       | set      |
/// | `NoAccess`        | none      | none     |
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorizationContext {
    level: AccessLevel,
    claims: Claims,
    candidate: Selection,
    resolved: Selection,
}

impl AuthorizationContext {
    pub(crate) fn root(candidate: Selection, claims: Claims) -> Self {
        Self {
            level: AccessLevel::RootAccess,
            claims,
            candidate,
            resolved: Selection::empty(),
        }
    }

    pub(crate) fn namespace(candidate: Selection, claims: Claims, namespace: String) -> Self {
        Self {
            level: AccessLevel::NamespaceAccess,
            claims,
            candidate,
            resolved: Selection {
                namespace: Some(namespace),
                database: None,
            },
        }
    }

    /// Build a database-bound context. `level` is either `DatabaseAccess` or
    /// `ScopedAccess`.
    pub(crate) fn database(
        level: AccessLevel,
        candidate: Selection,
        claims: Claims,
        namespace: String,
        database: String,
    ) -> Self {
        debug_assert!(level.requires_database());
        Self {
            level,
            claims,
            candidate,
            resolved: Selection {
                namespace: Some(namespace),
                database: Some(database),
            },
        }
    }

    /// Context for a connection without a valid credential
    pub fn no_access() -> Self {
        Self {
            level: AccessLevel::NoAccess,
            claims: Claims::new(),
            candidate: Selection::empty(),
            resolved: Selection::empty(),
        }
    }

    pub fn level(&self) -> AccessLevel {
        self.level
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn candidate_namespace(&self) -> Option<&str> {
        self.candidate.namespace()
    }

    pub fn candidate_database(&self) -> Option<&str> {
        self.candidate.database()
    }

    pub fn resolved_namespace(&self) -> Option<&str> {
        self.resolved.namespace()
    }

    pub fn resolved_database(&self) -> Option<&str> {
        self.resolved.database()
    }

    pub fn is_authenticated(&self) -> bool {
        self.level != AccessLevel::NoAccess
    }

    /// Check whether this context may perform an operation that requires
    /// `required` access within `namespace`/`database`.
    ///
    /// Root matches any target. A namespace context matches every database in
    /// its namespace. Database and scoped contexts must match both.
    pub fn permits(&self, required: AccessLevel, namespace: &str, database: &str) -> bool {
        if !self.level.at_least(required) {
            return false;
        }

        match self.level {
            AccessLevel::RootAccess => true,
            AccessLevel::NamespaceAccess => self.resolved_namespace() == Some(namespace),
            AccessLevel::DatabaseAccess | AccessLevel::ScopedAccess => {
                self.resolved_namespace() == Some(namespace)
                    && self.resolved_database() == Some(database)
            }
            AccessLevel::NoAccess => required == AccessLevel::NoAccess,
        }
    }
}
