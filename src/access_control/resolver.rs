//! Authorization context resolver
//!
//! Turns an already-verified credential plus the namespace/database a
//! connection asked for into an [`AuthorizationContext`]. Resolution policy:
//!
//! 1. **Root** - unrestricted; the request is recorded but never narrows scope
//! 2. **Namespace** - requires a namespace
//! 3. **Database** - requires a namespace and a database
//! 4. **Scoped** - requires a namespace and a database, and carries claims
//! 5. **None** - no access, nothing else is populated
//!
//! When a credential was issued for a specific namespace (or database), a
//! request outside of it is rejected rather than silently narrowed.

use crate::access_control::claims::Claims;
use crate::access_control::context::{AuthorizationContext, Selection};
use crate::access_control::types::AccessLevel;
use crate::error::{ScopeError, ScopeResult};
use tracing::{debug, trace};

/// Kind of credential presented by a connection, as determined by the
/// credential verifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    Root,
    Namespace,
    Database,
    Scoped,
    None,
}

impl CredentialKind {
    /// Access level granted by this kind of credential
    pub const fn level(self) -> AccessLevel {
        match self {
            CredentialKind::Root => AccessLevel::RootAccess,
            CredentialKind::Namespace => AccessLevel::NamespaceAccess,
            CredentialKind::Database => AccessLevel::DatabaseAccess,
            CredentialKind::Scoped => AccessLevel::ScopedAccess,
            CredentialKind::None => AccessLevel::NoAccess,
        }
    }

    /// Inverse of [`CredentialKind::level`]
    pub const fn from_level(level: AccessLevel) -> Self {
        match level {
            AccessLevel::RootAccess => CredentialKind::Root,
            AccessLevel::NamespaceAccess => CredentialKind::Namespace,
            AccessLevel::DatabaseAccess => CredentialKind::Database,
            AccessLevel::ScopedAccess => CredentialKind::Scoped,
            AccessLevel::NoAccess => CredentialKind::None,
        }
    }
}

/// A credential that an external verifier has already accepted
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedCredential {
    pub kind: CredentialKind,
    /// Attributes extracted from the credential
    pub claims: Claims,
    /// Namespace/database the credential was issued for, if it is bound to one
    pub grant: Selection,
}

impl VerifiedCredential {
    pub fn new(kind: CredentialKind) -> Self {
        Self {
            kind,
            claims: Claims::new(),
            grant: Selection::empty(),
        }
    }

    pub fn root() -> Self {
        Self::new(CredentialKind::Root)
    }

    pub fn namespace() -> Self {
        Self::new(CredentialKind::Namespace)
    }

    pub fn database() -> Self {
        Self::new(CredentialKind::Database)
    }

    pub fn scoped(claims: Claims) -> Self {
        Self::new(CredentialKind::Scoped).with_claims(claims)
    }

    pub fn anonymous() -> Self {
        Self::new(CredentialKind::None)
    }

    /// Bind the credential to the namespace/database it was issued for
    pub fn with_grant(mut self, namespace: Option<&str>, database: Option<&str>) -> Self {
        self.grant = Selection::new(namespace, database);
        self
    }

    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = claims;
        self
    }
}

/// Resolve a verified credential and a requested namespace/database into an
/// authorization context.
///
/// Resolving the same inputs twice yields equal contexts.
pub fn resolve(
    credential: &VerifiedCredential,
    request: &Selection,
) -> ScopeResult<AuthorizationContext> {
    let level = credential.kind.level();

    debug!(
        level = %level,
        namespace = ?request.namespace(),
        database = ?request.database(),
        "Resolving authorization context"
    );

    let context = match credential.kind {
        CredentialKind::Root => {
            trace!("Root credential, request does not narrow scope");
            AuthorizationContext::root(request.clone(), credential.claims.clone())
        }
        CredentialKind::Namespace => {
            let namespace = require_namespace(level, credential, request)?;
            AuthorizationContext::namespace(
                request.clone(),
                credential.claims.clone(),
                namespace.to_string(),
            )
        }
        CredentialKind::Database | CredentialKind::Scoped => {
            let namespace = require_namespace(level, credential, request)?;
            let database = require_database(level, credential, request)?;
            AuthorizationContext::database(
                level,
                request.clone(),
                credential.claims.clone(),
                namespace.to_string(),
                database.to_string(),
            )
        }
        CredentialKind::None => {
            trace!("No valid credential");
            AuthorizationContext::no_access()
        }
    };

    Ok(context)
}

fn require_namespace<'a>(
    level: AccessLevel,
    credential: &VerifiedCredential,
    request: &'a Selection,
) -> ScopeResult<&'a str> {
    let namespace = request.namespace().ok_or(ScopeError::MissingNamespace {
        level: level.label(),
    })?;

    if let Some(granted) = credential.grant.namespace()
        && granted != namespace
    {
        debug!(requested = namespace, granted, "Namespace outside grant");
        return Err(ScopeError::ExceedsGrant {
            field: "namespace",
            requested: namespace.to_string(),
            granted: granted.to_string(),
        });
    }

    Ok(namespace)
}

fn require_database<'a>(
    level: AccessLevel,
    credential: &VerifiedCredential,
    request: &'a Selection,
) -> ScopeResult<&'a str> {
    let database = request.database().ok_or(ScopeError::MissingDatabase {
        level: level.label(),
    })?;

    if let Some(granted) = credential.grant.database()
        && granted != database
    {
        debug!(requested = database, granted, "Database outside grant");
        return Err(ScopeError::ExceedsGrant {
            field: "database",
            requested: database.to_string(),
            granted: granted.to_string(),
        });
    }

    Ok(database)
}
