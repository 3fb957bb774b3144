//! Gatekeeper
//!
//! Compiled, immutable snapshot of the settings that drive admission and
//! scope resolution, plus a handle for publishing new snapshots at runtime.
//!
//! A connection attempt goes through [`Gatekeeper::authorize`]: the admission
//! gate runs first and rejects the attempt before any credential is examined,
//! then the verified credential is resolved into an [`AuthorizationContext`].

use crate::access_control::{AuthorizationContext, Selection, VerifiedCredential, resolve};
use crate::admission::{AdmissionGate, NetworkAllowList};
use crate::config::Settings;
use crate::error::{AdmissionDenied, ConfigError, Result};
use crate::util::SecretString;
use arc_swap::ArcSwap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

/// Master username and password used to recognize root credentials
#[derive(Debug, Clone)]
pub struct MasterCredentials {
    user: String,
    pass: SecretString,
}

impl MasterCredentials {
    pub fn new(user: impl Into<String>, pass: SecretString) -> Self {
        Self {
            user: user.into(),
            pass,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Check a presented username/password pair against the master pair
    pub fn recognizes(&self, user: &str, pass: &str) -> bool {
        // Evaluate both so a wrong username costs the same as a wrong password
        let user_ok = bool::from(self.user.as_bytes().ct_eq(user.as_bytes()));
        let pass_ok = self.pass.matches(pass);
        user_ok & pass_ok
    }
}

/// Immutable admission and resolution state built once from settings
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    gate: AdmissionGate,
    master: MasterCredentials,
}

impl Gatekeeper {
    pub fn new(gate: AdmissionGate, master: MasterCredentials) -> Self {
        Self { gate, master }
    }

    /// Compile the allow-list and master credentials from settings
    pub fn from_settings(settings: &Settings) -> std::result::Result<Self, ConfigError> {
        let allow_list = NetworkAllowList::new(&settings.auth.addr)?;
        let (user, pass) = settings.auth.master_credentials()?;

        debug!(
            ranges = allow_list.len(),
            user = %user,
            "Compiled gatekeeper settings"
        );

        Ok(Self::new(
            AdmissionGate::new(allow_list),
            MasterCredentials::new(user, pass),
        ))
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn master(&self) -> &MasterCredentials {
        &self.master
    }

    /// Admission check for the connection layer
    pub fn admit(&self, remote: &str) -> std::result::Result<(), AdmissionDenied> {
        self.gate.require(remote)
    }

    pub fn recognizes_master(&self, user: &str, pass: &str) -> bool {
        self.master.recognizes(user, pass)
    }

    /// Admit `remote`, then resolve `credential` against `request`
    pub fn authorize(
        &self,
        remote: &str,
        credential: &VerifiedCredential,
        request: &Selection,
    ) -> Result<AuthorizationContext> {
        self.admit(remote)?;

        let context = resolve(credential, request)
            .inspect_err(|e| debug!(address = remote, error = %e, "Scope resolution failed"))?;

        debug!(
            address = remote,
            level = %context.level(),
            namespace = ?context.resolved_namespace(),
            database = ?context.resolved_database(),
            "Connection authorized"
        );

        Ok(context)
    }
}

/// Shared, atomically replaceable [`Gatekeeper`].
///
/// Readers get a whole snapshot; a reload never exposes a partially updated
/// allow-list to an in-flight attempt.
#[derive(Debug)]
pub struct SharedGatekeeper {
    inner: ArcSwap<Gatekeeper>,
}

impl SharedGatekeeper {
    pub fn new(gatekeeper: Gatekeeper) -> Self {
        Self {
            inner: ArcSwap::from_pointee(gatekeeper),
        }
    }

    /// Current snapshot
    pub fn current(&self) -> Arc<Gatekeeper> {
        self.inner.load_full()
    }

    /// Publish a new snapshot
    pub fn reload(&self, gatekeeper: Gatekeeper) {
        info!(
            ranges = gatekeeper.gate().allow_list().len(),
            "Publishing new gatekeeper settings"
        );
        self.inner.store(Arc::new(gatekeeper));
    }

    /// Compile `settings` and publish them. On error the current snapshot is
    /// left in place.
    pub fn reload_from_settings(&self, settings: &Settings) -> std::result::Result<(), ConfigError> {
        let gatekeeper = Gatekeeper::from_settings(settings)?;
        self.reload(gatekeeper);
        Ok(())
    }
}
