//! Admission gate
//!
//! Decides whether a remote address may attempt authentication at all. The
//! decision runs before any credential is looked at and fails closed on
//! anything it cannot parse.

use crate::admission::allow_list::NetworkAllowList;
use crate::error::AdmissionDenied;
use std::net::{IpAddr, SocketAddr};
use tracing::{debug, trace};

/// Admission decision for a remote address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Deny,
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Admission::Allow => "ALLOW",
            Admission::Deny => "DENY",
        }
    }
}

/// Network admission gate over an immutable allow-list
#[derive(Debug, Clone, Default)]
pub struct AdmissionGate {
    allow_list: NetworkAllowList,
}

impl AdmissionGate {
    pub fn new(allow_list: NetworkAllowList) -> Self {
        Self { allow_list }
    }

    /// Gate that admits every address
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn allow_list(&self) -> &NetworkAllowList {
        &self.allow_list
    }

    /// Decide admission for a remote address string
    pub fn decide(&self, remote: &str) -> Admission {
        let Some(addr) = parse_remote(remote) else {
            debug!(address = remote, "Unparseable remote address, denying");
            return Admission::Deny;
        };

        self.decide_addr(addr)
    }

    /// Decide admission for an already parsed address
    pub fn decide_addr(&self, addr: IpAddr) -> Admission {
        if self.allow_list.is_empty() {
            trace!(address = %addr, "Empty allow-list, admitting");
            return Admission::Allow;
        }

        match self.allow_list.find_match(addr) {
            Some(block) => {
                trace!(address = %addr, range = %block, "Address admitted");
                Admission::Allow
            }
            None => {
                debug!(address = %addr, "Address not in allow-list");
                Admission::Deny
            }
        }
    }

    /// Boolean form of [`AdmissionGate::decide`]
    pub fn admit(&self, remote: &str) -> bool {
        self.decide(remote).is_allowed()
    }

    /// Check admission, returning an error for the connection layer if denied
    pub fn require(&self, remote: &str) -> Result<(), AdmissionDenied> {
        match self.decide(remote) {
            Admission::Allow => Ok(()),
            Admission::Deny => Err(AdmissionDenied::new(remote)),
        }
    }
}

/// Check `remote` against `allow_list` without building a gate
pub fn admit(remote: &str, allow_list: &NetworkAllowList) -> bool {
    parse_remote(remote).is_some_and(|addr| allow_list.contains(addr))
}

/// Parse a bare IP address or a socket address such as `10.0.0.5:8000` or
/// `[::1]:8000`
pub fn parse_remote(remote: &str) -> Option<IpAddr> {
    let remote = remote.trim();
    remote
        .parse::<IpAddr>()
        .ok()
        .or_else(|| remote.parse::<SocketAddr>().ok().map(|s| s.ip()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(entries: &[&str]) -> AdmissionGate {
        AdmissionGate::new(NetworkAllowList::new(entries).unwrap())
    }

    #[test]
    fn test_parse_remote_forms() {
        assert_eq!(parse_remote("10.0.0.5"), Some("10.0.0.5".parse().unwrap()));
        assert_eq!(parse_remote("10.0.0.5:8000"), Some("10.0.0.5".parse().unwrap()));
        assert_eq!(parse_remote("[::1]:8000"), Some("::1".parse().unwrap()));
        assert_eq!(parse_remote(" ::1 "), Some("::1".parse().unwrap()));
        assert_eq!(parse_remote("not-an-ip"), None);
        assert_eq!(parse_remote(""), None);
    }

    #[test]
    fn test_decide() {
        let gate = gate(&["10.0.0.0/24"]);
        assert_eq!(gate.decide("10.0.0.5"), Admission::Allow);
        assert_eq!(gate.decide("10.1.0.5"), Admission::Deny);
        assert_eq!(gate.decide("not-an-ip"), Admission::Deny);
    }

    #[test]
    fn test_allow_all_still_rejects_garbage() {
        let gate = AdmissionGate::allow_all();
        assert!(gate.admit("203.0.113.9"));
        assert!(!gate.admit("garbage"));
    }

    #[test]
    fn test_require() {
        let gate = gate(&["127.0.0.1"]);
        assert!(gate.require("127.0.0.1:5432").is_ok());

        let err = gate.require("127.0.0.2").unwrap_err();
        assert_eq!(err.address, "127.0.0.2");
    }

    #[test]
    fn test_admission_labels() {
        assert_eq!(Admission::Allow.as_str(), "ALLOW");
        assert_eq!(Admission::Deny.as_str(), "DENY");
    }
}
