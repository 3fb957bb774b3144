//! Access control types
//!
//! The access-level hierarchy shared by the resolver and downstream query
//! authorization.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Granted scope of authority for a connection.
///
/// Variants are listed from most to least privileged. The ordering is total:
/// `RootAccess > NamespaceAccess > DatabaseAccess > ScopedAccess > NoAccess`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Full cluster authority, no namespace/database restriction
    RootAccess,
    /// Every database within one namespace
    NamespaceAccess,
    /// One database within one namespace
    DatabaseAccess,
    /// One database, further restricted by application-defined claims
    ScopedAccess,
    /// Unauthenticated or denied
    NoAccess,
}

impl AccessLevel {
    /// Privilege rank, higher is more privileged
    const fn rank(self) -> u8 {
        match self {
            AccessLevel::RootAccess => 4,
            AccessLevel::NamespaceAccess => 3,
            AccessLevel::DatabaseAccess => 2,
            AccessLevel::ScopedAccess => 1,
            AccessLevel::NoAccess => 0,
        }
    }

    /// Check whether this level is at least as privileged as `required`
    pub const fn at_least(self, required: AccessLevel) -> bool {
        self.rank() >= required.rank()
    }

    /// Short label used in logs and diagnostics
    pub const fn label(self) -> &'static str {
        match self {
            AccessLevel::RootAccess => "KV",
            AccessLevel::NamespaceAccess => "NS",
            AccessLevel::DatabaseAccess => "DB",
            AccessLevel::ScopedAccess => "SC",
            AccessLevel::NoAccess => "NO",
        }
    }

    /// Try to parse a level from its label (case-insensitive)
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "KV" => Some(AccessLevel::RootAccess),
            "NS" => Some(AccessLevel::NamespaceAccess),
            "DB" => Some(AccessLevel::DatabaseAccess),
            "SC" => Some(AccessLevel::ScopedAccess),
            "NO" => Some(AccessLevel::NoAccess),
            _ => None,
        }
    }

    /// Whether contexts at this level carry a resolved namespace
    pub const fn requires_namespace(self) -> bool {
        matches!(
            self,
            AccessLevel::NamespaceAccess | AccessLevel::DatabaseAccess | AccessLevel::ScopedAccess
        )
    }

    /// Whether contexts at this level carry a resolved database
    pub const fn requires_database(self) -> bool {
        matches!(self, AccessLevel::DatabaseAccess | AccessLevel::ScopedAccess)
    }

    /// All levels, most privileged first
    pub fn all() -> &'static [AccessLevel] {
        &[
            AccessLevel::RootAccess,
            AccessLevel::NamespaceAccess,
            AccessLevel::DatabaseAccess,
            AccessLevel::ScopedAccess,
            AccessLevel::NoAccess,
        ]
    }
}

/// Free-function form of [`AccessLevel::at_least`]
pub const fn at_least(level: AccessLevel, required: AccessLevel) -> bool {
    level.at_least(required)
}

impl PartialOrd for AccessLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccessLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| format!("unknown access level '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for level in AccessLevel::all() {
            let parsed = AccessLevel::try_parse(level.label()).unwrap();
            assert_eq!(*level, parsed);
        }
        assert_eq!(AccessLevel::try_parse("db"), Some(AccessLevel::DatabaseAccess));
        assert_eq!(AccessLevel::try_parse("root"), None);
    }

    #[test]
    fn test_total_order() {
        let levels = AccessLevel::all();
        for window in levels.windows(2) {
            assert!(window[0] > window[1]);
        }
        assert_eq!(levels.iter().max(), Some(&AccessLevel::RootAccess));
        assert_eq!(levels.iter().min(), Some(&AccessLevel::NoAccess));
    }

    #[test]
    fn test_at_least_reflexive() {
        for level in AccessLevel::all() {
            assert!(level.at_least(*level));
        }
    }

    #[test]
    fn test_no_access_dominates_nothing() {
        for level in AccessLevel::all() {
            if *level != AccessLevel::NoAccess {
                assert!(!AccessLevel::NoAccess.at_least(*level));
                assert!(level.at_least(AccessLevel::NoAccess));
            }
        }
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(AccessLevel::RootAccess.to_string(), "KV");
        assert_eq!(AccessLevel::NamespaceAccess.to_string(), "NS");
        assert_eq!(AccessLevel::DatabaseAccess.to_string(), "DB");
        assert_eq!(AccessLevel::ScopedAccess.to_string(), "SC");
        assert_eq!(AccessLevel::NoAccess.to_string(), "NO");
    }
}
