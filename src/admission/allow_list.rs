//! Network allow-list
//!
//! CIDR blocks that may attempt authentication, compiled once from
//! configuration strings.

use crate::error::ConfigError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A single IPv4 or IPv6 network range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidrBlock {
    network: IpAddr,
    prefix: u8,
}

impl CidrBlock {
    /// Parse `addr/prefix` or a bare address.
    ///
    /// A bare address is a single-host block (`/32` or `/128`). Host bits past
    /// the prefix are cleared, so `10.0.0.5/24` becomes `10.0.0.0/24`.
    /// IPv4-mapped IPv6 blocks with a prefix of at least 96 are stored as the
    /// equivalent IPv4 block.
    pub fn parse(entry: &str) -> Result<Self, ConfigError> {
        let entry = entry.trim();
        let invalid = |reason: String| ConfigError::InvalidCidr {
            entry: entry.to_string(),
            reason,
        };

        let (addr, prefix) = match entry.split_once('/') {
            Some((addr, prefix)) => {
                // u8::from_str accepts a leading '+'
                if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid(format!("invalid prefix length: '{}'", prefix)));
                }
                let prefix = prefix
                    .parse::<u8>()
                    .map_err(|e| invalid(format!("invalid prefix length: {}", e)))?;
                (addr, Some(prefix))
            }
            None => (entry, None),
        };

        let addr: IpAddr = addr
            .parse()
            .map_err(|e| invalid(format!("invalid address: {}", e)))?;

        let max = max_prefix(addr);
        let prefix = prefix.unwrap_or(max);
        if prefix > max {
            return Err(invalid(format!(
                "prefix length {} exceeds {}",
                prefix, max
            )));
        }

        let (addr, prefix) = match addr {
            IpAddr::V6(v6) if prefix >= 96 => match v6.to_ipv4_mapped() {
                Some(v4) => (IpAddr::V4(v4), prefix - 96),
                None => (addr, prefix),
            },
            _ => (addr, prefix),
        };

        Ok(Self {
            network: mask(addr, prefix),
            prefix,
        })
    }

    /// Check whether `addr` lies inside this block
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self.network, canonical(addr)) {
            (IpAddr::V4(_), addr @ IpAddr::V4(_)) | (IpAddr::V6(_), addr @ IpAddr::V6(_)) => {
                mask(addr, self.prefix) == self.network
            }
            _ => false,
        }
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// Treat IPv4-mapped IPv6 addresses as plain IPv4
pub(crate) fn canonical(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(addr),
        v4 => v4,
    }
}

const fn max_prefix(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn mask(addr: IpAddr, prefix: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(bits & mask))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(bits & mask))
        }
    }
}

/// Ordered set of network ranges permitted to authenticate.
///
/// An empty list admits every address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkAllowList {
    blocks: Vec<CidrBlock>,
}

impl NetworkAllowList {
    /// Compile configured entries, failing on the first malformed one
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Result<Self, ConfigError> {
        let blocks = entries
            .iter()
            .map(|entry| CidrBlock::parse(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { blocks })
    }

    /// Allow-list that admits every address
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Check whether `addr` falls inside at least one block
    pub fn contains(&self, addr: IpAddr) -> bool {
        self.blocks.is_empty() || self.find_match(addr).is_some()
    }

    /// Return the first block containing `addr`
    pub fn find_match(&self, addr: IpAddr) -> Option<&CidrBlock> {
        self.blocks.iter().find(|block| block.contains(addr))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CidrBlock> {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_ipv4_block() {
        let block = CidrBlock::parse("10.0.0.0/24").unwrap();
        assert_eq!(block.network(), ip("10.0.0.0"));
        assert_eq!(block.prefix(), 24);
        assert_eq!(block.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_parse_clears_host_bits() {
        let block = CidrBlock::parse("10.0.0.5/24").unwrap();
        assert_eq!(block.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_bare_address_is_single_host() {
        let block = CidrBlock::parse("192.168.1.7").unwrap();
        assert_eq!(block.prefix(), 32);
        assert!(block.contains(ip("192.168.1.7")));
        assert!(!block.contains(ip("192.168.1.8")));

        let block = CidrBlock::parse("::1").unwrap();
        assert_eq!(block.prefix(), 128);
        assert!(block.contains(ip("::1")));
    }

    #[test]
    fn test_zero_prefix_matches_family() {
        let block = CidrBlock::parse("0.0.0.0/0").unwrap();
        assert!(block.contains(ip("8.8.8.8")));
        assert!(!block.contains(ip("2001:db8::1")));

        let block = CidrBlock::parse("::/0").unwrap();
        assert!(block.contains(ip("2001:db8::1")));
        assert!(!block.contains(ip("8.8.8.8")));
    }

    #[test]
    fn test_ipv6_block() {
        let block = CidrBlock::parse("2001:db8::/32").unwrap();
        assert!(block.contains(ip("2001:db8:ffff::1")));
        assert!(!block.contains(ip("2001:db9::1")));
    }

    #[test]
    fn test_mapped_addresses_match_ipv4_blocks() {
        let block = CidrBlock::parse("10.0.0.0/24").unwrap();
        assert!(block.contains(ip("::ffff:10.0.0.5")));

        let block = CidrBlock::parse("::ffff:10.0.0.0/120").unwrap();
        assert_eq!(block.to_string(), "10.0.0.0/24");
        assert!(block.contains(ip("10.0.0.200")));
    }

    #[test]
    fn test_parse_errors() {
        for entry in [
            "",
            "10.0.0.0/33",
            "::/129",
            "10.0.0/8",
            "10.0.0.0/x",
            "host/8",
            "10.0.0.0/+24",
            "10.0.0.0/",
            "10.0.0.0/ 24",
            "::1/-0",
        ] {
            let err = CidrBlock::parse(entry).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidCidr { .. }),
                "expected InvalidCidr for {:?}",
                entry
            );
        }
    }

    #[test]
    fn test_empty_list_allows_all() {
        let list = NetworkAllowList::allow_all();
        assert!(list.contains(ip("1.2.3.4")));
        assert!(list.contains(ip("::1")));
    }

    #[test]
    fn test_list_membership() {
        let list = NetworkAllowList::new(&["10.0.0.0/24", "192.168.0.0/16"]).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(ip("192.168.44.1")));
        assert!(!list.contains(ip("172.16.0.1")));
        assert_eq!(
            list.find_match(ip("10.0.0.9")).map(ToString::to_string),
            Some("10.0.0.0/24".to_string())
        );
    }

    #[test]
    fn test_list_rejects_bad_entry() {
        let result = NetworkAllowList::new(&["10.0.0.0/24", "nope"]);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidCidr { entry, .. } if entry == "nope"
        ));
    }
}
