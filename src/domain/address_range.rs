// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPv4 Address Range Value Object
//!
//! An inclusive interval of IPv4 addresses. Ranges are created by parsing CIDR
//! notation or a dotted-quad pair and are never mutated afterwards; the subnet
//! allocator only slices them into aligned child blocks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

use crate::config::HostReservation;

/// Address range validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressRangeError {
    #[error("Invalid address range format: {0}")]
    Format(String),

    #[error("Range start {first} is after range end {last}")]
    InvertedBounds { first: Ipv4Addr, last: Ipv4Addr },

    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("{first}-{last} cannot be expressed as a single CIDR block")]
    NotCidrAligned { first: Ipv4Addr, last: Ipv4Addr },

    #[error("Block size {0} is not a power of two")]
    InvalidBlockSize(u64),

    #[error("No {size}-address block fits at or after {start}")]
    BlockOutOfRange { start: Ipv4Addr, size: u64 },
}

/// Inclusive IPv4 address interval
///
/// Invariants:
/// - `first <= last`
/// - Immutable once constructed
///
/// The canonical string form is CIDR notation (`10.0.0.0/24`) when the range
/// is exactly one CIDR block and a dotted-quad pair (`10.0.0.0-10.0.0.5`)
/// otherwise. Serde uses the same forms.
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::domain::AddressRange;
///
/// let range: AddressRange = "10.1.0.0/16".parse().unwrap();
/// assert_eq!(range.size(), 65_536);
/// assert_eq!(range.prefix_length(), Some(16));
///
/// let pair: AddressRange = "10.0.0.0-10.0.0.5".parse().unwrap();
/// assert!(pair.to_cidr().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AddressRange {
    first: u32,
    last: u32,
}

impl AddressRange {
    /// Create a range from raw `u32` bounds
    pub fn new(first: u32, last: u32) -> Result<Self, AddressRangeError> {
        if first > last {
            return Err(AddressRangeError::InvertedBounds {
                first: Ipv4Addr::from(first),
                last: Ipv4Addr::from(last),
            });
        }
        Ok(Self { first, last })
    }

    /// Create a range from dotted-quad bounds
    pub fn from_bounds(first: Ipv4Addr, last: Ipv4Addr) -> Result<Self, AddressRangeError> {
        Self::new(u32::from(first), u32::from(last))
    }

    /// Create a range from a network address and prefix length
    ///
    /// The address must not have host bits set.
    pub fn from_cidr(network: Ipv4Addr, prefix_length: u8) -> Result<Self, AddressRangeError> {
        if prefix_length > 32 {
            return Err(AddressRangeError::InvalidPrefixLength(prefix_length));
        }
        let size = block_size(prefix_length);
        let first = u64::from(u32::from(network));
        if first % size != 0 {
            return Err(AddressRangeError::Format(format!(
                "{}/{} has host bits set",
                network, prefix_length
            )));
        }
        Ok(Self {
            first: first as u32,
            last: (first + size - 1) as u32,
        })
    }

    /// The `/prefix_length` block that contains `address`
    ///
    /// Host bits are masked off rather than rejected; prefix lengths above 32
    /// are treated as 32.
    pub fn containing_block(address: Ipv4Addr, prefix_length: u8) -> Self {
        let size = block_size(prefix_length.min(32));
        let first = u64::from(u32::from(address)) & !(size - 1);
        Self {
            first: first as u32,
            last: (first + size - 1) as u32,
        }
    }

    /// Parse CIDR notation or a `first-last` dotted-quad pair
    pub fn parse(input: impl AsRef<str>) -> Result<Self, AddressRangeError> {
        let input = input.as_ref().trim();

        if let Some((addr_str, prefix_str)) = input.split_once('/') {
            let network = parse_address(addr_str, input)?;
            let prefix_str = prefix_str.trim();
            if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(AddressRangeError::Format(input.to_string()));
            }
            let prefix_length = prefix_str
                .parse::<u8>()
                .map_err(|_| AddressRangeError::Format(input.to_string()))?;
            Self::from_cidr(network, prefix_length)
        } else if let Some((first_str, last_str)) = input.split_once('-') {
            let first = parse_address(first_str, input)?;
            let last = parse_address(last_str, input)?;
            Self::from_bounds(first, last)
        } else {
            Err(AddressRangeError::Format(input.to_string()))
        }
    }

    /// First address as an integer
    pub fn first(&self) -> u32 {
        self.first
    }

    /// Last address as an integer
    pub fn last(&self) -> u32 {
        self.last
    }

    pub fn first_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.first)
    }

    pub fn last_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.last)
    }

    /// Number of addresses in the range
    ///
    /// A `u64` so that `0.0.0.0/0` (2^32 addresses) is representable.
    pub fn size(&self) -> u64 {
        u64::from(self.last) - u64::from(self.first) + 1
    }

    /// Prefix length if the range is exactly one CIDR block
    pub fn prefix_length(&self) -> Option<u8> {
        let size = self.size();
        if size.is_power_of_two() && u64::from(self.first) % size == 0 {
            Some((32 - size.trailing_zeros()) as u8)
        } else {
            None
        }
    }

    pub fn is_cidr_block(&self) -> bool {
        self.prefix_length().is_some()
    }

    /// Check whether an address falls inside the range
    pub fn contains(&self, address: Ipv4Addr) -> bool {
        let address = u32::from(address);
        self.first <= address && address <= self.last
    }

    /// Check whether two ranges share at least one address
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    /// Check whether `other` lies entirely inside this range
    pub fn encloses(&self, other: &AddressRange) -> bool {
        self.first <= other.first && other.last <= self.last
    }

    /// Check whether a `size`-address block aligned at `first` fits here
    ///
    /// True iff `size` is a power of two, `first` is a multiple of `size` and
    /// the block does not exceed the range.
    pub fn contains_aligned(&self, size: u64) -> bool {
        size.is_power_of_two() && u64::from(self.first) % size == 0 && size <= self.size()
    }

    /// First `size`-aligned block starting at or after `first`
    ///
    /// The returned block is not clipped to this range; callers compare its end
    /// against [`AddressRange::last`] themselves.
    pub fn next_aligned_block(&self, size: u64) -> Result<AddressRange, AddressRangeError> {
        if !size.is_power_of_two() {
            return Err(AddressRangeError::InvalidBlockSize(size));
        }
        let start = align_up(u64::from(self.first), size);
        let end = start + size - 1;
        if end > u64::from(u32::MAX) {
            return Err(AddressRangeError::BlockOutOfRange {
                start: self.first_address(),
                size,
            });
        }
        Ok(Self {
            first: start as u32,
            last: end as u32,
        })
    }

    /// Lazily enumerate the addresses left after provider reservations
    ///
    /// The first `reserved_leading` and last `reserved_trailing` addresses are
    /// skipped. The iterator is empty when the reservations cover the range.
    pub fn usable_hosts(&self, reserved_leading: u32, reserved_trailing: u32) -> UsableHosts {
        let start = u64::from(self.first) + u64::from(reserved_leading);
        let end = (u64::from(self.last) + 1).saturating_sub(u64::from(reserved_trailing));
        UsableHosts {
            next: start,
            end: end.max(start),
        }
    }

    /// [`AddressRange::usable_hosts`] with a configured reservation
    pub fn usable_hosts_with(&self, reservation: &HostReservation) -> UsableHosts {
        self.usable_hosts(reservation.leading, reservation.trailing)
    }

    /// CIDR notation, failing for ranges that are not a single block
    pub fn to_cidr(&self) -> Result<String, AddressRangeError> {
        match self.prefix_length() {
            Some(prefix) => Ok(format!("{}/{}", self.first_address(), prefix)),
            None => Err(AddressRangeError::NotCidrAligned {
                first: self.first_address(),
                last: self.last_address(),
            }),
        }
    }
}

/// Number of addresses in a block with the given prefix length (`prefix <= 32`)
pub(crate) fn block_size(prefix_length: u8) -> u64 {
    1u64 << (32 - u32::from(prefix_length))
}

/// Round `value` up to a multiple of the power-of-two `size`
pub(crate) fn align_up(value: u64, size: u64) -> u64 {
    (value + size - 1) & !(size - 1)
}

fn parse_address(part: &str, input: &str) -> Result<Ipv4Addr, AddressRangeError> {
    Ipv4Addr::from_str(part.trim()).map_err(|_| AddressRangeError::Format(input.to_string()))
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix_length() {
            Some(prefix) => write!(f, "{}/{}", self.first_address(), prefix),
            None => write!(f, "{}-{}", self.first_address(), self.last_address()),
        }
    }
}

impl FromStr for AddressRange {
    type Err = AddressRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AddressRange {
    type Error = AddressRangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AddressRange> for String {
    fn from(range: AddressRange) -> Self {
        range.to_string()
    }
}

/// Lazy, restartable sequence of usable host addresses
///
/// Cloning the iterator restarts enumeration from the clone point; calling
/// [`AddressRange::usable_hosts`] again restarts from the beginning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsableHosts {
    next: u64,
    end: u64,
}

impl UsableHosts {
    /// Number of addresses not yet yielded
    pub fn remaining(&self) -> u64 {
        self.end - self.next
    }
}

impl Iterator for UsableHosts {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let address = Ipv4Addr::from(self.next as u32);
        self.next += 1;
        Some(address)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl DoubleEndedIterator for UsableHosts {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(Ipv4Addr::from(self.end as u32))
    }
}

impl FusedIterator for UsableHosts {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10.0.0.0/24", 0x0A00_0000, 0x0A00_00FF ; "cidr")]
    #[test_case("10.0.0.0-10.0.0.5", 0x0A00_0000, 0x0A00_0005 ; "pair")]
    #[test_case(" 192.168.0.0/29 ", 0xC0A8_0000, 0xC0A8_0007 ; "trimmed")]
    #[test_case("0.0.0.0/0", 0, u32::MAX ; "everything")]
    #[test_case("10.1.2.3/32", 0x0A01_0203, 0x0A01_0203 ; "single host")]
    fn test_parse_valid(input: &str, first: u32, last: u32) {
        let range = AddressRange::parse(input).unwrap();
        assert_eq!(range.first(), first);
        assert_eq!(range.last(), last);
    }

    #[test_case("" ; "empty")]
    #[test_case("10.0.0.0" ; "no prefix or pair")]
    #[test_case("10.0.0/24" ; "short address")]
    #[test_case("10.0.0.0/abc" ; "bad prefix")]
    #[test_case("10.0.0.0/+24" ; "signed prefix")]
    #[test_case("10.0.0.0/" ; "missing prefix")]
    #[test_case("999.0.0.0/8" ; "octet overflow")]
    #[test_case("10.0.0.1/24" ; "host bits set")]
    #[test_case("10.0.0.0-nope" ; "bad pair end")]
    fn test_parse_format_error(input: &str) {
        assert!(matches!(
            AddressRange::parse(input),
            Err(AddressRangeError::Format(_))
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_prefix_and_inverted_pair() {
        assert_eq!(
            AddressRange::parse("10.0.0.0/33"),
            Err(AddressRangeError::InvalidPrefixLength(33))
        );
        assert!(matches!(
            AddressRange::parse("10.0.0.9-10.0.0.1"),
            Err(AddressRangeError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn test_containing_block_masks_host_bits() {
        let block = AddressRange::containing_block(Ipv4Addr::new(10, 7, 3, 9), 16);
        assert_eq!(block.to_string(), "10.7.0.0/16");
        let host = AddressRange::containing_block(Ipv4Addr::new(10, 7, 3, 9), 40);
        assert_eq!(host.to_string(), "10.7.3.9/32");
    }

    #[test]
    fn test_size_and_prefix() {
        let everything = AddressRange::parse("0.0.0.0/0").unwrap();
        assert_eq!(everything.size(), 1 << 32);
        assert_eq!(everything.prefix_length(), Some(0));

        let vnet = AddressRange::parse("10.3.0.0-10.3.255.255").unwrap();
        assert_eq!(vnet.prefix_length(), Some(16));
        assert_eq!(vnet.to_cidr().unwrap(), "10.3.0.0/16");
    }

    #[test]
    fn test_to_cidr_not_aligned() {
        let misaligned = AddressRange::parse("10.0.0.8-10.0.0.23").unwrap();
        assert_eq!(misaligned.size(), 16);
        assert_eq!(
            misaligned.to_cidr(),
            Err(AddressRangeError::NotCidrAligned {
                first: Ipv4Addr::new(10, 0, 0, 8),
                last: Ipv4Addr::new(10, 0, 0, 23),
            })
        );
        assert_eq!(misaligned.to_string(), "10.0.0.8-10.0.0.23");
    }

    #[test]
    fn test_contains_aligned() {
        let range = AddressRange::parse("10.0.0.64/26").unwrap();
        assert!(range.contains_aligned(64));
        assert!(range.contains_aligned(8));
        assert!(!range.contains_aligned(128)); // larger than the range
        assert!(!range.contains_aligned(24)); // not a power of two
        assert!(!range.contains_aligned(0));

        let offset = AddressRange::parse("10.0.0.8-10.0.0.255").unwrap();
        assert!(offset.contains_aligned(8));
        assert!(!offset.contains_aligned(16));
    }

    #[test]
    fn test_next_aligned_block() {
        let range = AddressRange::parse("10.0.0.8-10.0.0.255").unwrap();
        assert_eq!(
            range.next_aligned_block(64).unwrap(),
            AddressRange::parse("10.0.0.64/26").unwrap()
        );
        assert_eq!(
            range.next_aligned_block(8).unwrap(),
            AddressRange::parse("10.0.0.8/29").unwrap()
        );
        assert_eq!(
            range.next_aligned_block(12),
            Err(AddressRangeError::InvalidBlockSize(12))
        );

        let top = AddressRange::parse("255.255.255.250-255.255.255.255").unwrap();
        assert!(matches!(
            top.next_aligned_block(16),
            Err(AddressRangeError::BlockOutOfRange { .. })
        ));
    }

    #[test]
    fn test_usable_hosts_skip_reserved() {
        let subnet = AddressRange::parse("10.1.1.0/29").unwrap();
        let hosts: Vec<Ipv4Addr> = subnet.usable_hosts(4, 1).collect();
        assert_eq!(
            hosts,
            vec![
                Ipv4Addr::new(10, 1, 1, 4),
                Ipv4Addr::new(10, 1, 1, 5),
                Ipv4Addr::new(10, 1, 1, 6),
            ]
        );
    }

    #[test]
    fn test_usable_hosts_restartable_and_double_ended() {
        let subnet = AddressRange::parse("10.1.1.0/28").unwrap();
        let hosts = subnet.usable_hosts(4, 1);
        assert_eq!(hosts.size_hint(), (11, Some(11)));

        let first_pass: Vec<_> = hosts.clone().collect();
        let second_pass: Vec<_> = hosts.clone().collect();
        assert_eq!(first_pass, second_pass);

        let mut reversed = hosts;
        assert_eq!(reversed.next_back(), Some(Ipv4Addr::new(10, 1, 1, 14)));
        assert_eq!(reversed.next(), Some(Ipv4Addr::new(10, 1, 1, 4)));
        assert_eq!(reversed.remaining(), 9);
    }

    #[test]
    fn test_usable_hosts_fully_reserved() {
        let tiny = AddressRange::parse("10.0.0.0/30").unwrap();
        assert_eq!(tiny.usable_hosts(4, 1).count(), 0);
        assert_eq!(tiny.usable_hosts(0, 10).count(), 0);
    }

    #[test]
    fn test_usable_hosts_with_reservation() {
        let subnet = AddressRange::parse("10.0.0.0/29").unwrap();
        let reservation = HostReservation {
            leading: 1,
            trailing: 0,
        };
        assert_eq!(subnet.usable_hosts_with(&reservation).count(), 7);
    }

    #[test]
    fn test_overlap_and_enclosure() {
        let parent = AddressRange::parse("10.0.0.0/16").unwrap();
        let child = AddressRange::parse("10.0.3.0/24").unwrap();
        let other = AddressRange::parse("10.1.0.0/16").unwrap();

        assert!(parent.encloses(&child));
        assert!(parent.overlaps(&child));
        assert!(!parent.overlaps(&other));
        assert!(parent.contains(Ipv4Addr::new(10, 0, 255, 255)));
        assert!(!parent.contains(Ipv4Addr::new(10, 1, 0, 0)));
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let range = AddressRange::parse("10.2.0.0/16").unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\"10.2.0.0/16\"");

        let back: AddressRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);

        assert!(serde_json::from_str::<AddressRange>("\"10.2.0.1/16\"").is_err());
    }
}
