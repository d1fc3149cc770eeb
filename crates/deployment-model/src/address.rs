//! Address parsing helpers
//!
//! Manifests and persisted rows write addresses either bare (`10.0.0.5`) or
//! with a host prefix (`10.0.0.5/32`). Static pools additionally accept
//! inclusive ranges written `"10.0.0.5 - 10.0.0.9"`.

use crate::error::ModelError;
use ipnetwork::IpNetwork;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Largest number of addresses a single static range entry may expand to
pub const MAX_STATIC_RANGE: u128 = 65_536;

/// Parse a single address, dropping any prefix length
///
/// # Errors
///
/// Returns [`ModelError::InvalidAddress`] when the text is not an IPv4 or
/// IPv6 address.
pub fn parse_address(value: &str) -> Result<IpAddr, ModelError> {
    let trimmed = value.trim();
    trimmed
        .parse::<IpNetwork>()
        .map(|network| network.ip())
        .map_err(|_| ModelError::InvalidAddress(trimmed.to_string()))
}

/// Parse a subnet range in CIDR notation
///
/// # Errors
///
/// Returns [`ModelError::InvalidRange`] when the text is not valid CIDR.
pub fn parse_range(value: &str) -> Result<IpNetwork, ModelError> {
    let trimmed = value.trim();
    trimmed
        .parse::<IpNetwork>()
        .map_err(|_| ModelError::InvalidRange(trimmed.to_string()))
}

/// Expand static pool entries into an ordered address list
///
/// Each entry is either one address or an inclusive `start - end` range.
/// Order follows the manifest; ranges expand in ascending order.
///
/// # Errors
///
/// Returns an error for unparsable addresses, reversed or mixed-family
/// ranges, and ranges larger than [`MAX_STATIC_RANGE`].
pub fn parse_static_entries<S: AsRef<str>>(entries: &[S]) -> Result<Vec<IpAddr>, ModelError> {
    let mut addresses = Vec::new();
    for entry in entries {
        let entry = entry.as_ref();
        match entry.split_once('-') {
            Some((start, end)) => {
                let start = parse_address(start)?;
                let end = parse_address(end)?;
                addresses.extend(expand_range(entry, start, end)?);
            }
            None => addresses.push(parse_address(entry)?),
        }
    }
    Ok(addresses)
}

fn expand_range(entry: &str, start: IpAddr, end: IpAddr) -> Result<Vec<IpAddr>, ModelError> {
    let invalid = || ModelError::InvalidStaticRange(entry.trim().to_string());

    let (first, last) = match (start, end) {
        (IpAddr::V4(a), IpAddr::V4(b)) => (u128::from(u32::from(a)), u128::from(u32::from(b))),
        (IpAddr::V6(a), IpAddr::V6(b)) => (u128::from(a), u128::from(b)),
        _ => return Err(invalid()),
    };
    if first > last {
        return Err(invalid());
    }
    if last - first >= MAX_STATIC_RANGE {
        return Err(ModelError::StaticRangeTooLarge {
            range: entry.trim().to_string(),
            limit: MAX_STATIC_RANGE,
        });
    }

    (first..=last)
        .map(|bits| match start {
            IpAddr::V4(_) => u32::try_from(bits)
                .map(|v4| IpAddr::V4(Ipv4Addr::from(v4)))
                .map_err(|_| invalid()),
            IpAddr::V6(_) => Ok(IpAddr::V6(Ipv6Addr::from(bits))),
        })
        .collect()
}
