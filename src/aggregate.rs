//! Collapse many IPv4 networks into the one smallest block covering all of them.
//!
//! The result is a single enclosing block, so it usually covers addresses that
//! none of the inputs contain. Overlaps and duplicates need no special care.

use log::{debug, trace};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::ipv4::{subnet_mask, Ipv4Cidr, MAX_PREFIX};

/// Lowest network address and highest broadcast address seen so far.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct AddressRange {
    min: u32,
    max: u32,
}

impl AddressRange {
    pub fn of(cidr: &Ipv4Cidr) -> Self {
        let (min, max) = cidr.to_range();
        AddressRange { min, max }
    }

    /// Grow the range to take in `cidr`. Never shrinks.
    pub fn extend(&mut self, cidr: &Ipv4Cidr) {
        let (net, broadcast) = cidr.to_range();
        self.min = self.min.min(net);
        self.max = self.max.max(broadcast);
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn covering_block(&self) -> Ipv4Cidr {
        find_smallest_cidr(self.min, self.max)
    }
}

/// Longest prefix whose aligned block holds both `min` and `max`.
///
/// Falls through to `0.0.0.0/0` when the two differ in the top bit.
pub fn find_smallest_cidr(min: u32, max: u32) -> Ipv4Cidr {
    let mut prefix = MAX_PREFIX;
    while prefix > 0 && min & subnet_mask(prefix) != max & subnet_mask(prefix) {
        trace!("/{} too narrow", prefix);
        prefix -= 1;
    }
    Ipv4Cidr::from_parts(min & subnet_mask(prefix), prefix)
}

/// Smallest single block covering every network in `cidrs`.
pub fn aggregate_cidrs<'a, I>(cidrs: I) -> Result<Ipv4Cidr>
where
    I: IntoIterator<Item = &'a Ipv4Cidr>,
{
    let mut cidrs = cidrs.into_iter();
    let first = cidrs.next().ok_or(Error::EmptyList)?;
    let mut range = AddressRange::of(first);
    debug!("fold {} -> {:?}", first, range);
    for cidr in cidrs {
        range.extend(cidr);
        debug!("fold {} -> {:?}", cidr, range);
    }
    let block = range.covering_block();
    debug!("covering block {}", block);
    Ok(block)
}

/// Text form of [`aggregate_cidrs`]: parse every entry, then aggregate.
///
/// The first malformed entry aborts the whole call.
///
/// ```
/// let block = cidr_aggregator::aggregate(&["213.199.180.192/27", "213.199.183.0/24"]);
/// assert_eq!("213.199.180.0/22", block.unwrap());
/// ```
pub fn aggregate<I, S>(cidrs: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = cidrs
        .into_iter()
        .map(|s| Ipv4Cidr::from_str(s.as_ref()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    aggregate_cidrs(&parsed).map(|block| block.to_string())
}
