// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! rangeset.rs
//!
//! Compact notation for sets of OST indexes, such as "30-50,100-120" or "0-10/2". OST indexes
//! are 16 bit, so a set is stored expanded.

use std::{collections::BTreeSet, fmt, str::FromStr};

/// Error produced when a RangeSet string cannot be parsed.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("invalid rangeset '{input}': {reason}")]
pub struct RangeSetParseError {
    pub input: String,
    pub reason: String,
}

/// The base in which the bounds of a rangeset string are written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Radix {
    Decimal,
    Hexadecimal,
}

impl Radix {
    fn value(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

/// An ordered, deduplicated set of OST indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    indexes: BTreeSet<u16>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rangeset whose bounds are hexadecimal, e.g. "0000, 00D6-00F1, 00FF-01A0".
    pub fn parse_hex(s: &str) -> Result<Self, RangeSetParseError> {
        Self::parse_radix(s, Radix::Hexadecimal)
    }

    pub fn parse_radix(s: &str, radix: Radix) -> Result<Self, RangeSetParseError> {
        let err = |reason: String| RangeSetParseError {
            input: s.to_string(),
            reason,
        };

        let mut set = RangeSet::new();
        if s.trim().is_empty() {
            return Ok(set);
        }

        for subrange in s.split(',') {
            let subrange = subrange.trim();
            if subrange.is_empty() {
                return Err(err("empty range".to_string()));
            }

            let (bounds, step) = match subrange.split_once('/') {
                Some((bounds, step)) => {
                    let step = step
                        .trim()
                        .parse::<u16>()
                        .map_err(|e| err(format!("bad step '{step}': {e}")))?;
                    if step == 0 {
                        return Err(err("step must be greater than zero".to_string()));
                    }
                    (bounds, step)
                }
                None => (subrange, 1),
            };

            let (start, end) = match bounds.split_once('-') {
                Some((start, end)) => (
                    parse_bound(start, radix).map_err(err)?,
                    parse_bound(end, radix).map_err(err)?,
                ),
                None => {
                    let single = parse_bound(bounds, radix).map_err(err)?;
                    (single, single)
                }
            };

            if start > end {
                return Err(err(format!("range start {start} is greater than end {end}")));
            }

            set.indexes.extend((start..=end).step_by(usize::from(step)));
        }

        Ok(set)
    }

    pub fn insert(&mut self, index: u16) -> bool {
        self.indexes.insert(index)
    }

    pub fn contains(&self, index: u16) -> bool {
        self.indexes.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Iterate over the indexes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.indexes.iter().copied()
    }

    pub fn union(&self, other: &RangeSet) -> RangeSet {
        RangeSet {
            indexes: self.indexes.union(&other.indexes).copied().collect(),
        }
    }

    pub fn intersection(&self, other: &RangeSet) -> RangeSet {
        RangeSet {
            indexes: self.indexes.intersection(&other.indexes).copied().collect(),
        }
    }

    /// Collapse the set into inclusive (start, end) runs of consecutive indexes.
    pub fn ranges(&self) -> Vec<(u16, u16)> {
        let mut ranges: Vec<(u16, u16)> = Vec::new();
        for index in self.iter() {
            match ranges.last_mut() {
                Some((_, end)) if u32::from(*end) + 1 == u32::from(index) => *end = index,
                _ => ranges.push((index, index)),
            }
        }
        ranges
    }

    /// Format the set like Display, but with every bound written as a four digit hex OST index.
    pub fn to_hex_string(&self) -> String {
        self.ranges()
            .iter()
            .map(|(start, end)| {
                if start == end {
                    format!("{start:04x}")
                } else {
                    format!("{start:04x}-{end:04x}")
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn parse_bound(bound: &str, radix: Radix) -> Result<u16, String> {
    let bound = bound.trim();
    if bound.is_empty() {
        return Err("missing range bound".to_string());
    }
    if radix == Radix::Hexadecimal && bound.len() > 4 {
        return Err(format!("hex index '{bound}' has more than 4 digits"));
    }
    u16::from_str_radix(bound, radix.value()).map_err(|e| format!("bad index '{bound}': {e}"))
}

impl FromStr for RangeSet {
    type Err = RangeSetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_radix(s, Radix::Decimal)
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (start, end)) in self.ranges().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        Ok(())
    }
}

impl FromIterator<u16> for RangeSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        RangeSet {
            indexes: iter.into_iter().collect(),
        }
    }
}

impl Extend<u16> for RangeSet {
    fn extend<I: IntoIterator<Item = u16>>(&mut self, iter: I) {
        self.indexes.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_ranges_fold() {
        let set: RangeSet = "30-50,100-120".parse().unwrap();
        assert_eq!(set.len(), 42);
        assert!(set.contains(30) && set.contains(50) && set.contains(110));
        assert!(!set.contains(51));
        assert_eq!(set.to_string(), "30-50,100-120");
    }

    #[test]
    fn overlapping_and_unordered_input_is_normalized() {
        let set: RangeSet = " 7, 1-3 ,2-5,9".parse().unwrap();
        assert_eq!(set.to_string(), "1-5,7,9");
    }

    #[test]
    fn step() {
        let set: RangeSet = "0-10/2".parse().unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 2, 4, 6, 8, 10]);
        assert_eq!(set.to_string(), "0,2,4,6,8,10");
    }

    #[test]
    fn hex() {
        let set = RangeSet::parse_hex("0000, 00FF, ff00-FF10, dd23").unwrap();
        assert_eq!(set.to_string(), "0,255,56611,65280-65296");
        assert_eq!(set.to_hex_string(), "0000,00ff,dd23,ff00-ff10");
    }

    #[test]
    fn empty() {
        let set: RangeSet = "  ".parse().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "");
    }

    #[test]
    fn invalid() {
        assert!("1,,2".parse::<RangeSet>().is_err());
        assert!("5-3".parse::<RangeSet>().is_err());
        assert!("a-3".parse::<RangeSet>().is_err());
        assert!("65536".parse::<RangeSet>().is_err());
        assert!("0-10/0".parse::<RangeSet>().is_err());
        assert!("1-".parse::<RangeSet>().is_err());
        assert!(RangeSet::parse_hex("10000").is_err());
        assert!(RangeSet::parse_hex("00G1").is_err());
    }

    #[test]
    fn max_index_does_not_overflow() {
        let set: RangeSet = "65534-65535".parse().unwrap();
        assert_eq!(set.to_string(), "65534-65535");
    }

    #[test]
    fn set_operations() {
        let a: RangeSet = "0-9".parse().unwrap();
        let b: RangeSet = "5-14".parse().unwrap();
        assert_eq!(a.union(&b).to_string(), "0-14");
        assert_eq!(a.intersection(&b).to_string(), "5-9");

        let mut c: RangeSet = [3u16, 1, 2].into_iter().collect();
        c.extend([10, 11]);
        assert!(!c.insert(2));
        assert_eq!(c.to_string(), "1-3,10-11");
    }
}
