// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! lookup.rs
//!
//! Mapping between OST indexes and the OSS hosts that serve them.
//!
//! The OST -> OSS relation is taken from the connection uuids a Lustre client holds for each
//! OST: every OST is reached through the NID of the server currently serving it. Host names are
//! then obtained from those addresses through a `Resolver`.

use std::{
    collections::{BTreeMap, HashMap},
    net::IpAddr,
};

use log::{debug, warn};

use crate::{error::Result, lfs::LfsUtils, rangeset::RangeSet, resolve::Resolver};

/// The OSTs of `rangeset` that have no connection in `conn_uuids`.
pub fn missing_osts(conn_uuids: &BTreeMap<u16, IpAddr>, rangeset: &RangeSet) -> RangeSet {
    rangeset
        .iter()
        .filter(|ost| !conn_uuids.contains_key(ost))
        .collect()
}

/// Group the OSTs of `rangeset` by the host serving them.
///
/// OST indexes that are not part of the filesystem are reported once, as a set, and skipped.
/// Every server address is resolved only once.
pub fn oss_by_ost_rangeset(
    conn_uuids: &BTreeMap<u16, IpAddr>,
    rangeset: &RangeSet,
    resolver: &dyn Resolver,
) -> Result<BTreeMap<String, RangeSet>> {
    let missing = missing_osts(conn_uuids, rangeset);
    if !missing.is_empty() {
        warn!("OSTs {missing} not found in filesystem, skipping");
    }

    let mut hostnames: HashMap<IpAddr, String> = HashMap::new();
    let mut oss_with_osts: BTreeMap<String, RangeSet> = BTreeMap::new();

    for ost in rangeset.iter() {
        let Some(addr) = conn_uuids.get(&ost) else {
            continue;
        };

        let oss = match hostnames.get(addr) {
            Some(name) => name.clone(),
            None => {
                let name = resolver.hostname(addr)?;
                debug!("resolved {addr} to {name}");
                hostnames.insert(*addr, name.clone());
                name
            }
        };

        oss_with_osts.entry(oss).or_default().insert(ost);
    }

    Ok(oss_with_osts)
}

/// For every host in `hosts`, collect the OSTs it serves. Hosts keep their order; hosts that serve
/// no OST get an empty set.
pub fn ost_by_oss_hosts<I, S>(
    conn_uuids: &BTreeMap<u16, IpAddr>,
    hosts: I,
    resolver: &dyn Resolver,
) -> Result<Vec<(String, RangeSet)>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    hosts
        .into_iter()
        .map(|host| {
            let host: String = host.into();
            let addrs = resolver.addresses(&host)?;
            let osts: RangeSet = conn_uuids
                .iter()
                .filter(|(_, addr)| addrs.contains(addr))
                .map(|(ost, _)| *ost)
                .collect();
            Ok((host, osts))
        })
        .collect()
}

/// Look up the host serving a single OST of `fsname`.
pub fn lookup_oss_by_ost(
    lfs: &LfsUtils,
    resolver: &dyn Resolver,
    fsname: &str,
    ost: u16,
) -> Result<String> {
    resolver.hostname(&lfs.ost_conn_uuid(fsname, ost)?)
}

pub fn lookup_oss_by_ost_rangeset(
    lfs: &LfsUtils,
    resolver: &dyn Resolver,
    fsname: &str,
    rangeset: &RangeSet,
) -> Result<BTreeMap<String, RangeSet>> {
    let conn_uuids = lfs.ost_conn_uuid_map(fsname)?;
    oss_by_ost_rangeset(&conn_uuids, rangeset, resolver)
}

pub fn lookup_ost_by_oss_nodeset(
    lfs: &LfsUtils,
    resolver: &dyn Resolver,
    fsname: &str,
    nodeset: &nodeset::NodeSet,
) -> Result<Vec<(String, RangeSet)>> {
    let conn_uuids = lfs.ost_conn_uuid_map(fsname)?;
    ost_by_oss_hosts(&conn_uuids, nodeset.iter(), resolver)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::LfsError;

    /// Resolver over a fixed table that counts reverse lookups.
    struct TableResolver {
        table: Vec<(&'static str, &'static str)>,
        reverse_lookups: Cell<usize>,
    }

    impl TableResolver {
        fn new() -> Self {
            Self {
                table: vec![
                    ("oss01", "10.0.0.11"),
                    ("oss02", "10.0.0.12"),
                    ("oss03", "10.0.0.13"),
                    ("oss03", "192.168.0.13"),
                ],
                reverse_lookups: Cell::new(0),
            }
        }
    }

    impl Resolver for TableResolver {
        fn hostname(&self, addr: &IpAddr) -> Result<String> {
            self.reverse_lookups.set(self.reverse_lookups.get() + 1);
            self.table
                .iter()
                .find(|(_, a)| a.parse::<IpAddr>().unwrap() == *addr)
                .map(|(name, _)| name.to_string())
                .ok_or_else(|| LfsError::NotFound(format!("no name for {addr}")))
        }

        fn addresses(&self, hostname: &str) -> Result<Vec<IpAddr>> {
            let addrs: Vec<IpAddr> = self
                .table
                .iter()
                .filter(|(name, _)| *name == hostname)
                .map(|(_, a)| a.parse().unwrap())
                .collect();
            if addrs.is_empty() {
                return Err(LfsError::NotFound(format!("unknown host {hostname}")));
            }
            Ok(addrs)
        }
    }

    fn conn_uuids() -> BTreeMap<u16, IpAddr> {
        BTreeMap::from([
            (0, "10.0.0.11".parse().unwrap()),
            (1, "10.0.0.12".parse().unwrap()),
            (2, "10.0.0.11".parse().unwrap()),
            (3, "10.0.0.12".parse().unwrap()),
            (4, "192.168.0.13".parse().unwrap()),
            (5, "10.0.0.13".parse().unwrap()),
        ])
    }

    #[test]
    fn oss_by_rangeset_groups_by_server() {
        let resolver = TableResolver::new();
        let osts: RangeSet = "0-3".parse().unwrap();
        let result = oss_by_ost_rangeset(&conn_uuids(), &osts, &resolver).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["oss01"].to_string(), "0,2");
        assert_eq!(result["oss02"].to_string(), "1,3");
        assert_eq!(resolver.reverse_lookups.get(), 2);
    }

    #[test]
    fn oss_by_rangeset_skips_unknown_osts() {
        let resolver = TableResolver::new();
        let osts: RangeSet = "4-100".parse().unwrap();
        let result = oss_by_ost_rangeset(&conn_uuids(), &osts, &resolver).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result["oss03"].to_string(), "4-5");
    }

    #[test]
    fn missing_osts_are_collected_into_one_set() {
        let osts: RangeSet = "0,2,4-100,200".parse().unwrap();
        assert_eq!(missing_osts(&conn_uuids(), &osts).to_string(), "6-100,200");

        let osts: RangeSet = "0-5".parse().unwrap();
        assert!(missing_osts(&conn_uuids(), &osts).is_empty());
    }

    #[test]
    fn oss_by_rangeset_propagates_resolver_errors() {
        let resolver = TableResolver::new();
        let mut map = conn_uuids();
        map.insert(6, "10.9.9.9".parse().unwrap());
        let osts: RangeSet = "6".parse().unwrap();
        assert!(oss_by_ost_rangeset(&map, &osts, &resolver).is_err());
    }

    #[test]
    fn ost_by_hosts_keeps_order_and_empty_hosts() {
        let resolver = TableResolver::new();
        let mut map = conn_uuids();
        map.retain(|_, addr| addr.to_string() != "10.0.0.12");

        let result = ost_by_oss_hosts(&map, ["oss03", "oss01", "oss02"], &resolver).unwrap();

        let printed: Vec<(String, String)> = result
            .into_iter()
            .map(|(host, osts)| (host, osts.to_string()))
            .collect();
        assert_eq!(
            printed,
            vec![
                ("oss03".to_string(), "4-5".to_string()),
                ("oss01".to_string(), "0,2".to_string()),
                ("oss02".to_string(), "".to_string()),
            ]
        );
    }

    #[test]
    fn ost_by_hosts_unknown_host() {
        let resolver = TableResolver::new();
        assert!(ost_by_oss_hosts(&conn_uuids(), ["oss99"], &resolver).is_err());
    }
}
