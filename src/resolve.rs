// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use std::{
    collections::BTreeMap,
    net::{IpAddr, ToSocketAddrs},
};

use log::debug;

use crate::error::{LfsError, Result};

/// Name service lookups needed to translate OST connection addresses into OSS host names and
/// back.
pub trait Resolver {
    /// Reverse lookup: the host name of an address.
    fn hostname(&self, addr: &IpAddr) -> Result<String>;

    /// Forward lookup: every address a host name resolves to.
    fn addresses(&self, hostname: &str) -> Result<Vec<IpAddr>>;
}

/// Resolver that consults a static host table first and falls back to the system resolver.
#[derive(Debug, Default, Clone)]
pub struct HostResolver {
    hosts: BTreeMap<String, IpAddr>,
}

impl HostResolver {
    pub fn new(hosts: BTreeMap<String, IpAddr>) -> Self {
        Self { hosts }
    }
}

impl Resolver for HostResolver {
    fn hostname(&self, addr: &IpAddr) -> Result<String> {
        if let Some((name, _)) = self.hosts.iter().find(|(_, a)| *a == addr) {
            return Ok(name.clone());
        }

        debug!("reverse lookup of {addr}");
        let name = dns_lookup::lookup_addr(addr).map_err(|source| LfsError::Resolve {
            host: addr.to_string(),
            source,
        })?;
        if name.is_empty() {
            return Err(LfsError::NotFound(format!(
                "No hostname found for IP address {addr}"
            )));
        }
        Ok(name)
    }

    fn addresses(&self, hostname: &str) -> Result<Vec<IpAddr>> {
        if hostname.is_empty() {
            return Err(LfsError::InvalidArgument("hostname is empty".to_string()));
        }
        if let Some(addr) = self.hosts.get(hostname) {
            return Ok(vec![*addr]);
        }

        debug!("forward lookup of {hostname}");
        let mut addrs: Vec<IpAddr> = (hostname, 0)
            .to_socket_addrs()
            .map_err(|source| LfsError::Resolve {
                host: hostname.to_string(),
                source,
            })?
            .map(|sock| sock.ip())
            .collect();
        addrs.sort();
        addrs.dedup();

        if addrs.is_empty() {
            return Err(LfsError::NotFound(format!(
                "No IP address received for hostname {hostname}"
            )));
        }
        Ok(addrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> HostResolver {
        HostResolver::new(BTreeMap::from([
            ("oss01.example.com".to_string(), "10.0.0.11".parse().unwrap()),
            ("oss02.example.com".to_string(), "10.0.0.12".parse().unwrap()),
        ]))
    }

    #[test]
    fn static_table() {
        let r = resolver();
        assert_eq!(
            r.hostname(&"10.0.0.12".parse().unwrap()).unwrap(),
            "oss02.example.com"
        );
        assert_eq!(
            r.addresses("oss01.example.com").unwrap(),
            vec!["10.0.0.11".parse::<IpAddr>().unwrap()]
        );
    }

    #[test]
    fn system_fallback_for_literal_address() {
        let r = resolver();
        assert_eq!(
            r.addresses("127.0.0.1").unwrap(),
            vec!["127.0.0.1".parse::<IpAddr>().unwrap()]
        );
    }

    #[test]
    fn empty_hostname() {
        assert!(matches!(resolver().addresses(""), Err(LfsError::InvalidArgument(_))));
    }
}
