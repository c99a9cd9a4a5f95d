// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use std::{collections::BTreeMap, net::IpAddr};

use serde::{Deserialize, Serialize};

use crate::error::{LfsError, Result};

/// Config is the model for the lfsutils configuration file. It names the Lustre tools to run
/// and, optionally, a static table of OSS addresses that is consulted before DNS.
///
/// ```toml
/// lfs = "/usr/bin/lfs"
/// lctl = "/usr/sbin/lctl"
/// sudo = false
///
/// [hosts]
/// "oss01.example.com" = "10.0.0.11"
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub lfs: Option<String>,
    pub lctl: Option<String>,
    /// Whether privileged queries (`lfs check`, `lfs df`) are run through sudo. When unset,
    /// sudo is used unless the process already runs as root.
    pub sudo: Option<bool>,
    #[serde(default)]
    pub hosts: BTreeMap<String, IpAddr>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config from `path`. When no path is given, the default location is used and a
    /// missing file there simply means the built-in defaults apply.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_string(), true),
            None => (crate::default_config_path(), false),
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config file at '{path}', using defaults");
                return Ok(Self::new());
            }
            Err(source) => return Err(LfsError::ConfigRead { path, source }),
        };

        Self::from_toml(&contents).map_err(|source| LfsError::ConfigParse { path, source })
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn lfs_path(&self) -> String {
        self.lfs.clone().unwrap_or_else(crate::default_lfs_path)
    }

    pub fn lctl_path(&self) -> String {
        self.lctl.clone().unwrap_or_else(crate::default_lctl_path)
    }

    pub fn use_sudo(&self) -> bool {
        self.sudo.unwrap_or_else(|| !nix::unistd::Uid::effective().is_root())
    }
}
