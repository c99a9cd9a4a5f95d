// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

pub mod commands;
pub mod config;
pub mod error;
pub mod lfs;
pub mod lookup;
pub mod ost;
pub mod rangeset;
pub mod resolve;
pub mod test_env;

pub use error::{LfsError, Result};
pub use rangeset::RangeSet;

/// Gets the path of the configuration file used when none is given on the command line.
pub fn default_config_path() -> String {
    match std::env::var("LFSUTILS_CONFIG") {
        Ok(conf) => conf,
        Err(_) => "/etc/lfsutils/lfsutils.conf".to_string(),
    }
}

pub fn default_lfs_path() -> String {
    match std::env::var("LFSUTILS_LFS") {
        Ok(lfs) => lfs,
        Err(_) => "/usr/bin/lfs".to_string(),
    }
}

pub fn default_lctl_path() -> String {
    match std::env::var("LFSUTILS_LCTL") {
        Ok(lctl) => lctl,
        Err(_) => "/usr/sbin/lctl".to_string(),
    }
}
