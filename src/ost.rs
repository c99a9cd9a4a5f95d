// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use crate::error::{LfsError, Result};

pub const MIN_OST_INDEX: i64 = 0;
pub const MAX_OST_INDEX: i64 = 65535;

/// Check that a signed index (as reported by `lfs getstripe` or given by a user) is a valid
/// OST index.
pub fn checked_index(index: i64) -> Result<u16> {
    if !(MIN_OST_INDEX..=MAX_OST_INDEX).contains(&index) {
        return Err(LfsError::InvalidOstIndex(index));
    }
    u16::try_from(index).map_err(|_| LfsError::InvalidOstIndex(index))
}

/// Format an OST index the way Lustre does in target names, e.g. 28 -> "001c".
pub fn to_ost_hex(index: u16) -> String {
    format!("{index:04x}")
}

/// Parameter name for the connection uuid of a single OST as seen from this client.
pub fn ost_param_name(fsname: &str, index: u16) -> String {
    format!("osc.{fsname}-OST{}-osc-*.ost_conn_uuid", to_ost_hex(index))
}

/// Parameter glob matching the connection uuids of every OST in a filesystem.
pub fn ost_param_glob(fsname: &str) -> String {
    format!("osc.{fsname}-OST*-osc-*.ost_conn_uuid")
}

/// Get the index encoded in a component name such as "OST001c" or "MDT0000".
pub fn component_index(name: &str) -> Result<u16> {
    let hex = name
        .get(3..)
        .filter(|hex| !hex.is_empty())
        .ok_or_else(|| LfsError::Parse(format!("no index in component name '{name}'")))?;
    u16::from_str_radix(hex, 16)
        .map_err(|e| LfsError::Parse(format!("bad index in component name '{name}': {e}")))
}
