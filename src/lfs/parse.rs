// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! parse.rs
//!
//! Parsers for the text printed by `lctl` and `lfs`. They only take the captured output, so they
//! can be run against saved command output as well.

use std::{collections::BTreeMap, fmt, net::IpAddr, sync::LazyLock};

use {log::warn, regex::Regex};

use crate::{
    error::{LfsError, Result},
    ost,
};

static OST_CONN_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"osc\..*-OST([0-9a-fA-F]{4})-osc-[0-9a-fA-F]{16}\.ost_conn_uuid=([\d\.]+)@")
        .unwrap()
});

static COMPONENT_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\-((OST|MDT)[a-z0-9]+)\-[a-z0-9-]+\s(.+)\.").unwrap());

static OST_FILL_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})%.*\[OST:([0-9]{1,4})\]").unwrap());

static STRIPE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(lmm_[a-z_]+):\s*(-?\d+)\s*$").unwrap());

/// Parse the output of `lctl get_param osc.<fs>-OST*-osc-*.ost_conn_uuid` into a map from OST
/// index to the address of the server the OST is reached through.
pub fn parse_conn_uuids(fsname: &str, output: &str) -> Result<BTreeMap<u16, IpAddr>> {
    let mut conn_uuids = BTreeMap::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let caps = OST_CONN_UUID.captures(line).ok_or_else(|| {
            LfsError::Parse(format!(
                "No match for ost_conn_uuid on filesystem {fsname}: '{line}'"
            ))
        })?;

        let index = u16::from_str_radix(&caps[1], 16)
            .map_err(|e| LfsError::Parse(format!("bad OST index in '{line}': {e}")))?;
        let addr: IpAddr = caps[2]
            .parse()
            .map_err(|e| LfsError::Parse(format!("bad address in '{line}': {e}")))?;

        conn_uuids.insert(index, addr);
    }

    if conn_uuids.is_empty() {
        return Err(LfsError::NotFound(format!(
            "Lustre ost_conn_uuid map is empty for filesystem {fsname}"
        )));
    }

    Ok(conn_uuids)
}

/// Parse the output of `lctl get_param` for a single OST and return the server address.
pub fn parse_conn_uuid(fsname: &str, index: u16, output: &str) -> Result<IpAddr> {
    let caps = OST_CONN_UUID.captures(output).ok_or_else(|| {
        LfsError::NotFound(format!("No match for OST {index} on filesystem {fsname}"))
    })?;
    caps[2]
        .parse()
        .map_err(|e| LfsError::Parse(format!("bad conn_uuid for OST {index}: {e}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Mdt,
    Ost,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ComponentType::Mdt => "MDT",
                ComponentType::Ost => "OST",
            }
        )
    }
}

/// State of a single MDT or OST as reported by `lfs check`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentState {
    pub target: String,
    pub name: String,
    pub kind: ComponentType,
    pub state: String,
    pub active: bool,
    pub index: u16,
}

/// The MDTs and OSTs of one filesystem, keyed by index.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ComponentCollection {
    pub mdts: BTreeMap<u16, ComponentState>,
    pub osts: BTreeMap<u16, ComponentState>,
}

/// Parse the output of `lfs check osts` (or `lfs check servers`), grouped by filesystem.
pub fn parse_component_states(output: &str) -> Result<BTreeMap<String, ComponentCollection>> {
    let mut states: BTreeMap<String, ComponentCollection> = BTreeMap::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = COMPONENT_STATE.captures(line) else {
            warn!("No regex match for line: {line}");
            continue;
        };

        let kind = match &caps[3] {
            "OST" => ComponentType::Ost,
            "MDT" => ComponentType::Mdt,
            other => {
                return Err(LfsError::Parse(format!(
                    "Unknown component type found: {other}"
                )))
            }
        };
        let state = caps[4].to_string();
        let component = ComponentState {
            target: caps[1].to_string(),
            name: caps[2].to_string(),
            kind,
            active: state == "active",
            state,
            index: ost::component_index(&caps[2])?,
        };

        let collection = states.entry(component.target.clone()).or_default();
        let components = match kind {
            ComponentType::Ost => &mut collection.osts,
            ComponentType::Mdt => &mut collection.mdts,
        };
        components.insert(component.index, component);
    }

    Ok(states)
}

/// Parse the output of `lfs df <path>` into a map from OST index to fill level in percent.
pub fn parse_disk_usage(fs_path: &str, output: &str) -> Result<BTreeMap<u16, u8>> {
    let mut fill_levels = BTreeMap::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = OST_FILL_LEVEL.captures(line) else {
            continue;
        };
        let fill = caps[1]
            .parse::<u8>()
            .map_err(|e| LfsError::Parse(format!("bad fill level in '{line}': {e}")))?;
        let index = caps[2]
            .parse::<u16>()
            .map_err(|e| LfsError::Parse(format!("bad OST index in '{line}': {e}")))?;
        fill_levels.insert(index, fill);
    }

    if fill_levels.is_empty() {
        return Err(LfsError::NotFound(format!(
            "Lustre OST fill levels are empty for filesystem path {fs_path}"
        )));
    }

    Ok(fill_levels)
}

/// Layout of a file as reported by `lfs getstripe -c -i -y`.
#[derive(Debug, Clone, PartialEq)]
pub struct StripeInfo {
    pub filename: String,
    /// Number of OSTs the file is striped over; -1 means all of them.
    pub count: i64,
    /// Index of the first OST the file is striped on; -1 means not yet allocated.
    pub index: i64,
}

pub const LMM_STRIPE_COUNT: &str = "lmm_stripe_count";
pub const LMM_STRIPE_OFFSET: &str = "lmm_stripe_offset";

pub fn parse_stripe_info(filename: &str, output: &str) -> Result<StripeInfo> {
    let fields: BTreeMap<&str, i64> = output
        .lines()
        .filter_map(|line| STRIPE_FIELD.captures(line))
        .filter_map(|caps| {
            let value = caps.get(2)?.as_str().parse::<i64>().ok()?;
            Some((caps.get(1)?.as_str(), value))
        })
        .collect();

    let field = |name: &str| -> Result<i64> {
        fields.get(name).copied().ok_or_else(|| {
            LfsError::Parse(format!(
                "Field {name} not found in stripe info: {}",
                output.trim()
            ))
        })
    };

    Ok(StripeInfo {
        filename: filename.to_string(),
        count: field(LMM_STRIPE_COUNT)?,
        index: field(LMM_STRIPE_OFFSET)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONN_UUIDS: &str = "\
osc.lustre-OST0000-osc-ffff8c7d3a9e4000.ost_conn_uuid=10.0.0.11@o2ib
osc.lustre-OST0001-osc-ffff8c7d3a9e4000.ost_conn_uuid=10.0.0.12@o2ib

osc.lustre-OST001c-osc-ffff8c7d3a9e4000.ost_conn_uuid=10.0.0.11@o2ib
";

    #[test]
    fn conn_uuids() {
        let map = parse_conn_uuids("lustre", CONN_UUIDS).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map[&28], "10.0.0.11".parse::<IpAddr>().unwrap());
        assert_eq!(map[&1], "10.0.0.12".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn conn_uuids_errors() {
        assert!(matches!(
            parse_conn_uuids("lustre", "\n\n"),
            Err(LfsError::NotFound(_))
        ));
        assert!(matches!(
            parse_conn_uuids("lustre", "error: get_param: param_path 'osc/x': No such file"),
            Err(LfsError::Parse(_))
        ));
    }

    #[test]
    fn single_conn_uuid() {
        let line = "osc.lustre-OST001c-osc-ffff8c7d3a9e4000.ost_conn_uuid=10.0.0.11@o2ib\n";
        assert_eq!(
            parse_conn_uuid("lustre", 28, line).unwrap(),
            "10.0.0.11".parse::<IpAddr>().unwrap()
        );
        assert!(parse_conn_uuid("lustre", 28, "").is_err());
    }

    #[test]
    fn component_states() {
        let output = "\
lustre-MDT0000-mdc-ffff8c7d3a9e4000 active.
lustre-OST0000-osc-ffff8c7d3a9e4000 active.
lustre-OST0001-osc-ffff8c7d3a9e4000 active.
lustrefs2-OST0003-osc-ffff8c7d39a21000 inactive device.
garbage line
";
        let states = parse_component_states(output).unwrap();
        assert_eq!(states["lustre"].mdts.len(), 1);
        assert_eq!(states["lustre"].osts.len(), 2);
        assert!(states["lustre"].osts[&0].active);
        let ost = &states["lustrefs2"].osts[&3];
        assert!(!ost.active);
        assert_eq!(ost.state, "inactive device");
        assert_eq!(ost.name, "OST0003");
        assert_eq!(ost.kind, ComponentType::Ost);
    }

    #[test]
    fn disk_usage() {
        let output = "\
UUID                   1K-blocks        Used   Available Use% Mounted on
lustre-MDT0000_UUID     83890588     4093264    72565464   6% /lustre[MDT:0]
lustre-OST0000_UUID  61443286720 48565428356 12254476212  80% /lustre[OST:0]
lustre-OST0001_UUID  61443286720  6144328672 54684591940  11% /lustre[OST:1]

filesystem_summary: 122886573440 54709757028 66939068152  45% /lustre
";
        let levels = parse_disk_usage("/lustre", output).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[&0], 80);
        assert_eq!(levels[&1], 11);

        assert!(parse_disk_usage("/lustre", "nothing here").is_err());
    }

    #[test]
    fn stripe_info() {
        let output = "lmm_stripe_count:  1\nlmm_stripe_offset: 542\n";
        let info = parse_stripe_info("file.dat", output).unwrap();
        assert_eq!(info.count, 1);
        assert_eq!(info.index, 542);

        let info = parse_stripe_info("dir", "lmm_stripe_count:  -1\nlmm_stripe_offset: -1\n")
            .unwrap();
        assert_eq!((info.count, info.index), (-1, -1));

        let err = parse_stripe_info("file.dat", "lmm_stripe_count: 1\n").unwrap_err();
        assert!(err.to_string().contains(LMM_STRIPE_OFFSET));
    }
}
