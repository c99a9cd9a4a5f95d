// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! lfs
//!
//! Runs the Lustre client tools (`lfs`, `lctl`) and turns their output into typed values.

pub mod migrate;
pub mod parse;

use std::{collections::BTreeMap, net::IpAddr, path::Path, process::Command, time::Instant};

use log::{debug, warn};

pub use {
    migrate::{MigrateOptions, MigrateResult, MigrateState},
    parse::{ComponentCollection, ComponentState, ComponentType, StripeInfo},
};

use crate::{
    config::Config,
    error::{LfsError, Result},
    ost,
};

/// Handle on the local Lustre tools.
#[derive(Debug, Clone)]
pub struct LfsUtils {
    pub lfs: String,
    pub lctl: String,
    /// Run the queries that need privileges through sudo.
    pub sudo: bool,
}

impl LfsUtils {
    pub fn from_config(config: &Config) -> Self {
        LfsUtils {
            lfs: config.lfs_path(),
            lctl: config.lctl_path(),
            sudo: config.use_sudo(),
        }
    }

    /// Run `program` with `args` and return its stdout. A non-zero exit status is an error that
    /// carries the captured stderr.
    fn run(&self, program: &str, args: &[&str], privileged: bool) -> Result<String> {
        let mut argv: Vec<&str> = Vec::with_capacity(args.len() + 2);
        if privileged && self.sudo {
            argv.push("sudo");
        }
        argv.push(program);
        argv.extend_from_slice(args);

        let mut cmd = Command::new(argv[0]);
        cmd.args(&argv[1..]);

        let command = argv.join(" ");
        debug!("About to run command: {:?}", cmd);

        let output = cmd.output().map_err(|source| LfsError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(LfsError::CommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn require_fsname(fsname: &str) -> Result<()> {
        if fsname.is_empty() {
            return Err(LfsError::InvalidArgument(
                "Lustre filesystem name is not set".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the address of the server every OST of `fsname` is reached through.
    pub fn ost_conn_uuid_map(&self, fsname: &str) -> Result<BTreeMap<u16, IpAddr>> {
        Self::require_fsname(fsname)?;
        let param = ost::ost_param_glob(fsname);
        let output = self.run(&self.lctl, &["get_param", &param], false)?;
        parse::parse_conn_uuids(fsname, &output)
    }

    /// Get the address of the server a single OST is reached through.
    pub fn ost_conn_uuid(&self, fsname: &str, index: u16) -> Result<IpAddr> {
        Self::require_fsname(fsname)?;
        let param = ost::ost_param_name(fsname, index);
        let output = self.run(&self.lctl, &["get_param", &param], false)?;
        parse::parse_conn_uuid(fsname, index, &output)
    }

    pub fn retrieve_component_states(&self) -> Result<BTreeMap<String, ComponentCollection>> {
        let output = self.run(&self.lfs, &["check", "osts"], true)?;
        parse::parse_component_states(&output)
    }

    pub fn is_ost_idx_active(&self, target: &str, index: u16) -> Result<bool> {
        let states = self.retrieve_component_states()?;
        let collection = states
            .get(target)
            .ok_or_else(|| LfsError::NotFound(format!("Unknown filesystem target {target}")))?;
        collection
            .osts
            .get(&index)
            .map(|ost| ost.active)
            .ok_or_else(|| LfsError::NotFound(format!("OST {index} not found on {target}")))
    }

    /// Get the fill level in percent of every OST of the filesystem mounted at `fs_path`.
    pub fn retrieve_ost_disk_usage(&self, fs_path: &str) -> Result<BTreeMap<u16, u8>> {
        if fs_path.is_empty() {
            return Err(LfsError::InvalidArgument(
                "Lustre filesystem path is not set".to_string(),
            ));
        }
        let output = self.run(&self.lfs, &["df", fs_path], true)?;
        parse::parse_disk_usage(fs_path, &output)
    }

    pub fn stripe_info(&self, path: &str) -> Result<StripeInfo> {
        let output = self.run(&self.lfs, &["getstripe", "-c", "-i", "-y", path], false)?;
        parse::parse_stripe_info(path, &output)
    }

    /// Create `path` with its single stripe on OST `index`.
    pub fn set_ost_file_stripe(&self, path: &str, index: u16) -> Result<()> {
        if path.is_empty() {
            return Err(LfsError::InvalidArgument(
                "File path must be set".to_string(),
            ));
        }
        debug!("Setting stripe for file: {path} - OST: {index}");
        let index = index.to_string();
        self.run(&self.lfs, &["setstripe", "-i", &index, path], false)?;
        Ok(())
    }

    /// Migrate `filename` according to `opts`. Failures are reported inside the result rather
    /// than as an error, so that a batch of migrations can carry on.
    pub fn migrate_file(&self, filename: &str, opts: &MigrateOptions) -> Result<MigrateResult> {
        let start = Instant::now();
        let mut pre_idx = None;
        let mut post_idx = None;

        let outcome = self.do_migrate(filename, opts, &mut pre_idx, &mut post_idx);

        let (state, error_msg) = match outcome {
            Ok(state) => (state, None),
            Err(LfsError::CommandFailed { stderr, .. }) if !stderr.is_empty() => {
                (MigrateState::Failed, Some(stderr))
            }
            Err(e) => (MigrateState::Failed, Some(e.to_string())),
        };

        MigrateResult::new(
            state,
            filename,
            start.elapsed(),
            pre_idx,
            post_idx,
            error_msg,
        )
    }

    fn do_migrate(
        &self,
        filename: &str,
        opts: &MigrateOptions,
        pre_idx: &mut Option<i64>,
        post_idx: &mut Option<i64>,
    ) -> Result<MigrateState> {
        let pre = self.stripe_info(filename)?;
        *pre_idx = Some(pre.index);

        if opts.skip && pre.count > 1 {
            return Ok(MigrateState::Skipped);
        }
        if opts.source_idx.is_some_and(|src| src != pre.index) {
            return Ok(MigrateState::Ignored);
        }
        if opts.target_idx == Some(pre.index) {
            return Ok(MigrateState::Ignored);
        }

        let mut args: Vec<String> = vec!["migrate".to_string()];
        if !opts.direct_io {
            args.push("--non-direct".to_string());
        }
        args.push(if opts.block { "--block" } else { "--non-block" }.to_string());

        if let Some(target) = opts.target_idx {
            ost::checked_index(target)?;
            args.push("-i".to_string());
            args.push(target.to_string());
            *post_idx = Some(target);
        }
        if pre.count > 0 {
            args.push("-c".to_string());
            args.push(pre.count.to_string());
        }
        args.push(filename.to_string());

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&self.lfs, &args, false)?;

        let post = self.stripe_info(filename)?;
        *post_idx = Some(post.index);

        Ok(match opts.target_idx {
            Some(target) if target != post.index => MigrateState::Displaced,
            _ => MigrateState::Success,
        })
    }

    /// Check whether a new file can be placed on OST `index` by creating `path` striped on it.
    /// `path` must not exist yet. The file is removed again once it has been created.
    pub fn is_ost_writable(&self, index: i64, path: &str) -> Result<bool> {
        let index = ost::checked_index(index)?;

        if Path::new(path).exists() {
            return Err(LfsError::InvalidArgument(format!(
                "File already exists: {path}"
            )));
        }

        // Only a file this call created may be removed again.
        let created = self.set_ost_file_stripe(path, index);
        let writable = created.and_then(|_| {
            let info = self.stripe_info(path);
            if let Err(e) = std::fs::remove_file(path) {
                warn!("could not remove test file {path}: {e}");
            }
            info.map(|info| info.index == i64::from(index))
        });

        match writable {
            Ok(w) => Ok(w),
            Err(e) => {
                warn!("Error during OST {index} writable test: {e}");
                Ok(false)
            }
        }
    }

    /// Get the MDT index a directory is placed on. Regular files are skipped.
    pub fn retrieve_mdt_idx(&self, path: &str) -> Result<Option<u32>> {
        if path.is_empty() {
            return Err(LfsError::InvalidArgument("Path must be set".to_string()));
        }
        if Path::new(path).is_file() {
            warn!("SKIPPING - Found file for determining MDT index: {path}");
            return Ok(None);
        }

        let output = self.run(&self.lfs, &["getdirstripe", "-i", path], false)?;
        let output = output.trim();
        if output.is_empty() {
            return Ok(None);
        }
        output
            .parse::<u32>()
            .map(Some)
            .map_err(|e| LfsError::Parse(format!("bad MDT index '{output}' for {path}: {e}")))
    }
}
