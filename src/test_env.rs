// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use std::io;
use std::process::{Command, Output};

use crate::config::Config;
use crate::lfs::LfsUtils;
use crate::resolve::HostResolver;

/// Given a relative `path` in the test directory, prepend the
/// full path to the test directory.
fn test_path(path: &str) -> String {
    std::env::var("CARGO_MANIFEST_DIR").unwrap() + "/tests/" + path
}

trait IgnoreEexist {
    fn ignore_eexist(self) -> Self;
}

impl IgnoreEexist for io::Result<()> {
    fn ignore_eexist(self) -> Self {
        match self {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Host table written into every test config. The addresses match the connection uuids in the
/// `tests/fixtures/lctl_*.txt` files.
pub const TEST_HOSTS: [(&str, &str); 4] = [
    ("oss01.example.com", "10.0.0.11"),
    ("oss02.example.com", "10.0.0.12"),
    ("oss03.example.com", "10.0.0.13"),
    ("oss04.example.com", "10.0.0.14"),
];

/// A TestEnvironment holds all the information needed to access a test's runtime state. This
/// includes a "private" working directory in which the config file and the files handed to the
/// stand-in `lfs` tool are stored.
///
/// The stand-in tools live under `tests/bin/` and replay the output saved under
/// `tests/fixtures/`.
pub struct TestEnvironment {
    /// The path to this test's private working directory.
    private_dir_path: String,

    /// The config file written for this test.
    config_path: String,
}

impl TestEnvironment {
    /// Set up an environment for a test named `test_id`.
    ///
    /// Creates a unique subdirectory for the test and writes a config file into it that points
    /// at the stand-in tools.
    pub fn new(test_id: &str) -> Self {
        // Each test gets a "private" directory named after its test_id.
        let private_dir_path = test_path(&format!("test_output/{test_id}"));
        // Start by emptying out the test's private directory, so that files from a previous test
        // run don't impact this run:
        match std::fs::remove_dir_all(&private_dir_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => panic!("Could not clean up test directory: {e}"),
        };

        std::fs::create_dir(test_path("test_output"))
            .ignore_eexist()
            .unwrap();

        std::fs::create_dir(&private_dir_path).unwrap();

        let config_path = format!("{private_dir_path}/lfsutils.conf");
        let config = Self::config_for_tests();
        std::fs::write(&config_path, toml::to_string_pretty(&config).unwrap()).unwrap();

        Self {
            private_dir_path,
            config_path,
        }
    }

    fn config_for_tests() -> Config {
        Config {
            lfs: Some(test_path("bin/lfs")),
            lctl: Some(test_path("bin/lctl")),
            sudo: Some(false),
            hosts: TEST_HOSTS
                .iter()
                .map(|(name, addr)| (name.to_string(), addr.parse().unwrap()))
                .collect(),
        }
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub fn config(&self) -> Config {
        Config::load(Some(self.config_path.as_str())).unwrap()
    }

    pub fn lfs_utils(&self) -> LfsUtils {
        LfsUtils::from_config(&self.config())
    }

    /// Like `lfs_utils`, but with privileged queries going through the stand-in `sudo` from
    /// `tests/bin/`. Returns the file the stand-in appends every command line it runs to.
    pub fn lfs_utils_with_sudo(&self) -> (LfsUtils, String) {
        let bin_dir = test_path("bin");
        let path = std::env::var("PATH").unwrap_or_default();
        if !path.split(':').any(|dir| dir == bin_dir) {
            std::env::set_var("PATH", format!("{bin_dir}:{path}"));
        }

        let sudo_log = self.private_path("sudo.log");
        std::env::set_var("LFSUTILS_TEST_SUDO_LOG", &sudo_log);

        let mut lfs = self.lfs_utils();
        lfs.sudo = true;
        (lfs, sudo_log)
    }

    pub fn resolver(&self) -> HostResolver {
        HostResolver::new(self.config().hosts)
    }

    /// Path of `name` inside the test's private directory.
    pub fn private_path(&self, name: &str) -> String {
        format!("{}/{}", self.private_dir_path, name)
    }

    /// Create a file the stand-in `lfs` reports as striped over `count` OSTs starting at
    /// `offset`.
    pub fn create_striped_file(&self, name: &str, count: i64, offset: i64) -> String {
        let path = self.private_path(name);
        std::fs::write(&path, format!("{count} {offset}\n")).unwrap();
        path
    }

    /// Read back the (count, offset) layout the stand-in `lfs` recorded for `path`.
    pub fn layout_of(&self, path: &str) -> (i64, i64) {
        let contents = std::fs::read_to_string(path).unwrap();
        let mut fields = contents.split_whitespace().map(|f| f.parse::<i64>().unwrap());
        (fields.next().unwrap(), fields.next().unwrap())
    }

    /// Run the lfsutils binary at `binary_path` with this test's config and the given `args`.
    ///
    /// The binary path has to be passed in from the tests because the CARGO_BIN_EXE_*
    /// environment variables aren't defined during non-test compilation.
    pub fn run_cli(&self, binary_path: &str, args: &[&str]) -> Output {
        Command::new(binary_path)
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .env_remove("LFSUTILS_LOG")
            .output()
            .expect("could not launch lfsutils")
    }
}

/// The stdout of a finished command, as lines.
pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}
