// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use std::{fmt, time::Duration};

use crate::error::{LfsError, Result};

/// Outcome of migrating a single file between OSTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateState {
    /// The file ended up on an OST other than the requested target.
    Displaced,
    /// The file is not on the source OST, or already on the target OST.
    Ignored,
    /// The file is striped over more than one OST and skipping was requested.
    Skipped,
    Success,
    Failed,
}

impl fmt::Display for MigrateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MigrateState::Displaced => "DISPLACED",
                MigrateState::Ignored => "IGNORED",
                MigrateState::Skipped => "SKIPPED",
                MigrateState::Success => "SUCCESS",
                MigrateState::Failed => "FAILED",
            }
        )
    }
}

/// Options for `LfsUtils::migrate_file`.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Only migrate the file if it currently starts on this OST.
    pub source_idx: Option<i64>,
    /// OST to migrate to. Lustre picks one when unset.
    pub target_idx: Option<i64>,
    pub direct_io: bool,
    pub block: bool,
    /// Leave files striped over more than one OST alone.
    pub skip: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            source_idx: None,
            target_idx: None,
            direct_io: false,
            block: false,
            skip: true,
        }
    }
}

/// A single line of migration output.
///
/// * `DISPLACED|filename|time_elapsed|source_index|target_index`
/// * `FAILED|filename|time_elapsed|source_index|target_index|error_message`
/// * `IGNORED|filename`
/// * `SKIPPED|filename`
/// * `SUCCESS|filename|time_elapsed|source_index|target_index`
#[derive(Debug, Clone, PartialEq)]
pub struct MigrateResult {
    pub state: MigrateState,
    pub filename: String,
    pub elapsed: Duration,
    pub source_idx: Option<i64>,
    pub target_idx: Option<i64>,
    pub error_msg: Option<String>,
}

impl MigrateResult {
    pub fn new(
        state: MigrateState,
        filename: &str,
        elapsed: Duration,
        source_idx: Option<i64>,
        target_idx: Option<i64>,
        error_msg: Option<String>,
    ) -> Result<Self> {
        if filename.is_empty() {
            return Err(LfsError::InvalidArgument(
                "Filename must be set".to_string(),
            ));
        }

        if state == MigrateState::Failed && error_msg.as_deref().unwrap_or("").is_empty() {
            return Err(LfsError::InvalidArgument(format!(
                "State {state} requires error_msg to be set."
            )));
        }

        Ok(Self {
            state,
            filename: filename.to_string(),
            elapsed,
            source_idx,
            target_idx,
            error_msg,
        })
    }
}

impl fmt::Display for MigrateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idx = |i: Option<i64>| i.map(|i| i.to_string()).unwrap_or_default();

        match self.state {
            MigrateState::Ignored | MigrateState::Skipped => {
                write!(f, "{}|{}", self.state, self.filename)
            }
            MigrateState::Displaced | MigrateState::Success => write!(
                f,
                "{}|{}|{}|{}|{}",
                self.state,
                self.filename,
                FormatElapsed(self.elapsed),
                idx(self.source_idx),
                idx(self.target_idx)
            ),
            MigrateState::Failed => write!(
                f,
                "{}|{}|{}|{}|{}|{}",
                self.state,
                self.filename,
                FormatElapsed(self.elapsed),
                idx(self.source_idx),
                idx(self.target_idx),
                self.error_msg.as_deref().unwrap_or_default().trim()
            ),
        }
    }
}

/// Formats a duration as `H:MM:SS`, with a `.ffffff` suffix when there are leftover
/// microseconds.
struct FormatElapsed(Duration);

impl fmt::Display for FormatElapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        write!(f, "{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)?;
        let micros = self.0.subsec_micros();
        if micros != 0 {
            write!(f, ".{micros:06}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elapsed() -> Duration {
        Duration::from_secs(73)
    }

    #[test]
    fn displaced() {
        let result = MigrateResult::new(
            MigrateState::Displaced,
            "test.tmp",
            elapsed(),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(result.to_string(), "DISPLACED|test.tmp|0:01:13||");

        let result = MigrateResult::new(
            MigrateState::Displaced,
            "test.tmp",
            elapsed(),
            Some(4),
            Some(67),
            None,
        )
        .unwrap();
        assert_eq!(result.to_string(), "DISPLACED|test.tmp|0:01:13|4|67");
    }

    #[test]
    fn failed() {
        let result = MigrateResult::new(
            MigrateState::Failed,
            "test.tmp",
            elapsed(),
            Some(783),
            Some(560),
            Some("An error occured.".to_string()),
        )
        .unwrap();
        assert_eq!(
            result.to_string(),
            "FAILED|test.tmp|0:01:13|783|560|An error occured."
        );

        for error_msg in [None, Some(String::new())] {
            let result = MigrateResult::new(
                MigrateState::Failed,
                "test.tmp",
                elapsed(),
                None,
                None,
                error_msg,
            );
            assert!(result.is_err());
        }
    }

    #[test]
    fn ignored_and_skipped() {
        for (state, printed) in [
            (MigrateState::Ignored, "IGNORED|test.tmp"),
            (MigrateState::Skipped, "SKIPPED|test.tmp"),
        ] {
            let result = MigrateResult::new(state, "test.tmp", elapsed(), Some(1), None, None);
            assert_eq!(result.unwrap().to_string(), printed);
        }
    }

    #[test]
    fn success() {
        let result = MigrateResult::new(
            MigrateState::Success,
            "test.tmp",
            elapsed(),
            Some(4),
            Some(67),
            None,
        )
        .unwrap();
        assert_eq!(result.to_string(), "SUCCESS|test.tmp|0:01:13|4|67");
    }

    #[test]
    fn filename_required() {
        for state in [
            MigrateState::Displaced,
            MigrateState::Ignored,
            MigrateState::Skipped,
            MigrateState::Success,
        ] {
            assert!(MigrateResult::new(state, "", elapsed(), None, None, None).is_err());
        }
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(FormatElapsed(Duration::ZERO).to_string(), "0:00:00");
        assert_eq!(
            FormatElapsed(Duration::from_secs(3 * 3600 + 5)).to_string(),
            "3:00:05"
        );
        assert_eq!(
            FormatElapsed(Duration::from_micros(1_500_250)).to_string(),
            "0:00:01.500250"
        );
    }
}
