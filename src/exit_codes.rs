//! Exit code standardization for fleetctl
//!
//! Every error kind maps to a stable exit code class so scripts can tell
//! apart "you asked for something that does not exist" from "the platform
//! or the engine is down" from "your credentials are wrong".
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (not found, ambiguous identifier, bad parameter)
//! - `2` = System error (platform API failure, engine unreachable, I/O)
//! - `3` = Configuration/authentication error

use crate::error::FleetctlError;

/// Standard exit codes for fleetctl
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// User error (not found, non-unique identifier, bad parameter)
    pub const USER_ERROR: i32 = 1;
    /// System error (platform API failure, engine failure, I/O)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration or authentication error
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a FleetctlError to an appropriate exit code
pub fn exit_code_for_error(error: &FleetctlError) -> i32 {
    use FleetctlError::*;
    match error {
        NotFound { .. } => codes::USER_ERROR,
        NonUnique { .. } => codes::USER_ERROR,
        BadParameter(_) => codes::USER_ERROR,

        Transport { .. } => codes::SYSTEM_ERROR,
        EngineUnavailable(_) => codes::SYSTEM_ERROR,
        Engine(_) => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,
        StackFile(_) => codes::SYSTEM_ERROR,

        Auth => codes::CONFIG_ERROR,
        Config(_) => codes::CONFIG_ERROR,

        Batch { exit_code, .. } => *exit_code,
    }
}

/// Exit code for the anyhow error surfaced at the CLI boundary
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    if let Some(error) = error.downcast_ref::<FleetctlError>() {
        return exit_code_for_error(error);
    }
    if error.downcast_ref::<crate::error::ConfigError>().is_some() {
        return codes::CONFIG_ERROR;
    }
    codes::SYSTEM_ERROR
}

/// Accumulates per-identifier failures in multi-identifier commands.
///
/// One failing identifier must not abort the rest of the batch, but the
/// command still has to exit nonzero at the end if anything failed. Each
/// recorded error is printed to stderr immediately; `finish` returns the
/// summary error carrying the worst exit code seen.
pub struct Batch {
    failed: usize,
    total: usize,
    worst: i32,
}

impl Batch {
    pub fn new() -> Self {
        Self {
            failed: 0,
            total: 0,
            worst: codes::SUCCESS,
        }
    }

    /// Record one identifier's outcome, printing the error if it failed.
    pub fn record<T>(&mut self, result: crate::error::Result<T>) -> Option<T> {
        self.total += 1;
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                eprintln!("{}", error);
                self.failed += 1;
                let code = exit_code_for_error(&error);
                if code > self.worst {
                    self.worst = code;
                }
                None
            }
        }
    }

    pub fn finish(self) -> crate::error::Result<()> {
        if self.failed == 0 {
            Ok(())
        } else {
            Err(FleetctlError::Batch {
                failed: self.failed,
                total: self.total,
                exit_code: self.worst,
            })
        }
    }
}

impl Default for Batch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_classes() {
        assert_eq!(
            exit_code_for_error(&FleetctlError::not_found("service", "web")),
            codes::USER_ERROR
        );
        assert_eq!(
            exit_code_for_error(&FleetctlError::non_unique("container", "db")),
            codes::USER_ERROR
        );
        assert_eq!(
            exit_code_for_error(&FleetctlError::transport("boom")),
            codes::SYSTEM_ERROR
        );
        assert_eq!(
            exit_code_for_error(&FleetctlError::EngineUnavailable("down".into())),
            codes::SYSTEM_ERROR
        );
        assert_eq!(exit_code_for_error(&FleetctlError::Auth), codes::CONFIG_ERROR);
    }

    #[test]
    fn test_batch_accumulates_and_keeps_going() {
        let mut batch = Batch::new();
        assert_eq!(batch.record(Ok(1)), Some(1));
        assert_eq!(
            batch.record::<i32>(Err(FleetctlError::not_found("service", "web"))),
            None
        );
        assert_eq!(batch.record(Ok(2)), Some(2));
        assert_eq!(
            batch.record::<i32>(Err(FleetctlError::transport("boom"))),
            None
        );

        match batch.finish() {
            Err(FleetctlError::Batch {
                failed,
                total,
                exit_code,
            }) => {
                assert_eq!(failed, 2);
                assert_eq!(total, 4);
                // transport outranks not-found
                assert_eq!(exit_code, codes::SYSTEM_ERROR);
            }
            other => panic!("expected batch error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_batch_all_ok() {
        let mut batch = Batch::new();
        batch.record(Ok(()));
        assert!(batch.finish().is_ok());
    }
}
