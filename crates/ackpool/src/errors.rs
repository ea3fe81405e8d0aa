//! Error handling and exit codes.

use ackpool_core::calculator::AckError;
use ackpool_core::constants::exit_codes;

/// Map a computation error to its process exit code.
pub fn handle_error(err: &AckError) -> i32 {
    match err {
        AckError::StaleToken { .. } | AckError::NotCompleted { .. } | AckError::ProtocolViolation(_) => {
            exit_codes::ERROR_PROTOCOL
        }
        AckError::Config(_) => exit_codes::ERROR_CONFIG,
        AckError::Mismatch => exit_codes::ERROR_MISMATCH,
        AckError::Faulted(_) | AckError::NoResults => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for an error escaping `app::run`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AckError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ackpool_core::calculator::{Fault, Violation};
    use ackpool_core::worker::Worker;

    #[test]
    fn error_codes() {
        assert_eq!(handle_error(&AckError::Mismatch), 3);
        assert_eq!(handle_error(&AckError::Config("bad".into())), 4);
        assert_eq!(
            handle_error(&AckError::ProtocolViolation(Violation::DoubleCompletion)),
            5
        );
        assert_eq!(
            handle_error(&AckError::Faulted(Fault::Overflow { n: u64::MAX })),
            1
        );
        assert_eq!(handle_error(&AckError::NoResults), 1);
    }

    #[test]
    fn stale_and_pending_reads_are_protocol_errors() {
        let token = Worker::new().acquire();
        assert_eq!(handle_error(&AckError::StaleToken { token }), 5);
        assert_eq!(handle_error(&AckError::NotCompleted { token }), 5);
    }

    #[test]
    fn anyhow_downcast() {
        let err = anyhow::Error::from(AckError::Config("x".into()));
        assert_eq!(exit_code_for(&err), 4);
        assert_eq!(exit_code_for(&anyhow::anyhow!("io")), 1);
    }
}
