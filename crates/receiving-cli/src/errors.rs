//! Mapping of command failures to exit codes and hints.

use receiving_core::ReceivingError;

use crate::constants::exit_codes;

/// How a failed command is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    pub exit_code: i32,
    pub hint: Option<&'static str>,
}

impl Failure {
    pub fn of(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ReceivingError>() {
            Some(core) => Self::from_core(core),
            None => Self {
                exit_code: 1,
                hint: None,
            },
        }
    }

    fn from_core(err: &ReceivingError) -> Self {
        let (exit_code, hint) = match err {
            ReceivingError::DuplicateEntry(_) => (
                exit_codes::INVALID_INPUT,
                Some("Names match exactly; the list already has this one."),
            ),
            ReceivingError::EmptySubmission => (
                exit_codes::INVALID_INPUT,
                Some("Stage a receipt with `receiving draft add` first."),
            ),
            ReceivingError::Validation(_) => (exit_codes::INVALID_INPUT, None),
            ReceivingError::NotFound(_) => (exit_codes::NOT_FOUND, None),
            ReceivingError::CorruptLedger(_) => (
                exit_codes::CORRUPT_LEDGER,
                Some("The stored schedule is left untouched. Replace it with `receiving schedule import`."),
            ),
            ReceivingError::StorageWrite(_) => (
                exit_codes::STORAGE_WRITE,
                Some("Nothing was changed; the previous schedule is intact."),
            ),
            ReceivingError::Storage(_) => (1, None),
        };
        Self { exit_code, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = anyhow::Error::new(ReceivingError::CorruptLedger("bad zip".to_string()));
        assert_eq!(Failure::of(&err).exit_code, exit_codes::CORRUPT_LEDGER);

        let err = anyhow::Error::new(ReceivingError::DuplicateEntry("SC001".to_string()));
        let failure = Failure::of(&err);
        assert_eq!(failure.exit_code, exit_codes::INVALID_INPUT);
        assert!(failure.hint.is_some());
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(Failure::of(&err).exit_code, 1);
    }
}
