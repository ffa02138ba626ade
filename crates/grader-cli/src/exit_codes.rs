//! Process exit codes for `grader`. Part of the CLI contract.

use grader_core::GraderError;

pub const SUCCESS: i32 = 0;
pub const VALIDATION: i32 = 1; // No/invalid grade, unknown trace_id
pub const CONFIG_ERROR: i32 = 2; // Config or anything not classified below
pub const SOURCE_UNAVAILABLE: i32 = 3;
pub const CORRUPT_STORE: i32 = 4;
pub const STORE_IO: i32 = 5;

/// Exit code for a failed command: the first `GraderError` in the chain decides.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<GraderError>())
        .map(GraderError::exit_code)
        .unwrap_or(CONFIG_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn constants_match_core_error_codes() {
        let cases = [
            (GraderError::validation("x"), VALIDATION),
            (
                GraderError::UnknownTrace {
                    trace_id: "t".into(),
                },
                VALIDATION,
            ),
            (
                GraderError::Config {
                    path: "grader.yaml".into(),
                    reason: "bad".into(),
                },
                CONFIG_ERROR,
            ),
            (
                GraderError::SourceUnavailable {
                    path: "t.json".into(),
                    reason: "missing".into(),
                },
                SOURCE_UNAVAILABLE,
            ),
            (
                GraderError::CorruptStore {
                    path: "g.csv".into(),
                    reason: "bad header".into(),
                },
                CORRUPT_STORE,
            ),
            (
                GraderError::StoreIo {
                    path: "g.csv".into(),
                    source: std::io::Error::other("disk full"),
                },
                STORE_IO,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn context_does_not_hide_the_grader_error() {
        let res: Result<(), GraderError> = Err(GraderError::CorruptStore {
            path: "g.csv".into(),
            reason: "bad header".into(),
        });
        let err = res.context("loading grades").unwrap_err();
        assert_eq!(for_error(&err), CORRUPT_STORE);
        assert_eq!(for_error(&anyhow::anyhow!("plain")), CONFIG_ERROR);
    }
}
