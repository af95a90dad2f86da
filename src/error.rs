//! Error types: [`XGBError`] for failures reported by the native library, and [`BenchError`]
//! for everything the harness itself can reject.
use std::error::Error;
use std::ffi;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

use xgboost_sys;

/// Convenience return type for most operations which can return an `XGBError`.
pub type XGBResult<T> = std::result::Result<T, XGBError>;

/// Wrap errors returned by the XGBoost library.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct XGBError {
    desc: String,
}

impl XGBError {
    pub(crate) fn new<S: Into<String>>(desc: S) -> Self {
        XGBError { desc: desc.into() }
    }

    /// Check the return value from an XGBoost FFI call, and return the last error message on error.
    ///
    /// Return values of 0 are treated as success, returns values of -1 are treated as errors.
    ///
    /// Meaning of any other return values are undefined, and will cause a panic.
    pub(crate) fn check_return_value(ret_val: i32) -> XGBResult<()> {
        match ret_val {
            0 => Ok(()),
            -1 => Err(XGBError::from_xgboost()),
            _ => panic!("unexpected return value '{}', expected 0 or -1", ret_val),
        }
    }

    /// Get the last error message from XGBoost.
    fn from_xgboost() -> Self {
        let c_str = unsafe { ffi::CStr::from_ptr(xgboost_sys::XGBGetLastError()) };
        XGBError::new(c_str.to_string_lossy().into_owned())
    }
}

impl Error for XGBError {}

impl Display for XGBError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "XGBoost error: {}", &self.desc)
    }
}

/// Convenience return type for harness operations.
pub type BenchResult<T> = std::result::Result<T, BenchError>;

/// Errors raised by the benchmark harness.
///
/// All of them are fatal: the run stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown Updater: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("dataset file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("result for ({dataset}, {algorithm}) {column} already recorded")]
    DuplicateResult {
        dataset: String,
        algorithm: String,
        column: &'static str,
    },

    #[error(transparent)]
    XGBoost(#[from] XGBError),
}

impl BenchError {
    /// Map an I/O error on `path`, turning `NotFound` into [`BenchError::MissingFile`].
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            BenchError::MissingFile { path }
        } else {
            BenchError::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_missing_file() {
        let err = BenchError::io("data/cifar10.bz2", io::Error::from(io::ErrorKind::NotFound));
        match err {
            BenchError::MissingFile { path } => assert_eq!(path, PathBuf::from("data/cifar10.bz2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_io_errors_keep_source() {
        let err = BenchError::io("data/x.bz2", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, BenchError::Io { .. }));
    }

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(BenchError::UnknownMetric("Foo".into()).to_string(), "Unknown metric: Foo");
        assert_eq!(BenchError::UnknownAlgorithm("gpu".into()).to_string(), "Unknown Updater: gpu");
        assert_eq!(
            BenchError::UnknownTask("Ranking".into()).to_string(),
            "Unknown task: Ranking"
        );
    }

    #[test]
    fn check_return_value_success() {
        assert_eq!(XGBError::check_return_value(0), Ok(()));
    }
}
