//! Benchmark harness timing [XGBoost](https://xgboost.ai) tree training on the CPU (`exact` tree
//! method) against the FPGA-accelerated updater (`fpga_exact`).
//!
//! The crate is split in two layers:
//!
//! * a thin, safe wrapper over the XGBoost C API ([`DMatrix`], [`Booster`] and the typed
//!   [`parameters`] builders), which is the only place that talks to the native library;
//! * the [`bench`] module, which loads or generates datasets, configures both tree methods,
//!   times training and collects the results into a [`bench::ResultTable`].
//!
//! # Basic usage example
//!
//! ```no_run
//! use xgb_fpga_bench::bench::{self, DatasetKind, MetricKind, ResultTable, RunConfig, Task};
//!
//! let config = RunConfig::default();
//! let split = bench::dataset::synthetic_regression(16, config.seed).unwrap();
//!
//! let mut table = ResultTable::new();
//! table.register("SyntheticR 16");
//! for &alg in DatasetKind::SyntheticR.run_order() {
//!     let (elapsed, rmse) =
//!         bench::train_xgboost(&split, alg, Task::Regression, MetricKind::Rmse, &config).unwrap();
//!     table.record("SyntheticR 16", alg, MetricKind::Rmse, elapsed, rmse).unwrap();
//! }
//! println!("{}", table);
//! ```
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate log;
extern crate libc;
extern crate xgboost_sys;

macro_rules! xgb_call {
    ($x:expr) => {
        $crate::error::XGBError::check_return_value(unsafe { $x })
    };
}

mod error;
pub use error::{BenchError, BenchResult, XGBError, XGBResult};

mod dmatrix;
pub use dmatrix::DMatrix;

mod booster;
pub use booster::Booster;

pub mod parameters;

pub mod bench;
