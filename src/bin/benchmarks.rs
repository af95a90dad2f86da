extern crate env_logger;
#[macro_use]
extern crate log;
extern crate xgb_fpga_bench;

use std::process;

use clap::Parser;

use xgb_fpga_bench::bench::{self, RunConfig};
use xgb_fpga_bench::BenchResult;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RunConfig::parse();
    if let Err(e) = run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(config: &RunConfig) -> BenchResult<()> {
    config.validate()?;
    debug!("Run configuration: {:?}", config);

    let table = bench::run(config)?;
    info!("Finished {} benchmark rows", table.rows().len());
    Ok(())
}
