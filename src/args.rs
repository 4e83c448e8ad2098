use std::path::PathBuf;

use clap::Parser;

/// Command line configuration of the solver driver.
#[derive(Parser)]
#[clap(name = "Sbbu", version, author, about)]
pub struct Args {
    /// The input .nmr file
    #[clap(long, value_parser)]
    fnmr: PathBuf,
    /// Stops each exact search after tmax seconds
    #[clap(long, default_value_t = 3600)]
    tmax: u64,
    /// Rerun and overwrite an existing .log file
    #[clap(long, action)]
    clean_log: bool,
    /// Print search statistics
    #[clap(long, action)]
    verbose: bool,
}

impl Args {
    pub fn fnmr(&self) -> &PathBuf {
        &self.fnmr
    }

    pub fn tmax(&self) -> u64 {
        self.tmax
    }

    pub fn clean_log(&self) -> bool {
        self.clean_log
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
