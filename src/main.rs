//Sbbu
//Copyright (C) 2022-2024 A. Dubray
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::process;
use std::time::Instant;

use clap::Parser;

use sbbu::args::Args;
use sbbu::common::Error;
use sbbu::cost::cost_relax;
use sbbu::heuristics::{greedy_order, sbbu_order};
use sbbu::logger::RunLog;
use sbbu::parser::instance_from_nmr;
use sbbu::{solve_bb_instance, solve_pt_instance};

fn run(args: &Args) -> Result<(), Error> {
    if !args.clean_log() && RunLog::path_for(args.fnmr()).exists() {
        println!("> skip (already solved) {}", args.fnmr().display());
        return Ok(());
    }
    let instance = instance_from_nmr(args.fnmr())?;
    let mut log = RunLog::create(args.fnmr())?;
    log.field("tmax (secs)", args.tmax())?;
    log.field("nnodes", instance.n_nodes())?;
    log.field("lenE", instance.number_edges())?;
    log.field("lenS", instance.number_segments())?;
    log.field("cost_relax", cost_relax(&instance))?;

    let tic = Instant::now();
    let (_, cost_greedy) = greedy_order(&instance);
    log.field("cost_greedy", cost_greedy)?;
    log.field("time_greedy (secs)", tic.elapsed().as_secs())?;

    let tic = Instant::now();
    let (_, cost_sbbu) = sbbu_order(&instance);
    log.field("cost_sbbu", cost_sbbu)?;
    log.field("time_sbbu (secs)", tic.elapsed().as_secs())?;

    let tic = Instant::now();
    let bb = solve_bb_instance(&instance, args.tmax(), args.verbose());
    log.field("timeout_bb", bb.timed_out() as usize)?;
    log.field("cost_bb", bb.cost())?;
    log.field("time_bb (secs)", tic.elapsed().as_secs())?;

    let tic = Instant::now();
    let pt = solve_pt_instance(&instance, args.tmax(), args.verbose());
    log.field("timeout_pt", pt.timed_out() as usize)?;
    log.field("cost_pt", pt.cost())?;
    log.field("time_pt (secs)", tic.elapsed().as_secs())?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(error) = run(&args) {
        eprintln!("{}", error);
        process::exit(1);
    }
}
