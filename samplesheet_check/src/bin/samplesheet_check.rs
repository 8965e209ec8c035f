//! samplesheet_check
#![deny(missing_docs)]

use clap::Parser;
use env_logger::Env;
use samplesheet_check::utils::print_error_chain;
use samplesheet_check::{run, CheckArgs};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let args = CheckArgs::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&args, &mut out) {
        Ok(check) => {
            let _ = out.flush();
            let n = check.collision_count();
            if n > 0 {
                eprintln!("Error: {n} sample collisions detected!");
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            let _ = out.flush();
            print_error_chain(&err);
            ExitCode::FAILURE
        }
    }
}
