use std::process::ExitCode;

use clap::Parser;
use evensplit_cli::{Args, logging, run};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(&args.log_level, args.log_json);

    match run(&args) {
        Ok(report) => {
            println!("{}", report.json);
            if let Some(digest) = report.digest {
                eprintln!("digest: {digest}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
