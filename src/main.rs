mod args;
mod survey;

use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

use crate::args::Args;
use crate::survey::RunConfig;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    let config = RunConfig {
        input: args.input,
        questions: args.questions,
        out_dir: args.out_dir,
        font: args.font,
        excel_worksheet_name: args.excel_worksheet_name,
    };

    if let Err(e) = survey::run(&config) {
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
