use std::io;
use std::process;

use crate::config::Config;
use crate::dataset::load_data;
use crate::error::{describe, Result};
use crate::filters::get_filters;
use crate::report::{ask_restart, display_raw_data, print_statistics};
use crate::style::Palette;

mod config;
mod csv_reader;
mod dataset;
mod error;
mod filters;
mod logging;
mod report;
mod stats;
mod style;

fn main() {
    logging::init_logging();

    if let Err(e) = run() {
        eprintln!("{}", describe(&e));
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env();
    let palette = Palette::detect();
    tracing::debug!(data_dir = %config.data_dir().display(), "starting bikeshare explorer");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    loop {
        let Some(filter) = get_filters(&mut input, &mut output, &palette)? else {
            break;
        };
        let dataset = load_data(&config, &filter)?;

        print_statistics(&mut output, &palette, &dataset)?;
        display_raw_data(&mut input, &mut output, &dataset)?;

        if !ask_restart(&mut input, &mut output)? {
            break;
        }
    }

    Ok(())
}
