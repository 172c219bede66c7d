use std::fmt::Display;
use std::io::{BufRead, Write};
use std::time::Instant;

use crate::config::RAW_PAGE_SIZE;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filters::{read_answer, RULE};
use crate::stats::{station_stats, time_stats, trip_duration_stats, user_stats};
use crate::style::Palette;

const YES: &str = "yes";

fn print_stage<W, T, F>(output: &mut W, palette: &Palette, heading: &str, compute: F) -> Result<T>
where
    W: Write,
    T: Display,
    F: FnOnce() -> T,
{
    writeln!(output, "\n{}\n", palette.heading(heading))?;
    let started = Instant::now();
    let stats = compute();
    let elapsed = started.elapsed();
    write!(output, "{}", stats)?;
    writeln!(output, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(output, "{}", RULE)?;
    Ok(stats)
}

/// Runs the four aggregation stages and prints each one.
pub fn print_statistics<W: Write>(output: &mut W, palette: &Palette, dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        writeln!(output, "\nNo trips match the selected filters.")?;
        writeln!(output, "{}", RULE)?;
        return Ok(());
    }

    print_stage(output, palette, "Calculating The Most Frequent Times of Travel...", || {
        time_stats(dataset)
    })?;
    print_stage(output, palette, "Calculating The Most Popular Stations and Trip...", || {
        station_stats(dataset)
    })?;
    let durations = print_stage(output, palette, "Calculating Trip Duration...", || {
        trip_duration_stats(dataset)
    })?;
    tracing::debug!(total_us = durations.total.as_micros(), "trip durations summed");
    print_stage(output, palette, "Calculating User Stats...", || user_stats(dataset))?;
    Ok(())
}

fn is_yes(answer: Option<String>) -> bool {
    answer.is_some_and(|answer| answer.eq_ignore_ascii_case(YES))
}

/// Pages through the filtered trip records as JSON while the user keeps answering yes.
pub fn display_raw_data<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dataset: &Dataset,
) -> Result<()> {
    let mut pages = dataset.trips.chunks(RAW_PAGE_SIZE);
    loop {
        let question = format!(
            "\nWould you like to see {} lines of raw trip data? Enter yes or no.",
            RAW_PAGE_SIZE
        );
        if !is_yes(read_answer(input, output, &question)?) {
            return Ok(());
        }
        let Some(page) = pages.next() else {
            writeln!(output, "No more trip data to display.")?;
            return Ok(());
        };
        for trip in page {
            writeln!(output, "{}", serde_json::to_string_pretty(trip)?)?;
        }
    }
}

/// Asks whether to run another query. Anything but `yes` ends the session.
pub fn ask_restart<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    let answer = read_answer(input, output, "\nWould you like to restart? Enter yes or no.")?;
    Ok(is_yes(answer))
}
