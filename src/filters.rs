use std::fmt;
use std::io::{self, BufRead, Write};

use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::style::Palette;

pub const RULE: &str = "----------------------------------------";
const WILDCARD: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYork => "new york",
            City::Washington => "washington",
        }
    }

    pub fn parse(input: &str) -> Option<City> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("new york city") {
            return Some(City::NewYork);
        }
        City::ALL
            .into_iter()
            .find(|city| city.name().eq_ignore_ascii_case(input))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }

    fn full_name(self) -> &'static str {
        match self {
            Month::Jan => "JANUARY",
            Month::Feb => "FEBRUARY",
            Month::Mar => "MARCH",
            Month::Apr => "APRIL",
            Month::May => "MAY",
            Month::Jun => "JUNE",
            Month::Jul => "JULY",
            Month::Aug => "AUGUST",
            Month::Sep => "SEPTEMBER",
            Month::Oct => "OCTOBER",
            Month::Nov => "NOVEMBER",
            Month::Dec => "DECEMBER",
        }
    }

    pub fn of(timestamp: &NaiveDateTime) -> Month {
        Month::ALL[timestamp.month0() as usize]
    }

    pub fn parse(input: &str) -> Option<Month> {
        let input = input.trim();
        Month::ALL.into_iter().find(|month| {
            month.label().eq_ignore_ascii_case(input) || month.full_name().eq_ignore_ascii_case(input)
        })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day of week, indexed Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sun,
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Day::Sun => "SUN",
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
            Day::Sat => "SAT",
        }
    }

    fn full_name(self) -> &'static str {
        match self {
            Day::Sun => "SUNDAY",
            Day::Mon => "MONDAY",
            Day::Tue => "TUESDAY",
            Day::Wed => "WEDNESDAY",
            Day::Thu => "THURSDAY",
            Day::Fri => "FRIDAY",
            Day::Sat => "SATURDAY",
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Day {
        // chrono counts from Monday; the enumeration starts on Sunday.
        Day::ALL[weekday.num_days_from_sunday() as usize]
    }

    pub fn of(timestamp: &NaiveDateTime) -> Day {
        Day::from_weekday(timestamp.weekday())
    }

    pub fn parse(input: &str) -> Option<Day> {
        let input = input.trim();
        Day::ALL.into_iter().find(|day| {
            day.label().eq_ignore_ascii_case(input) || day.full_name().eq_ignore_ascii_case(input)
        })
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A month or day restriction, or the `all` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: PartialEq + Copy> Selection<T> {
    pub fn matches(&self, value: T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => *wanted == value,
        }
    }

    fn parse_with(input: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Self> {
        if input.trim().eq_ignore_ascii_case(WILDCARD) {
            Some(Selection::All)
        } else {
            parse(input).map(Selection::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selection::All => f.write_str("ALL"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub city: City,
    pub month: Selection<Month>,
    pub day: Selection<Day>,
}

impl Filter {
    pub fn new(city: City, month: Selection<Month>, day: Selection<Day>) -> Self {
        Filter { city, month, day }
    }

    pub fn matches(&self, start: &NaiveDateTime) -> bool {
        self.month.matches(Month::of(start)) && self.day.matches(Day::of(start))
    }
}

/// Prints `question` and reads one line. `None` once input is exhausted.
pub fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<Option<String>> {
    writeln!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_until<R: BufRead, W: Write, T>(
    input: &mut R,
    output: &mut W,
    palette: &Palette,
    question: &str,
    complaint: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> io::Result<Option<T>> {
    loop {
        let Some(answer) = read_answer(input, output, question)? else {
            return Ok(None);
        };
        if let Some(value) = parse(&answer) {
            return Ok(Some(value));
        }
        tracing::debug!(answer = %answer, "rejected filter input");
        writeln!(output, "{}", palette.complaint(complaint))?;
    }
}

fn choices<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Asks for a city, month and day until each answer is valid.
///
/// Returns `None` when input ends before a full selection is made.
pub fn get_filters<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    palette: &Palette,
) -> io::Result<Option<Filter>> {
    writeln!(output, "Hello! Let's explore some US bikeshare data!")?;

    let Some(city) = prompt_until(
        input,
        output,
        palette,
        &format!("Enter the city name ({})", choices(&City::ALL)),
        "Please enter a valid city name",
        City::parse,
    )?
    else {
        return Ok(None);
    };

    let Some(month) = prompt_until(
        input,
        output,
        palette,
        &format!("Enter the month ({}) or all", choices(&Month::ALL)),
        "Please enter a valid month",
        |answer| Selection::parse_with(answer, Month::parse),
    )?
    else {
        return Ok(None);
    };

    let Some(day) = prompt_until(
        input,
        output,
        palette,
        &format!("Enter the day ({}) or all", choices(&Day::ALL)),
        "Please enter a valid day",
        |answer| Selection::parse_with(answer, Day::parse),
    )?
    else {
        return Ok(None);
    };

    writeln!(output, "{}", RULE)?;
    writeln!(output, "You Picked {}, {}, {}", city, month, day)?;
    writeln!(output, "{}", RULE)?;

    Ok(Some(Filter::new(city, month, day)))
}
