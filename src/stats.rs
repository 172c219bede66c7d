//! The four aggregation stages run over a filtered [`Dataset`].
//!
//! Every stage is a pure function of the dataset; printing lives in `report`.

use std::fmt;
use std::hash::Hash;

use chrono::Timelike;
use indexmap::IndexMap;

use crate::dataset::Dataset;
use crate::filters::{Day, Month};

const NOT_AVAILABLE: &str = "n/a";

/// Counts each distinct value, most frequent first.
///
/// Ties keep the order in which the values were first seen.
pub fn value_counts<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let mut counts = IndexMap::<K, usize>::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut counts = counts.into_iter().collect::<Vec<_>>();
    // stable sort, so first-seen order survives among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value, `None` for an empty input.
pub fn mode<K, I>(values: I) -> Option<K>
where
    K: Hash + Eq,
    I: IntoIterator<Item = K>,
{
    value_counts(values).into_iter().next().map(|(value, _)| value)
}

struct OrNa<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for OrNa<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: Option<Month>,
    pub day: Option<Day>,
    pub hour: Option<u32>,
}

pub fn time_stats(dataset: &Dataset) -> TimeStats {
    let starts = || dataset.trips.iter().map(|trip| &trip.start_time);
    TimeStats {
        month: mode(starts().map(Month::of)),
        day: mode(starts().map(Day::of)),
        hour: mode(starts().map(|start| start.hour())),
    }
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "the most common month: {}", OrNa(&self.month))?;
        writeln!(f, "the most common day of week: {}", OrNa(&self.day))?;
        writeln!(f, "the most common hour: {}", OrNa(&self.hour))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub start: String,
    pub end: String,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Most frequent name across the start and end columns taken together.
    pub combined: Option<String>,
    pub route: Option<Route>,
}

pub fn station_stats(dataset: &Dataset) -> StationStats {
    let trips = &dataset.trips;
    let combined = trips
        .iter()
        .flat_map(|trip| [trip.start_station.as_str(), trip.end_station.as_str()]);
    let route = mode(
        trips
            .iter()
            .map(|trip| (trip.start_station.as_str(), trip.end_station.as_str())),
    );

    StationStats {
        start: mode(trips.iter().map(|trip| trip.start_station.as_str())).map(str::to_string),
        end: mode(trips.iter().map(|trip| trip.end_station.as_str())).map(str::to_string),
        combined: mode(combined).map(str::to_string),
        route: route.map(|(start, end)| Route {
            start: start.to_string(),
            end: end.to_string(),
        }),
    }
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "the most commonly used start station: {}", OrNa(&self.start))?;
        writeln!(f, "the most commonly used end station: {}", OrNa(&self.end))?;
        writeln!(
            f,
            "the most frequently used station (start or end): {}",
            OrNa(&self.combined)
        )?;
        writeln!(f, "the most frequent trip: {}", OrNa(&self.route))
    }
}

/// A span of travel time with microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TravelTime {
    micros: i64,
}

impl TravelTime {
    const MICROS_PER_SECOND: i64 = 1_000_000;
    const SECONDS_PER_MINUTE: i64 = 60;
    const SECONDS_PER_HOUR: i64 = 3_600;
    const SECONDS_PER_DAY: i64 = 86_400;

    pub fn from_micros(micros: i64) -> Self {
        TravelTime { micros }
    }

    pub fn as_micros(self) -> i64 {
        self.micros
    }
}

/// Renders as `D days HH:MM:SS`, with `.ffffff` appended when there are leftover microseconds.
impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.micros < 0 {
            f.write_str("-")?;
        }
        let micros = self.micros.unsigned_abs();
        let fraction = micros % Self::MICROS_PER_SECOND as u64;
        let seconds = micros / Self::MICROS_PER_SECOND as u64;
        let days = seconds / Self::SECONDS_PER_DAY as u64;
        let hours = seconds % Self::SECONDS_PER_DAY as u64 / Self::SECONDS_PER_HOUR as u64;
        let minutes = seconds % Self::SECONDS_PER_HOUR as u64 / Self::SECONDS_PER_MINUTE as u64;
        let seconds = seconds % Self::SECONDS_PER_MINUTE as u64;

        write!(f, "{} days {:02}:{:02}:{:02}", days, hours, minutes, seconds)?;
        if fraction != 0 {
            write!(f, ".{:06}", fraction)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationStats {
    pub total: TravelTime,
    pub mean: Option<TravelTime>,
}

pub fn trip_duration_stats(dataset: &Dataset) -> DurationStats {
    let total: i64 = dataset
        .trips
        .iter()
        // only overflows for spans beyond roughly 292,000 years
        .map(|trip| (trip.end_time - trip.start_time).num_microseconds().unwrap_or(i64::MAX))
        .fold(0i64, i64::saturating_add);
    let mean = match dataset.len() {
        0 => None,
        n => Some(TravelTime::from_micros(total / n as i64)),
    };
    DurationStats {
        total: TravelTime::from_micros(total),
        mean,
    }
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "total travel time: {}", self.total)?;
        writeln!(f, "mean travel time: {}", OrNa(&self.mean))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserStats {
    pub user_types: Option<Vec<(String, usize)>>,
    pub genders: Option<Vec<(String, usize)>>,
    pub birth_years: Option<BirthYearStats>,
}

fn owned_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

/// Demographics for whichever optional columns the city file has.
pub fn user_stats(dataset: &Dataset) -> UserStats {
    let trips = &dataset.trips;
    let columns = dataset.columns;

    let user_types = columns
        .user_type
        .then(|| owned_counts(trips.iter().filter_map(|trip| trip.user_type.as_deref())));
    let genders = columns
        .gender
        .then(|| owned_counts(trips.iter().filter_map(|trip| trip.gender.as_deref())));

    let birth_years = if columns.birth_year {
        let years = || trips.iter().filter_map(|trip| trip.birth_year);
        match (years().min(), years().max(), mode(years())) {
            (Some(earliest), Some(most_recent), Some(most_common)) => Some(BirthYearStats {
                earliest,
                most_recent,
                most_common,
            }),
            _ => None,
        }
    } else {
        None
    };

    UserStats {
        user_types,
        genders,
        birth_years,
    }
}

fn write_counts(f: &mut fmt::Formatter, counts: &[(String, usize)]) -> fmt::Result {
    let width = counts.iter().map(|(value, _)| value.len()).max().unwrap_or(0);
    for (value, count) in counts {
        writeln!(f, "{:<width$}    {}", value, count, width = width)?;
    }
    Ok(())
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(user_types) = &self.user_types {
            writeln!(f, "counts of user types:")?;
            write_counts(f, user_types)?;
        }
        if let Some(genders) = &self.genders {
            writeln!(f, "counts of gender:")?;
            write_counts(f, genders)?;
        }
        if let Some(years) = &self.birth_years {
            writeln!(f, "Year of birth stats:")?;
            writeln!(f, "\tearliest: {}", years.earliest)?;
            writeln!(f, "\tmost recent: {}", years.most_recent)?;
            writeln!(f, "\tmost common: {}", years.most_common)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::{read_trips_from, OptionalColumns, TripRecord};
    use crate::dataset::tests::{TWO_MONTHS_CSV, WEEK_CSV};
    use crate::filters::{City, Filter, Selection};
    use chrono::NaiveDate;

    fn minutes(n: i64) -> TravelTime {
        TravelTime::from_micros(n * 60_000_000)
    }

    fn dataset_from(csv: &str) -> Dataset {
        let (columns, trips) = read_trips_from(csv.as_bytes()).unwrap();
        Dataset::new(City::Chicago, columns, trips)
    }

    fn trip(start: (u32, u32, u32), minutes: i64, from: &str, to: &str) -> TripRecord {
        let start_time = NaiveDate::from_ymd_opt(2017, start.0, start.1)
            .unwrap()
            .and_hms_opt(start.2, 0, 0)
            .unwrap();
        TripRecord {
            start_time,
            end_time: start_time + chrono::Duration::minutes(minutes),
            start_station: from.to_string(),
            end_station: to.to_string(),
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    #[test]
    fn value_counts_sorts_by_count_then_first_seen() {
        let counts = value_counts(["b", "a", "c", "a", "c", "d"]);
        assert_eq!(counts, vec![("a", 2), ("c", 2), ("b", 1), ("d", 1)]);
        assert_eq!(mode(["x", "y", "y", "x"]), Some("x"));
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn january_filter_reports_january() {
        let filter = Filter::new(City::Chicago, Selection::Only(Month::Jan), Selection::All);
        let dataset = dataset_from(TWO_MONTHS_CSV).filtered(&filter);
        assert_eq!(dataset.len(), 2);

        let stats = time_stats(&dataset);
        assert_eq!(stats.month, Some(Month::Jan));
        assert_eq!(stats.hour, Some(8));
        // Monday and Tuesday tie; Monday comes first in the file.
        assert_eq!(stats.day, Some(Day::Mon));
        assert!(stats.to_string().contains("the most common month: JAN"));
    }

    #[test]
    fn durations_sum_and_average() {
        let dataset = Dataset::new(
            City::Washington,
            OptionalColumns::default(),
            vec![trip((3, 1, 9), 10, "A", "B"), trip((3, 2, 9), 20, "B", "A")],
        );
        let stats = trip_duration_stats(&dataset);
        assert_eq!(stats.total, minutes(30));
        assert_eq!(stats.mean, Some(minutes(15)));
        let rendered = stats.to_string();
        assert!(rendered.contains("total travel time: 0 days 00:30:00"));
        assert!(rendered.contains("mean travel time: 0 days 00:15:00"));
    }

    #[test]
    fn mean_keeps_microseconds() {
        let second_trip = |day: u32, seconds: i64| {
            let mut trip = trip((4, day, 7), 0, "A", "B");
            trip.end_time = trip.start_time + chrono::Duration::seconds(seconds);
            trip
        };
        let dataset = Dataset::new(
            City::Chicago,
            OptionalColumns::default(),
            vec![second_trip(3, 1), second_trip(4, 1), second_trip(5, 2)],
        );
        let stats = trip_duration_stats(&dataset);
        assert_eq!(stats.mean, Some(TravelTime::from_micros(1_333_333)));
        let rendered = stats.to_string();
        assert!(rendered.contains("total travel time: 0 days 00:00:04\n"));
        assert!(rendered.contains("mean travel time: 0 days 00:00:01.333333"));
    }

    #[test]
    fn travel_time_formatting() {
        assert_eq!(TravelTime::from_micros(0).to_string(), "0 days 00:00:00");
        assert_eq!(
            TravelTime::from_micros((2 * 86_400 + 3 * 3_600 + 4 * 60 + 5) * 1_000_000 + 250_000).to_string(),
            "2 days 03:04:05.250000"
        );
        assert_eq!(minutes(-90).to_string(), "-0 days 01:30:00");
        assert_eq!(minutes(15).as_micros(), 900_000_000);
    }

    #[test]
    fn stations_flatten_both_columns() {
        let dataset = Dataset::new(
            City::Chicago,
            OptionalColumns::default(),
            vec![
                trip((1, 2, 8), 5, "Canal", "Lake"),
                trip((1, 2, 9), 5, "Canal", "Lake"),
                trip((1, 3, 8), 5, "Union", "Clark"),
                trip((1, 3, 9), 5, "Wells", "Clark"),
                trip((1, 4, 9), 5, "State", "Clark"),
            ],
        );
        let stats = station_stats(&dataset);
        assert_eq!(stats.start.as_deref(), Some("Canal"));
        assert_eq!(stats.end.as_deref(), Some("Clark"));
        // Clark appears three times as an end station, Canal twice as a start.
        assert_eq!(stats.combined.as_deref(), Some("Clark"));
        assert_eq!(
            stats.route,
            Some(Route {
                start: "Canal".to_string(),
                end: "Lake".to_string()
            })
        );
        assert!(stats.to_string().contains("the most frequent trip: Canal -> Lake"));
    }

    #[test]
    fn user_stats_cover_present_columns() {
        let stats = user_stats(&dataset_from(WEEK_CSV));
        assert_eq!(
            stats.user_types,
            Some(vec![("Subscriber".to_string(), 5), ("Customer".to_string(), 2)])
        );
        assert_eq!(
            stats.genders,
            Some(vec![("Male".to_string(), 4), ("Female".to_string(), 2)])
        );
        assert_eq!(
            stats.birth_years,
            Some(BirthYearStats {
                earliest: 1975,
                most_recent: 2000,
                most_common: 1980
            })
        );
        let rendered = stats.to_string();
        assert!(rendered.contains("counts of user types:"));
        assert!(rendered.contains("\tmost common: 1980"));
    }

    #[test]
    fn user_stats_skip_missing_columns() {
        let stats = user_stats(&dataset_from(TWO_MONTHS_CSV));
        assert_eq!(stats, UserStats::default());
        assert_eq!(stats.to_string(), "");
    }

    #[test]
    fn empty_dataset_reports_not_available() {
        let dataset = Dataset::new(City::Chicago, OptionalColumns::default(), Vec::new());
        let time = time_stats(&dataset);
        assert_eq!(time.month, None);
        assert!(time.to_string().contains("the most common hour: n/a"));
        assert_eq!(trip_duration_stats(&dataset).mean, None);
        assert_eq!(station_stats(&dataset).route, None);
    }

    #[test]
    fn stages_are_repeatable() {
        let dataset = dataset_from(WEEK_CSV);
        assert_eq!(time_stats(&dataset), time_stats(&dataset));
        assert_eq!(station_stats(&dataset), station_stats(&dataset));
        assert_eq!(trip_duration_stats(&dataset), trip_duration_stats(&dataset));
        assert_eq!(user_stats(&dataset), user_stats(&dataset));
        assert_eq!(user_stats(&dataset).to_string(), user_stats(&dataset).to_string());
    }
}
