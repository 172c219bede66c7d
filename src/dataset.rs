use crate::config::Config;
use crate::csv_reader::{read_trips, OptionalColumns, TripRecord};
use crate::error::Result;
use crate::filters::{City, Filter};

/// Trip records for one city, restricted to a filter selection.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub city: City,
    pub columns: OptionalColumns,
    pub trips: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: City, columns: OptionalColumns, trips: Vec<TripRecord>) -> Self {
        Dataset { city, columns, trips }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Keeps only the trips whose start time falls in the selected month and day.
    pub fn filtered(mut self, filter: &Filter) -> Self {
        self.trips.retain(|trip| filter.matches(&trip.start_time));
        self
    }
}

/// Loads the city's trip file and applies the month and day selection.
pub fn load_data(config: &Config, filter: &Filter) -> Result<Dataset> {
    let path = config.city_path(filter.city);
    tracing::debug!(city = %filter.city, path = %path.display(), "loading trip data");

    let (columns, trips) = read_trips(&path)?;
    let total = trips.len();
    let dataset = Dataset::new(filter.city, columns, trips).filtered(filter);

    tracing::info!(
        city = %dataset.city,
        month = %filter.month,
        day = %filter.day,
        total,
        kept = dataset.len(),
        "trip data loaded"
    );
    Ok(dataset)
}
