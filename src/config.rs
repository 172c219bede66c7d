use std::env;
use std::path::{Path, PathBuf};

use crate::filters::City;

/// Environment variable that overrides where the city CSV files live.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

/// Number of raw trip records shown per page.
pub const RAW_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            data_dir: data_dir.into(),
        }
    }

    pub fn from_env() -> Self {
        match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Config::new(dir),
            _ => Config::new(DEFAULT_DATA_DIR),
        }
    }

    pub fn city_path(&self, city: City) -> PathBuf {
        self.data_dir.join(city_file(city))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

pub fn city_file(city: City) -> &'static str {
    match city {
        City::Chicago => "chicago.csv",
        City::NewYork => "new_york_city.csv",
        City::Washington => "washington.csv",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_city_has_its_own_backing_file() {
        assert_eq!(city_file(City::Chicago), "chicago.csv");
        assert_eq!(city_file(City::NewYork), "new_york_city.csv");
        assert_eq!(city_file(City::Washington), "washington.csv");
    }

    #[test]
    fn city_path_joins_data_dir() {
        let config = Config::new("/tmp/bikes");
        assert_eq!(
            config.city_path(City::NewYork),
            PathBuf::from("/tmp/bikes/new_york_city.csv")
        );
        assert_eq!(config.data_dir(), Path::new("/tmp/bikes"));
    }
}
