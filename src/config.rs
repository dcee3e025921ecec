use std::env;

use chrono::Weekday;
use meeting_core::{BusinessWindow, WindowError};
use thiserror::Error;

use crate::grid::CalendarView;

pub const STORE_URL_VAR: &str = "MEETING_STORE_URL";
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:5001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid hour `{0}`")]
    Hour(String),
    #[error("invalid weekday `{0}`")]
    Weekday(String),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error("{0}")]
    View(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_url: String,
    pub window: BusinessWindow,
    pub view: CalendarView,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.into(),
            window: BusinessWindow::default(),
            view: CalendarView::default(),
        }
    }
}

impl Config {
    /// Builds a configuration from raw option values, falling back to the
    /// defaults (and to `MEETING_STORE_URL` for the store) when absent.
    pub fn from_options(
        store_url: Option<String>,
        open_hour: Option<&str>,
        close_hour: Option<&str>,
        weekdays: Option<&str>,
        view: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let defaults = BusinessWindow::default();

        let start_hour = open_hour
            .map(parse_hour)
            .transpose()?
            .unwrap_or(defaults.start_hour());
        let end_hour = close_hour
            .map(parse_hour)
            .transpose()?
            .unwrap_or(defaults.end_hour());
        let weekdays = match weekdays {
            Some(list) => parse_weekdays(list)?,
            None => defaults.weekdays().to_vec(),
        };

        let view = view
            .map(str::parse::<CalendarView>)
            .transpose()
            .map_err(ConfigError::View)?
            .unwrap_or_default();

        let store_url = store_url
            .or_else(|| env::var(STORE_URL_VAR).ok())
            .unwrap_or_else(|| DEFAULT_STORE_URL.into());

        Ok(Self {
            store_url,
            window: BusinessWindow::new(start_hour, end_hour, weekdays)?,
            view,
        })
    }
}

/// Parses `8` or `8H`.
pub fn parse_hour(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .trim_end_matches(['H', 'h'])
        .parse()
        .map_err(|_| ConfigError::Hour(value.into()))
}

/// Parses a comma separated weekday list such as `mon,tue,wed`.
pub fn parse_weekdays(list: &str) -> Result<Vec<Weekday>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|day| !day.is_empty())
        .map(|day| {
            day.parse::<Weekday>()
                .map_err(|_| ConfigError::Weekday(day.into()))
        })
        .collect()
}
