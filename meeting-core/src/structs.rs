use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Point in time of an event boundary.
///
/// All-day events carry bare dates, timed events carry naive date-times.
/// No time zone is attached to either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl EventTime {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(date) => *date,
            EventTime::DateTime(date_time) => date_time.date(),
        }
    }

    /// Date-time used for ordering; bare dates count as midnight.
    #[must_use]
    pub fn as_datetime(&self) -> NaiveDateTime {
        match self {
            EventTime::Date(date) => date.and_time(NaiveTime::MIN),
            EventTime::DateTime(date_time) => *date_time,
        }
    }
}

impl From<NaiveDate> for EventTime {
    fn from(date: NaiveDate) -> Self {
        EventTime::Date(date)
    }
}

impl From<NaiveDateTime> for EventTime {
    fn from(date_time: NaiveDateTime) -> Self {
        EventTime::DateTime(date_time)
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            EventTime::DateTime(date_time) => write!(f, "{}", date_time.format(DATE_TIME_FORMAT)),
        }
    }
}

impl FromStr for EventTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(date_time) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(EventTime::DateTime(date_time));
        }

        if let Ok(date_time) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Ok(EventTime::DateTime(date_time));
        }

        // Offsets are dropped, events are kept in local wall-clock time.
        if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
            return Ok(EventTime::DateTime(date_time.naive_local()));
        }

        NaiveDate::parse_from_str(s, DATE_FORMAT).map(EventTime::Date)
    }
}

#[cfg(feature = "serde")]
impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for EventTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|err| de::Error::custom(format!("invalid event time `{raw}`: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Event {
    /// Assigned by the event store, absent before persistence.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    #[cfg_attr(feature = "serde", serde(default))]
    pub all_day: bool,
}

impl Event {
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether `end` is not before `start`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.start.as_datetime() <= self.end.as_datetime()
    }
}

/// Raw selection handed over by the calendar grid when the user clicks or drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: EventTime,
    pub end: EventTime,
    pub all_day: bool,
}

impl SelectionRange {
    #[must_use]
    pub fn all_day(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: EventTime::Date(start),
            end: EventTime::Date(end),
            all_day: true,
        }
    }

    #[must_use]
    pub fn timed(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: EventTime::DateTime(start),
            end: EventTime::DateTime(end),
            all_day: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("hour {0} is out of range (0-23)")]
    HourOutOfRange(u32),
    #[error("business window closes at {end}H before it opens at {start}H")]
    Empty { start: u32, end: u32 },
    #[error("business window has no weekdays")]
    NoWeekdays,
}

/// Hours and weekdays during which timed meetings may be booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessWindow {
    start_hour: u32,
    end_hour: u32,
    weekdays: Vec<Weekday>,
}

impl BusinessWindow {
    pub fn new(
        start_hour: u32,
        end_hour: u32,
        weekdays: impl IntoIterator<Item = Weekday>,
    ) -> Result<Self, WindowError> {
        if let Some(hour) = [start_hour, end_hour].into_iter().find(|hour| *hour > 23) {
            return Err(WindowError::HourOutOfRange(hour));
        }

        if end_hour <= start_hour {
            return Err(WindowError::Empty {
                start: start_hour,
                end: end_hour,
            });
        }

        let mut weekdays = weekdays.into_iter().collect::<Vec<_>>();
        weekdays.sort_by_key(Weekday::num_days_from_monday);
        weekdays.dedup();

        if weekdays.is_empty() {
            return Err(WindowError::NoWeekdays);
        }

        Ok(Self {
            start_hour,
            end_hour,
            weekdays,
        })
    }

    #[must_use]
    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    #[must_use]
    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Allowed weekdays, Monday first.
    #[must_use]
    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    #[must_use]
    pub fn allows(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }

    #[must_use]
    pub fn contains_hour(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }
}

impl Default for BusinessWindow {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
            weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}
