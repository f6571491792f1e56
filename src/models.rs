use chrono::{Datelike, NaiveDateTime, Timelike};
use csv::StringRecord;
use serde::{Deserialize, Deserializer};

pub const MONTH_NAMES: [&str; 6] = ["January", "February", "March", "April", "May", "June"];
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Start Time",
    "Start Station",
    "End Station",
    "Trip Duration",
    "User Type",
];
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    pub title: &'static str,
    pub file_name: &'static str,
}

impl City {
    pub const CHICAGO: City = City {
        title: "Chicago",
        file_name: "chicago.csv",
    };
    pub const NEW_YORK: City = City {
        title: "New York",
        file_name: "new_york_city.csv",
    };
    pub const WASHINGTON: City = City {
        title: "Washington",
        file_name: "washington.csv",
    };
    pub const ALL: [City; 3] = [City::CHICAGO, City::NEW_YORK, City::WASHINGTON];

    pub fn parse(input: &str) -> Option<City> {
        let answer = input.trim();
        City::ALL
            .into_iter()
            .find(|city| city.title.eq_ignore_ascii_case(answer))
    }
}

/// Parses a month answer: `Some(None)` for "any", `Some(Some(n))` for a
/// supported month (1-based), `None` when the answer is invalid.
pub fn parse_month(input: &str) -> Option<Option<u32>> {
    parse_choice(input, &MONTH_NAMES).map(|index| index.map(|i| i as u32 + 1))
}

/// Same as [`parse_month`] for weekdays, 0-based from Monday.
pub fn parse_weekday(input: &str) -> Option<Option<u32>> {
    parse_choice(input, &WEEKDAY_NAMES).map(|index| index.map(|i| i as u32))
}

fn parse_choice(input: &str, names: &[&str]) -> Option<Option<usize>> {
    let answer = input.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("any") {
        return Some(None);
    }
    names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(answer))
        .map(Some)
}

pub fn month_title(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|n| chrono::Month::try_from(n).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("Month {month}"))
}

pub fn weekday_title(weekday: u32) -> String {
    WEEKDAY_NAMES
        .get(weekday as usize)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Day {weekday}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub city: City,
    pub month: Option<u32>,
    pub weekday: Option<u32>,
}

impl Filters {
    pub fn matches(&self, trip: &Trip) -> bool {
        self.month.map_or(true, |month| trip.month == month)
            && self.weekday.map_or(true, |weekday| trip.weekday == weekday)
    }

    pub fn month_label(&self) -> String {
        self.month.map(month_title).unwrap_or_else(|| "Any".to_string())
    }

    pub fn weekday_label(&self) -> String {
        self.weekday
            .map(weekday_title)
            .unwrap_or_else(|| "Any".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "Start Time", deserialize_with = "deserialize_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "Start Station")]
    pub start_station: Option<String>,
    #[serde(rename = "End Station")]
    pub end_station: Option<String>,
    #[serde(rename = "Trip Duration")]
    pub trip_duration: Option<f64>,
    #[serde(rename = "User Type")]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<f64>,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {value:?}")))
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// One loaded row: the typed record, its derived temporal fields, and the
/// untouched source fields for the raw-data view.
#[derive(Debug, Clone)]
pub struct Trip {
    pub record: TripRecord,
    pub month: u32,
    pub weekday: u32,
    pub hour: u32,
    pub raw: StringRecord,
}

impl Trip {
    pub fn new(record: TripRecord, raw: StringRecord) -> Self {
        let start = record.start_time;
        Self {
            month: start.month(),
            weekday: start.weekday().num_days_from_monday(),
            hour: start.hour(),
            record,
            raw,
        }
    }

    /// "<start> to <end>", absent when either station is blank.
    pub fn label(&self) -> Option<String> {
        let start = self.record.start_station.as_deref()?;
        let end = self.record.end_station.as_deref()?;
        Some(format!("{start} to {end}"))
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: StringRecord,
    pub trips: Vec<Trip>,
}

impl Dataset {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Original columns only, in file order.
    pub fn raw_rows(&self) -> impl Iterator<Item = &StringRecord> {
        self.trips.iter().map(|trip| &trip.raw)
    }
}
