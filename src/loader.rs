use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::models::{City, Dataset, Filters, Trip, TripRecord, REQUIRED_COLUMNS};

pub fn city_path(data_dir: &Path, city: City) -> PathBuf {
    data_dir.join(city.file_name)
}

/// Loads the city's file and keeps only the rows matching the filters.
pub fn load(data_dir: &Path, filters: &Filters) -> anyhow::Result<Dataset> {
    let path = city_path(data_dir, filters.city);
    log::info!("loading {} from {}", filters.city.title, path.display());

    let file = std::fs::File::open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut dataset =
        read_trips(file).with_context(|| format!("failed to read {}", path.display()))?;
    let total = dataset.len();

    apply_filters(&mut dataset, filters);
    log::info!("kept {} of {} rows", dataset.len(), total);

    Ok(dataset)
}

pub fn read_trips<R: Read>(source: R) -> anyhow::Result<Dataset> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            bail!("missing required column {column:?}");
        }
    }

    let mut trips = Vec::new();

    for (index, result) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let raw = result.with_context(|| format!("malformed row at line {line}"))?;
        let record: TripRecord = raw
            .deserialize(Some(&headers))
            .with_context(|| format!("invalid trip at line {line}"))?;
        trips.push(Trip::new(record, raw));
    }

    Ok(Dataset { headers, trips })
}

pub fn apply_filters(dataset: &mut Dataset, filters: &Filters) {
    dataset.trips.retain(|trip| filters.matches(trip));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::City;
    use std::io::Write;

    pub(crate) const CHICAGO_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-01-02 08:10:00,2017-01-02 08:20:00,600,Clark St & Lake St,State St & Harrison St,Subscriber,Male,1985.0
2,2017-01-02 08:40:00,2017-01-02 09:00:00,1200,Clark St & Lake St,Canal St & Madison St,Subscriber,Female,1990.0
3,2017-01-03 17:05:00,2017-01-03 17:15:00,600,Canal St & Madison St,Clark St & Lake St,Customer,,
4,2017-02-06 08:00:00,2017-02-06 08:30:00,1800,Clark St & Lake St,State St & Harrison St,Subscriber,Male,1985.0
5,2017-03-11 12:00:00,2017-03-11 12:10:00,600.5,State St & Harrison St,Clark St & Lake St,Customer,Female,1972.0
6,2017-01-09 08:15:00,2017-01-09 08:35:00,1200,Clark St & Lake St,State St & Harrison St,Subscriber,Male,1990.0
";

    pub(crate) const WASHINGTON_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
2,2017-03-11 10:40:00,2017-03-11 11:01:00,1282.0,Lincoln Memorial,Jefferson Memorial,Customer
";

    pub(crate) const BLANK_CELLS_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-01-02 08:10:00,2017-01-02 08:20:00,600,Clark St & Lake St,State St & Harrison St,Subscriber,Male,1985.0
2,2017-01-02 08:40:00,,,,,,,
3,2017-01-03 17:05:00,2017-01-03 17:15:00,900,,Clark St & Lake St,Customer,,
";

    fn fixture(contents: &str) -> Dataset {
        read_trips(contents.as_bytes()).unwrap()
    }

    fn filters(month: Option<u32>, weekday: Option<u32>) -> Filters {
        Filters {
            city: City::CHICAGO,
            month,
            weekday,
        }
    }

    #[test]
    fn derives_temporal_fields() {
        let dataset = fixture(CHICAGO_CSV);
        assert_eq!(dataset.len(), 6);
        let first = &dataset.trips[0];
        assert_eq!((first.month, first.weekday, first.hour), (1, 0, 8));
        assert!(dataset.has_column("Gender"));
        assert_eq!(dataset.trips[2].record.gender, None);
        assert_eq!(dataset.trips[2].record.birth_year, None);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let dataset = fixture(WASHINGTON_CSV);
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.has_column("Gender"));
        assert!(!dataset.has_column("Birth Year"));
        assert_eq!(dataset.trips[0].record.trip_duration, Some(489.066));
    }

    #[test]
    fn month_filter_keeps_matching_rows() {
        let all = fixture(CHICAGO_CSV);
        let mut january = all.clone();
        apply_filters(&mut january, &filters(Some(1), None));

        let expected: Vec<&str> = all
            .trips
            .iter()
            .filter(|trip| trip.month == 1)
            .map(|trip| trip.raw.get(0).unwrap())
            .collect();
        let kept: Vec<&str> = january.raw_rows().map(|row| row.get(0).unwrap()).collect();
        assert_eq!(kept, expected);
        assert_eq!(kept, vec!["1", "2", "3", "6"]);
    }

    #[test]
    fn weekday_filter_keeps_matching_rows() {
        let mut mondays = fixture(CHICAGO_CSV);
        apply_filters(&mut mondays, &filters(None, Some(0)));
        assert!(mondays.trips.iter().all(|trip| trip.weekday == 0));
        assert_eq!(mondays.len(), 4);
    }

    #[test]
    fn month_and_weekday_filters_intersect() {
        let mut dataset = fixture(CHICAGO_CSV);
        apply_filters(&mut dataset, &filters(Some(1), Some(0)));
        let kept: Vec<&str> = dataset.raw_rows().map(|row| row.get(0).unwrap()).collect();
        assert_eq!(kept, vec!["1", "2", "6"]);
    }

    #[test]
    fn blank_cells_are_missing_values() {
        let dataset = fixture(BLANK_CELLS_CSV);
        assert_eq!(dataset.len(), 3);

        let blank = &dataset.trips[1].record;
        assert_eq!(blank.trip_duration, None);
        assert_eq!(blank.start_station, None);
        assert_eq!(blank.end_station, None);
        assert_eq!(blank.user_type, None);
        assert_eq!(dataset.trips[1].label(), None);
        assert_eq!(dataset.trips[2].label(), None);
        assert_eq!((dataset.trips[1].month, dataset.trips[1].hour), (1, 8));
    }

    #[test]
    fn missing_user_type_column_is_an_error() {
        let without_user_type = "Start Time,Trip Duration,Start Station,End Station\n\
                                 2017-01-02 08:10:00,600,A,B\n";
        let err = read_trips(without_user_type.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("User Type"));
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let broken = "Start Time,Trip Duration,Start Station,End Station,User Type\n\
                      yesterday,60,A,B,Customer\n";
        let err = read_trips(broken.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), &filters(None, None)).unwrap_err();
        assert!(format!("{err:#}").contains("chicago.csv"));
    }

    #[test]
    fn loads_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("chicago.csv")).unwrap();
        file.write_all(CHICAGO_CSV.as_bytes()).unwrap();

        let dataset = load(dir.path(), &filters(Some(2), None)).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.trips[0].record.trip_duration, Some(1800.0));
    }
}
