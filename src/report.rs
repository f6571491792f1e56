use std::fmt::Write;

use crate::models::{self, Filters, BIRTH_YEAR, GENDER};
use crate::session::ReportContext;
use crate::stats;

pub const RULE: &str = "----------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    TimeOfTravel,
    Stations,
    TripDuration,
    Users,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::TimeOfTravel,
        Section::Stations,
        Section::TripDuration,
        Section::Users,
    ];

    pub fn topic(self) -> &'static str {
        match self {
            Section::TimeOfTravel => "people most frequently travel",
            Section::Stations => "the most popular stations are",
            Section::TripDuration => "time travelled is",
            Section::Users => "user demographics are",
        }
    }

    pub fn render(self, context: &ReportContext) -> String {
        if context.dataset.is_empty() {
            return "No trips match these filters.\n".to_string();
        }

        match self {
            Section::TimeOfTravel => time_stats(context),
            Section::Stations => station_stats(context),
            Section::TripDuration => trip_duration_stats(context),
            Section::Users => user_stats(context),
        }
    }
}

/// "In Chicago, in March, on Mondays, <topic>..."
pub fn section_intro(filters: &Filters, topic: &str) -> String {
    let mut intro = format!("\nIn {}", filters.city.title);
    if let Some(month) = filters.month {
        let _ = write!(intro, ", in {}", models::month_title(month));
    }
    if let Some(weekday) = filters.weekday {
        let _ = write!(intro, ", on {}s", models::weekday_title(weekday));
    }
    let _ = write!(intro, ", {topic}...");
    intro
}

pub fn time_stats(context: &ReportContext) -> String {
    let trips = &context.dataset.trips;
    let mut output = String::new();

    if context.filters.month.is_none() {
        if let Some(top) = stats::mode(trips.iter().map(|trip| trip.month)) {
            let _ = writeln!(
                output,
                "In {} (Month {}) ({} trips)",
                models::month_title(top.value),
                top.value,
                top.count
            );
        }
    }

    if context.filters.weekday.is_none() {
        if let Some(top) = stats::mode(trips.iter().map(|trip| trip.weekday)) {
            let _ = writeln!(
                output,
                "On {} (Day {}) ({} trips)",
                models::weekday_title(top.value),
                top.value,
                top.count
            );
        }
    }

    if let Some(top) = stats::mode(trips.iter().map(|trip| trip.hour)) {
        let _ = writeln!(
            output,
            "Between {hour}:00:00 and {hour}:59:59 ({} trips)",
            top.count,
            hour = top.value
        );
    }

    output
}

pub fn station_stats(context: &ReportContext) -> String {
    let trips = &context.dataset.trips;
    let mut output = String::new();

    let starts = trips
        .iter()
        .filter_map(|trip| trip.record.start_station.as_deref());
    if let Some(top) = stats::mode(starts) {
        let _ = writeln!(output, "Starting: {} ({} trips)", top.value, top.count);
    }
    let ends = trips
        .iter()
        .filter_map(|trip| trip.record.end_station.as_deref());
    if let Some(top) = stats::mode(ends) {
        let _ = writeln!(output, "Ending: {} ({} trips)", top.value, top.count);
    }
    if let Some(top) = stats::mode(trips.iter().filter_map(|trip| trip.label())) {
        let _ = writeln!(output, "Full trip: {} ({} trips)", top.value, top.count);
    }

    output
}

pub fn trip_duration_stats(context: &ReportContext) -> String {
    let trips = &context.dataset.trips;
    let mut output = String::new();

    let total = stats::total_duration(trips);
    let parts = stats::decompose(total);
    let _ = writeln!(
        output,
        "Total: {} days, {} hours, {} minutes, {} seconds ({} seconds)",
        parts.days, parts.hours, parts.minutes, parts.seconds, total
    );

    if let Some(mean) = stats::mean_duration(trips) {
        let _ = writeln!(
            output,
            "Average per trip: {} minutes, {} seconds ({} seconds)",
            (mean / 60.0).floor() as u64,
            stats::round3(mean % 60.0),
            stats::round3(mean)
        );
    }

    output
}

pub fn user_stats(context: &ReportContext) -> String {
    let dataset = &context.dataset;
    let city = context.filters.city.title;
    let mut output = String::new();

    let _ = writeln!(output, "\nUser types:");
    let user_types = stats::breakdown(
        dataset
            .trips
            .iter()
            .filter_map(|trip| trip.record.user_type.clone()),
    );
    write_shares(&mut output, &user_types);

    if dataset.has_column(GENDER) {
        let _ = writeln!(output, "\nGenders:");
        let genders = stats::breakdown(
            dataset
                .trips
                .iter()
                .filter_map(|trip| trip.record.gender.clone()),
        );
        write_shares(&mut output, &genders);
    } else {
        let _ = writeln!(output, "\nNo gender data available for {city}");
    }

    let years: Vec<i64> = dataset
        .trips
        .iter()
        .filter_map(|trip| trip.record.birth_year)
        .map(|year| year.floor() as i64)
        .collect();
    let earliest = years.iter().min();
    let latest = years.iter().max();
    let common = stats::mode(years.iter().copied());

    match (dataset.has_column(BIRTH_YEAR), earliest, latest, common) {
        (true, Some(earliest), Some(latest), Some(common)) => {
            let _ = writeln!(output, "\nBirth Years:");
            let _ = writeln!(output, "Earliest: {earliest}");
            let _ = writeln!(output, "Most recent: {latest}");
            let _ = writeln!(output, "Most common: {}", common.value);
        }
        _ => {
            let _ = writeln!(output, "\nNo birth year data available for {city}");
        }
    }

    output
}

fn write_shares(output: &mut String, shares: &[stats::Share]) {
    for share in shares {
        let _ = writeln!(
            output,
            "{} {}s ({}%)",
            share.count, share.value, share.percent
        );
    }
}
