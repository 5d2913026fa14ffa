//! Offline aggregation of session exports into monthly efficiency facts.
//!
//! The report job that closes a month does not query the live store; it is
//! handed a CSV export of completed sessions and reduces it to the aggregate
//! facts the consistency evaluator consumes.

mod parser;

use chrono::{Datelike, NaiveDate};
use std::io::Read;
use std::path::Path;

use super::domain::{MonthlySummary, VehicleId, VehicleProfile};
use parser::SessionRecord;

#[derive(Debug)]
pub enum UsageImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// The export parsed but held no session rows at all.
    NoSessions,
}

impl std::fmt::Display for UsageImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageImportError::Io(err) => write!(f, "failed to read session export: {}", err),
            UsageImportError::Csv(err) => write!(f, "invalid session CSV data: {}", err),
            UsageImportError::NoSessions => write!(f, "session export contains no rows"),
        }
    }
}

impl std::error::Error for UsageImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UsageImportError::Io(err) => Some(err),
            UsageImportError::Csv(err) => Some(err),
            UsageImportError::NoSessions => None,
        }
    }
}

impl From<std::io::Error> for UsageImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for UsageImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reduces a session CSV export to one vehicle's monthly summary.
pub struct MonthlyUsageImporter;

impl MonthlyUsageImporter {
    pub fn from_path(
        path: impl AsRef<Path>,
        vehicle: &VehicleProfile,
        month: NaiveDate,
    ) -> Result<MonthlySummary, UsageImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, vehicle, month)
    }

    /// Aggregate the export for `vehicle` over the calendar month containing
    /// `month`. Rows for other vehicles, other months, or with no completion
    /// date are skipped. Sessions without a fuel/charge log count at the
    /// vehicle's rated mileage, matching how they were scored.
    pub fn from_reader<R: Read>(
        reader: R,
        vehicle: &VehicleProfile,
        month: NaiveDate,
    ) -> Result<MonthlySummary, UsageImportError> {
        let records = parser::parse_records(reader)?;
        if records.is_empty() {
            return Err(UsageImportError::NoSessions);
        }

        Ok(summarize(&records, vehicle, month))
    }
}

fn summarize(
    records: &[SessionRecord],
    vehicle: &VehicleProfile,
    month: NaiveDate,
) -> MonthlySummary {
    let mut session_count = 0u32;
    let mut total_distance_km = 0.0f64;
    let mut mileage_sum = 0.0f64;

    for record in records {
        if record.vehicle_id != vehicle.vehicle_id.0 {
            continue;
        }
        match record.completed_on {
            Some(date) if same_month(date, month) => {}
            _ => continue,
        }

        let mileage = match record.fuel_consumed {
            Some(fuel) if fuel > 0.0 => record.distance_km / fuel,
            _ => vehicle.expected_mileage,
        };

        session_count += 1;
        total_distance_km += record.distance_km;
        mileage_sum += mileage;
    }

    let avg_mileage = if session_count == 0 {
        0.0
    } else {
        mileage_sum / f64::from(session_count)
    };

    MonthlySummary {
        vehicle_id: VehicleId(vehicle.vehicle_id.0.clone()),
        month: first_of_month(month),
        session_count,
        total_distance_km,
        avg_mileage,
    }
}

fn same_month(date: NaiveDate, month: NaiveDate) -> bool {
    date.year() == month.year() && date.month() == month.month()
}

fn first_of_month(month: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(month.year(), month.month(), 1).expect("first of month is valid")
}
