use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct SessionRecord {
    pub(crate) vehicle_id: String,
    pub(crate) distance_km: f64,
    pub(crate) fuel_consumed: Option<f64>,
    pub(crate) completed_on: Option<NaiveDate>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<SessionRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<SessionRow>() {
        let row = record?;
        let completed_on = row.completed_date();
        records.push(SessionRecord {
            vehicle_id: row.vehicle_id,
            distance_km: row.distance_km,
            fuel_consumed: row.fuel_consumed,
            completed_on,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    #[serde(rename = "Vehicle ID")]
    vehicle_id: String,
    #[serde(rename = "Distance Km")]
    distance_km: f64,
    #[serde(
        rename = "Fuel Consumed",
        default,
        deserialize_with = "empty_field_as_none"
    )]
    fuel_consumed: Option<f64>,
    #[serde(
        rename = "Completed At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    completed_at: Option<String>,
}

impl SessionRow {
    fn completed_date(&self) -> Option<NaiveDate> {
        self.completed_at
            .as_deref()
            .and_then(parse_datetime)
            .map(|dt| dt.date())
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_field_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}
