//! CSV file source integration

use std::io::Read;

use csv::{Reader, StringRecord};
use time::format_description::well_known;
use time::OffsetDateTime;

use super::SampleSource;
use crate::config::FieldsConfiguration;
use crate::error::SourceError;
use crate::LocationSample;

/// Recorded ride in a CSV file
pub struct CsvSource<T>
where
    T: Read,
{
    rdr: Reader<T>,
    fields: FieldsConfiguration,
}

impl<T> CsvSource<T>
where
    T: Read,
{
    pub fn new(rdr: Reader<T>, fields: Option<FieldsConfiguration>) -> Self {
        Self {
            rdr,
            fields: fields.unwrap_or_default(),
        }
    }
}

impl<T> SampleSource for CsvSource<T>
where
    T: Read,
{
    fn fetch(
        &mut self,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<LocationSample>, SourceError> {
        let mut samples = vec![];

        let mut header = self
            .rdr
            .headers()
            .map_err(|e| SourceError::Read(e.to_string()))?
            .clone();
        let header_idx = parse_header(&self.fields, &mut header)?;

        for row in self.rdr.records() {
            let mut rec = row.map_err(|e| SourceError::Read(e.to_string()))?;

            if rec.len() < 2 {
                continue;
            }

            let parsed = parse_row(&header_idx, &self.fields, &mut rec).map_err(|reason| {
                SourceError::InvalidRow {
                    row: format!("{:?}", rec),
                    reason,
                }
            })?;

            if let Some((time, sample)) = parsed {
                let after_start = start.map_or(true, |s| s <= time);
                let before_end = end.map_or(true, |e| time <= e);

                if after_start && before_end {
                    samples.push(sample);
                }
            }
        }

        tracing::debug!(count = samples.len(), "Samples read from CSV");

        Ok(samples)
    }
}

/// Field to index map
#[derive(Debug)]
struct FieldsIndex {
    coordinates: usize,
    time: usize,
    speed: Option<usize>,
    elevation: Option<usize>,
}

fn parse_header(
    fields: &FieldsConfiguration,
    header: &mut StringRecord,
) -> Result<FieldsIndex, SourceError> {
    header.trim();

    let position = |name: &str| header.iter().position(|h| h.to_lowercase() == name);

    let coordinates = position(&fields.coordinates).ok_or(SourceError::MissingHeader("Coordinates"))?;
    let time = position(&fields.time).ok_or(SourceError::MissingHeader("Time"))?;

    Ok(FieldsIndex {
        coordinates,
        time,
        speed: position(&fields.speed),
        elevation: position(&fields.elevation),
    })
}

fn parse_row(
    header: &FieldsIndex,
    fields: &FieldsConfiguration,
    row: &mut StringRecord,
) -> Result<Option<(OffsetDateTime, LocationSample)>, String> {
    row.trim();

    let raw_coordinates = row
        .get(header.coordinates)
        .ok_or("Coordinates field not found")?;
    let separator = match raw_coordinates {
        s if s.contains(',') => ",",
        s if s.contains(';') => ";",
        _ => " ",
    };
    let scoordinates: Vec<&str> = raw_coordinates.split(separator).map(|s| s.trim()).collect();
    if scoordinates.len() != 2 {
        return Ok(None);
    }

    let (ilat, ilng) = if fields.flip_coordinates { (0, 1) } else { (1, 0) };

    let lat = parse_degrees(scoordinates[ilat], "latitude", 90.0)?;
    let lng = parse_degrees(scoordinates[ilng], "longitude", 180.0)?;

    let time = match row.get(header.time) {
        Some(d) => OffsetDateTime::parse(d, &well_known::Rfc3339)
            .map_err(|e| format!("Failed on parse the time: {}", e)),
        None => Err("Time field not found".to_string()),
    }?;

    let mut sample = LocationSample::at(lat, lng, time);

    if let Some(ispeed) = header.speed {
        sample.speed_mps = parse_optional(row.get(ispeed), "speed")?;
    }

    if let Some(ielevation) = header.elevation {
        sample.altitude_m = parse_optional(row.get(ielevation), "elevation")?;
    }

    Ok(Some((time, sample)))
}

/// Finite and within `±limit` degrees
fn parse_degrees(raw: &str, what: &str, limit: f64) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|e| format!("Invalid {} format: {}", what, e))?;

    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{} out of range: {}", what, raw));
    }

    Ok(value)
}

/// Empty or missing cells are `None`, anything else must be a finite number
fn parse_optional(raw: Option<&str>, what: &str) -> Result<Option<f64>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(d) => match d.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            Ok(_) => Err(format!("{} is not finite: {}", what, d)),
            Err(e) => Err(format!("Invalid {} format: {}", what, e)),
        },
    }
}
