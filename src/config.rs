//! YAML configuration: CSV field names and tracking behaviour

use serde::{Deserialize, Serialize};

/// Header names of a recorded samples CSV
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldsConfiguration {
    pub time: String,
    pub coordinates: String,
    pub speed: String,
    pub elevation: String,
    /// Coordinates are written as `lat, lng` instead of `lng, lat`
    pub flip_coordinates: bool,
}

impl Default for FieldsConfiguration {
    fn default() -> Self {
        Self {
            time: "time".to_string(),
            coordinates: "coordinates".to_string(),
            speed: "speed".to_string(),
            elevation: "elevation".to_string(),
            flip_coordinates: false,
        }
    }
}

/// Ride session behaviour
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingOptions {
    /// Ask the location source for its most accurate fix
    pub high_accuracy: bool,
    pub calories_per_km: f64,
    /// Unsubscribe from the location source while paused, so nothing
    /// received during a pause is recorded
    pub pause_suspends_location: bool,
    /// Sum positive altitude deltas into the elevation gain
    pub track_elevation_gain: bool,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            calories_per_km: 30.0,
            pause_suspends_location: true,
            track_elevation_gain: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Configs {
    #[serde(default)]
    pub fields: FieldsConfiguration,
    #[serde(default)]
    pub tracking: TrackingOptions,
}

impl Configs {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_configs() -> Result<(), String> {
        let yaml = "fields:\n  time: recorded_at\ntracking:\n  calories_per_km: 42\n  pause_suspends_location: false";

        let conf = Configs::from_yaml(yaml).map_err(|e| e.to_string())?;

        assert_eq!(
            Configs {
                fields: FieldsConfiguration {
                    time: "recorded_at".to_string(),
                    coordinates: "coordinates".to_string(),
                    speed: "speed".to_string(),
                    elevation: "elevation".to_string(),
                    flip_coordinates: false,
                },
                tracking: TrackingOptions {
                    high_accuracy: true,
                    calories_per_km: 42.0,
                    pause_suspends_location: false,
                    track_elevation_gain: true,
                },
            },
            conf
        );

        Ok(())
    }

    #[test]
    fn missing_sections_use_defaults() -> Result<(), String> {
        let conf = Configs::from_yaml("tracking:\n  high_accuracy: false").map_err(|e| e.to_string())?;

        assert_eq!(FieldsConfiguration::default(), conf.fields);
        assert!(!conf.tracking.high_accuracy);
        assert_eq!(30.0, conf.tracking.calories_per_km);

        Ok(())
    }
}
