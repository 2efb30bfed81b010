//! Rider profile

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Avatar used when the rider did not upload one
pub const DEFAULT_AVATAR: &str = "https://picsum.photos/id/64/200/200";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BikeType {
    #[default]
    #[serde(rename = "MTB")]
    Mtb,
    Speed,
    Gravel,
    Urban,
}

impl fmt::Display for BikeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BikeType::Mtb => "MTB",
            BikeType::Speed => "Speed",
            BikeType::Gravel => "Gravel",
            BikeType::Urban => "Urban",
        };

        f.write_str(name)
    }
}

impl FromStr for BikeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mtb" => Ok(BikeType::Mtb),
            "speed" => Ok(BikeType::Speed),
            "gravel" => Ok(BikeType::Gravel),
            "urban" => Ok(BikeType::Urban),
            other => Err(format!("unknown bike type `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiderLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Registered rider, as kept in the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    /// Stored as typed, there is no credential hardening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub avatar: String,
    pub birth_date: String,
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    pub bike_type: BikeType,
    pub level: RiderLevel,
    pub city: String,
    pub country: String,
    pub following: u32,
    pub followers: u32,
}

/// Everything asked for on signup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub username: String,
    pub bike_type: BikeType,
    pub level: RiderLevel,
    pub avatar: Option<String>,
    pub city: String,
    pub country: String,
    pub birth_date: String,
    pub weight: f64,
    pub height: f64,
}

impl SignupForm {
    pub fn into_profile(self, id: String) -> UserProfile {
        let avatar = self
            .avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());

        UserProfile {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            password: Some(self.password),
            avatar,
            birth_date: self.birth_date,
            weight: self.weight,
            height: self.height,
            bike_type: self.bike_type,
            level: self.level,
            city: self.city,
            country: self.country,
            following: 0,
            followers: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bike_type_names() -> Result<(), String> {
        assert_eq!(BikeType::Mtb, "MTB".parse::<BikeType>()?);
        assert_eq!(BikeType::Urban, " urban ".parse::<BikeType>()?);
        assert!("tandem".parse::<BikeType>().is_err());
        assert_eq!("\"MTB\"", serde_json::to_string(&BikeType::Mtb).map_err(|e| e.to_string())?);

        Ok(())
    }

    #[test]
    fn blank_avatar_gets_default() {
        let profile = SignupForm {
            avatar: Some("  ".to_string()),
            ..SignupForm::default()
        }
        .into_profile("u_1".to_string());

        assert_eq!(DEFAULT_AVATAR, profile.avatar);
        assert_eq!(Some(String::new()), profile.password);
    }
}
