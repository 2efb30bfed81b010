//! Route suggestions and ride coaching from an external text service
//!
//! Only the contract lives here; the service behind it is someone else's.

use serde::{Deserialize, Serialize};

use crate::accounts::UserProfile;
use crate::error::AdvisorError;
use crate::feed::Activity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSuggestion {
    pub name: String,
    pub difficulty: String,
    pub estimated_km: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub performance_analysis: String,
    pub improvement_tip: String,
    pub next_step: String,
}

pub trait RouteAdvisor {
    fn suggest_routes(
        &self,
        profile: &UserProfile,
        city: &str,
    ) -> Result<Vec<RouteSuggestion>, AdvisorError>;
}

pub trait InsightProvider {
    fn insights(&self, activity: &Activity) -> Result<Insight, AdvisorError>;
}

impl RouteSuggestion {
    /// Decode the JSON array a route service answers with
    pub fn list_from_json(raw: &str) -> Result<Vec<Self>, AdvisorError> {
        serde_json::from_str(raw).map_err(|e| AdvisorError::InvalidResponse(e.to_string()))
    }
}

impl Insight {
    pub fn from_json(raw: &str) -> Result<Self, AdvisorError> {
        serde_json::from_str(raw).map_err(|e| AdvisorError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_routes() -> Result<(), String> {
        let raw = r#"[{"name":"Serra Dona Francisca","difficulty":"Hard","estimated_km":42.5,"description":"Long climb"}]"#;

        let routes = RouteSuggestion::list_from_json(raw).map_err(|e| e.to_string())?;
        assert_eq!(1, routes.len());
        assert_eq!(42.5, routes[0].estimated_km);

        Ok(())
    }

    #[test]
    fn decode_insight_rejects_partial_answers() {
        let raw = r#"{"performance_analysis":"Steady pace"}"#;

        assert!(matches!(
            Insight::from_json(raw),
            Err(AdvisorError::InvalidResponse(_))
        ));
    }
}
