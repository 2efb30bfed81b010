//! Dashboard challenges

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal: f64,
    pub current: f64,
    /// ISO date
    pub deadline: String,
    pub reward_icon: String,
}

impl Challenge {
    /// Completed share in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.goal <= 0.0 {
            return 0.0;
        }

        (self.current / self.goal).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.goal > 0.0 && self.current >= self.goal
    }
}

/// The static challenges shown on the dashboard
pub fn default_challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "c1".to_string(),
            title: "May Distance Challenge".to_string(),
            description: "Ride 500km in the month of May".to_string(),
            goal: 500.0,
            current: 342.0,
            deadline: "2024-05-31".to_string(),
            reward_icon: "🏆".to_string(),
        },
        Challenge {
            id: "c2".to_string(),
            title: "Climbing Specialist".to_string(),
            description: "Accumulate 2000m of elevation this week".to_string(),
            goal: 2000.0,
            current: 1250.0,
            deadline: "2024-05-20".to_string(),
            reward_icon: "🏔️".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress() {
        let challenges = default_challenges();

        assert_eq!(2, challenges.len());
        assert!((challenges[0].progress() - 0.684).abs() < 1e-9);
        assert!((challenges[1].progress() - 0.625).abs() < 1e-9);
        assert!(!challenges[0].is_complete());
    }

    #[test]
    fn progress_is_clamped() {
        let mut c = default_challenges().remove(0);

        c.current = 900.0;
        assert_eq!(1.0, c.progress());
        assert!(c.is_complete());

        c.goal = 0.0;
        assert_eq!(0.0, c.progress());
        assert!(!c.is_complete());
    }
}
