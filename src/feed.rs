//! Social activity feed fed by finished rides

use serde::{Deserialize, Serialize};
use time::macros::datetime;
use time::OffsetDateTime;

use crate::accounts::{BikeType, UserProfile, DEFAULT_AVATAR};
use crate::ride::{ActivitySummary, LocationSample};

pub const DEFAULT_TITLE: &str = "Afternoon Ride";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Privacy {
    #[default]
    Public,
    Friends,
    Private,
}

/// A ride as shown in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub title: String,
    pub bike_type: BikeType,
    pub distance_km: f64,
    pub duration_seconds: u64,
    pub average_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub elevation_m: f64,
    pub calories: u32,
    pub points: Vec<LocationSample>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub privacy: Privacy,
    pub likes: u32,
    pub comments: u32,
}

impl Activity {
    /// Attribute a finished ride to a rider, or to the anonymous athlete.
    /// A missing or blank title falls back to [`DEFAULT_TITLE`].
    pub fn from_summary(
        summary: ActivitySummary,
        user: Option<&UserProfile>,
        title: Option<&str>,
    ) -> Self {
        let millis = summary.created_at.unix_timestamp_nanos() / 1_000_000;
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        Self {
            id: format!("a{}", millis),
            user_id: user.map_or_else(|| "u1".to_string(), |u| u.id.clone()),
            user_name: user.map_or_else(|| "Athlete".to_string(), |u| u.name.clone()),
            user_avatar: user.map_or_else(|| DEFAULT_AVATAR.to_string(), |u| u.avatar.clone()),
            title: title.to_string(),
            bike_type: user.map_or(BikeType::Gravel, |u| u.bike_type),
            distance_km: summary.distance_km,
            duration_seconds: summary.duration_seconds,
            average_speed_kmh: summary.average_speed_kmh,
            max_speed_kmh: summary.max_speed_kmh,
            elevation_m: summary.elevation_gain_m,
            calories: summary.calories,
            points: summary.samples,
            date: summary.created_at,
            privacy: Privacy::Public,
            likes: 0,
            comments: 0,
        }
    }
}

/// In-memory list, newest first
#[derive(Debug, Clone, Default)]
pub struct ActivityFeed {
    activities: Vec<Activity>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activities(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    /// Take ownership of a finished ride and put it on top
    pub fn publish(
        &mut self,
        summary: ActivitySummary,
        user: Option<&UserProfile>,
        title: Option<&str>,
    ) -> &Activity {
        let activity = Activity::from_summary(summary, user, title);

        tracing::info!(
            id = %activity.id,
            user_id = %activity.user_id,
            title = %activity.title,
            "Activity published"
        );

        self.activities.insert(0, activity);
        &self.activities[0]
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Rides shown in a fresh feed before the rider records anything
pub fn sample_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            user_name: "Alex Rivera".to_string(),
            user_avatar: DEFAULT_AVATAR.to_string(),
            title: "Morning Gravel Grind".to_string(),
            bike_type: BikeType::Gravel,
            distance_km: 42.5,
            duration_seconds: 5400,
            average_speed_kmh: 28.3,
            max_speed_kmh: 45.2,
            elevation_m: 450.0,
            calories: 1200,
            points: vec![],
            date: datetime!(2024-05-15 8:30 UTC),
            privacy: Privacy::Public,
            likes: 24,
            comments: 3,
        },
        Activity {
            id: "a2".to_string(),
            user_id: "u2".to_string(),
            user_name: "Mariana Costa".to_string(),
            user_avatar: "https://picsum.photos/id/65/200/200".to_string(),
            title: "Night Speed Run".to_string(),
            bike_type: BikeType::Speed,
            distance_km: 25.0,
            duration_seconds: 3200,
            average_speed_kmh: 31.5,
            max_speed_kmh: 52.0,
            elevation_m: 120.0,
            calories: 750,
            points: vec![],
            date: datetime!(2024-05-14 19:00 UTC),
            privacy: Privacy::Public,
            likes: 15,
            comments: 1,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::SignupForm;

    fn summary(distance_km: f64, created_at: OffsetDateTime) -> ActivitySummary {
        ActivitySummary {
            distance_km,
            duration_seconds: 1800,
            average_speed_kmh: distance_km * 2.0,
            max_speed_kmh: 31.0,
            elevation_gain_m: 120.0,
            calories: (distance_km * 30.0) as u32,
            samples: vec![],
            created_at,
        }
    }

    #[test]
    fn anonymous_ride() {
        let mut feed = ActivityFeed::new();

        let activity = feed.publish(summary(10.0, datetime!(2024-05-20 18:00 UTC)), None, Some("  "));

        assert_eq!("a1716228000000", activity.id);
        assert_eq!("u1", activity.user_id);
        assert_eq!("Athlete", activity.user_name);
        assert_eq!(DEFAULT_AVATAR, activity.user_avatar);
        assert_eq!(BikeType::Gravel, activity.bike_type);
        assert_eq!(DEFAULT_TITLE, activity.title);
        assert_eq!(Privacy::Public, activity.privacy);
        assert_eq!(300, activity.calories);
        assert_eq!(120.0, activity.elevation_m);
    }

    #[test]
    fn newest_first_with_rider() {
        let rider = SignupForm {
            name: "Ana Souza".to_string(),
            bike_type: BikeType::Speed,
            ..SignupForm::default()
        }
        .into_profile("u_ana".to_string());

        let mut feed = ActivityFeed::new();
        feed.publish(summary(5.0, datetime!(2024-05-20 7:00 UTC)), Some(&rider), None);
        feed.publish(
            summary(8.0, datetime!(2024-05-21 7:00 UTC)),
            Some(&rider),
            Some("Evening Climb"),
        );

        assert_eq!(2, feed.len());
        let latest = &feed.activities()[0];
        assert_eq!(8.0, latest.distance_km);
        assert_eq!("u_ana", latest.user_id);
        assert_eq!("Ana Souza", latest.user_name);
        assert_eq!(BikeType::Speed, latest.bike_type);
        assert_eq!("Evening Climb", latest.title);
        assert_eq!(5.0, feed.activities()[1].distance_km);
        assert_eq!(DEFAULT_TITLE, feed.activities()[1].title);
    }

    #[test]
    fn seeded_feed_keeps_new_rides_on_top() {
        let mut feed = ActivityFeed::with_activities(sample_activities());
        assert_eq!(2, feed.len());
        assert_eq!("Morning Gravel Grind", feed.activities()[0].title);

        feed.publish(summary(12.0, datetime!(2024-05-20 18:00 UTC)), None, None);

        let ids: Vec<&str> = feed.activities().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(vec!["a1716228000000", "a1", "a2"], ids);
    }
}
