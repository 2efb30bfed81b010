//! GPX export of finished rides

use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::ride::ActivitySummary;

pub struct GpxExporter {
    pub tracks: Vec<Track>,
}

impl GpxExporter {
    pub fn empty() -> Self {
        Self { tracks: vec![] }
    }

    /// Add one ride as a single-segment track
    pub fn ride(&mut self, title: &str, summary: &ActivitySummary) -> &mut Self {
        let mut track = Track::new();
        track.name = Some(title.to_string());
        track.description = Some(format!(
            "Tracked with VeloPro: {:.2} km in {} s",
            summary.distance_km, summary.duration_seconds
        ));

        let mut segment = TrackSegment::new();
        for sample in &summary.samples {
            let mut wp = Waypoint::new(sample.coordinates);

            wp.time = sample.time().map(|t| t.into());
            wp.elevation = sample.altitude_m;
            wp.speed = sample.speed_mps;

            segment.points.push(wp);
        }
        track.segments.push(segment);

        self.tracks.push(track);

        self
    }

    pub fn generate(self) -> Gpx {
        let mut gpx: Gpx = Default::default();
        gpx.version = GpxVersion::Gpx11;
        gpx.creator = Some("velopro".to_string());
        gpx.tracks = self.tracks;

        gpx
    }
}
