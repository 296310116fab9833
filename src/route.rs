use log::warn;
use serde::Serialize;

use crate::error::TrackError;
use crate::gradient::{GradientStop, gradient_stops};
use crate::options::ProfileOptions;
use crate::parser::parse_track;
use crate::profile::{ElevationProfile, ElevationSample, LegendEntry, RouteStats, legend};
use crate::sampler::sample_for_chart;
use crate::track::Track;

/// South-west and north-east corners, both `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub south_west: [f64; 2],
    pub north_east: [f64; 2],
}

impl Bounds {
    pub fn of(track: &Track) -> Option<Self> {
        let first = track.first()?;
        let init = Self {
            south_west: first.position(),
            north_east: first.position(),
        };
        Some(track.points.iter().fold(init, |b, p| Self {
            south_west: [b.south_west[0].min(p.latitude), b.south_west[1].min(p.longitude)],
            north_east: [b.north_east[0].max(p.latitude), b.north_east[1].max(p.longitude)],
        }))
    }

    pub fn contains(&self, position: [f64; 2]) -> bool {
        (self.south_west[0]..=self.north_east[0]).contains(&position[0])
            && (self.south_west[1]..=self.north_east[1]).contains(&position[1])
    }
}

/// Everything the map and chart need for one loaded track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProfile {
    pub name: Option<String>,
    /// Full, unsampled `[lat, lon]` polyline.
    pub positions: Vec<[f64; 2]>,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub bounds: Bounds,
    pub samples: Vec<ElevationSample>,
    pub gradient: Vec<GradientStop>,
    pub legend: Vec<LegendEntry>,
    pub stats: RouteStats,
    pub download_href: String,
}

impl RouteProfile {
    /// Returns `None` for a track without points.
    pub fn build(track: &Track, reference: &str, opts: &ProfileOptions) -> Option<Self> {
        let first = track.first()?;
        let last = track.last()?;
        let bounds = Bounds::of(track)?;

        let profile = ElevationProfile::from_track(track);
        let samples = sample_for_chart(&profile.samples, opts.chart_samples);
        let gradient = gradient_stops(&samples);

        Some(Self {
            name: track.name.clone(),
            positions: track.points.iter().map(|p| p.position()).collect(),
            start: first.position(),
            end: last.position(),
            bounds,
            samples,
            gradient,
            legend: legend(),
            stats: profile.stats,
            download_href: opts.resolve(reference),
        })
    }
}

/// What a trail view shows: nothing, or a loaded route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "route", rename_all = "camelCase")]
pub enum RouteState {
    #[default]
    NoData,
    Loaded(RouteProfile),
}

impl RouteState {
    pub fn from_track(track: &Track, reference: &str, opts: &ProfileOptions) -> Self {
        RouteProfile::build(track, reference, opts).map_or(Self::NoData, Self::Loaded)
    }

    /// Apply the soft-failure policy: errors are logged and become `NoData`.
    pub fn from_result(
        result: Result<Track, TrackError>,
        reference: &str,
        opts: &ProfileOptions,
    ) -> Self {
        match result {
            Ok(track) => Self::from_track(&track, reference, opts),
            Err(e) => {
                warn!("[Route] {:?} failure for '{reference}': {e}", e.kind());
                Self::NoData
            }
        }
    }

    pub fn profile(&self) -> Option<&RouteProfile> {
        match self {
            Self::Loaded(profile) => Some(profile),
            Self::NoData => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Stats shown in the overlays; all zero when nothing is loaded.
    pub fn stats(&self) -> RouteStats {
        self.profile().map(|p| p.stats).unwrap_or_default()
    }
}

/// Parse GPX text and build the view state, never failing.
pub fn route_state(xml: &str, reference: &str, opts: &ProfileOptions) -> RouteState {
    RouteState::from_result(parse_track(xml), reference, opts)
}
