//! Elevation and slope reduction over a full, unsampled track.
//!
//! Everything in [`RouteStats`] comes from here. Chart sampling happens
//! afterwards on the per-point series and never changes the totals.

use serde::Serialize;

use crate::geodesic::haversine_distance;
use crate::track::Track;

/// Slope bucket used for the elevation chart colors and legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeClass {
    Steep,
    Moderate,
    Easy,
    Descent,
    Flat,
}

impl SlopeClass {
    /// Classify a slope percentage. Thresholds are checked in order, first match wins.
    pub fn from_slope(slope_percent: f64) -> Self {
        if slope_percent > 12.0 {
            Self::Steep
        } else if slope_percent > 6.0 {
            Self::Moderate
        } else if slope_percent > 2.0 {
            Self::Easy
        } else if slope_percent < -2.0 {
            Self::Descent
        } else {
            Self::Flat
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Steep => "#ef4444",
            Self::Moderate => "#f97316",
            Self::Easy => "#eab308",
            Self::Descent => "#10b981",
            Self::Flat => "#3b82f6",
        }
    }

    /// Dictionary key of the legend caption.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Steep => "nature.route.steep",
            Self::Moderate => "nature.route.moderate",
            Self::Easy => "nature.route.easy",
            Self::Descent => "nature.route.descent",
            Self::Flat => "nature.route.flat",
        }
    }

    pub const ALL: [SlopeClass; 5] = [
        Self::Steep,
        Self::Moderate,
        Self::Easy,
        Self::Descent,
        Self::Flat,
    ];
}

/// One row of the chart legend: swatch color and the caption to translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub class: SlopeClass,
    pub color: &'static str,
    pub label_key: &'static str,
}

impl From<SlopeClass> for LegendEntry {
    fn from(class: SlopeClass) -> Self {
        Self {
            class,
            color: class.color(),
            label_key: class.label_key(),
        }
    }
}

/// Legend rows from steepest to flat.
pub fn legend() -> Vec<LegendEntry> {
    SlopeClass::ALL.into_iter().map(LegendEntry::from).collect()
}

/// Derived values at one track point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationSample {
    pub cumulative_distance_meters: f64,
    pub elevation_meters: f64,
    /// Slope of the segment ending at this point; 0 for the first point.
    pub slope_percent: f64,
    pub classification: SlopeClass,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub total_distance_km: f64,
    pub total_gain_meters: f64,
    pub max_elevation_meters: f64,
}

impl RouteStats {
    /// Display rounding: km to one decimal, meters to whole numbers.
    pub fn rounded(&self) -> Self {
        Self {
            total_distance_km: (self.total_distance_km * 10.0).round() / 10.0,
            total_gain_meters: self.total_gain_meters.round(),
            max_elevation_meters: self.max_elevation_meters.round(),
        }
    }
}

/// Per-point series plus the route totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElevationProfile {
    pub samples: Vec<ElevationSample>,
    pub stats: RouteStats,
}

impl ElevationProfile {
    pub fn from_track(track: &Track) -> Self {
        let mut samples = Vec::with_capacity(track.len());
        let mut cumulative = 0.0;
        let mut gain = 0.0;
        let mut max_elevation = f64::NEG_INFINITY;

        for (i, point) in track.points.iter().enumerate() {
            max_elevation = max_elevation.max(point.elevation);

            let mut slope = 0.0;
            if i > 0 {
                let prev = &track.points[i - 1];
                let segment = haversine_distance(prev, point);
                cumulative += segment;

                let delta = point.elevation - prev.elevation;
                if delta > 0.0 {
                    gain += delta;
                }
                if segment > 0.0 {
                    slope = delta / segment * 100.0;
                }
            }

            samples.push(ElevationSample {
                cumulative_distance_meters: cumulative,
                elevation_meters: point.elevation,
                slope_percent: slope,
                classification: SlopeClass::from_slope(slope),
            });
        }

        let stats = RouteStats {
            total_distance_km: cumulative / 1000.0,
            total_gain_meters: gain,
            max_elevation_meters: if samples.is_empty() { 0.0 } else { max_elevation },
        };

        Self { samples, stats }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
