use serde::Serialize;

use crate::profile::ElevationSample;

/// One color stop of the chart stroke gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    pub offset_percent: f64,
    pub color: &'static str,
}

/// One stop per sample, positioned by distance along the sampled series.
///
/// When the last sample sits at distance 0 every offset is 0.
pub fn gradient_stops(samples: &[ElevationSample]) -> Vec<GradientStop> {
    let Some(last) = samples.last() else {
        return Vec::new();
    };
    let total = last.cumulative_distance_meters;

    samples
        .iter()
        .map(|s| GradientStop {
            offset_percent: if total > 0.0 {
                s.cumulative_distance_meters / total * 100.0
            } else {
                0.0
            },
            color: s.classification.color(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SlopeClass;

    fn sample(distance: f64, slope: f64) -> ElevationSample {
        ElevationSample {
            cumulative_distance_meters: distance,
            elevation_meters: 0.0,
            slope_percent: slope,
            classification: SlopeClass::from_slope(slope),
        }
    }

    #[test]
    fn test_offsets_span_zero_to_hundred() {
        let samples = vec![
            sample(0.0, 0.0),
            sample(250.0, 14.0),
            sample(500.0, 8.0),
            sample(1000.0, -5.0),
        ];
        let stops = gradient_stops(&samples);
        assert_eq!(stops.len(), 4);
        assert_eq!(stops[0].offset_percent, 0.0);
        assert_eq!(stops[1].offset_percent, 25.0);
        assert_eq!(stops[2].offset_percent, 50.0);
        assert_eq!(stops[3].offset_percent, 100.0);
    }

    #[test]
    fn test_colors_follow_classification() {
        let stops = gradient_stops(&[sample(0.0, 0.0), sample(100.0, 13.0), sample(200.0, -3.0)]);
        assert_eq!(stops[0].color, "#3b82f6");
        assert_eq!(stops[1].color, "#ef4444");
        assert_eq!(stops[2].color, "#10b981");
    }

    #[test]
    fn test_empty() {
        assert!(gradient_stops(&[]).is_empty());
    }

    #[test]
    fn test_zero_length_route() {
        let stops = gradient_stops(&[sample(0.0, 0.0), sample(0.0, 0.0)]);
        assert_eq!(stops.len(), 2);
        assert!(stops.iter().all(|s| s.offset_percent == 0.0));
    }
}
