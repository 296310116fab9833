use crate::profile::ElevationSample;

/// Chart sample target used when options do not override it.
pub const DEFAULT_CHART_SAMPLES: usize = 150;

/// Downsample a per-point series for charting.
///
/// Keeps every `stride`-th sample, `stride = max(1, len / target)`, and always
/// the last one so the route's endpoint stays on the chart. The output is
/// roughly bounded by `target` but can exceed it by the remainder of the division.
pub fn sample_for_chart(samples: &[ElevationSample], target: usize) -> Vec<ElevationSample> {
    let Some(last) = samples.len().checked_sub(1) else {
        return Vec::new();
    };
    let stride = (samples.len() / target.max(1)).max(1);

    samples
        .iter()
        .enumerate()
        .filter(|(i, _)| i % stride == 0 || *i == last)
        .map(|(_, s)| *s)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SlopeClass;

    fn series(n: usize) -> Vec<ElevationSample> {
        (0..n)
            .map(|i| ElevationSample {
                cumulative_distance_meters: i as f64 * 10.0,
                elevation_meters: i as f64,
                slope_percent: 0.0,
                classification: SlopeClass::Flat,
            })
            .collect()
    }

    #[test]
    fn test_short_series_kept_whole() {
        let s = series(40);
        assert_eq!(sample_for_chart(&s, DEFAULT_CHART_SAMPLES), s);
    }

    #[test]
    fn test_stride_and_last_point() {
        // 1000 / 150 = 6 -> indices 0, 6, ..., 996 plus 999
        let s = series(1000);
        let sampled = sample_for_chart(&s, DEFAULT_CHART_SAMPLES);
        assert_eq!(sampled.len(), 168);
        assert_eq!(sampled[1].elevation_meters, 6.0);
        assert_eq!(sampled[166].elevation_meters, 996.0);
        assert_eq!(sampled.last(), s.last());
    }

    #[test]
    fn test_last_point_not_duplicated_when_aligned() {
        // 301 / 150 = 2 -> indices 0, 2, ..., 300; 300 is also the last
        let s = series(301);
        let sampled = sample_for_chart(&s, DEFAULT_CHART_SAMPLES);
        assert_eq!(sampled.len(), 151);
        assert_eq!(sampled.last(), s.last());
    }

    #[test]
    fn test_first_point_kept() {
        let s = series(777);
        assert_eq!(sample_for_chart(&s, 10).first(), s.first());
    }

    #[test]
    fn test_zero_target_treated_as_one() {
        let s = series(5);
        let sampled = sample_for_chart(&s, 0);
        // stride 5 -> index 0 and the last
        assert_eq!(sampled.len(), 2);
        assert_eq!(sampled[1], s[4]);
    }

    #[test]
    fn test_empty() {
        assert!(sample_for_chart(&[], DEFAULT_CHART_SAMPLES).is_empty());
    }

    #[test]
    fn test_single_sample() {
        let s = series(1);
        assert_eq!(sample_for_chart(&s, DEFAULT_CHART_SAMPLES), s);
    }
}
