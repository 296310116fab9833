use serde::Deserialize;

use crate::i18n::Language;
use crate::sampler::DEFAULT_CHART_SAMPLES;

/// Options for building a route profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOptions {
    /// Target number of chart samples (default: 150)
    #[serde(default = "default_chart_samples")]
    pub chart_samples: usize,

    /// Asset base path prefixed to the track reference for the download link (default: "/")
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            chart_samples: DEFAULT_CHART_SAMPLES,
            base_path: default_base_path(),
        }
    }
}

impl ProfileOptions {
    /// Join the base path and a track reference with exactly one slash between them.
    /// Absolute URLs are returned untouched.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.contains("://") {
            return reference.to_string();
        }
        let base = self.base_path.trim_end_matches('/');
        let path = reference.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Options for the GeoJSON export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Include elevation as the 3rd coordinate value (default: true)
    #[serde(default = "default_true")]
    pub include_elevation: bool,

    /// Include route stats in the line feature's properties (default: true)
    #[serde(default = "default_true")]
    pub include_stats: bool,

    /// Language of the start/end marker labels (default: es)
    #[serde(default)]
    pub language: Language,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_elevation: true,
            include_stats: true,
            language: Language::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_chart_samples() -> usize {
    DEFAULT_CHART_SAMPLES
}

fn default_base_path() -> String {
    "/".to_string()
}
