//! Per-view ownership of a track and its derived state.
//!
//! A detail view asks for a track with [`TrailView::begin`], fetches it however
//! the host can, and hands the result back with [`TrailView::complete`]. Only
//! the most recent ticket is honored, so a slow response for a previous
//! reference, or one arriving after [`TrailView::unmount`], is dropped.

use std::path::PathBuf;

use log::{debug, warn};

use crate::error::TrackError;
use crate::options::ProfileOptions;
use crate::parser::parse_track;
use crate::route::RouteState;
use crate::track::Track;

/// Where track documents come from.
pub trait TrackSource {
    fn fetch(&self, reference: &str) -> Result<String, TrackError>;
}

/// Reads track documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TrackSource for FileSource {
    fn fetch(&self, reference: &str) -> Result<String, TrackError> {
        let path = self.root.join(reference.trim_start_matches('/'));
        std::fs::read_to_string(&path).map_err(|e| TrackError::fetch(reference, e))
    }
}

/// Identifies one request made by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u32);

impl Ticket {
    pub fn id(self) -> u32 {
        self.0
    }
}

impl From<u32> for Ticket {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[derive(Debug, Default)]
pub struct TrailView {
    options: ProfileOptions,
    generation: u32,
    pending: Option<(Ticket, String)>,
    reference: Option<String>,
    track: Track,
    state: RouteState,
}

impl TrailView {
    pub fn new(options: ProfileOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Start loading `reference`, superseding any earlier request.
    ///
    /// Asking again for the reference already pending or shown keeps the
    /// current ticket; the view only reloads when the reference changes.
    pub fn begin(&mut self, reference: &str) -> Ticket {
        if let Some((ticket, pending)) = &self.pending {
            if pending == reference {
                return *ticket;
            }
        } else if self.reference.as_deref() == Some(reference) {
            return Ticket(self.generation);
        }

        self.generation = self.generation.wrapping_add(1);
        let ticket = Ticket(self.generation);
        self.pending = Some((ticket, reference.to_string()));
        debug!("[TrailView] Request {} for '{reference}'", ticket.0);
        ticket
    }

    /// Apply a fetched document. Returns false when the ticket is stale.
    pub fn complete(&mut self, ticket: Ticket, result: Result<String, TrackError>) -> bool {
        let reference = match self.pending.take() {
            Some((current, reference)) if current == ticket => reference,
            other => {
                self.pending = other;
                debug!("[TrailView] Dropping stale result for request {}", ticket.0);
                return false;
            }
        };

        let parsed = result.and_then(|xml| parse_track(&xml));
        self.state = match parsed {
            Ok(track) => {
                let state = RouteState::from_track(&track, &reference, &self.options);
                self.track = track;
                state
            }
            Err(e) => {
                warn!("[TrailView] {:?} failure for '{reference}': {e}", e.kind());
                self.track = Track::default();
                RouteState::NoData
            }
        };
        self.reference = Some(reference);
        true
    }

    /// Fetch and apply in one step.
    pub fn load(&mut self, source: &dyn TrackSource, reference: &str) -> &RouteState {
        let ticket = self.begin(reference);
        if self.pending.is_some() {
            let result = source.fetch(reference);
            self.complete(ticket, result);
        }
        &self.state
    }

    /// Drop everything; later completions are ignored.
    pub fn unmount(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
        self.reference = None;
        self.track = Track::default();
        self.state = RouteState::NoData;
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn pending_reference(&self) -> Option<&str> {
        self.pending.as_ref().map(|(_, reference)| reference.as_str())
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn options(&self) -> &ProfileOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    const MOA: &str = r#"<gpx version="1.1"><trk><name>A Moa</name><trkseg>
<trkpt lat="42.88" lon="-9.12"><ele>100</ele></trkpt>
<trkpt lat="42.89" lon="-9.11"><ele>300</ele></trkpt>
</trkseg></trk></gpx>"#;

    const LOURO: &str = r#"<gpx version="1.1"><trk><name>Monte Louro</name><trkseg>
<trkpt lat="42.74" lon="-9.08"><ele>0</ele></trkpt>
<trkpt lat="42.745" lon="-9.075"><ele>240</ele></trkpt>
</trkseg></trk></gpx>"#;

    struct MapSource {
        docs: HashMap<&'static str, &'static str>,
        calls: Cell<usize>,
    }

    impl MapSource {
        fn new() -> Self {
            Self {
                docs: HashMap::from([("moa.gpx", MOA), ("louro.gpx", LOURO)]),
                calls: Cell::new(0),
            }
        }
    }

    impl TrackSource for MapSource {
        fn fetch(&self, reference: &str) -> Result<String, TrackError> {
            self.calls.set(self.calls.get() + 1);
            self.docs
                .get(reference)
                .map(|d| d.to_string())
                .ok_or_else(|| TrackError::fetch(reference, "not found"))
        }
    }

    fn name(view: &TrailView) -> Option<&str> {
        view.state().profile().and_then(|p| p.name.as_deref())
    }

    #[test]
    fn test_complete_current_ticket() {
        let mut view = TrailView::default();
        let ticket = view.begin("moa.gpx");
        assert!(view.is_pending());
        assert_eq!(view.pending_reference(), Some("moa.gpx"));
        assert!(view.complete(ticket, Ok(MOA.to_string())));
        assert!(!view.is_pending());
        assert_eq!(name(&view), Some("A Moa"));
        assert_eq!(view.reference(), Some("moa.gpx"));
        assert_eq!(view.track().len(), 2);
    }

    #[test]
    fn test_stale_result_dropped() {
        let mut view = TrailView::default();
        let old = view.begin("moa.gpx");
        let new = view.begin("louro.gpx");
        assert_ne!(old, new);

        assert!(view.complete(new, Ok(LOURO.to_string())));
        // The earlier request arrives late and must not overwrite.
        assert!(!view.complete(old, Ok(MOA.to_string())));
        assert_eq!(name(&view), Some("Monte Louro"));
    }

    #[test]
    fn test_stale_result_keeps_pending_request() {
        let mut view = TrailView::default();
        let old = view.begin("moa.gpx");
        let new = view.begin("louro.gpx");
        assert!(!view.complete(old, Ok(MOA.to_string())));
        assert!(view.is_pending());
        assert!(view.complete(new, Ok(LOURO.to_string())));
    }

    #[test]
    fn test_unmount_discards_late_result() {
        let mut view = TrailView::default();
        let ticket = view.begin("moa.gpx");
        view.unmount();
        assert!(!view.complete(ticket, Ok(MOA.to_string())));
        assert_eq!(view.state(), &RouteState::NoData);
        assert!(view.track().is_empty());
    }

    #[test]
    fn test_same_reference_not_refetched() {
        let source = MapSource::new();
        let mut view = TrailView::default();
        assert!(view.load(&source, "moa.gpx").is_loaded());
        assert!(view.load(&source, "moa.gpx").is_loaded());
        assert_eq!(source.calls.get(), 1);

        view.load(&source, "louro.gpx");
        assert_eq!(source.calls.get(), 2);
        assert_eq!(name(&view), Some("Monte Louro"));
    }

    #[test]
    fn test_begin_same_pending_reference_keeps_ticket() {
        let mut view = TrailView::default();
        let a = view.begin("moa.gpx");
        let b = view.begin("moa.gpx");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fetch_failure_is_silent_no_data() {
        let source = MapSource::new();
        let mut view = TrailView::default();
        view.load(&source, "moa.gpx");
        assert!(view.state().is_loaded());

        let state = view.load(&source, "missing.gpx");
        assert_eq!(state, &RouteState::NoData);
        assert!(view.track().is_empty());
        assert_eq!(view.reference(), Some("missing.gpx"));
    }

    #[test]
    fn test_parse_failure_is_silent_no_data() {
        let mut view = TrailView::default();
        let ticket = view.begin("broken.gpx");
        assert!(view.complete(ticket, Ok("<gpx><trk></gpx>".to_string())));
        assert_eq!(view.state(), &RouteState::NoData);
    }

    #[test]
    fn test_options_flow_into_profile() {
        let opts = ProfileOptions {
            chart_samples: 1,
            base_path: "/cuncheira".to_string(),
        };
        let mut view = TrailView::new(opts);
        view.load(&MapSource::new(), "moa.gpx");
        let route = view.state().profile().unwrap();
        assert_eq!(route.download_href, "/cuncheira/moa.gpx");
        // stride 2 keeps index 0 and the last point
        assert_eq!(route.samples.len(), 2);
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent-trail-dir");
        let err = source.fetch("a-moa.gpx").unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Fetch);
    }
}
