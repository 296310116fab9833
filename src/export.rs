use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::i18n::Dictionary;
use crate::options::ExportOptions;
use crate::profile::RouteStats;
use crate::route::RouteProfile;
use crate::track::{Track, TrackPoint};

/// Convert a loaded route to a GeoJSON FeatureCollection: the line, then start and end markers.
pub fn to_feature_collection(
    track: &Track,
    route: &RouteProfile,
    dict: &Dictionary,
    opts: &ExportOptions,
) -> FeatureCollection {
    let mut features = Vec::new();

    if track.len() >= 2 {
        features.push(route_feature(track, route, opts));
    }

    let labels = dict.labels(opts.language);
    if let (Some(first), Some(last)) = (track.first(), track.last()) {
        features.push(marker_feature(first, "start", labels.t("nature.route.start"), opts));
        features.push(marker_feature(last, "end", labels.t("nature.route.end"), opts));
    }

    FeatureCollection {
        bbox: Some(bbox(route)),
        features,
        foreign_members: None,
    }
}

fn route_feature(track: &Track, route: &RouteProfile, opts: &ExportOptions) -> Feature {
    let coords: Vec<Vec<f64>> = track
        .points
        .iter()
        .map(|pt| point_coords(pt, opts.include_elevation))
        .collect();

    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String("route".to_string()));
    if let Some(ref name) = route.name {
        props.insert("name".to_string(), JsonValue::String(name.clone()));
    }
    if opts.include_stats {
        insert_stats(&mut props, &route.stats);
    }

    feature(Value::LineString(coords), props)
}

fn marker_feature(pt: &TrackPoint, kind: &str, label: &str, opts: &ExportOptions) -> Feature {
    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String(kind.to_string()));
    props.insert("label".to_string(), JsonValue::String(label.to_string()));

    feature(Value::Point(point_coords(pt, opts.include_elevation)), props)
}

fn feature(value: Value, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &TrackPoint, include_elevation: bool) -> Vec<f64> {
    if include_elevation {
        vec![pt.longitude, pt.latitude, pt.elevation]
    } else {
        vec![pt.longitude, pt.latitude]
    }
}

/// GeoJSON bbox order: [west, south, east, north].
fn bbox(route: &RouteProfile) -> Vec<f64> {
    let b = &route.bounds;
    vec![b.south_west[1], b.south_west[0], b.north_east[1], b.north_east[0]]
}

fn insert_stats(props: &mut Map<String, JsonValue>, stats: &RouteStats) {
    insert_number(props, "totalDistanceKm", stats.total_distance_km);
    insert_number(props, "totalGainMeters", stats.total_gain_meters);
    insert_number(props, "maxElevationMeters", stats.max_elevation_meters);
}

fn insert_number(props: &mut Map<String, JsonValue>, key: &str, value: f64) {
    if let Some(n) = Number::from_f64(value) {
        props.insert(key.to_string(), JsonValue::Number(n));
    }
}
