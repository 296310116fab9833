use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::TrackError;
use crate::track::{Track, TrackPoint};

type Result<T> = std::result::Result<T, TrackError>;

/// Parse a GPX XML string into the points of its first track.
///
/// Every `<trkseg>` of that track is concatenated in document order. Waypoints,
/// routes and any later tracks are ignored. A document without a `<trk>` gives
/// an empty track rather than an error; one that stops with an element still
/// open is [`TrackError::UnexpectedEof`].
pub fn parse_track(xml: &str) -> Result<Track> {
    let mut reader = Reader::from_str(xml);
    let mut track: Option<Track> = None;
    // open elements outside the first <trk>; a cut-off download leaves some open
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() != b"trk" {
                    depth += 1;
                } else if track.is_none() {
                    track = Some(parse_trk(&mut reader)?);
                } else {
                    reader.read_to_end(e.name())?;
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trk" && track.is_none() {
                    track = Some(Track::default());
                }
            }
            Ok(Event::Eof) if depth > 0 => return Err(TrackError::UnexpectedEof { element: "gpx" }),
            Ok(Event::Eof) => break,
            Err(e) => return Err(TrackError::XmlParse(e)),
            _ => {}
        }
    }

    let track = track.unwrap_or_default();
    debug!("[Parser] Parsed track with {} points", track.len());
    Ok(track)
}

/// Parse lat/lon attributes from a `<trkpt>` start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| TrackError::XmlParse(e.into()))?;
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(parse_coordinate("lat", val)?),
            b"lon" => lon = Some(parse_coordinate("lon", val)?),
            _ => {}
        }
    }

    let lat = lat.ok_or(TrackError::MissingAttribute {
        element: "trkpt",
        attribute: "lat",
    })?;
    let lon = lon.ok_or(TrackError::MissingAttribute {
        element: "trkpt",
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

fn parse_coordinate(attribute: &'static str, val: &str) -> Result<f64> {
    val.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TrackError::InvalidAttribute {
            element: "trkpt",
            attribute,
            value: val.to_string(),
        })
}

/// Parse a `<trk>` element. Called after its start tag.
fn parse_trk<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Track> {
    let mut track = Track::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => track.name = Some(read_text_owned(reader, &e, "name")?),
                b"trkseg" => parse_segment(reader, &mut track.points)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => return Err(TrackError::UnexpectedEof { element: "trk" }),
            Err(e) => return Err(TrackError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a `<trkseg>` element, appending its points.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>, points: &mut Vec<TrackPoint>) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        points.push(pt);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    match parse_lat_lon(&e) {
                        Ok((lat, lon)) => points.push(TrackPoint::new(lat, lon, 0.0)),
                        Err(err) => debug!("[Parser] Skipping point: {err}"),
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => return Err(TrackError::UnexpectedEof { element: "trkseg" }),
            Err(e) => return Err(TrackError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(())
}

/// Parse a `<trkpt>` and its children. Points with missing or bad coordinates are skipped.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<TrackPoint>> {
    let (lat, lon) = match parse_lat_lon(start) {
        Ok(coords) => coords,
        Err(err) => {
            debug!("[Parser] Skipping point: {err}");
            reader.read_to_end(start.name())?;
            return Ok(None);
        }
    };

    let mut elevation = 0.0;
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    elevation = read_text_owned(reader, &e, "ele")?
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .unwrap_or(0.0);
                }
                _ => {
                    // time, name, extensions and the rest are not needed
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => return Err(TrackError::UnexpectedEof { element: "trkpt" }),
            Err(e) => return Err(TrackError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Some(TrackPoint::new(lat, lon, elevation)))
}

/// Trimmed text content of `<name>` or `<ele>`, with CDATA and entity references resolved.
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
    element: &'static str,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::CData(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => return Err(TrackError::UnexpectedEof { element }),
            Err(e) => return Err(TrackError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}
