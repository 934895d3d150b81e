use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{FeedError, FeedResult};

/// One earthquake from the seismic feed, validated at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub place: Option<String>,
    /// Epoch milliseconds
    pub time: Option<i64>,
    pub magnitude: f64,
    pub longitude: f64,
    pub latitude: f64,
    /// Kilometres, third coordinate of the geometry
    pub depth: f64,
}

/// A boundary shape, kept as raw GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    pub geometry: Value,
    #[serde(default)]
    pub properties: Value,
}

impl BoundaryFeature {
    pub fn to_geojson(&self) -> Value {
        serde_json::json!({
            "type": "Feature",
            "properties": self.properties,
            "geometry": self.geometry,
        })
    }
}

/// What to do with a feature that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Fail the whole feed
    #[default]
    Reject,
    /// Log and drop the feature
    Skip,
}

fn feature_array(body: &str) -> FeedResult<Vec<Value>> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| FeedError::InvalidDocument(format!("not valid JSON: {}", e)))?;
    match document {
        Value::Object(mut map) => match map.remove("features") {
            Some(Value::Array(features)) => Ok(features),
            Some(_) => Err(FeedError::InvalidDocument(
                "'features' is not an array".to_string(),
            )),
            None => Err(FeedError::InvalidDocument(
                "missing 'features' array".to_string(),
            )),
        },
        _ => Err(FeedError::InvalidDocument(
            "top level is not an object".to_string(),
        )),
    }
}

fn finite(value: Option<&Value>, what: &str) -> Result<f64, String> {
    match value {
        None | Some(Value::Null) => Err(format!("missing {}", what)),
        Some(v) => match v.as_f64() {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(format!("{} is not a finite number", what)),
        },
    }
}

fn parse_event(feature: &Value) -> Result<EventRecord, String> {
    let feature = feature
        .as_object()
        .ok_or_else(|| "feature is not an object".to_string())?;
    let empty = Map::new();
    let properties = match feature.get("properties") {
        Some(Value::Object(props)) => props,
        None | Some(Value::Null) => &empty,
        Some(_) => return Err("properties is not an object".to_string()),
    };

    let coordinates = feature
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
        .ok_or_else(|| "missing geometry.coordinates".to_string())?;
    if coordinates.len() < 3 {
        return Err(format!(
            "geometry.coordinates has {} values, expected [lon, lat, depth]",
            coordinates.len()
        ));
    }
    let longitude = finite(coordinates.first(), "longitude")?;
    let latitude = finite(coordinates.get(1), "latitude")?;
    let depth = finite(coordinates.get(2), "depth")?;
    let magnitude = finite(properties.get("mag"), "properties.mag")?;

    let place = properties
        .get("place")
        .and_then(Value::as_str)
        .map(str::to_string);
    let time = match properties.get("time") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_i64()
                .ok_or_else(|| "properties.time is not integer milliseconds".to_string())?,
        ),
    };

    Ok(EventRecord {
        place,
        time,
        magnitude,
        longitude,
        latitude,
        depth,
    })
}

/// Parses a seismic feed into validated records, in feed order.
pub fn parse_event_collection(body: &str, policy: RecordPolicy) -> FeedResult<Vec<EventRecord>> {
    let features = feature_array(body)?;
    let mut events = Vec::with_capacity(features.len());

    for (index, feature) in features.iter().enumerate() {
        match parse_event(feature) {
            Ok(event) => events.push(event),
            Err(reason) => match policy {
                RecordPolicy::Reject => {
                    return Err(FeedError::MalformedRecord { index, reason });
                }
                RecordPolicy::Skip => {
                    warn!("Skipping malformed record {}: {}", index, reason);
                }
            },
        }
    }

    debug!(
        "Parsed {} of {} earthquake features",
        events.len(),
        features.len()
    );
    Ok(events)
}

/// Parses a boundary feed. Every feature needs a geometry object.
pub fn parse_boundary_collection(body: &str) -> FeedResult<Vec<BoundaryFeature>> {
    let features = feature_array(body)?;
    features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            if !feature.get("geometry").map_or(false, Value::is_object) {
                return Err(FeedError::MalformedRecord {
                    index,
                    reason: "missing geometry object".to_string(),
                });
            }
            serde_json::from_value(feature).map_err(|e| FeedError::MalformedRecord {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}
