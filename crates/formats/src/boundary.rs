use foundation::math::GeoPoint;
use serde_json::{Map, Value};
use tracing::warn;

/// Ordered ring of geographic points; closure is implied.
pub type Ring = Vec<GeoPoint>;

/// One polygon: outer ring first, holes after.
pub type RingSet = Vec<Ring>;

/// One administrative region at the current navigation level.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Stable region code.
    pub id: String,
    pub name: String,
    pub centroid: Option<GeoPoint>,
    /// A Polygon has one ring set, a MultiPolygon several.
    pub ring_sets: Vec<RingSet>,
    pub child_count: u32,
    /// Opaque reference to the next level's boundary document.
    pub child_dataset: Option<String>,
}

/// One level's full set of regions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryDocument {
    pub features: Vec<BoundaryFeature>,
    /// Features dropped at parse time: no areal geometry, or geometry that
    /// could not be read.
    pub skipped_features: usize,
}

/// Document-level parse failure. Problems inside one feature never produce
/// this; that feature is skipped instead.
#[derive(Debug)]
pub enum BoundaryParseError {
    Json(serde_json::Error),
    NotAFeatureCollection,
}

impl std::fmt::Display for BoundaryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryParseError::Json(e) => write!(f, "JSON parse error: {e}"),
            BoundaryParseError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
        }
    }
}

impl std::error::Error for BoundaryParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoundaryParseError::Json(e) => Some(e),
            BoundaryParseError::NotAFeatureCollection => None,
        }
    }
}

impl From<serde_json::Error> for BoundaryParseError {
    fn from(e: serde_json::Error) -> Self {
        BoundaryParseError::Json(e)
    }
}

impl BoundaryDocument {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryParseError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryParseError> {
        let obj = value
            .as_object()
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(BoundaryParseError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;

        let mut doc = BoundaryDocument::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            match parse_feature(index, feat_val) {
                Ok(Some(feature)) => doc.features.push(feature),
                Ok(None) => {
                    warn!(index, "skipping boundary feature without polygon geometry");
                    doc.skipped_features += 1;
                }
                Err(reason) => {
                    warn!(index, %reason, "skipping malformed boundary feature");
                    doc.skipped_features += 1;
                }
            }
        }

        Ok(doc)
    }

    /// Every polygon of every feature, for fitting a projection.
    pub fn polygons(&self) -> impl Iterator<Item = &[Ring]> + '_ {
        self.features
            .iter()
            .flat_map(|f| f.ring_sets.iter().map(|rings| rings.as_slice()))
    }
}

/// `Ok(None)` for features that carry no area.
fn parse_feature(index: usize, value: &Value) -> Result<Option<BoundaryFeature>, String> {
    let feat_obj = value.as_object().ok_or("feature must be an object".to_string())?;
    let properties = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let ring_sets = match feat_obj.get("geometry") {
        Some(Value::Null) | None => None,
        Some(geometry) => parse_areal_geometry(geometry)?,
    };
    let Some(ring_sets) = ring_sets else {
        return Ok(None);
    };

    let id = region_id(feat_obj, &properties).unwrap_or_else(|| index.to_string());
    let name = properties
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let centroid = present(&properties, "centroid")
        .or_else(|| present(&properties, "center"))
        .and_then(|v| match parse_point(v) {
            Ok(p) => Some(p),
            Err(reason) => {
                warn!(index, region = %id, %reason, "ignoring unreadable centroid");
                None
            }
        });
    let child_count = properties
        .get("childrenNum")
        .and_then(|v| v.as_u64())
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(0);
    let child_dataset = properties
        .get("filename")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(Some(BoundaryFeature {
        id,
        name,
        centroid,
        ring_sets,
        child_count,
        child_dataset,
    }))
}

/// Property value, with an explicit `null` treated as missing.
fn present<'a>(properties: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    properties.get(key).filter(|v| !v.is_null())
}

fn region_id(feature: &Map<String, Value>, properties: &Map<String, Value>) -> Option<String> {
    let value = properties
        .get("code")
        .or_else(|| properties.get("adcode"))
        .or_else(|| feature.get("id"))?;
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns `Ok(None)` for geometry types that carry no area.
fn parse_areal_geometry(value: &Value) -> Result<Option<Vec<RingSet>>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    match ty {
        "Polygon" => {
            let coords = coordinates(obj)?;
            Ok(Some(vec![parse_polygon(coords)?]))
        }
        "MultiPolygon" => {
            let coords = coordinates(obj)?;
            Ok(Some(parse_multi_polygon(coords)?))
        }
        _ => Ok(None),
    }
}

fn coordinates(obj: &Map<String, Value>) -> Result<&Value, String> {
    obj.get("coordinates")
        .ok_or("geometry missing coordinates".to_string())
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinate must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("coordinate must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_polygon(coords: &Value) -> Result<RingSet, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<RingSet>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}

#[cfg(test)]
mod tests {
    use super::{BoundaryDocument, BoundaryParseError};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_polygon_and_multipolygon_features() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "code": 110000, "name": "Alpha", "centroid": [116.4, 40.2],
                        "childrenNum": 16, "filename": "110000"
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "adcode": "120000", "name": "Beta", "center": [1.5, 2.5] },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[2, 2], [3, 2], [3, 3]]],
                            [[[4, 4], [6, 4], [6, 6], [4, 6]], [[5, 5], [5.5, 5], [5.5, 5.5]]]
                        ]
                    }
                }
            ]
        });

        let doc = BoundaryDocument::from_geojson_value(&value).expect("parse");
        assert_eq!(doc.features.len(), 2);

        let a = &doc.features[0];
        assert_eq!(a.id, "110000");
        assert_eq!(a.name, "Alpha");
        assert_eq!(a.centroid, Some(GeoPoint::new(116.4, 40.2)));
        assert_eq!(a.ring_sets.len(), 1);
        assert_eq!(a.ring_sets[0][0].len(), 5);
        assert_eq!(a.child_count, 16);
        assert_eq!(a.child_dataset.as_deref(), Some("110000"));

        let b = &doc.features[1];
        assert_eq!(b.id, "120000");
        assert_eq!(b.centroid, Some(GeoPoint::new(1.5, 2.5)));
        assert_eq!(b.ring_sets.len(), 2);
        assert_eq!(b.ring_sets[1].len(), 2);
        assert_eq!(b.child_count, 0);
        assert_eq!(b.child_dataset, None);

        assert_eq!(doc.polygons().count(), 3);
    }

    #[test]
    fn children_without_filename_have_no_dataset() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 7,
                "properties": { "name": "Gamma", "childrenNum": 3 },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]] }
            }]
        });
        let doc = BoundaryDocument::from_geojson_value(&value).expect("parse");
        assert_eq!(doc.features[0].id, "7");
        assert_eq!(doc.features[0].child_count, 3);
        assert_eq!(doc.features[0].child_dataset, None);
    }

    #[test]
    fn non_areal_features_are_skipped() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [0, 0] } },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        });
        let doc = BoundaryDocument::from_geojson_value(&value).expect("parse");
        assert!(doc.features.is_empty());
        assert_eq!(doc.skipped_features, 2);
    }

    #[test]
    fn rejects_non_collections_and_bad_json() {
        let err = BoundaryDocument::from_geojson_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert!(matches!(err, BoundaryParseError::NotAFeatureCollection));

        let err = BoundaryDocument::from_geojson_str("{not json").unwrap_err();
        assert!(matches!(err, BoundaryParseError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn malformed_features_are_skipped_not_fatal() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "code": "good", "name": "Good", "centroid": [0.5, 0.5] },
                    "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "code": "fallback", "centroid": null, "center": [2.5, 0.5] },
                    "geometry": { "type": "Polygon", "coordinates": [[[2, 0], [3, 0], [3, 1], [2, 1]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "code": "odd", "centroid": "middle" },
                    "geometry": { "type": "Polygon", "coordinates": [[[4, 0], [5, 0], [5, 1]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "code": "broken" },
                    "geometry": { "type": "Polygon", "coordinates": [[["a", 0], [1, 0], [1, 1]]] }
                },
                "not a feature"
            ]
        });

        let doc = BoundaryDocument::from_geojson_value(&value).expect("level survives");
        let ids: Vec<&str> = doc.features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["good", "fallback", "odd"]);
        assert_eq!(doc.skipped_features, 2);
        assert_eq!(doc.features[0].centroid, Some(GeoPoint::new(0.5, 0.5)));
        assert_eq!(doc.features[1].centroid, Some(GeoPoint::new(2.5, 0.5)));
        assert_eq!(doc.features[2].centroid, None);
    }
}
