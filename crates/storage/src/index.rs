//! Index validation and key extraction
//!
//! The reference store does not build search structures; it keeps an index
//! catalog per collection and enforces the constraints a real store checks
//! when an index is created or a document is inserted:
//! - key patterns must be well formed (`validate_spec`)
//! - geo-indexed fields must hold extractable coordinates (`check_document`)

use pipebench_core::{Document, IndexKind, IndexSpec, Value};

/// Planar `2d` bounds (min inclusive, max exclusive)
pub const GEO_2D_MIN: f64 = -180.0;
/// Planar `2d` upper bound (exclusive)
pub const GEO_2D_MAX: f64 = 180.0;

/// Reject malformed key patterns
pub fn validate_spec(spec: &IndexSpec) -> Result<(), String> {
    if spec.is_empty() {
        return Err("index key pattern is empty".to_string());
    }

    let mut geo_fields = 0;
    for (field, kind) in spec.fields() {
        if field.is_empty() {
            return Err("index field names cannot be empty".to_string());
        }
        if field.starts_with('$') {
            return Err(format!("index field '{}' cannot start with '$'", field));
        }
        if field.split('.').any(str::is_empty) {
            return Err(format!("index field '{}' has an empty path segment", field));
        }
        match kind {
            IndexKind::Geo2d | IndexKind::Geo2dSphere => geo_fields += 1,
            IndexKind::Hashed if spec.len() > 1 => {
                return Err("hashed indexes cannot be compound".to_string())
            }
            _ => {}
        }
    }

    if geo_fields > 1 {
        return Err("at most one geo field per index".to_string());
    }
    Ok(())
}

/// Check that `doc` can be keyed by `spec`
///
/// Missing and null values are allowed for every kind (sparse geo keys).
pub fn check_document(spec: &IndexSpec, doc: &Document) -> Result<(), String> {
    for (field, kind) in spec.fields() {
        let value = match doc.get_path(field) {
            None | Some(Value::Null) => continue,
            Some(v) => v,
        };
        match kind {
            IndexKind::Geo2d => check_planar(field, value)?,
            IndexKind::Geo2dSphere => check_spherical(field, value)?,
            _ => {}
        }
    }
    Ok(())
}

/// Extract a legacy coordinate pair from `[x, y]` or `{x: .., y: ..}`
pub fn legacy_pair(value: &Value) -> Option<(f64, f64)> {
    let mut numbers: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(doc) => doc.iter().map(|(_, v)| v).collect(),
        _ => return None,
    };
    if numbers.len() < 2 {
        return None;
    }
    numbers.truncate(2);
    Some((numbers[0].as_f64()?, numbers[1].as_f64()?))
}

fn check_planar(field: &str, value: &Value) -> Result<(), String> {
    let (x, y) = legacy_pair(value)
        .ok_or_else(|| format!("location object expected for '{}', got {}", field, value.type_name()))?;
    for coord in [x, y] {
        if !(GEO_2D_MIN..GEO_2D_MAX).contains(&coord) {
            return Err(format!(
                "point not in interval of [ {}, {} ) for '{}': {}",
                GEO_2D_MIN, GEO_2D_MAX, field, coord
            ));
        }
    }
    Ok(())
}

fn check_spherical(field: &str, value: &Value) -> Result<(), String> {
    let (lng, lat) = match value.as_document() {
        Some(doc) if doc.contains_key("type") => geojson_point(doc)
            .ok_or_else(|| format!("can't extract geo keys from '{}': malformed GeoJSON", field))?,
        _ => legacy_pair(value)
            .ok_or_else(|| format!("can't extract geo keys from '{}': not a point", field))?,
    };
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return Err(format!(
            "can't extract geo keys from '{}': longitude/latitude out of bounds ({}, {})",
            field, lng, lat
        ));
    }
    Ok(())
}

fn geojson_point(doc: &Document) -> Option<(f64, f64)> {
    if doc.get("type")?.as_str()? != "Point" {
        return None;
    }
    match doc.get("coordinates")?.as_array()? {
        [lng, lat] => Some((lng.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipebench_core::{array, doc};

    #[test]
    fn test_validate_spec_accepts_common_patterns() {
        assert!(validate_spec(&IndexSpec::ascending("a")).is_ok());
        assert!(validate_spec(&IndexSpec::geo_2d("geo")).is_ok());
        assert!(validate_spec(&IndexSpec::ascending("a.b").with("c", IndexKind::Descending)).is_ok());
    }

    #[test]
    fn test_validate_spec_rejects_bad_patterns() {
        assert!(validate_spec(&IndexSpec::new()).is_err());
        assert!(validate_spec(&IndexSpec::ascending("")).is_err());
        assert!(validate_spec(&IndexSpec::ascending("$a")).is_err());
        assert!(validate_spec(&IndexSpec::ascending("a..b")).is_err());
        let two_geo = IndexSpec::geo_2d("a").with("b", IndexKind::Geo2dSphere);
        assert!(validate_spec(&two_geo).is_err());
        let compound_hashed = IndexSpec::new()
            .with("a", IndexKind::Hashed)
            .with("b", IndexKind::Ascending);
        assert!(validate_spec(&compound_hashed).is_err());
    }

    #[test]
    fn test_planar_points() {
        let spec = IndexSpec::geo_2d("geo");
        assert!(check_document(&spec, &doc! { "geo" => array![1.5, -3.0] }).is_ok());
        assert!(check_document(&spec, &doc! { "geo" => doc! { "x" => 1, "y" => 2 } }).is_ok());
        assert!(check_document(&spec, &doc! { "other" => 1 }).is_ok());
        assert!(check_document(&spec, &doc! { "geo" => "nowhere" }).is_err());
        assert!(check_document(&spec, &doc! { "geo" => array![180.0, 0.0] }).is_err());
        assert!(check_document(&spec, &doc! { "geo" => array![1.0] }).is_err());
    }

    #[test]
    fn test_spherical_points() {
        let spec = IndexSpec::geo_2dsphere("geo");
        let point = doc! { "type" => "Point", "coordinates" => array![-73.9, 40.7] };
        assert!(check_document(&spec, &doc! { "geo" => point }).is_ok());
        assert!(check_document(&spec, &doc! { "geo" => array![10.0, 89.0] }).is_ok());

        let bad_lat = doc! { "type" => "Point", "coordinates" => array![0.0, 95.0] };
        assert!(check_document(&spec, &doc! { "geo" => bad_lat }).is_err());
        let bad_type = doc! { "type" => "Polygon", "coordinates" => array![] };
        assert!(check_document(&spec, &doc! { "geo" => bad_type }).is_err());
    }
}
