use crate::rtree::Point;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use std::path::Path;
use tracing::{debug, warn};

/// 从文件读取点集
///
/// 支持两种格式：
/// - JSON 数组：`[{"x": 1.0, "y": 2.0, "name": "...", "category": "..."}]`
/// - GeoJSON FeatureCollection / Feature，几何类型必须是 Point，
///   名称和分类取自 properties 的 `name` / `category`
pub fn load_points(path: impl AsRef<Path>) -> crate::Result<Vec<Point>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read dataset '{}': {}", path.display(), e))?;
    let points = parse_points(&content)?;
    debug!("loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// 从字符串解析点集，格式同 [`load_points`]
pub fn parse_points(content: &str) -> crate::Result<Vec<Point>> {
    if content.trim_start().starts_with('[') {
        let points: Vec<Point> = serde_json::from_str(content)?;
        return Ok(points);
    }

    match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .enumerate()
            .map(|(i, feature)| feature_to_point(feature, i))
            .collect(),
        GeoJson::Feature(feature) => Ok(vec![feature_to_point(&feature, 0)?]),
        GeoJson::Geometry(_) => Err("仅支持 GeoJSON Feature 和 FeatureCollection 类型".into()),
    }
}

/// GeoJSON Feature 转为兴趣点，缺少名称时使用 `#<序号>`
fn feature_to_point(feature: &Feature, index: usize) -> crate::Result<Point> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| format!("Feature {} has no geometry", index))?;

    let (x, y) = match &geometry.value {
        Value::Point(coords) if coords.len() >= 2 => (coords[0], coords[1]),
        Value::Point(_) => return Err(format!("Feature {} has fewer than 2 coordinates", index).into()),
        _ => return Err(format!("Feature {} is not a Point", index).into()),
    };

    let property = |key: &str| {
        feature
            .property(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let name = property("name").unwrap_or_else(|| {
        warn!("feature {} has no name property", index);
        format!("#{}", index + 1)
    });
    let category = property("category").unwrap_or_default();

    Ok(Point::new(x, y, name, category))
}

/// 把点集转为 GeoJSON FeatureCollection，`distances` 非空时写入 distance 属性
pub fn points_to_geojson(points: &[&Point], distances: Option<&[f64]>) -> GeoJson {
    let features = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), point.name.clone().into());
            properties.insert("category".to_string(), point.category.clone().into());
            if let Some(distance) = distances.and_then(|d| d.get(i)) {
                properties.insert("distance".to_string(), (*distance).into());
            }

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![point.x, point.y]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
