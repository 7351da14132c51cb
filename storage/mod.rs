pub mod dataset;

pub use dataset::{load_points, parse_points, points_to_geojson};
