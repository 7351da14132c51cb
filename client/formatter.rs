use crate::rtree::{Point, Rectangle, TreeStats};
use crate::storage::points_to_geojson;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct OutputFormatter;

/// knn 的 JSON 输出条目
#[derive(Debug, Serialize)]
struct Neighbor<'a> {
    rank: usize,
    name: &'a str,
    category: &'a str,
    x: f64,
    y: f64,
    distance: f64,
}

impl OutputFormatter {
    /// 范围查询报告：按分类分组（分类名排序），每个分类最多列出 `max_listed` 个点
    pub fn format_range_report(query: &Rectangle, results: &[&Point], max_listed: usize) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n\n", "═══ RANGE QUERY ═══".bold()));
        out.push_str(&format!(
            "Area: ({:.1}, {:.1}) to ({:.1}, {:.1})\n",
            query.min[0], query.min[1], query.max[0], query.max[1]
        ));
        out.push_str(&format!(
            "Points found: {}\n",
            results.len().to_string().cyan()
        ));

        if results.is_empty() {
            return out;
        }

        let mut by_category: BTreeMap<&str, Vec<&Point>> = BTreeMap::new();
        for point in results {
            by_category.entry(point.category.as_str()).or_default().push(*point);
        }

        out.push_str(&format!("\n{}\n", "─── Points by Category ───".blue()));
        for (category, points) in &by_category {
            let label = if category.is_empty() { "(uncategorized)" } else { *category };
            out.push_str(&format!("\n{} ({}):\n", label.green(), points.len()));
            for point in points.iter().take(max_listed) {
                out.push_str(&format!("  • {} ({:.1}, {:.1})\n", point.name, point.x, point.y));
            }
            if points.len() > max_listed {
                out.push_str(&format!(
                    "  {}\n",
                    format!("... and {} more", points.len() - max_listed).yellow()
                ));
            }
        }

        out
    }

    /// knn 报告：按距离升序编号
    pub fn format_knn_report(query: &Point, k: usize, results: &[(&Point, f64)]) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n\n", "═══ K-NN QUERY ═══".bold()));
        out.push_str(&format!("Query point: ({:.1}, {:.1})\n", query.x, query.y));
        out.push_str(&format!("K neighbors: {}\n", k.to_string().cyan()));

        if results.is_empty() {
            out.push_str(&format!("\n{}\n", "(empty index)".yellow()));
            return out;
        }

        out.push_str(&format!("\n{}\n", "─── Nearest Neighbors ───".blue()));
        for (i, (point, distance)) in results.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} [{}]\n",
                (i + 1).to_string().blue(),
                point.name,
                point.category.green()
            ));
            out.push_str(&format!(
                "   Position: ({:.1}, {:.1}) - Distance: {:.2}\n",
                point.x, point.y, distance
            ));
        }

        out
    }

    pub fn format_stats(stats: &TreeStats) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n\n", "═══ R-TREE STATISTICS ═══".bold()));
        out.push_str(&format!("Indexed points:        {}\n", stats.size.to_string().cyan()));
        out.push_str(&format!("Tree height:           {}\n", stats.height));
        out.push_str(&format!("Max entries per node:  {}\n", stats.max_entries));
        out.push_str(&format!(
            "Nodes:                 {} ({} leaves)\n",
            stats.node_count, stats.leaf_count
        ));
        out.push_str(&format!("Split policy:          {:?}\n", stats.split_policy));
        if stats.detached > 0 {
            out.push_str(&format!(
                "{}\n",
                format!(
                    "Detached points:       {} ({} reachable)",
                    stats.detached, stats.reachable
                )
                .red()
            ));
        }
        out
    }

    pub fn format_points_json(results: &[&Point]) -> serde_json::Result<String> {
        serde_json::to_string_pretty(results)
    }

    pub fn format_knn_json(results: &[(&Point, f64)]) -> serde_json::Result<String> {
        let neighbors: Vec<Neighbor> = results
            .iter()
            .enumerate()
            .map(|(i, (point, distance))| Neighbor {
                rank: i + 1,
                name: &point.name,
                category: &point.category,
                x: point.x,
                y: point.y,
                distance: *distance,
            })
            .collect();
        serde_json::to_string_pretty(&neighbors)
    }

    pub fn format_stats_json(stats: &TreeStats) -> serde_json::Result<String> {
        serde_json::to_string_pretty(stats)
    }

    pub fn format_points_geojson(results: &[&Point]) -> String {
        points_to_geojson(results, None).to_string()
    }

    pub fn format_knn_geojson(results: &[(&Point, f64)]) -> String {
        let (points, distances): (Vec<&Point>, Vec<f64>) = results.iter().copied().unzip();
        points_to_geojson(&points, Some(distances.as_slice())).to_string()
    }

    pub fn format_error(err: &str) -> String {
        format!("(error) {}", err.red())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtree::SplitPolicy;

    fn sample() -> Vec<Point> {
        vec![
            Point::new(1.0, 1.0, "Banco Popular #1", "Banco"),
            Point::new(2.0, 2.0, "Liceo #2", "Escuela"),
            Point::new(3.0, 3.0, "Banco Nacional #3", "Banco"),
            Point::new(4.0, 4.0, "Plaza #4", ""),
        ]
    }

    #[test]
    fn test_range_report_groups_by_category() {
        let points = sample();
        let refs: Vec<&Point> = points.iter().collect();
        let query = Rectangle::new(0.0, 0.0, 5.0, 5.0);

        let report = OutputFormatter::format_range_report(&query, &refs, 10);
        // 注意：测试时不检查颜色代码，只检查内容
        assert!(report.contains("Area: (0.0, 0.0) to (5.0, 5.0)"));
        assert!(report.contains("(2):"));
        assert!(report.contains("(uncategorized)"));
        assert!(report.contains("  • Liceo #2 (2.0, 2.0)"));

        let banco = report.find("Banco").unwrap();
        let escuela = report.find("Escuela").unwrap();
        assert!(banco < escuela);
        assert!(!report.contains("more"));
    }

    #[test]
    fn test_range_report_truncates_categories() {
        let points: Vec<Point> = (0..13)
            .map(|i| Point::new(i as f64, 0.0, format!("Parque #{}", i + 1), "Parque"))
            .collect();
        let refs: Vec<&Point> = points.iter().collect();
        let query = Rectangle::new(0.0, 0.0, 20.0, 1.0);

        let report = OutputFormatter::format_range_report(&query, &refs, 10);
        assert!(report.contains("(13):"));
        assert!(report.contains("Parque #10 "));
        assert!(!report.contains("Parque #11 "));
        assert!(report.contains("... and 3 more"));
    }

    #[test]
    fn test_range_report_empty() {
        let query = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let report = OutputFormatter::format_range_report(&query, &[], 10);
        assert!(!report.contains("Points by Category"));
    }

    #[test]
    fn test_knn_report() {
        let points = sample();
        let results = vec![(&points[1], 1.0), (&points[0], 2.23606)];
        let report = OutputFormatter::format_knn_report(&Point::query(2.0, 3.0), 2, &results);

        assert!(report.contains("Query point: (2.0, 3.0)"));
        assert!(report.contains("Liceo #2"));
        assert!(report.contains("   Position: (2.0, 2.0) - Distance: 1.00"));
        assert!(report.contains("   Position: (1.0, 1.0) - Distance: 2.24"));
        assert!(report.find("Liceo #2").unwrap() < report.find("Banco Popular #1").unwrap());
    }

    #[test]
    fn test_format_stats() {
        let mut stats = TreeStats {
            size: 5,
            reachable: 5,
            detached: 0,
            height: 2,
            max_entries: 4,
            node_count: 3,
            leaf_count: 2,
            split_policy: SplitPolicy::Propagate,
        };
        let text = OutputFormatter::format_stats(&stats);
        assert!(text.contains("Tree height:           2"));
        assert!(text.contains("Max entries per node:  4"));
        assert!(!text.contains("Detached"));

        stats.detached = 3;
        stats.reachable = 2;
        assert!(OutputFormatter::format_stats(&stats).contains("Detached points:       3 (2 reachable)"));
    }

    #[test]
    fn test_json_outputs() {
        let points = sample();
        let refs: Vec<&Point> = points.iter().take(2).collect();

        let json = OutputFormatter::format_points_json(&refs).unwrap();
        let parsed: Vec<Point> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, points[..2].to_vec());

        let json = OutputFormatter::format_knn_json(&[(&points[0], 0.5)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["rank"], 1);
        assert_eq!(value[0]["category"], "Banco");
        assert_eq!(value[0]["distance"], 0.5);
    }

    #[test]
    fn test_geojson_outputs() {
        let points = sample();
        let text = OutputFormatter::format_knn_geojson(&[(&points[2], 1.25)]);
        let geojson: geojson::GeoJson = text.parse().unwrap();
        match geojson {
            geojson::GeoJson::FeatureCollection(fc) => {
                assert_eq!(fc.features.len(), 1);
                let feature = &fc.features[0];
                assert_eq!(feature.property("name").and_then(|v| v.as_str()), Some("Banco Nacional #3"));
                assert_eq!(feature.property("distance").and_then(|v| v.as_f64()), Some(1.25));
            }
            other => panic!("expected FeatureCollection, got {:?}", other),
        }

        let refs: Vec<&Point> = points.iter().collect();
        assert!(OutputFormatter::format_points_geojson(&refs).contains("\"FeatureCollection\""));
    }
}
