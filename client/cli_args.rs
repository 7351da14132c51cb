use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "poi-rtree",
    version,
    about = "Range and nearest-neighbor queries over points of interest",
    long_about = "poi-rtree loads a set of labeled points (JSON array or GeoJSON), indexes them in an R-tree\nand answers rectangle range queries and k-nearest-neighbor queries."
)]
pub struct CliArgs {
    /// 配置文件路径
    #[arg(short, long, default_value = "poi-rtree.toml")]
    pub config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    pub generate_config: bool,

    /// Points file: a JSON array of {x, y, name, category} or a GeoJSON FeatureCollection
    #[arg(short, long)]
    pub points: Option<String>,

    /// Maximum entries per node (overrides config file)
    #[arg(short = 'm', long)]
    pub max_entries: Option<usize>,

    /// Log level (overrides config file)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Points inside the rectangle spanned by two corners (boundary inclusive)
    Range {
        #[arg(allow_negative_numbers = true)]
        x1: f64,
        #[arg(allow_negative_numbers = true)]
        y1: f64,
        #[arg(allow_negative_numbers = true)]
        x2: f64,
        #[arg(allow_negative_numbers = true)]
        y2: f64,
    },
    /// The k points closest to (x, y)
    Knn {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Number of neighbors (defaults to query.default_k)
        #[arg(short)]
        k: Option<usize>,
    },
    /// Tree statistics
    Stats,
    /// Tree structure as JSON
    Tree,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Geojson,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.generate_config && self.command.is_none() {
            return Err(
                "No command specified. Use one of: range, knn, stats, tree.".to_string(),
            );
        }

        if let Some(max_entries) = self.max_entries {
            if max_entries < 2 {
                return Err("Max entries must be at least 2".to_string());
            }
        }

        match &self.command {
            Some(Command::Knn { k: Some(0), .. }) => {
                Err("k must be greater than 0".to_string())
            }
            Some(Command::Stats | Command::Tree) if self.format == OutputFormat::Geojson => {
                Err("GeoJSON output is only available for range and knn".to_string())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        let args = CliArgs::try_parse_from([
            "poi-rtree", "--points", "pois.json", "range", "10", "-5.5", "0", "20",
        ])
        .unwrap();
        assert_eq!(args.points.as_deref(), Some("pois.json"));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(
            args.command,
            Some(Command::Range { x1: 10.0, y1: -5.5, x2: 0.0, y2: 20.0 })
        );
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_knn_with_format() {
        let args =
            CliArgs::try_parse_from(["poi-rtree", "-f", "geojson", "knn", "1", "2", "-k", "3"])
                .unwrap();
        assert_eq!(args.format, OutputFormat::Geojson);
        assert_eq!(args.command, Some(Command::Knn { x: 1.0, y: 2.0, k: Some(3) }));
    }

    #[test]
    fn test_validate() {
        let args = CliArgs::try_parse_from(["poi-rtree"]).unwrap();
        assert!(args.validate().is_err());

        let args = CliArgs::try_parse_from(["poi-rtree", "--generate-config"]).unwrap();
        assert!(args.validate().is_ok());

        let args = CliArgs::try_parse_from(["poi-rtree", "knn", "0", "0", "-k", "0"]).unwrap();
        assert!(args.validate().is_err());

        let args = CliArgs::try_parse_from(["poi-rtree", "-m", "1", "stats"]).unwrap();
        assert!(args.validate().is_err());

        let args = CliArgs::try_parse_from(["poi-rtree", "-f", "geojson", "tree"]).unwrap();
        assert!(args.validate().is_err());

        let args = CliArgs::try_parse_from(["poi-rtree", "-f", "json", "stats"]).unwrap();
        assert!(args.validate().is_ok());
    }
}
