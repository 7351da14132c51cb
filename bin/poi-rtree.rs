use poi_rtree::client::{Command, OutputFormat};
use poi_rtree::{CliArgs, GeoQueryConfig, OutputFormatter, Point, RTree, Rectangle, Result};
use tracing::{info, warn, Level};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", OutputFormatter::format_error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();
    args.validate()?;

    // 生成默认配置文件
    if args.generate_config {
        let config = GeoQueryConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        return Ok(());
    }

    // 加载配置
    let mut config = GeoQueryConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(max_entries) = args.max_entries {
        config.index.max_entries = max_entries;
    }
    if let Some(log_level) = args.log_level.clone() {
        config.logging.level = log_level;
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging)?;

    info!("📦 poi-rtree {}", env!("CARGO_PKG_VERSION"));

    let points = match &args.points {
        Some(path) => poi_rtree::storage::load_points(path)?,
        None => {
            warn!("no points file given, querying an empty index");
            Vec::new()
        }
    };

    let mut tree = RTree::with_config(&config.index)?;
    for point in points {
        tree.insert(point)?;
    }
    info!(
        "🌳 Indexed {} points (height {}, max entries {})",
        tree.size(),
        tree.height(),
        tree.max_entries()
    );

    let Some(command) = &args.command else {
        return Ok(());
    };

    let output = match command {
        Command::Range { x1, y1, x2, y2 } => {
            let query = Rectangle::from_corners(*x1, *y1, *x2, *y2);
            let results = tree.range_query(&query)?;
            match args.format {
                OutputFormat::Text => OutputFormatter::format_range_report(
                    &query,
                    &results,
                    config.query.max_listed_per_category,
                ),
                OutputFormat::Json => OutputFormatter::format_points_json(&results)?,
                OutputFormat::Geojson => OutputFormatter::format_points_geojson(&results),
            }
        }
        Command::Knn { x, y, k } => {
            let k = k.unwrap_or(config.query.default_k);
            let query = Point::query(*x, *y);
            let results = tree.knn(&query, k, config.query.knn_strategy)?;
            match args.format {
                OutputFormat::Text => OutputFormatter::format_knn_report(&query, k, &results),
                OutputFormat::Json => OutputFormatter::format_knn_json(&results)?,
                OutputFormat::Geojson => OutputFormatter::format_knn_geojson(&results),
            }
        }
        Command::Stats => match args.format {
            OutputFormat::Json => OutputFormatter::format_stats_json(&tree.stats())?,
            OutputFormat::Text | OutputFormat::Geojson => {
                config.print_summary();
                OutputFormatter::format_stats(&tree.stats())
            }
        },
        Command::Tree => tree.export_to_json()?,
    };

    println!("{}", output.trim_end());
    Ok(())
}

/// 初始化日志系统
fn init_logging(config: &poi_rtree::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match (config.output.as_str(), &config.log_file) {
        ("file", Some(log_file)) => {
            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .map_err(|e| format!("Failed to open log file '{}': {}", log_file.display(), e))?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }

    Ok(())
}
