use crate::rtree::{KnnStrategy, SplitPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// poi-rtree 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoQueryConfig {
    /// 索引配置
    pub index: IndexConfig,

    /// 查询配置
    pub query: QueryConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 索引配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// 每个节点的最大条目数
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// 非根节点分裂策略：propagate, root_only
    #[serde(default)]
    pub split_policy: SplitPolicy,
}

/// 查询配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// knn 未指定 k 时使用的默认值
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// KNN 算法：scan, best_first
    #[serde(default)]
    pub knn_strategy: KnnStrategy,

    /// 范围查询报告中每个分类最多列出的点数
    #[serde(default = "default_max_listed_per_category")]
    pub max_listed_per_category: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stderr, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_max_entries() -> usize {
    4
}

fn default_k() -> usize {
    5
}

fn default_max_listed_per_category() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stderr".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            split_policy: SplitPolicy::default(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            knn_strategy: KnnStrategy::default(),
            max_listed_per_category: default_max_listed_per_category(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
            log_file: None,
        }
    }
}

impl GeoQueryConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（POI_RTREE__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use poi_rtree::config::GeoQueryConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = GeoQueryConfig::from_file("poi-rtree.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("POI_RTREE").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查节点容量、默认 k、日志级别和日志输出
    pub fn validate(&self) -> Result<(), String> {
        if self.index.max_entries < 2 {
            return Err(format!(
                "Invalid max_entries: {}. Must be at least 2",
                self.index.max_entries
            ));
        }

        if self.query.default_k == 0 {
            return Err("Invalid default_k: must be greater than 0".to_string());
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        match self.logging.output.as_str() {
            "stderr" => {}
            "file" => {
                if self.logging.log_file.is_none() {
                    return Err(
                        "Log output is 'file' but log_file path is not specified".to_string()
                    );
                }
            }
            other => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stderr, file",
                    other
                ))
            }
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 poi-rtree Configuration:");
        println!("   Max Entries:  {}", self.index.max_entries);
        println!("   Split Policy: {:?}", self.index.split_policy);
        println!();
        println!("   Default K:    {}", self.query.default_k);
        println!("   KNN Strategy: {:?}", self.query.knn_strategy);
        println!();
        println!("   Log Level:    {}", self.logging.level);
        println!("   Log Output:   {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:     {}", log_file.display());
        }
        println!();
    }
}
