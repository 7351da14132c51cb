pub mod client;
pub mod config;
pub mod rtree;
pub mod storage;

use std::error::Error;

// 重新导出主要的公共接口
pub use rtree::{IndexError, KnnStrategy, Point, RTree, Rectangle, SplitPolicy, TreeStats};

// 重新导出常用类型，便于二进制文件使用
pub use client::{CliArgs, OutputFormatter};
pub use config::GeoQueryConfig;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
