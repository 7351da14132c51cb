pub mod algorithms;
pub mod error;
pub mod node;
pub mod point;
pub mod rectangle;
#[allow(clippy::module_inception)]
pub mod rtree;

// 重新导出主要类型
pub use algorithms::knn::KnnStrategy;
pub use error::IndexError;
pub use node::{Entry, Node, NodeType};
pub use point::Point;
pub use rectangle::Rectangle;
pub use rtree::{RTree, SplitPolicy, TreeStats};
