use super::error::IndexError;
use super::node::{Entry, Node, NodeType};
use super::point::Point;
use super::rectangle::Rectangle;
use crate::config::IndexConfig;
use serde::{Deserialize, Serialize};

/// 非根节点分裂后的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// 新的兄弟节点加入父节点，父节点溢出时继续向上分裂，直到根节点
    #[default]
    Propagate,
    /// 只有根节点分裂会挂回树中；非根节点分裂出的兄弟节点被丢弃，
    /// 其中的点不再可达，但仍计入 size
    RootOnly,
}

/// 树的统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeStats {
    /// 已插入的点数
    pub size: usize,
    /// 从根节点可达的点数
    pub reachable: usize,
    /// 因 RootOnly 分裂而丢失的点数
    pub detached: usize,
    pub height: usize,
    pub max_entries: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    pub split_policy: SplitPolicy,
}

/// 用于JSON序列化的树结构，供展示层绘制各层MBR
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeVisualization {
    pub root: NodeVisualization,
    pub config: TreeConfig,
}

/// 用于JSON序列化的树配置
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_entries: usize,
    pub split_policy: SplitPolicy,
    pub size: usize,
    pub height: usize,
}

/// 用于JSON序列化的节点结构
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeVisualization {
    /// 空的根节点没有MBR
    pub mbr: Option<Rectangle>,
    pub node_type: NodeType,
    pub level: usize,
    /// 数据条目（仅叶子节点）
    pub points: Vec<Point>,
    /// 子节点（仅索引节点）
    pub child_nodes: Vec<NodeVisualization>,
}

/// R-tree主结构
#[derive(Debug, Clone)]
pub struct RTree {
    /// 根节点，空树时是一个空的叶子节点
    root: Box<Node>,
    /// 最大条目数M
    max_entries: usize,
    /// 已插入的点数
    size: usize,
    /// 从根到叶子的层数
    height: usize,
    split_policy: SplitPolicy,
    /// RootOnly 策略下丢失的点数
    detached: usize,
}

impl RTree {
    /// 创建新的R-tree
    pub fn new(max_entries: usize) -> Result<Self, IndexError> {
        Self::with_policy(max_entries, SplitPolicy::default())
    }

    /// 创建使用指定分裂策略的R-tree
    pub fn with_policy(max_entries: usize, split_policy: SplitPolicy) -> Result<Self, IndexError> {
        if max_entries < 2 {
            return Err(IndexError::InvalidCapacity(max_entries));
        }

        Ok(RTree {
            root: Box::new(Node::new_leaf(max_entries)),
            max_entries,
            size: 0,
            height: 1,
            split_policy,
            detached: 0,
        })
    }

    /// 根据配置创建R-tree
    pub fn with_config(config: &IndexConfig) -> Result<Self, IndexError> {
        Self::with_policy(config.max_entries, config.split_policy)
    }

    /// 用一组点构建新树（逐个插入）
    pub fn from_points<I>(max_entries: usize, points: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut tree = Self::new(max_entries)?;
        for point in points {
            tree.insert(point)?;
        }
        Ok(tree)
    }

    /// 检查R-tree是否为空
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// 已插入的点数
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn split_policy(&self) -> SplitPolicy {
        self.split_policy
    }

    /// 因 RootOnly 分裂而从树中脱离的点数
    pub fn detached(&self) -> usize {
        self.detached
    }

    /// 获取根节点MBR，空树返回 None
    pub fn root_mbr(&self) -> Option<&Rectangle> {
        self.root.mbr.as_ref()
    }

    /// 从根节点可达的点数
    pub fn reachable_len(&self) -> usize {
        count_points(&self.root)
    }

    /// 统计信息
    pub fn stats(&self) -> TreeStats {
        let (node_count, leaf_count) = count_nodes(&self.root);
        TreeStats {
            size: self.size,
            reachable: self.reachable_len(),
            detached: self.detached,
            height: self.height,
            max_entries: self.max_entries,
            node_count,
            leaf_count,
            split_policy: self.split_policy,
        }
    }

    pub(crate) fn root_ref(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Box<Node> {
        &mut self.root
    }

    pub(crate) fn increment_size(&mut self) {
        self.size += 1;
    }

    pub(crate) fn increment_height(&mut self) {
        self.height += 1;
    }

    pub(crate) fn record_detached(&mut self, count: usize) {
        self.detached += count;
    }

    /// 导出树结构为JSON格式
    pub fn export_to_json(&self) -> Result<String, serde_json::Error> {
        let visualization = TreeVisualization {
            root: self.create_node_visualization(&self.root),
            config: TreeConfig {
                max_entries: self.max_entries,
                split_policy: self.split_policy,
                size: self.size,
                height: self.height,
            },
        };
        serde_json::to_string_pretty(&visualization)
    }

    /// 递归创建节点的可视化结构
    fn create_node_visualization(&self, node: &Node) -> NodeVisualization {
        let mut points = Vec::new();
        let mut child_nodes = Vec::new();

        for entry in &node.entries {
            match entry {
                Entry::Point { point, .. } => points.push(point.clone()),
                Entry::Node { node: child, .. } => {
                    child_nodes.push(self.create_node_visualization(child));
                }
            }
        }

        NodeVisualization {
            mbr: node.mbr,
            node_type: node.node_type,
            level: node.level,
            points,
            child_nodes,
        }
    }
}

/// 统计子树中的点数
pub(crate) fn count_points(node: &Node) -> usize {
    node.entries
        .iter()
        .map(|entry| match entry {
            Entry::Point { .. } => 1,
            Entry::Node { node, .. } => count_points(node),
        })
        .sum()
}

/// 统计子树中的 (节点数, 叶子节点数)
fn count_nodes(node: &Node) -> (usize, usize) {
    let own = (1, usize::from(node.is_leaf()));
    node.entries
        .iter()
        .filter_map(Entry::child)
        .map(count_nodes)
        .fold(own, |(nodes, leaves), (n, l)| (nodes + n, leaves + l))
}
