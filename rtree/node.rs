use super::point::Point;
use super::rectangle::Rectangle;
use serde::{Deserialize, Serialize};

/// R-tree节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// 叶子节点：条目直接引用兴趣点
    Leaf,
    /// 索引节点：条目引用子节点
    Index,
}

/// R-tree节点条目
///
/// 每个条目都包含一个MBR和对应的内容：
/// - Point条目：只出现在叶子节点中，MBR 是点的退化矩形
/// - Node条目：只出现在索引节点中，MBR 覆盖子节点的所有条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entry {
    Point { mbr: Rectangle, point: Point },
    Node { mbr: Rectangle, node: Box<Node> },
}

impl Entry {
    /// 由兴趣点创建叶子条目
    pub fn from_point(point: Point) -> Self {
        Entry::Point {
            mbr: point.to_rectangle(),
            point,
        }
    }

    /// 由子节点创建索引条目；空节点没有MBR，返回 None
    pub fn from_node(node: Node) -> Option<Self> {
        let mbr = node.mbr?;
        Some(Entry::Node {
            mbr,
            node: Box::new(node),
        })
    }

    /// 获取条目的MBR
    pub fn mbr(&self) -> &Rectangle {
        match self {
            Entry::Point { mbr, .. } => mbr,
            Entry::Node { mbr, .. } => mbr,
        }
    }

    /// 获取条目的MBR（可变引用），选择叶子时原地扩大
    pub fn mbr_mut(&mut self) -> &mut Rectangle {
        match self {
            Entry::Point { mbr, .. } => mbr,
            Entry::Node { mbr, .. } => mbr,
        }
    }

    pub fn point(&self) -> Option<&Point> {
        match self {
            Entry::Point { point, .. } => Some(point),
            Entry::Node { .. } => None,
        }
    }

    pub fn child(&self) -> Option<&Node> {
        match self {
            Entry::Point { .. } => None,
            Entry::Node { node, .. } => Some(node),
        }
    }

    pub fn child_mut(&mut self) -> Option<&mut Node> {
        match self {
            Entry::Point { .. } => None,
            Entry::Node { node, .. } => Some(node),
        }
    }
}

/// R-tree节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// 所有条目的最小边界矩形，没有条目时为 None
    pub mbr: Option<Rectangle>,
    pub entries: Vec<Entry>,
    pub node_type: NodeType,
    /// 容量上限，整棵树统一
    pub max_entries: usize,
    /// 叶子层为0，根节点层级最高
    pub level: usize,
}

impl Node {
    /// 创建指定类型和层级的空节点
    pub fn new(node_type: NodeType, level: usize, max_entries: usize) -> Self {
        Node {
            mbr: None,
            entries: Vec::with_capacity(max_entries + 1),
            node_type,
            max_entries,
            level,
        }
    }

    pub fn new_leaf(max_entries: usize) -> Self {
        Self::new(NodeType::Leaf, 0, max_entries)
    }

    pub fn new_index(level: usize, max_entries: usize) -> Self {
        Self::new(NodeType::Index, level, max_entries)
    }

    pub fn is_leaf(&self) -> bool {
        self.node_type == NodeType::Leaf
    }

    /// 条目数达到容量
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_entries
    }

    /// 条目数超过容量，需要分裂
    pub fn is_overflowing(&self) -> bool {
        self.entries.len() > self.max_entries
    }

    /// 重新计算节点的MBR，每次修改 entries 之后都必须调用
    pub fn update_mbr(&mut self) {
        self.mbr = self
            .entries
            .iter()
            .map(Entry::mbr)
            .fold(None, |acc: Option<Rectangle>, mbr| match acc {
                Some(acc) => Some(acc.union(mbr)),
                None => Some(*mbr),
            });
    }

    /// 添加条目到节点
    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.update_mbr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(x: f64, y: f64) -> Point {
        Point::new(x, y, format!("p({x},{y})"), "Escuela")
    }

    #[test]
    fn test_node_creation() {
        let leaf = Node::new_leaf(4);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.level, 0);
        assert!(leaf.mbr.is_none());

        let index = Node::new_index(1, 4);
        assert!(!index.is_leaf());
        assert_eq!(index.level, 1);
        assert_eq!(index.max_entries, 4);
    }

    #[test]
    fn test_node_update_mbr() {
        let mut node = Node::new_leaf(4);
        node.add_entry(Entry::from_point(poi(0.0, 5.0)));
        node.add_entry(Entry::from_point(poi(3.0, -1.0)));
        node.add_entry(Entry::from_point(poi(8.0, 2.0)));

        assert_eq!(node.mbr, Some(Rectangle::new(0.0, -1.0, 8.0, 5.0)));

        node.entries.clear();
        node.update_mbr();
        assert!(node.mbr.is_none());
    }

    #[test]
    fn test_is_full_and_overflowing() {
        let mut node = Node::new_leaf(2);
        node.add_entry(Entry::from_point(poi(0.0, 0.0)));
        assert!(!node.is_full());
        node.add_entry(Entry::from_point(poi(1.0, 1.0)));
        assert!(node.is_full());
        assert!(!node.is_overflowing());
        node.add_entry(Entry::from_point(poi(2.0, 2.0)));
        assert!(node.is_overflowing());
    }

    #[test]
    fn test_entry_operations() {
        let entry = Entry::from_point(poi(1.0, 2.0));
        assert_eq!(entry.mbr(), &Rectangle::from_point(1.0, 2.0));
        assert_eq!(entry.point().map(|p| p.x), Some(1.0));
        assert!(entry.child().is_none());

        let mut child = Node::new_leaf(4);
        assert!(Entry::from_node(child.clone()).is_none());

        child.add_entry(entry);
        let index_entry = Entry::from_node(child).expect("non-empty child has an MBR");
        assert!(index_entry.point().is_none());
        assert_eq!(index_entry.child().map(|n| n.entries.len()), Some(1));
        assert_eq!(index_entry.mbr(), &Rectangle::from_point(1.0, 2.0));
    }
}
