use super::super::node::{Entry, Node};
use super::super::rtree::{count_points, RTree, SplitPolicy};
use tracing::{debug, warn};

/// 节点分裂算法 - 简化的对半分裂（不做种子选择，也不优化重叠）
impl RTree {
    /// 处理节点溢出
    ///
    /// `path` 指向溢出的节点。根节点分裂时提升新的根节点；非根节点分裂时
    /// 按 [`SplitPolicy`] 处理新的兄弟节点。
    pub(crate) fn handle_overflow(&mut self, mut path: Vec<usize>) {
        loop {
            let policy = self.split_policy();
            let node = match self.get_last_node_mut(&path) {
                Some(node) => node,
                None => {
                    warn!("Failed to get overflowing node at path {:?}", path);
                    return;
                }
            };

            if !node.is_overflowing() {
                return;
            }

            let sibling = split_node(node);
            let node_mbr = node.mbr;
            debug!(
                "split node at depth {}: kept {} entries, moved {} to sibling",
                path.len(),
                node.entries.len(),
                sibling.entries.len()
            );

            let Some(child_index) = path.pop() else {
                // 根节点分裂
                self.promote_root(sibling);
                return;
            };

            match policy {
                SplitPolicy::RootOnly => {
                    let lost = count_points(&sibling);
                    self.record_detached(lost);
                    warn!(
                        "non-root split detached {} points ({} detached in total)",
                        lost,
                        self.detached()
                    );
                    return;
                }
                SplitPolicy::Propagate => {
                    let parent = match self.get_last_node_mut(&path) {
                        Some(parent) => parent,
                        None => {
                            warn!("Failed to get parent node at path {:?} during split", path);
                            return;
                        }
                    };

                    // 原节点变小了，父节点中的条目同步为新的MBR
                    if let (Some(entry), Some(mbr)) = (parent.entries.get_mut(child_index), node_mbr) {
                        *entry.mbr_mut() = mbr;
                    }
                    match Entry::from_node(sibling) {
                        Some(entry) => parent.add_entry(entry),
                        None => parent.update_mbr(),
                    }
                    // 继续检查父节点
                }
            }
        }
    }

    /// 根节点分裂后创建新的根节点，树高加一
    fn promote_root(&mut self, sibling: Node) {
        let max_entries = self.max_entries();
        let root = self.root_mut();
        let level = root.level + 1;
        let old_root = std::mem::replace(root, Box::new(Node::new_index(level, max_entries)));

        for child in [*old_root, sibling] {
            if let Some(entry) = Entry::from_node(child) {
                root.entries.push(entry);
            }
        }
        root.update_mbr();

        self.increment_height();
        debug!("promoted new root at level {}, height {}", level, self.height());
    }
}

/// 对半分裂：原节点保留前 `len / 2` 个条目，其余条目移入新节点
pub(crate) fn split_node(node: &mut Node) -> Node {
    let mid = node.entries.len() / 2;
    let mut sibling = Node::new(node.node_type, node.level, node.max_entries);
    sibling.entries = node.entries.split_off(mid);

    node.update_mbr();
    sibling.update_mbr();
    sibling
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtree::{Point, Rectangle};

    fn poi(x: f64, y: f64) -> Point {
        Point::new(x, y, format!("({x}, {y})"), "Hospital")
    }

    fn leaf_with(count: usize, max_entries: usize) -> Node {
        let mut node = Node::new_leaf(max_entries);
        for i in 0..count {
            node.add_entry(Entry::from_point(poi(i as f64, 0.0)));
        }
        node
    }

    #[test]
    fn test_split_node_halves_entries() {
        let mut node = leaf_with(5, 4);
        let sibling = split_node(&mut node);

        assert_eq!(node.entries.len(), 2);
        assert_eq!(sibling.entries.len(), 3);
        assert!(sibling.is_leaf());
        assert_eq!(sibling.max_entries, 4);
        assert_eq!(node.mbr, Some(Rectangle::new(0.0, 0.0, 1.0, 0.0)));
        assert_eq!(sibling.mbr, Some(Rectangle::new(2.0, 0.0, 4.0, 0.0)));
    }

    #[test]
    fn test_split_preserves_entry_order() {
        let mut node = leaf_with(7, 6);
        let sibling = split_node(&mut node);

        let xs: Vec<f64> = node
            .entries
            .iter()
            .chain(sibling.entries.iter())
            .filter_map(|e| e.point().map(|p| p.x))
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_propagate_keeps_every_point_reachable() {
        let mut rtree = RTree::with_policy(3, SplitPolicy::Propagate).unwrap();
        for i in 0..200 {
            let x = ((i * 31) % 97) as f64;
            let y = ((i * 17) % 83) as f64;
            rtree.insert(poi(x, y)).unwrap();
            assert_eq!(rtree.reachable_len(), rtree.size());
        }
        assert_eq!(rtree.detached(), 0);
        assert!(rtree.height() >= 4);
    }

    #[test]
    fn test_propagate_keeps_capacity() {
        fn check(node: &Node) {
            assert!(node.entries.len() <= node.max_entries);
            node.entries.iter().filter_map(Entry::child).for_each(check);
        }

        let mut rtree = RTree::new(4).unwrap();
        for i in 0..300 {
            rtree.insert(poi((i % 20) as f64, (i / 20) as f64)).unwrap();
        }
        check(rtree.root_ref());
    }

    #[test]
    fn test_propagate_keeps_leaves_at_same_depth() {
        fn leaf_depths(node: &Node, depth: usize, out: &mut Vec<usize>) {
            if node.is_leaf() {
                out.push(depth);
            }
            for child in node.entries.iter().filter_map(Entry::child) {
                leaf_depths(child, depth + 1, out);
            }
        }

        let mut rtree = RTree::new(3).unwrap();
        for i in 0..150 {
            rtree.insert(poi(((i * 13) % 50) as f64, ((i * 7) % 40) as f64)).unwrap();
        }

        let mut depths = Vec::new();
        leaf_depths(rtree.root_ref(), 1, &mut depths);
        assert!(depths.iter().all(|&d| d == rtree.height()));
    }

    #[test]
    fn test_root_only_detaches_points_on_non_root_split() {
        let mut rtree = RTree::with_policy(4, SplitPolicy::RootOnly).unwrap();
        // 所有点在同一条水平线上：扩大面积都为 0，总是选择第一个叶子
        for i in 0..5 {
            rtree.insert(poi(i as f64, 0.0)).unwrap();
        }
        assert_eq!(rtree.height(), 2);
        assert_eq!(rtree.reachable_len(), 5);

        // 左叶子现有 2 个点，再插入 3 个后溢出 (5 > 4)
        for i in 5..7 {
            rtree.insert(poi(i as f64, 0.0)).unwrap();
        }
        assert_eq!(rtree.reachable_len(), 7);
        rtree.insert(poi(7.0, 0.0)).unwrap();

        // 左叶子 5 个条目分裂：保留 2 个，3 个随未挂接的兄弟节点丢失
        assert_eq!(rtree.size(), 8);
        assert_eq!(rtree.detached(), 3);
        assert_eq!(rtree.reachable_len(), 5);
        assert_eq!(rtree.reachable_len() + rtree.detached(), rtree.size());
        assert_eq!(rtree.height(), 2);
        assert_eq!(rtree.root_ref().entries.len(), 2);
    }

    #[test]
    fn test_propagate_same_sequence_keeps_points() {
        let mut rtree = RTree::with_policy(4, SplitPolicy::Propagate).unwrap();
        for i in 0..9 {
            rtree.insert(poi(i as f64, 0.0)).unwrap();
        }
        assert_eq!(rtree.size(), 9);
        assert_eq!(rtree.reachable_len(), 9);
        assert_eq!(rtree.detached(), 0);
        assert_eq!(rtree.root_ref().entries.len(), 3);
    }
}
