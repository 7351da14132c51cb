use super::super::node::Node;
use super::super::rtree::RTree;

/// R-tree工具函数实现
impl RTree {
    /// 获取路径中最后一个节点的可变引用
    ///
    /// 根据给定的路径从根节点开始遍历，路径中的下标无效时返回 None
    pub(crate) fn get_last_node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut current: &mut Node = self.root_mut();

        for &index in path {
            current = current.entries.get_mut(index)?.child_mut()?;
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtree::Point;

    #[test]
    fn test_get_last_node_mut() {
        let mut rtree = RTree::new(4).unwrap();
        for i in 0..5 {
            let p = Point::new(i as f64, i as f64, format!("p{i}"), "Hospital");
            rtree.insert(p).unwrap();
        }

        // 空路径返回根节点
        assert!(rtree.get_last_node_mut(&[]).is_some_and(|n| !n.is_leaf()));
        assert!(rtree.get_last_node_mut(&[0]).is_some_and(|n| n.is_leaf()));
        assert!(rtree.get_last_node_mut(&[1]).is_some());
        assert!(rtree.get_last_node_mut(&[2]).is_none());
        // 叶子条目没有子节点
        assert!(rtree.get_last_node_mut(&[0, 0]).is_none());
    }
}
