use super::super::error::IndexError;
use super::super::node::{Entry, Node};
use super::super::point::Point;
use super::super::rectangle::Rectangle;
use super::super::rtree::RTree;

/// 搜索操作相关算法
impl RTree {
    /// 范围查询：返回所有落在查询矩形内（含边界）的点
    ///
    /// 结果按遍历顺序排列，不做排序。
    pub fn range_query(&self, query: &Rectangle) -> Result<Vec<&Point>, IndexError> {
        if !query.is_valid() {
            return Err(IndexError::InvalidRectangle {
                min: query.min,
                max: query.max,
            });
        }

        let mut results = Vec::new();
        self.search_recursive(self.root_ref(), query, &mut results);
        Ok(results)
    }

    /// 递归搜索，不相交的条目直接剪枝
    fn search_recursive<'a>(&self, node: &'a Node, query: &Rectangle, results: &mut Vec<&'a Point>) {
        for entry in &node.entries {
            if !entry.mbr().intersects(query) {
                continue;
            }

            match entry {
                Entry::Point { point, .. } => {
                    if query.contains_point(point.x, point.y) {
                        results.push(point);
                    }
                }
                Entry::Node { node, .. } => {
                    self.search_recursive(node, query, results);
                }
            }
        }
    }

    /// 从根节点可达的所有点，按遍历顺序
    pub fn points(&self) -> Vec<&Point> {
        let mut points = Vec::with_capacity(self.size());
        collect_all_points(self.root_ref(), &mut points);
        points
    }
}

/// 收集子树中的所有点
pub(crate) fn collect_all_points<'a>(node: &'a Node, points: &mut Vec<&'a Point>) {
    for entry in &node.entries {
        match entry {
            Entry::Point { point, .. } => points.push(point),
            Entry::Node { node, .. } => collect_all_points(node, points),
        }
    }
}
