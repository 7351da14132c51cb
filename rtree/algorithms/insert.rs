use super::super::error::IndexError;
use super::super::node::{Entry, Node};
use super::super::point::Point;
use super::super::rectangle::Rectangle;
use super::super::rtree::RTree;
use std::cmp::Ordering;
use tracing::trace;

/// 插入操作相关算法
impl RTree {
    /// 插入一个兴趣点
    ///
    /// 1. 把点包装成退化矩形
    /// 2. 选择叶子节点（沿途原地扩大所选条目的MBR）
    /// 3. 添加到叶子节点并重新计算路径上各节点的MBR
    /// 4. 叶子节点溢出时分裂
    pub fn insert(&mut self, point: Point) -> Result<(), IndexError> {
        if !point.is_finite() {
            return Err(IndexError::NonFiniteCoordinate {
                x: point.x,
                y: point.y,
            });
        }

        let rect = point.to_rectangle();
        let leaf_path = self.choose_leaf_path(&rect);
        trace!(
            "inserting {} at depth {} (path {:?})",
            point.name,
            leaf_path.len(),
            leaf_path
        );

        let overflow = push_along_path(self.root_mut(), &leaf_path, &rect, Entry::from_point(point));
        self.increment_size();

        if overflow {
            self.handle_overflow(leaf_path);
        }

        Ok(())
    }

    /// 选择叶子节点路径 - 单路径下降，不回溯
    ///
    /// 返回每一层所选条目的下标
    pub(crate) fn choose_leaf_path(&self, rect: &Rectangle) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = self.root_ref();

        while !current.is_leaf() {
            let Some(best_index) = choose_subtree(&current.entries, rect) else {
                break;
            };
            let Some(child) = current.entries.get(best_index).and_then(Entry::child) else {
                break;
            };
            path.push(best_index);
            current = child;
        }

        path
    }
}

/// 选择子树 - 扩大面积最小的条目
///
/// 只比较扩大面积，相同时保留先出现的条目。
pub(crate) fn choose_subtree(entries: &[Entry], rect: &Rectangle) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, entry) in entries.iter().enumerate() {
        let enlargement = entry.mbr().enlargement_needed(rect.min[0], rect.min[1]);
        let better = match best {
            None => true,
            Some((_, min_enlargement)) => {
                enlargement.partial_cmp(&min_enlargement) == Some(Ordering::Less)
            }
        };
        if better {
            best = Some((i, enlargement));
        }
    }

    best.map(|(i, _)| i)
}

/// 沿路径下降并把条目放入末端的叶子节点
///
/// 下降时把所经条目的MBR扩大到覆盖 `rect` 的两个角点，返回时重新计算
/// 每个节点的MBR。返回叶子节点是否溢出。
fn push_along_path(node: &mut Node, path: &[usize], rect: &Rectangle, entry: Entry) -> bool {
    let overflow = match path.split_first() {
        Some((&index, rest)) => match node.entries.get_mut(index) {
            Some(Entry::Node { mbr, node: child }) => {
                mbr.expand_to_include(rect.min[0], rect.min[1]);
                mbr.expand_to_include(rect.max[0], rect.max[1]);
                push_along_path(child, rest, rect, entry)
            }
            // 路径由 choose_leaf_path 从同一棵树计算得到，不会走到这里
            _ => {
                node.entries.push(entry);
                node.is_overflowing()
            }
        },
        None => {
            node.entries.push(entry);
            node.is_overflowing()
        }
    };

    node.update_mbr();
    overflow
}
