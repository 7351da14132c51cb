//! K-Nearest Neighbors (KNN) search for the R-tree
//!
//! Two strategies are provided:
//!
//! - [`RTree::knn_query`]: collects every reachable point, sorts by Euclidean
//!   distance and keeps the first `k`. No pruning by bounding boxes.
//! - [`RTree::nearest_neighbors`]: best-first traversal using a min-heap keyed
//!   by the minimum distance from the query point to each entry's MBR. Stops as
//!   soon as `k` points have been popped.
//!
//! Both return `(point, distance)` pairs sorted by ascending distance.

use super::super::error::IndexError;
use super::super::node::{Entry, Node};
use super::super::point::Point;
use super::super::rtree::RTree;
use super::search::collect_all_points;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Which KNN algorithm to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnnStrategy {
    /// Full scan + sort
    #[default]
    Scan,
    /// Priority-queue branch and bound
    BestFirst,
}

/// Entry in the priority queue for best-first search
#[derive(Debug)]
enum QueueEntry<'a> {
    /// An indexed point, keyed by its exact distance
    Point { distance: f64, point: &'a Point },
    /// A node to be explored, keyed by the distance to its MBR
    Node { min_distance: f64, node: &'a Node },
}

impl QueueEntry<'_> {
    fn min_distance(&self) -> f64 {
        match self {
            QueueEntry::Point { distance, .. } => *distance,
            QueueEntry::Node { min_distance, .. } => *min_distance,
        }
    }
}

// BinaryHeap is a max-heap, so the ordering is reversed
impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry<'_> {}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .min_distance()
            .partial_cmp(&self.min_distance())
            .unwrap_or(Ordering::Equal)
            // Points before nodes at equal distance, so a point on an MBR
            // boundary is reported without expanding more nodes
            .then_with(|| self.is_point().cmp(&other.is_point()))
    }
}

impl QueueEntry<'_> {
    fn is_point(&self) -> bool {
        matches!(self, QueueEntry::Point { .. })
    }
}

fn validate(query: &Point, k: usize) -> Result<(), IndexError> {
    if k == 0 {
        return Err(IndexError::InvalidK);
    }
    if !query.is_finite() {
        return Err(IndexError::NonFiniteCoordinate {
            x: query.x,
            y: query.y,
        });
    }
    Ok(())
}

impl RTree {
    /// Find the `k` reachable points closest to `query` by brute force
    ///
    /// Returns fewer than `k` pairs when the tree holds fewer points. Points at
    /// equal distance keep their traversal order (stable sort).
    pub fn knn_query(&self, query: &Point, k: usize) -> Result<Vec<(&Point, f64)>, IndexError> {
        validate(query, k)?;

        let mut all_points = Vec::with_capacity(self.size());
        collect_all_points(self.root_ref(), &mut all_points);

        let mut distances: Vec<(&Point, f64)> = all_points
            .into_iter()
            .map(|p| (p, query.distance_to(p)))
            .collect();

        distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        distances.truncate(k);

        Ok(distances)
    }

    /// Find the `k` reachable points closest to `query` with a best-first search
    pub fn nearest_neighbors(
        &self,
        query: &Point,
        k: usize,
    ) -> Result<Vec<(&Point, f64)>, IndexError> {
        validate(query, k)?;

        let root = self.root_ref();
        let mut results: Vec<(&Point, f64)> = Vec::with_capacity(k.min(self.size()));
        let Some(root_mbr) = root.mbr else {
            return Ok(results);
        };

        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry::Node {
            min_distance: root_mbr.min_distance(query.x, query.y),
            node: root,
        });

        while let Some(entry) = heap.pop() {
            match entry {
                QueueEntry::Point { distance, point } => {
                    results.push((point, distance));
                    if results.len() == k {
                        break;
                    }
                }
                QueueEntry::Node { node, .. } => {
                    for child in &node.entries {
                        match child {
                            Entry::Point { point, .. } => heap.push(QueueEntry::Point {
                                distance: query.distance_to(point),
                                point,
                            }),
                            Entry::Node { mbr, node } => heap.push(QueueEntry::Node {
                                min_distance: mbr.min_distance(query.x, query.y),
                                node,
                            }),
                        }
                    }
                }
            }
        }

        Ok(results)
    }

    /// Run the KNN algorithm selected by `strategy`
    pub fn knn(
        &self,
        query: &Point,
        k: usize,
        strategy: KnnStrategy,
    ) -> Result<Vec<(&Point, f64)>, IndexError> {
        match strategy {
            KnnStrategy::Scan => self.knn_query(query, k),
            KnnStrategy::BestFirst => self.nearest_neighbors(query, k),
        }
    }
}
