use serde::{Deserialize, Serialize};

/// 矩形边界框 - 用于表示R-tree中的最小边界矩形(MBR)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min: [f64; 2], // [x_min, y_min]
    pub max: [f64; 2], // [x_max, y_max]
}

impl Rectangle {
    /// 创建新的矩形
    ///
    /// 不检查边界顺序；倒置的矩形由查询入口通过 [`Rectangle::is_valid`] 拒绝。
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Rectangle {
            min: [x_min, y_min],
            max: [x_max, y_max],
        }
    }

    /// 创建一个点矩形（退化矩形，min == max）
    pub fn from_point(x: f64, y: f64) -> Self {
        Rectangle {
            min: [x, y],
            max: [x, y],
        }
    }

    /// 由任意两个对角点创建矩形（例如拖拽框选的起点和终点）
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Rectangle {
            min: [x1.min(x2), y1.min(y2)],
            max: [x1.max(x2), y1.max(y2)],
        }
    }

    /// 计算矩形面积
    pub fn area(&self) -> f64 {
        (self.max[0] - self.min[0]) * (self.max[1] - self.min[1])
    }

    /// 计算两个矩形的并集MBR
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// 判断两个矩形是否相交（边界接触也算相交）
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.min[0] <= other.max[0]
            && self.max[0] >= other.min[0]
            && self.min[1] <= other.max[1]
            && self.max[1] >= other.min[1]
    }

    /// 判断当前矩形是否包含另一个矩形
    pub fn contains(&self, other: &Rectangle) -> bool {
        self.min[0] <= other.min[0]
            && self.min[1] <= other.min[1]
            && self.max[0] >= other.max[0]
            && self.max[1] >= other.max[1]
    }

    /// 判断当前矩形是否包含一个点（所有边界均为闭区间）
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min[0] <= x && x <= self.max[0] && self.min[1] <= y && y <= self.max[1]
    }

    /// 计算扩大到包含点 (x, y) 所需的面积增量，不修改自身
    pub fn enlargement_needed(&self, x: f64, y: f64) -> f64 {
        let mut expanded = *self;
        expanded.expand_to_include(x, y);
        expanded.area() - self.area()
    }

    /// 原地扩大矩形，使其包含点 (x, y)
    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        self.min[0] = self.min[0].min(x);
        self.min[1] = self.min[1].min(y);
        self.max[0] = self.max[0].max(x);
        self.max[1] = self.max[1].max(y);
    }

    /// 计算矩形中心点
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }

    /// 判断矩形是否为点（宽度和高度都为0）
    pub fn is_point(&self) -> bool {
        self.min[0] == self.max[0] && self.min[1] == self.max[1]
    }

    /// 边界有限且 min <= max
    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
            && self.min[0] <= self.max[0]
            && self.min[1] <= self.max[1]
    }

    /// 点 (x, y) 到矩形的最小欧氏距离，点在矩形内部或边界上时为 0
    pub fn min_distance(&self, x: f64, y: f64) -> f64 {
        let closest_x = x.clamp(self.min[0], self.max[0]);
        let closest_y = y.clamp(self.min[1], self.max[1]);
        ((x - closest_x).powi(2) + (y - closest_y).powi(2)).sqrt()
    }
}
