use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::rectangle::Rectangle;

/// 兴趣点（POI）：坐标 + 名称 + 分类
///
/// 一旦插入索引就不会被修改，分裂时随条目一起移动。
#[derive(Debug, Display, Clone, PartialEq, Serialize, Deserialize)]
#[display(fmt = "{} [{}] ({:.1}, {:.1})", name, category, x, y)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub name: String,
    /// 查询点的分类为空
    #[serde(default)]
    pub category: String,
}

impl Point {
    pub fn new(x: f64, y: f64, name: impl Into<String>, category: impl Into<String>) -> Self {
        Point {
            x,
            y,
            name: name.into(),
            category: category.into(),
        }
    }

    /// 构造一个查询点（没有分类）
    pub fn query(x: f64, y: f64) -> Self {
        Point::new(x, y, "Query Point", "")
    }

    /// 欧氏距离
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// 点对应的退化矩形
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::from_point(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
