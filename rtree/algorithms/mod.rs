// R-tree算法模块
//
// - insert: 叶子选择与插入
// - split: 对半分裂、根节点提升与向上传播
// - search: 范围查询
// - knn: K-最近邻查询（全量扫描 / 最佳优先）
// - utils: 共用的工具函数

pub mod insert;
pub mod knn;
pub mod search;
pub mod split;
pub mod utils;
