//! # 紧束缚体系模块
//!
//! 定义紧束缚模型的格点、数值、平移对称性、构建器和定型后的体系。
//!
//! ## 子模块
//! - `lattice`: 正方晶格与格点
//! - `value`: 在位能 / 跃迁值（常数或延迟绑定的函数）
//! - `symmetry`: 一维平移对称性（电极）
//! - `builder`: 可变的体系构建器
//! - `finalized`: 定型后的不可变体系
//!
//! ## 依赖关系
//! - 被 `models/` 和 `transport/` 使用
//! - 使用 `num-complex`, `nalgebra`

pub mod builder;
pub mod finalized;
pub mod lattice;
pub mod symmetry;
pub mod value;

pub use builder::Builder;
pub use finalized::{FinalizedSystem, InfiniteSystem};
pub use lattice::{HoppingKind, Site, SquareLattice};
pub use symmetry::TranslationalSymmetry;
pub use value::Value;
