//! # 模型模块
//!
//! 基于 `system/` 构建的具体紧束缚模型。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 子模块: quantum_well

pub mod quantum_well;

pub use quantum_well::{WellGeometry, WellParams};
