//! # 输运计算模块
//!
//! 电极自能、散射区分层、递归格林函数求解、参数扫描、绘图与数据导出。
//!
//! ## 计算流程
//! 1. `Solver::new` 对定型体系分层（只做一次）
//! 2. `Solver::solve` 在给定能量与参数下得到 `ScatteringData`
//! 3. `ParameterSweep::run` 对一组参数值重复求解
//! 4. `plot` / `export` 输出电导曲线
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `models/` 使用
//! - 使用 `system/` 的定型体系
//! - 子模块: leads, slicer, solver, smatrix, sweep, plot, export

pub mod export;
pub mod leads;
pub mod plot;
pub mod slicer;
pub mod smatrix;
pub mod solver;
pub mod sweep;

pub use smatrix::ScatteringData;
pub use solver::{Solver, SolverConfig};
pub use sweep::{linear_values, ConductanceCurve, ParameterSweep};
