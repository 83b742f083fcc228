//! # system 子命令 CLI 定义
//!
//! 构建量子阱体系，打印结构信息并绘制体系图。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 复用 `cli/well.rs` 的 GeometryArgs, SolverArgs
//! - 参数传递给 `commands/system.rs`

use super::well::{GeometryArgs, SolverArgs};
use clap::Args;
use std::path::PathBuf;

/// system 子命令参数
#[derive(Args, Debug)]
pub struct SystemArgs {
    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// Energy at which the lead channels are counted (in units of t)
    #[arg(short, long, default_value_t = 0.2)]
    pub energy: f64,

    /// Well depth used for the onsite energies
    #[arg(long, default_value_t = 0.0)]
    pub well_depth: f64,

    /// Output image path (.png or .svg)
    #[arg(short, long, default_value = "system.png")]
    pub output: PathBuf,

    /// Number of lead unit cells drawn next to the scattering region
    #[arg(long, default_value_t = 3)]
    pub lead_cells: usize,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub fig_width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 600)]
    pub fig_height: u32,

    /// Skip plot generation
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    #[command(flatten)]
    pub solver: SolverArgs,
}
