//! # well 子命令 CLI 定义
//!
//! 势阱深度扫描。几何参数与求解器参数也被 `system` 子命令复用。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/system.rs` 使用
//! - 参数传递给 `commands/well.rs`

use crate::models::WellGeometry;
use crate::transport::SolverConfig;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 量子阱几何参数
#[derive(Args, Debug, Clone)]
pub struct GeometryArgs {
    /// Lattice constant a
    #[arg(long, default_value_t = 1.0)]
    pub lattice_constant: f64,

    /// Hopping energy t
    #[arg(long, default_value_t = 1.0)]
    pub hopping: f64,

    /// Width W of the scattering region (sites)
    #[arg(long, default_value_t = 10)]
    pub width: usize,

    /// Length L of the scattering region (sites)
    #[arg(long, default_value_t = 30)]
    pub length: usize,

    /// Length of the potential well (sites)
    #[arg(long, default_value_t = 10)]
    pub well_length: usize,
}

impl GeometryArgs {
    pub fn to_geometry(&self) -> WellGeometry {
        WellGeometry {
            a: self.lattice_constant,
            t: self.hopping,
            width: self.width,
            length: self.length,
            well_length: self.well_length,
        }
    }
}

/// 求解器数值参数
#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Imaginary broadening of the lead Green's functions
    #[arg(long, default_value_t = 1e-9)]
    pub eta: f64,

    /// Relative convergence tolerance of the lead decimation
    #[arg(long, default_value_t = 1e-12)]
    pub tolerance: f64,

    /// Maximum number of decimation iterations
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,
}

impl SolverArgs {
    pub fn to_config(&self) -> SolverConfig {
        SolverConfig {
            eta: self.eta,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// 电导曲线输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (well_depth, conductance)
    Csv,
    /// XY data file (tab separated)
    Xy,
}

// ─────────────────────────────────────────────────────────────
// well 子命令
// ─────────────────────────────────────────────────────────────

/// well 子命令参数
#[derive(Args, Debug)]
pub struct WellArgs {
    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// Fermi energy (in units of t)
    #[arg(short, long, default_value_t = 0.2)]
    pub energy: f64,

    /// First well depth of the sweep
    #[arg(long, default_value_t = 0.0)]
    pub depth_start: f64,

    /// Step between well depths
    #[arg(long, default_value_t = 0.01)]
    pub depth_step: f64,

    /// Number of well depths
    #[arg(long, default_value_t = 100)]
    pub depth_count: usize,

    /// Output file path
    #[arg(short, long, default_value = "conductance.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub fig_width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub fig_height: u32,

    /// Title for the plot
    #[arg(long)]
    pub title: Option<String>,

    /// Also render the system geometry to this file
    #[arg(long)]
    pub plot_system: Option<PathBuf>,

    /// Number of parallel jobs (0 = all cores)
    #[arg(short, long, default_value_t = 1, env = "QTRANSPORT_JOBS")]
    pub jobs: usize,

    #[command(flatten)]
    pub solver: SolverArgs,
}
