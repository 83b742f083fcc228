//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `well`: 扫描势阱深度并绘制电导曲线
//! - `system`: 检查量子阱体系的结构
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: well, system

pub mod system;
pub mod well;

use clap::{Parser, Subcommand};

/// qtransport - 紧束缚量子输运工具箱
#[derive(Parser)]
#[command(name = "qtransport")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Tight-binding quantum transport toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Sweep the depth of a quantum well and plot the conductance
    Well(well::WellArgs),

    /// Build the quantum well system and report its structure
    System(system::SystemArgs),
}
