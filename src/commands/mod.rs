//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `transport/`, `utils/`
//! - 子模块: well, system

pub mod system;
pub mod well;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Well(args) => well::execute(args),
        Commands::System(args) => system::execute(args),
    }
}
