//! # qtransport - 紧束缚量子输运工具箱
//!
//! 在方格子上构建带两个电极的量子阱体系，扫描势阱深度并计算电导。
//!
//! ## 子命令
//! - `well`   - 势阱深度扫描，输出电导曲线 (PNG/SVG/CSV/XY)
//! - `system` - 构建体系并检查其结构
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── models/    (量子阱模型)
//!   │     ├── system/    (紧束缚体系构建与定型)
//!   │     └── transport/ (电极自能、求解、扫描、绘图、导出)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod system;
mod transport;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
