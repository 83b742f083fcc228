//! # 美化输出工具
//!
//! 提供统一的终端输出样式：`[OK]`, `[ERR]`, `[WARN]`, `[*]` 前缀及标题栏。
//!
//! ## 依赖关系
//! - 被 `main.rs` 和所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};

const RULE_WIDTH: usize = 60;

fn tagged(tag: ColoredString, msg: &str) -> String {
    format!("{} {}", tag, msg)
}

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{}", tagged("[OK]".green().bold(), msg));
}

/// 打印错误消息（stderr）
pub fn print_error(msg: &str) {
    eprintln!("{}", tagged("[ERR]".red().bold(), msg));
}

pub fn print_warning(msg: &str) {
    println!("{}", tagged("[WARN]".yellow().bold(), msg));
}

pub fn print_info(msg: &str) {
    println!("{}", tagged("[*]".blue().bold(), msg));
}

pub fn print_skip(msg: &str) {
    println!("{}", tagged("[SKIP]".dimmed(), msg));
}

pub fn print_done(msg: &str) {
    println!("{}", tagged("[DONE]".green().bold(), msg));
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(RULE_WIDTH);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}
