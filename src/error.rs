//! # 统一错误处理模块
//!
//! 定义 qtransport 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// qtransport 统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 体系构建错误
    // ─────────────────────────────────────────────────────────────
    #[error("Site {site} does not belong to the system")]
    MissingSite { site: String },

    #[error("Invalid hopping: {0}")]
    InvalidHopping(String),

    #[error("Invalid symmetry: {0}")]
    InvalidSymmetry(String),

    #[error("Builder has no translational symmetry and cannot be used as a lead")]
    NotALead,

    #[error("Lead {lead} does not fit the scattering region\nReason: {reason}")]
    StructuralMismatch { lead: usize, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 求解错误
    // ─────────────────────────────────────────────────────────────
    #[error("System has no leads attached")]
    NoLeads,

    #[error("Lead index {index} out of range (system has {count} leads)")]
    LeadIndexOutOfRange { index: usize, count: usize },

    #[error("Lead self-energy did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("Singular matrix encountered while {context}")]
    SingularMatrix { context: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV / 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, TransportError>;
