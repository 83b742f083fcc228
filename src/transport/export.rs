//! # 电导数据导出
//!
//! 导出电导曲线到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: `well_depth,conductance` 表头，每个扫描点一行
//! - XY: `#` 注释头（名称、能量、通道数）+ 制表符分隔的两列
//!
//! ## 依赖关系
//! - 被 `commands/well.rs` 调用
//! - 使用 `transport/sweep.rs` 的 ConductanceCurve
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Result, TransportError};
use crate::transport::ConductanceCurve;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 导出为 CSV 格式
pub fn to_csv(curve: &ConductanceCurve, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for point in &curve.points {
        wtr.serialize(point)?;
    }

    wtr.flush().map_err(|e| TransportError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出为 XY 格式
pub fn to_xy(curve: &ConductanceCurve, output_path: &Path) -> Result<()> {
    let write_err = |e: std::io::Error| TransportError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let mut file = BufWriter::new(File::create(output_path).map_err(write_err)?);

    writeln!(file, "# Conductance curve: {}", curve.name).map_err(write_err)?;
    writeln!(file, "# Energy: {:.6} t", curve.energy).map_err(write_err)?;
    writeln!(file, "# Open channels: {}", curve.open_channels).map_err(write_err)?;
    writeln!(file, "# Columns: well depth (t), conductance (e^2/h)").map_err(write_err)?;
    writeln!(file, "#").map_err(write_err)?;

    for point in &curve.points {
        writeln!(file, "{:.6}\t{:.8}", point.well_depth, point.conductance).map_err(write_err)?;
    }

    file.flush().map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_curve() -> ConductanceCurve {
        ConductanceCurve::new("well", 0.2, 1, &[0.0, 0.01, 0.02], &[1.0, 0.5, 0.25]).unwrap()
    }

    #[test]
    fn test_csv_one_row_per_point() {
        let path = std::env::temp_dir().join("qtransport_export_test.csv");
        to_csv(&sample_curve(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "well_depth,conductance");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "0.01,0.5");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_xy_header_and_columns() {
        let path = std::env::temp_dir().join("qtransport_export_test.xy");
        to_xy(&sample_curve(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Conductance curve: well"));
        let rows: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "0.010000\t0.50000000");
        fs::remove_file(&path).ok();
    }
}
