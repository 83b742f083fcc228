//! # well 命令实现
//!
//! 构建量子阱体系，在固定能量下扫描势阱深度，输出电导曲线。
//!
//! ## 功能
//! - 体系只构建、定型一次，扫描中重复求解
//! - 可选 rayon 并行（`--jobs`）
//! - 输出高质量图像 (PNG/SVG)
//! - 导出数据文件 (CSV/XY)
//! - 可选绘制体系结构图
//!
//! ## 依赖关系
//! - 使用 `cli/well.rs` 定义的 WellArgs
//! - 使用 `models/quantum_well.rs` 构建体系
//! - 使用 `transport/` 求解、扫描、绘图与导出

use crate::cli::well::{OutputFormat, WellArgs};
use crate::error::{Result, TransportError};
use crate::models::WellParams;
use crate::transport::{export, linear_values, plot, ConductanceCurve, ParameterSweep, Solver};
use crate::utils::output;

use std::path::Path;
use std::time::Instant;

/// 执行 well 命令
pub fn execute(args: WellArgs) -> Result<()> {
    output::print_header("Quantum Well Conductance Sweep");

    if args.depth_count == 0 {
        return Err(TransportError::InvalidArgument(
            "depth count must be at least 1".to_string(),
        ));
    }

    // 构建体系
    let geometry = args.geometry.to_geometry();
    let system = geometry.finalized_system()?;
    output::print_success(&format!(
        "Built {} x {} scattering region ({} sites, {} hoppings, {} leads)",
        geometry.length,
        geometry.width,
        system.site_count(),
        system.hopping_count(),
        system.leads().len()
    ));

    if let Some(ref path) = args.plot_system {
        let use_svg = guess_format_from_extension(path) == OutputFormat::Svg;
        let (width, height) = system_figure_size(args.fig_width, args.fig_height);
        plot::generate_system_plot(
            &system,
            path,
            "Quantum well system",
            3,
            width,
            height,
            use_svg,
        )?;
        output::print_success(&format!("System plot saved to '{}'", path.display()));
    }

    let solver = Solver::new(&system, args.solver.to_config())?;
    let reference = solver.solve(args.energy, &WellParams::default())?;
    let open_channels = reference.num_propagating(0)?;
    output::print_info(&format!(
        "Energy E = {:.4} t, {} open channel(s) in lead 0",
        args.energy, open_channels
    ));
    if open_channels == 0 {
        output::print_warning("No propagating modes at this energy; conductance is zero");
    }

    // 扫描
    let depths = linear_values(args.depth_start, args.depth_step, args.depth_count);
    let sweep = ParameterSweep::new(args.energy)
        .jobs(args.jobs)
        .with_progress(true);
    output::print_info(&format!(
        "Sweeping {} well depths from {:.4} to {:.4}",
        depths.len(),
        depths[0],
        depths[depths.len() - 1]
    ));

    let start = Instant::now();
    let conductances = sweep.run(&solver, &depths, WellParams::well_depth)?;
    output::print_success(&format!(
        "Solved {} scattering problems in {:.2?}",
        conductances.len(),
        start.elapsed()
    ));

    let curve = ConductanceCurve::new(
        "quantum well",
        args.energy,
        open_channels,
        &depths,
        &conductances,
    )?;

    // 输出
    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));

    match format {
        OutputFormat::Png | OutputFormat::Svg => {
            let title = args
                .title
                .clone()
                .unwrap_or_else(|| format!("Quantum well, E = {:.3} t", args.energy));
            plot::generate_conductance_plot(
                &curve,
                &args.output,
                &title,
                args.fig_width,
                args.fig_height,
                format == OutputFormat::Svg,
            )?;
        }
        OutputFormat::Csv => export::to_csv(&curve, &args.output)?,
        OutputFormat::Xy => export::to_xy(&curve, &args.output)?,
    }

    print_summary_table(&curve, 10);
    output::print_done(&format!("Conductance saved to '{}'", args.output.display()));
    Ok(())
}

/// 体系图取电导图一半的高度，任一边至少 1 像素
fn system_figure_size(fig_width: u32, fig_height: u32) -> (u32, u32) {
    (fig_width.max(1), (fig_height / 2).max(1))
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> OutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => OutputFormat::Svg,
        Some("csv") => OutputFormat::Csv,
        Some("xy") | Some("dat") | Some("txt") => OutputFormat::Xy,
        _ => OutputFormat::Png,
    }
}

/// 打印扫描摘要
fn print_summary_table(curve: &ConductanceCurve, rows: usize) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct SweepRow {
        #[tabled(rename = "Well depth (t)")]
        depth: String,
        #[tabled(rename = "G (e²/h)")]
        conductance: String,
    }

    let stride = (curve.points.len() / rows).max(1);
    let rows: Vec<SweepRow> = curve
        .points
        .iter()
        .step_by(stride)
        .map(|p| SweepRow {
            depth: format!("{:.4}", p.well_depth),
            conductance: format!("{:.6}", p.conductance),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!(
            "Conductance at E = {:.3} t ({} open channel(s))",
            curve.energy, curve.open_channels
        ));
        println!("{}", Table::new(&rows));
        output::print_info(&format!(
            "Maximum conductance: {:.6} e²/h",
            curve.max_conductance()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_format() {
        assert_eq!(guess_format_from_extension(Path::new("g.SVG")), OutputFormat::Svg);
        assert_eq!(guess_format_from_extension(Path::new("g.csv")), OutputFormat::Csv);
        assert_eq!(guess_format_from_extension(Path::new("g.dat")), OutputFormat::Xy);
        assert_eq!(guess_format_from_extension(Path::new("g")), OutputFormat::Png);
    }

    #[test]
    fn test_system_figure_never_empty() {
        assert_eq!(system_figure_size(1200, 800), (1200, 400));
        assert_eq!(system_figure_size(1200, 1), (1200, 1));
        assert_eq!(system_figure_size(0, 0), (1, 1));
    }

    #[test]
    fn test_open_channel_reference_uses_clean_well() {
        let system = crate::models::WellGeometry::default()
            .finalized_system()
            .unwrap();
        let solver = Solver::new(&system, crate::transport::SolverConfig::default()).unwrap();
        let data = solver.solve(0.2, &WellParams::default()).unwrap();
        assert_eq!(data.num_propagating(0).unwrap(), 1);
    }
}
