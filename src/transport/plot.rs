//! # 图表生成
//!
//! 使用 `plotters` 库生成电导曲线和体系结构图。
//!
//! ## 功能
//! - 电导 vs 阱深折线图
//! - 体系结构图：格点、跃迁、若干电极原胞
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/well.rs`, `commands/system.rs` 调用
//! - 使用 `transport/sweep.rs` 的 ConductanceCurve
//! - 使用 `system/finalized.rs` 的 FinalizedSystem
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, TransportError};
use crate::system::FinalizedSystem;
use crate::transport::ConductanceCurve;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const LINE_COLOR: RGBColor = RGBColor(0, 102, 204);
const SITE_COLOR: RGBColor = RGBColor(0, 102, 204);
const LEAD_COLOR: RGBColor = RGBColor(204, 51, 51);

fn plot_err<E: std::fmt::Debug>(e: E) -> TransportError {
    TransportError::PlotError(format!("{:?}", e))
}

/// 生成电导曲线图
pub fn generate_conductance_plot(
    curve: &ConductanceCurve,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_conductance_chart(&root, curve, title)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_conductance_chart(&root, curve, title)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 绘制电导曲线
fn draw_conductance_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    curve: &ConductanceCurve,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let depths = curve.depths();
    let x_min = depths.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = depths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (x_min, x_max) = if x_min.is_finite() && x_max > x_min {
        (x_min, x_max)
    } else {
        (0.0, 1.0)
    };
    let y_max = curve.max_conductance().max(curve.open_channels as f64).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("well depth [in units of t]")
        .y_desc("conductance [in units of e^2/h]")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            curve.points.iter().map(|p| (p.well_depth, p.conductance)),
            LINE_COLOR.stroke_width(2),
        ))
        .map_err(plot_err)?;

    let energy_text = format!("E = {:.3} t", curve.energy);
    chart
        .draw_series(std::iter::once(Text::new(
            energy_text,
            (x_min + 0.8 * (x_max - x_min), y_max * 0.95),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(plot_err)?;

    Ok(())
}

/// 生成体系结构图，每个电极额外画出 `lead_cells` 个原胞
pub fn generate_system_plot<P>(
    system: &FinalizedSystem<P>,
    output_path: &Path,
    title: &str,
    lead_cells: usize,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_system_chart(&root, system, title, lead_cells)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_system_chart(&root, system, title, lead_cells)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 电极原胞在实空间中的格点与跃迁
fn lead_geometry<P>(
    system: &FinalizedSystem<P>,
    lead_cells: usize,
) -> (Vec<(f64, f64)>, Vec<[(f64, f64); 2]>) {
    let mut sites = Vec::new();
    let mut bonds = Vec::new();

    for lead in system.leads() {
        let symmetry = lead.lead.symmetry();
        for n in 1..=lead_cells as i64 {
            let cell = lead.interface_cell + n;
            for (k, site) in lead.lead.cell_sites().iter().enumerate() {
                let here = symmetry.translate(cell, site).pos();
                let previous = match n {
                    1 => system.sites()[lead.interface[k]].pos(),
                    _ => symmetry.translate(cell - 1, site).pos(),
                };
                sites.push((here[0], here[1]));
                bonds.push([(previous[0], previous[1]), (here[0], here[1])]);
            }
        }
    }

    (sites, bonds)
}

/// 绘制体系结构
fn draw_system_chart<DB: DrawingBackend, P>(
    root: &DrawingArea<DB, Shift>,
    system: &FinalizedSystem<P>,
    title: &str,
    lead_cells: usize,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let positions: Vec<(f64, f64)> = system
        .sites()
        .iter()
        .map(|s| {
            let p = s.pos();
            (p[0], p[1])
        })
        .collect();
    let (lead_sites, lead_bonds) = lead_geometry(system, lead_cells);

    let all = positions.iter().chain(lead_sites.iter());
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
    );
    for &(x, y) in all {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !x_min.is_finite() {
        (x_min, x_max, y_min, y_max) = (0.0, 1.0, 0.0, 1.0);
    }
    let pad = system
        .sites()
        .first()
        .map(|s| s.spacing())
        .unwrap_or(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((x_min - pad)..(x_max + pad), (y_min - pad)..(y_max + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x")
        .y_desc("y")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(system.hopping_pairs().map(|(i, j)| {
            PathElement::new(vec![positions[i], positions[j]], BLACK.mix(0.6).stroke_width(1))
        }))
        .map_err(plot_err)?;

    chart
        .draw_series(lead_bonds.iter().map(|bond| {
            PathElement::new(bond.to_vec(), LEAD_COLOR.mix(0.4).stroke_width(1))
        }))
        .map_err(plot_err)?;

    chart
        .draw_series(
            positions
                .iter()
                .map(|&p| Circle::new(p, 4, SITE_COLOR.filled())),
        )
        .map_err(plot_err)?;

    chart
        .draw_series(
            lead_sites
                .iter()
                .map(|&p| Circle::new(p, 4, LEAD_COLOR.mix(0.5).filled())),
        )
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quantum_well::WellGeometry;

    #[test]
    fn test_lead_geometry_extends_outwards() {
        let geometry = WellGeometry {
            width: 2,
            length: 4,
            ..WellGeometry::default()
        };
        let system = geometry.make_system().unwrap().finalized().unwrap();
        let (sites, bonds) = lead_geometry(&system, 2);
        // 2 个电极 × 2 个原胞 × 2 个格点
        assert_eq!(sites.len(), 8);
        assert_eq!(bonds.len(), 8);
        assert!(sites.iter().any(|&(x, _)| x == -2.0));
        assert!(sites.iter().any(|&(x, _)| x == 5.0));
    }
}
