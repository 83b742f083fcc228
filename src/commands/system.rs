//! # system 命令实现
//!
//! 构建量子阱体系，打印格点、跃迁与电极信息，并绘制体系结构图，
//! 用于在扫描前检查体系是否符合预期。
//!
//! ## 依赖关系
//! - 使用 `cli/system.rs` 定义的 SystemArgs
//! - 使用 `models/quantum_well.rs` 构建体系
//! - 使用 `transport/` 计算电极通道数并绘图

use crate::cli::system::SystemArgs;
use crate::error::Result;
use crate::models::{WellGeometry, WellParams};
use crate::system::FinalizedSystem;
use crate::transport::{plot, ScatteringData, Solver};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 执行 system 命令
pub fn execute(args: SystemArgs) -> Result<()> {
    output::print_header("Quantum Well System");

    let geometry = args.geometry.to_geometry();
    let system = geometry.finalized_system()?;
    output::print_success(&format!(
        "Finalized system with {} sites and {} hoppings",
        system.site_count(),
        system.hopping_count()
    ));

    let params = WellParams::well_depth(args.well_depth);
    let solver = Solver::new(&system, args.solver.to_config())?;
    let data = solver.solve(args.energy, &params)?;

    print_system_table(&geometry, &solver, &params);
    print_lead_table(&system, &data)?;
    output::print_info(&format!(
        "T(lead 0 -> lead 1) at E = {:.4} t: {:.6}",
        args.energy,
        data.transmission(1, 0)?
    ));

    if args.no_plot {
        output::print_skip("Plot generation disabled");
        return Ok(());
    }

    let use_svg = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    plot::generate_system_plot(
        &system,
        &args.output,
        &format!(
            "Quantum well: L = {}, W = {}, L_well = {}",
            geometry.length, geometry.width, geometry.well_length
        ),
        args.lead_cells,
        args.fig_width,
        args.fig_height,
        use_svg,
    )?;
    output::print_done(&format!("System plot saved to '{}'", args.output.display()));
    Ok(())
}

/// 打印散射区概要
fn print_system_table(
    geometry: &WellGeometry,
    solver: &Solver<'_, WellParams>,
    params: &WellParams,
) {
    #[derive(Tabled)]
    struct SystemRow {
        #[tabled(rename = "Property")]
        property: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let system = solver.system();
    let config = solver.config();
    let well_sites = system
        .sites()
        .iter()
        .filter(|s| geometry.potential(s, params.pot) != 0.0)
        .count();
    let h = system.hamiltonian(params);
    let hermiticity = (&h - h.adjoint()).norm();

    let rows = vec![
        SystemRow {
            property: "Lattice constant".to_string(),
            value: format!("{}", geometry.lattice().lattice_constant()),
        },
        SystemRow {
            property: "Hopping t".to_string(),
            value: format!("{}", geometry.t),
        },
        SystemRow {
            property: "Region (L x W)".to_string(),
            value: format!("{} x {}", geometry.length, geometry.width),
        },
        SystemRow {
            property: "Well length".to_string(),
            value: geometry.well_length.to_string(),
        },
        SystemRow {
            property: "Sites".to_string(),
            value: system.site_count().to_string(),
        },
        SystemRow {
            property: "Hoppings".to_string(),
            value: system.hopping_count().to_string(),
        },
        SystemRow {
            property: "Sites inside the well".to_string(),
            value: well_sites.to_string(),
        },
        SystemRow {
            property: "|H - H^dagger|".to_string(),
            value: format!("{:.3e}", hermiticity),
        },
        SystemRow {
            property: "RGF layers".to_string(),
            value: solver.layer_count().to_string(),
        },
        SystemRow {
            property: "Solver (eta, tol, max iter)".to_string(),
            value: format!(
                "{:.1e}, {:.1e}, {}",
                config.eta, config.tolerance, config.max_iterations
            ),
        },
    ];

    println!("{}", Table::new(&rows));
}

/// 打印电极信息
fn print_lead_table(system: &FinalizedSystem<WellParams>, data: &ScatteringData) -> Result<()> {
    #[derive(Tabled)]
    struct LeadRow {
        #[tabled(rename = "Lead")]
        index: usize,
        #[tabled(rename = "Period")]
        period: String,
        #[tabled(rename = "Cell sites")]
        cell_size: usize,
        #[tabled(rename = "Interface sites")]
        interface: usize,
        #[tabled(rename = "Channels")]
        channels: usize,
    }

    let rows = system
        .leads()
        .iter()
        .enumerate()
        .map(|(i, lead)| {
            let p = lead.lead.symmetry().period();
            Ok(LeadRow {
                index: i,
                period: format!("({}, {})", p[0], p[1]),
                cell_size: lead.lead.cell_size(),
                interface: lead.interface.len(),
                channels: data.num_propagating(i)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    output::print_header(&format!("Leads at E = {:.4} t", data.energy()));
    println!("{}", Table::new(&rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::SolverConfig;

    #[test]
    fn test_report_quantities_for_default_well() {
        let geometry = WellGeometry::default();
        let system = geometry.finalized_system().unwrap();
        let solver = Solver::new(&system, SolverConfig::default()).unwrap();

        // 每一列为一层
        assert_eq!(solver.layer_count(), geometry.length);
        assert_eq!(*solver.config(), SolverConfig::default());
        assert_eq!(geometry.lattice().lattice_constant(), 1.0);

        let h = solver.system().hamiltonian(&WellParams::well_depth(0.4));
        assert_eq!(h.nrows(), 300);
        assert!((&h - h.adjoint()).norm() < 1e-12);
    }
}
