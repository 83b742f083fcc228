//! # 电极自能
//!
//! 半无限电极的表面格林函数（Lopez-Sancho 抽取法）、自能与传播通道数。
//!
//! ## 算法概述
//! 1. 以 `z = E + iη` 迭代重整化原胞在位块与耦合块
//! 2. 耦合块范数低于容差即收敛，得到表面格林函数 g
//! 3. 自能 Σ = V g Vᴴ，展宽 Γ = i(Σ − Σᴴ)
//! 4. 传播通道数 = 单个原胞两侧接理想电极时的透射
//!
//! ## 参考
//! - M. P. Lopez Sancho et al., J. Phys. F 15, 851 (1985)
//!
//! ## 依赖关系
//! - 被 `transport/solver.rs` 调用
//! - 使用 `system/finalized.rs` 的 InfiniteSystem
//! - 使用 `nalgebra` 进行稠密矩阵运算

use crate::error::{Result, TransportError};
use crate::system::InfiniteSystem;
use crate::transport::solver::SolverConfig;

use nalgebra::DMatrix;
use num_complex::Complex64;

/// 电极在界面上的自能
#[derive(Debug, Clone)]
pub struct LeadSelfEnergy {
    /// 自能 Σ（按电极原胞格点顺序）
    pub sigma: DMatrix<Complex64>,
    /// 展宽矩阵 Γ = i(Σ − Σᴴ)
    pub gamma: DMatrix<Complex64>,
    /// 传播通道数
    pub propagating: usize,
}

/// 计算电极的自能与传播通道数
pub fn lead_self_energy<P>(
    lead: &InfiniteSystem<P>,
    energy: f64,
    params: &P,
    config: &SolverConfig,
) -> Result<LeadSelfEnergy> {
    let h0 = lead.cell_hamiltonian(params);
    let v = lead.inter_cell_hopping();
    let v_dag = v.adjoint();

    // 沿周期方向延伸（远离散射区）的半无限链
    let g_out = surface_green_function(&h0, &v, energy, config)?;
    let sigma = &v * g_out * &v_dag;
    let gamma = broadening(&sigma);

    // 反方向的半无限链，仅用于统计通道数
    let g_in = surface_green_function(&h0, &v_dag, energy, config)?;
    let sigma_in = &v_dag * g_in * &v;
    let gamma_in = broadening(&sigma_in);

    let z = Complex64::new(energy, config.eta);
    let n = h0.nrows();
    let a = DMatrix::from_diagonal_element(n, n, z) - &h0 - &sigma - &sigma_in;
    let g = invert(a, "counting lead channels")?;
    let channels = trace_product(&gamma, &g, &gamma_in);
    let propagating = channels.round().max(0.0) as usize;

    Ok(LeadSelfEnergy {
        sigma,
        gamma,
        propagating,
    })
}

/// 半无限链的表面格林函数
///
/// `coupling` 为表面原胞到下一原胞的跃迁 H_{01}。
pub fn surface_green_function(
    h0: &DMatrix<Complex64>,
    coupling: &DMatrix<Complex64>,
    energy: f64,
    config: &SolverConfig,
) -> Result<DMatrix<Complex64>> {
    let n = h0.nrows();
    let z = DMatrix::from_diagonal_element(n, n, Complex64::new(energy, config.eta));
    let scale = (h0.norm() + coupling.norm()).max(1.0);

    let mut alpha = coupling.clone();
    let mut beta = coupling.adjoint();
    let mut eps_surface = h0.clone();
    let mut eps_bulk = h0.clone();

    for _ in 0..config.max_iterations {
        let g = invert(&z - &eps_bulk, "decimating lead")?;
        let agb = &alpha * &g * &beta;
        let bga = &beta * &g * &alpha;

        eps_surface += &agb;
        eps_bulk += agb + bga;
        alpha = &alpha * &g * &alpha;
        beta = &beta * &g * &beta;

        if alpha.norm() + beta.norm() < config.tolerance * scale {
            return invert(&z - &eps_surface, "computing surface Green's function");
        }
    }

    Err(TransportError::NonConvergence {
        iterations: config.max_iterations,
    })
}

/// Γ = i(Σ − Σᴴ)
pub fn broadening(sigma: &DMatrix<Complex64>) -> DMatrix<Complex64> {
    (sigma - sigma.adjoint()).map(|z| z * Complex64::i())
}

/// Re Tr[Γ_a G Γ_b Gᴴ]
pub fn trace_product(
    gamma_a: &DMatrix<Complex64>,
    g: &DMatrix<Complex64>,
    gamma_b: &DMatrix<Complex64>,
) -> f64 {
    (gamma_a * g * gamma_b * g.adjoint()).trace().re
}

/// 矩阵求逆，奇异时报错
pub fn invert(matrix: DMatrix<Complex64>, context: &str) -> Result<DMatrix<Complex64>> {
    matrix
        .try_inverse()
        .ok_or_else(|| TransportError::SingularMatrix {
            context: context.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{Builder, SquareLattice, TranslationalSymmetry};

    fn chain_lead(t: f64) -> InfiniteSystem<()> {
        let lat = SquareLattice::new(1.0);
        let sym = TranslationalSymmetry::new([-1, 0]).unwrap();
        let mut lead = Builder::with_symmetry(sym);
        lead.set_site(lat.site(0, 0), 0.0);
        let hops = lead.possible_hoppings(lat.nearest()[0]);
        lead.set_hoppings(hops, -t).unwrap();
        InfiniteSystem::from_builder(&lead).unwrap()
    }

    #[test]
    fn test_chain_surface_green_function() {
        // 一维链：g(E) = (E − i√(4t² − E²)) / (2t²)
        let lead = chain_lead(1.0);
        let config = SolverConfig::default();
        let h0 = lead.cell_hamiltonian(&());
        let v = lead.inter_cell_hopping();

        let energy = 0.5;
        let g = surface_green_function(&h0, &v, energy, &config).unwrap();
        let expected = Complex64::new(energy, -(4.0 - energy * energy).sqrt()) / 2.0;
        assert!((g[(0, 0)] - expected).norm() < 1e-6);
    }

    #[test]
    fn test_chain_channels() {
        let lead = chain_lead(1.0);
        let config = SolverConfig::default();

        let inside = lead_self_energy(&lead, 1.0, &(), &config).unwrap();
        assert_eq!(inside.propagating, 1);

        let outside = lead_self_energy(&lead, 2.5, &(), &config).unwrap();
        assert_eq!(outside.propagating, 0);
        assert!(outside.gamma.norm() < 1e-6);
    }

    #[test]
    fn test_singular_matrix_reported() {
        let zero = DMatrix::<Complex64>::zeros(2, 2);
        assert!(matches!(
            invert(zero, "testing"),
            Err(TransportError::SingularMatrix { .. })
        ));
    }
}
