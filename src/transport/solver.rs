//! # 散射求解器
//!
//! 在给定能量和参数绑定下计算各电极间的透射系数。
//!
//! ## 算法概述
//! 1. 计算每个电极的自能 Σ 与展宽 Γ
//! 2. 按层组装 A = E − H − ΣΣ_lead 的对角块与耦合块
//! 3. 递归格林函数：自左向右扫描得到 G_{K,0}, G_{0,K}, G_{K,K}
//! 4. Fisher-Lee 公式 T_ij = Tr[Γ_i G_ij Γ_j G_ijᴴ]
//! 5. 对角元由幺正性给出反射 R_i = N_i − Σ_j T_ji
//!
//! ## 依赖关系
//! - 被 `transport/sweep.rs`, `commands/` 调用
//! - 使用 `transport/leads.rs`, `transport/slicer.rs`
//! - 使用 `nalgebra` 进行稠密块运算

use crate::error::{Result, TransportError};
use crate::system::FinalizedSystem;
use crate::transport::leads::{self, LeadSelfEnergy};
use crate::transport::slicer::Slicing;
use crate::transport::ScatteringData;

use nalgebra::DMatrix;
use num_complex::Complex64;

/// 求解器数值参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// 电极表面格林函数的虚部展宽 η
    pub eta: f64,
    /// 抽取迭代的收敛容差（相对）
    pub tolerance: f64,
    /// 抽取迭代最大次数
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            eta: 1e-9,
            tolerance: 1e-12,
            max_iterations: 200,
        }
    }
}

/// 散射求解器，对同一定型体系可重复求解
pub struct Solver<'a, P> {
    system: &'a FinalizedSystem<P>,
    slicing: Slicing,
    config: SolverConfig,
}

impl<'a, P> Solver<'a, P> {
    /// 创建求解器（分层只做一次）
    pub fn new(system: &'a FinalizedSystem<P>, config: SolverConfig) -> Result<Self> {
        let slicing = Slicing::new(system)?;
        Ok(Self {
            system,
            slicing,
            config,
        })
    }

    pub fn system(&self) -> &FinalizedSystem<P> {
        self.system
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 散射区分层数
    pub fn layer_count(&self) -> usize {
        self.slicing.layer_count()
    }

    /// 求解给定能量与参数下的散射问题
    pub fn solve(&self, energy: f64, params: &P) -> Result<ScatteringData> {
        let lead_data = self
            .system
            .leads()
            .iter()
            .map(|lead| leads::lead_self_energy(&lead.lead, energy, params, &self.config))
            .collect::<Result<Vec<_>>>()?;

        let blocks = self.assemble(energy, params, &lead_data)?;
        let greens = blocks.sweep()?;

        let n_leads = lead_data.len();
        let mut transmissions = DMatrix::zeros(n_leads, n_leads);
        for to in 0..n_leads {
            for from in 0..n_leads {
                if to == from {
                    continue;
                }
                let g = self.interface_block(&greens, to, from)?;
                transmissions[(to, from)] =
                    leads::trace_product(&lead_data[to].gamma, &g, &lead_data[from].gamma);
            }
        }

        let propagating: Vec<usize> = lead_data.iter().map(|l| l.propagating).collect();
        for i in 0..n_leads {
            let transmitted: f64 = (0..n_leads)
                .filter(|&j| j != i)
                .map(|j| transmissions[(j, i)])
                .sum();
            transmissions[(i, i)] = propagating[i] as f64 - transmitted;
        }

        Ok(ScatteringData::new(energy, transmissions, propagating))
    }

    /// 组装分块的 A = E − H − Σ
    fn assemble(
        &self,
        energy: f64,
        params: &P,
        lead_data: &[LeadSelfEnergy],
    ) -> Result<BlockSystem> {
        let layers = &self.slicing.layers;
        let position = &self.slicing.position;
        let n_layers = layers.len();
        let z = Complex64::new(energy, 0.0);

        let mut diagonal: Vec<DMatrix<Complex64>> = layers
            .iter()
            .map(|l| DMatrix::from_diagonal_element(l.len(), l.len(), z))
            .collect();
        let mut upper: Vec<DMatrix<Complex64>> = (1..n_layers)
            .map(|l| DMatrix::zeros(layers[l - 1].len(), layers[l].len()))
            .collect();
        let mut lower: Vec<DMatrix<Complex64>> = (1..n_layers)
            .map(|l| DMatrix::zeros(layers[l].len(), layers[l - 1].len()))
            .collect();

        for (i, e) in self.system.onsite_energies(params).into_iter().enumerate() {
            let (l, k) = position[i];
            diagonal[l][(k, k)] -= e;
        }

        for (i, j, v) in self.system.hopping_elements() {
            let (li, ki) = position[i];
            let (lj, kj) = position[j];
            if li == lj {
                diagonal[li][(ki, kj)] -= v;
                diagonal[li][(kj, ki)] -= v.conj();
            } else if lj == li + 1 {
                upper[li][(ki, kj)] -= v;
                lower[li][(kj, ki)] -= v.conj();
            } else if li == lj + 1 {
                upper[lj][(kj, ki)] -= v.conj();
                lower[lj][(ki, kj)] -= v;
            } else {
                return Err(TransportError::Other(format!(
                    "hopping between layers {} and {} breaks block-tridiagonal form",
                    li, lj
                )));
            }
        }

        for (lead, data) in self.system.leads().iter().zip(lead_data) {
            let layer = position[lead.interface[0]].0;
            for (m, &i) in lead.interface.iter().enumerate() {
                let (li, ki) = position[i];
                if li != layer {
                    return Err(TransportError::Other(
                        "lead interface spans several layers".to_string(),
                    ));
                }
                for (n, &j) in lead.interface.iter().enumerate() {
                    let kj = position[j].1;
                    diagonal[layer][(ki, kj)] -= data.sigma[(m, n)];
                }
            }
        }

        Ok(BlockSystem {
            diagonal,
            upper,
            lower,
        })
    }

    /// 取出电极 `to` 与电极 `from` 界面之间的格林函数子块
    fn interface_block(
        &self,
        greens: &BoundaryGreens,
        to: usize,
        from: usize,
    ) -> Result<DMatrix<Complex64>> {
        let leads = self.system.leads();
        let position = &self.slicing.position;
        let last = self.slicing.last();

        let layer_of = |lead: usize| position[leads[lead].interface[0]].0;
        let (lt, lf) = (layer_of(to), layer_of(from));

        let g = if lt == last && lf == last {
            &greens.last_last
        } else if lt == last && lf == 0 {
            &greens.last_first
        } else if lt == 0 && lf == last {
            &greens.first_last
        } else {
            return Err(TransportError::Other(format!(
                "no Green's function block between layers {} and {}",
                lt, lf
            )));
        };

        let rows: Vec<usize> = leads[to].interface.iter().map(|&i| position[i].1).collect();
        let cols: Vec<usize> = leads[from].interface.iter().map(|&i| position[i].1).collect();
        Ok(DMatrix::from_fn(rows.len(), cols.len(), |r, c| {
            g[(rows[r], cols[c])]
        }))
    }
}

/// 块三对角矩阵 A
struct BlockSystem {
    diagonal: Vec<DMatrix<Complex64>>,
    /// upper[l] = A_{l, l+1}
    upper: Vec<DMatrix<Complex64>>,
    /// lower[l] = A_{l+1, l}
    lower: Vec<DMatrix<Complex64>>,
}

/// 首末层之间的格林函数块
struct BoundaryGreens {
    last_last: DMatrix<Complex64>,
    last_first: DMatrix<Complex64>,
    first_last: DMatrix<Complex64>,
}

impl BlockSystem {
    /// 自左向右的递归格林函数扫描
    fn sweep(self) -> Result<BoundaryGreens> {
        let BlockSystem {
            diagonal,
            upper,
            lower,
        } = self;

        let mut blocks = diagonal.into_iter();
        let first = blocks
            .next()
            .ok_or_else(|| TransportError::Other("scattering region has no layers".to_string()))?;

        // 左连通格林函数 g_l 及其与第 0 层之间的传播子
        let mut g_left = leads::invert(first, "inverting the first layer")?;
        let mut column = g_left.clone();
        let mut row = g_left.clone();

        for (l, block) in blocks.enumerate() {
            let a_up = &upper[l];
            let a_down = &lower[l];
            let reduced = block - a_down * &g_left * a_up;
            let g_next = leads::invert(reduced, "propagating the recursive Green's function")?;

            column = -(&g_next * a_down * &column);
            row = -(&row * a_up * &g_next);
            g_left = g_next;
        }

        Ok(BoundaryGreens {
            last_last: g_left,
            last_first: column,
            first_last: row,
        })
    }
}
