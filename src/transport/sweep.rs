//! # 参数扫描
//!
//! 在固定能量下依次改变一个标量参数，对同一定型体系重复求解并收集透射系数。
//!
//! ## 功能
//! - 输出顺序与输入顺序严格一致
//! - 可选 rayon 并行（`jobs > 1`）
//! - 进度条显示
//! - 任一次求解失败即返回该错误
//!
//! ## 依赖关系
//! - 被 `commands/well.rs` 调用
//! - 使用 `transport/solver.rs` 求解
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{Result, TransportError};
use crate::transport::Solver;
use crate::utils::progress;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

/// 扫描配置
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    /// 固定能量
    pub energy: f64,
    /// 出射电极
    pub lead_out: usize,
    /// 入射电极
    pub lead_in: usize,
    /// 并行作业数
    jobs: usize,
    show_progress: bool,
}

impl ParameterSweep {
    /// 默认测量电极 0 → 电极 1 的透射，单线程
    pub fn new(energy: f64) -> Self {
        Self {
            energy,
            lead_out: 1,
            lead_in: 0,
            jobs: 1,
            show_progress: false,
        }
    }

    pub fn leads(mut self, lead_out: usize, lead_in: usize) -> Self {
        self.lead_out = lead_out;
        self.lead_in = lead_in;
        self
    }

    /// 设置并行作业数（0 = 全部核心）
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// 对每个参数值求解并返回透射系数，`bind` 将参数值转换为模型参数
    pub fn run<P, F>(&self, solver: &Solver<'_, P>, values: &[f64], bind: F) -> Result<Vec<f64>>
    where
        F: Fn(f64) -> P + Sync,
    {
        let pb = if self.show_progress {
            progress::create_progress_bar(values.len() as u64, "Solving")
        } else {
            ProgressBar::hidden()
        };

        let measure = |value: f64| -> Result<f64> {
            let data = solver.solve(self.energy, &bind(value))?;
            let t = data.transmission(self.lead_out, self.lead_in)?;
            pb.inc(1);
            Ok(t)
        };

        let result = if self.jobs <= 1 {
            values.iter().map(|&v| measure(v)).collect::<Result<Vec<f64>>>()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()
                .map_err(|e| TransportError::Other(e.to_string()))?;
            pool.install(|| {
                values
                    .par_iter()
                    .map(|&v| measure(v))
                    .collect::<Result<Vec<f64>>>()
            })
        };

        pb.finish_and_clear();
        result
    }
}

/// 等间距参数序列 start + step·i，i = 0..count
pub fn linear_values(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// 扫描曲线上的一点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub well_depth: f64,
    pub conductance: f64,
}

/// 电导随阱深变化的曲线
#[derive(Debug, Clone)]
pub struct ConductanceCurve {
    /// 体系名称
    pub name: String,
    /// 能量（单位 t）
    pub energy: f64,
    /// 入射电极的传播通道数
    pub open_channels: usize,
    pub points: Vec<SweepPoint>,
}

impl ConductanceCurve {
    /// 由两个等长序列组装
    pub fn new(
        name: impl Into<String>,
        energy: f64,
        open_channels: usize,
        depths: &[f64],
        conductances: &[f64],
    ) -> Result<Self> {
        if depths.len() != conductances.len() {
            return Err(TransportError::InvalidArgument(format!(
                "{} well depths but {} conductance values",
                depths.len(),
                conductances.len()
            )));
        }
        let points = depths
            .iter()
            .zip(conductances)
            .map(|(&well_depth, &conductance)| SweepPoint {
                well_depth,
                conductance,
            })
            .collect();
        Ok(Self {
            name: name.into(),
            energy,
            open_channels,
            points,
        })
    }

    pub fn depths(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.well_depth).collect()
    }

    pub fn max_conductance(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.conductance)
            .fold(0.0_f64, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{Builder, FinalizedSystem, SquareLattice, TranslationalSymmetry, Value};
    use crate::transport::SolverConfig;
    use num_complex::Complex64;

    /// 一维链，中间格点的在位能由参数给出
    fn chain() -> FinalizedSystem<f64> {
        let lat = SquareLattice::new(1.0);
        let mut sys = Builder::new();
        sys.set_sites((0..3).map(|x| lat.site(x, 0)), 2.0);
        sys.set_site(
            lat.site(1, 0),
            Value::func(|_, u: &f64| Complex64::new(2.0 + u, 0.0)),
        );
        let hops = sys.possible_hoppings(lat.nearest()[0]);
        sys.set_hoppings(hops, -1.0).unwrap();

        let sym = TranslationalSymmetry::new([-1, 0]).unwrap();
        let mut lead = Builder::with_symmetry(sym);
        lead.set_site(lat.site(0, 0), 2.0);
        let hops = lead.possible_hoppings(lat.nearest()[0]);
        lead.set_hoppings(hops, -1.0).unwrap();
        let reversed = lead.reversed().unwrap();
        sys.attach_lead(lead).unwrap();
        sys.attach_lead(reversed).unwrap();
        sys.finalized().unwrap()
    }

    #[test]
    fn test_linear_values() {
        let values = linear_values(0.0, 0.01, 100);
        assert_eq!(values.len(), 100);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[37], 0.01 * 37.0);
    }

    #[test]
    fn test_sweep_preserves_order() {
        let sys = chain();
        let solver = Solver::new(&sys, SolverConfig::default()).unwrap();
        let values = [0.0, 2.0, 0.5, 1.0];
        let data = ParameterSweep::new(0.3)
            .run(&solver, &values, |u| u)
            .unwrap();

        assert_eq!(data.len(), values.len());
        for (value, t) in values.iter().zip(&data) {
            let single = solver.solve(0.3, value).unwrap().transmission(1, 0).unwrap();
            assert_eq!(*t, single);
        }
        // 势垒越高透射越小
        assert!(data[0] > data[2] && data[2] > data[3] && data[3] > data[1]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sys = chain();
        let solver = Solver::new(&sys, SolverConfig::default()).unwrap();
        let values = linear_values(-1.0, 0.1, 21);
        let sequential = ParameterSweep::new(1.0).run(&solver, &values, |u| u).unwrap();
        let parallel = ParameterSweep::new(1.0)
            .jobs(4)
            .run(&solver, &values, |u| u)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_bad_lead_index_propagates() {
        let sys = chain();
        let solver = Solver::new(&sys, SolverConfig::default()).unwrap();
        let result = ParameterSweep::new(1.0)
            .leads(3, 0)
            .run(&solver, &[0.0], |u| u);
        assert!(matches!(
            result,
            Err(TransportError::LeadIndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_curve_requires_equal_lengths() {
        assert!(ConductanceCurve::new("x", 0.2, 1, &[0.0, 0.1], &[1.0]).is_err());
        let curve = ConductanceCurve::new("x", 0.2, 1, &[0.0, 0.1], &[1.0, 0.5]).unwrap();
        assert_eq!(curve.depths(), vec![0.0, 0.1]);
        assert_eq!(curve.max_conductance(), 1.0);
    }
}
