//! # 散射结果
//!
//! 保存给定能量下各电极间的透射系数与传播通道数。
//!
//! ## 依赖关系
//! - 由 `transport/solver.rs` 生成
//! - 被 `transport/sweep.rs`, `commands/` 使用

use crate::error::{Result, TransportError};

use nalgebra::DMatrix;

/// 散射计算结果
#[derive(Debug, Clone)]
pub struct ScatteringData {
    energy: f64,
    /// transmissions[(i, j)]：电极 j → 电极 i；对角元为反射
    transmissions: DMatrix<f64>,
    propagating: Vec<usize>,
}

impl ScatteringData {
    pub(crate) fn new(energy: f64, transmissions: DMatrix<f64>, propagating: Vec<usize>) -> Self {
        Self {
            energy,
            transmissions,
            propagating,
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn lead_count(&self) -> usize {
        self.propagating.len()
    }

    fn check_lead(&self, lead: usize) -> Result<()> {
        if lead >= self.lead_count() {
            return Err(TransportError::LeadIndexOutOfRange {
                index: lead,
                count: self.lead_count(),
            });
        }
        Ok(())
    }

    /// 从电极 `from` 到电极 `to` 的透射系数（单位 e²/h）
    pub fn transmission(&self, to: usize, from: usize) -> Result<f64> {
        self.check_lead(to)?;
        self.check_lead(from)?;
        Ok(self.transmissions[(to, from)])
    }

    /// 电极的传播通道数
    pub fn num_propagating(&self, lead: usize) -> Result<usize> {
        self.check_lead(lead)?;
        Ok(self.propagating[lead])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_checks() {
        let data = ScatteringData::new(
            0.2,
            DMatrix::from_row_slice(2, 2, &[0.25, 0.75, 0.75, 0.25]),
            vec![1, 1],
        );
        assert_eq!(data.transmission(1, 0).unwrap(), 0.75);
        assert_eq!(data.num_propagating(1).unwrap(), 1);
        assert!(matches!(
            data.transmission(2, 0),
            Err(TransportError::LeadIndexOutOfRange { index: 2, count: 2 })
        ));
    }
}
