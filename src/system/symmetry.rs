//! # 一维平移对称性
//!
//! 电极由一个原胞沿周期向量无限重复构成。基本区域（fundamental domain）
//! 定义为满足 `0 <= tag·p < |p|²` 的格点集合。
//!
//! ## 依赖关系
//! - 被 `system/builder.rs`, `system/finalized.rs` 使用
//! - 使用 `system/lattice.rs`

use crate::error::{Result, TransportError};
use crate::system::{Site, SquareLattice};

/// 平移对称性（整数晶格周期）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationalSymmetry {
    period: [i64; 2],
}

impl TranslationalSymmetry {
    /// 由整数周期创建
    pub fn new(period: [i64; 2]) -> Result<Self> {
        if period == [0, 0] {
            return Err(TransportError::InvalidSymmetry(
                "period must be non-zero".to_string(),
            ));
        }
        Ok(Self { period })
    }

    /// 由实空间周期向量创建，向量必须是晶格向量
    pub fn from_vector(lattice: &SquareLattice, vector: [f64; 2]) -> Result<Self> {
        let period = lattice.vector_to_tag(vector).ok_or_else(|| {
            TransportError::InvalidSymmetry(format!(
                "({}, {}) is not a lattice vector",
                vector[0], vector[1]
            ))
        })?;
        Self::new(period)
    }

    pub fn period(&self) -> [i64; 2] {
        self.period
    }

    /// 反向对称性
    pub fn reversed(&self) -> Self {
        Self {
            period: [-self.period[0], -self.period[1]],
        }
    }

    /// 格点所在原胞编号 n，满足 site = translate(n, fd_site)
    pub fn which(&self, site: &Site) -> i64 {
        let p = self.period;
        let dot = site.tag[0] * p[0] + site.tag[1] * p[1];
        let norm = p[0] * p[0] + p[1] * p[1];
        dot.div_euclid(norm)
    }

    /// 平移 n 个周期
    pub fn translate(&self, n: i64, site: &Site) -> Site {
        site.shifted([n * self.period[0], n * self.period[1]])
    }

    /// 映射到基本区域
    pub fn to_fd(&self, site: &Site) -> Site {
        self.translate(-self.which(site), site)
    }

    /// 将跃迁整体平移，使第一个格点落在基本区域内
    pub fn to_fd_pair(&self, a: &Site, b: &Site) -> (Site, Site) {
        let n = self.which(a);
        (self.translate(-n, a), self.translate(-n, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fundamental_domain() {
        let lat = SquareLattice::new(1.0);
        let sym = TranslationalSymmetry::from_vector(&lat, [-1.0, 0.0]).unwrap();

        assert_eq!(sym.which(&lat.site(0, 3)), 0);
        assert_eq!(sym.which(&lat.site(-1, 3)), 1);
        assert_eq!(sym.which(&lat.site(5, 3)), -5);
        assert_eq!(sym.to_fd(&lat.site(7, 2)), lat.site(0, 2));
    }

    #[test]
    fn test_fd_pair() {
        let lat = SquareLattice::new(1.0);
        let sym = TranslationalSymmetry::new([-1, 0]).unwrap();
        let (a, b) = sym.to_fd_pair(&lat.site(1, 4), &lat.site(0, 4));
        assert_eq!(a, lat.site(0, 4));
        assert_eq!(b, lat.site(-1, 4));
        assert_eq!(sym.which(&b), 1);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(TranslationalSymmetry::new([0, 0]).is_err());
        let lat = SquareLattice::new(1.0);
        assert!(TranslationalSymmetry::from_vector(&lat, [0.5, 0.0]).is_err());
    }

    #[test]
    fn test_reversed_twice() {
        let sym = TranslationalSymmetry::new([2, -1]).unwrap();
        assert_eq!(sym.reversed().period(), [-2, 1]);
        assert_eq!(sym.reversed().reversed(), sym);
    }
}
