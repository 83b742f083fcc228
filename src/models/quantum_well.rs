//! # 量子阱模型
//!
//! 方格子上的矩形散射区，中部有一段深度可调的势阱，左右各接一个半无限电极。
//!
//! ## 模型
//! - 散射区格点 `(x, y)`，`x ∈ 0..L`, `y ∈ 0..W`
//! - 在位能 `4t + potential(site, pot)`，`pot` 在求解时绑定
//! - 最近邻跃迁 `-t`
//! - 电极 0 周期 `(-a, 0)`，电极 1 为其反向
//!
//! 势阱区间 `(L − L_well)/2 < x < (L + L_well)/2` 取严格不等号，边界格点势能为 0，
//! 因此电极界面永远不受扫描参数影响。
//!
//! ## 依赖关系
//! - 被 `commands/well.rs`, `commands/system.rs` 使用
//! - 使用 `system/` 构建紧束缚体系

use crate::error::{Result, TransportError};
use crate::system::{Builder, FinalizedSystem, Site, SquareLattice, TranslationalSymmetry, Value};

use num_complex::Complex64;

/// 求解时绑定的模型参数
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WellParams {
    /// 阱内势能（负值为势阱）
    pub pot: f64,
}

impl WellParams {
    /// 深度为 `depth` 的势阱
    pub fn well_depth(depth: f64) -> Self {
        Self { pot: -depth }
    }
}

/// 量子阱几何参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellGeometry {
    /// 晶格常数
    pub a: f64,
    /// 跃迁能
    pub t: f64,
    /// 散射区宽度（格点数）
    pub width: usize,
    /// 散射区长度（格点数）
    pub length: usize,
    /// 势阱长度（格点数）
    pub well_length: usize,
}

impl Default for WellGeometry {
    fn default() -> Self {
        Self {
            a: 1.0,
            t: 1.0,
            width: 10,
            length: 30,
            well_length: 10,
        }
    }
}

/// 势阱内返回 `pot`，其余位置返回 0
pub fn potential(site: &Site, pot: f64, length: usize, well_length: usize) -> f64 {
    let x = site.pos()[0];
    let (length, well_length) = (length as f64, well_length as f64);
    if (length - well_length) / 2.0 < x && x < (length + well_length) / 2.0 {
        pot
    } else {
        0.0
    }
}

impl WellGeometry {
    /// 检查几何参数
    pub fn validate(&self) -> Result<()> {
        if !(self.a.is_finite() && self.a > 0.0) {
            return Err(TransportError::InvalidArgument(format!(
                "lattice constant must be positive, got {}",
                self.a
            )));
        }
        if !self.t.is_finite() {
            return Err(TransportError::InvalidArgument(format!(
                "hopping must be finite, got {}",
                self.t
            )));
        }
        if self.width == 0 || self.length == 0 {
            return Err(TransportError::InvalidArgument(format!(
                "scattering region must be non-empty, got {} x {}",
                self.length, self.width
            )));
        }
        Ok(())
    }

    pub fn potential(&self, site: &Site, pot: f64) -> f64 {
        potential(site, pot, self.length, self.well_length)
    }

    /// 散射区在位能
    pub fn onsite(&self, site: &Site, params: &WellParams) -> f64 {
        4.0 * self.t + self.potential(site, params.pot)
    }

    pub fn lattice(&self) -> SquareLattice {
        SquareLattice::new(self.a)
    }

    /// 不含电极的散射区
    fn make_region(&self) -> Result<Builder<WellParams>> {
        let lat = self.lattice();
        let geometry = *self;
        let (length, width) = (self.length as i64, self.width as i64);

        let mut sys = Builder::new();
        sys.set_sites(
            (0..length).flat_map(|x| (0..width).map(move |y| lat.site(x, y))),
            Value::func(move |site, params: &WellParams| {
                Complex64::new(geometry.onsite(site, params), 0.0)
            }),
        );
        for kind in lat.nearest() {
            let hops = sys.possible_hoppings(kind);
            sys.set_hoppings(hops, -self.t)?;
        }
        Ok(sys)
    }

    /// 沿 −x 方向的电极
    fn make_lead(&self) -> Result<Builder<WellParams>> {
        let lat = self.lattice();
        let symmetry = TranslationalSymmetry::from_vector(&lat, [-self.a, 0.0])?;

        let mut lead = Builder::with_symmetry(symmetry);
        lead.set_sites(
            (0..self.width as i64).map(|j| lat.site(0, j)),
            4.0 * self.t,
        );
        for kind in lat.nearest() {
            let hops = lead.possible_hoppings(kind);
            lead.set_hoppings(hops, -self.t)?;
        }
        Ok(lead)
    }

    /// 构建带两个电极的量子阱体系
    pub fn make_system(&self) -> Result<Builder<WellParams>> {
        self.validate()?;
        let mut sys = self.make_region()?;
        let lead = self.make_lead()?;
        let reversed = lead.reversed()?;
        sys.attach_lead(lead)?;
        sys.attach_lead(reversed)?;
        Ok(sys)
    }

    /// 构建并定型
    pub fn finalized_system(&self) -> Result<FinalizedSystem<WellParams>> {
        self.make_system()?.finalized()
    }
}
