//! # 体系构建器
//!
//! 以声明方式组装紧束缚体系：格点 → 在位能，格点对 → 跃迁值。
//! 带平移对称性的构建器描述一个电极，其格点和跃迁保存在基本区域内。
//!
//! ## 依赖关系
//! - 被 `models/quantum_well.rs` 使用
//! - 使用 `system/lattice.rs`, `system/value.rs`, `system/symmetry.rs`
//! - 调用 `system/finalized.rs` 生成定型体系

use crate::error::{Result, TransportError};
use crate::system::finalized::FinalizedSystem;
use crate::system::{HoppingKind, Site, TranslationalSymmetry, Value};

use num_complex::Complex64;
use std::collections::BTreeMap;

/// 紧束缚体系构建器
pub struct Builder<P> {
    symmetry: Option<TranslationalSymmetry>,
    sites: BTreeMap<Site, Value<P>>,
    hoppings: BTreeMap<(Site, Site), Complex64>,
    leads: Vec<Builder<P>>,
}

impl<P> Default for Builder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Builder<P> {
    /// 创建无对称性的构建器（散射区）
    pub fn new() -> Self {
        Self {
            symmetry: None,
            sites: BTreeMap::new(),
            hoppings: BTreeMap::new(),
            leads: Vec::new(),
        }
    }

    /// 创建带平移对称性的构建器（电极）
    pub fn with_symmetry(symmetry: TranslationalSymmetry) -> Self {
        Self {
            symmetry: Some(symmetry),
            ..Self::new()
        }
    }

    pub fn symmetry(&self) -> Option<&TranslationalSymmetry> {
        self.symmetry.as_ref()
    }

    fn canonical_site(&self, site: &Site) -> Site {
        match &self.symmetry {
            Some(sym) => sym.to_fd(site),
            None => *site,
        }
    }

    fn canonical_pair(&self, a: &Site, b: &Site) -> (Site, Site) {
        match &self.symmetry {
            Some(sym) => sym.to_fd_pair(a, b),
            None => (*a, *b),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // 格点
    // ─────────────────────────────────────────────────────────────

    /// 设置单个格点的在位能（已存在则覆盖）
    pub fn set_site(&mut self, site: Site, value: impl Into<Value<P>>) {
        let site = self.canonical_site(&site);
        self.sites.insert(site, value.into());
    }

    /// 为一组格点设置同一在位能
    pub fn set_sites<I>(&mut self, sites: I, value: impl Into<Value<P>>)
    where
        I: IntoIterator<Item = Site>,
    {
        let value = value.into();
        for site in sites {
            self.set_site(site, value.clone());
        }
    }

    pub fn contains_site(&self, site: &Site) -> bool {
        self.sites.contains_key(&self.canonical_site(site))
    }

    /// 按顺序遍历格点（电极为基本区域内的格点）
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.keys()
    }

    pub fn onsites(&self) -> impl Iterator<Item = (&Site, &Value<P>)> {
        self.sites.iter()
    }

    // ─────────────────────────────────────────────────────────────
    // 跃迁
    // ─────────────────────────────────────────────────────────────

    /// 设置跃迁 `H[a, b]`，两个格点都必须已存在
    pub fn set_hopping(
        &mut self,
        hopping: (Site, Site),
        value: impl Into<Complex64>,
    ) -> Result<()> {
        let (a, b) = hopping;
        if a == b {
            return Err(TransportError::InvalidHopping(format!(
                "{} cannot hop to itself",
                a
            )));
        }
        for site in [&a, &b] {
            if !self.contains_site(site) {
                return Err(TransportError::MissingSite {
                    site: site.to_string(),
                });
            }
        }

        let key = self.canonical_pair(&a, &b);
        if key.0 == key.1 {
            return Err(TransportError::InvalidHopping(format!(
                "{} and {} are images of the same site",
                a, b
            )));
        }

        // 同一跃迁只保存一个方向
        let reverse = self.canonical_pair(&b, &a);
        self.hoppings.remove(&reverse);
        self.hoppings.insert(key, value.into());
        Ok(())
    }

    /// 为一组跃迁设置同一值
    pub fn set_hoppings<I>(
        &mut self,
        hoppings: I,
        value: impl Into<Complex64>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (Site, Site)>,
    {
        let value = value.into();
        for hopping in hoppings {
            self.set_hopping(hopping, value)?;
        }
        Ok(())
    }

    /// 按顺序遍历跃迁 `((a, b), H[a, b])`，每条跃迁只出现一个方向
    pub fn hoppings(&self) -> impl Iterator<Item = (&(Site, Site), &Complex64)> {
        self.hoppings.iter()
    }

    /// 列出体系中所有 `(site + delta, site)` 都存在的格点对
    pub fn possible_hoppings(&self, kind: HoppingKind) -> Vec<(Site, Site)> {
        self.sites
            .keys()
            .map(|site| (site.shifted(kind.delta), *site))
            .filter(|(a, _)| self.contains_site(a))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────
    // 电极
    // ─────────────────────────────────────────────────────────────

    /// 返回方向反转的电极副本
    pub fn reversed(&self) -> Result<Self> {
        let symmetry = self.symmetry.ok_or(TransportError::NotALead)?;
        let mut lead = Builder::with_symmetry(symmetry.reversed());
        for (site, value) in &self.sites {
            lead.set_site(*site, value.clone());
        }
        for ((a, b), value) in &self.hoppings {
            let key = lead.canonical_pair(a, b);
            lead.hoppings.insert(key, *value);
        }
        Ok(lead)
    }

    /// 连接电极，返回电极编号
    pub fn attach_lead(&mut self, lead: Builder<P>) -> Result<usize> {
        if self.symmetry.is_some() {
            return Err(TransportError::InvalidSymmetry(
                "leads can only be attached to a system without symmetry".to_string(),
            ));
        }
        if lead.symmetry.is_none() {
            return Err(TransportError::NotALead);
        }
        if !lead.leads.is_empty() {
            return Err(TransportError::InvalidSymmetry(
                "a lead cannot carry leads of its own".to_string(),
            ));
        }
        self.leads.push(lead);
        Ok(self.leads.len() - 1)
    }

    pub fn leads(&self) -> &[Builder<P>] {
        &self.leads
    }

    /// 校验并索引，生成不可变的定型体系
    pub fn finalized(&self) -> Result<FinalizedSystem<P>> {
        FinalizedSystem::from_builder(self)
    }
}
