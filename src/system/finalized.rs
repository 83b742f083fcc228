//! # 定型体系
//!
//! 构建器经校验和索引后得到的不可变体系，供求解器使用。
//!
//! ## 定型步骤
//! 1. 散射区格点排序并编号
//! 2. 跃迁转为编号对
//! 3. 电极定型为 `InfiniteSystem`（原胞哈密顿量 + 原胞间跃迁）
//! 4. 查找每个电极与散射区的界面格点
//!
//! ## 依赖关系
//! - 由 `system/builder.rs` 调用
//! - 被 `transport/` 使用
//! - 使用 `nalgebra` 组装哈密顿量矩阵

use crate::error::{Result, TransportError};
use crate::system::{Builder, Site, TranslationalSymmetry, Value};

use nalgebra::DMatrix;
use num_complex::Complex64;
use std::collections::BTreeMap;

/// 编号后的跃迁，`H[from, to] = value`
struct IndexedHopping {
    from: usize,
    to: usize,
    value: Complex64,
}

/// 原胞间跃迁
struct InterCellHopping {
    /// 原胞 0 中的格点编号
    from: usize,
    /// 相邻原胞中的格点编号（基本区域内的对应格点）
    to: usize,
    value: Complex64,
    /// 目标格点位于原胞 -1（而非原胞 +1）
    backward: bool,
}

/// 定型后的电极
pub struct InfiniteSystem<P> {
    symmetry: TranslationalSymmetry,
    cell_sites: Vec<Site>,
    onsites: Vec<Value<P>>,
    intra: Vec<IndexedHopping>,
    inter: Vec<InterCellHopping>,
}

impl<P> InfiniteSystem<P> {
    pub(crate) fn from_builder(lead: &Builder<P>) -> Result<Self> {
        let symmetry = *lead.symmetry().ok_or(TransportError::NotALead)?;

        let cell_sites: Vec<Site> = lead.sites().copied().collect();
        let onsites: Vec<Value<P>> = lead.onsites().map(|(_, v)| v.clone()).collect();
        let index: BTreeMap<Site, usize> = cell_sites
            .iter()
            .enumerate()
            .map(|(i, s)| (*s, i))
            .collect();

        let mut intra = Vec::new();
        let mut inter = Vec::new();

        for (&(a, b), value) in lead.hoppings() {
            let from = index[&a];
            let cell = symmetry.which(&b);
            let to = *index
                .get(&symmetry.to_fd(&b))
                .ok_or_else(|| TransportError::MissingSite {
                    site: b.to_string(),
                })?;

            match cell {
                0 => intra.push(IndexedHopping {
                    from,
                    to,
                    value: *value,
                }),
                1 | -1 => inter.push(InterCellHopping {
                    from,
                    to,
                    value: *value,
                    backward: cell == -1,
                }),
                _ => {
                    return Err(TransportError::InvalidSymmetry(format!(
                        "lead hopping {} -> {} skips {} unit cells",
                        a,
                        b,
                        cell.abs() - 1
                    )))
                }
            }
        }

        Ok(Self {
            symmetry,
            cell_sites,
            onsites,
            intra,
            inter,
        })
    }

    pub fn symmetry(&self) -> &TranslationalSymmetry {
        &self.symmetry
    }

    /// 原胞 0（基本区域）内的格点
    pub fn cell_sites(&self) -> &[Site] {
        &self.cell_sites
    }

    pub fn cell_size(&self) -> usize {
        self.cell_sites.len()
    }

    /// 原胞内哈密顿量 H_00
    pub fn cell_hamiltonian(&self, params: &P) -> DMatrix<Complex64> {
        let n = self.cell_size();
        let mut h = DMatrix::zeros(n, n);
        for (i, (site, value)) in self.cell_sites.iter().zip(&self.onsites).enumerate() {
            h[(i, i)] += value.eval(site, params);
        }
        for hop in &self.intra {
            h[(hop.from, hop.to)] += hop.value;
            h[(hop.to, hop.from)] += hop.value.conj();
        }
        h
    }

    /// 原胞 n 到原胞 n+1 的跃迁矩阵 V = H_{n,n+1}
    pub fn inter_cell_hopping(&self) -> DMatrix<Complex64> {
        let n = self.cell_size();
        let mut v = DMatrix::zeros(n, n);
        for hop in &self.inter {
            if hop.backward {
                v[(hop.to, hop.from)] += hop.value.conj();
            } else {
                v[(hop.from, hop.to)] += hop.value;
            }
        }
        v
    }
}

/// 连接到散射区的电极
pub struct FinalizedLead<P> {
    pub lead: InfiniteSystem<P>,
    /// 界面格点在散射区中的编号，顺序与电极原胞格点一致
    pub interface: Vec<usize>,
    /// 界面所在的原胞编号，电极从 `interface_cell + 1` 开始
    pub interface_cell: i64,
}

/// 定型后的散射区
pub struct FinalizedSystem<P> {
    sites: Vec<Site>,
    onsites: Vec<Value<P>>,
    hoppings: Vec<IndexedHopping>,
    leads: Vec<FinalizedLead<P>>,
}

impl<P> FinalizedSystem<P> {
    pub(crate) fn from_builder(builder: &Builder<P>) -> Result<Self> {
        if builder.symmetry().is_some() {
            return Err(TransportError::InvalidSymmetry(
                "only systems without symmetry can be finalized with leads".to_string(),
            ));
        }

        let sites: Vec<Site> = builder.sites().copied().collect();
        let onsites: Vec<Value<P>> = builder.onsites().map(|(_, v)| v.clone()).collect();
        let index: BTreeMap<Site, usize> =
            sites.iter().enumerate().map(|(i, s)| (*s, i)).collect();

        let hoppings = builder
            .hoppings()
            .map(|(&(a, b), value)| IndexedHopping {
                from: index[&a],
                to: index[&b],
                value: *value,
            })
            .collect();

        let mut leads = Vec::with_capacity(builder.leads().len());
        for (lead_nr, lead_builder) in builder.leads().iter().enumerate() {
            let lead = InfiniteSystem::from_builder(lead_builder)?;
            let (interface_cell, interface) = find_interface(lead_nr, &lead, &sites, &index)?;
            leads.push(FinalizedLead {
                lead,
                interface,
                interface_cell,
            });
        }

        Ok(Self {
            sites,
            onsites,
            hoppings,
            leads,
        })
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn hopping_count(&self) -> usize {
        self.hoppings.len()
    }

    /// 跃迁的编号对
    pub fn hopping_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.hoppings.iter().map(|h| (h.from, h.to))
    }

    pub fn leads(&self) -> &[FinalizedLead<P>] {
        &self.leads
    }

    /// 邻接表
    pub fn neighbors(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.sites.len()];
        for (i, j) in self.hopping_pairs() {
            adjacency[i].push(j);
            adjacency[j].push(i);
        }
        adjacency
    }

    /// 各格点在位能
    pub fn onsite_energies(&self, params: &P) -> Vec<Complex64> {
        self.sites
            .iter()
            .zip(&self.onsites)
            .map(|(site, value)| value.eval(site, params))
            .collect()
    }

    /// 非对角矩阵元 `(i, j, H[i, j])`，每条跃迁一个
    pub fn hopping_elements(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        self.hoppings.iter().map(|h| (h.from, h.to, h.value))
    }

    /// 散射区稠密哈密顿量
    pub fn hamiltonian(&self, params: &P) -> DMatrix<Complex64> {
        let n = self.site_count();
        let mut h = DMatrix::zeros(n, n);
        for (i, e) in self.onsite_energies(params).into_iter().enumerate() {
            h[(i, i)] += e;
        }
        for (i, j, v) in self.hopping_elements() {
            h[(i, j)] += v;
            h[(j, i)] += v.conj();
        }
        h
    }
}

/// 查找电极与散射区的界面：沿电极方向最外侧、仍含有散射区格点的原胞
fn find_interface<P>(
    lead_nr: usize,
    lead: &InfiniteSystem<P>,
    sites: &[Site],
    index: &BTreeMap<Site, usize>,
) -> Result<(i64, Vec<usize>)> {
    let symmetry = lead.symmetry();

    let cell = sites
        .iter()
        .map(|s| symmetry.which(s))
        .max()
        .ok_or_else(|| TransportError::StructuralMismatch {
            lead: lead_nr,
            reason: "scattering region is empty".to_string(),
        })?;

    if lead.cell_size() == 0 {
        return Err(TransportError::StructuralMismatch {
            lead: lead_nr,
            reason: "lead unit cell is empty".to_string(),
        });
    }

    let interface = lead
        .cell_sites()
        .iter()
        .map(|s| {
            let site = symmetry.translate(cell, s);
            index
                .get(&site)
                .copied()
                .ok_or_else(|| TransportError::StructuralMismatch {
                    lead: lead_nr,
                    reason: format!("interface {} missing from the scattering region", site),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((cell, interface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::SquareLattice;

    fn rectangle(lat: &SquareLattice, length: i64, width: i64) -> Builder<()> {
        let mut sys = Builder::new();
        sys.set_sites(
            (0..length).flat_map(|x| (0..width).map(move |y| lat.site(x, y))),
            4.0,
        );
        for kind in lat.nearest() {
            let hops = sys.possible_hoppings(kind);
            sys.set_hoppings(hops, -1.0).unwrap();
        }
        sys
    }

    fn lead(lat: &SquareLattice, width: i64) -> Builder<()> {
        let sym = TranslationalSymmetry::from_vector(lat, [-1.0, 0.0]).unwrap();
        let mut lead = Builder::with_symmetry(sym);
        lead.set_sites((0..width).map(|j| lat.site(0, j)), 4.0);
        for kind in lat.nearest() {
            let hops = lead.possible_hoppings(kind);
            lead.set_hoppings(hops, -1.0).unwrap();
        }
        lead
    }

    #[test]
    fn test_hamiltonian_is_hermitian() {
        let lat = SquareLattice::new(1.0);
        let sys = rectangle(&lat, 3, 2).finalized().unwrap();
        let h = sys.hamiltonian(&());
        assert_eq!(h.nrows(), 6);
        assert_eq!(sys.hopping_count(), 7);
        assert!((&h - h.adjoint()).norm() < 1e-14);
        assert_eq!(h[(0, 0)], Complex64::new(4.0, 0.0));
    }

    #[test]
    fn test_lead_matrices() {
        let lat = SquareLattice::new(1.0);
        let mut sys = rectangle(&lat, 4, 3);
        let lead0 = lead(&lat, 3);
        let lead1 = lead0.reversed().unwrap();
        sys.attach_lead(lead0).unwrap();
        sys.attach_lead(lead1).unwrap();
        let fsys = sys.finalized().unwrap();

        let l0 = &fsys.leads()[0];
        let h0 = l0.lead.cell_hamiltonian(&());
        let v = l0.lead.inter_cell_hopping();
        assert_eq!(h0[(0, 1)], Complex64::new(-1.0, 0.0));
        assert_eq!(h0[(0, 2)], Complex64::new(0.0, 0.0));
        for i in 0..3 {
            assert_eq!(v[(i, i)], Complex64::new(-1.0, 0.0));
        }

        assert_eq!(l0.interface_cell, 0);
        let left: Vec<Site> = l0.interface.iter().map(|&i| fsys.sites()[i]).collect();
        assert_eq!(left, vec![lat.site(0, 0), lat.site(0, 1), lat.site(0, 2)]);

        let l1 = &fsys.leads()[1];
        assert_eq!(l1.interface_cell, 3);
        let right: Vec<Site> = l1.interface.iter().map(|&i| fsys.sites()[i]).collect();
        assert_eq!(right, vec![lat.site(3, 0), lat.site(3, 1), lat.site(3, 2)]);
    }

    #[test]
    fn test_structural_mismatch() {
        let lat = SquareLattice::new(1.0);
        let mut sys = rectangle(&lat, 4, 3);
        sys.attach_lead(lead(&lat, 5)).unwrap();
        assert!(matches!(
            sys.finalized(),
            Err(TransportError::StructuralMismatch { lead: 0, .. })
        ));
    }

    #[test]
    fn test_long_range_lead_hopping_rejected() {
        let lat = SquareLattice::new(1.0);
        let mut sys = rectangle(&lat, 4, 1);
        let mut bad = lead(&lat, 1);
        bad.set_hopping((lat.site(2, 0), lat.site(0, 0)), -0.5).unwrap();
        sys.attach_lead(bad).unwrap();
        assert!(matches!(
            sys.finalized(),
            Err(TransportError::InvalidSymmetry(_))
        ));
    }
}
