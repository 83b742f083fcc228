//! # 散射区分层
//!
//! 按到电极 0 界面的图距离（广度优先）将散射区切成若干层，
//! 得到块三对角形式的哈密顿量，供递归格林函数使用。
//! 其余电极的界面所在层及之后的所有层合并为最后一层。
//!
//! ## 依赖关系
//! - 被 `transport/solver.rs` 调用
//! - 使用 `system/finalized.rs` 的 FinalizedSystem

use crate::error::{Result, TransportError};
use crate::system::FinalizedSystem;

use std::collections::VecDeque;

/// 分层结果
#[derive(Debug, Clone)]
pub struct Slicing {
    /// 每层包含的格点编号
    pub layers: Vec<Vec<usize>>,
    /// 格点 → (层号, 层内位置)
    pub position: Vec<(usize, usize)>,
}

impl Slicing {
    /// 对定型体系分层
    pub fn new<P>(system: &FinalizedSystem<P>) -> Result<Self> {
        let leads = system.leads();
        let first = leads.first().ok_or(TransportError::NoLeads)?;

        let n_sites = system.site_count();
        let adjacency = system.neighbors();

        // 广度优先距离，电极 0 的界面为第 0 层
        let mut distance: Vec<Option<usize>> = vec![None; n_sites];
        let mut queue = VecDeque::new();
        for &i in &first.interface {
            if distance[i].is_none() {
                distance[i] = Some(0);
                queue.push_back(i);
            }
        }
        while let Some(i) = queue.pop_front() {
            let next = distance[i].map(|d| d + 1);
            for &j in &adjacency[i] {
                if distance[j].is_none() {
                    distance[j] = next;
                    queue.push_back(j);
                }
            }
        }

        let deepest = distance.iter().flatten().copied().max().unwrap_or(0);

        // 其他电极界面的最小距离；不可达的界面格点归入最后一层
        let merge_from = leads
            .iter()
            .skip(1)
            .flat_map(|lead| lead.interface.iter())
            .map(|&i| distance[i].unwrap_or(deepest))
            .min()
            .unwrap_or(deepest);
        let last = merge_from.min(deepest);

        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); last + 1];
        // 电极 0 界面的顺序保持不变
        if last > 0 {
            layers[0] = first.interface.clone();
        }
        for (i, d) in distance.iter().enumerate() {
            match d {
                Some(0) if last > 0 => {}
                Some(d) if *d < last => layers[*d].push(i),
                _ => layers[last].push(i),
            }
        }

        let mut position = vec![(0, 0); n_sites];
        for (l, layer) in layers.iter().enumerate() {
            for (k, &i) in layer.iter().enumerate() {
                position[i] = (l, k);
            }
        }

        Ok(Self { layers, position })
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// 最后一层的层号
    pub fn last(&self) -> usize {
        self.layers.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{Builder, SquareLattice, TranslationalSymmetry};

    fn wire(length: i64, width: i64) -> FinalizedSystem<()> {
        let lat = SquareLattice::new(1.0);
        let mut sys = Builder::new();
        sys.set_sites(
            (0..length).flat_map(|x| (0..width).map(move |y| lat.site(x, y))),
            4.0,
        );
        for kind in lat.nearest() {
            let hops = sys.possible_hoppings(kind);
            sys.set_hoppings(hops, -1.0).unwrap();
        }
        let sym = TranslationalSymmetry::new([-1, 0]).unwrap();
        let mut lead = Builder::with_symmetry(sym);
        lead.set_sites((0..width).map(|j| lat.site(0, j)), 4.0);
        for kind in lat.nearest() {
            let hops = lead.possible_hoppings(kind);
            lead.set_hoppings(hops, -1.0).unwrap();
        }
        let reversed = lead.reversed().unwrap();
        sys.attach_lead(lead).unwrap();
        sys.attach_lead(reversed).unwrap();
        sys.finalized().unwrap()
    }

    #[test]
    fn test_wire_slices_by_column() {
        let sys = wire(5, 3);
        let slicing = Slicing::new(&sys).unwrap();
        assert_eq!(slicing.layer_count(), 5);
        for layer in &slicing.layers {
            assert_eq!(layer.len(), 3);
        }
        // 电极 1 的界面全部位于最后一层
        for &i in &sys.leads()[1].interface {
            assert_eq!(slicing.position[i].0, slicing.last());
        }
    }

    #[test]
    fn test_hoppings_connect_adjacent_layers() {
        let sys = wire(6, 4);
        let slicing = Slicing::new(&sys).unwrap();
        for (i, j) in sys.hopping_pairs() {
            let (li, lj) = (slicing.position[i].0, slicing.position[j].0);
            assert!(li.abs_diff(lj) <= 1);
        }
    }

    #[test]
    fn test_single_column_is_one_layer() {
        let sys = wire(1, 3);
        let slicing = Slicing::new(&sys).unwrap();
        assert_eq!(slicing.layer_count(), 1);
        assert_eq!(slicing.layers[0].len(), 3);
    }

    #[test]
    fn test_no_leads() {
        let lat = SquareLattice::new(1.0);
        let mut sys: Builder<()> = Builder::new();
        sys.set_site(lat.site(0, 0), 0.0);
        let fsys = sys.finalized().unwrap();
        assert!(matches!(Slicing::new(&fsys), Err(TransportError::NoLeads)));
    }
}
