//! # 正方晶格
//!
//! 格点由整数标签 `(x, y)` 标识，实空间位置为 `a·(x, y)`。
//!
//! ## 依赖关系
//! - 被 `system/builder.rs`, `system/symmetry.rs`, `models/` 使用
//! - 无外部模块依赖

use std::cmp::Ordering;
use std::fmt;

/// 格点
#[derive(Debug, Clone, Copy)]
pub struct Site {
    /// 整数标签 (x, y)
    pub tag: [i64; 2],
    /// 晶格常数
    spacing: f64,
}

impl Site {
    /// 实空间位置
    pub fn pos(&self) -> [f64; 2] {
        [
            self.spacing * self.tag[0] as f64,
            self.spacing * self.tag[1] as f64,
        ]
    }

    /// 按整数标签平移
    pub fn shifted(&self, delta: [i64; 2]) -> Site {
        Site {
            tag: [self.tag[0] + delta[0], self.tag[1] + delta[1]],
            spacing: self.spacing,
        }
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Site {}

impl PartialOrd for Site {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Site {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag
            .cmp(&other.tag)
            .then_with(|| self.spacing.total_cmp(&other.spacing))
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site({}, {})", self.tag[0], self.tag[1])
    }
}

/// 跃迁类型：连接 `site + delta` 与 `site`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoppingKind {
    pub delta: [i64; 2],
}

impl HoppingKind {
    pub fn new(delta: [i64; 2]) -> Self {
        Self { delta }
    }
}

/// 正方晶格
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareLattice {
    /// 晶格常数
    a: f64,
}

impl SquareLattice {
    pub fn new(a: f64) -> Self {
        Self { a }
    }

    pub fn lattice_constant(&self) -> f64 {
        self.a
    }

    /// 由整数标签创建格点
    pub fn site(&self, x: i64, y: i64) -> Site {
        Site {
            tag: [x, y],
            spacing: self.a,
        }
    }

    /// 最近邻跃迁类型
    pub fn nearest(&self) -> [HoppingKind; 2] {
        [HoppingKind::new([1, 0]), HoppingKind::new([0, 1])]
    }

    /// 将实空间向量转换为整数晶格向量，非晶格向量返回 None
    pub fn vector_to_tag(&self, vector: [f64; 2]) -> Option<[i64; 2]> {
        let mut tag = [0i64; 2];
        for (t, v) in tag.iter_mut().zip(vector.iter()) {
            let n = v / self.a;
            if !n.is_finite() || (n - n.round()).abs() > 1e-9 {
                return None;
            }
            *t = n.round() as i64;
        }
        Some(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_position() {
        let lat = SquareLattice::new(0.5);
        let site = lat.site(3, -2);
        assert_eq!(site.pos(), [1.5, -1.0]);
        assert_eq!(site.shifted([1, 1]).tag, [4, -1]);
    }

    #[test]
    fn test_site_ordering() {
        let lat = SquareLattice::new(1.0);
        assert!(lat.site(0, 5) < lat.site(1, 0));
        assert_eq!(lat.site(2, 3), lat.site(2, 3));
        assert_ne!(lat.site(2, 3), SquareLattice::new(2.0).site(2, 3));
    }

    #[test]
    fn test_vector_to_tag() {
        let lat = SquareLattice::new(2.0);
        assert_eq!(lat.vector_to_tag([-2.0, 0.0]), Some([-1, 0]));
        assert_eq!(lat.vector_to_tag([4.0, 6.0]), Some([2, 3]));
        assert_eq!(lat.vector_to_tag([1.0, 0.0]), None);
    }
}
