//! # 在位能
//!
//! 在位能可以是常数，也可以是在求解时才绑定参数的函数；跃迁值为复常数。
//! 参数类型 `P` 由具体模型决定（例如量子阱的 `WellParams`）。
//!
//! ## 依赖关系
//! - 被 `system/builder.rs`, `system/finalized.rs` 使用
//! - 使用 `num-complex`

use crate::system::Site;

use num_complex::Complex64;
use std::fmt;
use std::sync::Arc;

type OnsiteFn<P> = dyn Fn(&Site, &P) -> Complex64 + Send + Sync;

/// 在位能
pub enum Value<P> {
    Const(Complex64),
    Func(Arc<OnsiteFn<P>>),
}

impl<P> Value<P> {
    /// 由闭包创建延迟绑定的在位能
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Site, &P) -> Complex64 + Send + Sync + 'static,
    {
        Value::Func(Arc::new(f))
    }

    /// 在给定参数下求值
    pub fn eval(&self, site: &Site, params: &P) -> Complex64 {
        match self {
            Value::Const(c) => *c,
            Value::Func(f) => f(site, params),
        }
    }
}

impl<P> Clone for Value<P> {
    fn clone(&self) -> Self {
        match self {
            Value::Const(c) => Value::Const(*c),
            Value::Func(f) => Value::Func(Arc::clone(f)),
        }
    }
}

impl<P> From<f64> for Value<P> {
    fn from(v: f64) -> Self {
        Value::Const(Complex64::new(v, 0.0))
    }
}

impl<P> From<Complex64> for Value<P> {
    fn from(v: Complex64) -> Self {
        Value::Const(v)
    }
}

impl<P> fmt::Debug for Value<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(c) => write!(f, "Const({})", c),
            Value::Func(_) => write!(f, "Func(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::SquareLattice;

    #[test]
    fn test_value_eval() {
        let site = SquareLattice::new(1.0).site(2, 0);
        let constant: Value<f64> = 4.0.into();
        assert_eq!(constant.eval(&site, &1.0), Complex64::new(4.0, 0.0));

        let func: Value<f64> = Value::func(|s, p| Complex64::new(s.pos()[0] * p, 0.0));
        assert_eq!(func.eval(&site, &3.0), Complex64::new(6.0, 0.0));
    }
}
