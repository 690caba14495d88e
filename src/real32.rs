/*!
`Real32`: a `Float32` value paired with a conservative, monotonically
non-decreasing upper bound on its absolute error against the true
mathematical result of whatever expression produced it.

Every wrapped operation clones the caller's [`Context`] into a fresh,
log-free `eps_ctx` (grounded in the source's `eps_ctx`/`context_copy`
pair) before doing its error arithmetic, so the error computation never
pollutes the caller-visible exception/operation trace. All error
arithmetic goes through the soft-float primitives, never the host FPU.
*/

use crate::context::Context;
use crate::float32::{self, Float32};

/// `ε`, the unit in the last place at 1.0 for `Float32`.
pub const EPSILON: Float32 = float32::EPSILON;
/// `0.01`, the divisor-error threshold above which `div` uses the
/// inaccurate-divisor error formula.
const INACCURATE_DIVISOR_THRESHOLD: Float32 = Float32 { bits: 0x3c23_d70a };
const TEN: Float32 = Float32 { bits: 0x4120_0000 };

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Real32 {
    pub value: Float32,
    pub eps: Float32,
}

impl Real32 {
    /// Wraps a constant: exact, `eps = +0`.
    pub fn constant(value: Float32) -> Self {
        Real32 {
            value,
            eps: float32::ZERO,
        }
    }
}

/// `ε·|v|`, the rounding-error term every wrapped op adds on.
fn ulp_term(eps_ctx: &mut Context, v: Float32) -> Float32 {
    float32::mul(eps_ctx, EPSILON, float32::kernel::abs(v))
}

pub fn add(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    let value = float32::add(ctx, a.value, b.value);
    let mut eps_ctx = ctx.fork();
    let base = float32::add(&mut eps_ctx, a.eps, b.eps);
    let eps = float32::add(&mut eps_ctx, base, ulp_term(&mut eps_ctx, value));
    Real32 { value, eps }
}

pub fn sub(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    let value = float32::sub(ctx, a.value, b.value);
    let mut eps_ctx = ctx.fork();
    let base = float32::add(&mut eps_ctx, a.eps, b.eps);
    let eps = float32::add(&mut eps_ctx, base, ulp_term(&mut eps_ctx, value));
    Real32 { value, eps }
}

pub fn mul(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    let value = float32::mul(ctx, a.value, b.value);
    let mut eps_ctx = ctx.fork();
    let abs_a = float32::kernel::abs(a.value);
    let abs_b = float32::kernel::abs(b.value);

    let term_a = float32::mul(&mut eps_ctx, a.eps, abs_b);
    let term_b = float32::mul(&mut eps_ctx, b.eps, abs_a);
    let term_ab = float32::mul(&mut eps_ctx, a.eps, b.eps);

    let sum = float32::add(&mut eps_ctx, term_a, term_b);
    let sum = float32::add(&mut eps_ctx, sum, term_ab);
    let eps = float32::add(&mut eps_ctx, sum, ulp_term(&mut eps_ctx, value));
    Real32 { value, eps }
}

pub fn div(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    let value = float32::div(ctx, a.value, b.value);
    let mut eps_ctx = ctx.fork();
    let abs_b_value = float32::kernel::abs(b.value);
    let abs_value = float32::kernel::abs(value);

    // (a.eps + |r.value| * b.eps) / |b.value|
    let scaled_b_eps = float32::mul(&mut eps_ctx, abs_value, b.eps);
    let numerator = float32::add(&mut eps_ctx, a.eps, scaled_b_eps);
    let base = float32::div(&mut eps_ctx, numerator, abs_b_value);

    let divisor_threshold = float32::mul(&mut eps_ctx, INACCURATE_DIVISOR_THRESHOLD, abs_b_value);
    let pre_add = if float32::lt(&mut eps_ctx, divisor_threshold, b.eps) {
        // multiply by 1 + (1 + r) * r, r = b.eps / |b.value|
        let r = float32::div(&mut eps_ctx, b.eps, abs_b_value);
        let one_plus_r = float32::add(&mut eps_ctx, float32::ONE, r);
        let r_term = float32::mul(&mut eps_ctx, one_plus_r, r);
        let factor = float32::add(&mut eps_ctx, float32::ONE, r_term);
        float32::mul(&mut eps_ctx, base, factor)
    } else {
        base
    };

    let eps = float32::add(&mut eps_ctx, pre_add, ulp_term(&mut eps_ctx, value));
    Real32 { value, eps }
}

pub fn sqrt(ctx: &mut Context, x: Real32) -> Real32 {
    let value = float32::kernel::sqrt(ctx, x.value);
    let mut eps_ctx = ctx.fork();

    let neg_x_eps = float32::kernel::copysign(x.eps, float32::NEG_ONE);
    if float32::lt(&mut eps_ctx, x.value, neg_x_eps) {
        return Real32 {
            value: float32::NAN,
            eps: float32::NAN,
        };
    }
    if float32::lt(&mut eps_ctx, x.value, float32::ZERO) {
        // -x.eps <= x < 0: eps = sqrt(x.eps)
        let eps = float32::kernel::sqrt(&mut eps_ctx, x.eps);
        return Real32 { value, eps };
    }

    let ten_xe = float32::mul(&mut eps_ctx, TEN, x.eps);
    let pre_scale = if float32::lt(&mut eps_ctx, ten_xe, x.value) {
        let half_xe = float32::mul(&mut eps_ctx, float32::HALF, x.eps);
        float32::div(&mut eps_ctx, half_xe, value)
    } else if float32::lt(&mut eps_ctx, x.eps, x.value) {
        let lowered = float32::sub(&mut eps_ctx, x.value, x.eps);
        let sqrt_lowered = float32::kernel::sqrt(&mut eps_ctx, lowered);
        float32::sub(&mut eps_ctx, value, sqrt_lowered)
    } else {
        let raised = float32::add(&mut eps_ctx, x.value, x.eps);
        let sqrt_raised = float32::kernel::sqrt(&mut eps_ctx, raised);
        let diff = float32::sub(&mut eps_ctx, sqrt_raised, value);
        float32::kernel::max(&mut eps_ctx, value, diff)
    };

    let eps = float32::add(&mut eps_ctx, pre_scale, ulp_term(&mut eps_ctx, value));
    Real32 { value, eps }
}

/// `eps = 0` helpers for the classification/selection kernels: abs and
/// copysign never widen the bound, min/max inherit whichever operand
/// they pick.
pub fn abs(x: Real32) -> Real32 {
    Real32 {
        value: float32::kernel::abs(x.value),
        eps: x.eps,
    }
}

pub fn copysign(x: Real32, y: Real32) -> Real32 {
    Real32 {
        value: float32::kernel::copysign(x.value, y.value),
        eps: x.eps,
    }
}

pub fn min(ctx: &mut Context, x: Real32, y: Real32) -> Real32 {
    let value = float32::kernel::min(ctx, x.value, y.value);
    let eps = if value.bits == x.value.bits { x.eps } else { y.eps };
    Real32 { value, eps }
}

pub fn max(ctx: &mut Context, x: Real32, y: Real32) -> Real32 {
    let value = float32::kernel::max(ctx, x.value, y.value);
    let eps = if value.bits == x.value.bits { x.eps } else { y.eps };
    Real32 { value, eps }
}

pub fn floor(ctx: &mut Context, x: Real32) -> Real32 {
    Real32 {
        value: float32::kernel::floor(ctx, x.value),
        eps: float32::ZERO,
    }
}

pub fn ceil(ctx: &mut Context, x: Real32) -> Real32 {
    Real32 {
        value: float32::kernel::ceil(ctx, x.value),
        eps: float32::ZERO,
    }
}

pub fn trunc(ctx: &mut Context, x: Real32) -> Real32 {
    Real32 {
        value: float32::kernel::trunc(ctx, x.value),
        eps: float32::ZERO,
    }
}

/// Relationals produce `1.0`/`0.0` with no error.
fn bool_result(b: bool) -> Real32 {
    Real32 {
        value: if b { float32::ONE } else { float32::ZERO },
        eps: float32::ZERO,
    }
}

pub fn eq(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    bool_result(float32::eq(ctx, a.value, b.value))
}

pub fn lte(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    bool_result(float32::lte(ctx, a.value, b.value))
}

pub fn lt(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    bool_result(float32::lt(ctx, a.value, b.value))
}

pub fn ne(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    bool_result(float32::ne(ctx, a.value, b.value))
}

pub fn gte(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    bool_result(float32::gte(ctx, a.value, b.value))
}

pub fn gt(ctx: &mut Context, a: Real32, b: Real32) -> Real32 {
    bool_result(float32::gt(ctx, a.value, b.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, RoundingMode, Tininess};

    fn ctx() -> Context {
        Context::new(RoundingMode::NearestEven, Tininess::BeforeRounding)
    }

    fn bits(x: u32) -> Float32 {
        Float32::from(x)
    }

    #[test]
    fn constant_has_zero_error() {
        let c = Real32::constant(float32::ONE);
        assert_eq!(c.eps.bits, float32::ZERO.bits);
    }

    #[test]
    fn error_monotone_non_decreasing_under_add() {
        let mut c = ctx();
        let a = Real32 {
            value: float32::ONE,
            eps: bits(0x3c23_d70a), // 0.01
        };
        let b = Real32 {
            value: float32::ONE,
            eps: bits(0x3ca3_d70a), // 0.02
        };
        let r = add(&mut c, a, b);
        let mut c2 = ctx();
        assert!(!float32::lt(&mut c2, r.eps, a.eps));
        assert!(!float32::lt(&mut c2, r.eps, b.eps));
    }

    #[test]
    fn relationals_carry_no_error() {
        let mut c = ctx();
        let a = Real32::constant(float32::ONE);
        let b = Real32::constant(float32::ZERO);
        let r = gt(&mut c, a, b);
        assert_eq!(r.eps.bits, float32::ZERO.bits);
        assert_eq!(r.value.bits, float32::ONE.bits);
    }

    #[test]
    fn sqrt_of_negative_below_neg_eps_is_nan() {
        let mut c = ctx();
        let x = Real32 {
            value: bits(0xc0a0_0000), // -5.0
            eps: float32::ONE,
        };
        let r = sqrt(&mut c, x);
        assert!(float32::is_nan_bits(r.value));
    }
}
