// float32/cmp.rs
//
// Total-order-free IEEE 754 comparisons: NaN forces both `eq` and
// `lt`/`lte` to false, so `ne`, `gte`, `gt` can be defined as plain
// negations of `eq`/`lt`/`lte` without a separate NaN check.

use crate::context::{Context, Exceptions};

use super::{is_nan_bits, is_snan_bits, sign_bit, Float32};

/// `feq(ctx, a, b)`.
pub fn eq(ctx: &mut Context, a: Float32, b: Float32) -> bool {
    if is_nan_bits(a) || is_nan_bits(b) {
        if is_snan_bits(a) || is_snan_bits(b) {
            ctx.raise(Exceptions::INVALID);
        }
        return false;
    }
    a.bits == b.bits || (a.bits | b.bits) << 1 == 0
}

/// `flte(ctx, a, b)`.
pub fn lte(ctx: &mut Context, a: Float32, b: Float32) -> bool {
    if is_nan_bits(a) || is_nan_bits(b) {
        ctx.raise(Exceptions::INVALID);
        return false;
    }
    let a_sign = sign_bit(a);
    let b_sign = sign_bit(b);
    if a_sign != b_sign {
        return a_sign || ((a.bits | b.bits) << 1 == 0);
    }
    a.bits == b.bits || (a_sign ^ (a.bits < b.bits))
}

/// `flt(ctx, a, b)`.
pub fn lt(ctx: &mut Context, a: Float32, b: Float32) -> bool {
    if is_nan_bits(a) || is_nan_bits(b) {
        ctx.raise(Exceptions::INVALID);
        return false;
    }
    let a_sign = sign_bit(a);
    let b_sign = sign_bit(b);
    if a_sign != b_sign {
        return a_sign && (a.bits | b.bits) << 1 != 0;
    }
    a.bits != b.bits && (a_sign ^ (a.bits < b.bits))
}

/// `fne(ctx, a, b)`.
pub fn ne(ctx: &mut Context, a: Float32, b: Float32) -> bool {
    !eq(ctx, a, b)
}

/// `fgte(ctx, a, b)`.
pub fn gte(ctx: &mut Context, a: Float32, b: Float32) -> bool {
    !lt(ctx, a, b)
}

/// `fgt(ctx, a, b)`.
pub fn gt(ctx: &mut Context, a: Float32, b: Float32) -> bool {
    !lte(ctx, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, RoundingMode, Tininess};

    fn ctx() -> Context {
        Context::new(RoundingMode::NearestEven, Tininess::BeforeRounding)
    }

    #[test]
    fn positive_and_negative_zero_compare_equal() {
        let mut c = ctx();
        assert!(eq(&mut c, Float32::from(0u32), Float32::from(0x8000_0000u32)));
    }

    #[test]
    fn nan_makes_eq_false_and_lt_raises_invalid() {
        let mut c = ctx();
        let nan = Float32::from(0x7fc0_0000u32);
        let one = Float32::from(0x3f80_0000u32);
        assert!(!eq(&mut c, nan, one));
        assert!(!lt(&mut c, nan, one));
        assert!(c.exceptions().last().unwrap().invalid);
    }

    #[test]
    fn exactly_one_of_lt_eq_gt_holds() {
        let mut c = ctx();
        let a = Float32::from(0x3f80_0000u32); // 1.0
        let b = Float32::from(0x4000_0000u32); // 2.0
        let lt_ab = lt(&mut c, a, b);
        let eq_ab = eq(&mut c, a, b);
        let lt_ba = lt(&mut c, b, a);
        assert_eq!([lt_ab, eq_ab, lt_ba].iter().filter(|&&x| x).count(), 1);
    }

    #[test]
    fn negatives_order_below_positives() {
        let mut c = ctx();
        let neg_one = Float32::from(0xbf80_0000u32);
        let one = Float32::from(0x3f80_0000u32);
        assert!(lt(&mut c, neg_one, one));
        assert!(!lt(&mut c, one, neg_one));
    }
}
