// float32/round.rs
//
// Round-and-pack: the heart of the library. Every arithmetic entry
// point funnels its unrounded result through here before returning.

use crate::bits::{clz32, rshr32};
use crate::context::{Context, Exceptions, RoundingMode, Tininess};

use super::{is_nan_bits, is_snan_bits, pack, Float32, QUIET_BIT};

const LOW_BITS: i16 = 7;
const LOW_MASK: u32 = 0x7f;
const HALF_ULP: u32 = 0x40;
const EXP_NEAR_MAX: i16 = 0xfd;
const EXP_ALL_ONES: i16 = 0xff;

fn round_increment(ctx: &Context, sign: bool) -> u32 {
    match ctx.round() {
        RoundingMode::NearestEven => HALF_ULP,
        RoundingMode::TowardZero => 0,
        RoundingMode::TowardPositive => {
            if sign {
                0
            } else {
                LOW_MASK
            }
        }
        RoundingMode::TowardNegative => {
            if sign {
                LOW_MASK
            } else {
                0
            }
        }
    }
}

/// Rounds a 72-bit-conceptual significand (carried in a `u32` whose low
/// 7 bits are the guard/round/sticky region) to the target precision
/// and packs it with `sign`/`exp`.
pub(crate) fn round_and_pack32(ctx: &mut Context, sign: bool, mut exp: i16, mut sig: u32) -> Float32 {
    let increment = round_increment(ctx, sign);
    let mut round_bits = sig & LOW_MASK;
    if round_bits != 0 {
        ctx.note_rounding();
    }

    if exp >= EXP_NEAR_MAX {
        let overflows_at_max = exp == EXP_NEAR_MAX && (sig as i64 + increment as i64) > i32::MAX as i64;
        if exp > EXP_NEAR_MAX || overflows_at_max {
            ctx.raise(Exceptions::OVERFLOW | Exceptions::INEXACT);
            let inf = pack(sign, EXP_ALL_ONES, 0);
            return Float32 {
                bits: if increment == 0 {
                    inf.bits
                } else {
                    inf.bits - 1
                },
            };
        }
    }

    if exp < 0 {
        let implicit_bit_top = 1u32 << 31;
        let is_tiny = ctx.tininess() == Tininess::BeforeRounding
            || exp < -1
            || sig.wrapping_add(increment) < implicit_bit_top;
        sig = rshr32(sig, -exp);
        exp = 0;
        round_bits = sig & LOW_MASK;
        if is_tiny && round_bits != 0 {
            ctx.raise(Exceptions::UNDERFLOW);
        }
    }

    if round_bits != 0 {
        ctx.raise(Exceptions::INEXACT);
    }

    sig = sig.wrapping_add(increment) >> LOW_BITS;

    if ctx.round() == RoundingMode::NearestEven && (round_bits ^ HALF_ULP) == 0 {
        sig &= !1u32;
    }

    pack(sign, if sig == 0 { 0 } else { exp }, sig)
}

/// Normalizes `sig` so its leading 1 sits at bit 30 (width-2), then
/// rounds and packs.
pub(crate) fn normalize_round_and_pack32(ctx: &mut Context, sign: bool, mut exp: i16, mut sig: u32) -> Float32 {
    let shift = clz32(sig) as i16 - 1;
    sig <<= shift;
    exp -= shift;
    round_and_pack32(ctx, sign, exp, sig)
}

/// Returns `{sig, exp}` for a subnormal significand normalized so its
/// leading 1 sits just above the implicit-bit position.
pub(crate) fn normalize_subnormal32(sig: u32) -> (u32, i16) {
    const LEADING_GAP: i16 = 8;
    let shift = clz32(sig) as i16 - LEADING_GAP;
    (sig << shift, 1 - shift)
}

/// Sets the quiet bit on both inputs, raises Invalid if either was
/// signaling, and returns the NaN to propagate: prefer the
/// non-signaling NaN, then the first NaN, with a tiebreak toward `b`
/// when both are signaling and only `a`'s signaling-ness is masked by
/// quieting `a` first.
pub(crate) fn propagate_nan(ctx: &mut Context, a: Float32, b: Float32) -> Float32 {
    let a_is_nan = is_nan_bits(a);
    let b_is_nan = is_nan_bits(b);
    let a_snan = is_snan_bits(a);
    let b_snan = is_snan_bits(b);

    if a_snan || b_snan {
        ctx.raise(Exceptions::INVALID);
    }

    let a_q = Float32 {
        bits: a.bits | QUIET_BIT,
    };
    let b_q = Float32 {
        bits: b.bits | QUIET_BIT,
    };

    if !a_is_nan {
        return b_q;
    }
    if !b_is_nan {
        return a_q;
    }
    if a_snan && !b_snan {
        return b_q;
    }
    a_q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::float32::fract;

    #[test]
    fn propagate_nan_prefers_non_signaling() {
        let mut ctx = Context::new(RoundingMode::default(), Tininess::default());
        let snan = Float32::from(0x7fa0_0000u32);
        let qnan = Float32::from(0x7fc0_0000u32);
        let result = propagate_nan(&mut ctx, snan, qnan);
        assert_eq!(result.bits, qnan.bits);
        assert!(ctx.exceptions()[0].invalid);
    }

    #[test]
    fn propagate_nan_non_nan_a_returns_b() {
        let mut ctx = Context::new(RoundingMode::default(), Tininess::default());
        let non_nan = Float32::from(0x3f80_0000u32);
        let qnan = Float32::from(0x7fc0_0000u32);
        let result = propagate_nan(&mut ctx, non_nan, qnan);
        assert_eq!(result.bits, qnan.bits);
    }

    #[test]
    fn round_and_pack_nearest_even_ties_to_even() {
        let mut ctx = Context::new(RoundingMode::NearestEven, Tininess::default());
        // exactly half a ulp on top of an even keeper bit rounds down
        let sig = (2u32 << LOW_BITS) | HALF_ULP;
        let f = round_and_pack32(&mut ctx, false, 10, sig);
        assert_eq!(fract(f) & 1, 0);
    }

    #[test]
    fn round_and_pack_overflow_to_infinity() {
        let mut ctx = Context::new(RoundingMode::NearestEven, Tininess::default());
        let f = round_and_pack32(&mut ctx, false, 0xff, 0);
        assert_eq!(f.bits, 0x7f80_0000);
        assert!(ctx.exceptions().last().unwrap().overflow);
    }

    #[test]
    fn normalize_subnormal_shifts_to_implicit_position() {
        let (sig, exp) = normalize_subnormal32(1);
        assert_eq!(sig & 0x0080_0000, 0x0080_0000);
        assert_eq!(exp, 1 - (clz32(1) as i16 - 8));
    }

    #[test]
    fn after_rounding_tininess_uses_bit_31_threshold() {
        // exp == -1 is the one case not already forced by `exp < -1` or
        // `BeforeRounding`; `sig + increment` lands in [0x4000_0000,
        // 0x8000_0000), which must still count as tiny (bit 31 is the
        // threshold, not bit 30).
        let mut ctx = Context::new(RoundingMode::NearestEven, Tininess::AfterRounding);
        let f = round_and_pack32(&mut ctx, false, -1, 0x5000_0001);
        assert!(ctx.exceptions().last().unwrap().underflow);
        assert!(f.bits != 0);
    }
}
