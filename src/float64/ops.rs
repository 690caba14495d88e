// float64/ops.rs
//
// 64-bit analogue of float32::ops. Multiply and divide route their
// intermediate products through `crate::uint128`, following the real
// `float64_div` (not the stubbed variant that coexists in the source
// pack) which uses `div128x64` plus an explicit remainder-correction
// loop.

use crate::bits::rshr64;
use crate::context::{Context, Exceptions, Operation, RoundingMode};
use crate::uint128::{div128x64, mul64x64, Uint128};

use super::round::{normalize_round_and_pack64, normalize_subnormal64, propagate_nan, round_and_pack64};
use super::{fract, pack, raw_exp, sign_bit, Float64, NAN};

const EXP_ALL_ONES: i16 = 0x7ff;
const BIAS: i16 = 1023;

pub fn add(ctx: &mut Context, a: Float64, b: Float64) -> Float64 {
    ctx.note_operation(Operation::Add);
    let a_sign = sign_bit(a);
    let b_sign = sign_bit(b);
    if a_sign == b_sign {
        add_sig(ctx, a, b, a_sign)
    } else {
        sub_sig(ctx, a, b, a_sign)
    }
}

pub fn sub(ctx: &mut Context, a: Float64, b: Float64) -> Float64 {
    ctx.note_operation(Operation::Sub);
    let a_sign = sign_bit(a);
    let b_sign = sign_bit(b);
    if a_sign == b_sign {
        sub_sig(ctx, a, b, a_sign)
    } else {
        add_sig(ctx, a, b, a_sign)
    }
}

fn add_sig(ctx: &mut Context, a: Float64, b: Float64, sign: bool) -> Float64 {
    let a_exp = raw_exp(a);
    let b_exp = raw_exp(b);
    let a_sig = fract(a) << 9;
    let b_sig = fract(b) << 9;
    let exp_diff = a_exp - b_exp;

    if exp_diff > 0 {
        if a_exp == EXP_ALL_ONES {
            return if a_sig != 0 { propagate_nan(ctx, a, b) } else { a };
        }
        let b_sig = if b_exp == 0 {
            rshr64(b_sig, exp_diff - 1)
        } else {
            rshr64(b_sig | 0x1000_0000_0000_0000, exp_diff)
        };
        return finish_add(ctx, sign, a_exp, a_sig | 0x1000_0000_0000_0000, b_sig);
    }

    if exp_diff < 0 {
        if b_exp == EXP_ALL_ONES {
            return if b_sig != 0 { propagate_nan(ctx, a, b) } else { b };
        }
        let a_sig = if a_exp == 0 {
            rshr64(a_sig, -exp_diff - 1)
        } else {
            rshr64(a_sig | 0x1000_0000_0000_0000, -exp_diff)
        };
        return finish_add(ctx, sign, b_exp, b_sig | 0x1000_0000_0000_0000, a_sig);
    }

    if a_exp == EXP_ALL_ONES {
        if a_sig != 0 || b_sig != 0 {
            return propagate_nan(ctx, a, b);
        }
        return pack(sign, EXP_ALL_ONES, 0);
    }
    if a_exp == 0 {
        return pack(sign, 0, (a_sig + b_sig) >> 9);
    }
    let sig = 0x2000_0000_0000_0000u64 + a_sig + b_sig;
    round_and_pack64(ctx, sign, a_exp, sig)
}

fn finish_add(ctx: &mut Context, sign: bool, larger_exp: i16, larger_sig: u64, smaller_sig: u64) -> Float64 {
    let mut exp = larger_exp - 1;
    let mut sig = (larger_sig + smaller_sig) << 1;
    if sig & 0x4000_0000_0000_0000 != 0 {
        sig >>= 1;
        exp += 1;
    }
    round_and_pack64(ctx, sign, exp, sig)
}

fn sub_sig(ctx: &mut Context, a: Float64, b: Float64, sign: bool) -> Float64 {
    let a_exp = raw_exp(a);
    let b_exp = raw_exp(b);
    let a_sig = fract(a) << 10;
    let b_sig = fract(b) << 10;
    let exp_diff = a_exp - b_exp;

    if exp_diff == 0 && a_exp == EXP_ALL_ONES {
        if a_sig != 0 || b_sig != 0 {
            return propagate_nan(ctx, a, b);
        }
        ctx.raise(Exceptions::INVALID);
        return NAN;
    }

    if exp_diff > 0 {
        if a_exp == EXP_ALL_ONES {
            return if a_sig != 0 { propagate_nan(ctx, a, b) } else { a };
        }
        let b_sig = if b_exp == 0 {
            rshr64(b_sig, exp_diff - 1)
        } else {
            rshr64(b_sig | 0x2000_0000_0000_0000, exp_diff) | 0x2000_0000_0000_0000
        };
        let a_sig = a_sig | 0x2000_0000_0000_0000;
        return normalize_round_and_pack64(ctx, sign, a_exp, a_sig - b_sig);
    }

    if exp_diff < 0 {
        if b_exp == EXP_ALL_ONES {
            return if b_sig != 0 {
                propagate_nan(ctx, a, b)
            } else {
                Float64 { bits: b.bits ^ 0x8000_0000_0000_0000 }
            };
        }
        let a_sig = if a_exp == 0 {
            rshr64(a_sig, -exp_diff - 1)
        } else {
            rshr64(a_sig | 0x2000_0000_0000_0000, -exp_diff) | 0x2000_0000_0000_0000
        };
        let b_sig = b_sig | 0x2000_0000_0000_0000;
        return normalize_round_and_pack64(ctx, !sign, b_exp, b_sig - a_sig);
    }

    if a_sig == b_sig {
        return pack(ctx.round() == RoundingMode::TowardNegative, 0, 0);
    }
    if a_sig < b_sig {
        normalize_round_and_pack64(ctx, !sign, b_exp, b_sig - a_sig)
    } else {
        normalize_round_and_pack64(ctx, sign, a_exp, a_sig - b_sig)
    }
}

fn unpack_finite(exp: i16, frac: u64) -> (i16, u64) {
    if exp == 0 {
        let (sig, exp) = normalize_subnormal64(frac);
        (exp, sig)
    } else {
        (exp, frac | 0x0010_0000_0000_0000)
    }
}

/// `fmul(ctx, a, b)`. Uses `Uint128::mul64x64` for the full-width
/// product and ORs `z1`'s nonzero-ness into `z0` as a sticky bit before
/// keeping only the top 64 bits.
pub fn mul(ctx: &mut Context, a: Float64, b: Float64) -> Float64 {
    ctx.note_operation(Operation::Mul);
    let sign = sign_bit(a) ^ sign_bit(b);
    let a_exp0 = raw_exp(a);
    let b_exp0 = raw_exp(b);
    let a_frac = fract(a);
    let b_frac = fract(b);

    if a_exp0 == EXP_ALL_ONES || b_exp0 == EXP_ALL_ONES {
        if (a_exp0 == EXP_ALL_ONES && a_frac != 0) || (b_exp0 == EXP_ALL_ONES && b_frac != 0) {
            return propagate_nan(ctx, a, b);
        }
        let a_is_zero = a_exp0 == 0 && a_frac == 0;
        let b_is_zero = b_exp0 == 0 && b_frac == 0;
        if a_is_zero || b_is_zero {
            ctx.raise(Exceptions::INVALID);
            return NAN;
        }
        return pack(sign, EXP_ALL_ONES, 0);
    }

    if (a_exp0 == 0 && a_frac == 0) || (b_exp0 == 0 && b_frac == 0) {
        return pack(sign, 0, 0);
    }

    let (a_exp, a_sig) = unpack_finite(a_exp0, a_frac);
    let (b_exp, b_sig) = unpack_finite(b_exp0, b_frac);

    let mut exp = a_exp + b_exp - BIAS;
    let product: Uint128 = mul64x64(a_sig << 10, b_sig << 11);
    let mut sig = product.hi | ((product.lo != 0) as u64);

    if sig & 0x8000_0000_0000_0000 == 0 {
        sig <<= 1;
        exp -= 1;
    }

    round_and_pack64(ctx, sign, exp, sig)
}

/// `fdiv(ctx, a, b)`. Follows `float64.c`'s real implementation:
/// `div128x64` for the quotient estimate, then an exact-remainder
/// correction loop (not the stub that returns `FLOAT64_NAN`
/// unconditionally found elsewhere in the source pack).
pub fn div(ctx: &mut Context, a: Float64, b: Float64) -> Float64 {
    ctx.note_operation(Operation::Div);
    let sign = sign_bit(a) ^ sign_bit(b);
    let a_exp0 = raw_exp(a);
    let b_exp0 = raw_exp(b);
    let a_frac = fract(a);
    let b_frac = fract(b);

    if a_exp0 == EXP_ALL_ONES {
        if a_frac != 0 {
            return propagate_nan(ctx, a, b);
        }
        if b_exp0 == EXP_ALL_ONES {
            if b_frac != 0 {
                return propagate_nan(ctx, a, b);
            }
            ctx.raise(Exceptions::INVALID);
            return NAN;
        }
        return pack(sign, EXP_ALL_ONES, 0);
    }
    if b_exp0 == EXP_ALL_ONES {
        if b_frac != 0 {
            return propagate_nan(ctx, a, b);
        }
        return pack(sign, 0, 0);
    }
    if b_exp0 == 0 && b_frac == 0 {
        if a_exp0 == 0 && a_frac == 0 {
            ctx.raise(Exceptions::INVALID);
            return NAN;
        }
        ctx.raise(Exceptions::DIVIDE_BY_ZERO);
        return pack(sign, EXP_ALL_ONES, 0);
    }
    if a_exp0 == 0 && a_frac == 0 {
        return pack(sign, 0, 0);
    }

    let (a_exp, a_sig0) = unpack_finite(a_exp0, a_frac);
    let (b_exp, b_sig) = unpack_finite(b_exp0, b_frac);

    let mut exp = a_exp - b_exp + 0x3fd;
    let mut a_sig = a_sig0 << 10;
    let b_sig = b_sig << 11;

    if b_sig <= 2 * a_sig {
        a_sig >>= 1;
        exp += 1;
    }

    let dividend = Uint128::new(a_sig, 0);
    let mut sig = div128x64(dividend, b_sig);

    if sig & 0x1ff <= 2 {
        let product = mul64x64(b_sig, sig);
        let mut rem = dividend.sub(product);
        while rem.is_negative() {
            sig -= 1;
            rem = rem.add(Uint128::new(0, b_sig));
        }
        if rem.lo != 0 {
            sig |= 1;
        }
    }

    round_and_pack64(ctx, sign, exp, sig)
}
