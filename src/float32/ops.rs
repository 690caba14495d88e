// float32/ops.rs
//
// Arithmetic primitives: add, sub, mul, div. add/sub realize the
// {SameExp, AExpBigger, BExpBigger} state machine structurally instead
// of through the source's cross-initialization gotos (see DESIGN.md).

use crate::bits::{rshr32, rshr64};
use crate::context::{Context, Exceptions, Operation, RoundingMode};

use super::round::{normalize_round_and_pack32, normalize_subnormal32, propagate_nan, round_and_pack32};
use super::{fract, pack, raw_exp, sign_bit, Float32, NAN};

const EXP_ALL_ONES: i16 = 0xff;
const BIAS: i16 = 127;

/// `fadd(ctx, a, b)`.
pub fn add(ctx: &mut Context, a: Float32, b: Float32) -> Float32 {
    ctx.note_operation(Operation::Add);
    let a_sign = sign_bit(a);
    let b_sign = sign_bit(b);
    if a_sign == b_sign {
        add_sig(ctx, a, b, a_sign)
    } else {
        sub_sig(ctx, a, b, a_sign)
    }
}

/// `fsub(ctx, a, b)`.
pub fn sub(ctx: &mut Context, a: Float32, b: Float32) -> Float32 {
    ctx.note_operation(Operation::Sub);
    let a_sign = sign_bit(a);
    let b_sign = sign_bit(b);
    if a_sign == b_sign {
        sub_sig(ctx, a, b, a_sign)
    } else {
        add_sig(ctx, a, b, a_sign)
    }
}

/// Same-sign addition of magnitudes, dispatching on the sign of
/// `a_exp - b_exp` rather than jumping into a shared tail.
fn add_sig(ctx: &mut Context, a: Float32, b: Float32, sign: bool) -> Float32 {
    let a_exp = raw_exp(a);
    let b_exp = raw_exp(b);
    let a_sig = fract(a) << 6;
    let b_sig = fract(b) << 6;
    let exp_diff = a_exp - b_exp;

    if exp_diff > 0 {
        if a_exp == EXP_ALL_ONES {
            return if a_sig != 0 { propagate_nan(ctx, a, b) } else { a };
        }
        let b_sig = if b_exp == 0 {
            rshr32(b_sig, exp_diff - 1)
        } else {
            rshr32(b_sig | 0x2000_0000, exp_diff)
        };
        return finish_add(ctx, sign, a_exp, a_sig | 0x2000_0000, b_sig);
    }

    if exp_diff < 0 {
        if b_exp == EXP_ALL_ONES {
            return if b_sig != 0 { propagate_nan(ctx, a, b) } else { b };
        }
        let a_sig = if a_exp == 0 {
            rshr32(a_sig, -exp_diff - 1)
        } else {
            rshr32(a_sig | 0x2000_0000, -exp_diff)
        };
        return finish_add(ctx, sign, b_exp, b_sig | 0x2000_0000, a_sig);
    }

    // Equal exponents.
    if a_exp == EXP_ALL_ONES {
        if a_sig != 0 || b_sig != 0 {
            return propagate_nan(ctx, a, b);
        }
        return pack(sign, EXP_ALL_ONES, 0);
    }
    if a_exp == 0 {
        // Two subnormals: a direct add, letting `pack`'s carry-by-`+`
        // promote to the smallest normal if the sum overflows the field.
        return pack(sign, 0, (a_sig + b_sig) >> 6);
    }
    let sig = 0x4000_0000u32 + a_sig + b_sig;
    round_and_pack32(ctx, sign, a_exp, sig)
}

/// Shared tail of the two unequal-exponent `add_sig` branches: combine
/// the aligned significands, open a spare bit for carry-out, and
/// renormalize if the addition carried into it.
fn finish_add(ctx: &mut Context, sign: bool, larger_exp: i16, larger_sig: u32, smaller_sig: u32) -> Float32 {
    let mut exp = larger_exp - 1;
    let mut sig = (larger_sig + smaller_sig) << 1;
    if sig & 0x8000_0000 != 0 {
        sig >>= 1;
        exp += 1;
    }
    round_and_pack32(ctx, sign, exp, sig)
}

/// Magnitude subtraction: selects the larger operand, flips `sign` if
/// `b` wins, and normalizes the (always non-negative) difference.
fn sub_sig(ctx: &mut Context, a: Float32, b: Float32, sign: bool) -> Float32 {
    let a_exp = raw_exp(a);
    let b_exp = raw_exp(b);
    let a_sig = fract(a) << 7;
    let b_sig = fract(b) << 7;
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
            rshr32(b_sig, exp_diff - 1)
        } else {
            rshr32(b_sig | 0x4000_0000, exp_diff) | 0x4000_0000
        };
        let a_sig = a_sig | 0x4000_0000;
        return normalize_round_and_pack32(ctx, sign, a_exp, a_sig - b_sig);
    }

    if exp_diff < 0 {
        if b_exp == EXP_ALL_ONES {
            return if b_sig != 0 {
                propagate_nan(ctx, a, b)
            } else {
                Float32 { bits: b.bits ^ 0x8000_0000 }
            };
        }
        let a_sig = if a_exp == 0 {
            rshr32(a_sig, -exp_diff - 1)
        } else {
            rshr32(a_sig | 0x4000_0000, -exp_diff) | 0x4000_0000
        };
        let b_sig = b_sig | 0x4000_0000;
        return normalize_round_and_pack32(ctx, !sign, b_exp, b_sig - a_sig);
    }

    // Equal, finite exponents: compare the raw fraction fields.
    if a_sig == b_sig {
        return pack(ctx.round() == RoundingMode::TowardNegative, 0, 0);
    }
    if a_sig < b_sig {
        normalize_round_and_pack32(ctx, !sign, b_exp, b_sig - a_sig)
    } else {
        normalize_round_and_pack32(ctx, sign, a_exp, a_sig - b_sig)
    }
}

/// Normalizes `exp`/`sig` for a possibly-subnormal operand, returning
/// `(exp, sig)` with the implicit bit made explicit.
fn unpack_finite(exp: i16, frac: u32) -> (i16, u32) {
    if exp == 0 {
        let (sig, exp) = normalize_subnormal32(frac);
        (exp, sig)
    } else {
        (exp, frac | 0x0080_0000)
    }
}

/// `fmul(ctx, a, b)`.
pub fn mul(ctx: &mut Context, a: Float32, b: Float32) -> Float32 {
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
    let product = ((a_sig as u64) << 7) * ((b_sig as u64) << 8);
    let mut sig = rshr64(product, 32) as u32;

    if sig & 0x8000_0000 == 0 {
        sig <<= 1;
        exp -= 1;
    }

    round_and_pack32(ctx, sign, exp, sig)
}

/// `fdiv(ctx, a, b)`.
pub fn div(ctx: &mut Context, a: Float32, b: Float32) -> Float32 {
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

    let (a_exp, a_sig) = unpack_finite(a_exp0, a_frac);
    let (b_exp, b_sig) = unpack_finite(b_exp0, b_frac);

    let mut exp = a_exp - b_exp + 0x7e;
    let a_sig64 = if a_sig < b_sig {
        exp -= 1;
        (a_sig as u64) << 31
    } else {
        (a_sig as u64) << 30
    };

    let b_sig64 = b_sig as u64;
    let mut sig = (a_sig64 / b_sig64) as u32;
    if sig & 0x3f == 0 && b_sig64 * sig as u64 != a_sig64 {
        sig |= 1;
    }

    round_and_pack32(ctx, sign, exp, sig)
}
