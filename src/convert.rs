/*!
Cross-precision conversion, routed through a precision-independent
[`CanonicalNaN`] carrier so a NaN payload survives a round trip through
either format without the two formats needing to know about each
other's bit layout directly.
*/

use crate::context::{Context, Exceptions};
use crate::float32::{self, Float32};
use crate::float64::{self, Float64};

/// `{sign, hi, lo}`: an intermediate NaN payload carrier used only
/// during `f32_to_f64`/`f64_to_f32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalNaN {
    pub sign: bool,
    pub hi: u64,
    pub lo: u64,
}

impl CanonicalNaN {
    pub fn from_f32(a: Float32) -> Self {
        CanonicalNaN {
            sign: (a.bits >> 31) & 1 != 0,
            hi: (a.bits as u64) << 41,
            lo: 0,
        }
    }

    pub fn from_f64(a: Float64) -> Self {
        CanonicalNaN {
            sign: (a.bits >> 63) & 1 != 0,
            hi: a.bits << 12,
            lo: 0,
        }
    }

    pub fn to_f32(self, ctx: &mut Context) -> Float32 {
        let payload = (self.hi >> 41) as u32;
        if payload & 0x0040_0000 == 0 {
            ctx.raise(Exceptions::INVALID);
        }
        let quiet_mask = 0x7fc0_0000u32;
        let sign = (self.sign as u32) << 31;
        Float32 {
            bits: sign | quiet_mask | payload,
        }
    }

    pub fn to_f64(self, ctx: &mut Context) -> Float64 {
        let payload = self.hi >> 12;
        if payload & 0x0008_0000_0000_0000 == 0 {
            ctx.raise(Exceptions::INVALID);
        }
        let quiet_mask = 0x7ff8_0000_0000_0000u64;
        let sign = (self.sign as u64) << 63;
        Float64 {
            bits: sign | quiet_mask | payload,
        }
    }
}

/// `f32 → f64`: widens `a`, handling NaN via [`CanonicalNaN`] and
/// infinity directly. A subnormal source is normalized first and its
/// adjusted exponent decremented by one before biased conversion.
pub fn f32_to_f64(ctx: &mut Context, a: Float32) -> Float64 {
    let sign = float32::sign_bit(a);
    let exp = float32::raw_exp(a);
    let frac = float32::fract(a);

    if exp == 0xff {
        if frac != 0 {
            return CanonicalNaN::from_f32(a).to_f64(ctx);
        }
        return Float64 {
            bits: ((sign as u64) << 63) | 0x7ff0_0000_0000_0000,
        };
    }
    if exp == 0 && frac == 0 {
        return Float64 {
            bits: (sign as u64) << 63,
        };
    }

    // Widening never rounds: a normalized subnormal's explicit leading
    // bit is stripped back off before the field is stored, since the
    // destination format represents it implicitly too.
    let (exp, frac) = if exp == 0 {
        let (sig, exp) = float32::round::normalize_subnormal32(frac);
        (exp - 1, sig & 0x007f_ffff)
    } else {
        (exp, frac)
    };

    let widened = (frac as u64) << 29;
    let biased64 = (exp as i32 - 127 + 1023) as u64;
    Float64 {
        bits: ((sign as u64) << 63) | (biased64 << 52) | widened,
    }
}

/// `f64 → f32`: narrows `a` through a sticky right shift of the
/// fraction and the core's normal rounding path.
pub fn f64_to_f32(ctx: &mut Context, a: Float64) -> Float32 {
    let sign = float64::sign_bit(a);
    let exp = float64::raw_exp(a);
    let frac = float64::fract(a);

    if exp == 0x7ff {
        if frac != 0 {
            return CanonicalNaN::from_f64(a).to_f32(ctx);
        }
        return Float32 {
            bits: ((sign as u32) << 31) | 0x7f80_0000,
        };
    }
    if exp == 0 && frac == 0 {
        return Float32 {
            bits: (sign as u32) << 31,
        };
    }

    let (exp, sig64) = if exp == 0 {
        let (sig, exp) = float64::round::normalize_subnormal64(frac);
        (exp - 1, sig)
    } else {
        (exp, frac | 0x0010_0000_0000_0000)
    };

    // `sig64` carries the implicit bit at position 52; fold it down to
    // the 23+7-bit layout `round_and_pack32` expects (implicit bit at
    // bit 29, 7 low guard/round/sticky bits) with a single sticky shift.
    let sig32 = crate::bits::rshr64(sig64, 22) as u32;
    let biased = exp as i32 - 1023 + 127;
    float32::round::round_and_pack32(ctx, sign, biased as i16, sig32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, RoundingMode, Tininess};

    fn ctx() -> Context {
        Context::new(RoundingMode::NearestEven, Tininess::BeforeRounding)
    }

    #[test]
    fn roundtrip_f32_f64_f32_is_identity_for_one() {
        let mut c = ctx();
        let one = Float32::from(0x3f80_0000u32);
        let widened = f32_to_f64(&mut c, one);
        let narrowed = f64_to_f32(&mut c, widened);
        assert_eq!(narrowed.bits, one.bits);
    }

    #[test]
    fn e8_nan_preserves_top_bits_and_payload() {
        let mut c = ctx();
        let qnan32 = Float32::from(0x7fc0_0000u32);
        let widened = f32_to_f64(&mut c, qnan32);
        assert_eq!(widened.bits >> 48, 0x7ff8);
    }

    #[test]
    fn infinity_widens_and_narrows() {
        let mut c = ctx();
        let inf32 = Float32::from(0x7f80_0000u32);
        let widened = f32_to_f64(&mut c, inf32);
        assert_eq!(widened.bits, 0x7ff0_0000_0000_0000);
        let narrowed = f64_to_f32(&mut c, widened);
        assert_eq!(narrowed.bits, inf32.bits);
    }
}
