// float32/convert.rs
//
// Integer to float32 conversion.

use super::round::normalize_round_and_pack32;
use super::{pack, Float32};
use crate::context::Context;

/// `from_sint32(ctx, x)`.
pub fn from_sint32(ctx: &mut Context, x: i32) -> Float32 {
    if x == 0 {
        return Float32::from(0);
    }
    if x == i32::MIN {
        return pack(true, 0x9e, 0);
    }
    let sign = x < 0;
    let magnitude = x.unsigned_abs();
    normalize_round_and_pack32(ctx, sign, 0x9c, magnitude)
}
