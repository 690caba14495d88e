// float64/consts.rs
//
// The four double-precision coefficients of the degree-7 cosine
// approximation used only by `float32::kernel::cosd`.

use super::Float64;

pub const C0: Float64 = Float64 { bits: 0xBFDF_FFFF_FD0C_5E81 };
pub const C1: Float64 = Float64 { bits: 0x3FA5_5553_E105_3A42 };
pub const C2: Float64 = Float64 { bits: 0xBF56_C087_E80F_1E27 };
pub const C3: Float64 = Float64 { bits: 0x3EF9_9342_E0EE_5069 };
