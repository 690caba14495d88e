/*!
`softfp` is a deterministic software implementation of IEEE 754 binary
floating-point arithmetic at two precisions (32-bit and 64-bit), built
without relying on the host CPU's floating-point unit: the same
inputs reproduce the same bit patterns, exceptions, and rounding
decisions on every platform.

This is the API documentation.

The library is organized leaves-first. [`bits`] and [`uint128`] are the
fixed-width building blocks; [`context`] carries the caller-owned
rounding mode, tininess policy, and exception/operation logs threaded
through every call. [`float32`] and [`float64`] are the two IEEE 754
formats themselves — pack/unpack, classification, round-and-pack, and
the arithmetic/comparison/kernel primitives. [`convert`] carries values
and NaN payloads between the two precisions. [`real32`] wraps `Float32`
with an accumulative error bound. [`calc`] is a small recursive-descent
expression evaluator exercising the whole stack; [`bin/softcalc`] is
its command-line front end.
*/

pub(crate) mod bits;
pub mod calc;
pub mod context;
pub mod convert;
pub mod float32;
pub mod float64;
pub mod number;
pub mod real32;
pub(crate) mod uint128;

pub use crate::context::{Context, Exceptions, Operation, RoundingMode, Tininess};
pub use crate::number::Number;
