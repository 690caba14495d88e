// calc/eval.rs
//
// Tree walk over `Expr`, evaluated entirely through `Real32` so every
// leaf and every internal node carries a tracked error bound. A
// `Sequence`'s value is its right child's; the left child is still
// evaluated for any side effects it has on `ctx` (matching `;` reading
// as "do this, then this").

use super::tree::{Expr, Func1, Func2};
use crate::context::Context;
use crate::float32::{self, Float32};
use crate::real32::{self, Real32};

pub(crate) fn eval(ctx: &mut Context, expr: &Expr) -> Real32 {
    match expr {
        Expr::Literal(v) => Real32::constant(*v),
        Expr::Constant(c) => Real32::constant(c.value()),

        Expr::Func1(f, a) => eval_func1(ctx, *f, eval(ctx, a)),
        Expr::Func2(f, a, b) => eval_func2(ctx, *f, eval(ctx, a), eval(ctx, b)),

        Expr::Eq(a, b) => real32::eq(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Lte(a, b) => real32::lte(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Lt(a, b) => real32::lt(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Ne(a, b) => real32::ne(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Gte(a, b) => real32::gte(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Gt(a, b) => real32::gt(ctx, eval(ctx, a), eval(ctx, b)),

        Expr::Add(a, b) => real32::add(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Sub(a, b) => real32::sub(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Mul(a, b) => real32::mul(ctx, eval(ctx, a), eval(ctx, b)),
        Expr::Div(a, b) => real32::div(ctx, eval(ctx, a), eval(ctx, b)),

        Expr::Sequence(a, b) => {
            let _ = eval(ctx, a);
            eval(ctx, b)
        }
    }
}

fn eval_func1(ctx: &mut Context, f: Func1, x: Real32) -> Real32 {
    match f {
        Func1::Floor => real32::floor(ctx, x),
        Func1::Ceil => real32::ceil(ctx, x),
        Func1::Trunc => real32::trunc(ctx, x),
        Func1::Sqrt => real32::sqrt(ctx, x),
        Func1::Abs => real32::abs(x),
        Func1::Cosd => {
            // cosd's kernel takes a double-precision argument and
            // narrows its result. Treated as exact (eps = 0) since it's
            // a testing hook, not part of `Real32`'s error table.
            let widened = crate::convert::f32_to_f64(ctx, x.value);
            let value = float32::kernel::cosd(ctx, widened);
            Real32 {
                value,
                eps: float32::ZERO,
            }
        }
    }
}

fn eval_func2(ctx: &mut Context, f: Func2, a: Real32, b: Real32) -> Real32 {
    match f {
        Func2::Min => real32::min(ctx, a, b),
        Func2::Max => real32::max(ctx, a, b),
        Func2::Copysign => real32::copysign(a, b),
    }
}
