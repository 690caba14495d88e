/*!
A small recursive-descent expression calculator exercising the core
through [`crate::real32::Real32`]. Its operation menu against the core
is what matters here, not its grammar or error text.
*/

mod error;
mod eval;
mod lexer;
mod parser;
mod tree;

pub use error::ParseError;
pub use tree::{Expr, Func1, Func2};

use crate::context::Context;
use crate::real32::Real32;

/// Parses `source` and evaluates it against `ctx`, returning the final
/// `Real32` (the value of a `Sequence`'s last element, or of the whole
/// expression if there is no sequence operator).
pub fn eval(ctx: &mut Context, source: &str) -> Result<Real32, ParseError> {
    let tokens = lexer::lex(source)?;
    let expr = parser::parse(&tokens)?;
    Ok(eval::eval(ctx, &expr))
}
