// calc/tree.rs
//
// The expression tree node: modeled as a Rust enum instead of a tagged
// union, one variant per node kind.

use crate::float32::Float32;

/// Index into the constant table `{e, pi, phi, fmin, fmax}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constant {
    E,
    Pi,
    Phi,
    Fmin,
    Fmax,
}

impl Constant {
    pub(crate) fn value(self) -> Float32 {
        match self {
            Constant::E => crate::float32::E,
            Constant::Pi => crate::float32::PI,
            Constant::Phi => crate::float32::PHI,
            Constant::Fmin => crate::float32::FMIN,
            Constant::Fmax => crate::float32::FMAX,
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Constant> {
        match name {
            "e" => Some(Constant::E),
            "pi" => Some(Constant::Pi),
            "phi" => Some(Constant::Phi),
            "fmin" => Some(Constant::Fmin),
            "fmax" => Some(Constant::Fmax),
            _ => None,
        }
    }
}

/// One-argument kernel functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Func1 {
    Floor,
    Ceil,
    Trunc,
    Sqrt,
    Abs,
    Cosd,
}

impl Func1 {
    pub(crate) fn from_name(name: &str) -> Option<Func1> {
        match name {
            "floor" => Some(Func1::Floor),
            "ceil" => Some(Func1::Ceil),
            "trunc" => Some(Func1::Trunc),
            "sqrt" => Some(Func1::Sqrt),
            "abs" => Some(Func1::Abs),
            "cosd" => Some(Func1::Cosd),
            _ => None,
        }
    }
}

/// Two-argument kernel functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Func2 {
    Min,
    Max,
    Copysign,
}

impl Func2 {
    pub(crate) fn from_name(name: &str) -> Option<Func2> {
        match name {
            "min" => Some(Func2::Min),
            "max" => Some(Func2::Max),
            "copysign" => Some(Func2::Copysign),
            _ => None,
        }
    }
}

/// The expression tree, one variant per node kind.
#[derive(Clone, Debug)]
pub enum Expr {
    Literal(Float32),
    Constant(Constant),
    Func1(Func1, Box<Expr>),
    Func2(Func2, Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    Lte(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
    Gte(Box<Expr>, Box<Expr>),
    Gt(Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Sequence(Box<Expr>, Box<Expr>),
}
