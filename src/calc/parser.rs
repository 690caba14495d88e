// calc/parser.rs
//
// Recursive-descent parser over the fixed arithmetic grammar: a small
// precedence ladder (relational, additive, multiplicative, unary,
// primary) plus a top-level `;`-separated sequence. Each binary level
// mirrors the previous one's shape, the way a hand-written descent
// parser for a tiny grammar usually looks.

use super::error::ParseError;
use super::lexer::Token;
use super::tree::{Constant, Expr, Func1, Func2};
use crate::float32::Float32;

pub(crate) fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut p = Parser { tokens, pos: 0 };
    let expr = p.sequence()?;
    if let Some(tok) = p.peek() {
        return Err(ParseError::TrailingInput(format!("{:?}", tok)));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: &Token, what: &'static str) -> Result<(), ParseError> {
        match self.advance() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(ParseError::UnexpectedToken(format!("{:?}", tok), what)),
            None => Err(ParseError::UnexpectedEof(what)),
        }
    }

    /// `sequence := relational (';' relational)*`
    fn sequence(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.relational()?;
        while matches!(self.peek(), Some(Token::Semicolon)) {
            self.advance();
            let rhs = self.relational()?;
            expr = Expr::Sequence(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    /// `relational := additive (('=' | '!=' | '<' | '<=' | '>' | '>=') additive)*`
    fn relational(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.additive()?;
        loop {
            let build: fn(Box<Expr>, Box<Expr>) -> Expr = match self.peek() {
                Some(Token::Eq) => Expr::Eq,
                Some(Token::Ne) => Expr::Ne,
                Some(Token::Lt) => Expr::Lt,
                Some(Token::Lte) => Expr::Lte,
                Some(Token::Gt) => Expr::Gt,
                Some(Token::Gte) => Expr::Gte,
                _ => break,
            };
            self.advance();
            let rhs = self.additive()?;
            expr = build(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    /// `additive := multiplicative (('+' | '-') multiplicative)*`
    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.multiplicative()?;
        loop {
            let build: fn(Box<Expr>, Box<Expr>) -> Expr = match self.peek() {
                Some(Token::Plus) => Expr::Add,
                Some(Token::Minus) => Expr::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.multiplicative()?;
            expr = build(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    /// `multiplicative := unary (('*' | '/') unary)*`
    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;
        loop {
            let build: fn(Box<Expr>, Box<Expr>) -> Expr = match self.peek() {
                Some(Token::Star) => Expr::Mul,
                Some(Token::Slash) => Expr::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.unary()?;
            expr = build(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    /// `unary := '-' unary | primary`
    fn unary(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            let operand = self.unary()?;
            // `-x` is `0 - x`, same as the source's fold into `sub`.
            return Ok(Expr::Sub(
                Box::new(Expr::Literal(Float32::from(0u32))),
                Box::new(operand),
            ));
        }
        self.primary()
    }

    /// `primary := number | ident call? | '(' sequence ')'`
    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Literal(Float32::from(n.to_bits()))),
            Some(Token::LParen) => {
                let inner = self.sequence()?;
                self.expect(&Token::RParen, "closing ')'")?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                let name = name.clone();
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.call(&name)
                } else if let Some(c) = Constant::from_name(&name) {
                    Ok(Expr::Constant(c))
                } else {
                    Err(ParseError::UnknownIdentifier(name))
                }
            }
            Some(tok) => Err(ParseError::UnexpectedToken(format!("{:?}", tok), "an expression")),
            None => Err(ParseError::UnexpectedEof("an expression")),
        }
    }

    /// Parses a call `name(args...)` once `name` has been consumed and
    /// the next token is confirmed to be `(`.
    fn call(&mut self, name: &str) -> Result<Expr, ParseError> {
        self.advance(); // '('
        let mut args = Vec::new();
        if !matches!(self.peek(), Some(Token::RParen)) {
            args.push(self.relational()?);
            while matches!(self.peek(), Some(Token::Comma)) {
                self.advance();
                args.push(self.relational()?);
            }
        }
        self.expect(&Token::RParen, "closing ')'")?;

        if let Some(f1) = Func1::from_name(name) {
            if args.len() != 1 {
                return Err(ParseError::ArityMismatch(
                    func1_name(f1),
                    1,
                    args.len(),
                ));
            }
            let mut it = args.into_iter();
            return Ok(Expr::Func1(f1, Box::new(it.next().unwrap())));
        }
        if let Some(f2) = Func2::from_name(name) {
            if args.len() != 2 {
                return Err(ParseError::ArityMismatch(
                    func2_name(f2),
                    2,
                    args.len(),
                ));
            }
            let mut it = args.into_iter();
            let a = it.next().unwrap();
            let b = it.next().unwrap();
            return Ok(Expr::Func2(f2, Box::new(a), Box::new(b)));
        }
        Err(ParseError::UnknownIdentifier(name.to_string()))
    }
}

fn func1_name(f: Func1) -> &'static str {
    match f {
        Func1::Floor => "floor",
        Func1::Ceil => "ceil",
        Func1::Trunc => "trunc",
        Func1::Sqrt => "sqrt",
        Func1::Abs => "abs",
        Func1::Cosd => "cosd",
    }
}

fn func2_name(f: Func2) -> &'static str {
    match f {
        Func2::Min => "min",
        Func2::Max => "max",
        Func2::Copysign => "copysign",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::lexer::lex;

    fn parse_str(s: &str) -> Expr {
        parse(&lex(s).unwrap()).unwrap()
    }

    #[test]
    fn parses_precedence() {
        match parse_str("1 + 2 * 3") {
            Expr::Add(lhs, rhs) => {
                assert!(matches!(*lhs, Expr::Literal(_)));
                assert!(matches!(*rhs, Expr::Mul(_, _)));
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn parses_unary_minus_as_subtraction_from_zero() {
        match parse_str("-5") {
            Expr::Sub(lhs, rhs) => {
                assert!(matches!(*lhs, Expr::Literal(_)));
                assert!(matches!(*rhs, Expr::Literal(_)));
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn parses_function_call() {
        match parse_str("sqrt(4)") {
            Expr::Func1(Func1::Sqrt, _) => {}
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn parses_two_arg_function() {
        match parse_str("min(1, 2)") {
            Expr::Func2(Func2::Min, _, _) => {}
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn parses_sequence() {
        match parse_str("1; 2; 3") {
            Expr::Sequence(_, rhs) => assert!(matches!(*rhs, Expr::Literal(_))),
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        let tokens = lex("bogus").unwrap();
        assert_eq!(
            parse(&tokens),
            Err(ParseError::UnknownIdentifier("bogus".to_string()))
        );
    }

    #[test]
    fn rejects_arity_mismatch() {
        let tokens = lex("sqrt(1, 2)").unwrap();
        assert_eq!(
            parse(&tokens),
            Err(ParseError::ArityMismatch("sqrt", 1, 2))
        );
    }

    #[test]
    fn rejects_trailing_input() {
        let tokens = lex("1 2").unwrap();
        assert!(matches!(parse(&tokens), Err(ParseError::TrailingInput(_))));
    }
}
