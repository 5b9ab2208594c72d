//! Recursive-descent parser
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := postfix ('**' unary)?
//! postfix := atom ('(' args? ')')*
//! atom    := NUMBER | NAME | '(' expr (',' expr)* ','? ')'
//! args    := expr (',' expr)* ','?
//! ```
//!
//! `**` is right-associative and binds tighter than a unary sign on its left,
//! so `-2**2` is `-(2**2)` while `2**-1` is `2**(-1)`.
//!
//! `expr` and `term` runs are stored flat as [`Expr::Chain`], so their length
//! does not add to the tree depth. Only parentheses, calls, unary signs and
//! `**` nest, and those are capped at `MAX_DEPTH`.

use crate::error::{CalcError, Result};
use crate::lexer::Token;
use crate::value::Value;

/// Nesting limit for parentheses, calls and unary chains
const MAX_DEPTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Value),
    Name(String),
    /// Parenthesized, comma-separated group; never a number
    Tuple(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `lhs ** rhs`
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Left-associative run such as `a + b - c`, applied in order
    Chain {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

/// Parse a full token stream into a single expression
pub fn parse(tokens: Vec<Token>) -> Result<Expr> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(CalcError::invalid(format!("unexpected token '{}'", token))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token if it equals `expected`
    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            match self.peek() {
                Some(found) => Err(CalcError::invalid(format!(
                    "expected '{}', found '{}'",
                    expected, found
                ))),
                None => Err(CalcError::invalid(format!(
                    "expected '{}' before end of input",
                    expected
                ))),
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::invalid("expression is nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<Expr> {
        let first = self.term()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.term()?));
        }
    }

    fn term(&mut self) -> Result<Expr> {
        let first = self.unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.unary()?));
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.power(),
        };
        self.pos += 1;

        self.enter()?;
        let operand = self.unary();
        self.leave();

        Ok(Expr::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.postfix()?;
        if !self.eat(&Token::DoubleStar) {
            return Ok(base);
        }

        self.enter()?;
        let exponent = self.unary();
        self.leave();

        Ok(binary(BinaryOp::Pow, base, exponent?))
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.atom()?;
        while self.eat(&Token::LParen) {
            self.enter()?;
            let args = self.arguments();
            self.leave();

            expr = Expr::Call {
                callee: Box::new(expr),
                args: args?,
            };
        }
        Ok(expr)
    }

    /// Call arguments after the opening parenthesis, including the closing one
    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.eat(&Token::RParen) {
            args.push(self.expr()?);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen)?;
                break;
            }
        }
        Ok(args)
    }

    fn atom(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Name(name)) => Ok(Expr::Name(name)),
            Some(Token::LParen) => {
                self.enter()?;
                let group = self.group();
                self.leave();
                group
            },
            Some(token) => Err(CalcError::invalid(format!("unexpected token '{}'", token))),
            None => Err(CalcError::invalid("unexpected end of input")),
        }
    }

    /// Parenthesized expression or tuple after the opening parenthesis
    fn group(&mut self) -> Result<Expr> {
        if self.eat(&Token::RParen) {
            return Ok(Expr::Tuple(Vec::new()));
        }

        let first = self.expr()?;
        if self.eat(&Token::RParen) {
            return Ok(first);
        }

        let mut items = vec![first];
        self.expect(&Token::Comma)?;
        while !self.eat(&Token::RParen) {
            items.push(self.expr()?);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen)?;
                break;
            }
        }
        Ok(Expr::Tuple(items))
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    if rest.is_empty() {
        return first;
    }
    Expr::Chain {
        first: Box::new(first),
        rest,
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(input: &str) -> Result<Expr> {
        parse(tokenize(input)?)
    }

    fn num(i: i64) -> Box<Expr> {
        Box::new(Expr::Number(Value::Int(i)))
    }

    #[test]
    fn test_precedence() {
        let expr = parse_str("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::Chain {
                first: num(1),
                rest: vec![(
                    BinaryOp::Add,
                    Expr::Chain {
                        first: num(2),
                        rest: vec![(BinaryOp::Mul, Expr::Number(Value::Int(3)))],
                    }
                )],
            }
        );
    }

    #[test]
    fn test_operator_runs_are_flat() {
        let expr = parse_str("8 - 2 - 1 + 4").unwrap();
        let Expr::Chain { first, rest } = expr else {
            panic!("expected a chain, got {:?}", expr);
        };
        assert_eq!(first, num(8));
        let ops: Vec<BinaryOp> = rest.iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, [BinaryOp::Sub, BinaryOp::Sub, BinaryOp::Add]);

        let long = format!("1{}", "+1".repeat(20_000));
        let Expr::Chain { rest, .. } = parse_str(&long).unwrap() else {
            panic!("expected a chain");
        };
        assert_eq!(rest.len(), 20_000);
        assert!(rest.iter().all(|(_, e)| matches!(e, Expr::Number(_))));
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        let expr = parse_str("-2**2").unwrap();
        assert_eq!(
            expr,
            Expr::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(Expr::Binary {
                    op: BinaryOp::Pow,
                    lhs: num(2),
                    rhs: num(2),
                }),
            }
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse_str("2**3**2").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Pow,
                lhs: num(2),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Pow,
                    lhs: num(3),
                    rhs: num(2),
                }),
            }
        );
    }

    #[test]
    fn test_calls() {
        let expr = parse_str("log(8, 2,)").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                callee: Box::new(Expr::Name("log".into())),
                args: vec![Expr::Number(Value::Int(8)), Expr::Number(Value::Int(2))],
            }
        );
        assert!(matches!(parse_str("pi()").unwrap(), Expr::Call { args, .. } if args.is_empty()));
    }

    #[test]
    fn test_tuples() {
        assert_eq!(parse_str("()").unwrap(), Expr::Tuple(vec![]));
        assert!(matches!(parse_str("(1, 2)").unwrap(), Expr::Tuple(items) if items.len() == 2));
        assert!(matches!(parse_str("(1,)").unwrap(), Expr::Tuple(items) if items.len() == 1));
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["", "2+", "(1", "1)", "sqrt(", "f(,)", "*2", "2 3", "1,2", "(1 2)"] {
            assert!(parse_str(input).is_err(), "expected syntax error for {:?}", input);
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        assert!(parse_str(&deep).is_err());

        let ok = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert!(parse_str(&ok).is_ok());
    }
}
