//! Expression parsing for QASM2.

use zxport_ir::ParameterExpression;

use super::{MAX_EXPRESSION_DEPTH, Parser};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    fn apply(self, left: ParameterExpression, right: ParameterExpression) -> ParameterExpression {
        match self {
            BinOp::Add => left + right,
            BinOp::Sub => left - right,
            BinOp::Mul => left * right,
            BinOp::Div => left / right,
        }
    }
}

/// A parsed subexpression with the height of its tree.
struct Subexpr {
    expr: ParameterExpression,
    height: usize,
}

impl Subexpr {
    fn leaf(expr: ParameterExpression) -> Self {
        Self { expr, height: 1 }
    }
}

impl Parser {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<ParameterExpression> {
        self.parse_nested_expr().map(|sub| sub.expr)
    }

    /// Parse a full expression one nesting level below the current one.
    fn parse_nested_expr(&mut self) -> ParseResult<Subexpr> {
        self.enter_nesting()?;
        let result = self.parse_binary_expr(0);
        self.nesting -= 1;
        result
    }

    fn enter_nesting(&mut self) -> ParseResult<()> {
        if self.nesting >= MAX_EXPRESSION_DEPTH {
            return Err(ParseError::NestingTooDeep {
                position: self.current_position(),
                limit: MAX_EXPRESSION_DEPTH,
            });
        }
        self.nesting += 1;
        Ok(())
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Subexpr> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let position = self.current_position();
            self.advance(); // consume operator

            let right = self.parse_binary_expr(prec + 1)?;
            if op == BinOp::Div && right.expr.simplify().as_f64() == Some(0.0) {
                return Err(ParseError::DivisionByZero { position });
            }
            let height = left.height.max(right.height) + 1;
            if height > MAX_EXPRESSION_DEPTH {
                return Err(ParseError::NestingTooDeep {
                    position,
                    limit: MAX_EXPRESSION_DEPTH,
                });
            }
            left = Subexpr {
                expr: op.apply(left.expr, right.expr),
                height,
            };
        }

        Ok(left)
    }

    /// Parse unary expression.
    fn parse_unary_expr(&mut self) -> ParseResult<Subexpr> {
        if !self.check(&Token::Minus) {
            return self.parse_primary_expr();
        }
        let position = self.current_position();
        self.enter_nesting()?;
        self.advance();
        let operand = self.parse_unary_expr();
        self.nesting -= 1;

        let operand = operand?;
        let height = operand.height + 1;
        if height > MAX_EXPRESSION_DEPTH {
            return Err(ParseError::NestingTooDeep {
                position,
                limit: MAX_EXPRESSION_DEPTH,
            });
        }
        Ok(Subexpr {
            expr: -operand.expr,
            height,
        })
    }

    /// Parse primary expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Subexpr> {
        let Some(token) = self.peek().cloned() else {
            return Err(ParseError::UnexpectedEof("expression".into()));
        };

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(Subexpr::leaf(ParameterExpression::Constant(v.as_f64())))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(Subexpr::leaf(ParameterExpression::Constant(v)))
            }
            Token::Pi => {
                self.advance();
                Ok(Subexpr::leaf(ParameterExpression::Pi))
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(Subexpr::leaf(ParameterExpression::Symbol(name)))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_nested_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Peek at binary operator.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            _ => None,
        }
    }

    /// Parse a comma-separated argument list, folding each argument.
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<ParameterExpression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?.simplify()];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?.simplify());
        }
        Ok(exprs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Position;
    use std::f64::consts::PI;

    fn parse_expr(source: &str) -> ParseResult<ParameterExpression> {
        let mut parser = Parser::new(source, false)?;
        let expr = parser.parse_expression()?.simplify();
        if parser.is_eof() {
            Ok(expr)
        } else {
            Err(parser.unexpected("end of expression"))
        }
    }

    fn nested(open: &str, inner: &str, close: &str, n: usize) -> String {
        format!("{}{inner}{}", open.repeat(n), close.repeat(n))
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(
            parse_expr("pi/2").unwrap(),
            ParameterExpression::Constant(1.570_796_326_794_896_6)
        );
        assert_eq!(parse_expr("2*3+4").unwrap().as_f64(), Some(10.0));
        assert_eq!(parse_expr("2*(3+4)").unwrap().as_f64(), Some(14.0));
        assert_eq!(parse_expr("-pi").unwrap().as_f64(), Some(-PI));
        assert_eq!(parse_expr("--1").unwrap().as_f64(), Some(1.0));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse_expr("8-4-2").unwrap().as_f64(), Some(2.0));
        assert_eq!(parse_expr("8/4/2").unwrap().as_f64(), Some(1.0));
    }

    #[test]
    fn test_free_variables_kept() {
        let expr = parse_expr("0.1*pi*v").unwrap();
        assert!(expr.is_symbolic());
        assert_eq!(expr.symbols().into_iter().collect::<Vec<_>>(), vec!["v"]);
    }

    #[test]
    fn test_constant_division_by_zero() {
        let err = parse_expr("1 / (2 - 2)").unwrap_err();
        assert!(matches!(
            err,
            ParseError::DivisionByZero { position } if position == Position::new(1, 3)
        ));
    }

    #[test]
    fn test_symbolic_divisor_deferred() {
        let expr = parse_expr("1 / d").unwrap();
        assert!(expr.is_symbolic());
    }

    #[test]
    fn test_unexpected_token() {
        assert!(matches!(
            parse_expr("2 * )"),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_expr("(1 + 2"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_deep_parentheses_rejected() {
        let err = parse_expr(&nested("(", "1", ")", 10_000)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NestingTooDeep { limit: MAX_EXPRESSION_DEPTH, .. }
        ));
    }

    #[test]
    fn test_deep_negation_rejected() {
        let err = parse_expr(&nested("-", "1", "", 10_000)).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }

    #[test]
    fn test_long_operator_chain_rejected() {
        let chain = vec!["v"; 10_000].join("+");
        let err = parse_expr(&chain).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }

    #[test]
    fn test_nesting_within_limit() {
        let expr = parse_expr(&nested("(", "2", ")", MAX_EXPRESSION_DEPTH - 1)).unwrap();
        assert_eq!(expr.as_f64(), Some(2.0));
        assert_eq!(parse_expr(&nested("-", "1", "", 100)).unwrap().as_f64(), Some(1.0));
        assert!(parse_expr(&vec!["v"; 200].join("*")).is_ok());
    }

    #[test]
    fn test_integer_literal_wider_than_u64() {
        let expr = parse_expr("100000000000000000000 / 2").unwrap();
        assert_eq!(expr.as_f64(), Some(5e19));
    }
}
