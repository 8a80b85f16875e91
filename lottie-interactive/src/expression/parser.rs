use super::lexer::{Token, TokenKind, tokenize};
use crate::ExpressionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    And,
    Or,
}

/// Syntax tree of a parsed formula.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Identifier(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Binding powers, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Minimum,
    Separator,
    Literal,
    Conditional,
    LogicalOr,
    LogicalAnd,
    Comparison,
    Additive,
    Multiplicative,
    Power,
    LogicalNegation,
    Bracket,
}

fn left_binding_power(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Number | TokenKind::Identifier => Precedence::Literal,
        TokenKind::Plus | TokenKind::Minus => Precedence::Additive,
        TokenKind::Star | TokenKind::Slash => Precedence::Multiplicative,
        TokenKind::Caret => Precedence::Power,
        TokenKind::Bang => Precedence::LogicalNegation,
        TokenKind::Question => Precedence::Conditional,
        TokenKind::LeftParen => Precedence::Bracket,
        TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::EqualEqual => Precedence::Comparison,
        TokenKind::AndAnd => Precedence::LogicalAnd,
        TokenKind::OrOr => Precedence::LogicalOr,
        TokenKind::Comma | TokenKind::RightParen | TokenKind::Colon => Precedence::Separator,
        TokenKind::End => Precedence::Minimum,
    }
}

fn binary_op(kind: TokenKind) -> Option<(BinaryOp, Precedence)> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::AndAnd => BinaryOp::And,
        TokenKind::OrOr => BinaryOp::Or,
        _ => return None,
    };
    Some((op, left_binding_power(kind)))
}

fn unexpected(token: Token<'_>) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        token: token.describe(),
        position: token.position,
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    index: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Token<'a> {
        // The trailing end-of-input token is sticky.
        self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn pop(&mut self) -> Token<'a> {
        let token = self.peek();
        self.index += 1;
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExpressionError> {
        let token = self.pop();
        if token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(token))
        }
    }

    fn parse(&mut self, min: Precedence) -> Result<Expr, ExpressionError> {
        let token = self.pop();
        let mut left = self.nud(token)?;

        while left_binding_power(self.peek().kind) > min {
            let token = self.pop();
            left = self.led(left, token)?;
        }

        Ok(left)
    }

    fn nud(&mut self, token: Token<'a>) -> Result<Expr, ExpressionError> {
        match token.kind {
            TokenKind::Number => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::InvalidToken {
                        token: token.text.to_string(),
                        position: token.position,
                    })?;
                Ok(Expr::Number(value))
            }
            TokenKind::Identifier => Ok(Expr::Identifier(token.text.to_string())),
            TokenKind::Plus | TokenKind::Minus => {
                let op = if token.kind == TokenKind::Plus {
                    UnaryOp::Plus
                } else {
                    UnaryOp::Minus
                };
                let operand = self.parse(Precedence::Additive)?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Bang => {
                let operand = self.parse(Precedence::LogicalNegation)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                })
            }
            TokenKind::LeftParen => {
                let inner = self.parse(Precedence::Separator)?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }
            _ => Err(unexpected(token)),
        }
    }

    fn led(&mut self, left: Expr, token: Token<'a>) -> Result<Expr, ExpressionError> {
        if let Some((op, precedence)) = binary_op(token.kind) {
            let right = self.parse(precedence)?;
            return Ok(Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        match token.kind {
            // Right associative: the right operand may contain another `^`.
            TokenKind::Caret => {
                let right = self.parse(Precedence::Multiplicative)?;
                Ok(Expr::Binary {
                    op: BinaryOp::Power,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            TokenKind::Question => {
                let then_branch = self.parse(Precedence::Literal)?;
                self.expect(TokenKind::Colon)?;
                let else_branch = self.parse(Precedence::Literal)?;
                Ok(Expr::Conditional {
                    condition: Box::new(left),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                })
            }
            TokenKind::LeftParen => {
                let Expr::Identifier(name) = left else {
                    return Err(unexpected(token));
                };

                let mut args = Vec::new();
                if self.peek().kind == TokenKind::RightParen {
                    self.pop();
                } else {
                    loop {
                        args.push(self.parse(Precedence::Separator)?);
                        let next = self.pop();
                        match next.kind {
                            TokenKind::RightParen => break,
                            TokenKind::Comma => continue,
                            _ => return Err(unexpected(next)),
                        }
                    }
                }

                Ok(Expr::Call { name, args })
            }
            _ => Err(unexpected(token)),
        }
    }
}

/// Parses a formula into a syntax tree.
///
/// Binding from loosest to tightest: `,` `)` `:` < `?:` < `||` < `&&` < comparisons < `+ -` <
/// `* /` < `^` (right associative) < unary `!` < parenthesis and calls.
pub fn parse(input: &str) -> Result<Expr, ExpressionError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, index: 0 };
    parser.parse(Precedence::Minimum)
}
