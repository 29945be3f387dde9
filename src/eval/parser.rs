//! Recursive-descent parser and tree-walk evaluator.
//!
//! Precedence, loosest to tightest: `+ -`, then `* / %`, then `^`
//! (right-associative), then unary minus, then function calls and
//! parentheses. `-2^2` is therefore `(-2)^2 = 4` and `-sqrt(4)` is `-2`.

use super::lexer::{Token, TokenKind};
use super::{constant, function_arity, EvalError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// The closed expression AST. Each node exclusively owns its children; these
/// five variants are the evaluator's entire reachable operation set.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Number(f64),
    Constant(String),
    Call(String, Vec<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

/// Caps how deep the AST can grow. Bounding the height here also bounds the
/// parser's own recursion, `Expr::eval`, and the drop of the `Box` chain.
const MAX_DEPTH: usize = 256;

pub(super) fn parse(tokens: &[Token]) -> Result<Expr, EvalError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    parser.expect_end()?;
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    // lex always terminates the stream with End, so indexing is in bounds
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn position(&self) -> usize {
        self.tokens[self.pos].position
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Charges one level of nesting. A charge is held for as long as the
    /// subtree it covers is still being built, so the running total is an
    /// upper bound on the height of the finished AST.
    fn nest(&mut self) -> Result<(), EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::Syntax {
                position: self.position(),
                message: "expression too deeply nested".to_string(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        let mut charged = 0;

        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            // every operand deepens the left-leaning tree by one
            self.nest()?;
            charged += 1;
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }

        self.depth -= charged;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.power()?;
        let mut charged = 0;

        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.nest()?;
            charged += 1;
            self.advance();
            let rhs = self.power()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }

        self.depth -= charged;
        Ok(lhs)
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let lhs = self.unary()?;

        if matches!(self.peek(), TokenKind::Caret) {
            // charged here, not in unary, because the base's charge is
            // already released by the time the exponent is parsed
            self.nest()?;
            self.advance();
            // right-associative: 2^3^2 = 2^(3^2)
            let rhs = self.power()?;
            self.depth -= 1;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(lhs), Box::new(rhs)));
        }

        Ok(lhs)
    }

    // the remaining recursion cycles (unary chains, parenthesised groups,
    // call arguments) all pass through here with the charge held, so one
    // charge per entry bounds them all
    fn unary(&mut self) -> Result<Expr, EvalError> {
        self.nest()?;

        let expr = if matches!(self.peek(), TokenKind::Minus) {
            self.advance();
            let operand = self.unary()?;
            Ok(Expr::Neg(Box::new(operand)))
        } else {
            self.primary()
        };

        self.depth -= 1;
        expr
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let position = self.position();

        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.ident(name, position)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(&TokenKind::RParen, "expected closing parenthesis")?;
                Ok(inner)
            }
            other => Err(EvalError::Syntax {
                position,
                message: format!("expected a value, found {other}"),
            }),
        }
    }

    /// An identifier followed by `(` must be a whitelisted function; a bare
    /// identifier must be a whitelisted constant. Everything else is rejected.
    fn ident(&mut self, name: String, position: usize) -> Result<Expr, EvalError> {
        if !matches!(self.peek(), TokenKind::LParen) {
            return if constant(&name).is_some() {
                Ok(Expr::Constant(name.to_ascii_lowercase()))
            } else {
                Err(EvalError::UnknownIdentifier { name })
            };
        }

        let Some(arity) = function_arity(&name) else {
            return Err(EvalError::UnknownIdentifier { name });
        };

        self.advance(); // consume '('

        let mut args = Vec::new();
        if !matches!(self.peek(), TokenKind::RParen) {
            loop {
                args.push(self.expr()?);
                if matches!(self.peek(), TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.expect(
            &TokenKind::RParen,
            "expected closing parenthesis after arguments",
        )?;

        let name = name.to_ascii_lowercase();
        if args.len() != arity {
            return Err(EvalError::Syntax {
                position,
                message: format!(
                    "{name} takes {arity} argument(s), found {}",
                    args.len()
                ),
            });
        }

        Ok(Expr::Call(name, args))
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<(), EvalError> {
        if self.peek() == kind {
            self.advance();
            Ok(())
        } else {
            Err(EvalError::Syntax {
                position: self.position(),
                message: message.to_string(),
            })
        }
    }

    fn expect_end(&self) -> Result<(), EvalError> {
        match self.peek() {
            TokenKind::End => Ok(()),
            other => Err(EvalError::Syntax {
                position: self.position(),
                message: format!("unexpected trailing {other}"),
            }),
        }
    }
}

impl Expr {
    pub(super) fn eval(&self) -> Result<f64, EvalError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Constant(name) => constant(name).ok_or_else(|| EvalError::UnknownIdentifier {
                name: name.clone(),
            }),
            Expr::Neg(operand) => Ok(-operand.eval()?),
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval()?;
                let r = rhs.eval()?;
                match op {
                    BinOp::Add => Ok(l + r),
                    BinOp::Sub => Ok(l - r),
                    BinOp::Mul => Ok(l * r),
                    BinOp::Div if r == 0.0 => Err(EvalError::Domain {
                        reason: "division by zero".into(),
                    }),
                    BinOp::Div => Ok(l / r),
                    BinOp::Mod if r == 0.0 => Err(EvalError::Domain {
                        reason: "modulo by zero".into(),
                    }),
                    BinOp::Mod => Ok(l % r),
                    BinOp::Pow => Ok(l.powf(r)),
                }
            }
            Expr::Call(name, args) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.eval()?);
                }
                apply(name, &values)
            }
        }
    }
}

fn apply(name: &str, args: &[f64]) -> Result<f64, EvalError> {
    let value = match (name, args) {
        ("sin", [x]) => x.sin(),
        ("cos", [x]) => x.cos(),
        ("tan", [x]) => x.tan(),
        ("asin", [x]) if (-1.0..=1.0).contains(x) => x.asin(),
        ("acos", [x]) if (-1.0..=1.0).contains(x) => x.acos(),
        ("atan", [x]) => x.atan(),
        ("atan2", [y, x]) => y.atan2(*x),
        ("sinh", [x]) => x.sinh(),
        ("cosh", [x]) => x.cosh(),
        ("tanh", [x]) => x.tanh(),
        // log and ln are both the natural logarithm, log10 is base 10
        ("log", [x]) | ("ln", [x]) if *x > 0.0 => x.ln(),
        ("log10", [x]) if *x > 0.0 => x.log10(),
        ("exp", [x]) => x.exp(),
        ("sqrt", [x]) if *x >= 0.0 => x.sqrt(),
        ("abs", [x]) | ("fabs", [x]) => x.abs(),
        ("pow", [base, exp]) => base.powf(*exp),
        ("ceil", [x]) => x.ceil(),
        ("floor", [x]) => x.floor(),
        ("fmod", [a, b]) if *b != 0.0 => a % b,
        ("degrees", [x]) => x.to_degrees(),
        ("radians", [x]) => x.to_radians(),
        ("hypot", [x, y]) => x.hypot(*y),

        ("asin", _) | ("acos", _) => {
            return Err(EvalError::Domain {
                reason: format!("{name} argument outside [-1, 1]"),
            })
        }
        ("log", _) | ("ln", _) | ("log10", _) => {
            return Err(EvalError::Domain {
                reason: format!("{name} of a non-positive number"),
            })
        }
        ("sqrt", _) => {
            return Err(EvalError::Domain {
                reason: "square root of a negative number".into(),
            })
        }
        ("fmod", _) => {
            return Err(EvalError::Domain {
                reason: "fmod by zero".into(),
            })
        }

        // the parser only emits whitelisted names, but keep the arm typed
        _ => {
            return Err(EvalError::UnknownIdentifier {
                name: name.to_string(),
            })
        }
    };

    Ok(value)
}
