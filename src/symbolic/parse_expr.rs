//! a module turns a String expression into a symbolic expression
//!
//! Recursive-descent parser over the token sequence produced by the
//! tokenizer. The grammar, lowest to highest precedence:
//!
//! ```text
//! sum      := term (('+'|'-') term)*
//! term     := unary (('*'|'/') unary)*
//! unary    := ('+'|'-')? function
//! function := FUNC_NAME '(' sum ')'  |  power
//! power    := atom ('^' unary)?
//! atom     := '(' sum ')' | VARIABLE | NUMBER
//! ```
//!
//! `+ - * /` fold left-associatively; `^` is right-recursive through
//! `unary`, so `a^b^c` groups as `a^(b^c)`. A leading sign folds into
//! multiplication by -1 and is consumed at most once per `unary`, which
//! makes a literal `--x` a syntax error (spell it `-(-x)`). The cursor
//! only moves forward; any structural mismatch aborts the whole parse
//! with a [`ParseError::Syntax`] carrying the offending token's source
//! offset and an expectation string - no partial tree is ever returned.
//!
//! # Example
//! ```rust, ignore
//! use RustedTaylor::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("x*x + 2*x").unwrap();
//! println!(" parsed_expression {}", parsed_expression);
//! ```

use crate::symbolic::errors::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::tokenizer::{MathFunction, Token, TokenKind, tokenize};

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        // the End token is always present, so the cursor never runs past it
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn syntax_error(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::Syntax {
            offset: token.offset,
            expected: expected.to_string(),
            found: token.kind.to_string(),
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_term()?;
        loop {
            let kind = self.current().kind.clone();
            match kind {
                TokenKind::Plus => {
                    self.advance();
                    node = Expr::Add(node.boxed(), self.parse_term()?.boxed());
                }
                TokenKind::Minus => {
                    self.advance();
                    node = Expr::Sub(node.boxed(), self.parse_term()?.boxed());
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_unary()?;
        loop {
            let kind = self.current().kind.clone();
            match kind {
                TokenKind::Star => {
                    self.advance();
                    node = Expr::Mul(node.boxed(), self.parse_unary()?.boxed());
                }
                TokenKind::Slash => {
                    self.advance();
                    node = Expr::Div(node.boxed(), self.parse_unary()?.boxed());
                }
                _ => break,
            }
        }
        Ok(node)
    }

    /// At most one leading sign; '-' folds into `(-1) * operand`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let kind = self.current().kind.clone();
        match kind {
            TokenKind::Plus => {
                self.advance();
                self.parse_function()
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_function()?;
                Ok(Expr::Mul(Expr::Const(-1.0).boxed(), operand.boxed()))
            }
            _ => self.parse_function(),
        }
    }

    /// A function name must be followed immediately by a parenthesized
    /// `sum` argument; the produced node holds only the argument subtree.
    fn parse_function(&mut self) -> Result<Expr, ParseError> {
        let kind = self.current().kind.clone();
        let func = match kind {
            TokenKind::Function(func) => func,
            _ => return self.parse_power(),
        };
        self.advance();
        if self.current().kind != TokenKind::OpenBracket {
            return Err(self.syntax_error("'(' after function name"));
        }
        self.advance();
        let argument = self.parse_sum()?;
        if self.current().kind != TokenKind::CloseBracket {
            return Err(self.syntax_error("')'"));
        }
        self.advance();
        Ok(apply_function(func, argument))
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;
        if self.current().kind == TokenKind::Caret {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let kind = self.current().kind.clone();
        match kind {
            TokenKind::OpenBracket => {
                self.advance();
                let inner = self.parse_sum()?;
                if self.current().kind != TokenKind::CloseBracket {
                    return Err(self.syntax_error("')'"));
                }
                self.advance();
                Ok(inner)
            }
            TokenKind::Variable(name) => {
                self.advance();
                Ok(Expr::Var(name))
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Const(value))
            }
            _ => Err(self.syntax_error("a number, a variable or '('")),
        }
    }
}

fn apply_function(func: MathFunction, argument: Expr) -> Expr {
    let arg = argument.boxed();
    match func {
        MathFunction::Sin => Expr::sin(arg),
        MathFunction::Cos => Expr::cos(arg),
        MathFunction::Tan => Expr::tan(arg),
        MathFunction::Cot => Expr::cot(arg),
        MathFunction::Arcsin => Expr::arcsin(arg),
        MathFunction::Arccos => Expr::arccos(arg),
        MathFunction::Arctan => Expr::arctan(arg),
        MathFunction::Arccot => Expr::arccot(arg),
        MathFunction::Ln => Expr::Ln(arg),
        MathFunction::Sqrt => Expr::Sqrt(arg),
    }
}

/// Parses an already-tokenized sequence into an expression tree,
/// requiring the whole input to be consumed.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.parse_sum()?;
    if parser.current().kind != TokenKind::End {
        return Err(parser.syntax_error("end of expression"));
    }
    Ok(node)
}

impl Expr {
    /// Parses a mathematical expression from string representation.
    ///
    /// Converts human-readable mathematical notation into an expression
    /// tree. Supports `+ - * / ^`, parentheses and the function set
    /// `sin cos tan cot arcsin arccos arctan arccot ln sqrt`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x^2 + 2*x + 1").unwrap();
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_tokens(tokenize(input)?)
    }
}
