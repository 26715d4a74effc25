//! # Symbolic Engine Module
//!
//! Core expression-tree type for the whole crate. An expression is an
//! `Expr` enum value: a numeric constant, a named variable or an operator
//! with `Box`-owned children, so arbitrarily deep trees are built from
//! ordinary Rust ownership. Every other module (tokenizer/parser,
//! differentiation, simplification, evaluation, rendering) operates on
//! this type.
//!
//! ## Main structures and methods
//!
//! ### `Expr` enum
//! - **Variables**: `Var(String)` - symbolic variables like "x" (and the
//!   literal name "e", treated as Euler's number by the simplifier)
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - binary arithmetic
//! - **Functions**: `Ln`, `Sqrt`, `sin`, `cos`, `tan`, `cot`, `arcsin`,
//!   `arccos`, `arctan`, `arccot` - unary analytic functions holding only
//!   their argument subtree
//!
//! ### Key methods
//! - `diff(var: &str)` - analytical differentiation (see
//!   symbolic_engine_derivatives)
//! - `simplify()` - constant folding + identity elimination to fixpoint
//!   (see symbolic_simplify)
//! - `evaluate(var, value)` - plain numeric evaluation (see
//!   symbolic_evaluator)
//! - `set_variable(var, value)` - substitute a variable with a number
//! - `contains_variable(var)` / `is_constant(var)` - dependence predicate
//!   used by the power differentiation rule
//!
//! ## Code features
//!
//! 1. **Recursive expression tree**: `Box<Expr>` children give exclusive
//!    ownership; a subtree needed twice is `clone()`d, never aliased
//! 2. **Operator overloading**: std::ops traits (Add, Sub, Mul, Div, Neg)
//!    for natural mathematical syntax: `x + y * z`
//! 3. **Minimal-parenthesization Display**: printing follows the operator
//!    precedence table, so `format!` output re-parses to the same tree

#![allow(non_camel_case_types)]

use std::fmt;

/// Tolerance used everywhere a floating value is compared against an
/// exact constant (zero denominators, integer-ratio tests, identity
/// matching).
pub const EPSILON: f64 = 1e-9;

/// Core symbolic expression enum representing a single-variable
/// mathematical expression as an abstract syntax tree.
///
/// Binary operators own both children, unary functions own only their
/// argument, leaves own nothing. `Clone` performs the deep copy the
/// differentiation rules rely on.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (1..=7 letters, e.g. "x", "e")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Square root: sqrt(x)
    Sqrt(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x)
    tan(Box<Expr>),
    /// Cotangent function: cot(x)
    cot(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x)
    arctan(Box<Expr>),
    /// Arccotangent function: arccot(x)
    arccot(Box<Expr>),
}

impl Expr {
    /// BASIC FEATURES

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    pub fn sqrt(self) -> Expr {
        Expr::Sqrt(self.boxed())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if c.abs() < EPSILON)
    }

    /// Operator precedence used both by the minimal-parenthesization
    /// printer and by the LaTeX renderer: sums bind weakest, then
    /// products, then function application, then power; leaves never
    /// need brackets.
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Ln(_)
            | Expr::Sqrt(_)
            | Expr::sin(_)
            | Expr::cos(_)
            | Expr::tan(_)
            | Expr::cot(_)
            | Expr::arcsin(_)
            | Expr::arccos(_)
            | Expr::arctan(_)
            | Expr::arccot(_) => 3,
            Expr::Pow(_, _) => 4,
            Expr::Var(_) | Expr::Const(_) => 5,
        }
    }

    /// Name of a unary function variant as it appears in source text.
    pub fn function_name(&self) -> Option<&'static str> {
        match self {
            Expr::Ln(_) => Some("ln"),
            Expr::Sqrt(_) => Some("sqrt"),
            Expr::sin(_) => Some("sin"),
            Expr::cos(_) => Some("cos"),
            Expr::tan(_) => Some("tan"),
            Expr::cot(_) => Some("cot"),
            Expr::arcsin(_) => Some("arcsin"),
            Expr::arccos(_) => Some("arccos"),
            Expr::arctan(_) => Some("arctan"),
            Expr::arccot(_) => Some("arccot"),
            _ => None,
        }
    }

    /// Checks whether a variable with the given name occurs anywhere in
    /// the expression. The power rule dispatches on this.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            Expr::Ln(expr)
            | Expr::Sqrt(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tan(expr)
            | Expr::cot(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctan(expr)
            | Expr::arccot(expr) => expr.contains_variable(var_name),
        }
    }

    /// A subtree is constant with respect to `var_name` iff no variable
    /// leaf in it matches that name.
    pub fn is_constant(&self, var_name: &str) -> bool {
        !self.contains_variable(var_name)
    }

    /// Substitutes a variable with a numerical value, replacing every
    /// matching `Var` leaf with a `Const` leaf. Returns a new tree; the
    /// input is untouched.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x + 2").unwrap();
    /// let at_one = expr.set_variable("x", 1.0); // 1 + 2
    /// ```
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(value)
                } else {
                    self.clone()
                }
            }
            Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(
                lhs.set_variable(var, value).boxed(),
                rhs.set_variable(var, value).boxed(),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                lhs.set_variable(var, value).boxed(),
                rhs.set_variable(var, value).boxed(),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                lhs.set_variable(var, value).boxed(),
                rhs.set_variable(var, value).boxed(),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                lhs.set_variable(var, value).boxed(),
                rhs.set_variable(var, value).boxed(),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                base.set_variable(var, value).boxed(),
                exp.set_variable(var, value).boxed(),
            ),
            Expr::Ln(expr) => Expr::Ln(expr.set_variable(var, value).boxed()),
            Expr::Sqrt(expr) => Expr::Sqrt(expr.set_variable(var, value).boxed()),
            Expr::sin(expr) => Expr::sin(expr.set_variable(var, value).boxed()),
            Expr::cos(expr) => Expr::cos(expr.set_variable(var, value).boxed()),
            Expr::tan(expr) => Expr::tan(expr.set_variable(var, value).boxed()),
            Expr::cot(expr) => Expr::cot(expr.set_variable(var, value).boxed()),
            Expr::arcsin(expr) => Expr::arcsin(expr.set_variable(var, value).boxed()),
            Expr::arccos(expr) => Expr::arccos(expr.set_variable(var, value).boxed()),
            Expr::arctan(expr) => Expr::arctan(expr.set_variable(var, value).boxed()),
            Expr::arccot(expr) => Expr::arccot(expr.set_variable(var, value).boxed()),
        }
    }

    /// Collects all unique variable names of the expression, sorted.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Expr::Var(name) => out.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Expr::Ln(expr)
            | Expr::Sqrt(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tan(expr)
            | Expr::cot(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctan(expr)
            | Expr::arccot(expr) => expr.collect_variables(out),
        }
    }
}

/// Display implementation printing human-readable mathematical notation
/// with the minimum parentheses required to re-parse to the same tree:
/// a child is bracketed when its precedence is lower than the parent's,
/// when it sits on the right of a same-precedence `+ - * /` chain (the
/// parser folds those left-associatively), or when it is the base of `^`
/// and not a plain leaf (the grammar allows only atoms there).
/// `Mul(Const(-1), x)` prints as the unary-minus form `-x`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn write_child(
            f: &mut fmt::Formatter,
            child: &Expr,
            parent: u8,
            right: bool,
        ) -> fmt::Result {
            let negative_const = matches!(child, Expr::Const(c) if *c < 0.0);
            // the unary-minus form prints as `-…`, which the grammar
            // accepts wherever a `unary` production is expected
            let neg_form = matches!(child, Expr::Mul(l, _) if matches!(l.as_ref(), Expr::Const(c) if *c == -1.0));
            let prec = if neg_form { 3 } else { child.precedence() };
            // a sign cannot directly follow `-` or `^`'s implicit sign
            // slot twice, so a neg-form child at that level is bracketed
            if prec < parent || (prec == parent && right) || negative_const || (neg_form && parent == 3) {
                write!(f, "({})", child)
            } else {
                write!(f, "{}", child)
            }
        }

        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            // unary-minus form produced by the parser and by Neg
            Expr::Mul(lhs, rhs) if matches!(lhs.as_ref(), Expr::Const(c) if *c == -1.0) => {
                write!(f, "-")?;
                write_child(f, rhs, 3, false)
            }
            Expr::Add(lhs, rhs) => {
                write_child(f, lhs, 1, false)?;
                write!(f, " + ")?;
                write_child(f, rhs, 1, true)
            }
            Expr::Sub(lhs, rhs) => {
                write_child(f, lhs, 1, false)?;
                write!(f, " - ")?;
                write_child(f, rhs, 1, true)
            }
            Expr::Mul(lhs, rhs) => {
                write_child(f, lhs, 2, false)?;
                write!(f, " * ")?;
                write_child(f, rhs, 2, true)
            }
            Expr::Div(lhs, rhs) => {
                write_child(f, lhs, 2, false)?;
                write!(f, " / ")?;
                write_child(f, rhs, 2, true)
            }
            Expr::Pow(base, exp) => {
                // the grammar admits only atoms as a power base
                if matches!(base.as_ref(), Expr::Var(_))
                    || matches!(base.as_ref(), Expr::Const(c) if *c >= 0.0)
                {
                    write!(f, "{}", base)?;
                } else {
                    write!(f, "({})", base)?;
                }
                write!(f, "^")?;
                write_child(f, exp, 3, false)
            }
            _ => {
                let arg = match self {
                    Expr::Ln(e)
                    | Expr::Sqrt(e)
                    | Expr::sin(e)
                    | Expr::cos(e)
                    | Expr::tan(e)
                    | Expr::cot(e)
                    | Expr::arcsin(e)
                    | Expr::arccos(e)
                    | Expr::arctan(e)
                    | Expr::arccot(e) => e,
                    _ => unreachable!(),
                };
                write!(f, "{}({})", self.function_name().unwrap(), arg)
            }
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = Expr::Add(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = Expr::Mul(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_operator_overloads() {
        let expr = x() + Expr::Const(2.0);
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
        let expr = x() * Expr::Const(3.0) - Expr::Const(1.0);
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Mul(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Const(3.0))
                )),
                Box::new(Expr::Const(1.0))
            )
        );
    }

    #[test]
    fn test_neg_builds_minus_one_product() {
        let neg_expr = -x();
        assert_eq!(
            neg_expr,
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Var("x".to_string()))
            )
        );
    }

    #[test]
    fn test_display_minimal_parens() {
        let expr = (x() + Expr::Const(1.0)) * Expr::Const(2.0);
        assert_eq!(format!("{}", expr), "(x + 1) * 2");

        let expr = x() + Expr::Const(1.0) * Expr::Const(2.0);
        assert_eq!(format!("{}", expr), "x + 1 * 2");

        let expr = x() - (x() + Expr::Const(1.0));
        assert_eq!(format!("{}", expr), "x - (x + 1)");

        let expr = Expr::sin(x().boxed()).pow(Expr::Const(2.0));
        assert_eq!(format!("{}", expr), "(sin(x))^2");

        let expr = x().pow(Expr::Const(2.0));
        assert_eq!(format!("{}", expr), "x^2");
    }

    #[test]
    fn test_display_unary_minus_form() {
        assert_eq!(format!("{}", -x()), "-x");
        assert_eq!(format!("{}", -(x() + Expr::Const(1.0))), "-(x + 1)");
        assert_eq!(format!("{}", x() * (-x())), "x * -x");
    }

    #[test]
    fn test_contains_variable() {
        let expr = Expr::sin(Box::new(x() * Expr::Var("y".to_string())));
        assert!(expr.contains_variable("x"));
        assert!(expr.contains_variable("y"));
        assert!(!expr.contains_variable("z"));
        assert!(expr.is_constant("z"));
    }

    #[test]
    fn test_set_variable() {
        let expr = x() * x() + Expr::Var("y".to_string());
        let substituted = expr.set_variable("x", 2.0);
        assert_eq!(
            substituted,
            Expr::Const(2.0) * Expr::Const(2.0) + Expr::Var("y".to_string())
        );
        // original untouched
        assert!(expr.contains_variable("x"));
    }

    #[test]
    fn test_all_arguments_are_variables() {
        let expr = x() + Expr::Var("y".to_string()) * x();
        assert_eq!(expr.all_arguments_are_variables(), vec!["x", "y"]);
    }
}
