//! Plain numeric evaluation of an expression tree.
//!
//! This is the interpreter the plotting collaborator samples with. It is
//! deliberately independent of the symbolic machinery: no rewriting, no
//! allocation, just a post-order walk mapping every node onto the
//! corresponding real function. Errors never propagate out of it -
//! division by a numerically-zero value and domain violations (`ln` of a
//! non-positive number, `sqrt` of a negative, inverse trig outside
//! [-1, 1]) all evaluate to the sentinel 0, matching what the renderers
//! expect for out-of-domain samples.

use crate::symbolic::symbolic_engine::{EPSILON, Expr};
use std::f64::consts::PI;

impl Expr {
    /// Evaluates the expression at `value` substituted for `var`.
    ///
    /// Variables with any other name evaluate to 0.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x^2 + 1").unwrap();
    /// assert_eq!(expr.evaluate("x", 2.0), 5.0);
    /// ```
    pub fn evaluate(&self, var: &str, value: f64) -> f64 {
        match self {
            Expr::Var(name) => {
                if name == var {
                    value
                } else {
                    0.0
                }
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.evaluate(var, value) + rhs.evaluate(var, value),
            Expr::Sub(lhs, rhs) => lhs.evaluate(var, value) - rhs.evaluate(var, value),
            Expr::Mul(lhs, rhs) => lhs.evaluate(var, value) * rhs.evaluate(var, value),
            Expr::Div(lhs, rhs) => {
                let denominator = rhs.evaluate(var, value);
                if denominator.abs() < EPSILON {
                    0.0
                } else {
                    lhs.evaluate(var, value) / denominator
                }
            }
            Expr::Pow(base, exp) => base.evaluate(var, value).powf(exp.evaluate(var, value)),
            Expr::Ln(expr) => {
                let arg = expr.evaluate(var, value);
                if arg <= 0.0 { 0.0 } else { arg.ln() }
            }
            Expr::Sqrt(expr) => {
                let arg = expr.evaluate(var, value);
                if arg < 0.0 { 0.0 } else { arg.sqrt() }
            }
            Expr::sin(expr) => expr.evaluate(var, value).sin(),
            Expr::cos(expr) => expr.evaluate(var, value).cos(),
            Expr::tan(expr) => expr.evaluate(var, value).tan(),
            Expr::cot(expr) => {
                let tangent = expr.evaluate(var, value).tan();
                if tangent.abs() < EPSILON {
                    0.0
                } else {
                    1.0 / tangent
                }
            }
            Expr::arcsin(expr) => {
                let arg = expr.evaluate(var, value);
                if arg.abs() > 1.0 { 0.0 } else { arg.asin() }
            }
            Expr::arccos(expr) => {
                let arg = expr.evaluate(var, value);
                if arg.abs() > 1.0 { 0.0 } else { arg.acos() }
            }
            Expr::arctan(expr) => expr.evaluate(var, value).atan(),
            Expr::arccot(expr) => PI / 2.0 - expr.evaluate(var, value).atan(),
        }
    }

    /// Evaluates the expression over a vector of input values.
    pub fn calc_vector1D(&self, var: &str, x: &[f64]) -> Vec<f64> {
        x.iter().map(|xi| self.evaluate(var, *xi)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_polynomial() {
        let expr = Expr::parse_expression("x^2 + 2*x + 1").unwrap();
        approx::assert_relative_eq!(expr.evaluate("x", 2.0), 9.0);
        approx::assert_relative_eq!(expr.evaluate("x", -1.0), 0.0);
    }

    #[test]
    fn test_unmatched_variable_is_zero() {
        let expr = Expr::parse_expression("x + y").unwrap();
        approx::assert_relative_eq!(expr.evaluate("x", 3.0), 3.0);
    }

    #[test]
    fn test_division_by_zero_maps_to_zero() {
        let expr = Expr::parse_expression("1 / x").unwrap();
        assert_eq!(expr.evaluate("x", 0.0), 0.0);
    }

    #[test]
    fn test_domain_errors_map_to_zero() {
        let expr = Expr::parse_expression("ln(x)").unwrap();
        assert_eq!(expr.evaluate("x", -2.0), 0.0);
        assert_eq!(expr.evaluate("x", 0.0), 0.0);
        let expr = Expr::parse_expression("sqrt(x)").unwrap();
        assert_eq!(expr.evaluate("x", -1.0), 0.0);
        let expr = Expr::parse_expression("arcsin(x)").unwrap();
        assert_eq!(expr.evaluate("x", 2.0), 0.0);
    }

    #[test]
    fn test_trig_and_inverse_trig() {
        let expr = Expr::parse_expression("sin(x) + cos(x)").unwrap();
        approx::assert_relative_eq!(expr.evaluate("x", 0.7), 0.7_f64.sin() + 0.7_f64.cos());
        let expr = Expr::parse_expression("arccot(x)").unwrap();
        approx::assert_relative_eq!(expr.evaluate("x", 1.0), PI / 4.0);
    }

    #[test]
    fn test_calc_vector() {
        let expr = Expr::parse_expression("2*x").unwrap();
        assert_eq!(expr.calc_vector1D("x", &[0.0, 1.0, 2.0]), vec![0.0, 2.0, 4.0]);
    }
}
