//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation and Taylor expansion for [`Expr`] trees.
//!
//! ## Purpose
//!
//! - **Analytical differentiation**: `diff` implements the calculus rules
//!   (sum, product, quotient, chain) by structural recursion. The input
//!   tree is never mutated; a subexpression needed in two places is deep
//!   copied, never aliased.
//! - **Higher derivatives**: `n_th_derivative1D` repeats
//!   differentiate-then-simplify.
//! - **Taylor expansion**: `taylor_series1D` builds the truncated Taylor
//!   polynomial around a point by iterated differentiation, substitution
//!   and simplification.
//!
//! ## Code features
//!
//! 1. **Recursive differentiation rules**: exhaustive match over the
//!    expression variants; the function is total - there is no error path
//! 2. **Power-rule classification**: `Pow(u, v)` dispatches on which
//!    operands depend on the variable; when both do, the generalized
//!    logarithmic rule `d(u^v) = u^v * d(v * ln(u))` is applied
//! 3. **Incremental Taylor terms**: each monomial reuses the running
//!    derivative instead of re-deriving from scratch

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::factorial;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect
    /// to a variable.
    ///
    /// Implements the standard rules of calculus:
    /// - Sum rule: d(u + v) = d(u) + d(v)
    /// - Product rule: d(u * v) = d(u)*v + u*d(v)
    /// - Quotient rule: d(u / v) = (d(u)*v - u*d(v)) / (v*v)
    /// - Chain rule through every unary function
    /// - Power/exponential rules chosen by operand classification
    ///
    /// # Arguments
    /// * `var` - Variable name to differentiate with respect to
    ///
    /// # Returns
    /// New expression tree representing the derivative; the receiver is
    /// left untouched.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2").unwrap();
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) => {
                match (base.is_constant(var), exp.is_constant(var)) {
                    // a^b with both sides constant in `var`
                    (true, true) => Expr::Const(0.0),
                    // power rule: d(u^c) = c * u^(c-1) * d(u)
                    (false, true) => Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    ),
                    // exponential rule: d(c^v) = c^v * ln(c) * d(v)
                    (true, false) => Expr::Mul(
                        Box::new(Expr::Mul(
                            Box::new(Expr::Pow(base.clone(), exp.clone())),
                            Box::new(Expr::Ln(base.clone())),
                        )),
                        Box::new(exp.diff(var)),
                    ),
                    // logarithmic differentiation: d(u^v) = u^v * d(v * ln(u))
                    (false, false) => {
                        let w = Expr::Mul(exp.clone(), Box::new(Expr::Ln(base.clone())));
                        Expr::Mul(Box::new(self.clone()), Box::new(w.diff(var)))
                    }
                }
            }
            Expr::Ln(expr) => Expr::Mul(
                Box::new(Expr::Div(Box::new(Expr::Const(1.0)), expr.clone())),
                Box::new(expr.diff(var)),
            ),
            Expr::Sqrt(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Mul(
                        Box::new(Expr::Const(2.0)),
                        Box::new(Expr::Sqrt(expr.clone())),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tan(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::cot(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Sqrt(Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )))),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arccos(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Sqrt(Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )))),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arctan(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Add(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arccot(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Add(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
        }
    } // end of diff

    /// Computes the nth derivative of a single-variable expression by
    /// repeatedly applying differentiation and simplification.
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.clone();
        let mut i = 0;
        while i < n {
            expr = expr.diff(var_name).simplify();
            i += 1;
        }
        expr.simplify()
    }

    /// TAYLOR SERIES EXPANSION

    /// Computes the Taylor polynomial of the expression around a point.
    ///
    /// Generates the polynomial approximation
    /// f(x) ≈ Σ_{i=0}^{order} f^(i)(x0)/i! * (x - x0)^i
    /// by keeping a running "current derivative" tree: every term
    /// differentiates it once, substitutes the expansion point into a
    /// copy, scales by 1/i! and multiplies by (x - x0)^i. Each monomial
    /// and the running sum are simplified as they are built, so constant
    /// terms fold away immediately.
    ///
    /// # Arguments
    /// * `var_name` - Variable for expansion
    /// * `x0` - Expansion point
    /// * `order` - Maximum order of expansion
    ///
    /// # Returns
    /// Symbolic polynomial approximating the original function. The
    /// little-o remainder is a rendering concern (see Utils::latex), not
    /// part of the returned tree.
    pub fn taylor_series1D(&self, var_name: &str, x0: f64, order: usize) -> Expr {
        let x = Expr::Var(var_name.to_owned());
        let mut derivative = self.simplify();
        let mut taylor = derivative.set_variable(var_name, x0).simplify();

        for i in 1..=order {
            derivative = derivative.diff(var_name).simplify();
            let coefficient = derivative.set_variable(var_name, x0);
            let monomial = Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(coefficient),
                    Box::new(Expr::Const(factorial(i))),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(Box::new(x.clone()), Box::new(Expr::Const(x0)))),
                    Box::new(Expr::Const(i as f64)),
                )),
            )
            .simplify();
            taylor = Expr::Add(Box::new(taylor), Box::new(monomial)).simplify();
        }

        taylor
    }
}
