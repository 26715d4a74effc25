#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into tokens with source offsets
pub mod tokenizer;
/// error types for lexing and parsing, with offset + caret reporting
pub mod errors;
/// a module turns a token sequence into a symbolic expression tree
///# Example
/// ```
/// use RustedTaylor::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x*x + 2*x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree type used by the whole crate
/// 2) substitutes variables with numbers and inspects variable usage
/// 3) prints a tree back to a string with minimal parentheses
///# Example#
/// ```
/// use RustedTaylor::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 + sin(x)").unwrap();
/// // differentiate with respect to x and reduce
/// let df_dx = parsed_expression.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
/// // substitute and evaluate numerically
/// let at_two = df_dx.evaluate("x", 2.0);
/// println!("df_dx(2) = {}", at_two);
/// // expand into a Taylor polynomial around 0
/// let taylor = parsed_expression.taylor_series1D("x", 0.0, 5);
/// println!("taylor = {}", taylor);
/// ```
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// constant folding and identity elimination driven to a joint fixpoint
pub mod symbolic_simplify;
/// plain numeric interpreter of a tree, used by the plotting collaborator
pub mod symbolic_evaluator;
///______________________________________________________________________________________________________________________________________________
/// the collection of small numeric helpers (linspace, factorial)
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
