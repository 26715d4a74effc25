// tiny module to render expression trees into a LaTeX document and
// optionally compile it with pdflatex

use crate::symbolic::symbolic_engine::Expr;
use log::warn;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const START_LATEX: &str = "\\documentclass{article}\n\
\\usepackage[utf8]{inputenc}\n\
\\usepackage[left=0.5cm, right=0.5cm]{geometry}\n\n\
\\begin{document}\n\
\\begin{center}\n\n";

const END_LATEX: &str = "\\end{center}\n\\end{document}\n";

/// Renders a tree as a typeset math string. Fractions use `\frac`, so a
/// division never needs brackets of its own; everywhere else a child is
/// bracketed when its precedence is below the parent's, following the
/// same table the plain-text printer uses.
pub fn latex_string(expr: &Expr) -> String {
    fn child(expr: &Expr, parent: u8) -> String {
        if expr.precedence() < parent {
            format!("\\left({}\\right)", latex_string(expr))
        } else {
            latex_string(expr)
        }
    }

    match expr {
        Expr::Var(name) => name.clone(),
        Expr::Const(val) => format!("{}", val),
        Expr::Add(lhs, rhs) => format!("{} + {}", child(lhs, 1), child(rhs, 1)),
        Expr::Sub(lhs, rhs) => format!("{} - {}", child(lhs, 1), child(rhs, 2)),
        Expr::Mul(lhs, rhs) => {
            if matches!(lhs.as_ref(), Expr::Const(c) if *c == -1.0) {
                format!("-{}", child(rhs, 3))
            } else {
                format!("{} \\cdot {}", child(lhs, 2), child(rhs, 3))
            }
        }
        Expr::Div(lhs, rhs) => {
            format!("\\frac{{{}}}{{{}}}", latex_string(lhs), latex_string(rhs))
        }
        Expr::Pow(base, exp) => {
            let base_str = if matches!(base.as_ref(), Expr::Var(_))
                || matches!(base.as_ref(), Expr::Const(c) if *c >= 0.0)
            {
                latex_string(base)
            } else {
                format!("\\left({}\\right)", latex_string(base))
            };
            format!("{{{}}}^{{{}}}", base_str, latex_string(exp))
        }
        Expr::Ln(e) => format!("\\ln\\left({}\\right)", latex_string(e)),
        Expr::Sqrt(e) => format!("\\sqrt{{{}}}", latex_string(e)),
        Expr::sin(e) => format!("\\sin\\left({}\\right)", latex_string(e)),
        Expr::cos(e) => format!("\\cos\\left({}\\right)", latex_string(e)),
        Expr::tan(e) => format!("\\tan\\left({}\\right)", latex_string(e)),
        Expr::cot(e) => format!("\\cot\\left({}\\right)", latex_string(e)),
        Expr::arcsin(e) => format!("\\arcsin\\left({}\\right)", latex_string(e)),
        Expr::arccos(e) => format!("\\arccos\\left({}\\right)", latex_string(e)),
        Expr::arctan(e) => format!("\\arctan\\left({}\\right)", latex_string(e)),
        Expr::arccot(e) => format!("arccot\\left({}\\right)", latex_string(e)),
    }
}

/// A LaTeX document under construction. Created with the preamble
/// already written; expressions are appended as display formulas and
/// `close` writes the epilogue.
pub struct LatexDocument {
    out: File,
    path: PathBuf,
}

impl LatexDocument {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut out = File::create(&path)?;
        out.write_all(START_LATEX.as_bytes())?;
        Ok(LatexDocument { out, path })
    }

    /// Appends `$$prefix expr$$`, e.g. prefix `"f(x) = "`.
    pub fn add_expression(&mut self, prefix: &str, expr: &Expr) -> io::Result<()> {
        writeln!(self.out, "$${}{}$$\n", prefix, latex_string(expr))
    }

    /// Appends a Taylor polynomial with its display-only little-o
    /// remainder, `$$prefix P(x) + o((x - a)^n)$$`. The remainder is an
    /// annotation of the rendering layer; it is not part of the tree.
    pub fn add_taylor(
        &mut self,
        prefix: &str,
        taylor: &Expr,
        var_name: &str,
        x0: f64,
        order: usize,
    ) -> io::Result<()> {
        let offset = if x0 == 0.0 {
            var_name.to_string()
        } else {
            format!("({} - {})", var_name, x0)
        };
        writeln!(
            self.out,
            "$${}{} + o\\left({{{}}}^{{{}}}\\right)$$\n",
            prefix,
            latex_string(taylor),
            offset,
            order
        )
    }

    /// Writes the epilogue and returns the document path.
    pub fn close(mut self) -> io::Result<PathBuf> {
        self.out.write_all(END_LATEX.as_bytes())?;
        Ok(self.path)
    }
}

/// Runs pdflatex on a finished document. Failure to spawn or a non-zero
/// exit is reported and swallowed: typesetting is best-effort.
pub fn render_pdf(path: &Path) {
    let output_dir = path.parent().unwrap_or(Path::new("."));
    match Command::new("pdflatex")
        .arg("-interaction=nonstopmode")
        .arg("-output-directory")
        .arg(output_dir)
        .arg(path)
        .output()
    {
        Ok(output) if output.status.success() => {}
        Ok(output) => warn!("pdflatex exited with {}", output.status),
        Err(err) => warn!("could not run pdflatex: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latex_fraction_and_power() {
        let expr = Expr::parse_expression("(x + 1) / x^2").unwrap();
        assert_eq!(latex_string(&expr), "\\frac{x + 1}{{x}^{2}}");
    }

    #[test]
    fn test_latex_brackets_follow_precedence() {
        let expr = Expr::parse_expression("(x + y) * 2").unwrap();
        assert_eq!(latex_string(&expr), "\\left(x + y\\right) \\cdot 2");
        let expr = Expr::parse_expression("x + y * 2").unwrap();
        assert_eq!(latex_string(&expr), "x + y \\cdot 2");
    }

    #[test]
    fn test_latex_functions() {
        let expr = Expr::parse_expression("sin(x) + sqrt(x)").unwrap();
        assert_eq!(
            latex_string(&expr),
            "\\sin\\left(x\\right) + \\sqrt{x}"
        );
    }

    #[test]
    fn test_latex_unary_minus() {
        let expr = Expr::parse_expression("-x").unwrap();
        assert_eq!(latex_string(&expr), "-x");
    }

    #[test]
    fn test_document_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tex");
        let expr = Expr::parse_expression("x^2").unwrap();
        let mut doc = LatexDocument::create(&path).unwrap();
        doc.add_expression("f(x) = ", &expr).unwrap();
        doc.add_taylor("f(x) = ", &expr, "x", 0.0, 2).unwrap();
        let written = doc.close().unwrap();
        let text = std::fs::read_to_string(written).unwrap();
        assert!(text.starts_with("\\documentclass"));
        assert!(text.contains("$$f(x) = {x}^{2}$$"));
        assert!(text.contains("o\\left({x}^{2}\\right)"));
        assert!(text.trim_end().ends_with("\\end{document}"));
    }
}
