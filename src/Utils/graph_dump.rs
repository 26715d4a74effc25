// tiny module to dump expression trees as Graphviz files for debugging

use crate::symbolic::symbolic_engine::Expr;
use log::warn;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const NODE_COLOR: &str = "cornflowerblue";
const LEAF_COLOR: &str = "springGreen";
const LEFT_EDGE_COLOR: &str = "red";
const RIGHT_EDGE_COLOR: &str = "green";

const START_GRAPH: &str = "digraph {\n\
\tordering = out\n\n\
node[style = filled, shape = record]\n\n";

/// Context for the dump artifacts: output directory plus the running
/// counter that numbers the files, threaded explicitly instead of living
/// in a global.
pub struct DumpContext {
    out_dir: PathBuf,
    counter: usize,
}

impl DumpContext {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        DumpContext {
            out_dir: out_dir.as_ref().to_path_buf(),
            counter: 1,
        }
    }

    /// Writes `Dump<N>.dot` describing the tree and returns its path.
    /// If the `dot` tool is available an SVG is rendered next to it;
    /// a missing tool is reported and ignored.
    pub fn dump(&mut self, expr: &Expr) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let dot_path = self.out_dir.join(format!("Dump{}.dot", self.counter));
        let svg_path = self.out_dir.join(format!("Dump{}.svg", self.counter));
        self.counter += 1;

        let mut file = fs::File::create(&dot_path)?;
        file.write_all(START_GRAPH.as_bytes())?;
        let mut next_id = 0;
        write_node(&mut file, expr, &mut next_id)?;
        file.write_all(b"}\n")?;

        match Command::new("dot")
            .arg(&dot_path)
            .arg("-T")
            .arg("svg")
            .arg("-o")
            .arg(&svg_path)
            .output()
        {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!("dot exited with {}", output.status),
            Err(err) => warn!("could not run dot: {}", err),
        }

        Ok(dot_path)
    }
}

/// Emits the node statement and the edges to its children, depth-first.
/// Returns the id assigned to this node.
fn write_node(out: &mut fs::File, expr: &Expr, next_id: &mut usize) -> io::Result<usize> {
    let id = *next_id;
    *next_id += 1;

    let (label, is_leaf) = match expr {
        Expr::Const(val) => (format!("{:.2}", val), true),
        Expr::Var(name) => (format!("VAR|{}", name), true),
        Expr::Add(_, _) => ("OP|+".to_string(), false),
        Expr::Sub(_, _) => ("OP|-".to_string(), false),
        Expr::Mul(_, _) => ("OP|*".to_string(), false),
        Expr::Div(_, _) => ("OP|/".to_string(), false),
        Expr::Pow(_, _) => ("OP|^".to_string(), false),
        _ => (format!("OP|{}", expr.function_name().unwrap()), false),
    };
    let color = if is_leaf { LEAF_COLOR } else { NODE_COLOR };
    writeln!(out, "node{} [fillcolor = {}, label = \"{}\"]", id, color, label)?;

    let (left, right) = children(expr);
    if let Some(left) = left {
        let child_id = write_node(out, left, next_id)?;
        writeln!(out, "node{} -> node{} [color = \"{}\"]\n", id, child_id, LEFT_EDGE_COLOR)?;
    }
    if let Some(right) = right {
        let child_id = write_node(out, right, next_id)?;
        writeln!(out, "node{} -> node{} [color = \"{}\"]\n", id, child_id, RIGHT_EDGE_COLOR)?;
    }

    Ok(id)
}

/// Child slots the way the dump walks them: binary operators use both,
/// unary functions only the right one, leaves neither.
fn children(expr: &Expr) -> (Option<&Expr>, Option<&Expr>) {
    match expr {
        Expr::Var(_) | Expr::Const(_) => (None, None),
        Expr::Add(lhs, rhs)
        | Expr::Sub(lhs, rhs)
        | Expr::Mul(lhs, rhs)
        | Expr::Div(lhs, rhs)
        | Expr::Pow(lhs, rhs) => (Some(lhs.as_ref()), Some(rhs.as_ref())),
        Expr::Ln(e)
        | Expr::Sqrt(e)
        | Expr::sin(e)
        | Expr::cos(e)
        | Expr::tan(e)
        | Expr::cot(e)
        | Expr::arcsin(e)
        | Expr::arccos(e)
        | Expr::arctan(e)
        | Expr::arccot(e) => (None, Some(e.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_writes_numbered_dot_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = DumpContext::new(dir.path());
        let expr = Expr::parse_expression("x + sin(y)").unwrap();
        let first = ctx.dump(&expr).unwrap();
        let second = ctx.dump(&expr).unwrap();
        assert!(first.ends_with("Dump1.dot"));
        assert!(second.ends_with("Dump2.dot"));
        let text = fs::read_to_string(first).unwrap();
        assert!(text.starts_with("digraph {"));
        assert!(text.contains("OP|+"));
        assert!(text.contains("VAR|x"));
        assert!(text.contains("OP|sin"));
        assert!(text.contains(LEAF_COLOR));
    }
}
