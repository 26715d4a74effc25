#![allow(non_snake_case)]
pub mod Utils;
pub mod symbolic;

use crate::Utils::graph_dump::DumpContext;
use crate::Utils::latex::LatexDocument;
use crate::Utils::logger::init_logging;
use crate::Utils::plots::plots_gnuplot;
use crate::Utils::task_parser::parse_task_file;
use crate::symbolic::symbolic_engine::Expr;
use log::info;
use std::env;
use std::process::ExitCode;

// Demo driver: read a task file, differentiate the function, expand it
// into a Taylor polynomial around the given point and emit the LaTeX
// document, tree dumps and a plot.
//
// task file format:
//   func: sin(x)/x
//   point: 0.5
//   count: 5
//   width: 10
//   height: 5
fn main() -> ExitCode {
    let task_path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: RustedTaylor <task-file>");
            return ExitCode::FAILURE;
        }
    };

    init_logging(None);

    let task = match parse_task_file(&task_path) {
        Ok(task) => task,
        Err(err) => {
            eprintln!("task ingestion failed: {}", err);
            return ExitCode::FAILURE;
        }
    };
    info!("task: {:?}", task);

    let var = "x";
    let function = match Expr::parse_expression(&task.func) {
        Ok(expr) => expr,
        Err(err) => {
            eprintln!("{}", err.report(&task.func));
            return ExitCode::FAILURE;
        }
    };
    println!("f({}) = {}", var, function);

    let mut dumps = DumpContext::new("./DumpFiles");
    let _ = dumps.dump(&function);

    let derivative = function.diff(var).simplify();
    println!("f'({}) = {}", var, derivative);
    let _ = dumps.dump(&derivative);

    let taylor = function.taylor_series1D(var, task.point, task.count);
    println!(
        "Taylor around {} up to order {}: {}",
        task.point, task.count, taylor
    );

    let mut doc = match LatexDocument::create("./Differentiator.tex") {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("cannot create tex file: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let write_result = doc
        .add_expression("f(x) = ", &function)
        .and_then(|_| doc.add_expression("f'(x) = ", &derivative))
        .and_then(|_| doc.add_taylor("f(x) = ", &taylor, var, task.point, task.count));
    match write_result.and_then(|_| doc.close()) {
        Ok(path) => {
            info!("tex written to {:?}", path);
            Utils::latex::render_pdf(&path);
        }
        Err(err) => eprintln!("tex emission failed: {}", err),
    }

    plots_gnuplot(
        &function,
        var,
        task.width,
        task.height,
        "Plot1.png",
        &task.func,
    );
    plots_gnuplot(
        &taylor,
        var,
        task.width,
        task.height,
        "Plot2.png",
        "taylor polynomial",
    );

    info!("Program ended");
    ExitCode::SUCCESS
}
