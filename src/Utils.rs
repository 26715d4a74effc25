//! different utility modules around the symbolic core
/// tiny module to set up terminal + file logging
pub mod logger;
/// tiny module to render trees into a LaTeX document (and pdflatex it)
pub mod latex;
/// tiny module to dump trees as Graphviz files
pub mod graph_dump;
/// tiny module to plot a function tree with gnuplot or plotters
pub mod plots;
/// parse a problem-description document with `key: value` lines into a TaskSpec
pub mod task_parser;
