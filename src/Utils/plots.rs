// tiny module to plot a function tree over a symmetric range

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;

const SAMPLES: usize = 2000;

/// Samples the tree over [-width, width] with the numeric evaluator.
/// Out-of-domain points arrive as the evaluator's 0 sentinel, which is
/// what the original plotting layer drew as well.
pub fn sample_function(expr: &Expr, var: &str, width: i32) -> (Vec<f64>, Vec<f64>) {
    let x = linspace(-(width as f64), width as f64, SAMPLES);
    let y = expr.calc_vector1D(var, &x);
    (x, y)
}

pub fn plots(expr: &Expr, var: &str, width: i32, height: i32, filename: &str, funcname: &str) {
    use plotters::prelude::*;
    let (x, y) = sample_function(expr, var, width);
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).unwrap();

    // Create a chart builder
    let mut chart = ChartBuilder::on(&root_area)
        .caption(funcname, ("sans-serif", 50))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(
            -(width as f64)..width as f64,
            -(height as f64)..height as f64,
        )
        .unwrap();

    // Configure the mesh
    chart
        .configure_mesh()
        .x_desc(var)
        .y_desc(funcname)
        .draw()
        .unwrap();

    // Plot the function
    let series: Vec<(f64, f64)> = x.iter().zip(y.iter()).map(|(&x, &y)| (x, y)).collect();
    chart
        .draw_series(LineSeries::new(series, &Palette99::pick(0)))
        .unwrap()
        .label(format!(" {}", funcname))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &Palette99::pick(0)));

    // Configure the legend
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .unwrap();
}

use gnuplot::{AxesCommon, Caption, Color, Figure};
pub fn plots_gnuplot(
    expr: &Expr,
    var: &str,
    width: i32,
    height: i32,
    filename: &str,
    funcname: &str,
) {
    let (x, y) = sample_function(expr, var, width);
    let mut fg = Figure::new();

    fg.axes2d()
        .set_title(funcname, &[])
        .set_x_label(var, &[])
        .set_y_label(funcname, &[])
        .set_x_range(
            gnuplot::AutoOption::Fix(-(width as f64)),
            gnuplot::AutoOption::Fix(width as f64),
        )
        .set_y_range(
            gnuplot::AutoOption::Fix(-(height as f64)),
            gnuplot::AutoOption::Fix(height as f64),
        )
        .lines(&x, &y, &[Caption(funcname), Color(gnuplot::RGBString("blue"))]);

    // Save the plot to a file
    fg.save_to_png(filename, 800, 600).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_function_covers_range() {
        let expr = Expr::parse_expression("2*x").unwrap();
        let (x, y) = sample_function(&expr, "x", 5);
        assert_eq!(x.len(), SAMPLES);
        assert_eq!(y.len(), SAMPLES);
        approx::assert_relative_eq!(x[0], -5.0);
        approx::assert_relative_eq!(*x.last().unwrap(), 5.0);
        approx::assert_relative_eq!(y[0], -10.0);
    }

    #[test]
    fn test_sample_function_uses_zero_sentinel() {
        // 1/x at the singular point samples as 0, not inf
        let expr = Expr::parse_expression("1/x").unwrap();
        let (x, y) = sample_function(&expr, "x", 1);
        let middle = x.iter().position(|v| v.abs() < 1e-9);
        if let Some(i) = middle {
            assert_eq!(y[i], 0.0);
        }
    }
}
