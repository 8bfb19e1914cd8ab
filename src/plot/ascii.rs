//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted line / zero line: `-`
//! - optional extra candidate lines: `.`
//! - histogram bars: `#`

use crate::domain::{ModelParams, ResidualRow};
use crate::models::predict_at;

/// Scatter of the observations with the fitted line and, optionally, other
/// candidate lines underneath it.
pub fn render_fit_plot(
    rows: &[ResidualRow],
    fit: &ModelParams,
    others: &[ModelParams],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (x_min, x_max) = x_range(rows).unwrap_or((0.0, 1.0));

    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.x, r.y)).collect();
    let mut lines: Vec<(Vec<(f64, f64)>, char)> = others
        .iter()
        .map(|p| (sample_line(p, x_min, x_max, width), '.'))
        .collect();
    lines.push((sample_line(fit, x_min, x_max, width), '-'));

    // Extra candidates can be far off; keep the frame on the data and the fit.
    let frame: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .chain(lines.last().map(|l| l.0.clone()).unwrap_or_default())
        .collect();
    let (y_min, y_max) = y_range(&frame).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut out = format!("Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n");
    out.push_str(&render_grid(&points, &lines, (x_min, x_max), (y_min, y_max), width, height));
    out
}

/// Residual against x, with the zero line.
pub fn render_residual_plot(rows: &[ResidualRow], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (x_min, x_max) = x_range(rows).unwrap_or((0.0, 1.0));

    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.x, r.residual)).collect();
    let zero = vec![(x_min, 0.0), (x_max, 0.0)];

    let frame: Vec<(f64, f64)> = points.iter().copied().chain(zero.iter().copied()).collect();
    let (y_min, y_max) = y_range(&frame).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut out = format!("Residuals: x=[{x_min:.3}, {x_max:.3}] | r=[{y_min:.2}, {y_max:.2}]\n");
    out.push_str(&render_grid(
        &points,
        &[(zero, '-')],
        (x_min, x_max),
        (y_min, y_max),
        width,
        height,
    ));
    out
}

/// Horizontal histogram of residuals; the last bin is closed on the right.
pub fn render_residual_histogram(residuals: &[f64], bins: usize, width: usize) -> String {
    let finite: Vec<f64> = residuals.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return format!("Residuals: n={}\n", residuals.len());
    }
    let bins = bins.max(1);
    let width = width.max(1);

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let bin_width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - lo) / bin_width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let mut out = format!("Residuals: n={}, bins={bins}\n", finite.len());
    for (i, &count) in counts.iter().enumerate() {
        let b_lo = lo + bin_width * i as f64;
        let b_hi = if i + 1 == bins { hi } else { lo + bin_width * (i + 1) as f64 };
        let bar_len = (count * width + max_count / 2) / max_count;
        let bar = "#".repeat(bar_len);
        out.push_str(&format!("{b_lo:>9.3} .. {b_hi:>9.3} | {bar} {count}\n"));
    }
    out
}

fn render_grid(
    points: &[(f64, f64)],
    lines: &[(Vec<(f64, f64)>, char)],
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
    width: usize,
    height: usize,
) -> String {
    let mut grid = vec![vec![' '; width]; height];

    // Lines first (so points can overlay); later lines win over earlier ones.
    for (line, ch) in lines {
        draw_polyline(&mut grid, line, *ch, (x_min, x_max), (y_min, y_max));
    }

    for &(x, y) in points {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn x_range(rows: &[ResidualRow]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for r in rows {
        min_x = min_x.min(r.x);
        max_x = max_x.max(r.x);
    }
    if !(min_x.is_finite() && max_x.is_finite()) {
        return None;
    }
    if max_x > min_x {
        Some((min_x, max_x))
    } else {
        Some((min_x - 0.5, max_x + 0.5))
    }
}

fn sample_line(params: &ModelParams, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, predict_at(params, x))
        })
        .collect()
}

fn y_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && min_y == max_y {
        Some((min_y - 0.5, max_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Draw a polyline, clipping segments that leave the frame vertically.
fn draw_polyline(
    grid: &mut [Vec<char>],
    line: &[(f64, f64)],
    ch: char,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) {
    let height = grid.len();
    let width = grid[0].len();
    let inside = |y: f64| y.is_finite() && y >= y_min && y <= y_max;

    let mut prev: Option<(usize, usize)> = None;
    for &(x, y) in line {
        if !inside(y) {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None => grid[row][col] = ch,
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64, y: f64, y_fit: f64) -> ResidualRow {
        ResidualRow {
            x,
            y,
            y_fit,
            residual: y - y_fit,
        }
    }

    #[test]
    fn fit_plot_golden_snapshot_small() {
        let rows = [row(1.0, 100.0, 100.0), row(10.0, 110.0, 100.0)];
        let txt = render_fit_plot(&rows, &ModelParams::new(100.0, 0.0), &[], 10, 5);
        let expected = concat!(
            "Plot: x=[1.000, 10.000] | y=[99.50, 110.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn residual_plot_has_zero_line() {
        let rows = [row(0.0, 1.0, 0.0), row(4.0, -1.0, 0.0)];
        let txt = render_residual_plot(&rows, 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "o         ");
        assert_eq!(lines[3], "----------");
        assert_eq!(lines[5], "         o");
    }

    #[test]
    fn histogram_counts_and_scales_bars() {
        let txt = render_residual_histogram(&[-1.0, -0.5, 0.0, 0.5, 1.0, 1.0], 2, 8);
        let expected = concat!(
            "Residuals: n=6, bins=2\n",
            "   -1.000 ..     0.000 | #### 2\n",
            "    0.000 ..     1.000 | ######## 4\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn histogram_handles_constant_and_empty_input() {
        let txt = render_residual_histogram(&[0.25, 0.25], 3, 4);
        assert!(txt.starts_with("Residuals: n=2, bins=3\n"));
        assert_eq!(render_residual_histogram(&[], 3, 4), "Residuals: n=0\n");
    }

    #[test]
    fn off_frame_candidates_do_not_panic() {
        let rows = [row(1.0, 1.0, 1.0), row(2.0, 2.0, 2.0)];
        let far = [ModelParams::new(1e6, -1e6), ModelParams::new(f64::NAN, 0.0)];
        let txt = render_fit_plot(&rows, &ModelParams::new(0.0, 1.0), &far, 20, 6);
        assert_eq!(txt.lines().count(), 7);
    }
}
