use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

use crate::data::circle::CircleDataset;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::TwoLayerNetwork;
use crate::visual::label::{draw_centered, draw_title};
use crate::visual::visual_config::VisualConfig;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Samples labelled +1.
pub const RED: Rgba<u8> = Rgba([214, 39, 40, 255]);
/// Samples labelled -1.
pub const BLUE: Rgba<u8> = Rgba([31, 119, 180, 255]);
/// Region where the network output is positive.
pub const WARM: Rgba<u8> = Rgba([244, 165, 130, 255]);
/// Region where the network output is zero or negative.
pub const COOL: Rgba<u8> = Rgba([146, 197, 222, 255]);
pub const NODE: Rgba<u8> = Rgba([40, 70, 200, 255]);
pub const EDGE: Rgba<u8> = Rgba([128, 0, 128, 255]);
pub const AXIS: Rgba<u8> = Rgba([170, 170, 170, 255]);
/// Feature surface wireframe.
pub const SURFACE: Rgba<u8> = Rgba([90, 110, 235, 255]);
/// Decision hyperplane wireframe.
pub const PLANE: Rgba<u8> = Rgba([235, 90, 90, 255]);

const AZIMUTH_DEG: f64 = -60.0;
const ELEVATION_DEG: f64 = 30.0;
/// Pixels of edge width per unit of |weight| on a 300 px panel.
const EDGE_SCALE: f64 = 2.0;
/// Lattice points per axis of the feature surface and hyperplane.
const SURFACE_RESOLUTION: usize = 30;
/// Margin added around the data when sizing the hidden-space box.
const SURFACE_MARGIN: f64 = 0.5;
/// Surface heights above this percentile are clipped.
const SURFACE_CLIP_PERCENTILE: f64 = 95.0;

/// Maps a rectangle of data coordinates onto a square pixel panel, y up.
struct Viewport {
    x: (f64, f64),
    y: (f64, f64),
    size: u32,
}

impl Viewport {
    fn square(extent: f64, size: u32) -> Viewport {
        Viewport { x: (-extent, extent), y: (-extent, extent), size }
    }

    fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let s = self.size.saturating_sub(1) as f64;
        let px = (x - self.x.0) / (self.x.1 - self.x.0) * s;
        let py = (1.0 - (y - self.y.0) / (self.y.1 - self.y.0)) * s;
        (px as f32, py as f32)
    }
}

/// Axis-aligned box of the hidden-space plot, mapped onto `[-1, 1]³` before
/// projection.
struct Scene {
    x: (f64, f64),
    y: (f64, f64),
    z: (f64, f64),
}

impl Scene {
    fn project(&self, p: [f64; 3]) -> (f64, f64) {
        let unit = |v: f64, (lo, hi): (f64, f64)| 2.0 * (v - lo) / (hi - lo) - 1.0;
        project([unit(p[0], self.x), unit(p[1], self.y), unit(p[2], self.z)])
    }
}

/// Renders the three panels side by side: hidden space, input space, weights.
/// Each panel carries a title with the number of completed steps.
pub fn render_frame(
    network: &TwoLayerNetwork,
    data: &CircleDataset,
    config: &VisualConfig,
    step: usize,
) -> Result<RgbaImage> {
    let size = config.panel_size;
    let mut panels = [
        render_hidden_panel(network, data, size)?,
        render_input_panel(network, data, size, config.grid_resolution, config.grid_extent)?,
        render_weight_panel(network, size)?,
    ];
    let titles = [
        format!("Hidden Space (Step {step})"),
        format!("Input Space (Step {step})"),
        format!("Weights (Step {step})"),
    ];
    for (panel, title) in panels.iter_mut().zip(&titles) {
        draw_title(panel, title)?;
    }

    let mut frame = RgbaImage::from_pixel(size * 3, size, WHITE);
    for (i, panel) in panels.iter().enumerate() {
        imageops::overlay(&mut frame, panel, i as i64 * size as i64, 0);
    }
    Ok(frame)
}

/// Hidden space in an orthographic 3-D view over the data bounds:
///
/// - the feature surface, i.e. the norm of the column-normalized hidden
///   activations on a lattice over the inputs, clipped at its 95th percentile;
/// - the output unit's decision hyperplane
///   `z = (-w2[0]·x - w2[1]·y - b2) / w2[2]` over the same lattice;
/// - the cached hidden activations of the training batch (first three
///   units), coloured by label.
///
/// Heights outside the box are clamped to it.
pub fn render_hidden_panel(
    network: &TwoLayerNetwork,
    data: &CircleDataset,
    size: u32,
) -> Result<RgbaImage> {
    check_panel_size(size)?;
    let hidden_dim = network.config().hidden_dim;
    if hidden_dim < 3 {
        return Err(Error::Configuration(format!(
            "hidden space rendering needs hidden_dim >= 3, got {hidden_dim}"
        )));
    }
    let a1 = &network.cache().ok_or(Error::MissingForward)?.a1;
    if a1.rows != data.len() {
        return Err(Error::mismatch("render_hidden", a1.shape(), data.labels.shape()));
    }

    let (x, y) = data.bounds(SURFACE_MARGIN);
    let z = a1
        .column(2)
        .and_then(|c| {
            let lo = c.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = c.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            lo.is_finite().then_some((lo - SURFACE_MARGIN, hi + SURFACE_MARGIN))
        })
        .ok_or_else(|| Error::mismatch("render_hidden", a1.shape(), (a1.rows, 3)))?;
    let scene = Scene { x, y, z };

    let view = Viewport::square(1.8, size);
    let mut img = RgbaImage::from_pixel(size, size, WHITE);

    let corner = [x.0, y.0, z.0];
    for (axis, end) in [(0, x.1), (1, y.1), (2, z.1)] {
        let mut tip = corner;
        tip[axis] = end;
        let (u0, v0) = scene.project(corner);
        let (u1, v1) = scene.project(tip);
        draw_line_segment_mut(&mut img, view.to_pixel(u0, v0), view.to_pixel(u1, v1), AXIS);
    }

    let lattice = lattice_points(x, y, SURFACE_RESOLUTION);
    let surface = feature_heights(&network.hidden_activations(&lattice)?);
    draw_wireframe(&mut img, &scene, &view, &lattice, &surface, SURFACE);
    if let Some(plane) = hyperplane_heights(network.w2(), network.b2(), &lattice) {
        draw_wireframe(&mut img, &scene, &view, &lattice, &plane, PLANE);
    }

    let radius = point_radius(size);
    for (row, label) in a1.data.iter().zip(&data.labels.data) {
        let (u, v) = scene.project([row[0], row[1], row[2]]);
        draw_point(&mut img, view.to_pixel(u, v), radius, label_color(label[0]));
    }
    Ok(img)
}

/// Decision regions (sign of the network output) on a square lattice with
/// the training samples on top. Uses `predict`, so the cache is untouched.
pub fn render_input_panel(
    network: &TwoLayerNetwork,
    data: &CircleDataset,
    size: u32,
    resolution: usize,
    extent: f64,
) -> Result<RgbaImage> {
    check_panel_size(size)?;
    if resolution < 2 {
        return Err(Error::Configuration("grid_resolution must be at least 2".into()));
    }
    let grid = grid_points(resolution, extent);
    let z = network.predict(&grid)?;

    let mut img = RgbaImage::from_pixel(size, size, WHITE);
    let cell = size as f64 / resolution as f64;
    for iy in 0..resolution {
        // row 0 of the lattice is the bottom of the panel
        let top = ((resolution - 1 - iy) as f64 * cell).floor();
        let bottom = ((resolution - iy) as f64 * cell).ceil();
        for ix in 0..resolution {
            let left = (ix as f64 * cell).floor();
            let right = ((ix + 1) as f64 * cell).ceil();
            let color = if z.data[iy * resolution + ix][0] > 0.0 { WARM } else { COOL };
            let rect = Rect::at(left as i32, top as i32)
                .of_size(((right - left) as u32).max(1), ((bottom - top) as u32).max(1));
            draw_filled_rect_mut(&mut img, rect, color);
        }
    }

    let view = Viewport::square(extent, size);
    let radius = point_radius(size);
    for (p, label) in data.inputs.data.iter().zip(&data.labels.data) {
        draw_point(&mut img, view.to_pixel(p[0], p[1]), radius, label_color(label[0]));
    }
    Ok(img)
}

/// Layered graph of the network with labelled nodes (`x1.., h1.., y`);
/// edge thickness follows `|w|`.
pub fn render_weight_panel(network: &TwoLayerNetwork, size: u32) -> Result<RgbaImage> {
    check_panel_size(size)?;
    let config = network.config();
    let layers = [config.input_dim, config.hidden_dim, config.output_dim];
    let columns = [0.12, 0.5, 0.88];
    let s = size as f32;
    let positions: Vec<Vec<(f32, f32)>> = layers
        .iter()
        .zip(columns)
        .map(|(&count, x)| {
            (0..count)
                .map(|j| (x * s, (j + 1) as f32 / (count + 1) as f32 * s))
                .collect()
        })
        .collect();

    let mut img = RgbaImage::from_pixel(size, size, WHITE);
    let max_width = (size / 10).max(1);
    let unit = EDGE_SCALE * size as f64 / 300.0;
    for (weights, (from, to)) in [network.w1(), network.w2()]
        .into_iter()
        .zip([(&positions[0], &positions[1]), (&positions[1], &positions[2])])
    {
        for (i, &a) in from.iter().enumerate() {
            for (j, &b) in to.iter().enumerate() {
                let width = ((weights.data[i][j].abs() * unit).round() as u32).clamp(1, max_width);
                draw_thick_line(&mut img, a, b, width, EDGE);
            }
        }
    }

    let radius = (size / 24).max(3) as i32;
    for (layer, nodes) in positions.iter().enumerate() {
        for (j, &(x, y)) in nodes.iter().enumerate() {
            let center = (x.round() as i32, y.round() as i32);
            draw_filled_circle_mut(&mut img, center, radius, NODE);
            draw_hollow_circle_mut(&mut img, center, radius, BLACK);
            let name = node_label(layer, j, nodes.len());
            draw_centered(&mut img, &name, (x, y), radius as f32 * 1.2, WHITE)?;
        }
    }
    Ok(img)
}

/// `resolution²` points of `[-extent, extent]²`, x varying fastest.
pub fn grid_points(resolution: usize, extent: f64) -> Matrix {
    lattice_points((-extent, extent), (-extent, extent), resolution)
}

/// `resolution²` evenly spaced points of `x × y`, x varying fastest.
pub fn lattice_points(x: (f64, f64), y: (f64, f64), resolution: usize) -> Matrix {
    let axis = |(lo, hi): (f64, f64)| -> Vec<f64> {
        let step = if resolution > 1 { (hi - lo) / (resolution - 1) as f64 } else { 0.0 };
        (0..resolution).map(|i| lo + i as f64 * step).collect()
    };
    let (xs, ys) = (axis(x), axis(y));
    let data = ys
        .iter()
        .flat_map(|&y| xs.iter().map(move |&x| vec![x, y]))
        .collect();
    Matrix { rows: resolution * resolution, cols: 2, data }
}

/// Row norms of `hidden` after scaling each column by its largest magnitude
/// (plus `1e-8`), clipped to `[0, p95]`.
pub fn feature_heights(hidden: &Matrix) -> Vec<f64> {
    let scale: Vec<f64> = (0..hidden.cols)
        .filter_map(|j| hidden.column(j))
        .map(|c| c.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())) + 1e-8)
        .collect();
    let heights: Vec<f64> = hidden
        .data
        .iter()
        .map(|row| row.iter().zip(&scale).map(|(a, s)| (a / s).powi(2)).sum::<f64>().sqrt())
        .collect();
    let cap = percentile(&heights, SURFACE_CLIP_PERCENTILE);
    heights.into_iter().map(|h| h.clamp(0.0, cap)).collect()
}

/// Height of the plane where the first output's pre-activation is zero,
/// solved for the third hidden unit. `None` when that unit's weight is zero
/// or the network has fewer than three hidden units.
pub fn hyperplane_heights(w2: &Matrix, b2: &Matrix, points: &Matrix) -> Option<Vec<f64>> {
    let first_output: Vec<f64> =
        w2.data.iter().take(3).map(|row| row.first().copied()).collect::<Option<_>>()?;
    let &[wx, wy, wz] = first_output.as_slice() else {
        return None;
    };
    let bias = b2.data.first()?.first().copied()?;
    if wz == 0.0 {
        return None;
    }
    Some(points.data.iter().map(|p| (-wx * p[0] - wy * p[1] - bias) / wz).collect())
}

/// Linear-interpolated percentile of `values` (`q` in `[0, 100]`).
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(f64::total_cmp);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let (lo, hi) = (rank.floor() as usize, rank.ceil() as usize);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

fn check_panel_size(size: u32) -> Result<()> {
    if size < 2 {
        return Err(Error::Configuration(format!("panel size must be at least 2 pixels, got {size}")));
    }
    Ok(())
}

fn node_label(layer: usize, index: usize, count: usize) -> String {
    match layer {
        0 => format!("x{}", index + 1),
        1 => format!("h{}", index + 1),
        _ if count == 1 => "y".to_string(),
        _ => format!("y{}", index + 1),
    }
}

/// Draws the lattice rows and columns of a height field as line segments.
fn draw_wireframe(
    img: &mut RgbaImage,
    scene: &Scene,
    view: &Viewport,
    lattice: &Matrix,
    heights: &[f64],
    color: Rgba<u8>,
) {
    let n = (lattice.rows as f64).sqrt().round() as usize;
    let pixel = |k: usize| -> Option<(f32, f32)> {
        let h = heights.get(k)?;
        if !h.is_finite() {
            return None;
        }
        let p = &lattice.data[k];
        let (u, v) = scene.project([p[0], p[1], h.clamp(scene.z.0, scene.z.1)]);
        Some(view.to_pixel(u, v))
    };
    for iy in 0..n {
        for ix in 0..n {
            let k = iy * n + ix;
            let neighbours = [(ix + 1 < n).then_some(k + 1), (iy + 1 < n).then_some(k + n)];
            for other in neighbours.into_iter().flatten() {
                if let (Some(a), Some(b)) = (pixel(k), pixel(other)) {
                    draw_line_segment_mut(img, a, b, color);
                }
            }
        }
    }
}

fn project(p: [f64; 3]) -> (f64, f64) {
    let (az, el) = (AZIMUTH_DEG.to_radians(), ELEVATION_DEG.to_radians());
    let u = -p[0] * az.sin() + p[1] * az.cos();
    let v = -(p[0] * az.cos() + p[1] * az.sin()) * el.sin() + p[2] * el.cos();
    (u, v)
}

fn label_color(label: f64) -> Rgba<u8> {
    if label > 0.0 { RED } else { BLUE }
}

fn point_radius(size: u32) -> i32 {
    (size / 100).max(2) as i32
}

fn draw_point(img: &mut RgbaImage, (x, y): (f32, f32), radius: i32, color: Rgba<u8>) {
    let center = (x.round() as i32, y.round() as i32);
    draw_filled_circle_mut(img, center, radius, color);
    draw_hollow_circle_mut(img, center, radius, BLACK);
}

fn draw_thick_line(img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width: u32, color: Rgba<u8>) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return;
    }
    let (nx, ny) = (-dy / len, dx / len);
    let half = (width as f32 - 1.0) / 2.0;
    let mut t = -half;
    while t <= half {
        draw_line_segment_mut(img, (a.0 + nx * t, a.1 + ny * t), (b.0 + nx * t, b.1 + ny * t), color);
        t += 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::Activation;
    use approx::assert_abs_diff_eq;
    use crate::network::config::NetworkConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn trained(hidden: usize) -> (TwoLayerNetwork, CircleDataset) {
        let mut rng = StdRng::seed_from_u64(0);
        let data = CircleDataset::generate(30, &mut rng).unwrap();
        let config = NetworkConfig::new(2, hidden, 1, 0.1, Activation::Tanh);
        let mut network = TwoLayerNetwork::new(config, &mut rng).unwrap();
        network.train_step(&data.inputs, &data.labels).unwrap();
        (network, data)
    }

    fn panel_config() -> VisualConfig {
        VisualConfig { panel_size: 200, grid_resolution: 12, ..VisualConfig::default() }
    }

    #[test]
    fn grid_spans_extent_with_x_fastest() {
        let g = grid_points(3, 2.0);
        assert_eq!(g.shape(), (9, 2));
        assert_eq!(g.data[0], vec![-2.0, -2.0]);
        assert_eq!(g.data[1], vec![0.0, -2.0]);
        assert_eq!(g.data[8], vec![2.0, 2.0]);
    }

    #[test]
    fn lattice_covers_both_ranges() {
        let g = lattice_points((0.0, 1.0), (-4.0, 4.0), 3);
        assert_eq!(g.shape(), (9, 2));
        assert_eq!(g.data[1], vec![0.5, -4.0]);
        assert_eq!(g.data[5], vec![1.0, 0.0]);
    }

    #[test]
    fn frame_has_three_titled_panels() {
        let (network, data) = trained(3);
        let config = panel_config();
        let frame = render_frame(&network, &data, &config, 10).unwrap();
        assert_eq!(frame.dimensions(), (600, 200));

        let later = render_frame(&network, &data, &config, 20).unwrap();
        let band = crate::visual::label::title_height(200);
        let differs = |x0: u32| {
            (x0..x0 + 200).any(|x| (0..band).any(|y| frame.get_pixel(x, y) != later.get_pixel(x, y)))
        };
        assert!(differs(0) && differs(200) && differs(400));
    }

    #[test]
    fn hidden_panel_needs_three_units() {
        let (network, data) = trained(2);
        assert!(matches!(
            render_hidden_panel(&network, &data, 60),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn hidden_panel_draws_surface_plane_and_samples() {
        let (network, data) = trained(3);
        assert!(hyperplane_heights(network.w2(), network.b2(), &data.inputs).is_some());

        let img = render_hidden_panel(&network, &data, 300).unwrap();
        assert!(img.pixels().any(|p| *p == SURFACE));
        assert!(img.pixels().any(|p| *p == PLANE));
        assert!(img.pixels().any(|p| *p == RED || *p == BLUE));
    }

    #[test]
    fn panels_reject_degenerate_sizes() {
        let (network, data) = trained(3);
        for size in [0, 1] {
            assert!(matches!(
                render_hidden_panel(&network, &data, size),
                Err(Error::Configuration(_))
            ));
            assert!(matches!(
                render_input_panel(&network, &data, size, 12, 3.0),
                Err(Error::Configuration(_))
            ));
            assert!(matches!(render_weight_panel(&network, size), Err(Error::Configuration(_))));
        }
        assert!(render_input_panel(&network, &data, 60, 1, 3.0).is_err());
    }

    #[test]
    fn feature_heights_are_normalized_and_clipped() {
        let hidden = Matrix::from_data(vec![
            vec![1.0, 0.0],
            vec![0.0, -2.0],
            vec![1.0, 2.0],
            vec![0.0, 0.0],
        ])
        .unwrap();
        let h = feature_heights(&hidden);
        assert_abs_diff_eq!(h[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(h[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(h[3], 0.0);
        // sorted [0, 1, 1, √2]: rank 2.85 lands between 1 and √2
        let cap = 1.0 + 0.85 * (2.0_f64.sqrt() - 1.0);
        assert_abs_diff_eq!(h[2], cap, epsilon = 1e-6);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        assert_abs_diff_eq!(percentile(&[5.0, 1.0, 3.0, 2.0, 4.0], 95.0), 4.8, epsilon = 1e-12);
        assert_eq!(percentile(&[7.0], 95.0), 7.0);
        assert_eq!(percentile(&[], 95.0), 0.0);
    }

    #[test]
    fn hyperplane_zeroes_the_output_pre_activation() {
        let w2 = Matrix::from_data(vec![vec![1.0], vec![-2.0], vec![0.5]]).unwrap();
        let b2 = Matrix::from_data(vec![vec![0.25]]).unwrap();
        let points = Matrix::from_data(vec![vec![1.0, 1.0], vec![-2.0, 0.5]]).unwrap();
        let z = hyperplane_heights(&w2, &b2, &points).unwrap();
        for (p, z) in points.data.iter().zip(&z) {
            assert_abs_diff_eq!(w2.data[0][0] * p[0] + w2.data[1][0] * p[1] + 0.5 * z + 0.25, 0.0);
        }

        let flat = Matrix::from_data(vec![vec![1.0], vec![-2.0], vec![0.0]]).unwrap();
        assert!(hyperplane_heights(&flat, &b2, &points).is_none());
        let narrow = Matrix::from_data(vec![vec![1.0], vec![-2.0]]).unwrap();
        assert!(hyperplane_heights(&narrow, &b2, &points).is_none());
    }

    #[test]
    fn input_panel_is_painted_with_region_colors() {
        let (network, data) = trained(3);
        let img = render_input_panel(&network, &data, 60, 12, 3.0).unwrap();
        assert!(img.pixels().any(|p| *p == WARM || *p == COOL));
        assert!(img.pixels().any(|p| *p == RED || *p == BLUE));
    }

    #[test]
    fn weight_panel_draws_labelled_nodes() {
        let (network, _) = trained(3);
        let img = render_weight_panel(&network, 300).unwrap();
        assert!(img.pixels().any(|p| *p == EDGE));

        // inner square of the single output node holds fill and label
        let (cx, cy) = ((0.88_f32 * 300.0).round() as u32, 150);
        let inner: Vec<_> = (cx - 6..=cx + 6)
            .flat_map(|x| (cy - 6..=cy + 6).map(move |y| (x, y)))
            .map(|(x, y)| *img.get_pixel(x, y))
            .collect();
        assert!(inner.iter().any(|p| *p == NODE));
        assert!(inner.iter().any(|p| p[0] > 150 && p[1] > 150));
    }

    #[test]
    fn node_labels_follow_layers() {
        assert_eq!(node_label(0, 1, 2), "x2");
        assert_eq!(node_label(1, 2, 3), "h3");
        assert_eq!(node_label(2, 0, 1), "y");
        assert_eq!(node_label(2, 1, 2), "y2");
    }
}
