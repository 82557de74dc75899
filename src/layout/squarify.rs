/// Golden ratio, the aspect target d3 uses for its default squarify tiling.
pub const PHI: f64 = 1.618_033_988_749_895;

/// An axis-aligned box in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bounds {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Ordered squarified tiling.
///
/// Splits `bounds` among `weights` in input order. Rows are grown greedily
/// while the worst aspect ratio does not get worse; each row is laid across
/// the shorter side of the remaining box. The last row is snapped to the far
/// edge so the output tiles cover `bounds` exactly.
///
/// Zero weights yield zero-area boxes. A zero total collapses every child
/// to a zero-width strip on the left edge.
pub fn squarify(weights: &[f64], bounds: Bounds, ratio: f64) -> Vec<Bounds> {
    let n = weights.len();
    let mut result = Vec::with_capacity(n);
    if n == 0 {
        return result;
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        let strip = Bounds::new(bounds.x0, bounds.y0, bounds.x0, bounds.y1);
        result.resize(n, strip);
        return result;
    }

    let Bounds {
        mut x0,
        mut y0,
        x1,
        y1,
    } = bounds;
    let mut remaining = total;
    let mut i0 = 0usize;
    let mut i1 = 0usize;

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Leading zeros join the row without affecting its aspect.
        let mut row_sum;
        loop {
            row_sum = weights[i1];
            i1 += 1;
            if row_sum != 0.0 || i1 >= n {
                break;
            }
        }

        let mut min_w = row_sum;
        let mut max_w = row_sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = row_sum * row_sum * alpha;
        let mut min_ratio = (max_w / beta).max(beta / min_w);

        while i1 < n {
            let w = weights[i1];
            let sum = row_sum + w;
            let lo = min_w.min(w);
            let hi = max_w.max(w);
            beta = sum * sum * alpha;
            let new_ratio = (hi / beta).max(beta / lo);
            if new_ratio > min_ratio {
                break;
            }
            row_sum = sum;
            min_w = lo;
            max_w = hi;
            min_ratio = new_ratio;
            i1 += 1;
        }

        // Trailing zeros add no area, so a row followed only by them is last.
        let last_row = weights[i1..].iter().all(|&w| w == 0.0);
        let row = &weights[i0..i1];
        if dx < dy {
            // Row spans the width and consumes a band of height.
            let band_y1 = if last_row || remaining <= 0.0 {
                y1
            } else {
                y0 + dy * row_sum / remaining
            };
            dice(row, row_sum, Bounds::new(x0, y0, x1, band_y1), &mut result);
            y0 = band_y1;
        } else {
            // Row spans the height and consumes a band of width.
            let band_x1 = if last_row || remaining <= 0.0 {
                x1
            } else {
                x0 + dx * row_sum / remaining
            };
            slice(row, row_sum, Bounds::new(x0, y0, band_x1, y1), &mut result);
            x0 = band_x1;
        }

        remaining -= row_sum;
        i0 = i1;
    }

    result
}

/// Partition `bounds` horizontally, left to right.
fn dice(row: &[f64], row_sum: f64, bounds: Bounds, out: &mut Vec<Bounds>) {
    let k = if row_sum > 0.0 {
        bounds.width() / row_sum
    } else {
        0.0
    };
    let snap_from = row.iter().rposition(|&w| w > 0.0);
    let mut x = bounds.x0;
    for (i, &w) in row.iter().enumerate() {
        let next = if snap_from.is_some_and(|j| i >= j) {
            bounds.x1
        } else {
            x + w * k
        };
        out.push(Bounds::new(x, bounds.y0, next, bounds.y1));
        x = next;
    }
}

/// Partition `bounds` vertically, top to bottom.
fn slice(row: &[f64], row_sum: f64, bounds: Bounds, out: &mut Vec<Bounds>) {
    let k = if row_sum > 0.0 {
        bounds.height() / row_sum
    } else {
        0.0
    };
    let snap_from = row.iter().rposition(|&w| w > 0.0);
    let mut y = bounds.y0;
    for (i, &w) in row.iter().enumerate() {
        let next = if snap_from.is_some_and(|j| i >= j) {
            bounds.y1
        } else {
            y + w * k
        };
        out.push(Bounds::new(bounds.x0, y, bounds.x1, next));
        y = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_area(rects: &[Bounds]) -> f64 {
        rects.iter().map(Bounds::area).sum()
    }

    #[test]
    fn single_item_fills_viewport() {
        let rects = squarify(&[42.0], Bounds::new(0.0, 0.0, 960.0, 400.0), PHI);
        assert_eq!(rects, vec![Bounds::new(0.0, 0.0, 960.0, 400.0)]);
    }

    #[test]
    fn layout_preserves_area_for_simple_case() {
        let weights = [400.0, 300.0, 200.0, 100.0];
        let rects = squarify(&weights, Bounds::new(0.0, 0.0, 50.0, 20.0), PHI);
        assert_eq!(rects.len(), 4);
        assert!((total_area(&rects) - 1000.0).abs() < 1e-9);
        for (r, w) in rects.iter().zip(weights) {
            assert!((r.area() - w).abs() < 1e-9, "{r:?} should have area {w}");
        }
    }

    #[test]
    fn equal_halves_of_a_square() {
        let rects = squarify(&[50.0, 50.0], Bounds::new(0.0, 0.0, 100.0, 100.0), PHI);
        assert_eq!(rects.len(), 2);
        for r in &rects {
            assert!((r.area() - 5000.0).abs() < 1e-9);
        }
        // A square is not taller than wide, so the single row is a
        // full-height column with its children stacked top to bottom.
        assert_eq!(rects[0], Bounds::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rects[1], Bounds::new(0.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn input_order_is_kept() {
        let rects = squarify(&[1.0, 9.0], Bounds::new(0.0, 0.0, 10.0, 1.0), PHI);
        assert!(rects[0].x0 < rects[1].x0);
        assert!((rects[0].area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_are_degenerate_and_do_not_steal_area() {
        let rects = squarify(
            &[0.0, 30.0, 0.0, 70.0, 0.0],
            Bounds::new(0.0, 0.0, 10.0, 10.0),
            PHI,
        );
        assert_eq!(rects.len(), 5);
        for i in [0, 2, 4] {
            assert_eq!(rects[i].area(), 0.0, "zero weight at {i} got {:?}", rects[i]);
        }
        assert!((rects[1].area() - 30.0).abs() < 1e-9);
        assert!((rects[3].area() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn trailing_zeros_still_reach_the_far_edge() {
        let rects = squarify(&[0.1, 0.2, 0.0], Bounds::new(0.0, 0.0, 7.0, 3.0), PHI);
        assert_eq!(rects.len(), 3);
        let right = rects.iter().map(|r| r.x1).fold(f64::MIN, f64::max);
        let bottom = rects.iter().map(|r| r.y1).fold(f64::MIN, f64::max);
        assert_eq!(right, 7.0);
        assert_eq!(bottom, 3.0);
        assert_eq!(rects[2].area(), 0.0);
        assert!((total_area(&rects) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_weights_collapse() {
        let rects = squarify(&[0.0, 0.0], Bounds::new(5.0, 5.0, 15.0, 25.0), PHI);
        assert_eq!(rects, vec![Bounds::new(5.0, 5.0, 5.0, 25.0); 2]);
    }
}
