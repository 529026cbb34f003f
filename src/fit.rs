// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition of arbitrary curves into Bézier segments.
//!
//! When the kernel can hand out exact Bézier control polygons (any
//! non-rational clamped spline of degree three or less) those are used
//! directly. Everything else is approximated by cubic Hermite pieces,
//! splitting the parameter range uniformly until every piece is within
//! tolerance or the segment cap is reached.

use crate::kernel::EdgeCurve;
use crate::precision::APPROX_TOLERANCE;
use crate::{Point, Vec3};

/// Parameters controlling B-spline decomposition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApproxParams {
    /// Maximum distance between the curve and its approximation.
    pub tolerance: f64,
    /// Highest degree of the produced segments.
    pub max_degree: usize,
    /// Cap on the number of produced segments.
    pub max_segments: usize,
}

impl Default for ApproxParams {
    fn default() -> Self {
        ApproxParams {
            tolerance: APPROX_TOLERANCE,
            max_degree: 3,
            max_segments: 200,
        }
    }
}

/// Split a curve into Bézier control polygons, in parameter order.
///
/// The result is never empty for a curve that can be evaluated; a curve
/// whose derivatives cannot be computed degrades to a single line segment
/// between its end points.
pub fn bezier_decomposition(edge: &dyn EdgeCurve, params: &ApproxParams) -> Vec<Vec<Point>> {
    if let Some(segments) = edge.bezier_segments() {
        if !segments.is_empty()
            && segments.len() <= params.max_segments
            && segments
                .iter()
                .all(|s| s.len() >= 2 && s.len() - 1 <= params.max_degree)
        {
            return segments;
        }
    }
    let range = edge.bounds();
    let max_segments = params.max_segments.max(1);
    let mut n = 1;
    let mut best = None;
    loop {
        match hermite_pieces(edge, range.start, range.end, n, params.max_degree) {
            Some((pieces, err)) => {
                let done = err <= params.tolerance;
                best = Some(pieces);
                if done {
                    break;
                }
                if n >= max_segments {
                    log::debug!(
                        "approximation with {n} segments has error {err:e}, above tolerance {}",
                        params.tolerance
                    );
                    break;
                }
            }
            None => {
                log::error!("curve derivatives are not finite, decomposing as a single line");
                return vec![vec![edge.start(), edge.end()]];
            }
        }
        n = (n * 2).min(max_segments);
    }
    best.unwrap_or_else(|| vec![vec![edge.start(), edge.end()]])
}

/// Cubic (or lower) Hermite pieces over `n` uniform parameter steps, with
/// the largest deviation found at interior check points.
fn hermite_pieces(
    edge: &dyn EdgeCurve,
    t0: f64,
    t1: f64,
    n: usize,
    max_degree: usize,
) -> Option<(Vec<Vec<Point>>, f64)> {
    let step = (t1 - t0) / n as f64;
    let mut pieces = Vec::with_capacity(n);
    let mut err: f64 = 0.0;
    for i in 0..n {
        let a = t0 + step * i as f64;
        let b = if i + 1 == n { t1 } else { a + step };
        let p0 = edge.eval(a);
        let p3 = edge.eval(b);
        let d0 = edge.deriv(a);
        let d1 = edge.deriv(b);
        if !(d0.is_finite() && d1.is_finite() && p0.is_finite() && p3.is_finite()) {
            return None;
        }
        let dt = b - a;
        let poles = match max_degree {
            0 | 1 => vec![p0, p3],
            2 => {
                // Quadratic through the tangent intersection, falling back to
                // the chord midpoint for straight pieces.
                let c = tangent_meet(p0, d0, p3, d1).unwrap_or_else(|| p0.midpoint(p3));
                vec![p0, c, p3]
            }
            _ => vec![p0, p0 + d0 * (dt / 3.0), p3 - d1 * (dt / 3.0), p3],
        };
        for &f in &[0.25, 0.5, 0.75] {
            let on_curve = edge.eval(a + dt * f);
            let on_piece = crate::kernel::de_casteljau(&poles, f);
            err = err.max(on_curve.distance(on_piece));
        }
        pieces.push(poles);
    }
    Some((pieces, err))
}

fn tangent_meet(p0: Point, d0: Vec3, p1: Point, d1: Vec3) -> Option<Point> {
    let det = d0.cross_z(d1);
    if det.abs() < 1e-12 {
        return None;
    }
    let s = (p1 - p0).cross_z(d1) / det;
    let p = p0 + d0 * s;
    p.is_finite().then_some(p)
}
