// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single Bézier segments.

use smallvec::SmallVec;

use crate::kernel::EdgeCurve;
use crate::Point;

/// A Bézier segment given by its control points.
///
/// Drawing back ends handle degree three or less. Higher degrees are kept
/// but logged as a warning when built from an edge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezierSegment {
    /// The control points.
    pub pnts: SmallVec<[Point; 4]>,
}

impl BezierSegment {
    /// Create a segment from its control points.
    pub fn new(pnts: impl IntoIterator<Item = Point>) -> BezierSegment {
        BezierSegment {
            pnts: pnts.into_iter().collect(),
        }
    }

    pub(crate) fn from_edge(edge: &dyn EdgeCurve) -> Option<BezierSegment> {
        let poles = edge.poles()?;
        let segment = BezierSegment::new(poles.iter().copied());
        if segment.pole_count() > 4 {
            log::warn!("Bézier segment has degree {} > 3", segment.degree());
        }
        Some(segment)
    }

    /// Number of control points.
    #[inline]
    pub fn pole_count(&self) -> usize {
        self.pnts.len()
    }

    /// Polynomial degree, one less than the pole count.
    #[inline]
    pub fn degree(&self) -> usize {
        self.pnts.len().saturating_sub(1)
    }
}
