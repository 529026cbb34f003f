// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered edge collections and faces.

use crate::precision::CLOSED_TOLERANCE;
use crate::{EdgeCurve, Geom, TagGenerator};

/// An ordered sequence of curves.
#[derive(Debug, Default)]
pub struct Wire {
    /// The curves, in traversal order.
    pub geoms: Vec<Geom>,
}

impl Wire {
    /// Build a wire by classifying each kernel edge in turn.
    ///
    /// Edges the factory rejects are skipped.
    pub fn from_edges(
        edges: impl IntoIterator<Item = Box<dyn EdgeCurve>>,
        tags: &mut TagGenerator,
    ) -> Wire {
        let geoms = edges
            .into_iter()
            .filter_map(|edge| match Geom::from_edge(edge, tags) {
                Ok(geom) => Some(geom),
                Err(e) => {
                    log::debug!("skipping wire edge: {e}");
                    None
                }
            })
            .collect();
        Wire { geoms }
    }

    /// The kernel curves of the wire, in order.
    pub fn edges(&self) -> impl Iterator<Item = &dyn EdgeCurve> + '_ {
        self.geoms.iter().map(Geom::edge)
    }

    /// Whether the wire ends where it starts.
    ///
    /// An empty wire is not closed.
    pub fn is_closed(&self) -> bool {
        match (self.geoms.first(), self.geoms.last()) {
            (Some(first), Some(last)) => first
                .start_point()
                .is_equal(last.end_point(), CLOSED_TOLERANCE),
            _ => false,
        }
    }

    /// Total length of the curves.
    pub fn length(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }
}

/// A region bounded by wires.
///
/// The first wire is the outer boundary and the others are holes.
#[derive(Debug, Default)]
pub struct Face {
    /// The boundary wires.
    pub wires: Vec<Wire>,
}

impl Face {
    /// The outer boundary, if the face has any wires.
    pub fn outer(&self) -> Option<&Wire> {
        self.wires.first()
    }

    /// The holes.
    pub fn holes(&self) -> &[Wire] {
        self.wires.get(1..).unwrap_or(&[])
    }
}
