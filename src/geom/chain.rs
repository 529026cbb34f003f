// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordering disconnected edges into a continuous path.

use crate::geom::Geom;
use crate::precision::CONFUSION;

/// One edge of a chained path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainStep {
    /// Index of the edge in the input.
    pub index: usize,
    /// Whether the edge is traversed against its natural direction.
    pub reversed: bool,
}

/// The result of [`chain_geoms`].
#[derive(Debug, Default)]
pub struct Chain {
    /// The edges that could be chained, in path order, with their
    /// `reversed` flags set.
    pub path: Vec<Geom>,
    /// Edges for which no continuation was found, in input order.
    pub unchained: Vec<Geom>,
}

impl Chain {
    /// Whether every input edge made it into the path.
    pub fn is_complete(&self) -> bool {
        self.unchained.is_empty()
    }
}

/// Compute a path order for a set of edges by matching end points.
///
/// The first edge starts the path as it is currently oriented. Each
/// following round takes the first unused edge, in input order, whose
/// natural start or natural end meets the trailing point of the path.
/// There are exactly `geoms.len() - 1` rounds; a round finding nothing is
/// logged and the result comes up short.
pub fn chain_order(geoms: &[Geom]) -> Vec<ChainStep> {
    let Some(first) = geoms.first() else {
        return Vec::new();
    };
    let mut steps = vec![ChainStep {
        index: 0,
        reversed: first.reversed,
    }];
    if geoms.len() == 1 {
        return steps;
    }
    let mut used = vec![false; geoms.len()];
    used[0] = true;
    let mut trailing = first.end_point();
    for _ in 1..geoms.len() {
        let found = geoms.iter().enumerate().find_map(|(i, g)| {
            if used[i] {
                None
            } else if g.natural_start().is_equal(trailing, CONFUSION) {
                Some((i, false, g.natural_end()))
            } else if g.natural_end().is_equal(trailing, CONFUSION) {
                Some((i, true, g.natural_start()))
            } else {
                None
            }
        });
        match found {
            Some((index, reversed, next)) => {
                used[index] = true;
                trailing = next;
                steps.push(ChainStep { index, reversed });
            }
            None => {
                log::warn!(
                    "no edge continues the chain at ({}, {})",
                    trailing.x,
                    trailing.y
                );
            }
        }
    }
    steps
}

/// Order and orient edges into one continuous path.
///
/// See [`chain_order`] for the matching rule. Edges placed on the path get
/// their `reversed` flag set to the chosen orientation. A single edge is
/// returned unchanged.
pub fn chain_geoms(geoms: Vec<Geom>) -> Chain {
    let steps = chain_order(&geoms);
    let mut slots: Vec<Option<Geom>> = geoms.into_iter().map(Some).collect();
    let mut path = Vec::with_capacity(steps.len());
    for step in &steps {
        if let Some(mut geom) = slots[step.index].take() {
            geom.reversed = step.reversed;
            path.push(geom);
        }
    }
    Chain {
        path,
        unchained: slots.into_iter().flatten().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, TagGenerator};

    const A: Point = Point::planar(0.0, 0.0);
    const B: Point = Point::planar(4.0, 0.0);
    const C: Point = Point::planar(0.0, 3.0);

    fn assert_connected(path: &[Geom]) {
        for pair in path.windows(2) {
            assert!(
                pair[0].end_point().is_equal(pair[1].start_point(), 1e-12),
                "{} / {}",
                pair[0].dump(),
                pair[1].dump()
            );
        }
    }

    #[test]
    fn triangle() {
        let mut tags = TagGenerator::from_seed(1);
        let edges = vec![
            Geom::line(A, B, &mut tags),
            Geom::line(C, A, &mut tags),
            Geom::line(B, C, &mut tags),
        ];
        let chain = chain_geoms(edges);
        assert!(chain.is_complete());
        assert_eq!(chain.path.len(), 3);
        assert_connected(&chain.path);
        let first = &chain.path[0];
        let last = &chain.path[2];
        assert!(last.end_point().is_equal(first.start_point(), 1e-12));
    }

    #[test]
    fn reversed_edges_are_flagged() {
        let mut tags = TagGenerator::from_seed(2);
        let edges = vec![
            Geom::line(A, B, &mut tags),
            Geom::line(C, B, &mut tags),
            Geom::line(A, C, &mut tags),
        ];
        let order = chain_order(&edges);
        assert_eq!(
            order,
            vec![
                ChainStep { index: 0, reversed: false },
                ChainStep { index: 1, reversed: true },
                ChainStep { index: 2, reversed: true },
            ]
        );
        let chain = chain_geoms(edges);
        assert_connected(&chain.path);
        assert!(chain.path[1].reversed && chain.path[2].reversed);
    }

    #[test]
    fn gaps_leave_edges_unchained() {
        let mut tags = TagGenerator::from_seed(3);
        let far = Point::planar(10.0, 10.0);
        let edges = vec![
            Geom::line(A, B, &mut tags),
            Geom::line(far, Point::planar(11.0, 10.0), &mut tags),
            Geom::line(B, C, &mut tags),
        ];
        let chain = chain_geoms(edges);
        assert!(!chain.is_complete());
        assert_eq!(chain.path.len(), 2);
        assert_eq!(chain.unchained.len(), 1);
        assert_eq!(chain.unchained[0].natural_start(), far);
    }

    #[test]
    fn single_and_empty() {
        let mut tags = TagGenerator::from_seed(4);
        let mut circle = Geom::circle(A, 1.0, &mut tags).unwrap();
        circle.reversed = true;
        let tag = circle.tag();
        let chain = chain_geoms(vec![circle]);
        assert_eq!(chain.path.len(), 1);
        assert_eq!(chain.path[0].tag(), tag);
        assert!(chain.path[0].reversed);
        assert!(chain_geoms(Vec::new()).path.is_empty());
    }
}
