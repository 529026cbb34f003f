// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planar curve geometry for 2D technical drawings.
//!
//! The drawgeom library models the finite edges that make up a projected
//! drawing view: line segments and polylines, circles and circular arcs,
//! ellipses and elliptical arcs, Bézier segments and B-splines. Each edge is
//! a [`Geom`], a tagged variant that owns a handle to an underlying
//! parametric curve (anything implementing [`EdgeCurve`]) and carries the
//! bookkeeping a drawing needs: orientation, edge class, cosmetic flags and
//! a durable [`Tag`].
//!
//! On top of that model the crate provides geometric queries (arc-length
//! midpoints, quadrant points, nearest points and distances), closed-form
//! intersections between lines and circles, chaining of loose edges into a
//! continuous path, and an element-per-field XML persistence format.
//!
//! # Examples
//!
//! Intersecting a line with a circle:
//! ```
//! use drawgeom::{intersection, Geom, Point, TagGenerator};
//!
//! let mut tags = TagGenerator::from_seed(1);
//! let circle = Geom::circle(Point::new(0.0, 0.0, 0.0), 2.0, &mut tags).unwrap();
//! let line = Geom::line(Point::new(-5.0, 0.0, 0.0), Point::new(5.0, 0.0, 0.0), &mut tags);
//!
//! let hits = intersection(&circle, &line);
//! assert_eq!(hits.len(), 2);
//! ```
//!
//! Ordering loose edges into a path:
//! ```
//! use drawgeom::{chain_geoms, Geom, Point, TagGenerator};
//!
//! let mut tags = TagGenerator::from_seed(2);
//! let a = Point::new(0.0, 0.0, 0.0);
//! let b = Point::new(4.0, 0.0, 0.0);
//! let c = Point::new(0.0, 3.0, 0.0);
//! let edges = vec![
//!     Geom::line(a, b, &mut tags),
//!     Geom::line(c, a, &mut tags),
//!     Geom::line(b, c, &mut tags),
//! ];
//! let chain = chain_geoms(edges);
//! assert!(chain.is_complete());
//! assert_eq!(chain.path.len(), 3);
//! ```
//!
//! # Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` on the value types.
//! - `mint`: conversions between [`Point`] and `mint::Point3`.
//! - `schemars`: derives `JsonSchema` on the value types.

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod common;
mod error;
mod fit;
pub mod geom;
pub mod kernel;
pub mod persist;
mod point;
pub mod precision;
mod tag;
mod vertex;
mod wire;

pub use crate::error::*;
pub use crate::fit::*;
pub use crate::geom::{
    chain_geoms, chain_order, intersection, ArcOfCircle, ArcOfEllipse, BSpline, BezierSegment,
    Chain, ChainStep, Circle, CircleFit, CircleParams, EdgeClass, Ellipse, ExtractionType, Geom,
    GeomKind, GeomType, Generic, Intersections, SourceKind,
};
pub use crate::kernel::{CurveKind, EdgeCurve, KernelCurve, KernelEdge, Nearest};
pub use crate::point::*;
pub use crate::tag::*;
pub use crate::vertex::*;
pub use crate::wire::*;
