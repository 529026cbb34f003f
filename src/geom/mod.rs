// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The curve variant model.
//!
//! A [`Geom`] is one finite edge of a drawing view. Its defining geometry is
//! one of the [`GeomKind`] variants, fixed at construction; the bookkeeping
//! fields (orientation, class, cosmetic links) may be changed afterwards by
//! whoever owns the edge. Every `Geom` also owns the kernel curve it was
//! built from, which answers the geometric queries.

use core::f64::consts::TAU;
use core::fmt;

use crate::fit::ApproxParams;
use crate::kernel::{
    check_axes, check_radius, validate_edge, BSplineCurve, BezierCurve, CircleCurve, CurveKind,
    EdgeCurve, EllipseCurve, KernelEdge, Line, Polyline,
};
use crate::precision::{ARC_CLOSURE_SQ, ARC_SPAN_MIN};
use crate::{GeometryError, Point, Tag, TagGenerator};

mod bezier;
mod bspline;
mod chain;
mod circle;
mod ellipse;
mod generic;
mod intersect;
mod query;

pub use bezier::BezierSegment;
pub use bspline::{BSpline, CircleFit, CircleParams};
pub use chain::{chain_geoms, chain_order, Chain, ChainStep};
pub use circle::{ArcOfCircle, Circle};
pub use ellipse::{ArcOfEllipse, Ellipse};
pub use generic::Generic;
pub use intersect::{intersection, Intersections};

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code ),*
        }

        impl $name {
            /// The persisted integer code.
            #[inline]
            pub fn code(self) -> i32 {
                self as i32
            }

            /// Decode a persisted integer code.
            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

int_enum! {
    /// The curve variant, as persisted.
    pub enum GeomType {
        /// Not yet defined; only seen in malformed records.
        NotDef = 0,
        /// A full circle.
        Circle = 1,
        /// An arc of a circle.
        ArcOfCircle = 2,
        /// A full ellipse.
        Ellipse = 3,
        /// An arc of an ellipse.
        ArcOfEllipse = 4,
        /// A single Bézier segment.
        Bezier = 5,
        /// A B-spline decomposed into Bézier segments.
        BSpline = 6,
        /// A line or polyline.
        Generic = 7,
    }
}

int_enum! {
    /// How an edge was derived from its parent shape.
    ///
    /// Advisory only; no algorithm looks at it.
    pub enum ExtractionType {
        /// Visible edges only.
        Plain = 0,
        /// Including hidden edges.
        WithHidden = 1,
        /// Including smooth edges.
        WithSmooth = 2,
        /// Including seam edges.
        WithSeam = 3,
    }
}

int_enum! {
    /// Display class of an edge.
    pub enum EdgeClass {
        /// Unclassified.
        Unset = 0,
        /// Iso-parametric line in U.
        UvIso = 1,
        /// Iso-parametric line in V.
        VvIso = 2,
        /// A sharp edge.
        Hard = 3,
        /// A silhouette edge.
        Outline = 4,
        /// A tangent-continuous edge.
        Smooth = 5,
        /// A seam edge.
        Seam = 6,
    }
}

int_enum! {
    /// What produced an edge.
    pub enum SourceKind {
        /// Projected from real geometry.
        GeometryEdge = 0,
        /// A user-added cosmetic edge.
        CosmeticEdge = 1,
        /// A generated center line.
        CenterLine = 2,
    }
}

impl GeomType {
    /// The type name used in persisted containers.
    pub fn name(self) -> &'static str {
        match self {
            GeomType::NotDef => "NotDef",
            GeomType::Circle => "Circle",
            GeomType::ArcOfCircle => "ArcOfCircle",
            GeomType::Ellipse => "Ellipse",
            GeomType::ArcOfEllipse => "ArcOfEllipse",
            GeomType::Bezier => "BezierSegment",
            GeomType::BSpline => "BSpline",
            GeomType::Generic => "Generic",
        }
    }

    /// Decode a persisted type name.
    pub fn from_name(name: &str) -> Option<GeomType> {
        [
            GeomType::Circle,
            GeomType::ArcOfCircle,
            GeomType::Ellipse,
            GeomType::ArcOfEllipse,
            GeomType::Bezier,
            GeomType::BSpline,
            GeomType::Generic,
        ]
        .into_iter()
        .find(|t| t.name() == name)
    }
}

/// The defining geometry of a curve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeomKind {
    /// A line or polyline.
    Generic(Generic),
    /// A full circle.
    Circle(Circle),
    /// An arc of a circle.
    ArcOfCircle(ArcOfCircle),
    /// A full ellipse.
    Ellipse(Ellipse),
    /// An arc of an ellipse.
    ArcOfEllipse(ArcOfEllipse),
    /// A single Bézier segment.
    BezierSegment(BezierSegment),
    /// A B-spline decomposed into Bézier segments.
    BSpline(BSpline),
}

impl GeomKind {
    /// The persisted variant code.
    pub fn geom_type(&self) -> GeomType {
        match self {
            GeomKind::Generic(_) => GeomType::Generic,
            GeomKind::Circle(_) => GeomType::Circle,
            GeomKind::ArcOfCircle(_) => GeomType::ArcOfCircle,
            GeomKind::Ellipse(_) => GeomType::Ellipse,
            GeomKind::ArcOfEllipse(_) => GeomType::ArcOfEllipse,
            GeomKind::BezierSegment(_) => GeomType::Bezier,
            GeomKind::BSpline(_) => GeomType::BSpline,
        }
    }

    /// Build a kernel edge reproducing this geometry.
    ///
    /// Returns `None` when the stored fields do not describe a curve, such
    /// as a polyline with fewer than two points or a circle whose radius is
    /// not positive.
    pub fn to_edge(&self) -> Option<KernelEdge> {
        let edge = match self {
            GeomKind::Generic(g) => match g.points.as_slice() {
                [a, b] => KernelEdge::new(Line::new(*a, *b)),
                points => KernelEdge::new(Polyline::new(points.to_vec())?),
            },
            GeomKind::Circle(c) => {
                check_radius(c.radius).ok()?;
                KernelEdge::new(CircleCurve::full(c.center, c.radius))
            }
            GeomKind::ArcOfCircle(a) => {
                check_radius(a.circle.radius).ok()?;
                let (start, end) = ordered_angles(a.start_angle, a.end_angle);
                KernelEdge::new(CircleCurve::new(a.circle.center, a.circle.radius, start, end))
            }
            GeomKind::Ellipse(e) => {
                check_axes(e.major, e.minor).ok()?;
                KernelEdge::new(EllipseCurve::full(e.center, e.major, e.minor, e.angle))
            }
            GeomKind::ArcOfEllipse(a) => {
                let e = &a.ellipse;
                check_axes(e.major, e.minor).ok()?;
                let (start, end) = ordered_angles(a.start_angle, a.end_angle);
                KernelEdge::new(EllipseCurve::new(
                    e.center, e.major, e.minor, e.angle, start, end,
                ))
            }
            GeomKind::BezierSegment(b) => {
                KernelEdge::new(BezierCurve::new(b.pnts.iter().copied())?)
            }
            GeomKind::BSpline(s) => {
                let segments: Vec<Vec<Point>> =
                    s.segments.iter().map(|seg| seg.pnts.to_vec()).collect();
                KernelEdge::new(BSplineCurve::from_bezier_segments(&segments)?)
            }
        };
        Some(edge)
    }
}

/// Angle range running counter-clockwise from `start` to `end`.
fn ordered_angles(start: f64, end: f64) -> (f64, f64) {
    if end > start {
        (start, end)
    } else {
        (start, end + TAU)
    }
}

/// One finite edge of a drawing.
#[derive(Debug)]
pub struct Geom {
    kind: GeomKind,
    /// How the edge was extracted from its parent shape.
    pub extract_type: ExtractionType,
    /// Display class.
    pub class_of_edge: EdgeClass,
    /// Whether hidden-line removal left the edge visible.
    pub hlr_visible: bool,
    /// Whether the edge is traversed against its natural direction.
    pub reversed: bool,
    /// Legacy reference into the 3D shape, `-1` when unused.
    pub ref_3d: i32,
    /// Whether the edge is a user-added annotation.
    pub cosmetic: bool,
    /// What produced the edge.
    pub source: SourceKind,
    /// Index of the producing record within its source, `-1` when unused.
    pub source_index: i32,
    /// Tag of the owning cosmetic record, if any.
    pub cosmetic_tag: String,
    tag: Tag,
    edge: Box<dyn EdgeCurve>,
}

impl Geom {
    /// Assemble a curve with default bookkeeping.
    pub(crate) fn from_parts(kind: GeomKind, edge: Box<dyn EdgeCurve>, tag: Tag) -> Geom {
        Geom {
            kind,
            extract_type: ExtractionType::Plain,
            class_of_edge: EdgeClass::Unset,
            hlr_visible: true,
            reversed: false,
            ref_3d: -1,
            cosmetic: false,
            source: SourceKind::GeometryEdge,
            source_index: -1,
            cosmetic_tag: String::new(),
            tag,
            edge,
        }
    }

    fn explicit(kind: GeomKind, edge: KernelEdge, tags: &mut TagGenerator) -> Geom {
        Geom::from_parts(kind, edge.boxed(), tags.next_tag())
    }

    /// Classify a kernel edge and build the matching curve.
    ///
    /// This is [`Geom::from_edge_with`] using the default decomposition
    /// parameters.
    pub fn from_edge(
        edge: Box<dyn EdgeCurve>,
        tags: &mut TagGenerator,
    ) -> Result<Geom, GeometryError> {
        Geom::from_edge_with(edge, tags, &ApproxParams::default())
    }

    /// Classify a kernel edge and build the matching curve.
    ///
    /// Edges failing the validity check are rejected with
    /// [`GeometryError::InvalidGeometry`]. Past that point construction
    /// never fails: a curve that cannot be built as its own family is
    /// logged and falls back to a [`Generic`].
    ///
    /// Circular and elliptical edges become full curves only when their
    /// parameter span exceeds one radian *and* their end points coincide;
    /// otherwise they become arcs. B-splines are first tested for being a
    /// disguised line, then a disguised circle or arc, and only then
    /// decomposed into Bézier segments using `params`.
    pub fn from_edge_with(
        edge: Box<dyn EdgeCurve>,
        tags: &mut TagGenerator,
        params: &ApproxParams,
    ) -> Result<Geom, GeometryError> {
        if let Err(e) = validate_edge(&*edge) {
            log::debug!("rejecting edge: {e}");
            return Err(e);
        }
        let tag = tags.next_tag();
        let mut edge = edge;
        // Only the Bézier and B-spline families take their orientation from
        // the edge; the other families always report their natural direction.
        let mut reversed = matches!(edge.kind(), CurveKind::Bezier | CurveKind::BSpline)
            && edge.is_reversed();
        let kind = match edge.kind() {
            CurveKind::Circle => {
                let built = if is_full_curve(&*edge) {
                    Circle::from_edge(&*edge).map(GeomKind::Circle)
                } else {
                    ArcOfCircle::from_edge(&*edge).map(GeomKind::ArcOfCircle)
                };
                built.unwrap_or_else(|| {
                    log::error!("circular edge has no circle geometry, using a generic curve");
                    GeomKind::Generic(Generic::from_edge(&*edge))
                })
            }
            CurveKind::Ellipse => {
                let built = if is_full_curve(&*edge) {
                    Ellipse::from_edge(&*edge).map(GeomKind::Ellipse)
                } else {
                    ArcOfEllipse::from_edge(&*edge).map(GeomKind::ArcOfEllipse)
                };
                built.unwrap_or_else(|| {
                    log::error!("elliptical edge has no ellipse geometry, using a generic curve");
                    GeomKind::Generic(Generic::from_edge(&*edge))
                })
            }
            CurveKind::Bezier => match BezierSegment::from_edge(&*edge) {
                Some(b) => GeomKind::BezierSegment(b),
                None => {
                    log::error!("Bézier edge has no control points, using a generic curve");
                    GeomKind::Generic(Generic::from_edge(&*edge))
                }
            },
            CurveKind::BSpline => {
                if BSpline::is_line(&*edge) {
                    reversed = false;
                    GeomKind::Generic(Generic::from_edge(&*edge))
                } else if let Some(fit) = BSpline::as_circle(&*edge) {
                    reversed = fit.edge.is_reversed();
                    let circle_edge: Box<dyn EdgeCurve> = fit.edge.boxed();
                    let kind = if fit.is_arc {
                        ArcOfCircle::from_edge(&*circle_edge).map(GeomKind::ArcOfCircle)
                    } else {
                        Circle::from_edge(&*circle_edge).map(GeomKind::Circle)
                    };
                    match kind {
                        Some(kind) => {
                            edge = circle_edge;
                            kind
                        }
                        None => GeomKind::BSpline(BSpline::from_edge(&*edge, params)),
                    }
                } else {
                    GeomKind::BSpline(BSpline::from_edge(&*edge, params))
                }
            }
            CurveKind::Line | CurveKind::Other => GeomKind::Generic(Generic::from_edge(&*edge)),
        };
        let mut geom = Geom::from_parts(kind, edge, tag);
        geom.reversed = reversed;
        Ok(geom)
    }

    /// A full circle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] unless the radius is
    /// positive and finite.
    pub fn circle(
        center: Point,
        radius: f64,
        tags: &mut TagGenerator,
    ) -> Result<Geom, GeometryError> {
        check_radius(radius)?;
        let kind = GeomKind::Circle(Circle { center, radius });
        let edge = KernelEdge::new(CircleCurve::full(center, radius));
        Ok(Geom::explicit(kind, edge, tags))
    }

    /// An arc of a circle, running counter-clockwise between two angles in
    /// radians.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] unless the radius is
    /// positive and finite.
    pub fn arc_of_circle(
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        tags: &mut TagGenerator,
    ) -> Result<Geom, GeometryError> {
        check_radius(radius)?;
        let (start, end) = ordered_angles(start_angle, end_angle);
        let curve = CircleCurve::new(center, radius, start, end);
        let arc = ArcOfCircle::from_curve(&curve, Circle { center, radius });
        Ok(Geom::explicit(
            GeomKind::ArcOfCircle(arc),
            KernelEdge::new(curve),
            tags,
        ))
    }

    /// A full ellipse; `rotation` is the angle of the major axis.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] unless
    /// `major >= minor > 0` with both finite.
    pub fn ellipse(
        center: Point,
        major: f64,
        minor: f64,
        rotation: f64,
        tags: &mut TagGenerator,
    ) -> Result<Geom, GeometryError> {
        check_axes(major, minor)?;
        let ellipse = Ellipse {
            center,
            major,
            minor,
            angle: rotation,
        };
        let edge = KernelEdge::new(EllipseCurve::full(center, major, minor, rotation));
        Ok(Geom::explicit(GeomKind::Ellipse(ellipse), edge, tags))
    }

    /// An arc of an ellipse between two parameter angles in radians.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] unless
    /// `major >= minor > 0` with both finite.
    pub fn arc_of_ellipse(
        center: Point,
        major: f64,
        minor: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        tags: &mut TagGenerator,
    ) -> Result<Geom, GeometryError> {
        check_axes(major, minor)?;
        let (start, end) = ordered_angles(start_angle, end_angle);
        let curve = EllipseCurve::new(center, major, minor, rotation, start, end);
        let ellipse = Ellipse {
            center,
            major,
            minor,
            angle: rotation,
        };
        let arc = ArcOfEllipse::from_curve(&curve, ellipse);
        Ok(Geom::explicit(
            GeomKind::ArcOfEllipse(arc),
            KernelEdge::new(curve),
            tags,
        ))
    }

    /// A straight line segment.
    pub fn line(start: Point, end: Point, tags: &mut TagGenerator) -> Geom {
        let kind = GeomKind::Generic(Generic {
            points: vec![start, end],
        });
        Geom::explicit(kind, KernelEdge::new(Line::new(start, end)), tags)
    }

    /// A polyline through the given points; `None` for fewer than two.
    pub fn polyline(points: Vec<Point>, tags: &mut TagGenerator) -> Option<Geom> {
        let curve = Polyline::new(points.clone())?;
        let kind = GeomKind::Generic(Generic { points });
        Some(Geom::explicit(kind, KernelEdge::new(curve), tags))
    }

    /// A Bézier segment from its control points; `None` for fewer than two.
    pub fn bezier(poles: Vec<Point>, tags: &mut TagGenerator) -> Option<Geom> {
        let curve = BezierCurve::new(poles.iter().copied())?;
        let segment = BezierSegment::new(poles);
        Some(Geom::explicit(
            GeomKind::BezierSegment(segment),
            KernelEdge::new(curve),
            tags,
        ))
    }

    /// A B-spline joining Bézier control polygons end to end.
    ///
    /// Returns `None` when `segments` is empty or a segment has fewer than
    /// two points.
    pub fn bspline(segments: &[Vec<Point>], tags: &mut TagGenerator) -> Option<Geom> {
        let curve = BSplineCurve::from_bezier_segments(segments)?;
        let spline = BSpline::from_edge(&curve, &ApproxParams::default());
        Some(Geom::explicit(
            GeomKind::BSpline(spline),
            KernelEdge::new(curve),
            tags,
        ))
    }

    /// A copy with the same bookkeeping and a fresh tag.
    ///
    /// The copy is rebuilt from the owned edge, so it is classified again.
    pub fn copy(&self, tags: &mut TagGenerator) -> Result<Geom, GeometryError> {
        let mut result = Geom::from_edge(self.edge.clone(), tags)?;
        result.extract_type = self.extract_type;
        result.class_of_edge = self.class_of_edge;
        result.hlr_visible = self.hlr_visible;
        result.reversed = self.reversed;
        result.ref_3d = self.ref_3d;
        result.cosmetic = self.cosmetic;
        result.source = self.source;
        result.source_index = self.source_index;
        result.cosmetic_tag.clone_from(&self.cosmetic_tag);
        Ok(result)
    }

    /// The defining geometry.
    #[inline]
    pub fn kind(&self) -> &GeomKind {
        &self.kind
    }

    /// The persisted variant code.
    #[inline]
    pub fn geom_type(&self) -> GeomType {
        self.kind.geom_type()
    }

    /// The durable identity.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The owned kernel curve.
    #[inline]
    pub fn edge(&self) -> &dyn EdgeCurve {
        &*self.edge
    }

    /// Start of the curve in its natural direction.
    pub fn natural_start(&self) -> Point {
        self.edge.start()
    }

    /// End of the curve in its natural direction.
    pub fn natural_end(&self) -> Point {
        self.edge.end()
    }

    /// Start of the edge as traversed, honoring `reversed`.
    pub fn start_point(&self) -> Point {
        if self.reversed {
            self.natural_end()
        } else {
            self.natural_start()
        }
    }

    /// End of the edge as traversed, honoring `reversed`.
    pub fn end_point(&self) -> Point {
        if self.reversed {
            self.natural_start()
        } else {
            self.natural_end()
        }
    }

    /// A one-line diagnostic description.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

/// Span and closure test shared by circles and ellipses.
fn is_full_curve(edge: &dyn EdgeCurve) -> bool {
    let range = edge.bounds();
    let s = edge.eval(range.start);
    let e = edge.eval(range.end);
    (range.end - range.start).abs() > ARC_SPAN_MIN && s.distance_squared(e) < ARC_CLOSURE_SQ
}

impl fmt::Display for Geom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.start_point();
        let e = self.end_point();
        write!(
            f,
            "Geom: s:({},{}) e:({},{}) type: {} class: {} viz: {} rev: {} cosmetic: {} source: {} iSource: {}",
            s.x,
            s.y,
            e.x,
            e.y,
            self.geom_type().code(),
            self.class_of_edge.code(),
            self.hlr_visible,
            self.reversed,
            self.cosmetic,
            self.source.code(),
            self.source_index,
        )
    }
}
