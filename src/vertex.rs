// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Points of a drawing view.

use core::fmt;

use crate::{ExtractionType, Point, Tag, TagGenerator};

/// A point of a drawing view with the same bookkeeping as a curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    /// Position; `z` is zero by convention.
    pub point: Point,
    /// How the vertex was extracted from its parent shape.
    pub extract_type: ExtractionType,
    /// Whether hidden-line removal left the vertex visible.
    pub hlr_visible: bool,
    /// Legacy reference into the 3D shape, `-1` when unused.
    pub ref_3d: i32,
    /// Whether this vertex marks the center of a circle or arc.
    pub is_center: bool,
    /// Whether the vertex is a user-added annotation.
    pub cosmetic: bool,
    /// Index of the owning cosmetic record, `-1` for none.
    pub cosmetic_link: i32,
    /// Tag of the owning cosmetic record, if any.
    pub cosmetic_tag: String,
    /// Whether the vertex is a reference vertex. Never persisted.
    pub reference: bool,
    tag: Tag,
}

impl Vertex {
    /// A plain vertex at `point`.
    pub fn new(point: Point, tags: &mut TagGenerator) -> Vertex {
        Vertex::with_tag(point, tags.next_tag())
    }

    pub(crate) fn with_tag(point: Point, tag: Tag) -> Vertex {
        Vertex {
            point,
            extract_type: ExtractionType::Plain,
            hlr_visible: false,
            ref_3d: -1,
            is_center: false,
            cosmetic: false,
            cosmetic_link: -1,
            cosmetic_tag: String::new(),
            reference: false,
            tag,
        }
    }

    /// Whether the two vertices are within `tolerance` of each other.
    pub fn is_equal(&self, other: &Vertex, tolerance: f64) -> bool {
        self.point.distance(other.point) <= tolerance
    }

    /// A copy with a fresh tag. The copy is never a reference vertex.
    pub fn copy(&self, tags: &mut TagGenerator) -> Vertex {
        Vertex {
            reference: false,
            tag: tags.next_tag(),
            ..self.clone()
        }
    }

    /// The durable identity.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// A one-line diagnostic description.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vertex: point: ({},{},{}) vis: {} cosmetic: {} cosLink: {} cosTag: {}",
            self.point.x,
            self.point.y,
            self.point.z,
            self.hlr_visible,
            self.cosmetic,
            self.cosmetic_link,
            self.cosmetic_tag,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let mut tags = TagGenerator::from_seed(3);
        let v = Vertex::new(Point::planar(1.0, 2.0), &mut tags);
        assert!(!v.hlr_visible);
        assert_eq!(v.ref_3d, -1);
        assert_eq!(v.cosmetic_link, -1);
        assert!(!v.tag().is_nil());
    }

    #[test]
    fn equality_within_tolerance() {
        let mut tags = TagGenerator::from_seed(4);
        let a = Vertex::new(Point::planar(0.0, 0.0), &mut tags);
        let b = Vertex::new(Point::planar(0.0, 0.5), &mut tags);
        assert!(a.is_equal(&b, 0.5));
        assert!(!a.is_equal(&b, 0.49));
    }

    #[test]
    fn copy_drops_reference_and_tag() {
        let mut tags = TagGenerator::from_seed(5);
        let mut v = Vertex::new(Point::planar(3.0, 4.0), &mut tags);
        v.reference = true;
        v.is_center = true;
        v.cosmetic_tag = "owner".into();
        let c = v.copy(&mut tags);
        assert!(!c.reference);
        assert!(c.is_center);
        assert_eq!(c.cosmetic_tag, "owner");
        assert_ne!(c.tag(), v.tag());
        assert_eq!(
            c.dump(),
            "Vertex: point: (3,4,0) vis: false cosmetic: false cosLink: -1 cosTag: owner"
        );
    }
}
