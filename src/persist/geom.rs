// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curve and vertex records.

use crate::geom::{
    ArcOfCircle, ArcOfEllipse, BSpline, BezierSegment, Circle, EdgeClass, Ellipse,
    ExtractionType, Generic, Geom, GeomKind, GeomType, SourceKind,
};
use crate::kernel::{KernelEdge, Line};
use crate::persist::{XmlReader, XmlWriter};
use crate::{PersistError, Point, Tag, Vertex};

/// Fields shared by arcs of circles and arcs of ellipses.
struct ArcRecord {
    start_pnt: Point,
    end_pnt: Point,
    mid_pnt: Point,
    start_angle: f64,
    end_angle: f64,
    cw: bool,
    large_arc: bool,
}

impl ArcRecord {
    fn save(&self, w: &mut XmlWriter) {
        w.point("Start", self.start_pnt);
        w.point("End", self.end_pnt);
        w.point("Middle", self.mid_pnt);
        w.value("StartAngle", self.start_angle);
        w.value("EndAngle", self.end_angle);
        w.flag("Clockwise", self.cw);
        w.flag("Large", self.large_arc);
    }

    fn restore(r: &mut XmlReader<'_>) -> Result<ArcRecord, PersistError> {
        Ok(ArcRecord {
            start_pnt: r.read_point("Start")?,
            end_pnt: r.read_point("End")?,
            mid_pnt: r.read_point("Middle")?,
            start_angle: r.read_value("StartAngle")?,
            end_angle: r.read_value("EndAngle")?,
            cw: r.read_flag("Clockwise")?,
            large_arc: r.read_flag("Large")?,
        })
    }
}

fn save_points(w: &mut XmlWriter, element: &str, count_attr: &str, points: &[Point]) {
    let count = points.len().to_string();
    w.begin(element, &[(count_attr, &count)]);
    for p in points {
        w.point("Point", *p);
    }
    w.end(element);
}

fn restore_points(
    r: &mut XmlReader<'_>,
    element: &str,
    count_attr: &str,
) -> Result<Vec<Point>, PersistError> {
    r.read_element(element)?;
    let count: usize = r.parsed_attribute(count_attr);
    let points = (0..count)
        .map(|_| r.read_point("Point"))
        .collect::<Result<Vec<_>, _>>()?;
    r.read_end_element(element)?;
    Ok(points)
}

fn save_circle(w: &mut XmlWriter, c: &Circle) {
    w.point("Center", c.center);
    w.value("Radius", c.radius);
}

fn restore_circle(r: &mut XmlReader<'_>) -> Result<Circle, PersistError> {
    Ok(Circle {
        center: r.read_point("Center")?,
        radius: r.read_value("Radius")?,
    })
}

fn save_ellipse(w: &mut XmlWriter, e: &Ellipse) {
    w.point("Center", e.center);
    w.value("Major", e.major);
    w.value("Minor", e.minor);
    w.value("Angle", e.angle);
}

fn restore_ellipse(r: &mut XmlReader<'_>) -> Result<Ellipse, PersistError> {
    Ok(Ellipse {
        center: r.read_point("Center")?,
        major: r.read_value("Major")?,
        minor: r.read_value("Minor")?,
        angle: r.read_value("Angle")?,
    })
}

/// Decode an integer code, marking the restore partial if it is unknown.
fn decode<T>(r: &mut XmlReader<'_>, code: i32, from_code: fn(i32) -> Option<T>, default: T) -> T {
    from_code(code).unwrap_or_else(|| {
        log::debug!("unknown code {code}");
        r.set_partial_restore();
        default
    })
}

fn read_tag(r: &mut XmlReader<'_>, element: &str) -> Result<Tag, PersistError> {
    let text = r.read_string(element)?;
    Ok(text.parse().unwrap_or_else(|_| {
        log::debug!("malformed tag `{text}`");
        r.set_partial_restore();
        Tag::NIL
    }))
}

impl Geom {
    /// Write the curve's record.
    ///
    /// The common fields come first, then the fields of the variant.
    pub fn save(&self, w: &mut XmlWriter) {
        w.value("GeomType", self.geom_type().code());
        w.value("ExtractType", self.extract_type.code());
        w.value("EdgeClass", self.class_of_edge.code());
        w.flag("HLRVisible", self.hlr_visible);
        w.flag("Reversed", self.reversed);
        w.value("Ref3D", self.ref_3d);
        w.flag("Cosmetic", self.cosmetic);
        w.value("Source", self.source.code());
        w.value("SourceIndex", self.source_index);
        w.value("CosmeticTag", &self.cosmetic_tag);
        w.value("Tag", self.tag());
        match self.kind() {
            GeomKind::Generic(g) => save_points(w, "Points", "PointsCount", &g.points),
            GeomKind::Circle(c) => save_circle(w, c),
            GeomKind::ArcOfCircle(a) => {
                save_circle(w, &a.circle);
                ArcRecord {
                    start_pnt: a.start_pnt,
                    end_pnt: a.end_pnt,
                    mid_pnt: a.mid_pnt,
                    start_angle: a.start_angle,
                    end_angle: a.end_angle,
                    cw: a.cw,
                    large_arc: a.large_arc,
                }
                .save(w);
            }
            GeomKind::Ellipse(e) => save_ellipse(w, e),
            GeomKind::ArcOfEllipse(a) => {
                save_ellipse(w, &a.ellipse);
                ArcRecord {
                    start_pnt: a.start_pnt,
                    end_pnt: a.end_pnt,
                    mid_pnt: a.mid_pnt,
                    start_angle: a.start_angle,
                    end_angle: a.end_angle,
                    cw: a.cw,
                    large_arc: a.large_arc,
                }
                .save(w);
            }
            GeomKind::BezierSegment(b) => save_points(w, "Poles", "PolesCount", &b.pnts),
            GeomKind::BSpline(s) => {
                w.point("Start", s.start_pnt);
                w.point("End", s.end_pnt);
                w.point("Middle", s.mid_pnt);
                w.value("StartAngle", s.start_angle);
                w.value("EndAngle", s.end_angle);
                w.flag("Clockwise", s.cw);
                w.flag("IsArc", s.is_arc);
                let count = s.segments.len().to_string();
                w.begin("Segments", &[("SegmentsCount", &count)]);
                for seg in &s.segments {
                    save_points(w, "Segment", "PolesCount", &seg.pnts);
                }
                w.end("Segments");
            }
        }
    }

    /// Read a curve record written by [`Geom::save`].
    ///
    /// The variant is taken from the record's `GeomType`. Malformed fields
    /// leave the reader's partial-restore flag raised. When the restored
    /// fields do not describe a curve the kernel can build, the curve gets
    /// a degenerate placeholder edge and the flag is raised too.
    pub fn restore(r: &mut XmlReader<'_>) -> Result<Geom, PersistError> {
        let code = r.read_value("GeomType")?;
        let geom_type = decode(r, code, GeomType::from_code, GeomType::NotDef);
        let extract_code = r.read_value("ExtractType")?;
        let extract_type = decode(r, extract_code, ExtractionType::from_code, ExtractionType::Plain);
        let class_code = r.read_value("EdgeClass")?;
        let class_of_edge = decode(r, class_code, EdgeClass::from_code, EdgeClass::Unset);
        let hlr_visible = r.read_flag("HLRVisible")?;
        let reversed = r.read_flag("Reversed")?;
        let ref_3d = r.read_value("Ref3D")?;
        let cosmetic = r.read_flag("Cosmetic")?;
        let source_code = r.read_value("Source")?;
        let source = decode(r, source_code, SourceKind::from_code, SourceKind::GeometryEdge);
        let source_index = r.read_value("SourceIndex")?;
        let cosmetic_tag = r.read_string("CosmeticTag")?;
        let tag = read_tag(r, "Tag")?;

        let kind = match geom_type {
            GeomType::NotDef | GeomType::Generic => GeomKind::Generic(Generic {
                points: restore_points(r, "Points", "PointsCount")?,
            }),
            GeomType::Circle => GeomKind::Circle(restore_circle(r)?),
            GeomType::ArcOfCircle => {
                let circle = restore_circle(r)?;
                let arc = ArcRecord::restore(r)?;
                GeomKind::ArcOfCircle(ArcOfCircle {
                    circle,
                    start_angle: arc.start_angle,
                    end_angle: arc.end_angle,
                    start_pnt: arc.start_pnt,
                    mid_pnt: arc.mid_pnt,
                    end_pnt: arc.end_pnt,
                    cw: arc.cw,
                    large_arc: arc.large_arc,
                })
            }
            GeomType::Ellipse => GeomKind::Ellipse(restore_ellipse(r)?),
            GeomType::ArcOfEllipse => {
                let ellipse = restore_ellipse(r)?;
                let arc = ArcRecord::restore(r)?;
                GeomKind::ArcOfEllipse(ArcOfEllipse {
                    ellipse,
                    start_angle: arc.start_angle,
                    end_angle: arc.end_angle,
                    start_pnt: arc.start_pnt,
                    mid_pnt: arc.mid_pnt,
                    end_pnt: arc.end_pnt,
                    cw: arc.cw,
                    large_arc: arc.large_arc,
                })
            }
            GeomType::Bezier => GeomKind::BezierSegment(BezierSegment::new(restore_points(
                r,
                "Poles",
                "PolesCount",
            )?)),
            GeomType::BSpline => {
                let start_pnt = r.read_point("Start")?;
                let end_pnt = r.read_point("End")?;
                let mid_pnt = r.read_point("Middle")?;
                let start_angle = r.read_value("StartAngle")?;
                let end_angle = r.read_value("EndAngle")?;
                let cw = r.read_flag("Clockwise")?;
                let is_arc = r.read_flag("IsArc")?;
                r.read_element("Segments")?;
                let count: usize = r.parsed_attribute("SegmentsCount");
                let mut segments = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let poles = restore_points(r, "Segment", "PolesCount")?;
                    segments.push(BezierSegment::new(poles));
                }
                r.read_end_element("Segments")?;
                GeomKind::BSpline(BSpline {
                    segments,
                    start_pnt,
                    mid_pnt,
                    end_pnt,
                    start_angle,
                    end_angle,
                    cw,
                    is_arc,
                })
            }
        };

        let edge = match kind.to_edge() {
            Some(edge) => edge,
            None => {
                log::debug!("restored {} does not describe a curve", geom_type.name());
                r.set_partial_restore();
                KernelEdge::new(Line::new(Point::ZERO, Point::ZERO))
            }
        };
        let mut geom = Geom::from_parts(kind, edge.boxed(), tag);
        geom.extract_type = extract_type;
        geom.class_of_edge = class_of_edge;
        geom.hlr_visible = hlr_visible;
        geom.reversed = reversed;
        geom.ref_3d = ref_3d;
        geom.cosmetic = cosmetic;
        geom.source = source;
        geom.source_index = source_index;
        geom.cosmetic_tag = cosmetic_tag;
        Ok(geom)
    }
}

impl Vertex {
    /// Write the vertex's record.
    pub fn save(&self, w: &mut XmlWriter) {
        w.point("Point", self.point);
        w.value("Extract", self.extract_type.code());
        w.flag("HLRVisible", self.hlr_visible);
        w.value("Ref3D", self.ref_3d);
        w.flag("IsCenter", self.is_center);
        w.flag("Cosmetic", self.cosmetic);
        w.value("CosmeticLink", self.cosmetic_link);
        w.value("CosmeticTag", &self.cosmetic_tag);
        w.value("VertexTag", self.tag());
    }

    /// Read a vertex record written by [`Vertex::save`].
    pub fn restore(r: &mut XmlReader<'_>) -> Result<Vertex, PersistError> {
        let point = r.read_point("Point")?;
        let extract_code = r.read_value("Extract")?;
        let extract_type = decode(r, extract_code, ExtractionType::from_code, ExtractionType::Plain);
        let hlr_visible = r.read_flag("HLRVisible")?;
        let ref_3d = r.read_value("Ref3D")?;
        let is_center = r.read_flag("IsCenter")?;
        let cosmetic = r.read_flag("Cosmetic")?;
        let cosmetic_link = r.read_value("CosmeticLink")?;
        let cosmetic_tag = r.read_string("CosmeticTag")?;
        let tag = read_tag(r, "VertexTag")?;
        let mut vertex = Vertex::with_tag(point, tag);
        vertex.extract_type = extract_type;
        vertex.hlr_visible = hlr_visible;
        vertex.ref_3d = ref_3d;
        vertex.is_center = is_center;
        vertex.cosmetic = cosmetic;
        vertex.cosmetic_link = cosmetic_link;
        vertex.cosmetic_tag = cosmetic_tag;
        Ok(vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagGenerator;

    fn round_trip(g: &Geom) -> Geom {
        let mut w = XmlWriter::new();
        g.save(&mut w);
        let text = w.into_string();
        let mut r = XmlReader::new(&text);
        let back = Geom::restore(&mut r).unwrap();
        assert!(!r.test_partial_restore(), "{text}");
        back
    }

    fn assert_same(a: &Geom, b: &Geom) {
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.tag(), b.tag());
        assert_eq!(a.to_canonical_string(), b.to_canonical_string());
        assert!(a.natural_start().distance(b.natural_start()) < 1e-6);
        assert!(a.natural_end().distance(b.natural_end()) < 1e-6);
    }

    #[test]
    fn every_variant_round_trips() {
        let mut tags = TagGenerator::from_seed(21);
        let mut arc =
            Geom::arc_of_circle(Point::planar(1.0, -2.0), 3.0, 0.25, 4.0, &mut tags).unwrap();
        arc.reversed = true;
        arc.cosmetic = true;
        arc.cosmetic_tag = "c-1".into();
        arc.class_of_edge = EdgeClass::Outline;
        arc.source = SourceKind::CosmeticEdge;
        arc.source_index = 4;
        let geoms = [
            arc,
            Geom::circle(Point::planar(0.1, 0.2), 0.3, &mut tags).unwrap(),
            Geom::ellipse(Point::ZERO, 4.0, 1.5, 0.3, &mut tags).unwrap(),
            Geom::arc_of_ellipse(Point::ZERO, 4.0, 1.5, 0.3, 1.0, 2.0, &mut tags).unwrap(),
            Geom::line(Point::planar(0.0, 0.0), Point::planar(1.0 / 3.0, 2.0), &mut tags),
            Geom::bezier(
                vec![
                    Point::planar(0.0, 0.0),
                    Point::planar(1.0, 2.0),
                    Point::planar(3.0, 2.0),
                    Point::planar(4.0, 0.0),
                ],
                &mut tags,
            )
            .unwrap(),
            Geom::bspline(
                &[
                    vec![Point::planar(0.0, 0.0), Point::planar(1.0, 1.0), Point::planar(2.0, 0.0)],
                    vec![Point::planar(2.0, 0.0), Point::planar(3.0, -1.0), Point::planar(4.0, 0.0)],
                ],
                &mut tags,
            )
            .unwrap(),
        ];
        for g in &geoms {
            let back = round_trip(g);
            assert_same(g, &back);
            assert_eq!(back.reversed, g.reversed);
            assert_eq!(back.cosmetic_tag, g.cosmetic_tag);
            assert_eq!(back.class_of_edge, g.class_of_edge);
        }
    }

    #[test]
    fn circle_record_layout() {
        let mut tags = TagGenerator::from_seed(22);
        let g = Geom::circle(Point::planar(1.0, 2.0), 3.0, &mut tags).unwrap();
        let mut w = XmlWriter::new();
        g.save(&mut w);
        let expected = format!(
            "<GeomType value=\"1\"/>\n\
             <ExtractType value=\"0\"/>\n\
             <EdgeClass value=\"0\"/>\n\
             <HLRVisible value=\"1\"/>\n\
             <Reversed value=\"0\"/>\n\
             <Ref3D value=\"-1\"/>\n\
             <Cosmetic value=\"0\"/>\n\
             <Source value=\"0\"/>\n\
             <SourceIndex value=\"-1\"/>\n\
             <CosmeticTag value=\"\"/>\n\
             <Tag value=\"{}\"/>\n\
             <Center X=\"1\" Y=\"2\" Z=\"0\"/>\n\
             <Radius value=\"3\"/>\n",
            g.tag()
        );
        assert_eq!(w.as_str(), expected);
    }

    #[test]
    fn malformed_fields_restore_partially() {
        let text = "<GeomType value=\"1\"/><ExtractType value=\"0\"/><EdgeClass value=\"9\"/>\
                    <HLRVisible value=\"1\"/><Reversed value=\"0\"/><Ref3D value=\"-1\"/>\
                    <Cosmetic value=\"0\"/><Source value=\"0\"/><SourceIndex value=\"-1\"/>\
                    <CosmeticTag value=\"\"/><Tag value=\"not-a-uuid\"/>\
                    <Center X=\"0\" Y=\"0\" Z=\"0\"/><Radius value=\"2\"/>";
        let mut r = XmlReader::new(text);
        let g = Geom::restore(&mut r).unwrap();
        assert!(r.test_partial_restore());
        assert_eq!(g.class_of_edge, EdgeClass::Unset);
        assert!(g.tag().is_nil());
        assert_eq!(g.geom_type(), GeomType::Circle);
    }

    #[test]
    fn degenerate_generic_gets_placeholder() {
        let text = "<GeomType value=\"7\"/><ExtractType value=\"0\"/><EdgeClass value=\"0\"/>\
                    <HLRVisible value=\"1\"/><Reversed value=\"0\"/><Ref3D value=\"-1\"/>\
                    <Cosmetic value=\"0\"/><Source value=\"0\"/><SourceIndex value=\"-1\"/>\
                    <CosmeticTag value=\"\"/><Tag value=\"67e55044-10b1-426f-9247-bb680e5fe0c8\"/>\
                    <Points PointsCount=\"1\"><Point X=\"1\" Y=\"1\" Z=\"0\"/></Points>";
        let mut r = XmlReader::new(text);
        let g = Geom::restore(&mut r).unwrap();
        assert!(r.test_partial_restore());
        assert_eq!(g.natural_start(), Point::ZERO);
        assert_eq!(g.tag().to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn vertex_round_trip() {
        let mut tags = TagGenerator::from_seed(23);
        let mut v = Vertex::new(Point::planar(2.5, -1.0), &mut tags);
        v.is_center = true;
        v.hlr_visible = true;
        v.cosmetic = true;
        v.cosmetic_link = 3;
        v.cosmetic_tag = "owner".into();
        v.reference = true;
        let mut w = XmlWriter::new();
        v.save(&mut w);
        let text = w.into_string();
        let mut r = XmlReader::new(&text);
        let back = Vertex::restore(&mut r).unwrap();
        assert!(!r.test_partial_restore());
        assert!(back.is_center && back.hlr_visible && back.cosmetic);
        assert!(!back.reference);
        assert_eq!(back.cosmetic_link, 3);
        assert_eq!(back.cosmetic_tag, "owner");
        assert_eq!(back.tag(), v.tag());
        assert_eq!(back.point, v.point);
    }
}
