// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tag-addressed containers of persisted entities.

use crate::geom::GeomType;
use crate::persist::{XmlReader, XmlWriter};
use crate::{Geom, PersistError, Tag, Vertex};

/// An entity that can live in a [`RecordList`].
pub trait Record: Sized {
    /// Name of the container element.
    const LIST_ELEMENT: &'static str;
    /// Name of the element wrapping each entity.
    const ITEM_ELEMENT: &'static str;

    /// The entity's durable identity.
    fn tag(&self) -> Tag;

    /// Write the entity wrapped in its item element.
    fn save_item(&self, w: &mut XmlWriter);

    /// Read one entity, positioned just after its item element opened.
    ///
    /// Returns `None` for an entity that cannot be decoded at all and was
    /// skipped.
    fn restore_item(r: &mut XmlReader<'_>) -> Result<Option<Self>, PersistError>;
}

impl Record for Geom {
    const LIST_ELEMENT: &'static str = "GeomList";
    const ITEM_ELEMENT: &'static str = "Geom";

    fn tag(&self) -> Tag {
        Geom::tag(self)
    }

    fn save_item(&self, w: &mut XmlWriter) {
        w.begin(Self::ITEM_ELEMENT, &[("type", self.geom_type().name())]);
        self.save(w);
        w.end(Self::ITEM_ELEMENT);
    }

    fn restore_item(r: &mut XmlReader<'_>) -> Result<Option<Geom>, PersistError> {
        let name = r.required_attribute("type")?.to_owned();
        let Some(expected) = GeomType::from_name(&name) else {
            log::warn!("skipping curve of unknown type `{name}`");
            return Ok(None);
        };
        let geom = Geom::restore(r)?;
        if geom.geom_type() != expected {
            log::debug!(
                "record says {} but its container says {name}",
                geom.geom_type().name()
            );
            r.set_partial_restore();
        }
        Ok(Some(geom))
    }
}

impl Record for Vertex {
    const LIST_ELEMENT: &'static str = "VertexList";
    const ITEM_ELEMENT: &'static str = "Vertex";

    fn tag(&self) -> Tag {
        Vertex::tag(self)
    }

    fn save_item(&self, w: &mut XmlWriter) {
        w.begin(Self::ITEM_ELEMENT, &[]);
        self.save(w);
        w.end(Self::ITEM_ELEMENT);
    }

    fn restore_item(r: &mut XmlReader<'_>) -> Result<Option<Vertex>, PersistError> {
        Vertex::restore(r).map(Some)
    }
}

/// An ordered list of entities addressed by tag.
///
/// Whether order matters decides what happens to an entity that restores
/// only partially: an order-relevant list keeps the best-effort entity so
/// later positions do not shift, and any other list drops it.
#[derive(Debug)]
pub struct RecordList<T> {
    items: Vec<T>,
    order_relevant: bool,
}

/// A list of curves.
pub type GeomList = RecordList<Geom>;

/// A list of vertices.
pub type VertexList = RecordList<Vertex>;

impl<T: Record> RecordList<T> {
    /// An empty list.
    pub fn new(order_relevant: bool) -> RecordList<T> {
        RecordList {
            items: Vec::new(),
            order_relevant,
        }
    }

    /// Whether positions in the list are significant.
    pub fn is_order_relevant(&self) -> bool {
        self.order_relevant
    }

    /// Append an entity, returning its tag.
    pub fn add(&mut self, item: T) -> Tag {
        let tag = item.tag();
        self.items.push(item);
        tag
    }

    /// Replace the contents.
    pub fn set_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Remove the entity with `tag`, if present.
    pub fn remove_by_tag(&mut self, tag: Tag) -> Option<T> {
        let index = self.items.iter().position(|item| item.tag() == tag)?;
        Some(self.items.remove(index))
    }

    /// The entity with `tag`, if present.
    pub fn find_by_tag(&self, tag: Tag) -> Option<&T> {
        self.items.iter().find(|item| item.tag() == tag)
    }

    /// The entity with `tag` for mutation of its bookkeeping, if present.
    pub fn find_by_tag_mut(&mut self, tag: Tag) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.tag() == tag)
    }

    /// The entities in order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The entities as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write the list.
    pub fn save(&self, w: &mut XmlWriter) {
        let count = self.items.len().to_string();
        w.begin(T::LIST_ELEMENT, &[("count", &count)]);
        for item in &self.items {
            item.save_item(w);
        }
        w.end(T::LIST_ELEMENT);
    }

    /// Replace the contents with a list read from `r`.
    ///
    /// Partially restored entities are kept or dropped by the list's order
    /// policy, and the reader's partial-restore flag is cleared after each.
    pub fn restore(&mut self, r: &mut XmlReader<'_>) -> Result<(), PersistError> {
        r.read_element(T::LIST_ELEMENT)?;
        let count: usize = r.parsed_attribute("count");
        let mut items = Vec::with_capacity(count.min(4096));
        for i in 0..count {
            r.read_element(T::ITEM_ELEMENT)?;
            let item = T::restore_item(r)?;
            r.read_end_element(T::ITEM_ELEMENT)?;
            let Some(item) = item else {
                continue;
            };
            if r.test_partial_restore() {
                if self.order_relevant {
                    log::error!("{} entry {i} restored partially, keeping it", T::LIST_ELEMENT);
                    items.push(item);
                } else {
                    log::error!("{} entry {i} restored partially, dropping it", T::LIST_ELEMENT);
                }
                r.clear_partial_restore();
            } else {
                items.push(item);
            }
        }
        r.read_end_element(T::LIST_ELEMENT)?;
        self.items = items;
        Ok(())
    }
}

impl<T: Record> Default for RecordList<T> {
    fn default() -> Self {
        RecordList::new(true)
    }
}

impl<'a, T> IntoIterator for &'a RecordList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, TagGenerator};

    fn sample(tags: &mut TagGenerator) -> GeomList {
        let mut list = GeomList::new(true);
        list.add(Geom::circle(Point::planar(1.0, 1.0), 2.0, tags).unwrap());
        list.add(Geom::line(Point::ZERO, Point::planar(3.0, 4.0), tags));
        list.add(Geom::arc_of_circle(Point::ZERO, 1.0, 0.0, 2.0, tags).unwrap());
        list
    }

    #[test]
    fn tag_lookup() {
        let mut tags = TagGenerator::from_seed(31);
        let mut list = sample(&mut tags);
        let tag = list.as_slice()[1].tag();
        assert_eq!(list.find_by_tag(tag).map(Geom::geom_type), Some(GeomType::Generic));
        if let Some(g) = list.find_by_tag_mut(tag) {
            g.cosmetic = true;
        }
        let removed = list.remove_by_tag(tag).unwrap();
        assert!(removed.cosmetic);
        assert_eq!(list.len(), 2);
        assert!(list.find_by_tag(tag).is_none());
        assert!(list.remove_by_tag(tag).is_none());
    }

    #[test]
    fn list_round_trip() {
        let mut tags = TagGenerator::from_seed(32);
        let list = sample(&mut tags);
        let mut w = XmlWriter::new();
        list.save(&mut w);
        let text = w.into_string();
        assert!(text.starts_with("<GeomList count=\"3\">\n    <Geom type=\"Circle\">\n"), "{text}");

        let mut back = GeomList::new(true);
        let mut r = XmlReader::new(&text);
        back.restore(&mut r).unwrap();
        assert_eq!(back.len(), 3);
        for (a, b) in list.iter().zip(&back) {
            assert_eq!(a.tag(), b.tag());
            assert_eq!(a.kind(), b.kind());
        }
    }

    fn damaged_document(tags: &mut TagGenerator) -> String {
        let list = sample(tags);
        let mut w = XmlWriter::new();
        list.save(&mut w);
        // Corrupt the circle's radius.
        w.into_string().replacen("<Radius value=\"2\"/>", "<Radius value=\"two\"/>", 1)
    }

    #[test]
    fn partial_entries_follow_order_policy() {
        let mut tags = TagGenerator::from_seed(33);
        let text = damaged_document(&mut tags);

        let mut kept = GeomList::new(true);
        let mut r = XmlReader::new(&text);
        kept.restore(&mut r).unwrap();
        assert_eq!(kept.len(), 3);
        assert!(!r.test_partial_restore());

        let mut dropped = GeomList::new(false);
        let mut r = XmlReader::new(&text);
        dropped.restore(&mut r).unwrap();
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped.as_slice()[0].geom_type(), GeomType::Generic);
    }

    #[test]
    fn unknown_types_are_skipped() {
        let mut tags = TagGenerator::from_seed(34);
        let list = sample(&mut tags);
        let mut w = XmlWriter::new();
        list.save(&mut w);
        let text = w
            .into_string()
            .replacen("<Geom type=\"Circle\">", "<Geom type=\"Hyperbola\">", 1);
        let mut back = GeomList::new(true);
        back.restore(&mut XmlReader::new(&text)).unwrap();
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn vertex_list_round_trip() {
        let mut tags = TagGenerator::from_seed(35);
        let mut list = VertexList::new(false);
        for i in 0..3 {
            list.add(Vertex::new(Point::planar(i as f64, 0.5), &mut tags));
        }
        let mut w = XmlWriter::new();
        list.save(&mut w);
        let text = w.into_string();
        let mut back = VertexList::default();
        back.restore(&mut XmlReader::new(&text)).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back.as_slice()[2].point, Point::planar(2.0, 0.5));
        assert_eq!(back.as_slice()[0].tag(), list.as_slice()[0].tag());
    }
}
