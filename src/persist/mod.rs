// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field-level persistence of curves and vertices.
//!
//! Records are written one element per field, with the value in a `value`
//! attribute or, for points, in `X`, `Y` and `Z` attributes. The format is
//! positional: a record is read back by asking for its elements in the
//! order they were written, skipping anything in between.
//!
//! A field whose text cannot be parsed does not abort a restore. The
//! [`XmlReader`] substitutes a default and raises its partial-restore flag,
//! and the containers in this module decide whether to keep the degraded
//! entity. Only a document whose structure cannot be followed yields a
//! [`PersistError`].

use core::fmt::{self, Display, Write as _};
use core::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{PersistError, Point};

mod geom;
mod list;

pub use list::{GeomList, Record, RecordList, VertexList};

/// Writes persisted records as indented XML.
#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    /// An empty writer.
    pub fn new() -> XmlWriter {
        XmlWriter::default()
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Finish writing and take the text.
    pub fn into_string(self) -> String {
        self.out
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            // Writing to a String cannot fail.
            let _ = write!(self.out, " {key}=\"{}\"", quick_xml::escape::escape(*value));
        }
    }

    /// Open an element that will hold children.
    pub fn begin(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.open(name, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    /// Close an element opened with [`XmlWriter::begin`].
    pub fn end(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        let _ = writeln!(self.out, "</{name}>");
    }

    /// Write an element with attributes and no children.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.open(name, attrs);
        self.out.push_str("/>\n");
    }

    /// Write `<name value="..."/>`.
    pub fn value(&mut self, name: &str, value: impl Display) {
        self.empty(name, &[("value", &value.to_string())]);
    }

    /// Write a flag as `'0'` or `'1'`.
    pub fn flag(&mut self, name: &str, value: bool) {
        self.value(name, if value { '1' } else { '0' });
    }

    /// Write `<name X="..." Y="..." Z="..."/>`.
    pub fn point(&mut self, name: &str, p: Point) {
        let (x, y, z) = (p.x.to_string(), p.y.to_string(), p.z.to_string());
        self.empty(name, &[("X", &x), ("Y", &y), ("Z", &z)]);
    }
}

#[derive(Debug)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
}

/// Reads persisted records written by [`XmlWriter`].
pub struct XmlReader<'a> {
    reader: Reader<&'a [u8]>,
    current: Option<Element>,
    partial: bool,
}

impl fmt::Debug for XmlReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlReader")
            .field("position", &self.reader.buffer_position())
            .field("current", &self.current)
            .field("partial", &self.partial)
            .finish()
    }
}

impl<'a> XmlReader<'a> {
    /// A reader over a whole document.
    pub fn new(text: &'a str) -> XmlReader<'a> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);
        XmlReader {
            reader,
            current: None,
            partial: false,
        }
    }

    fn error(&self, e: impl Display) -> PersistError {
        PersistError::Xml {
            position: self.reader.buffer_position(),
            message: e.to_string(),
        }
    }

    fn element(&self, start: &BytesStart<'_>) -> Result<Element, PersistError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.error(e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| self.error(e))?;
            attrs.push((key, value.into_owned()));
        }
        Ok(Element { name, attrs })
    }

    /// Advance to the next element called `name`, skipping anything else.
    pub fn read_element(&mut self, name: &str) -> Result<(), PersistError> {
        loop {
            let event = self.reader.read_event().map_err(|e| self.error(e))?;
            match event {
                Event::Start(start) | Event::Empty(start) => {
                    if start.name().as_ref() == name.as_bytes() {
                        self.current = Some(self.element(&start)?);
                        return Ok(());
                    }
                }
                Event::Eof => return Err(PersistError::UnexpectedEof(name.to_owned())),
                _ => {}
            }
        }
    }

    /// Advance past the closing tag of the next element called `name`.
    pub fn read_end_element(&mut self, name: &str) -> Result<(), PersistError> {
        loop {
            let event = self.reader.read_event().map_err(|e| self.error(e))?;
            match event {
                Event::End(end) if end.name().as_ref() == name.as_bytes() => return Ok(()),
                Event::Eof => return Err(PersistError::UnexpectedEof(format!("/{name}"))),
                _ => {}
            }
        }
    }

    /// The raw attribute of the current element.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let element = self.current.as_ref()?;
        element
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// An attribute that must be present for the document to make sense.
    pub fn required_attribute(&self, name: &str) -> Result<&str, PersistError> {
        self.attribute(name)
            .ok_or_else(|| PersistError::MissingAttribute {
                element: self
                    .current
                    .as_ref()
                    .map(|e| e.name.clone())
                    .unwrap_or_default(),
                attribute: name.to_owned(),
            })
    }

    /// Parse an attribute, falling back to the default and marking the
    /// restore partial if it is missing or malformed.
    pub fn parsed_attribute<T: FromStr + Default>(&mut self, name: &str) -> T {
        match self.attribute(name).map(|s| s.trim().parse::<T>()) {
            Some(Ok(value)) => value,
            _ => {
                log::debug!("attribute `{name}` is missing or malformed");
                self.partial = true;
                T::default()
            }
        }
    }

    /// Read `<name value="..."/>` and parse the value.
    pub fn read_value<T: FromStr + Default>(&mut self, name: &str) -> Result<T, PersistError> {
        self.read_element(name)?;
        Ok(self.parsed_attribute("value"))
    }

    /// Read `<name value="..."/>` as a flag; any non-zero integer is set.
    pub fn read_flag(&mut self, name: &str) -> Result<bool, PersistError> {
        Ok(self.read_value::<i32>(name)? != 0)
    }

    /// Read `<name value="..."/>` as text.
    pub fn read_string(&mut self, name: &str) -> Result<String, PersistError> {
        self.read_element(name)?;
        match self.attribute("value") {
            Some(s) => Ok(s.to_owned()),
            None => {
                self.partial = true;
                Ok(String::new())
            }
        }
    }

    /// Read `<name X="..." Y="..." Z="..."/>`.
    pub fn read_point(&mut self, name: &str) -> Result<Point, PersistError> {
        self.read_element(name)?;
        let x = self.parsed_attribute("X");
        let y = self.parsed_attribute("Y");
        let z = self.parsed_attribute("Z");
        Ok(Point::new(x, y, z))
    }

    /// Mark the entity being read as only partially restored.
    pub fn set_partial_restore(&mut self) {
        self.partial = true;
    }

    /// Whether anything since the last clear was only partially restored.
    pub fn test_partial_restore(&self) -> bool {
        self.partial
    }

    /// Reset the partial-restore flag.
    pub fn clear_partial_restore(&mut self) {
        self.partial = false;
    }
}
