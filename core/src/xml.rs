//! Minimal streaming XML writer.
//!
//! Output is produced as the structural calls arrive: nothing is buffered
//! beyond the stack of open element names. Call-order mistakes (an attribute
//! after content, unbalanced elements, content outside the document) are
//! reported as [`XmlError`] instead of producing malformed output.
//!
//! # Layout
//!
//! Child elements are indented two spaces per nesting level. Elements with
//! neither text nor children collapse to `<name/>`. Elements holding text keep
//! it on one line:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//!
//! <waypoint>
//!   <divetime>30</divetime>
//!   <depth>10</depth>
//! </waypoint>
//! ```

use std::fmt::Display;
use std::io::Write;
use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use log::error;
use quick_xml::escape::{escape, partial_escape};

use crate::error::XmlError;

const INDENT: &str = "  ";

/// Render a timestamp as `YYYY-MM-DDThh:mm:ssZ`.
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug)]
struct ElementState {
    name: String,
    has_text: bool,
    has_child_elements: bool,
}

impl ElementState {
    fn new(name: &str) -> Self {
        ElementState {
            name: name.to_string(),
            has_text: false,
            has_child_elements: false,
        }
    }

    /// Still accepting attributes.
    fn is_open(&self) -> bool {
        !self.has_text && !self.has_child_elements
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentState {
    NotStarted,
    Started,
    Ended,
}

/// SAX-style writer emitting indented XML into `W`.
#[derive(Debug)]
pub struct XmlWriter<W: Write> {
    out: W,
    stack: Vec<ElementState>,
    state: DocumentState,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        XmlWriter {
            out,
            stack: Vec::new(),
            state: DocumentState::NotStarted,
        }
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn start_document(&mut self) -> Result<(), XmlError> {
        match self.state {
            DocumentState::NotStarted => {}
            DocumentState::Started => return Err(XmlError::DocumentAlreadyStarted),
            DocumentState::Ended => return Err(XmlError::DocumentEnded),
        }
        self.state = DocumentState::Started;
        write!(self.out, "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\n")?;
        Ok(())
    }

    pub fn end_document(&mut self) -> Result<(), XmlError> {
        self.ensure_started()?;
        if !self.stack.is_empty() {
            return Err(XmlError::UnclosedElements(self.stack.len()));
        }
        self.state = DocumentState::Ended;
        self.out.flush()?;
        Ok(())
    }

    pub fn start_element(&mut self, name: &str) -> Result<(), XmlError> {
        self.ensure_started()?;

        let depth = self.stack.len();
        if let Some(parent) = self.stack.last_mut() {
            if parent.is_open() {
                writeln!(self.out, ">")?;
            }
            parent.has_child_elements = true;
            if !parent.has_text {
                self.out.write_all(INDENT.repeat(depth).as_bytes())?;
            }
        }

        write!(self.out, "<{}", name)?;
        self.stack.push(ElementState::new(name));
        Ok(())
    }

    pub fn end_element(&mut self) -> Result<(), XmlError> {
        let element = self.stack.pop().ok_or(XmlError::NoOpenElement)?;

        if element.is_open() {
            writeln!(self.out, "/>")?;
        } else {
            if !element.has_text {
                self.out
                    .write_all(INDENT.repeat(self.stack.len()).as_bytes())?;
            }
            writeln!(self.out, "</{}>", element.name)?;
        }
        Ok(())
    }

    /// Add an attribute to the element just started.
    pub fn attribute(&mut self, name: &str, value: impl Display) -> Result<(), XmlError> {
        let element = self.stack.last().ok_or(XmlError::NoOpenElement)?;
        if !element.is_open() {
            return Err(XmlError::AttributeAfterContent {
                element: element.name.clone(),
                attribute: name.to_string(),
            });
        }

        let value = value.to_string();
        write!(self.out, " {}=\"{}\"", name, escape(value.as_str()))?;
        Ok(())
    }

    pub fn text(&mut self, value: impl Display) -> Result<(), XmlError> {
        let element = self.stack.last_mut().ok_or(XmlError::NoOpenElement)?;
        if element.is_open() {
            self.out.write_all(b">")?;
        }
        element.has_text = true;

        let value = value.to_string();
        self.out
            .write_all(partial_escape(value.as_str()).as_bytes())?;
        Ok(())
    }

    pub fn text_datetime(&mut self, datetime: &DateTime<Utc>) -> Result<(), XmlError> {
        self.text(format_datetime(datetime))
    }

    /// Write `<name>value</name>`.
    pub fn simple_text_element(
        &mut self,
        name: &str,
        value: impl Display,
    ) -> Result<(), XmlError> {
        self.start_element(name)?;
        self.text(value)?;
        self.end_element()
    }

    /// Open `name` and return a guard that closes it again.
    pub fn element(&mut self, name: &str) -> Result<ElementGuard<'_, W>, XmlError> {
        ElementGuard::open(self, name)
    }

    fn ensure_started(&self) -> Result<(), XmlError> {
        match self.state {
            DocumentState::Started => Ok(()),
            DocumentState::NotStarted => Err(XmlError::DocumentNotStarted),
            DocumentState::Ended => Err(XmlError::DocumentEnded),
        }
    }
}

/// An element that is closed when the guard goes out of scope.
///
/// Prefer [`close`](Self::close), which reports write failures; a guard that is
/// merely dropped (for instance on an early `?` return) still closes its
/// element but can only log a failure.
pub struct ElementGuard<'a, W: Write> {
    writer: &'a mut XmlWriter<W>,
    closed: bool,
}

impl<'a, W: Write> ElementGuard<'a, W> {
    pub fn open(writer: &'a mut XmlWriter<W>, name: &str) -> Result<Self, XmlError> {
        writer.start_element(name)?;
        Ok(ElementGuard {
            writer,
            closed: false,
        })
    }

    pub fn close(mut self) -> Result<(), XmlError> {
        self.closed = true;
        self.writer.end_element()
    }
}

impl<W: Write> Deref for ElementGuard<'_, W> {
    type Target = XmlWriter<W>;

    fn deref(&self) -> &Self::Target {
        self.writer
    }
}

impl<W: Write> DerefMut for ElementGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer
    }
}

impl<W: Write> Drop for ElementGuard<'_, W> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.writer.end_element() {
                error!("failed to close element: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn output(writer: XmlWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_nested_layout() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        w.start_element("uddf").unwrap();
        w.attribute("version", "3.0.0").unwrap();
        w.start_element("waypoint").unwrap();
        w.simple_text_element("divetime", 30).unwrap();
        w.simple_text_element("depth", 10.5).unwrap();
        w.end_element().unwrap();
        w.start_element("applicationdata").unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();
        w.end_document().unwrap();

        assert_eq!(
            output(w),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\n\
             <uddf version=\"3.0.0\">\n\
             \x20 <waypoint>\n\
             \x20   <divetime>30</divetime>\n\
             \x20   <depth>10.5</depth>\n\
             \x20 </waypoint>\n\
             \x20 <applicationdata/>\n\
             </uddf>\n"
        );
    }

    #[test]
    fn test_empty_root_self_closes() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        w.start_element("uddf").unwrap();
        w.attribute("version", "3.0.0").unwrap();
        w.end_element().unwrap();
        w.end_document().unwrap();
        assert!(output(w).ends_with("<uddf version=\"3.0.0\"/>\n"));
    }

    #[test]
    fn test_escaping() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        w.start_element("contact").unwrap();
        w.attribute("href", "a\"b<c>&'d").unwrap();
        w.text("<fish & chips>").unwrap();
        w.end_element().unwrap();
        w.end_document().unwrap();
        let xml = output(w);
        assert!(xml.contains("href=\"a&quot;b&lt;c&gt;&amp;&apos;d\""));
        assert!(xml.contains(">&lt;fish &amp; chips&gt;</contact>"));
    }

    #[test]
    fn test_datetime_format() {
        let dt = Utc.with_ymd_and_hms(2011, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_datetime(&dt), "2011-03-07T09:05:02Z");
    }

    #[test]
    fn test_end_element_on_empty_stack() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        assert!(matches!(w.end_element(), Err(XmlError::NoOpenElement)));
    }

    #[test]
    fn test_attribute_after_text() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        w.start_element("name").unwrap();
        w.text("x").unwrap();
        let err = w.attribute("id", "1").unwrap_err();
        assert!(matches!(
            err,
            XmlError::AttributeAfterContent { ref element, ref attribute }
                if element == "name" && attribute == "id"
        ));
    }

    #[test]
    fn test_attribute_after_child() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        w.start_element("dive").unwrap();
        w.start_element("waypoint").unwrap();
        w.end_element().unwrap();
        assert!(w.attribute("id", "dive-1").is_err());
    }

    #[test]
    fn test_document_ordering() {
        let mut w = XmlWriter::new(Vec::new());
        assert!(matches!(
            w.start_element("uddf"),
            Err(XmlError::DocumentNotStarted)
        ));
        w.start_document().unwrap();
        assert!(matches!(
            w.start_document(),
            Err(XmlError::DocumentAlreadyStarted)
        ));
        w.start_element("uddf").unwrap();
        assert!(matches!(
            w.end_document(),
            Err(XmlError::UnclosedElements(1))
        ));
        w.end_element().unwrap();
        w.end_document().unwrap();
        assert!(matches!(
            w.start_element("late"),
            Err(XmlError::DocumentEnded)
        ));
    }

    #[test]
    fn test_guard_closes_on_drop() {
        fn write_partial(w: &mut XmlWriter<Vec<u8>>) -> Result<(), XmlError> {
            let mut outer = w.element("outer")?;
            outer.simple_text_element("a", 1)?;
            // Fails: the guard must still close <outer>.
            outer.attribute("late", "x")?;
            outer.close()
        }

        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        assert!(write_partial(&mut w).is_err());
        assert_eq!(w.depth(), 0);
        w.end_document().unwrap();
        assert!(output(w).ends_with("</outer>\n"));
    }

    #[test]
    fn test_guard_explicit_close() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_document().unwrap();
        let guard = w.element("profiledata").unwrap();
        guard.close().unwrap();
        assert_eq!(w.depth(), 0);
    }

    #[derive(Debug, Clone)]
    enum Call {
        Start,
        Attr,
        Text,
        End,
    }

    fn call() -> impl Strategy<Value = Call> {
        prop_oneof![Just(Call::Start), Just(Call::Attr), Just(Call::Text), Just(Call::End)]
    }

    proptest! {
        #[test]
        fn prop_tags_stay_balanced(calls in prop::collection::vec(call(), 0..48)) {
            let mut w = XmlWriter::new(Vec::new());
            w.start_document().unwrap();
            let mut opened = 0usize;
            let mut closed = 0usize;

            for c in &calls {
                match c {
                    Call::Start => {
                        w.start_element("e").unwrap();
                        opened += 1;
                    }
                    Call::Attr => {
                        let _ = w.attribute("k", "v");
                    }
                    Call::Text => {
                        let _ = w.text("t");
                    }
                    Call::End => {
                        if w.end_element().is_ok() {
                            closed += 1;
                        }
                    }
                }
            }
            while w.depth() > 0 {
                w.end_element().unwrap();
                closed += 1;
            }
            w.end_document().unwrap();

            prop_assert_eq!(opened, closed);
            let xml = output(w);
            let starts = xml.matches("<e").count();
            let self_closed = xml.matches("/>").count();
            let ends = xml.matches("</e>").count();
            prop_assert_eq!(starts, opened);
            prop_assert_eq!(self_closed + ends, opened);
        }
    }
}
