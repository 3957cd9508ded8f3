//! Event-stream model of a property-list XML document.
//!
//! The document is kept as the ordered list of its raw XML events so that
//! serialization reproduces everything a mutation pass does not touch:
//! element ordering, attributes, comments, whitespace, and unrelated
//! siblings. Property entries are indexed during the parse, and a value
//! rewrite is a single-event substitution.

use crate::EngineError;
use log::debug;
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};

/// Element holding one name/value pair.
const PROPERTY_TAG: &str = "property";
/// Direct child carrying the property name.
const NAME_TAG: &str = "name";
/// Direct child carrying the property value.
const VALUE_TAG: &str = "value";

/// Parsed property-list document: the raw event stream plus an index of the
/// property entries in document order.
#[derive(Debug, Clone)]
pub struct PropertyDocument {
    prefix: String,
    events: Vec<Event<'static>>,
    slots: Vec<PropertySlot>,
}

/// Read-only view of one property entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property<'a> {
    /// Trimmed name text, when the name child carries a text node.
    pub name: Option<&'a str>,
    /// Trimmed value text, when the value child carries a text node.
    pub value: Option<&'a str>,
}

/// One property entry discovered during the parse.
#[derive(Debug, Clone, Default)]
struct PropertySlot {
    name: Option<String>,
    value: Option<String>,
    /// Index of the event carrying the value text, for in-place replacement.
    value_event: Option<usize>,
}

/// Which child of a property element is currently open.
#[derive(Clone, Copy)]
enum Field {
    Name,
    Value,
}

/// Parse state while inside a property element.
///
/// `depth` counts elements opened below the property itself, so direct
/// children sit at depth 1. Nested property elements are treated as opaque
/// content of the outer entry.
struct Capture {
    slot: usize,
    depth: usize,
    field: Option<Field>,
}

impl PropertyDocument {
    /// Parse document bytes, detecting the namespace prefix from the root
    /// element's qualified name and indexing every property element at any
    /// depth. Name and value are taken from direct children only; the first
    /// text or CDATA node inside each wins.
    pub fn parse(bytes: &[u8]) -> Result<Self, EngineError> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();

        let mut events: Vec<Event<'static>> = Vec::new();
        let mut slots: Vec<PropertySlot> = Vec::new();
        let mut prefix: Option<String> = None;
        let mut capture: Option<Capture> = None;

        loop {
            let event = reader.read_event_into(&mut buf)?.into_owned();
            if matches!(event, Event::Eof) {
                break;
            }
            let index = events.len();

            match &event {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.name().into_inner()).into_owned();
                    let ns = prefix.get_or_insert_with(|| name_prefix(&name)).clone();
                    match capture.as_mut() {
                        Some(open) => {
                            open.depth += 1;
                            if open.depth == 1 {
                                let slot = &slots[open.slot];
                                if slot.name.is_none() && is_tag(&name, &ns, NAME_TAG) {
                                    open.field = Some(Field::Name);
                                } else if slot.value.is_none() && is_tag(&name, &ns, VALUE_TAG) {
                                    open.field = Some(Field::Value);
                                }
                            }
                        }
                        None => {
                            if is_tag(&name, &ns, PROPERTY_TAG) {
                                capture = Some(Capture {
                                    slot: slots.len(),
                                    depth: 0,
                                    field: None,
                                });
                                slots.push(PropertySlot::default());
                            }
                        }
                    }
                }
                Event::End(_) => {
                    if let Some(open) = capture.as_mut() {
                        if open.depth == 0 {
                            capture = None;
                        } else {
                            if open.depth == 1 {
                                open.field = None;
                            }
                            open.depth -= 1;
                        }
                    }
                }
                Event::Empty(start) => {
                    // A self-closing child has no text node, so it never
                    // fills a field; only a self-closing root matters here.
                    let name = String::from_utf8_lossy(start.name().into_inner()).into_owned();
                    prefix.get_or_insert_with(|| name_prefix(&name));
                }
                Event::Text(text) => {
                    if let Some(open) = &capture {
                        if open.depth == 1 {
                            if let Some(field) = open.field {
                                let content = text.unescape()?.trim().to_string();
                                fill(&mut slots[open.slot], field, content, index);
                            }
                        }
                    }
                }
                Event::CData(data) => {
                    if let Some(open) = &capture {
                        if open.depth == 1 {
                            if let Some(field) = open.field {
                                let content = String::from_utf8_lossy(data).trim().to_string();
                                fill(&mut slots[open.slot], field, content, index);
                            }
                        }
                    }
                }
                _ => {}
            }

            events.push(event);
            buf.clear();
        }

        let prefix = prefix.ok_or(EngineError::MissingRoot)?;
        debug!(
            "parsed property document: prefix '{prefix}', {} entries, {} events",
            slots.len(),
            events.len()
        );

        Ok(Self {
            prefix,
            events,
            slots,
        })
    }

    /// Namespace prefix taken from the root element, `""` when unprefixed.
    pub fn namespace_prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of property entries found, including incomplete ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the document holds no property entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Property entries in document order.
    pub fn properties(&self) -> impl Iterator<Item = Property<'_>> {
        self.slots.iter().map(|slot| Property {
            name: slot.name.as_deref(),
            value: slot.value.as_deref(),
        })
    }

    /// Replace the value text of the entry at `index`.
    ///
    /// Returns false when the entry does not exist or has no value text node
    /// to replace.
    pub fn set_value(&mut self, index: usize, value: &str) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        let Some(event_index) = slot.value_event else {
            return false;
        };
        self.events[event_index] = Event::Text(BytesText::new(value).into_owned());
        slot.value = Some(value.to_string());
        true
    }

    /// Serialize the event stream back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.events {
            writer.write_event(event.clone())?;
        }
        Ok(writer.into_inner())
    }
}

/// Record text content for a field, keeping the first node found.
fn fill(slot: &mut PropertySlot, field: Field, content: String, index: usize) {
    match field {
        Field::Name => {
            if slot.name.is_none() {
                slot.name = Some(content);
            }
        }
        Field::Value => {
            if slot.value.is_none() {
                slot.value = Some(content);
                slot.value_event = Some(index);
            }
        }
    }
}

/// Everything up to and including the `:` of a qualified name, or `""`.
fn name_prefix(qname: &str) -> String {
    match qname.find(':') {
        Some(at) => qname[..=at].to_string(),
        None => String::new(),
    }
}

/// Compare a raw element name against the prefixed form of a local tag.
fn is_tag(name: &str, prefix: &str, tag: &str) -> bool {
    name.strip_prefix(prefix).is_some_and(|rest| rest == tag)
}
