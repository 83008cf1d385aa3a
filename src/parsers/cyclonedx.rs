//! CycloneDX XML inventory parser.
//!
//! Walks the document with a streaming reader and emits one component key per
//! `<component>` element, at any depth (metadata component and nested
//! components included). Group, name and version are the component's direct
//! child elements; licenses are the full text content of every `<license>`
//! element that belongs to the component, so `<id>` and `<url>` end up
//! separated by the document's own line break.

use crate::error::{AuditError, ParseErrorKind, Result};
use crate::model::{ComponentKey, KeySet};
use crate::parsers::traits::InventoryParser;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

const COMPONENT: &[u8] = b"component";
const LICENSE: &[u8] = b"license";

/// Parser for CycloneDX XML inventories
#[derive(Debug, Clone, Copy, Default)]
pub struct CycloneDxXmlParser;

impl CycloneDxXmlParser {
    /// Create a new parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Coordinate fields read from direct children of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Group,
    Name,
    Version,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"group" => Some(Self::Group),
            b"name" => Some(Self::Name),
            b"version" => Some(Self::Version),
            _ => None,
        }
    }
}

/// An open `<component>` element
#[derive(Debug, Default)]
struct ComponentFrame {
    depth: usize,
    group: Option<String>,
    name: Option<String>,
    version: Option<String>,
    licenses: Vec<String>,
}

impl ComponentFrame {
    fn at_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Group => &mut self.group,
            Field::Name => &mut self.name,
            Field::Version => &mut self.version,
        }
    }

    fn into_key(self) -> ComponentKey {
        ComponentKey::from_parts(
            self.group.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default(),
            self.version.as_deref().unwrap_or_default(),
            &self.licenses,
        )
    }
}

/// Text being collected for the innermost open component
#[derive(Debug)]
enum CaptureTarget {
    Field(Field),
    License,
}

#[derive(Debug)]
struct Capture {
    target: CaptureTarget,
    depth: usize,
    text: String,
}

fn invalid_xml(err: impl std::fmt::Display) -> AuditError {
    AuditError::parse("inventory document", ParseErrorKind::InvalidXml(err.to_string()))
}

fn invalid_structure(message: &str) -> AuditError {
    AuditError::parse(
        "inventory document",
        ParseErrorKind::InvalidStructure(message.to_string()),
    )
}

impl InventoryParser for CycloneDxXmlParser {
    fn parse_str(&self, content: &str) -> Result<KeySet> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut keys = KeySet::new();
        let mut frames: Vec<ComponentFrame> = Vec::new();
        let mut capture: Option<Capture> = None;
        let mut depth = 0usize;
        let mut seen_root = false;

        loop {
            match reader.read_event().map_err(invalid_xml)? {
                Event::Start(start) => {
                    if depth == 0 && seen_root {
                        return Err(invalid_structure("more than one root element"));
                    }
                    seen_root = true;
                    depth += 1;
                    let tag = start.local_name();
                    let tag = tag.as_ref();

                    if tag == COMPONENT && capture.is_none() {
                        frames.push(ComponentFrame::at_depth(depth));
                        continue;
                    }
                    if capture.is_some() {
                        continue;
                    }
                    if let Some(frame) = frames.last_mut() {
                        if tag == LICENSE {
                            capture = Some(Capture {
                                target: CaptureTarget::License,
                                depth,
                                text: String::new(),
                            });
                        } else if let Some(field) = Field::from_tag(tag) {
                            if depth == frame.depth + 1 && frame.slot(field).is_none() {
                                capture = Some(Capture {
                                    target: CaptureTarget::Field(field),
                                    depth,
                                    text: String::new(),
                                });
                            }
                        }
                    }
                }
                Event::Empty(empty) => {
                    if depth == 0 {
                        if seen_root {
                            return Err(invalid_structure("more than one root element"));
                        }
                        seen_root = true;
                    }
                    let tag = empty.local_name();
                    let tag = tag.as_ref();
                    if capture.is_some() {
                        continue;
                    }
                    if tag == COMPONENT {
                        keys.insert(ComponentFrame::at_depth(depth + 1).into_key());
                    } else if let Some(frame) = frames.last_mut() {
                        if let Some(field) = Field::from_tag(tag) {
                            let direct_child = depth == frame.depth;
                            let slot = frame.slot(field);
                            if direct_child && slot.is_none() {
                                *slot = Some(String::new());
                            }
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some(capture) = capture.as_mut() {
                        capture.text.push_str(&text.unescape().map_err(invalid_xml)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(capture) = capture.as_mut() {
                        capture
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    if depth == 0 {
                        return Err(invalid_structure("unexpected closing tag"));
                    }
                    if capture.as_ref().is_some_and(|c| c.depth == depth) {
                        if let (Some(done), Some(frame)) = (capture.take(), frames.last_mut()) {
                            match done.target {
                                CaptureTarget::Field(field) => {
                                    *frame.slot(field) = Some(done.text.trim().to_string());
                                }
                                CaptureTarget::License => frame.licenses.push(done.text),
                            }
                        }
                    } else if frames.last().is_some_and(|f| f.depth == depth) {
                        if let Some(frame) = frames.pop() {
                            let key = frame.into_key();
                            tracing::debug!("Component key: {:?}", key.as_str());
                            keys.insert(key);
                        }
                    }
                    depth -= 1;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(invalid_structure("document has no root element"));
        }
        if depth != 0 {
            return Err(invalid_structure("document ended inside an open element"));
        }

        Ok(keys)
    }
}
