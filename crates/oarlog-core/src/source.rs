//! Raw record reader for club software XML exports.
//!
//! Every export file is a flat list of `<record>` elements whose direct
//! children are named fields:
//!
//! ```xml
//! <efa><data>
//!   <record><Id>...</Id><Name>Vierer</Name><Deleted/></record>
//! </data></efa>
//! ```
//!
//! Nothing here knows what the fields mean; the loader and normalizer pull
//! values out of a [`RawRecord`] by tag.

use std::fmt;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::{ImportError, Result};

const RECORD_TAG: &[u8] = b"record";

/// One `<record>` element with its child fields in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and by callers synthesizing records
    pub fn with(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(tag, value);
        self
    }

    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.fields.push((tag.into(), value.into()));
    }

    /// Whether the field element exists at all, even if empty
    pub fn has(&self, tag: &str) -> bool {
        self.fields.iter().any(|(t, _)| t == tag)
    }

    /// Text of the first field with this tag, possibly empty
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    /// Text of the field, only if present and non-empty
    pub fn text(&self, tag: &str) -> Option<&str> {
        self.get(tag).filter(|v| !v.is_empty())
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (tag, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={:?}", tag, value)?;
        }
        Ok(())
    }
}

/// Read and parse every record of an export file
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
    let records = parse_records(&content).map_err(|e| ImportError::xml(path, e))?;
    debug!(path = %path.display(), count = records.len(), "Read records");
    Ok(records)
}

/// Parse records from an in-memory document
pub fn parse_records(xml: &str) -> std::result::Result<Vec<RawRecord>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;
    // Depth relative to the open <record>; 1 means inside a field element
    let mut depth = 0usize;
    let mut field_tag = String::new();
    let mut field_text = String::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                if current.is_none() {
                    if e.name().as_ref() == RECORD_TAG {
                        current = Some(RawRecord::new());
                        depth = 0;
                    }
                } else {
                    depth += 1;
                    if depth == 1 {
                        field_tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        field_text.clear();
                    }
                }
            }
            Event::Empty(ref e) => match current.as_mut() {
                Some(record) if depth == 0 => {
                    record.push(String::from_utf8_lossy(e.name().as_ref()), "");
                }
                Some(_) => {}
                None if e.name().as_ref() == RECORD_TAG => records.push(RawRecord::new()),
                None => {}
            },
            Event::End(_) if current.is_some() => {
                if depth == 0 {
                    if let Some(done) = current.take() {
                        records.push(done);
                    }
                } else {
                    if depth == 1 {
                        if let Some(record) = current.as_mut() {
                            record.push(
                                std::mem::take(&mut field_tag),
                                field_text.trim().to_string(),
                            );
                        }
                    }
                    depth -= 1;
                }
            }
            Event::Text(ref e) if current.is_some() && depth >= 1 => {
                field_text.push_str(&String::from_utf8_lossy(e));
            }
            Event::CData(ref e) if current.is_some() && depth >= 1 => {
                field_text.push_str(&String::from_utf8_lossy(e));
            }
            Event::GeneralRef(ref e) if current.is_some() && depth >= 1 => {
                let name = String::from_utf8_lossy(e);
                match resolve_entity(&name) {
                    Some(resolved) => field_text.push_str(&resolved),
                    None => {
                        field_text.push('&');
                        field_text.push_str(&name);
                        field_text.push(';');
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(records)
}

/// Resolve a predefined or numeric character entity by name (without `&`/`;`)
fn resolve_entity(name: &str) -> Option<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)?
        }
    };
    Some(resolved.to_string())
}
