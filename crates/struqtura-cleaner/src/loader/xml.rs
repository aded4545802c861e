//! Record-oriented XML via `quick-xml`.
//!
//! The document root holds one element per row. A row's attributes and its
//! child elements become columns, in first-seen order:
//!
//! ```xml
//! <data>
//!   <row id="1"><age>25</age><city>NY</city></row>
//!   <row id="2"><city>LA</city></row>
//! </data>
//! ```
//!
//! Fields absent from a row are missing. Values are typed the same way as
//! the other cell-by-cell loaders.

use super::columns::{Cell, build_table, unique_headers};
use crate::error::{CleanerError, Result};
use crate::types::Table;
use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::collections::HashMap;
use std::io::Cursor;

const FORMAT: &str = "xml";

const ROOT_DEPTH: usize = 1;
const ROW_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

/// Field names in first-seen order plus the rows that reference them.
#[derive(Default)]
struct Records {
    names: Vec<String>,
    positions: HashMap<String, usize>,
    rows: Vec<Vec<(usize, String)>>,
}

impl Records {
    fn position(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.positions.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.positions.insert(name.to_string(), idx);
        idx
    }

    fn into_table(self) -> Result<Table> {
        let mut columns: Vec<Vec<Cell>> = vec![vec![Cell::Null; self.rows.len()]; self.names.len()];
        for (row_idx, row) in self.rows.into_iter().enumerate() {
            for (col_idx, value) in row {
                columns[col_idx][row_idx] = Cell::parse(&value);
            }
        }
        build_table(FORMAT, unique_headers(self.names), columns)
    }
}

pub(super) fn read_xml(bytes: &[u8]) -> Result<Table> {
    let mut reader = Reader::from_reader(Cursor::new(bytes));
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.trim_text(false);

    let mut buffer = Vec::with_capacity(1024);
    let mut records = Records::default();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut row: Vec<(usize, String)> = Vec::new();
    let mut field: Option<(usize, String)> = None;

    loop {
        buffer.clear();
        let event = reader
            .read_event_into(&mut buffer)
            .map_err(|e| CleanerError::parse(FORMAT, e))?;

        match event {
            Event::Start(ref element) => {
                depth += 1;
                match depth {
                    ROOT_DEPTH => seen_root = true,
                    ROW_DEPTH => {
                        row.clear();
                        for (name, value) in attributes(element)? {
                            let idx = records.position(&name);
                            row.push((idx, value));
                        }
                    }
                    FIELD_DEPTH => {
                        let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                        field = Some((records.position(&name), String::new()));
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                match depth {
                    FIELD_DEPTH => {
                        if let Some(done) = field.take() {
                            row.push(done);
                        }
                    }
                    ROW_DEPTH => records.rows.push(std::mem::take(&mut row)),
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(ref text) if depth == FIELD_DEPTH => {
                if let Some((_, value)) = field.as_mut() {
                    let content = text.xml_content().map_err(|e| CleanerError::parse(FORMAT, e))?;
                    value.push_str(&content);
                }
            }
            Event::CData(ref data) if depth == FIELD_DEPTH => {
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&String::from_utf8_lossy(data));
                }
            }
            Event::GeneralRef(ref reference) if depth == FIELD_DEPTH => {
                if let Some((_, value)) = field.as_mut() {
                    push_reference(value, reference)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(CleanerError::parse(FORMAT, "document has no root element"));
    }
    if depth != 0 {
        return Err(CleanerError::parse(FORMAT, "document ended inside an open element"));
    }

    records.into_table()
}

fn attributes(element: &BytesStart) -> Result<Vec<(String, String)>> {
    element
        .attributes()
        .map(|attribute| {
            let attribute = attribute.map_err(|e| CleanerError::parse(FORMAT, e))?;
            let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| CleanerError::parse(FORMAT, e))?
                .into_owned();
            Ok((name, value))
        })
        .collect()
}

/// Append an entity or character reference (`&amp;`, `&#38;`, `&#x26;`).
fn push_reference(value: &mut String, reference: &BytesRef) -> Result<()> {
    let raw = reference
        .xml_content()
        .map_err(|e| CleanerError::parse(FORMAT, e))?;

    if let Some(number) = raw.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        }
        .map_err(|_| CleanerError::parse(FORMAT, format!("bad character reference '&{};'", raw)))?;
        let character = char::from_u32(code)
            .ok_or_else(|| CleanerError::parse(FORMAT, format!("bad character reference '&{};'", raw)))?;
        value.push(character);
    } else if let Some(entity) = resolve_xml_entity(&raw) {
        value.push_str(entity);
    } else {
        return Err(CleanerError::parse(FORMAT, format!("unknown entity '&{};'", raw)));
    }

    Ok(())
}
