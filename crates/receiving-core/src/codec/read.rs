use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{parse_cell_ref, CodecError, Table, MAX_COLUMNS, MAX_ROWS};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// A `<sheet>` entry from the workbook index.
struct SheetEntry {
    name: String,
    rel_id: String,
}

/// List sheet names in workbook order.
pub fn sheet_names(bytes: &[u8]) -> Result<Vec<String>, CodecError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let workbook = require_part(&mut archive, WORKBOOK_PART)?;
    Ok(read_sheet_entries(&workbook)?
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

/// Decode the sheet named `sheet_name` into a table.
///
/// Row 1 becomes the header. Returns `Ok(None)` if the workbook has no
/// sheet with that name.
pub fn decode_sheet(bytes: &[u8], sheet_name: &str) -> Result<Option<Table>, CodecError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let workbook = require_part(&mut archive, WORKBOOK_PART)?;
    let Some(entry) = read_sheet_entries(&workbook)?
        .into_iter()
        .find(|entry| entry.name == sheet_name)
    else {
        return Ok(None);
    };

    let rels = require_part(&mut archive, WORKBOOK_RELS_PART)?;
    let target = read_relationship_target(&rels, &entry.rel_id)?
        .ok_or_else(|| CodecError::MissingPart(format!("relationship {}", entry.rel_id)))?;
    let sheet_path = resolve_target(&target);

    let shared_strings = match read_part(&mut archive, SHARED_STRINGS_PART)? {
        Some(xml) => read_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_xml = require_part(&mut archive, &sheet_path)?;
    let mut rows = read_sheet_rows(&sheet_xml, &shared_strings)?;

    if rows.is_empty() {
        return Ok(Some(Table::default()));
    }
    let header = rows.remove(0);
    Ok(Some(Table { header, rows }))
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, CodecError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

fn require_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, CodecError> {
    read_part(archive, name)?.ok_or_else(|| CodecError::MissingPart(name.to_string()))
}

/// Relationship targets are relative to `xl/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, CodecError> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn read_sheet_entries(xml: &str) -> Result<Vec<SheetEntry>, CodecError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut entries = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    let key = attr.key.as_ref();
                    if key == b"name" {
                        name = Some(attr.unescape_value()?.into_owned());
                    } else if key.ends_with(b":id") {
                        rel_id = Some(attr.unescape_value()?.into_owned());
                    }
                }
                if let (Some(name), Some(rel_id)) = (name, rel_id) {
                    entries.push(SheetEntry { name, rel_id });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

fn read_relationship_target(xml: &str, rel_id: &str) -> Result<Option<String>, CodecError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attribute(&e, b"Id")?.as_deref() == Some(rel_id) {
                    return attribute(&e, b"Target");
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn read_shared_strings(xml: &str) -> Result<Vec<String>, CodecError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    // Phonetic runs (<rPh>) carry reading hints, not cell text.
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"rPh" => in_phonetic = true,
                b"t" if !in_phonetic => in_text = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(e) if in_text => current.push_str(&e.unescape()?),
            Event::CData(e) if in_text => current.push_str(std::str::from_utf8(&e)?),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Cell being assembled between `<c>` and `</c>`.
struct PendingCell {
    column: usize,
    kind: Option<String>,
    text: String,
}

fn read_sheet_rows(xml: &str, shared_strings: &[String]) -> Result<Vec<Vec<String>>, CodecError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Option<Vec<String>> = None;
    let mut cell: Option<PendingCell> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    pad_to_row(&mut rows, &e)?;
                    current_row = Some(Vec::new());
                }
                b"c" => cell = Some(start_cell(&e, current_row.as_deref())?),
                b"v" | b"t" if cell.is_some() => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    pad_to_row(&mut rows, &e)?;
                    rows.push(Vec::new());
                }
                b"c" => {
                    let empty = start_cell(&e, current_row.as_deref())?;
                    if let Some(row) = current_row.as_mut() {
                        place_cell(row, empty.column, String::new());
                    }
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some(pending) = cell.as_mut() {
                    pending.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) if in_text => {
                if let Some(pending) = cell.as_mut() {
                    pending.text.push_str(std::str::from_utf8(&e)?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_text = false,
                b"c" => {
                    if let (Some(pending), Some(row)) = (cell.take(), current_row.as_mut()) {
                        let column = pending.column;
                        let value = resolve_cell(pending, shared_strings)?;
                        place_cell(row, column, value);
                    }
                }
                b"row" => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

/// Insert empty rows so the next row lands at its `r` position.
fn pad_to_row(rows: &mut Vec<Vec<String>>, e: &BytesStart<'_>) -> Result<(), CodecError> {
    if let Some(number) = attribute(e, b"r")? {
        let number = number
            .parse::<usize>()
            .ok()
            .filter(|n| *n <= MAX_ROWS)
            .ok_or_else(|| CodecError::InvalidRef(number.clone()))?;
        while rows.len() + 1 < number {
            rows.push(Vec::new());
        }
    }
    Ok(())
}

fn start_cell(e: &BytesStart<'_>, row: Option<&[String]>) -> Result<PendingCell, CodecError> {
    let column = match attribute(e, b"r")? {
        Some(reference) => parse_cell_ref(&reference)?.1,
        // Cells without a reference follow the previous one.
        None => row.map(|cells| cells.len()).unwrap_or(0),
    };
    if column >= MAX_COLUMNS {
        return Err(CodecError::InvalidRef(format!("column {}", column + 1)));
    }
    Ok(PendingCell {
        column,
        kind: attribute(e, b"t")?,
        text: String::new(),
    })
}

fn resolve_cell(cell: PendingCell, shared_strings: &[String]) -> Result<String, CodecError> {
    match cell.kind.as_deref() {
        Some("s") => {
            let index: usize = cell
                .text
                .trim()
                .parse()
                .map_err(|_| CodecError::InvalidSharedString(cell.text.clone()))?;
            shared_strings
                .get(index)
                .cloned()
                .ok_or(CodecError::InvalidSharedString(cell.text))
        }
        Some("b") => Ok(if cell.text.trim() == "1" {
            "TRUE".to_string()
        } else {
            "FALSE".to_string()
        }),
        _ => Ok(cell.text),
    }
}

fn place_cell(row: &mut Vec<String>, column: usize, value: String) {
    if row.len() <= column {
        row.resize(column + 1, String::new());
    }
    row[column] = value;
}
