//! XLSX writer. Packs records into a single-sheet SpreadsheetML workbook
//! (content types, package rels, workbook, workbook rels, one worksheet).

use crate::formats::{format_price, ExportError};
use crate::model::Record;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Worksheet name shown on the tab.
pub const SHEET_NAME: &str = "Books";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

const SPREADSHEETML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const COLUMNS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// One worksheet cell: inline string or number.
enum Cell<'a> {
    Text(&'a str),
    Number(String),
}

/// Write records to an XLSX workbook at `path`: header row, then one row per record. Overwrites `path`.
pub fn write_xlsx(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::CreateFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_workbook(records, file)?;
    log::debug!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Write the workbook archive into any seekable writer and return it.
pub fn write_workbook<W: Write + Seek>(records: &[Record], writer: W) -> Result<W, ExportError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    write_workbook_xml(&mut zip)?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    write_sheet_xml(records, &mut zip)?;

    Ok(zip.finish()?)
}

fn write_workbook_xml<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    writeln!(
        out,
        r#"<workbook xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        SPREADSHEETML_NS
    )?;
    writeln!(
        out,
        r#"  <sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>"#,
        xml_escape(SHEET_NAME)
    )?;
    writeln!(out, "</workbook>")
}

fn write_sheet_xml<W: Write>(records: &[Record], out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    writeln!(out, r#"<worksheet xmlns="{}">"#, SPREADSHEETML_NS)?;
    writeln!(out, "  <sheetData>")?;

    let header = Record::HEADERS.map(Cell::Text);
    write_row(out, 1, &header)?;
    for (i, r) in records.iter().enumerate() {
        let cells = [
            Cell::Text(&r.title),
            Cell::Number(format_price(r.price)),
            Cell::Number(r.rating.as_u8().to_string()),
            Cell::Text(&r.availability),
            Cell::Text(&r.url),
        ];
        write_row(out, i + 2, &cells)?;
    }

    writeln!(out, "  </sheetData>")?;
    writeln!(out, "</worksheet>")
}

fn write_row<W: Write>(out: &mut W, row: usize, cells: &[Cell<'_>]) -> std::io::Result<()> {
    write!(out, r#"    <row r="{}">"#, row)?;
    for (col, cell) in COLUMNS.iter().zip(cells) {
        match cell {
            Cell::Text(s) => write!(
                out,
                r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                col,
                row,
                xml_escape(s)
            )?,
            Cell::Number(n) => write!(out, r#"<c r="{}{}"><v>{}</v></c>"#, col, row, n)?,
        }
    }
    writeln!(out, "</row>")
}

/// Escape XML markup and drop control characters XML 1.0 cannot represent.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() && (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}
