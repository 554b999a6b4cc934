use seatplan_core::api::UploadResponse;
use seatplan_core::db::open_db_in_memory;
use seatplan_core::ingest::load_table;
use seatplan_core::{SqliteStudentStore, StudentRecord, StudentStore, UploadService};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Roster" sheetId="1" r:id="rId1"/>
<sheet name="Archive" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

/// First sheet: column C has no header, roll numbers and years are numeric
/// cells, and row 3 lacks a name.
const ROSTER_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1">
<c r="A1" t="inlineStr"><is><t>Student Name</t></is></c>
<c r="B1" t="inlineStr"><is><t>Roll</t></is></c>
<c r="D1" t="inlineStr"><is><t>Branch</t></is></c>
<c r="E1" t="inlineStr"><is><t>Year</t></is></c>
</row>
<row r="2">
<c r="A2" t="inlineStr"><is><t> Asha </t></is></c>
<c r="B2"><v>101</v></c>
<c r="C2" t="inlineStr"><is><t>note</t></is></c>
<c r="D2" t="inlineStr"><is><t>CSE</t></is></c>
<c r="E2"><v>2</v></c>
</row>
<row r="3">
<c r="B3"><v>102</v></c>
<c r="D3" t="inlineStr"><is><t>CSE</t></is></c>
<c r="E3"><v>2</v></c>
</row>
<row r="4">
<c r="A4" t="inlineStr"><is><t>Ravi</t></is></c>
<c r="B4" t="inlineStr"><is><t>EE-7</t></is></c>
<c r="D4" t="inlineStr"><is><t>ECE</t></is></c>
<c r="E4" t="inlineStr"><is><t>Sem 3</t></is></c>
</row>
</sheetData>
</worksheet>"#;

const ARCHIVE_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1">
<c r="A1" t="inlineStr"><is><t>Name</t></is></c>
<c r="B1" t="inlineStr"><is><t>Roll</t></is></c>
<c r="C1" t="inlineStr"><is><t>Dept</t></is></c>
<c r="D1" t="inlineStr"><is><t>Year</t></is></c>
</row>
<row r="2">
<c r="A2" t="inlineStr"><is><t>Old Student</t></is></c>
<c r="B2"><v>999</v></c>
<c r="C2" t="inlineStr"><is><t>me</t></is></c>
<c r="D2"><v>4</v></c>
</row>
</sheetData>
</worksheet>"#;

fn write_roster_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("roster.xlsx");
    let file = std::fs::File::create(&path).expect("create workbook");
    let mut zip = ZipWriter::new(file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Stored);

    for (entry, contents) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", ROSTER_SHEET),
        ("xl/worksheets/sheet2.xml", ARCHIVE_SHEET),
    ] {
        zip.start_file(entry, opts).expect("start zip entry");
        zip.write_all(contents.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finalize workbook");
    path
}

#[test]
fn workbook_first_sheet_becomes_raw_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_roster_workbook(dir.path());

    let table = load_table(&path).unwrap();
    assert_eq!(
        table.headers,
        vec!["Student Name", "Roll", "Unnamed: 2", "Branch", "Year"]
    );
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.cell(0, 1), Some("101"));
    assert_eq!(table.cell(0, 4), Some("2"));
    assert_eq!(table.cell(1, 0), None);
}

#[test]
fn workbook_upload_stores_cleaned_first_sheet_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_roster_workbook(dir.path());
    let conn = open_db_in_memory().unwrap();
    let service = UploadService::new(SqliteStudentStore::try_new(&conn).unwrap());

    let summary = service.import_file(&path).unwrap();
    let response = UploadResponse::from(summary);
    assert_eq!(response.count, 2);
    assert_eq!(response.departments, vec!["cse - 2", "ece - Sem 3"]);

    let store = SqliteStudentStore::try_new(&conn).unwrap();
    assert_eq!(
        store.sample_students(10).unwrap(),
        vec![
            StudentRecord::new("Asha", "101", "cse", "2"),
            StudentRecord::new("Ravi", "EE-7", "ece", "Sem 3"),
        ]
    );
}
