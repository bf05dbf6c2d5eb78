//! Input table parsing
//!
//! The header row defines the schema and the field order used for rendering;
//! every record shares that field set.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::RenderResult;
use crate::types::Record;

/// Parsed input table: ordered schema plus one record per row
#[derive(Debug, Clone)]
pub struct Table {
    pub schema: Vec<String>,
    pub records: Vec<Record>,
}

pub fn read_records<R: Read>(reader: R) -> RenderResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let schema: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = schema
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        records.push(record);
    }

    Ok(Table { schema, records })
}

pub fn read_records_from_path(path: &Path) -> RenderResult<Table> {
    read_records(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_defines_schema_and_order() {
        let table = read_records("nombre,fecha,curso\nAna Ruiz,01/01/2024,Nahuatl\n".as_bytes())
            .unwrap();
        assert_eq!(table.schema, vec!["nombre", "fecha", "curso"]);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0]["nombre"], "Ana Ruiz");
        assert_eq!(table.records[0]["curso"], "Nahuatl");
    }

    #[test]
    fn values_are_trimmed() {
        let table = read_records("nombre,fecha\n  Ana Ruiz , 01/01/2024 \n".as_bytes()).unwrap();
        assert_eq!(table.records[0]["nombre"], "Ana Ruiz");
        assert_eq!(table.records[0]["fecha"], "01/01/2024");
    }

    #[test]
    fn empty_body_yields_no_records() {
        let table = read_records("nombre,fecha\n".as_bytes()).unwrap();
        assert!(table.records.is_empty());
    }
}
