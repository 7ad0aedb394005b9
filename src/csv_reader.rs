use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Raw CSV contents: header row plus string records
#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin().lock())
}

/// Read CSV data from a file on disk
pub fn read_csv_from_path(path: &Path) -> Result<CsvData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;
    read_csv(file)
}

/// Read CSV data from any reader. Ragged records are accepted; short rows
/// read their missing trailing fields as empty strings downstream.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", i + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(CsvData { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv() {
        let csv = "a, b\n1,red\n2,blue\n";
        let data = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["a", "b"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[1], vec!["2", "blue"]);
    }

    #[test]
    fn test_read_csv_ragged() {
        let csv = "a,b,c\n1,2\n";
        let data = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.rows[0].len(), 2);
    }

    #[test]
    fn test_read_csv_headers_only() {
        let data = read_csv("x,y\n".as_bytes()).unwrap();
        assert_eq!(data.headers.len(), 2);
        assert!(data.rows.is_empty());
    }
}
