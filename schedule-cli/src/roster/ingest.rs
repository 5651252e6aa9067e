//! CSV ingestion: parse an uploaded file, extract employees per the selected
//! columns, and track the import lifecycle
//!
//! Lifecycle: `Empty -> Parsing -> Parsed | Error`. A column change on a
//! parsed file recomputes the output without re-reading it. A failed parse
//! drops headers, rows and column selection together; only a new file
//! leaves the error state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;

use super::inference::ColumnSelection;
use super::model::{Employee, EmployeeType};
use super::normalize::normalize_type;

/// A single CSV data row, keyed by header as written in the file
pub type RowRecord = HashMap<String, String>;

/// Parsed CSV: headers in file order plus one record per data row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTabularInput {
    pub headers: Vec<String>,
    pub rows: Vec<RowRecord>,
}

/// Result of extracting one import against a column selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutput {
    /// Deduplicated by name, in order of first appearance
    pub employees: Vec<Employee>,
    /// Only names whose origin text was recognized
    pub types: HashMap<String, EmployeeType>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read CSV file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("CSV has no header row, so there is no name column to import")]
    NoHeaders,

    #[error("Column '{0}' does not exist in the CSV headers")]
    UnknownColumn(String),

    #[error("No parsed CSV to select columns from")]
    NotParsed,
}

/// Parse CSV text with a header row. Blank lines are skipped and short or
/// long rows are tolerated.
pub fn parse_csv(text: &str) -> Result<RawTabularInput, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RowRecord::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.entry(header.clone()).or_insert_with(|| value.to_string());
        }
        rows.push(row);
    }

    Ok(RawTabularInput { headers, rows })
}

/// Extract employees and recognized types from parsed rows.
///
/// Rows with a blank name are skipped. Repeated names keep the first
/// non-empty civil id seen in this import.
pub fn extract_import(input: &RawTabularInput, selection: &ColumnSelection) -> ImportOutput {
    let mut output = ImportOutput::default();
    if selection.name.is_empty() {
        return output;
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let cell = |row: &RowRecord, column: &str| -> String {
        row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
    };

    for row in &input.rows {
        let name = cell(row, &selection.name);
        if name.is_empty() {
            continue;
        }

        let civil_id = selection
            .civil_id_column()
            .map(|col| cell(row, col))
            .unwrap_or_default();

        match index.get(&name) {
            Some(&i) => {
                let existing = &mut output.employees[i];
                if existing.civil_id.is_empty() {
                    existing.civil_id = civil_id;
                }
            }
            None => {
                index.insert(name.clone(), output.employees.len());
                output.employees.push(Employee::new(name.as_str(), civil_id));
            }
        }

        if let Some(kind) = selection
            .origin_column()
            .and_then(|col| normalize_type(&cell(row, col)))
        {
            output.types.insert(name, kind);
        }
    }

    output
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub source: String,
    pub input: RawTabularInput,
    pub selection: ColumnSelection,
    pub output: ImportOutput,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ImportState {
    #[default]
    Empty,
    Parsing {
        source: String,
    },
    Parsed(ParsedCsv),
    Error(String),
}

#[cfg(test)]
impl ImportState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Parsing { .. } => "parsing",
            Self::Parsed(_) => "parsed",
            Self::Error(_) => "error",
        }
    }
}

/// Ingestion state for one CSV source
#[derive(Debug, Default)]
pub struct CsvImport {
    state: ImportState,
}

impl CsvImport {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn headers(&self) -> &[String] {
        match &self.state {
            ImportState::Parsed(parsed) => &parsed.input.headers,
            _ => &[],
        }
    }

    pub fn row_count(&self) -> usize {
        match &self.state {
            ImportState::Parsed(parsed) => parsed.input.rows.len(),
            _ => 0,
        }
    }

    pub fn selection(&self) -> Option<&ColumnSelection> {
        match &self.state {
            ImportState::Parsed(parsed) => Some(&parsed.selection),
            _ => None,
        }
    }

    pub fn output(&self) -> Option<&ImportOutput> {
        match &self.state {
            ImportState::Parsed(parsed) => Some(&parsed.output),
            _ => None,
        }
    }

    /// A new file was chosen. Supersedes whatever state came before.
    pub fn begin(&mut self, source: impl Into<String>) {
        self.state = ImportState::Parsing {
            source: source.into(),
        };
    }

    /// Finish a parse started with [`begin`](Self::begin).
    ///
    /// Columns are inferred from the headers. On failure every piece of
    /// ingestion state is dropped.
    pub fn complete(
        &mut self,
        result: Result<RawTabularInput, IngestError>,
    ) -> Result<&ImportOutput, IngestError> {
        let source = match &self.state {
            ImportState::Parsing { source } => source.clone(),
            _ => String::from("<unknown>"),
        };

        let input = match result {
            Ok(input) => input,
            Err(e) => {
                log::warn!("CSV import of {} failed: {}", source, e);
                self.state = ImportState::Error(e.to_string());
                return Err(e);
            }
        };

        let selection = ColumnSelection::infer(&input.headers);
        if selection.name.is_empty() {
            self.state = ImportState::Error(IngestError::NoHeaders.to_string());
            return Err(IngestError::NoHeaders);
        }

        log::info!(
            "Parsed {}: {} rows, {} headers (name: '{}', civil id: '{}', origin: '{}')",
            source,
            input.rows.len(),
            input.headers.len(),
            selection.name,
            selection.civil_id,
            selection.origin
        );

        let output = extract_import(&input, &selection);
        self.state = ImportState::Parsed(ParsedCsv {
            source,
            input,
            selection,
            output,
        });

        match &self.state {
            ImportState::Parsed(parsed) => Ok(&parsed.output),
            _ => Err(IngestError::NotParsed),
        }
    }

    /// Parse CSV text that is already in memory
    #[cfg(test)]
    pub fn load_str(
        &mut self,
        source: impl Into<String>,
        text: &str,
    ) -> Result<&ImportOutput, IngestError> {
        self.begin(source);
        self.complete(parse_csv(text))
    }

    /// Read and parse a CSV file
    pub async fn load_path(&mut self, path: &Path) -> Result<&ImportOutput, IngestError> {
        self.begin(path.display().to_string());

        let result = match tokio::fs::read(path).await {
            Ok(bytes) => parse_csv(&String::from_utf8_lossy(&bytes)),
            Err(source) => Err(IngestError::Read {
                path: path.to_path_buf(),
                source,
            }),
        };

        self.complete(result)
    }

    /// Change the column selection on a parsed file and recompute the output.
    ///
    /// Selected columns must exist in the headers; empty civil-id/origin
    /// selections mean "none". A rejected selection leaves state unchanged.
    pub fn select_columns(&mut self, selection: ColumnSelection) -> Result<&ImportOutput, IngestError> {
        let ImportState::Parsed(parsed) = &mut self.state else {
            return Err(IngestError::NotParsed);
        };

        for column in [
            Some(selection.name.as_str()),
            selection.civil_id_column(),
            selection.origin_column(),
        ]
        .into_iter()
        .flatten()
        {
            if !parsed.input.headers.iter().any(|h| h == column) {
                return Err(IngestError::UnknownColumn(column.to_string()));
            }
        }

        parsed.output = extract_import(&parsed.input, &selection);
        parsed.selection = selection;
        Ok(&parsed.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "Driver Name,Civil ID,Origin,Phone\n\
        Ann,100,Local,555\n\
        Bob,,Overseas,556\n\
        \n\
        ,300,Local,557\n\
        Bob,200,over,558\n\
        Cy,400,expat,559\n";

    #[test]
    fn test_parse_csv_headers_and_rows() {
        let input = parse_csv(SAMPLE).unwrap();
        assert_eq!(input.headers, vec!["Driver Name", "Civil ID", "Origin", "Phone"]);
        assert_eq!(input.rows.len(), 5);
        assert_eq!(input.rows[0].get("Driver Name").map(String::as_str), Some("Ann"));
    }

    #[test]
    fn test_parse_csv_strips_bom_and_tolerates_ragged_rows() {
        let input = parse_csv("\u{feff}Name,Civil ID\nAnn\nBob,2,extra\n").unwrap();
        assert_eq!(input.headers[0], "Name");
        assert_eq!(input.rows.len(), 2);
        assert_eq!(input.rows[0].get("Civil ID"), None);
        assert_eq!(input.rows[1].get("Civil ID").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_parse_csv_empty_input_has_no_headers() {
        assert!(matches!(parse_csv(""), Err(IngestError::NoHeaders)));
    }

    #[test]
    fn test_extract_import_dedup_and_types() {
        let input = parse_csv(SAMPLE).unwrap();
        let selection = ColumnSelection::infer(&input.headers);
        let output = extract_import(&input, &selection);

        assert_eq!(
            output.employees,
            vec![
                Employee::new("Ann", "100"),
                Employee::new("Bob", "200"),
                Employee::new("Cy", "400"),
            ]
        );
        assert_eq!(output.types.get("Ann"), Some(&EmployeeType::Local));
        assert_eq!(output.types.get("Bob"), Some(&EmployeeType::Overseas));
        assert_eq!(output.types.get("Cy"), None);
    }

    #[test]
    fn test_extract_import_first_non_empty_civil_id_within_import() {
        let input = parse_csv("Name,CID\nAnn,\nAnn,1\nAnn,2\n").unwrap();
        let output = extract_import(&input, &ColumnSelection::infer(&input.headers));
        assert_eq!(output.employees, vec![Employee::new("Ann", "1")]);
    }

    #[test]
    fn test_extract_import_without_optional_columns() {
        let input = parse_csv("Name,Civil ID,Origin\nAnn,1,overseas\n").unwrap();
        let selection = ColumnSelection {
            name: "Name".to_string(),
            ..Default::default()
        };
        let output = extract_import(&input, &selection);
        assert_eq!(output.employees, vec![Employee::new("Ann", "")]);
        assert!(output.types.is_empty());
    }

    #[test]
    fn test_state_machine_parse_then_reselect() {
        let mut import = CsvImport::new();
        assert_eq!(import.state().label(), "empty");

        let output = import.load_str("sample.csv", SAMPLE).unwrap();
        assert_eq!(output.employees.len(), 3);
        assert_eq!(import.state().label(), "parsed");
        assert_eq!(import.row_count(), 5);

        let output = import
            .select_columns(ColumnSelection {
                name: "Phone".to_string(),
                civil_id: String::new(),
                origin: String::new(),
            })
            .unwrap();
        assert_eq!(output.employees.len(), 5);
        assert!(output.types.is_empty());
        assert_eq!(import.state().label(), "parsed");
    }

    #[test]
    fn test_select_unknown_column_is_rejected() {
        let mut import = CsvImport::new();
        import.load_str("sample.csv", SAMPLE).unwrap();
        let before = import.selection().cloned();

        let err = import
            .select_columns(ColumnSelection {
                name: "Nope".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, IngestError::UnknownColumn(c) if c == "Nope"));
        assert_eq!(import.selection().cloned(), before);
    }

    #[test]
    fn test_parse_error_resets_everything() {
        let mut import = CsvImport::new();
        import.load_str("good.csv", SAMPLE).unwrap();

        let result = import.load_str("bad.csv", "");
        assert!(result.is_err());
        assert_eq!(import.state().label(), "error");
        assert!(import.headers().is_empty());
        assert_eq!(import.row_count(), 0);
        assert!(import.selection().is_none());
        assert!(import.output().is_none());
        assert!(matches!(
            import.select_columns(ColumnSelection::default()),
            Err(IngestError::NotParsed)
        ));

        // Only a new file leaves the error state
        import.load_str("good.csv", SAMPLE).unwrap();
        assert_eq!(import.state().label(), "parsed");
    }

    #[tokio::test]
    async fn test_load_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let mut import = CsvImport::new();
        let output = import.load_path(file.path()).await.unwrap();
        assert_eq!(output.employees.len(), 3);
    }

    #[tokio::test]
    async fn test_load_missing_path_is_read_error() {
        let mut import = CsvImport::new();
        let err = import
            .load_path(Path::new("/definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
        assert_eq!(import.state().label(), "error");
    }
}
