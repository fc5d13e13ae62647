use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::error::Error as StdError;
use std::fmt;
use std::time::{Duration, Instant};
use tokio_postgres::{types::Type, Client, Row};

/// Categorized error types for SQL query failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCategory {
    /// Syntax errors (SQLSTATE class 42 - syntax_error, etc.)
    Syntax,
    /// Semantic errors (missing table/column, ambiguous reference)
    Semantic,
    /// Execution/runtime errors (division by zero, resource limits)
    Execution,
    /// Transaction state errors
    Transaction,
    /// Connection/communication errors
    Connection,
    /// Unknown or unclassified errors
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "Syntax Error"),
            ErrorCategory::Semantic => write!(f, "Semantic Error"),
            ErrorCategory::Execution => write!(f, "Execution Error"),
            ErrorCategory::Transaction => write!(f, "Transaction Error"),
            ErrorCategory::Connection => write!(f, "Connection Error"),
            ErrorCategory::Unknown => write!(f, "Error"),
        }
    }
}

/// Database failure with the context PostgreSQL reports alongside the
/// primary message: SQLSTATE code, detail, hint, and the error position
/// mapped back to a line/column in the statement text.
#[derive(Debug, Clone)]
pub struct StructuredError {
    pub category: ErrorCategory,
    /// SQLSTATE error code (e.g. "42601" for syntax_error)
    pub code: String,
    pub message: String,
    pub detail: Option<String>,
    pub hint: Option<String>,
    /// Character position in the query where the error occurred (1-based)
    pub position: Option<u32>,
    pub line: Option<usize>,
    pub col: Option<usize>,
}

impl StructuredError {
    /// Build from a tokio_postgres error, using the statement text to
    /// compute line/column from the reported byte position.
    pub fn from_pg_error(err: &tokio_postgres::Error, query: &str) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let code = db_err.code().code().to_string();
            let position = db_err.position().and_then(|p| match p {
                tokio_postgres::error::ErrorPosition::Original(pos) => Some(*pos),
                tokio_postgres::error::ErrorPosition::Internal { .. } => None,
            });
            let (line, col) = match position {
                Some(pos) => byte_offset_to_line_col(query, pos as usize),
                None => (None, None),
            };

            StructuredError {
                category: categorize_sqlstate(&code),
                code,
                message: db_err.message().to_string(),
                detail: db_err.detail().map(|s| s.to_string()),
                hint: db_err.hint().map(|s| s.to_string()),
                position,
                line,
                col,
            }
        } else {
            // Non-database error (transport, protocol, timeout)
            let category = if err.source().is_some() {
                ErrorCategory::Connection
            } else {
                ErrorCategory::Unknown
            };
            StructuredError {
                category,
                code: String::new(),
                message: err.to_string(),
                detail: err.source().map(|e| e.to_string()),
                hint: None,
                position: None,
                line: None,
                col: None,
            }
        }
    }

    /// Rich multi-line rendering for the diagnostic channel.
    pub fn display_full(&self) -> String {
        let mut lines = vec![format!("{}: {}", self.category, self.message)];

        if let (Some(line), Some(col)) = (self.line, self.col) {
            lines.push(format!("  at line {}, column {}", line, col));
        }
        if !self.code.is_empty() {
            lines.push(format!("  SQLSTATE: {}", self.code));
        }
        if let Some(detail) = &self.detail {
            lines.push(format!("  Detail: {}", detail));
        }
        if let Some(hint) = &self.hint {
            lines.push(format!("  Hint: {}", hint));
        }

        lines.join("\n")
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for StructuredError {}

/// Convert a 1-based byte offset in a query string to (line, column) both 1-based.
fn byte_offset_to_line_col(query: &str, byte_pos: usize) -> (Option<usize>, Option<usize>) {
    if byte_pos == 0 || query.is_empty() {
        return (Some(1), Some(1));
    }
    let target = (byte_pos - 1).min(query.len());
    let mut line = 1usize;
    let mut col = 1usize;
    for (i, ch) in query.char_indices() {
        if i >= target {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (Some(line), Some(col))
}

/// Categorize a SQLSTATE code into an ErrorCategory.
fn categorize_sqlstate(code: &str) -> ErrorCategory {
    if code.len() < 2 {
        return ErrorCategory::Unknown;
    }
    match &code[..2] {
        // Class 42: Syntax Error or Access Rule Violation
        "42" => {
            if code == "42601" || code == "42000" {
                ErrorCategory::Syntax
            } else {
                // 42P01 = undefined_table, 42703 = undefined_column, etc.
                ErrorCategory::Semantic
            }
        }
        // Class 22: Data Exception, 23: Integrity Constraint Violation,
        // 53/54/55/57: resource and state limits
        "22" | "23" | "53" | "54" | "55" | "57" => ErrorCategory::Execution,
        // Class 25: Invalid Transaction State, 40: Transaction Rollback
        "25" | "40" => ErrorCategory::Transaction,
        // Class 08: Connection Exception
        "08" => ErrorCategory::Connection,
        _ => ErrorCategory::Unknown,
    }
}

/// The materialized result of one statement.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Vec<CellValue>>,
    pub row_count: usize,
    pub execution_time: Duration,
}

#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
    /// Widest rendered cell in this column, for aligned text output.
    pub max_width: usize,
}

#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Json(serde_json::Value),
    Array(Vec<CellValue>),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int16(i) => i.to_string(),
            CellValue::Int32(i) => i.to_string(),
            CellValue::Int64(i) => i.to_string(),
            CellValue::Float32(f) => f.to_string(),
            CellValue::Float64(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bytes(b) => format!("[{} bytes]", b.len()),
            CellValue::Date(d) => d.to_string(),
            CellValue::Time(t) => t.to_string(),
            CellValue::DateTime(dt) => dt.to_string(),
            CellValue::TimestampTz(dt) => dt.to_string(),
            CellValue::Json(j) => j.to_string(),
            CellValue::Array(arr) => {
                let items: Vec<String> = arr.iter().map(|v| v.display()).collect();
                format!("{{{}}}", items.join(", "))
            }
        }
    }

    pub fn display_width(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(self.display().as_str())
    }
}

impl QueryResult {
    pub fn empty() -> Self {
        Self {
            columns: vec![],
            rows: vec![],
            row_count: 0,
            execution_time: Duration::ZERO,
        }
    }
}

/// Run exactly the given SQL text and materialize the full result set in
/// memory. No parameterization, no row limit, no streaming: whatever the
/// extractor produced is what the server sees, and whatever the server
/// returns is held whole.
pub async fn execute_query(client: &Client, sql: &str) -> Result<QueryResult, StructuredError> {
    let start = Instant::now();
    let sql = sql.trim();

    let rows = client
        .query(sql, &[])
        .await
        .map_err(|e| StructuredError::from_pg_error(&e, sql))?;

    Ok(materialize(&rows, start.elapsed()))
}

fn materialize(rows: &[Row], execution_time: Duration) -> QueryResult {
    let Some(first_row) = rows.first() else {
        return QueryResult {
            columns: vec![],
            rows: vec![],
            row_count: 0,
            execution_time,
        };
    };

    let mut columns: Vec<ColumnInfo> = first_row
        .columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            type_name: col.type_().name().to_string(),
            max_width: unicode_width::UnicodeWidthStr::width(col.name()),
        })
        .collect();

    let mut result_rows: Vec<Vec<CellValue>> = Vec::with_capacity(rows.len());
    for row in rows {
        let cells: Vec<CellValue> = row
            .columns()
            .iter()
            .enumerate()
            .map(|(i, col)| extract_value(row, i, col.type_()))
            .collect();

        for (i, cell) in cells.iter().enumerate() {
            columns[i].max_width = columns[i].max_width.max(cell.display_width());
        }
        result_rows.push(cells);
    }

    let row_count = result_rows.len();
    QueryResult {
        columns,
        rows: result_rows,
        row_count,
        execution_time,
    }
}

fn extract_value(row: &Row, idx: usize, pg_type: &Type) -> CellValue {
    match *pg_type {
        Type::BOOL => cell(row.try_get::<_, Option<bool>>(idx), CellValue::Bool),
        Type::INT2 => cell(row.try_get::<_, Option<i16>>(idx), CellValue::Int16),
        Type::INT4 => cell(row.try_get::<_, Option<i32>>(idx), CellValue::Int32),
        Type::INT8 => cell(row.try_get::<_, Option<i64>>(idx), CellValue::Int64),
        Type::FLOAT4 => cell(row.try_get::<_, Option<f32>>(idx), CellValue::Float32),
        Type::FLOAT8 | Type::NUMERIC => cell(row.try_get::<_, Option<f64>>(idx), CellValue::Float64),
        Type::BYTEA => cell(row.try_get::<_, Option<Vec<u8>>>(idx), CellValue::Bytes),
        Type::DATE => cell(row.try_get::<_, Option<NaiveDate>>(idx), CellValue::Date),
        Type::TIME => cell(row.try_get::<_, Option<NaiveTime>>(idx), CellValue::Time),
        Type::TIMESTAMP => cell(row.try_get::<_, Option<NaiveDateTime>>(idx), CellValue::DateTime),
        Type::TIMESTAMPTZ => cell(
            row.try_get::<_, Option<DateTime<Utc>>>(idx),
            CellValue::TimestampTz,
        ),
        Type::JSON | Type::JSONB => cell(
            row.try_get::<_, Option<serde_json::Value>>(idx),
            CellValue::Json,
        ),
        // One-dimensional arrays, typically from array_agg
        Type::INT4_ARRAY => cell(row.try_get::<_, Option<Vec<i32>>>(idx), |v| {
            CellValue::Array(v.into_iter().map(CellValue::Int32).collect())
        }),
        Type::INT8_ARRAY => cell(row.try_get::<_, Option<Vec<i64>>>(idx), |v| {
            CellValue::Array(v.into_iter().map(CellValue::Int64).collect())
        }),
        Type::FLOAT8_ARRAY => cell(row.try_get::<_, Option<Vec<f64>>>(idx), |v| {
            CellValue::Array(v.into_iter().map(CellValue::Float64).collect())
        }),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY => cell(row.try_get::<_, Option<Vec<String>>>(idx), |v| {
            CellValue::Array(v.into_iter().map(CellValue::Text).collect())
        }),
        // TEXT, VARCHAR, NAME, CHAR and anything else: fall back to text
        _ => cell(row.try_get::<_, Option<String>>(idx), CellValue::Text),
    }
}

fn cell<T>(value: Result<Option<T>, tokio_postgres::Error>, wrap: fn(T) -> CellValue) -> CellValue {
    value.ok().flatten().map(wrap).unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_display() {
        assert_eq!(CellValue::Null.display(), "NULL");
        assert_eq!(CellValue::Bool(true).display(), "true");
        assert_eq!(CellValue::Int16(42).display(), "42");
        assert_eq!(CellValue::Int64(-9_999_999).display(), "-9999999");
        assert_eq!(CellValue::Float64(2.718).display(), "2.718");
        assert_eq!(CellValue::Text("Resort Hotel".into()).display(), "Resort Hotel");
        assert_eq!(CellValue::Bytes(vec![1, 2, 3]).display(), "[3 bytes]");
    }

    #[test]
    fn array_cell_display_uses_braces() {
        let arr = CellValue::Array(vec![
            CellValue::Text("BB".into()),
            CellValue::Text("HB".into()),
        ]);
        assert_eq!(arr.display(), "{BB, HB}");
        assert_eq!(CellValue::Array(vec![]).display(), "{}");
    }

    #[test]
    fn json_cell_display() {
        let val = serde_json::json!({"meal": "BB"});
        let display = CellValue::Json(val).display();
        assert!(display.contains("meal"));
        assert!(display.contains("BB"));
    }

    #[test]
    fn cell_display_width() {
        assert_eq!(CellValue::Null.display_width(), 4);
        assert_eq!(CellValue::Text("hello".into()).display_width(), 5);
        assert_eq!(CellValue::Int32(100).display_width(), 3);
    }

    #[test]
    fn empty_result_has_no_columns() {
        let r = QueryResult::empty();
        assert!(r.columns.is_empty());
        assert!(r.rows.is_empty());
        assert_eq!(r.row_count, 0);
    }

    #[test]
    fn error_category_display() {
        assert_eq!(ErrorCategory::Syntax.to_string(), "Syntax Error");
        assert_eq!(ErrorCategory::Semantic.to_string(), "Semantic Error");
        assert_eq!(ErrorCategory::Connection.to_string(), "Connection Error");
        assert_eq!(ErrorCategory::Unknown.to_string(), "Error");
    }

    #[test]
    fn sqlstate_categorization() {
        assert_eq!(categorize_sqlstate("42601"), ErrorCategory::Syntax);
        assert_eq!(categorize_sqlstate("42P01"), ErrorCategory::Semantic);
        assert_eq!(categorize_sqlstate("42703"), ErrorCategory::Semantic);
        assert_eq!(categorize_sqlstate("23505"), ErrorCategory::Execution);
        assert_eq!(categorize_sqlstate("22012"), ErrorCategory::Execution);
        assert_eq!(categorize_sqlstate("25001"), ErrorCategory::Transaction);
        assert_eq!(categorize_sqlstate("08006"), ErrorCategory::Connection);
        assert_eq!(categorize_sqlstate("XX000"), ErrorCategory::Unknown);
        assert_eq!(categorize_sqlstate(""), ErrorCategory::Unknown);
    }

    #[test]
    fn position_maps_to_line_and_column() {
        let query = "SELECT *\nFROM bookings\nWHERE id = 1";
        assert_eq!(byte_offset_to_line_col(query, 1), (Some(1), Some(1)));
        assert_eq!(byte_offset_to_line_col(query, 10), (Some(2), Some(1)));
        assert_eq!(byte_offset_to_line_col(query, 24), (Some(3), Some(1)));
    }

    #[test]
    fn structured_error_display_full() {
        let err = StructuredError {
            category: ErrorCategory::Syntax,
            code: "42601".to_string(),
            message: "syntax error at or near \",\"".to_string(),
            detail: None,
            hint: Some("Remove the trailing comma.".to_string()),
            position: Some(45),
            line: Some(3),
            col: Some(1),
        };
        let full = err.display_full();
        assert!(full.contains("Syntax Error"));
        assert!(full.contains("at line 3, column 1"));
        assert!(full.contains("SQLSTATE: 42601"));
        assert!(full.contains("Remove the trailing comma"));
    }

    #[test]
    fn structured_error_is_a_std_error() {
        let err = StructuredError {
            category: ErrorCategory::Unknown,
            code: String::new(),
            message: "boom".to_string(),
            detail: None,
            hint: None,
            position: None,
            line: None,
            col: None,
        };
        let boxed: Box<dyn StdError> = Box::new(err);
        assert_eq!(boxed.to_string(), "boom");
    }
}
