//! Rendering a query result as text, CSV, TSV, or JSON.

use crate::db::{CellValue, QueryResult};
use unicode_width::UnicodeWidthStr;

/// Render the full result as an aligned text table, psql style.
pub fn render_table(result: &QueryResult) -> String {
    render_rows(result, result.rows.len())
}

/// Render the first `limit` rows, noting how many were held back.
pub fn preview(result: &QueryResult, limit: usize) -> String {
    let mut out = render_rows(result, limit);
    if result.rows.len() > limit {
        out.push_str(&format!(
            "(showing first {} of {} rows)\n",
            limit,
            result.rows.len()
        ));
    }
    out
}

fn render_rows(result: &QueryResult, limit: usize) -> String {
    if result.columns.is_empty() {
        return String::from("(0 rows)\n");
    }

    let widths: Vec<usize> = result
        .columns
        .iter()
        .map(|c| c.max_width.max(c.name.width()))
        .collect();

    let mut out = String::new();

    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&c.name, *w))
        .collect();
    out.push_str(&format!(" {}\n", header.join(" | ")));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    out.push_str(&format!("{}\n", rule.join("+")));

    for row in result.rows.iter().take(limit) {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(&cell.display(), *w))
            .collect();
        out.push_str(&format!(" {}\n", cells.join(" | ")));
    }

    let shown = result.rows.len().min(limit);
    out.push_str(&format!(
        "({} row{})\n",
        shown,
        if shown == 1 { "" } else { "s" }
    ));
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

pub fn to_csv(result: &QueryResult) -> String {
    let mut output = String::new();

    let headers: Vec<String> = result.columns.iter().map(|c| csv_escape(&c.name)).collect();
    output.push_str(&headers.join(","));
    output.push('\n');

    for row in &result.rows {
        let cells: Vec<String> = row.iter().map(|cell| csv_escape(&cell.display())).collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }

    output
}

pub fn to_tsv(result: &QueryResult) -> String {
    let mut output = String::new();

    let headers: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
    output.push_str(&headers.join("\t"));
    output.push('\n');

    for row in &result.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.display().replace('\t', " "))
            .collect();
        output.push_str(&cells.join("\t"));
        output.push('\n');
    }

    output
}

/// Array of row objects keyed by column name, pretty-printed.
pub fn to_json(result: &QueryResult) -> String {
    let mut rows_json: Vec<serde_json::Value> = Vec::new();

    for row in &result.rows {
        let mut obj = serde_json::Map::new();
        for (i, cell) in row.iter().enumerate() {
            let col_name = result
                .columns
                .get(i)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("column_{}", i));
            obj.insert(col_name, cell_to_json(cell));
        }
        rows_json.push(serde_json::Value::Object(obj));
    }

    serde_json::to_string_pretty(&rows_json).unwrap_or_else(|_| "[]".to_string())
}

fn cell_to_json(cell: &CellValue) -> serde_json::Value {
    use serde_json::{json, Value};
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => json!(b),
        CellValue::Int16(i) => json!(i),
        CellValue::Int32(i) => json!(i),
        CellValue::Int64(i) => json!(i),
        CellValue::Float32(f) => json!(f),
        CellValue::Float64(f) => json!(f),
        CellValue::Json(j) => j.clone(),
        CellValue::Array(items) => Value::Array(items.iter().map(cell_to_json).collect()),
        // Text, bytes and temporal values serialize as their display form
        other => json!(other.display()),
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
