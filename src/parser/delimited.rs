//! Delimited Text Reader
//!
//! カンマ区切りのUTF-8ファイルを1つのテーブルとして読み込む。
//! カテゴリ名はファイル名（拡張子なし）。

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::CatalogError;
use crate::types::{InputRow, RawValue, SourceTable};

/// 区切りテキストファイルを読み込む
pub(crate) fn read_delimited(path: &Path) -> Result<SourceTable, CatalogError> {
    let content = fs::read_to_string(path)?;
    let category = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    parse_delimited(&category, &content)
}

/// 区切りテキストを解析する（先頭のBOMは無視）
pub(crate) fn parse_delimited(category: &str, content: &str) -> Result<SourceTable, CatalogError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = InputRow::new();
        for (column, value) in columns.iter().zip(record.iter()) {
            if column.is_empty() {
                continue;
            }
            row.insert(column, RawValue::from(value));
        }
        rows.push(row);
    }

    Ok(SourceTable::new(category, columns, rows))
}
