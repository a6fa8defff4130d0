//! Workbook Reader
//!
//! calamineを使用してワークブックの全シートを読み込む。
//! 各シートの1行目をヘッダーとして扱い、以降の行を列名 -> セル値の行に変換する。

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::CatalogError;
use crate::types::{InputRow, RawValue, SourceTable};

/// ワークブックの全シートをシート順に読み込む
///
/// # 戻り値
///
/// * `Ok(Vec<SourceTable>)` - シートごとのテーブル（カテゴリ名 = シート名）
/// * `Err(CatalogError::Parse)` - ファイルが開けない、または解析に失敗した場合
pub(crate) fn read_workbook(path: &Path) -> Result<Vec<SourceTable>, CatalogError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut tables = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        tracing::info!(sheet = %sheet_name, "Reading sheet");
        let range = workbook.worksheet_range(&sheet_name)?;
        tables.push(range_to_table(&sheet_name, &range));
    }

    Ok(tables)
}

/// セル範囲をテーブルに変換する
pub(crate) fn range_to_table(sheet_name: &str, range: &Range<Data>) -> SourceTable {
    let mut rows = range.rows();

    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_to_raw(cell).as_text().trim().to_string())
            .collect(),
        None => return SourceTable::new(sheet_name, Vec::new(), Vec::new()),
    };

    let data_rows = rows
        .map(|cells| {
            let mut row = InputRow::new();
            for (column, cell) in columns.iter().zip(cells.iter()) {
                if column.is_empty() {
                    continue;
                }
                row.insert(column, cell_to_raw(cell));
            }
            row
        })
        .collect();

    SourceTable::new(sheet_name, columns, data_rows)
}

/// calamineのセル値を`RawValue`に変換する
fn cell_to_raw(cell: &Data) -> RawValue {
    match cell {
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Float(f) => RawValue::Number(*f),
        Data::String(s) if s.is_empty() => RawValue::Empty,
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Bool(b) => RawValue::Text(b.to_string()),
        Data::Error(e) => RawValue::Error(e.to_string()),
        Data::Empty => RawValue::Empty,
        other => RawValue::Text(other.to_string()),
    }
}
