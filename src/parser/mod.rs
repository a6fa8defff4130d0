//! Parser Module
//!
//! 在庫ファイルを読み込み、カテゴリ（シート）ごとのテーブルに変換する。
//! 読み込みの失敗は致命的エラー、期待する列の欠落は警告として扱う。

mod delimited;
mod workbook;

use std::path::Path;

use crate::error::CatalogError;
use crate::types::SourceTable;

/// calamineで開く拡張子
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// 在庫ファイルを読み込む
///
/// # 引数
///
/// * `path` - ワークブック（`.xlsx`など）または区切りテキストファイルのパス
///
/// # 戻り値
///
/// * `Ok(Vec<SourceTable>)` - ソース順のテーブル
/// * `Err(CatalogError)` - ファイルが存在しない、読み込めない、解析できない場合
pub fn load_inventory(path: impl AsRef<Path>) -> Result<Vec<SourceTable>, CatalogError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(CatalogError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    if is_workbook(path) {
        tracing::info!(path = %path.display(), "Detected workbook, reading all sheets");
        workbook::read_workbook(path)
    } else {
        tracing::info!(
            path = %path.display(),
            "Detected delimited file, reading as a single category"
        );
        Ok(vec![delimited::read_delimited(path)?])
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| WORKBOOK_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 1テーブル分の構造チェック結果
#[derive(Debug, Clone, PartialEq)]
pub struct StructureReport {
    pub category: String,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub missing: Vec<String>,
}

impl StructureReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// 期待する列の存在を確認する
///
/// 欠落している列は警告としてログに出力し、処理は継続します。
pub fn check_structure(
    tables: &[SourceTable],
    expected_columns: &[String],
) -> Vec<StructureReport> {
    tables
        .iter()
        .map(|table| {
            let missing: Vec<String> = expected_columns
                .iter()
                .filter(|c| !table.has_column(c))
                .cloned()
                .collect();

            if !missing.is_empty() {
                tracing::warn!(
                    category = %table.category,
                    missing = ?missing,
                    "Expected columns are missing"
                );
            }

            StructureReport {
                category: table.category.clone(),
                row_count: table.rows.len(),
                columns: table.columns.clone(),
                missing,
            }
        })
        .collect()
}
