//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::collections::HashMap;
use std::fmt;

/// セルの生の値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    Text(String),

    /// エラー値（例: #VALUE!）
    Error(String),

    /// 空セル・欠損値
    Empty,
}

impl RawValue {
    /// 値が空かどうかを判定
    ///
    /// 空白のみの文字列も空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 値を文字列として取得
    ///
    /// 整数値の数値は小数点なしで表現します（`24.0` -> `"24"`）。
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Error(e) => e.clone(),
            RawValue::Empty => String::new(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(s.to_string())
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// 入力の1行（列名 -> セル値）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputRow {
    cells: HashMap<String, RawValue>,
}

impl InputRow {
    /// 空の行を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// セル値を設定する（ビルダー形式）
    pub fn with(mut self, column: &str, value: impl Into<RawValue>) -> Self {
        self.insert(column, value.into());
        self
    }

    /// セル値を設定する
    pub fn insert(&mut self, column: &str, value: RawValue) {
        self.cells.insert(column.to_string(), value);
    }

    /// 列の値を取得する（列が存在しない場合は`None`）
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells.get(column)
    }

    /// 列の値が欠損または空かどうか
    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).map(RawValue::is_empty).unwrap_or(true)
    }
}

/// 1つのシート（またはCSVファイル）から読み込んだ行の集まり
///
/// カテゴリ名はシート名、単一ファイルの場合はファイル名（拡張子なし）です。
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    /// カテゴリ名
    pub category: String,

    /// ヘッダー行の列名（ソース順）
    pub columns: Vec<String>,

    /// データ行（ソース順）
    pub rows: Vec<InputRow>,
}

impl SourceTable {
    /// 新しいテーブルを生成
    pub fn new(category: impl Into<String>, columns: Vec<String>, rows: Vec<InputRow>) -> Self {
        Self {
            category: category.into(),
            columns,
            rows,
        }
    }

    /// 指定した列がヘッダーに存在するかを判定
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
