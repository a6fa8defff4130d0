//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsx2wooクレート全体で使用するエラー型
///
/// 在庫ファイルの読み込み、行のマッピング、画像の取得、CSVの書き出し中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み・書き込み失敗など）
/// - `Parse`: スプレッドシートの解析中に発生したエラー（calamine由来）
/// - `Csv`: 区切りテキストの読み書きエラー
/// - `Json`: 画像キャッシュファイルのシリアライズエラー
/// - `Http`: 画像ダウンロード中のネットワークエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `Row`: 1行分のマッピングに失敗したエラー（バッチは継続）
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsx2woo::CatalogError;
/// use std::fs::File;
///
/// fn open_inventory(path: &str) -> Result<(), CatalogError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイル、存在しないシートなどが原因となります。
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// CSVの読み書きエラー
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 画像キャッシュファイルのJSONエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTPリクエストのエラー（タイムアウトを含む）
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// ZIPアーカイブ作成のエラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `CatalogBuilder::build()`時に無効な設定が検出された場合や、
    /// 画像ディレクトリが見つからない場合などに発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsx2woo::{CatalogBuilder, CatalogError};
    ///
    /// let result = CatalogBuilder::new()
    ///     .with_tax_multiplier(0.0)
    ///     .build();
    ///
    /// match result {
    ///     Err(CatalogError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 1行のマッピングに失敗したエラー
    ///
    /// 呼び出し側（`CatalogAssembler`）で捕捉され、その行はスキップされます。
    #[error("Row {row} in '{category}' could not be mapped: {message}")]
    Row {
        /// 行の属するカテゴリ（シート名）
        category: String,
        /// データ行番号（ヘッダーを除く0始まり）
        row: usize,
        /// エラーの詳細メッセージ
        message: String,
    },
}

impl From<zip::result::ZipError> for CatalogError {
    fn from(err: zip::result::ZipError) -> Self {
        CatalogError::Zip(err.to_string())
    }
}
