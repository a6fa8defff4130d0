//! Output Module
//!
//! 出力レコードをWooCommerceのインポート形式（UTF-8 BOM付き、カンマ区切り）で書き出す。
//! 書き出しは入力レコードのみに依存する純粋な処理で、同じレコード列からは
//! 常に同じバイト列が得られる。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::{QuoteStyle, WriterBuilder};

use crate::error::CatalogError;
use crate::schema::{OutputRecord, Schema};

/// UTF-8のバイトオーダーマーク
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// レコードをライターに書き出す
///
/// # 引数
///
/// * `records` - 受理順の出力レコード
/// * `schema` - 列の順序（ヘッダー行）
/// * `writer` - 出力先
pub fn write_catalog<W: Write>(
    records: &[OutputRecord],
    schema: &Schema,
    mut writer: W,
) -> Result<(), CatalogError> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    csv_writer.write_record(schema.columns())?;
    for record in records {
        csv_writer.write_record(record.values(schema))?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// レコードをファイルに書き出す
///
/// # 戻り値
///
/// * `Ok(PathBuf)` - 書き出したファイルのパス
/// * `Err(CatalogError)` - ファイルを作成・書き込みできない場合
pub fn export_catalog(
    records: &[OutputRecord],
    schema: &Schema,
    path: impl AsRef<Path>,
) -> Result<PathBuf, CatalogError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_catalog(records, schema, &mut writer)?;
    writer.flush()?;

    tracing::info!(path = %path.display(), products = records.len(), "Catalog exported");
    Ok(path.to_path_buf())
}

/// デフォルトの出力ファイル名（`productos_woocommerce_YYYYmmdd_HHMMSS.csv`）
pub fn default_output_name(timestamp: NaiveDateTime) -> String {
    format!("productos_woocommerce_{}.csv", timestamp.format("%Y%m%d_%H%M%S"))
}
