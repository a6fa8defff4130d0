//! Record Mapper Module
//!
//! 入力の1行とそのカテゴリから、インポートスキーマの出力レコードを1件生成する。

use crate::builder::CatalogConfig;
use crate::error::CatalogError;
use crate::price::PriceNormalizer;
use crate::schema::*;
use crate::types::{InputRow, RawValue};

/// 行 -> レコード変換器
#[derive(Debug, Clone)]
pub struct RecordMapper<'a> {
    config: &'a CatalogConfig,
    prices: PriceNormalizer,
}

impl<'a> RecordMapper<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self {
            prices: PriceNormalizer::new(config.tax_multiplier, config.error_sentinels.clone()),
            config,
        }
    }

    /// 行の商品名を取得する
    ///
    /// 商品名が欠損・空白のみの場合は`None`を返します。この行はマッピング前に
    /// 除外され、IDを消費しません。
    pub fn product_name(&self, row: &InputRow) -> Option<String> {
        match row.get(&self.config.name_column) {
            Some(value) if !value.is_empty() => Some(value.as_text().trim().to_string()),
            _ => None,
        }
    }

    /// 1行を出力レコードに変換する
    ///
    /// # 引数
    ///
    /// * `id` - 受理時に割り当てられた連番（1始まり）
    /// * `row` - 入力行
    /// * `category` - カテゴリ名（シート名）
    /// * `row_index` - シート内のデータ行番号（エラー報告用）
    ///
    /// # 戻り値
    ///
    /// * `Ok(OutputRecord)` - 変換に成功した場合
    /// * `Err(CatalogError::Row)` - 商品名が欠損・数式エラーの場合（行はスキップされる）
    pub fn map(
        &self,
        id: u32,
        row: &InputRow,
        category: &str,
        row_index: usize,
    ) -> Result<OutputRecord, CatalogError> {
        let row_error = |message: String| CatalogError::Row {
            category: category.to_string(),
            row: row_index,
            message,
        };

        let name = match row.get(&self.config.name_column) {
            Some(RawValue::Error(e)) => {
                return Err(row_error(format!("product name is a formula error ({})", e)))
            }
            Some(value) if !value.is_empty() => value.as_text().trim().to_string(),
            _ => return Err(row_error("product name is empty".to_string())),
        };

        let price = self.prices.normalize(row.get(&self.config.total_column));
        let defaults = &self.config.defaults;

        let mut record = OutputRecord::blank(id, &self.config.schema);
        record.set(COL_ID, id.to_string());
        record.set(COL_TYPE, defaults.product_type.as_str());
        record.set(COL_SKU, self.config.sku_for(id));
        record.set(COL_NAME, name.as_str());
        record.set(COL_PUBLISHED, flag(defaults.published));
        record.set(COL_FEATURED, flag(defaults.featured));
        record.set(COL_VISIBILITY, defaults.visibility.as_str());
        record.set(
            COL_SHORT_DESCRIPTION,
            format!("Producto de la categoría {}", category),
        );
        record.set(
            COL_DESCRIPTION,
            format!("Producto {} de la categoría {}", name, category),
        );
        record.set(COL_TAX_STATUS, defaults.tax_status.as_str());
        record.set(COL_TAX_CLASS, defaults.tax_class.as_str());
        record.set(COL_IN_STOCK, flag(defaults.in_stock));
        record.set(COL_STOCK, defaults.stock_quantity.to_string());
        record.set(COL_LOW_STOCK, defaults.low_stock_amount.to_string());
        record.set(COL_BACKORDERS, flag(defaults.allow_backorders));
        record.set(COL_SOLD_INDIVIDUALLY, flag(defaults.sold_individually));
        record.set(COL_REVIEWS, flag(defaults.allow_reviews));
        record.set(COL_REGULAR_PRICE, format!("{:.2}", price));
        record.set(COL_CATEGORIES, category);
        record.set(COL_TAGS, category_tag(category));
        record.set(COL_POSITION, id.to_string());

        Ok(record)
    }
}

/// カテゴリ名からタグを生成する（小文字化、空白をハイフンに置換）
pub fn category_tag(category: &str) -> String {
    category.to_lowercase().replace(' ', "-")
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
