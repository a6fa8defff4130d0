//! Conversion Summary
//!
//! 変換結果の集計（カテゴリ別件数、価格統計、先頭の商品）。

use crate::schema::OutputRecord;

/// 価格の統計
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// 先頭商品の表示用抜粋
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPreview {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub sku: String,
}

/// 変換結果のサマリー
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub total: usize,

    /// カテゴリ別の件数（初出順）
    pub per_category: Vec<(String, usize)>,

    /// 価格の統計（レコードが0件の場合は`None`）
    pub prices: Option<PriceStats>,

    pub with_images: usize,

    pub preview: Vec<ProductPreview>,
}

impl CatalogSummary {
    pub fn from_records(records: &[OutputRecord]) -> Self {
        let mut per_category: Vec<(String, usize)> = Vec::new();
        for record in records {
            match per_category.iter_mut().find(|(c, _)| c == record.category()) {
                Some((_, count)) => *count += 1,
                None => per_category.push((record.category().to_string(), 1)),
            }
        }

        let prices = if records.is_empty() {
            None
        } else {
            let values: Vec<f64> = records.iter().map(OutputRecord::regular_price).collect();
            Some(PriceStats {
                mean: values.iter().sum::<f64>() / values.len() as f64,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        };

        let preview = records
            .iter()
            .take(3)
            .map(|r| ProductPreview {
                name: r.name().to_string(),
                price: r.regular_price(),
                category: r.category().to_string(),
                sku: r.sku().to_string(),
            })
            .collect();

        Self {
            total: records.len(),
            per_category,
            prices,
            with_images: records.iter().filter(|r| !r.image().is_empty()).count(),
            preview,
        }
    }
}
