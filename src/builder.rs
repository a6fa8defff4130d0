//! Builder Module
//!
//! Fluent Builder APIを提供し、`CatalogAssembler`インスタンスを段階的に構築する。
//! `CatalogAssembler`は全カテゴリの入力行をマッピングし、受理順に出力レコードを蓄積する。

use crate::error::CatalogError;
use crate::image::ImageResolver;
use crate::mapper::RecordMapper;
use crate::price::{DEFAULT_ERROR_SENTINELS, DEFAULT_TAX_MULTIPLIER};
use crate::schema::{OutputRecord, Schema, MAPPED_COLUMNS};
use crate::types::SourceTable;

/// 全商品に共通の固定値
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDefaults {
    pub product_type: String,
    pub published: bool,
    pub featured: bool,
    pub visibility: String,
    pub tax_status: String,
    pub tax_class: String,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub low_stock_amount: u32,
    pub allow_backorders: bool,
    pub sold_individually: bool,
    pub allow_reviews: bool,
}

impl Default for ProductDefaults {
    fn default() -> Self {
        Self {
            product_type: "simple".to_string(),
            published: true,
            featured: false,
            visibility: "visible".to_string(),
            tax_status: "taxable".to_string(),
            tax_class: "standard".to_string(),
            in_stock: true,
            stock_quantity: 100,
            low_stock_amount: 5,
            allow_backorders: false,
            sold_individually: false,
            allow_reviews: true,
        }
    }
}

/// サンプルモードの上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLimits {
    /// 全体の最大件数
    pub total: usize,

    /// カテゴリごとの最大件数
    pub per_category: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            total: 100,
            per_category: 4,
        }
    }
}

/// 変換処理の設定
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// 税率乗数（税込み合計 / 乗数 = 税抜き価格）
    pub tax_multiplier: f64,

    /// 商品名の列
    pub name_column: String,

    /// 税込み合計金額の列
    pub total_column: String,

    /// 存在を確認する列（欠落は警告のみ）
    pub expected_columns: Vec<String>,

    /// 0円として扱うエラー値の文字列
    pub error_sentinels: Vec<String>,

    /// 固定値
    pub defaults: ProductDefaults,

    /// サンプルモード（`None`の場合は全件）
    pub sample: Option<SampleLimits>,

    pub sku_prefix: String,
    pub sku_width: usize,

    /// 出力スキーマ
    pub schema: Schema,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tax_multiplier: DEFAULT_TAX_MULTIPLIER,
            name_column: "PRODUCTO".to_string(),
            total_column: "TOTAL".to_string(),
            expected_columns: ["PRODUCTO", "PRECIO", "0,3", "TOTAL"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            error_sentinels: DEFAULT_ERROR_SENTINELS.iter().map(|s| s.to_string()).collect(),
            defaults: ProductDefaults::default(),
            sample: None,
            sku_prefix: "SKU-".to_string(),
            sku_width: 4,
            schema: Schema::woocommerce(),
        }
    }
}

impl CatalogConfig {
    /// IDからSKUを生成する（例: 7 -> `SKU-0007`）
    pub fn sku_for(&self, id: u32) -> String {
        format!("{}{:0width$}", self.sku_prefix, id, width = self.sku_width)
    }
}

/// Fluent Builder APIを提供する構造体
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsx2woo::CatalogBuilder;
///
/// # fn main() -> Result<(), xlsx2woo::CatalogError> {
/// let assembler = CatalogBuilder::new()
///     .with_sample_mode(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    config: CatalogConfig,
}

impl CatalogBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 税率乗数: 1.03
    /// - 商品名の列: `PRODUCTO`、合計金額の列: `TOTAL`
    /// - 在庫: 100、在庫僅少の閾値: 5
    /// - サンプルモード: 無効
    /// - スキーマ: WooCommerce標準の40列
    pub fn new() -> Self {
        Self::default()
    }

    /// サンプルモードを有効にする（全体100件、カテゴリごと4件まで）
    pub fn with_sample_mode(mut self, enabled: bool) -> Self {
        self.config.sample = if enabled {
            Some(self.config.sample.unwrap_or_default())
        } else {
            None
        };
        self
    }

    /// サンプルモードの上限を指定する（サンプルモードも有効になる）
    pub fn with_sample_limits(mut self, total: usize, per_category: usize) -> Self {
        self.config.sample = Some(SampleLimits {
            total,
            per_category,
        });
        self
    }

    pub fn with_tax_multiplier(mut self, multiplier: f64) -> Self {
        self.config.tax_multiplier = multiplier;
        self
    }

    pub fn with_name_column(mut self, column: &str) -> Self {
        self.config.name_column = column.to_string();
        self
    }

    pub fn with_total_column(mut self, column: &str) -> Self {
        self.config.total_column = column.to_string();
        self
    }

    pub fn with_expected_columns(mut self, columns: &[&str]) -> Self {
        self.config.expected_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_defaults(mut self, defaults: ProductDefaults) -> Self {
        self.config.defaults = defaults;
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.config.schema = schema;
        self
    }

    /// 設定を検証し、`CatalogAssembler`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `CatalogError::Config(String)`:
    ///   * 税率乗数が正の有限値でない
    ///   * サンプルモードの上限が0
    ///   * スキーマにマッパーが書き込む列が欠けている
    pub fn build(self) -> Result<CatalogAssembler, CatalogError> {
        let config = self.config;

        if !config.tax_multiplier.is_finite() || config.tax_multiplier <= 0.0 {
            return Err(CatalogError::Config(format!(
                "Invalid tax multiplier: {} (must be a positive number)",
                config.tax_multiplier
            )));
        }

        if let Some(limits) = config.sample {
            if limits.total == 0 || limits.per_category == 0 {
                return Err(CatalogError::Config(format!(
                    "Invalid sample limits: total={}, per_category={}",
                    limits.total, limits.per_category
                )));
            }
        }

        if let Some(missing) = MAPPED_COLUMNS.iter().find(|c| !config.schema.contains(c)) {
            return Err(CatalogError::Config(format!(
                "Schema is missing required column '{}'",
                missing
            )));
        }

        Ok(CatalogAssembler { config })
    }
}

/// スキップされた行
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub category: String,
    pub row: usize,
    pub reason: String,
}

/// 組み立て結果
#[derive(Debug, Clone, Default)]
pub struct AssembledCatalog {
    /// 受理順の出力レコード（IDは1からの連番）
    pub records: Vec<OutputRecord>,

    /// マッピングに失敗してスキップされた行
    pub skipped: Vec<SkippedRow>,

    /// 商品名のある行がサンプルモードの全体上限で除外されたかどうか
    pub capped: bool,
}

/// カタログの組み立て処理のファサード
#[derive(Debug)]
pub struct CatalogAssembler {
    config: CatalogConfig,
}

impl CatalogAssembler {
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// 全カテゴリの入力行から出力レコードを組み立てる
    ///
    /// # 引数
    ///
    /// * `tables` - ソース順のカテゴリ（シート）
    /// * `images` - 画像リゾルバー（`None`の場合は画像を付与しない）
    ///
    /// # 処理フロー
    ///
    /// 1. カテゴリをソース順に走査
    /// 2. 商品名が空の行は除外（IDを消費しない）
    /// 3. サンプルモードではカテゴリごと・全体の上限を適用
    /// 4. 行をマッピングし、成功した時点でIDを確定
    /// 5. 画像リゾルバーがあれば、確定したIDで画像を解決
    ///
    /// 行ごとのエラーはログに記録してスキップし、処理は継続します。
    pub fn assemble(
        &self,
        tables: &[SourceTable],
        mut images: Option<&mut ImageResolver>,
    ) -> AssembledCatalog {
        let mapper = RecordMapper::new(&self.config);
        let mut catalog = AssembledCatalog::default();
        let mut next_id: u32 = 1;

        'tables: for table in tables {
            tracing::info!(
                category = %table.category,
                rows = table.rows.len(),
                "Processing category"
            );
            let mut taken = 0usize;

            for (row_index, row) in table.rows.iter().enumerate() {
                if mapper.product_name(row).is_none() {
                    continue;
                }

                if let Some(limits) = self.config.sample {
                    if catalog.records.len() >= limits.total {
                        catalog.capped = true;
                        break 'tables;
                    }
                    if taken >= limits.per_category {
                        break;
                    }
                }

                match mapper.map(next_id, row, &table.category, row_index) {
                    Ok(mut record) => {
                        if let Some(resolver) = images.as_deref_mut() {
                            let name = record.name().to_string();
                            if let Some(locator) = resolver.resolve(&name, next_id) {
                                record.set_image(&locator);
                            }
                        }
                        catalog.records.push(record);
                        next_id += 1;
                        taken += 1;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping row");
                        catalog.skipped.push(SkippedRow {
                            category: table.category.clone(),
                            row: row_index,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            products = catalog.records.len(),
            skipped = catalog.skipped.len(),
            "Catalog assembled"
        );
        catalog
    }
}
