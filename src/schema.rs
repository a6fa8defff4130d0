//! Import Schema Module
//!
//! WooCommerce（スペイン語ロケール）の商品インポートCSVの列定義と、
//! 1商品分の出力レコードを定義するモジュール。

use std::collections::HashMap;

pub const COL_ID: &str = "ID";
pub const COL_TYPE: &str = "Tipo";
pub const COL_SKU: &str = "SKU";
pub const COL_GTIN: &str = "GTIN";
pub const COL_NAME: &str = "Nombre";
pub const COL_PUBLISHED: &str = "Publicado";
pub const COL_FEATURED: &str = "¿Está destacado?";
pub const COL_VISIBILITY: &str = "Visibilidad en el catálogo";
pub const COL_SHORT_DESCRIPTION: &str = "Descripción corta";
pub const COL_DESCRIPTION: &str = "Descripción";
pub const COL_SALE_FROM: &str = "Día en que empieza el precio rebajado";
pub const COL_SALE_TO: &str = "Día en que termina el precio rebajado";
pub const COL_TAX_STATUS: &str = "Estado del impuesto";
pub const COL_TAX_CLASS: &str = "Clase de impuesto";
pub const COL_IN_STOCK: &str = "¿Existencias?";
pub const COL_STOCK: &str = "Inventario";
pub const COL_LOW_STOCK: &str = "Cantidad de bajo inventario";
pub const COL_BACKORDERS: &str = "¿Permitir reservas de productos agotados?";
pub const COL_SOLD_INDIVIDUALLY: &str = "¿Vendido individualmente?";
pub const COL_WEIGHT: &str = "Peso (kg)";
pub const COL_LENGTH: &str = "Longitud (cm)";
pub const COL_WIDTH: &str = "Anchura (cm)";
pub const COL_HEIGHT: &str = "Altura (cm)";
pub const COL_REVIEWS: &str = "¿Permitir valoraciones de clientes?";
pub const COL_PURCHASE_NOTE: &str = "Nota de compra";
pub const COL_SALE_PRICE: &str = "Precio rebajado";
pub const COL_REGULAR_PRICE: &str = "Precio normal";
pub const COL_CATEGORIES: &str = "Categorías";
pub const COL_TAGS: &str = "Etiquetas";
pub const COL_SHIPPING_CLASS: &str = "Clase de envío";
pub const COL_IMAGES: &str = "Imágenes";
pub const COL_DOWNLOAD_LIMIT: &str = "Límite de descargas";
pub const COL_DOWNLOAD_EXPIRY: &str = "Días de caducidad de la descarga";
pub const COL_PARENT: &str = "Superior";
pub const COL_GROUPED: &str = "Productos agrupados";
pub const COL_UPSELLS: &str = "Ventas dirigidas";
pub const COL_CROSS_SELLS: &str = "Ventas cruzadas";
pub const COL_EXTERNAL_URL: &str = "URL externa";
pub const COL_BUTTON_TEXT: &str = "Texto del botón";
pub const COL_POSITION: &str = "Posición";

/// デフォルトのインポートスキーマ（40列、出力順）
pub const WOOCOMMERCE_COLUMNS: [&str; 40] = [
    COL_ID,
    COL_TYPE,
    COL_SKU,
    COL_GTIN,
    COL_NAME,
    COL_PUBLISHED,
    COL_FEATURED,
    COL_VISIBILITY,
    COL_SHORT_DESCRIPTION,
    COL_DESCRIPTION,
    COL_SALE_FROM,
    COL_SALE_TO,
    COL_TAX_STATUS,
    COL_TAX_CLASS,
    COL_IN_STOCK,
    COL_STOCK,
    COL_LOW_STOCK,
    COL_BACKORDERS,
    COL_SOLD_INDIVIDUALLY,
    COL_WEIGHT,
    COL_LENGTH,
    COL_WIDTH,
    COL_HEIGHT,
    COL_REVIEWS,
    COL_PURCHASE_NOTE,
    COL_SALE_PRICE,
    COL_REGULAR_PRICE,
    COL_CATEGORIES,
    COL_TAGS,
    COL_SHIPPING_CLASS,
    COL_IMAGES,
    COL_DOWNLOAD_LIMIT,
    COL_DOWNLOAD_EXPIRY,
    COL_PARENT,
    COL_GROUPED,
    COL_UPSELLS,
    COL_CROSS_SELLS,
    COL_EXTERNAL_URL,
    COL_BUTTON_TEXT,
    COL_POSITION,
];

/// マッパーが値を書き込む列（スキーマ検証に使用）
pub(crate) const MAPPED_COLUMNS: [&str; 20] = [
    COL_ID,
    COL_TYPE,
    COL_SKU,
    COL_NAME,
    COL_PUBLISHED,
    COL_FEATURED,
    COL_VISIBILITY,
    COL_SHORT_DESCRIPTION,
    COL_DESCRIPTION,
    COL_TAX_STATUS,
    COL_TAX_CLASS,
    COL_IN_STOCK,
    COL_STOCK,
    COL_LOW_STOCK,
    COL_BACKORDERS,
    COL_SOLD_INDIVIDUALLY,
    COL_REVIEWS,
    COL_REGULAR_PRICE,
    COL_CATEGORIES,
    COL_TAGS,
];

/// 出力スキーマ（列名の順序付きリスト）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// 列名のリストからスキーマを生成
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// WooCommerce標準の40列スキーマ
    pub fn woocommerce() -> Self {
        Self::new(WOOCOMMERCE_COLUMNS)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::woocommerce()
    }
}

/// 1商品分の出力レコード
///
/// スキーマのすべての列を保持します（未使用の列は空文字列）。
/// `id`は受理順に割り当てられた連番です。
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    id: u32,
    fields: HashMap<String, String>,
}

impl OutputRecord {
    /// スキーマの全列を空文字列で初期化したレコードを生成
    pub(crate) fn blank(id: u32, schema: &Schema) -> Self {
        let fields = schema
            .columns()
            .iter()
            .map(|c| (c.clone(), String::new()))
            .collect();
        Self { id, fields }
    }

    /// 受理順の連番
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 列の値を取得する（スキーマ外の列は`None`）
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// 列の値を設定する
    ///
    /// スキーマに存在しない列は無視されます。
    pub(crate) fn set(&mut self, column: &str, value: impl Into<String>) {
        if let Some(slot) = self.fields.get_mut(column) {
            *slot = value.into();
        }
    }

    /// 画像ロケータを設定する
    pub fn set_image(&mut self, locator: &str) {
        self.set(COL_IMAGES, locator);
    }

    /// スキーマ順に値を並べる
    pub fn values<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = &'a str> + 'a {
        schema
            .columns()
            .iter()
            .map(move |c| self.get(c).unwrap_or(""))
    }

    pub fn name(&self) -> &str {
        self.get(COL_NAME).unwrap_or("")
    }

    pub fn category(&self) -> &str {
        self.get(COL_CATEGORIES).unwrap_or("")
    }

    pub fn sku(&self) -> &str {
        self.get(COL_SKU).unwrap_or("")
    }

    pub fn image(&self) -> &str {
        self.get(COL_IMAGES).unwrap_or("")
    }

    /// 通常価格を数値として取得（解析できない場合は0）
    pub fn regular_price(&self) -> f64 {
        self.get(COL_REGULAR_PRICE)
            .and_then(|p| p.parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}
