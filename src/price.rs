//! Price Normalizer Module
//!
//! 税込み合計金額（ロケール形式の通貨文字列）から税抜きの基本価格を算出する。
//! 解析できない値はすべて0として扱い、エラーは呼び出し側に伝播しない。

use crate::types::RawValue;

/// デフォルトの税率乗数（3%）
pub const DEFAULT_TAX_MULTIPLIER: f64 = 1.03;

/// 表計算ソフトが数式エラー・欠損値として出力する文字列
pub const DEFAULT_ERROR_SENTINELS: [&str; 9] = [
    "#VALUE!", "#N/A", "#DIV/0!", "#REF!", "#NAME?", "#NUM!", "#NULL!", "nan", "NaN",
];

/// 価格正規化器
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    tax_multiplier: f64,
    error_sentinels: Vec<String>,
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_TAX_MULTIPLIER,
            DEFAULT_ERROR_SENTINELS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl PriceNormalizer {
    pub fn new(tax_multiplier: f64, error_sentinels: Vec<String>) -> Self {
        Self {
            tax_multiplier,
            error_sentinels,
        }
    }

    /// 税込み合計金額を税抜き価格（小数2桁）に変換する
    ///
    /// # 引数
    ///
    /// * `value` - セルの値（列が存在しない場合は`None`）
    ///
    /// # 戻り値
    ///
    /// 0以上の税抜き価格。欠損値、エラー値、数値として解析できない値、
    /// 0以下の金額はすべて`0.0`になります。
    pub fn normalize(&self, value: Option<&RawValue>) -> f64 {
        let total = match value {
            None | Some(RawValue::Empty) | Some(RawValue::Error(_)) => return 0.0,
            Some(RawValue::Number(n)) => *n,
            Some(RawValue::Text(s)) => match self.parse_total(s) {
                Some(total) => total,
                None => return 0.0,
            },
        };

        if !total.is_finite() || total <= 0.0 {
            return 0.0;
        }

        round2(total / self.tax_multiplier)
    }

    /// 通貨文字列を数値に変換する
    ///
    /// `"1.234,50 €"` のように小数点のカンマより前にあるピリオドは桁区切りとして除去します。
    fn parse_total(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || self.error_sentinels.iter().any(|s| s == trimmed) {
            return None;
        }

        let mut cleaned: String = trimmed
            .chars()
            .filter(|c| *c != '€' && !c.is_whitespace())
            .collect();

        if let Some(comma) = cleaned.rfind(',') {
            let (int_part, frac_part) = cleaned.split_at(comma);
            cleaned = format!("{}.{}", int_part.replace('.', ""), &frac_part[1..]);
        }

        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// 小数2桁に丸める
pub(crate) fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
