//! Catalog Verification
//!
//! 書き出したカタログCSVを読み戻し、画像ロケータの付与状況と
//! ローカル画像ファイルの存在を確認する。

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Serialize;

use crate::error::CatalogError;
use crate::schema::{COL_IMAGES, COL_NAME};

/// 画像付き商品の例
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSample {
    pub name: String,
    pub locator: String,
    pub exists: bool,
}

/// 検証結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub total: usize,
    pub with_images: usize,
    pub existing_files: usize,
    pub samples: Vec<ImageSample>,
}

impl VerificationReport {
    /// 画像付き商品の割合（%）
    pub fn image_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.with_images as f64 / self.total as f64 * 100.0
        }
    }
}

/// カタログCSVを検証する
///
/// ローカルパスの存在確認は、カレントディレクトリからの相対パスとして行います。
pub fn verify_catalog(path: impl AsRef<Path>) -> Result<VerificationReport, CatalogError> {
    let content = fs::read_to_string(path.as_ref())?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut reader = ReaderBuilder::new().from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CatalogError::Config(format!("Column '{}' not found in catalog", name)))
    };
    let name_idx = column(COL_NAME)?;
    let image_idx = column(COL_IMAGES)?;

    let mut report = VerificationReport {
        total: 0,
        with_images: 0,
        existing_files: 0,
        samples: Vec::new(),
    };

    for record in reader.records() {
        let record = record?;
        report.total += 1;

        let locator = record.get(image_idx).unwrap_or("").trim();
        if locator.is_empty() {
            continue;
        }
        report.with_images += 1;

        let exists = Path::new(locator).is_file();
        if exists {
            report.existing_files += 1;
        }
        if report.samples.len() < 5 {
            report.samples.push(ImageSample {
                name: record.get(name_idx).unwrap_or("").to_string(),
                locator: locator.to_string(),
                exists,
            });
        }
    }

    Ok(report)
}
