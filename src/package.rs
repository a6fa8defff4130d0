//! Image Packaging
//!
//! 画像ディレクトリ内の画像ファイルを、WordPressへ手動でアップロードするための
//! タイムスタンプ付きZIPアーカイブにまとめる。

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::CatalogError;

/// アーカイブに含める拡張子
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// 作成したアーカイブの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub path: PathBuf,
    pub file_count: usize,
}

/// 画像ディレクトリ内の画像ファイル名を名前順に列挙する
pub fn list_images(images_dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    if !images_dir.is_dir() {
        return Err(CatalogError::Config(format!(
            "Image directory not found: {}",
            images_dir.display()
        )));
    }

    let mut images: Vec<PathBuf> = fs::read_dir(images_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    images.sort();
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// アーカイブのファイル名（`woocommerce_images_YYYYmmdd_HHMMSS.zip`）
pub fn archive_name(timestamp: NaiveDateTime) -> String {
    format!("woocommerce_images_{}.zip", timestamp.format("%Y%m%d_%H%M%S"))
}

/// 画像をZIPアーカイブにまとめる
///
/// # 引数
///
/// * `images_dir` - 画像ディレクトリ
/// * `dest_dir` - アーカイブの出力先ディレクトリ
/// * `timestamp` - アーカイブ名に使う日時
///
/// # 戻り値
///
/// * `Ok(PackageSummary)` - 作成したアーカイブのパスとファイル数
/// * `Err(CatalogError::Config)` - 画像ディレクトリが存在しない、または画像がない場合
pub fn package_images(
    images_dir: &Path,
    dest_dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<PackageSummary, CatalogError> {
    let images = list_images(images_dir)?;
    if images.is_empty() {
        return Err(CatalogError::Config(format!(
            "No images found in {}",
            images_dir.display()
        )));
    }

    let path = dest_dir.join(archive_name(timestamp));
    let mut zip = ZipWriter::new(BufWriter::new(File::create(&path)?));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for image in &images {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        zip.start_file(name, options)?;
        zip.write_all(&fs::read(image)?)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;

    tracing::info!(path = %path.display(), files = images.len(), "Image package created");
    Ok(PackageSummary {
        path,
        file_count: images.len(),
    })
}
