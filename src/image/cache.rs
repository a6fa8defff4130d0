//! Image Cache
//!
//! 商品名（とID）から画像ロケータへの対応を記憶する永続キャッシュ。
//! 解決に失敗した結果も空文字列として記録し、次回以降の無駄な再取得を防ぐ。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CatalogError;

/// キャッシュ参照の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup<'a> {
    /// 解決済みのロケータ
    Hit(&'a str),

    /// 以前に解決を試みて失敗した（再試行しない）
    NoImage,

    /// 未登録
    Miss,
}

/// 画像キャッシュ
///
/// 読み込み（`load`）と書き出し（`persist`）は明示的な操作です。
/// `in_memory()`で生成したキャッシュはファイルに書き出されません。
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl ImageCache {
    /// ファイルに紐付かないキャッシュを生成
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// キャッシュファイルを読み込む
    ///
    /// ファイルが存在しない、または解析できない場合は空のキャッシュから開始します。
    /// どちらの場合も、`persist()`で同じパスに書き出されます。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let entries = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => {
                    tracing::info!(
                        path = %path.display(),
                        entries = entries.len(),
                        "Loaded image cache"
                    );
                    entries
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Image cache is not valid JSON, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read image cache, starting empty"
                );
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    /// キャッシュファイルのパス
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// キャッシュキーを参照する
    pub fn lookup(&self, key: &str) -> CacheLookup<'_> {
        match self.entries.get(key) {
            Some(locator) if !locator.is_empty() => CacheLookup::Hit(locator),
            Some(_) => CacheLookup::NoImage,
            None => CacheLookup::Miss,
        }
    }

    /// 解決結果を記録する（`None`は「画像なし」として記録）
    pub fn insert(&mut self, key: String, locator: Option<&str>) {
        self.entries
            .insert(key, locator.unwrap_or_default().to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キャッシュ全体をファイルに書き出す
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 書き出しに成功した場合、またはメモリ上のみのキャッシュの場合
    /// * `Err(CatalogError)` - 書き込みに失敗した場合（呼び出し側は警告のみ出す）
    pub fn persist(&self) -> Result<(), CatalogError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), entries = self.entries.len(), "Saved image cache");
        Ok(())
    }
}

/// 商品名からキャッシュキーを生成する（前後の空白除去、小文字化）
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// ローカル保存用のキャッシュキー（商品名キー + ID）
pub fn local_key(name: &str, id: u32) -> String {
    format!("{}_{}", name_key(name), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keys() {
        assert_eq!(name_key("  Pipa BLANCA "), "pipa blanca");
        assert_eq!(local_key("Pipa Blanca", 12), "pipa blanca_12");
    }

    #[test]
    fn test_lookup_states() {
        let mut cache = ImageCache::in_memory();
        assert_eq!(cache.lookup("a"), CacheLookup::Miss);

        cache.insert("a".to_string(), Some("product_images/a.jpg"));
        cache.insert("b".to_string(), None);

        assert_eq!(cache.lookup("a"), CacheLookup::Hit("product_images/a.jpg"));
        assert_eq!(cache.lookup("b"), CacheLookup::NoImage);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image_cache.json");

        let mut cache = ImageCache::load(&path);
        assert!(cache.is_empty());
        cache.insert("pipa_1".to_string(), Some("product_images/producto-0001-pipa.jpg"));
        cache.insert("mechero_2".to_string(), None);
        cache.persist().unwrap();

        let reloaded = ImageCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.lookup("pipa_1"),
            CacheLookup::Hit("product_images/producto-0001-pipa.jpg")
        );
        assert_eq!(reloaded.lookup("mechero_2"), CacheLookup::NoImage);
    }

    #[test]
    fn test_load_invalid_json_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image_cache.json");
        fs::write(&path, "{ not json").unwrap();

        let cache = ImageCache::load(&path);
        assert!(cache.is_empty());
        assert_eq!(cache.path(), Some(path.as_path()));
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // ディレクトリと同じパスにはファイルを書き込めない
        let mut cache = ImageCache::load(dir.path());
        cache.insert("x".to_string(), None);
        assert!(cache.persist().is_err());
    }

    #[test]
    fn test_in_memory_persist_is_noop() {
        let mut cache = ImageCache::in_memory();
        cache.insert("x".to_string(), Some("y"));
        assert!(cache.persist().is_ok());
    }
}
