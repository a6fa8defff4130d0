//! Image Module
//!
//! 商品ごとのプレースホルダー画像を解決する。
//!
//! `ImageResolver`は1回の実行につき1つだけ生成され、キャッシュを全行で共有する。
//! 解決はプロバイダーの順序付きリストで行い、先頭から順に試して最初に
//! ロケータを返したものを採用する。結果（失敗を含む）はキャッシュに記録される。

mod cache;
mod download;
mod placeholder;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CatalogError;

pub use cache::{local_key, name_key, CacheLookup, ImageCache};
pub use download::{image_file_name, sanitize_name, Fetcher, HttpFetcher, LocalImageProvider};
pub use placeholder::{
    label_text, name_hash, palette_color, placeholder_url, PlaceholderUrlProvider,
};

/// 画像取得の設定
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    /// 画像の保存先ディレクトリ
    pub image_dir: PathBuf,

    /// キャッシュファイルのパス
    pub cache_file: PathBuf,

    /// プレースホルダー画像サービスのベースURL
    pub placeholder_base_url: String,

    pub width: u32,
    pub height: u32,

    /// 背景色のパレット（16進カラーコード）
    pub palette: Vec<String>,

    /// 文字色（16進カラーコード）
    pub text_color: String,

    /// ラベルに使う商品名の最大文字数
    pub label_len: usize,

    /// 画像ファイルの拡張子
    pub extension: String,

    /// ファイル名に含める商品名の最大文字数
    pub name_prefix_len: usize,

    /// 1リクエストあたりのタイムアウト
    pub timeout: Duration,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("product_images"),
            cache_file: PathBuf::from("image_cache.json"),
            placeholder_base_url: "https://dummyimage.com".to_string(),
            width: 400,
            height: 400,
            palette: [
                "FF6B6B", "4ECDC4", "45B7D1", "FFA07A", "98D8C8", "F7DC6F", "BB8FCE", "85C1E9",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            text_color: "ffffff".to_string(),
            label_len: 8,
            extension: "jpg".to_string(),
            name_prefix_len: 30,
            timeout: Duration::from_secs(10),
        }
    }
}

/// 画像解決のリクエスト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRequest<'a> {
    /// 商品名
    pub name: &'a str,

    /// 受理時に割り当てられた商品ID
    pub id: u32,
}

/// 商品名を画像ロケータに解決する戦略
///
/// 解決できない場合は`None`を返して次のプロバイダーに委ねる。
/// 実装はエラーを外部に伝播してはならない。
pub trait ImageProvider {
    /// ログ出力用の名前
    fn name(&self) -> &str;

    fn resolve(&mut self, request: &ImageRequest<'_>) -> Option<String>;
}

/// キャッシュキーの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKeyMode {
    /// 商品名のみ（リモートURL向け）
    Name,

    /// 商品名 + ID（ローカル保存向け。ファイル名がIDを含むため）
    NameWithId,
}

/// 解決の統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub cache_hits: usize,
    pub resolved: usize,
    pub failed: usize,
}

/// キャッシュ付き画像リゾルバー
pub struct ImageResolver {
    cache: ImageCache,
    providers: Vec<Box<dyn ImageProvider>>,
    key_mode: CacheKeyMode,
    stats: ResolveStats,
}

impl ImageResolver {
    /// プロバイダーを持たないリゾルバーを生成
    pub fn new(cache: ImageCache, key_mode: CacheKeyMode) -> Self {
        Self {
            cache,
            providers: Vec::new(),
            key_mode,
            stats: ResolveStats::default(),
        }
    }

    /// プロバイダーを末尾に追加する
    pub fn with_provider(mut self, provider: impl ImageProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// 画像をダウンロードしてローカルに保存する標準構成
    ///
    /// キャッシュは`config.cache_file`から読み込まれます。
    pub fn local_download(config: &ImageConfig) -> Result<Self, CatalogError> {
        let fetcher = HttpFetcher::new(config.timeout)?;
        let cache = ImageCache::load(&config.cache_file);
        Ok(Self::new(cache, CacheKeyMode::NameWithId)
            .with_provider(LocalImageProvider::new(fetcher, config.clone())))
    }

    /// 商品の画像ロケータを取得する
    ///
    /// # 戻り値
    ///
    /// * `Some(locator)` - キャッシュヒット、またはいずれかのプロバイダーが解決した場合
    /// * `None` - すべてのプロバイダーが解決できなかった場合、または以前に失敗が記録されている場合
    pub fn resolve(&mut self, name: &str, id: u32) -> Option<String> {
        let key = match self.key_mode {
            CacheKeyMode::Name => name_key(name),
            CacheKeyMode::NameWithId => local_key(name, id),
        };

        match self.cache.lookup(&key) {
            CacheLookup::Hit(locator) => {
                tracing::debug!(key = %key, "Image cache hit");
                self.stats.cache_hits += 1;
                return Some(locator.to_string());
            }
            CacheLookup::NoImage => {
                tracing::debug!(key = %key, "Image previously unresolved, skipping");
                self.stats.cache_hits += 1;
                return None;
            }
            CacheLookup::Miss => {}
        }

        let request = ImageRequest { name, id };
        let locator = self.providers.iter_mut().find_map(|provider| {
            let result = provider.resolve(&request);
            if result.is_none() {
                tracing::debug!(provider = provider.name(), product = name, "Provider declined");
            }
            result
        });

        match &locator {
            Some(_) => self.stats.resolved += 1,
            None => self.stats.failed += 1,
        }
        self.cache.insert(key, locator.as_deref());
        locator
    }

    /// キャッシュをファイルに書き出す（実行の最後に1回呼び出す）
    pub fn persist(&self) -> Result<(), CatalogError> {
        self.cache.persist()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }
}
