//! Image Download
//!
//! プレースホルダー画像をダウンロードし、商品IDと商品名から決まるファイル名で
//! ローカルに保存する。同じパスのファイルが既に存在する場合は再利用する。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use super::placeholder::placeholder_url;
use super::{ImageConfig, ImageProvider, ImageRequest};
use crate::error::CatalogError;

/// URLからバイト列を取得する抽象
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}

/// reqwest（ブロッキング）によるHTTP取得
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// タイムアウト付きのクライアントを生成
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("xlsx2woo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// 画像をダウンロードしてローカルファイルのパスを返すプロバイダー
#[derive(Debug, Clone)]
pub struct LocalImageProvider<F: Fetcher> {
    fetcher: F,
    config: ImageConfig,
}

impl<F: Fetcher> LocalImageProvider<F> {
    pub fn new(fetcher: F, config: ImageConfig) -> Self {
        Self { fetcher, config }
    }

    /// 商品の保存先パス
    pub fn target_path(&self, request: &ImageRequest<'_>) -> PathBuf {
        self.config
            .image_dir
            .join(image_file_name(request.id, request.name, &self.config))
    }

    fn download(&self, request: &ImageRequest<'_>) -> Result<PathBuf, CatalogError> {
        let path = self.target_path(request);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Reusing downloaded image");
            return Ok(path);
        }

        let url = placeholder_url(request.name, &self.config);
        let bytes = self.fetcher.fetch(&url)?;
        if bytes.is_empty() {
            return Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("empty response from {}", url),
            )));
        }

        fs::create_dir_all(&self.config.image_dir)?;
        write_complete(&path, &bytes)?;
        tracing::debug!(
            url = %url,
            path = %path.display(),
            bytes = bytes.len(),
            "Downloaded image"
        );
        Ok(path)
    }
}

/// 一時ファイルに書き込んでから`path`へリネームする
///
/// 失敗時は一時ファイルを削除し、`path`には何も残さない。
fn write_complete(path: &Path, bytes: &[u8]) -> Result<(), CatalogError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let result = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(())
}

impl<F: Fetcher> ImageProvider for LocalImageProvider<F> {
    fn name(&self) -> &str {
        "local-download"
    }

    fn resolve(&mut self, request: &ImageRequest<'_>) -> Option<String> {
        match self.download(request) {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => {
                tracing::warn!(product = request.name, error = %e, "Image download failed");
                None
            }
        }
    }
}

/// 保存ファイル名: `producto-<4桁ID>-<正規化した商品名>.<拡張子>`
pub fn image_file_name(id: u32, name: &str, config: &ImageConfig) -> String {
    format!(
        "producto-{:04}-{}.{}",
        id,
        sanitize_name(name, config.name_prefix_len),
        config.extension
    )
}

/// 商品名をファイル名に使える形へ変換する
///
/// 小文字化し、アクセント記号を外し、英数字以外をハイフンにまとめ、
/// 先頭`max_len`文字に切り詰めます。
pub fn sanitize_name(name: &str, max_len: usize) -> String {
    let mut out = String::new();
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }

    let truncated: String = out.chars().take(max_len).collect();
    let trimmed = truncated.trim_matches('-');
    if trimmed.is_empty() {
        "sin-nombre".to_string()
    } else {
        trimmed.to_string()
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{CacheKeyMode, CacheLookup, ImageCache, ImageResolver};
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct StubFetcher {
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, CatalogError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(CatalogError::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "timed out",
                )))
            } else {
                Ok(b"\xFF\xD8\xFFfake-jpeg".to_vec())
            }
        }
    }

    fn config_in(dir: &TempDir) -> ImageConfig {
        ImageConfig {
            image_dir: dir.path().join("product_images"),
            ..ImageConfig::default()
        }
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Chesterfield 24", 30), "chesterfield-24");
        assert_eq!(sanitize_name("Cartón  Chesterfield!", 30), "carton-chesterfield");
        assert_eq!(sanitize_name("Papel de liar extra fino largo", 12), "papel-de-lia");
        assert_eq!(sanitize_name("Papel de ", 6), "papel");
        assert_eq!(sanitize_name("***", 30), "sin-nombre");
    }

    #[test]
    fn test_image_file_name() {
        let config = ImageConfig::default();
        assert_eq!(
            image_file_name(1, "Chesterfield 24", &config),
            "producto-0001-chesterfield-24.jpg"
        );
    }

    #[test]
    fn test_download_writes_file() {
        let dir = TempDir::new().unwrap();
        let calls = Rc::new(Cell::new(0));
        let fetcher = StubFetcher {
            calls: calls.clone(),
            fail: false,
        };
        let mut provider = LocalImageProvider::new(fetcher, config_in(&dir));

        let request = ImageRequest {
            name: "Pipa Blanca",
            id: 3,
        };
        let locator = provider.resolve(&request).unwrap();

        assert!(locator.ends_with("producto-0003-pipa-blanca.jpg"));
        assert!(std::path::Path::new(&locator).exists());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_existing_file_is_reused() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(&config.image_dir).unwrap();
        fs::write(config.image_dir.join("producto-0005-mechero.jpg"), b"old").unwrap();

        let calls = Rc::new(Cell::new(0));
        let fetcher = StubFetcher {
            calls: calls.clone(),
            fail: false,
        };
        let mut provider = LocalImageProvider::new(fetcher, config);

        let request = ImageRequest {
            name: "Mechero",
            id: 5,
        };
        let locator = provider.resolve(&request).unwrap();

        assert!(locator.ends_with("producto-0005-mechero.jpg"));
        assert_eq!(calls.get(), 0);
        assert_eq!(fs::read(&locator).unwrap(), b"old");
    }

    #[test]
    fn test_download_failure_declines() {
        let dir = TempDir::new().unwrap();
        let calls = Rc::new(Cell::new(0));
        let fetcher = StubFetcher {
            calls: calls.clone(),
            fail: true,
        };
        let mut provider = LocalImageProvider::new(fetcher, config_in(&dir));

        let request = ImageRequest {
            name: "Mechero",
            id: 1,
        };
        assert_eq!(provider.resolve(&request), None);
        assert_eq!(calls.get(), 1);
        assert!(!provider.target_path(&request).exists());
    }

    #[test]
    fn test_write_failure_is_memoized_as_no_image() {
        let dir = TempDir::new().unwrap();
        // 画像ディレクトリの位置に通常ファイルがあるとcreate_dir_allが失敗する
        let blocker = dir.path().join("product_images");
        fs::write(&blocker, b"not a directory").unwrap();

        let calls = Rc::new(Cell::new(0));
        let fetcher = StubFetcher {
            calls: calls.clone(),
            fail: false,
        };
        let mut resolver = ImageResolver::new(ImageCache::in_memory(), CacheKeyMode::NameWithId)
            .with_provider(LocalImageProvider::new(fetcher, config_in(&dir)));

        assert_eq!(resolver.resolve("Pipa", 1), None);
        assert_eq!(resolver.resolve("Pipa", 1), None);

        assert_eq!(calls.get(), 1);
        assert_eq!(resolver.cache().lookup("pipa_1"), CacheLookup::NoImage);
        assert_eq!(resolver.stats().failed, 1);
        assert_eq!(resolver.stats().cache_hits, 1);
    }

    #[test]
    fn test_failed_write_leaves_no_target_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(&config.image_dir).unwrap();
        // 一時ファイルの位置をディレクトリで塞いで書き込みを失敗させる
        fs::create_dir_all(config.image_dir.join("producto-0001-pipa.jpg.part")).unwrap();

        let calls = Rc::new(Cell::new(0));
        let fetcher = StubFetcher {
            calls: calls.clone(),
            fail: false,
        };
        let mut provider = LocalImageProvider::new(fetcher, config);
        let request = ImageRequest {
            name: "Pipa",
            id: 1,
        };

        assert_eq!(provider.resolve(&request), None);
        assert!(!provider.target_path(&request).exists());
    }

    #[test]
    fn test_write_complete_replaces_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("producto-0002-mechero.jpg");
        fs::write(dir.path().join("producto-0002-mechero.jpg.part"), b"trunc").unwrap();

        write_complete(&path, b"full-image").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"full-image");
        assert!(!dir.path().join("producto-0002-mechero.jpg.part").exists());
    }
}
