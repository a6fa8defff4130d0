//! Placeholder Image URLs
//!
//! 商品名から決定的にプレースホルダー画像のURLを生成する。
//! 背景色は商品名のSHA-256ハッシュでパレットから選択するため、
//! プロセスや実行環境が変わっても同じ商品には同じ色が割り当てられる。

use sha2::{Digest, Sha256};

use super::{ImageConfig, ImageProvider, ImageRequest};

/// 商品名の64ビットハッシュ（SHA-256の先頭8バイト、ビッグエンディアン）
pub fn name_hash(name: &str) -> u64 {
    let digest = Sha256::digest(name.trim().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// 商品名に対応するパレットの色コード
pub fn palette_color<'a>(name: &str, palette: &'a [String]) -> &'a str {
    if palette.is_empty() {
        return "CCCCCC";
    }
    let index = (name_hash(name) % palette.len() as u64) as usize;
    &palette[index]
}

/// 画像に描画するラベル文字列（先頭N文字を大文字化し、URLエンコード）
pub fn label_text(name: &str, max_chars: usize) -> String {
    let label: String = name.trim().chars().take(max_chars).collect();
    urlencoding::encode(&label.to_uppercase()).replace("%20", "+")
}

/// プレースホルダー画像のURLを生成する
///
/// 形式: `{base}/{幅}x{高さ}/{背景色}/{文字色}.{拡張子}&text={ラベル}`
pub fn placeholder_url(name: &str, config: &ImageConfig) -> String {
    format!(
        "{}/{}x{}/{}/{}.{}&text={}",
        config.placeholder_base_url.trim_end_matches('/'),
        config.width,
        config.height,
        palette_color(name, &config.palette),
        config.text_color,
        config.extension,
        label_text(name, config.label_len),
    )
}

/// リモートURLをそのままロケータとして返すプロバイダー
///
/// ダウンロードは行わないため、常に解決に成功します。
#[derive(Debug, Clone)]
pub struct PlaceholderUrlProvider {
    config: ImageConfig,
}

impl PlaceholderUrlProvider {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }
}

impl ImageProvider for PlaceholderUrlProvider {
    fn name(&self) -> &str {
        "placeholder-url"
    }

    fn resolve(&mut self, request: &ImageRequest<'_>) -> Option<String> {
        if request.name.trim().is_empty() {
            return None;
        }
        Some(placeholder_url(request.name, &self.config))
    }
}
