//! # Image Sources
//!
//! Resolves the `source` of an image node to pixels.
//!
//! | Source form | Example |
//! |-------------|---------|
//! | Data URI | `data:image/png;base64,iVBORw0...` |
//! | Bare base64 | `iVBORw0KGgo...` |
//! | File URI | `file:///srv/logo.png` |
//! | Path | `assets/logo.png` |
//! | HTTP(S) URL | `https://example.com/logo.png` |
//!
//! Decoding is asynchronous so remote sources can be fetched; the converter
//! resolves every image before the synchronous tree walk.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose};
use image::{DynamicImage, GrayImage, Luma};
use tokio::sync::OnceCell;

use crate::error::ThermalError;

/// Turns an image source string into a grayscale pixel buffer.
///
/// Transparent pixels must be composited onto white.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(&self, source: &str) -> Result<GrayImage, ThermalError>;
}

/// Default decoder covering data URIs, base64, local files and HTTP(S).
///
/// The HTTP client is only built when the first URL is downloaded.
#[derive(Debug, Clone, Default)]
pub struct SourceDecoder {
    http_client: OnceCell<reqwest::Client>,
}

impl SourceDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, user agent).
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self {
            http_client: OnceCell::new_with(Some(http_client)),
        }
    }

    async fn client(&self) -> Result<&reqwest::Client, ThermalError> {
        self.http_client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .user_agent(concat!("thermal-escpos/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|e| {
                        ThermalError::Image(format!("Failed to create HTTP client: {}", e))
                    })
            })
            .await
    }

    /// Load the raw encoded bytes behind a source.
    pub async fn load_bytes(&self, source: &str) -> Result<Vec<u8>, ThermalError> {
        let source = source.trim();

        if let Some(rest) = source.strip_prefix("data:") {
            return decode_data_uri(rest);
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            return self.download(source).await;
        }
        if let Some(path) = source.strip_prefix("file://") {
            return read_file(path).await;
        }
        if tokio::fs::try_exists(source).await.unwrap_or(false) {
            return read_file(source).await;
        }
        decode_base64(source).map_err(|_| {
            ThermalError::Image(format!(
                "Image source is neither a readable file nor base64 data: {}",
                truncate(source)
            ))
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ThermalError> {
        let response = self
            .client()
            .await?
            .get(url)
            .send()
            .await
            .map_err(|e| ThermalError::Image(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(ThermalError::Image(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ThermalError::Image(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageDecoder for SourceDecoder {
    async fn decode(&self, source: &str) -> Result<GrayImage, ThermalError> {
        let bytes = self.load_bytes(source).await?;
        decode_bytes(&bytes)
    }
}

/// Decode encoded image bytes (PNG, JPEG, GIF, BMP...) to grayscale on white.
pub fn decode_bytes(bytes: &[u8]) -> Result<GrayImage, ThermalError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ThermalError::Image(format!("Failed to decode image: {}", e)))?;
    Ok(flatten_on_white(&image))
}

/// Composite alpha onto white paper and drop color.
pub fn flatten_on_white(image: &DynamicImage) -> GrayImage {
    let with_alpha = image.to_luma_alpha8();
    let (width, height) = with_alpha.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [luma, alpha] = with_alpha.get_pixel(x, y).0;
        let (luma, alpha) = (luma as u32, alpha as u32);
        Luma([((luma * alpha + 255 * (255 - alpha)) / 255) as u8])
    })
}

fn decode_data_uri(rest: &str) -> Result<Vec<u8>, ThermalError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ThermalError::Image("Malformed data URI: missing ','".into()))?;
    if header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        decode_base64(payload)
            .map_err(|e| ThermalError::Image(format!("Invalid base64 in data URI: {}", e)))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

fn decode_base64(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    general_purpose::STANDARD
        .decode(&compact)
        .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(compact.trim_end_matches('=')))
}

async fn read_file(path: &str) -> Result<Vec<u8>, ThermalError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ThermalError::Image(format!("Failed to read {}: {}", path, e)))
}

fn truncate(source: &str) -> String {
    match source.char_indices().nth(48) {
        Some((idx, _)) => format!("{}...", &source[..idx]),
        None => source.to_string(),
    }
}
