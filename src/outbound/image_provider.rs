use crate::domain::{models::LoadedImage, ports::ImageLoader};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{prelude::BASE64_STANDARD, Engine};
use image::DynamicImage;
use std::{io::Cursor, path::Path};
use tracing::debug;

/// Loads result images from disk or over HTTP.
pub struct ImageCrateLoader {
    http: reqwest::Client,
}

impl ImageCrateLoader {
    pub fn new() -> Self {
        ImageCrateLoader {
            http: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<DynamicImage> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        image::load_from_memory(&bytes).context("decoding downloaded image")
    }
}

impl Default for ImageCrateLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageLoader for ImageCrateLoader {
    async fn load(&self, uri: &str) -> Result<LoadedImage> {
        let image = if uri.starts_with("http") {
            self.fetch(uri).await?
        } else if Path::new(uri).exists() {
            image::open(uri)?
        } else {
            return Err(anyhow!("Invalid image path: {}", uri));
        };

        Ok(LoadedImage {
            uri: uri.to_string(),
            base64: resize_and_base64encode_image(&image)?,
        })
    }
}

pub fn resize_and_base64encode_image(image: &DynamicImage) -> Result<String> {
    // Resize the image to 672x672
    let resized_img = image.thumbnail(672, 672).to_rgb8();

    // Create a buffer to hold the encoded image
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    resized_img.write_to(&mut cursor, image::ImageFormat::Jpeg)?;

    let image_base64 = BASE64_STANDARD.encode(buffer);
    debug!("Encoded image with {} base64 bytes", image_base64.len());
    Ok(image_base64)
}
