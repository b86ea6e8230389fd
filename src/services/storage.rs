// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! S3-compatible object storage for listing images and profile pictures.

use anyhow::{anyhow, Result};
use s3::creds::Credentials;
use s3::Bucket;
use s3::Region;
use uuid::Uuid;

/// Configuration for S3-compatible storage
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL under which uploaded objects are publicly reachable.
    /// Defaults to `<endpoint>/<bucket>` (path-style).
    pub public_base_url: Option<String>,
}

impl S3Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("S3_ENDPOINT")
            .map_err(|_| anyhow!("S3_ENDPOINT environment variable not set"))?;
        let bucket = std::env::var("S3_BUCKET")
            .map_err(|_| anyhow!("S3_BUCKET environment variable not set"))?;
        let access_key = std::env::var("S3_ACCESS_KEY")
            .map_err(|_| anyhow!("S3_ACCESS_KEY environment variable not set"))?;
        let secret_key = std::env::var("S3_SECRET_KEY")
            .map_err(|_| anyhow!("S3_SECRET_KEY environment variable not set"))?;

        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let public_base_url = std::env::var("S3_PUBLIC_BASE_URL").ok();

        Ok(Self {
            endpoint,
            region,
            bucket,
            access_key,
            secret_key,
            public_base_url,
        })
    }
}

/// Map a content type to the object key extension. Unknown types are refused
/// so the bucket only ever holds images.
fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// S3-compatible storage client for listing images and avatars
pub struct StorageClient {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl StorageClient {
    /// Create a new S3 storage client
    pub async fn new(config: S3Config) -> Result<Self> {
        let public_base_url = config
            .public_base_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", config.endpoint.trim_end_matches('/'), config.bucket));

        let region = Region::Custom {
            region: config.region,
            endpoint: config.endpoint,
        };

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| anyhow!("Failed to create S3 credentials: {}", e))?;

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| anyhow!("Failed to create S3 bucket: {}", e))?
            .with_path_style();

        println!("Connected to S3 storage bucket: {}", config.bucket);

        Ok(Self {
            bucket,
            public_base_url,
        })
    }

    /// Upload an image and return its object key and public URL.
    pub async fn upload_image(
        &self,
        data: &[u8],
        content_type: &str,
    ) -> Result<(String, String)> {
        let extension = image_extension(content_type)
            .ok_or_else(|| anyhow!("Unsupported image content type: {}", content_type))?;

        if data.is_empty() {
            return Err(anyhow!("Image data is empty"));
        }

        let key = format!("{}.{}", Uuid::now_v7(), extension);

        self.bucket
            .put_object_with_content_type(&key, data, content_type)
            .await
            .map_err(|e| anyhow!("Failed to upload to S3: {}", e))?;

        println!(
            "Uploaded image to S3: {} ({} bytes, {})",
            key,
            data.len(),
            content_type
        );

        Ok((key.clone(), self.public_url(&key)))
    }

    /// Public URL for an uploaded object.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    /// Delete an uploaded object.
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| anyhow!("Failed to delete object from S3: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_v7_is_time_ordered() {
        let id1 = Uuid::now_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = Uuid::now_v7();

        // UUID v7 should be sortable by time
        assert!(id2 > id1);
    }

    #[test]
    fn test_image_extension_mapping() {
        assert_eq!(image_extension("image/jpeg"), Some("jpg"));
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("application/pdf"), None);
        assert_eq!(image_extension("text/html"), None);
    }

    #[tokio::test]
    #[ignore] // Requires MinIO running
    async fn test_upload_image_roundtrip_key() {
        let config = S3Config::from_env().unwrap();
        let client = StorageClient::new(config).await.unwrap();

        let data = vec![0xFFu8, 0xD8, 0xFF, 0xE0]; // JPEG magic
        let (key, url) = client.upload_image(&data, "image/jpeg").await.unwrap();

        assert!(key.ends_with(".jpg"));
        assert!(url.ends_with(&key));

        client.delete_object(&key).await.unwrap();
    }
}
