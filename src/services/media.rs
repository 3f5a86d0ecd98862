use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::media::MediaUpload,
    utils::validation::{file_extension, sanitize_filename},
};

/// Stores validated image uploads under the configured directory and hands
/// back the public URL. The blob store itself is behind this seam; local
/// disk plus `ServeDir` stands in for it.
#[derive(Clone)]
pub struct MediaService {
    config: Config,
}

impl MediaService {
    pub async fn new(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.upload_dir).await?;
        Ok(Self {
            config: config.clone(),
        })
    }

    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<MediaUpload> {
        if data.is_empty() {
            return Err(AppError::FileUpload("Empty upload".to_string()));
        }
        if data.len() as u64 > self.config.max_upload_size {
            return Err(AppError::FileUpload(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size
            )));
        }

        let extension = file_extension(original_name)
            .ok_or_else(|| AppError::FileUpload("Missing file extension".to_string()))?;
        if !self
            .config
            .allowed_image_types
            .split(',')
            .any(|t| t.trim().eq_ignore_ascii_case(&extension))
        {
            return Err(AppError::FileUpload(format!(
                "File type '{}' is not allowed",
                extension
            )));
        }

        // Sniff the bytes; extension alone is not trusted
        let dimensions = imagesize::blob_size(data)
            .map_err(|_| AppError::FileUpload("File is not a valid image".to_string()))?;

        let filename = format!(
            "{}-{}",
            Uuid::new_v4(),
            sanitize_filename(original_name)
        );
        let path = std::path::Path::new(&self.config.upload_dir).join(&filename);
        debug!("Writing upload to {}", path.display());
        fs::write(&path, data).await?;

        let url = format!(
            "{}/uploads/{}",
            self.config.public_base_url.trim_end_matches('/'),
            filename
        );
        info!("Stored upload {} ({} bytes)", filename, data.len());

        Ok(MediaUpload {
            url,
            filename,
            size: data.len() as u64,
            width: dimensions.width as u32,
            height: dimensions.height as u32,
        })
    }
}
