use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::services::storage_service::FileStorage;
use crate::utils::time::parse_date;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// Declared part content type, if the client sent one.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    /// A declared content type decides; without one the extension must be a known image type.
    pub fn is_image(&self) -> bool {
        match self.content_type.as_deref().map(str::trim) {
            Some(ct) if !ct.is_empty() => ct.to_ascii_lowercase().starts_with("image/"),
            _ => self
                .file_name
                .rsplit_once('.')
                .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false),
        }
    }

    pub fn ensure_image(&self) -> Result<()> {
        if self.is_image() {
            return Ok(());
        }
        tracing::info!(file = %self.file_name, content_type = ?self.content_type, "non-image upload rejected");
        Err(Error::BadRequest(format!(
            "{} is not an image (png, jpg, gif or webp expected)",
            self.file_name
        )))
    }
}

/// Text fields and file parts of a multipart body, collected up front so handlers can
/// validate everything before touching the database or the disk.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// File parts larger than the storage cap abort the read with a 400.
    pub async fn read(mut multipart: Multipart, storage: &FileStorage) -> Result<Self> {
        let mut form = Self::default();

        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name.is_empty() {
                continue;
            }

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let mut buf = BytesMut::new();
                    while let Some(chunk) = field.chunk().await? {
                        if buf.len() + chunk.len() > storage.max_bytes() {
                            tracing::info!(field = %name, "upload rejected: over size cap");
                            return Err(storage.too_large());
                        }
                        buf.extend_from_slice(&chunk);
                    }
                    // browsers send an empty part when no file was picked
                    if buf.is_empty() && file_name.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            data: buf.freeze(),
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn raw(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub fn int(&self, name: &str) -> Result<Option<i32>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i32>()
                .map(Some)
                .map_err(|_| Error::BadRequest(format!("{} must be a number", name))),
        }
    }

    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => parse_date(&raw)
                .map(Some)
                .ok_or_else(|| Error::BadRequest(format!("{} is not a valid date", name))),
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// First present file among `names`, which must be an image.
    pub fn take_image(&mut self, names: &[&str]) -> Result<Option<UploadedFile>> {
        let Some(file) = names.iter().find_map(|name| self.files.remove(*name)) else {
            return Ok(None);
        };
        file.ensure_image()?;
        Ok(Some(file))
    }

    #[cfg(test)]
    pub(crate) fn with_fields(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}
