//! Local storage for uploaded images and candidate documents.
//!
//! Files live under the configured public directory and are referenced by their public path
//! (`/images/<entity>/<ts>-<name>` or `/subidasDocente/<name>_<id>/<ts>-<name>`), which is
//! what gets stored in the database and served by the static file router.

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::dto::upload::UploadedFile;
use crate::error::{Error, Result};

pub const IMAGES_PREFIX: &str = "images";
pub const DOCENTE_FILES_PREFIX: &str = "subidasDocente";

#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Rejects empty uploads and anything above the configured cap.
    pub fn check_size(&self, len: usize) -> Result<()> {
        if len == 0 {
            return Err(Error::BadRequest("Uploaded file is empty".to_string()));
        }
        if len > self.max_bytes {
            return Err(self.too_large());
        }
        Ok(())
    }

    pub fn too_large(&self) -> Error {
        Error::BadRequest(format!(
            "File exceeds the maximum size of {} MB",
            self.max_bytes as f64 / (1024.0 * 1024.0)
        ))
    }

    /// Non-image uploads are refused before anything touches the disk.
    pub async fn save_image(&self, entity: &str, file: &UploadedFile) -> Result<String> {
        file.ensure_image()?;
        let dir = sanitize_segment(entity);
        self.write(&[IMAGES_PREFIX, &dir], &file.file_name, &file.data).await
    }

    pub async fn save_docente_file(
        &self,
        nombre: &str,
        id_docente: i32,
        original_name: &str,
        data: &[u8],
    ) -> Result<String> {
        let dir = format!("{}_{}", sanitize_segment(nombre), id_docente);
        self.write(&[DOCENTE_FILES_PREFIX, &dir], original_name, data).await
    }

    async fn write(&self, dirs: &[&str], original_name: &str, data: &[u8]) -> Result<String> {
        self.check_size(data.len())?;

        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        let mut disk_dir = self.root.clone();
        for dir in dirs {
            disk_dir.push(dir);
        }
        fs::create_dir_all(&disk_dir).await.map_err(|e| {
            tracing::error!(error = %e, dir = %disk_dir.display(), "failed to create upload directory");
            Error::Io(e)
        })?;

        let disk_path = disk_dir.join(&file_name);
        fs::write(&disk_path, data).await.map_err(|e| {
            tracing::error!(error = %e, path = %disk_path.display(), "failed to write upload");
            Error::Io(e)
        })?;

        Ok(format!("/{}/{}", dirs.join("/"), file_name))
    }

    /// Maps a stored public path back to disk; `None` for anything outside the upload tree.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = Path::new(public_path.trim_start_matches('/'));
        let mut components = relative.components();
        match components.next() {
            Some(Component::Normal(first))
                if first == IMAGES_PREFIX || first == DOCENTE_FILES_PREFIX => {}
            _ => return None,
        }
        if !components.all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Best-effort delete; a missing file is not an error.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            tracing::warn!(path = public_path, "refusing to remove file outside upload tree");
            return;
        };
        match fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %path.display(), "removed stored file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(error = %e, path = %path.display(), "failed to remove stored file"),
        }
    }
}

/// Keeps only the final path component, with characters safe for URLs and file systems.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = clean_chars(base);
    if cleaned.trim_matches(['.', '_']).is_empty() {
        "archivo".to_string()
    } else {
        cleaned
    }
}

fn sanitize_segment(raw: &str) -> String {
    let cleaned = clean_chars(raw);
    if cleaned.is_empty() {
        "sin_nombre".to_string()
    } else {
        cleaned
    }
}

fn clean_chars(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_flattened() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\título final.pdf"), "t_tulo_final.pdf");
        assert_eq!(sanitize_file_name("..."), "archivo");
    }

    #[test]
    fn resolve_stays_inside_upload_tree() {
        let storage = FileStorage::new("/srv/public", 10);
        assert_eq!(
            storage.resolve("/images/convocatorias/1-a.png"),
            Some(PathBuf::from("/srv/public/images/convocatorias/1-a.png"))
        );
        assert!(storage.resolve("/images/../../etc/passwd").is_none());
        assert!(storage.resolve("/etc/passwd").is_none());
        assert!(storage.resolve("").is_none());
    }

    #[test]
    fn size_limits() {
        let storage = FileStorage::new("/tmp", 4);
        assert!(storage.check_size(0).is_err());
        assert!(storage.check_size(4).is_ok());
        assert!(storage.check_size(5).is_err());
    }

    #[tokio::test]
    async fn saves_candidate_files_under_name_and_id() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), 1024);

        let public = storage
            .save_docente_file("Ana Paredes", 10, "titulo.pdf", b"%PDF-1.4")
            .await
            .unwrap();
        assert!(public.starts_with("/subidasDocente/Ana_Paredes_10/"));
        assert!(public.ends_with("-titulo.pdf"));

        let disk = storage.resolve(&public).unwrap();
        assert_eq!(std::fs::read(&disk).unwrap(), b"%PDF-1.4");

        storage.remove(&public).await;
        assert!(!disk.exists());
        // second removal is a no-op
        storage.remove(&public).await;
    }

    fn upload(name: &str, content_type: &str, data: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            data: bytes::Bytes::from_static(data),
        }
    }

    #[tokio::test]
    async fn oversized_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), 8);

        let err = storage
            .save_image("convocatorias", &upload("portada.png", "image/png", &[0u8; 9]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(!dir.path().join(IMAGES_PREFIX).exists());
    }

    #[tokio::test]
    async fn executable_is_not_stored_as_image() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), 1024);

        let err = storage
            .save_image("convocatorias", &upload("payload.exe", "application/x-msdownload", b"MZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(!dir.path().join(IMAGES_PREFIX).exists());

        let public = storage
            .save_image("convocatorias", &upload("portada.webp", "image/webp", b"RIFF"))
            .await
            .unwrap();
        assert!(public.starts_with("/images/convocatorias/"));
        assert!(storage.resolve(&public).unwrap().exists());
    }
}
