use serde::{Deserialize, Serialize};

use crate::dto::upload::{MultipartForm, UploadedFile};
use crate::error::{Error, Result};

/// `docente_id`, `idtipo_archivo` and `archivo` are the upload form's field names.
#[derive(Debug, Clone)]
pub struct NuevoArchivo {
    pub id_docente: i32,
    pub id_tipo_archivo: i32,
    pub archivo: UploadedFile,
}

impl NuevoArchivo {
    pub fn from_form(form: &mut MultipartForm) -> Result<Self> {
        let id_docente = form
            .int("docente_id")?
            .ok_or_else(|| Error::BadRequest("docente_id is required".to_string()))?;
        let id_tipo_archivo = form
            .int("idtipo_archivo")?
            .ok_or_else(|| Error::BadRequest("idtipo_archivo is required".to_string()))?;
        let archivo = form
            .take_file("archivo")
            .ok_or_else(|| Error::BadRequest("archivo is required".to_string()))?;
        Ok(Self {
            id_docente,
            id_tipo_archivo,
            archivo,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ArchivoUpdate {
    pub id_tipo_archivo: Option<i32>,
    pub archivo: Option<UploadedFile>,
}

impl ArchivoUpdate {
    pub fn from_form(form: &mut MultipartForm) -> Result<Self> {
        let update = Self {
            id_tipo_archivo: form.int("idtipo_archivo")?,
            archivo: form.take_file("archivo"),
        };
        if update.id_tipo_archivo.is_none() && update.archivo.is_none() {
            return Err(Error::BadRequest(
                "Nothing to update: send idtipo_archivo or archivo".to_string(),
            ));
        }
        Ok(update)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
