use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Archivo {
    #[serde(rename = "idArchivo")]
    pub id_ad: i32,
    pub id_docente: i32,
    pub nombre_archivo: String,
    pub ruta_archivo: String,
    pub id_tipo_archivo: i32,
    pub tipo: Option<String>,
    pub created_at: DateTime<Utc>,
}
