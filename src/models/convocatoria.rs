use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Convocatoria {
    pub id_convocatoria: i32,
    pub titulo: String,
    pub perfil: String,
    pub link: String,
    pub requisitos: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_final: NaiveDate,
    pub estado: String,
    pub id_area: i32,
    pub id_sector: i32,
    pub imagen_portada: Option<String>,
    pub formulario_externo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Convocatoria {
    pub fn is_open(&self) -> bool {
        self.estado == EstadoConvocatoria::Abierta.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Postulante {
    #[serde(skip)]
    pub id_convocatoria: i32,
    pub id_docente: i32,
    pub nombres: String,
    pub apellido_paterno: String,
    pub correo: String,
    pub estado: String,
    pub fecha_postulacion: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvocatoriaConPostulantes {
    #[serde(flatten)]
    pub convocatoria: Convocatoria,
    pub postulantes: Vec<Postulante>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoConvocatoria {
    Abierta,
    Cerrada,
}

impl EstadoConvocatoria {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoConvocatoria::Abierta => "abierta",
            EstadoConvocatoria::Cerrada => "cerrada",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "abierta" => Some(EstadoConvocatoria::Abierta),
            "cerrada" => Some(EstadoConvocatoria::Cerrada),
            _ => None,
        }
    }
}
