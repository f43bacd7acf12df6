use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notificacion {
    pub id_notificacion: i32,
    pub id_docente: i32,
    pub docente: Option<String>,
    pub convocatoria: Option<String>,
    pub link: Option<String>,
    pub tipo: Option<String>,
    pub fecha_notificacion: DateTime<Utc>,
    pub estado: String,
}

/// Rows of `tipo_notificaciones`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoNotificacion {
    Postulacion,
    Aprobado,
}

impl TipoNotificacion {
    pub fn id(&self) -> i32 {
        match self {
            TipoNotificacion::Postulacion => 1,
            TipoNotificacion::Aprobado => 2,
        }
    }

    pub fn descripcion(&self) -> &'static str {
        match self {
            TipoNotificacion::Postulacion => "postulacion",
            TipoNotificacion::Aprobado => "aprobado",
        }
    }
}

/// `cerrado` is the unread state, `abierto` the read one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoNotificacion {
    Cerrado,
    Abierto,
}

impl EstadoNotificacion {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoNotificacion::Cerrado => "cerrado",
            EstadoNotificacion::Abierto => "abierto",
        }
    }
}
