use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Docente {
    pub id_docente: i32,
    pub usuario: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub nombres: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub correo: String,
    pub ciudad_radicacion: Option<String>,
    pub id_pais: Option<i32>,
    pub id_profesion: Option<i32>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub numero_referencia: Option<String>,
    pub numero_documento: Option<String>,
    pub genero: Option<String>,
    pub direccion: Option<String>,
    pub fotografia: Option<String>,
    pub estado: String,
    pub id_rol: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of a candidate's application history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostulacionDocente {
    pub id_convocatoria: i32,
    pub titulo: String,
    pub estado: String,
    pub fecha_postulacion: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoDocente {
    Postulante,
    Aprobado,
    Rechazado,
}

impl EstadoDocente {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoDocente::Postulante => "postulante",
            EstadoDocente::Aprobado => "aprobado",
            EstadoDocente::Rechazado => "rechazado",
        }
    }
}

impl fmt::Display for EstadoDocente {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoDocente {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postulante" => Ok(EstadoDocente::Postulante),
            "aprobado" => Ok(EstadoDocente::Aprobado),
            "rechazado" => Ok(EstadoDocente::Rechazado),
            other => Err(format!("Invalid candidate status: {}", other)),
        }
    }
}

/// Role ids as stored in `roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Reviewer,
    Candidate,
    Other(i32),
}

impl Role {
    pub const ADMIN_ID: i32 = 1;
    pub const REVIEWER_ID: i32 = 2;
    pub const CANDIDATE_ID: i32 = 4;

    pub fn from_id(id: i32) -> Self {
        match id {
            Self::ADMIN_ID => Role::Admin,
            Self::REVIEWER_ID => Role::Reviewer,
            Self::CANDIDATE_ID => Role::Candidate,
            other => Role::Other(other),
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Role::Admin => Self::ADMIN_ID,
            Role::Reviewer => Self::REVIEWER_ID,
            Role::Candidate => Self::CANDIDATE_ID,
            Role::Other(id) => *id,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Reviewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estado_parses_case_insensitively() {
        assert_eq!("Aprobado".parse::<EstadoDocente>(), Ok(EstadoDocente::Aprobado));
        assert_eq!(" rechazado ".parse::<EstadoDocente>(), Ok(EstadoDocente::Rechazado));
        assert!("eliminado".parse::<EstadoDocente>().is_err());
    }

    #[test]
    fn role_ids_round_trip() {
        for id in [1, 2, 4, 7] {
            assert_eq!(Role::from_id(id).id(), id);
        }
        assert!(Role::from_id(2).is_staff());
        assert!(!Role::from_id(4).is_staff());
        assert!(!Role::from_id(7).is_staff());
    }

    #[test]
    fn password_hash_never_serialized() {
        let now = Utc::now();
        let docente = Docente {
            id_docente: 1,
            usuario: "ana".into(),
            password_hash: "$argon2id$secret".into(),
            nombres: "Ana".into(),
            apellido_paterno: "Paredes".into(),
            apellido_materno: None,
            correo: "ana@example.com".into(),
            ciudad_radicacion: None,
            id_pais: None,
            id_profesion: None,
            telefono: None,
            fecha_nacimiento: None,
            numero_referencia: None,
            numero_documento: None,
            genero: None,
            direccion: None,
            fotografia: None,
            estado: "postulante".into(),
            id_rol: 4,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&docente).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["apellidoPaterno"], "Paredes");
    }
}
