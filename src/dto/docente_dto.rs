use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::upload::MultipartForm;
use crate::error::Result;
use crate::models::area::{AreaAsignada, SectorAsignado};
use crate::models::docente::{Docente, PostulacionDocente};
use crate::models::metrica::MetricaDetalle;
use crate::utils::validation::{validate_not_blank, validate_password};

pub const CANDIDATE_HOME: &str = "/dashboardDoc";
pub const STAFF_HOME: &str = "/dashboard";

/// Registration fields as posted by the sign-up form.
#[derive(Debug, Clone, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 50), custom(function = "validate_not_blank"))]
    pub usuario: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub nombres: String,
    #[validate(length(min = 1, max = 100))]
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    #[validate(email)]
    pub correo: String,
    #[validate(length(min = 1))]
    pub ciudad_radicacion: String,
    #[validate(required)]
    pub id_pais: Option<i32>,
    #[validate(required)]
    pub id_profesion: Option<i32>,
    #[validate(length(min = 5, max = 20))]
    pub telefono: String,
    #[validate(required)]
    pub fecha_nacimiento: Option<NaiveDate>,
}

impl RegisterForm {
    pub fn from_form(form: &MultipartForm) -> Result<Self> {
        Ok(Self {
            usuario: form.text("usuario").unwrap_or_default(),
            // passwords are taken verbatim
            password: form.raw("password").unwrap_or_default(),
            nombres: form.text("nombres").unwrap_or_default(),
            apellido_paterno: form.text("apellidoPaterno").unwrap_or_default(),
            apellido_materno: form.text("apellidoMaterno"),
            correo: form.text("correo").unwrap_or_default().to_lowercase(),
            ciudad_radicacion: form.text("ciudadRadicacion").unwrap_or_default(),
            id_pais: form.int("idPais")?,
            id_profesion: form.int("idProfesion")?,
            telefono: form.text("telefono").unwrap_or_default(),
            fecha_nacimiento: form.date("fechaNacimiento")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub token: String,
    pub id_docente: i32,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1))]
    pub usuario: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub id_docente: i32,
    pub id_rol: i32,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocenteListQuery {
    pub search: Option<String>,
    pub estado: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Self-service profile edit; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Validate)]
pub struct DocentePatch {
    #[validate(length(min = 1, max = 100))]
    pub nombres: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub apellido_paterno: Option<String>,
    /// `Some(None)` clears the column; the field was sent blank.
    pub apellido_materno: Option<Option<String>>,
    #[validate(email)]
    pub correo: Option<String>,
    pub ciudad_radicacion: Option<String>,
    pub id_pais: Option<i32>,
    pub id_profesion: Option<i32>,
    #[validate(length(min = 5, max = 20))]
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub numero_referencia: Option<String>,
    pub numero_documento: Option<String>,
    pub genero: Option<String>,
    pub direccion: Option<String>,
}

impl DocentePatch {
    pub fn from_form(form: &MultipartForm) -> Result<Self> {
        Ok(Self {
            nombres: form.text("nombres"),
            apellido_paterno: form.text("apellidoPaterno"),
            apellido_materno: form
                .raw("apellidoMaterno")
                .map(|_| form.text("apellidoMaterno")),
            correo: form.text("correo").map(|c| c.to_lowercase()),
            ciudad_radicacion: form.text("ciudadRadicacion"),
            id_pais: form.int("idPais")?,
            id_profesion: form.int("idProfesion")?,
            telefono: form.text("telefono"),
            fecha_nacimiento: form.date("fechaNacimiento")?,
            numero_referencia: form.text("numeroReferencia"),
            numero_documento: form.text("numeroDocumento"),
            genero: form.text("genero"),
            direccion: form.text("direccion"),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEstadoPayload {
    #[validate(length(min = 1))]
    pub estado: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocentePerfil {
    #[serde(flatten)]
    pub docente: Docente,
    pub areas: Vec<AreaAsignada>,
    pub sectores: Vec<SectorAsignado>,
    pub evaluacion: Option<MetricaDetalle>,
    pub postulaciones: Vec<PostulacionDocente>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            usuario: "ana.paredes".into(),
            password: "abcd1234".into(),
            nombres: "Ana".into(),
            apellido_paterno: "Paredes".into(),
            apellido_materno: None,
            correo: "ana@example.com".into(),
            ciudad_radicacion: "Quito".into(),
            id_pais: Some(1),
            id_profesion: Some(2),
            telefono: "0999999999".into(),
            fecha_nacimiento: NaiveDate::from_ymd_opt(1990, 1, 1),
        }
    }

    #[test]
    fn register_form_password_rule() {
        assert!(valid_form().validate().is_ok());

        let mut weak = valid_form();
        weak.password = "abc123".into();
        let errors = weak.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn register_form_requires_catalog_ids() {
        let mut form = valid_form();
        form.id_pais = None;
        form.correo = "not-an-email".into();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("id_pais"));
        assert!(fields.contains_key("correo"));
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(DocentePatch::default().validate().is_ok());
    }

    #[test]
    fn blank_second_surname_clears_it() {
        let form = MultipartForm::with_fields(&[("apellidoMaterno", "  ")]);
        assert_eq!(DocentePatch::from_form(&form).unwrap().apellido_materno, Some(None));

        let form = MultipartForm::with_fields(&[("apellidoMaterno", "Rojas")]);
        assert_eq!(
            DocentePatch::from_form(&form).unwrap().apellido_materno,
            Some(Some("Rojas".to_string()))
        );

        let form = MultipartForm::with_fields(&[("nombres", "Ana")]);
        let patch = DocentePatch::from_form(&form).unwrap();
        assert_eq!(patch.apellido_materno, None);
        assert_eq!(patch.nombres.as_deref(), Some("Ana"));
    }
}
