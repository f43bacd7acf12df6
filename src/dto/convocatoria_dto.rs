use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::upload::MultipartForm;
use crate::error::{Error, Result};
use crate::models::convocatoria::{Convocatoria, EstadoConvocatoria};

fn validate_estado(estado: &str) -> std::result::Result<(), ValidationError> {
    if EstadoConvocatoria::parse(estado).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("estado");
    err.message = Some(Cow::Borrowed("estado must be 'abierta' or 'cerrada'"));
    Err(err)
}

/// The form sends `idAreaInteres`; `idArea` is accepted as well.
fn area_field(form: &MultipartForm) -> Result<Option<i32>> {
    match form.int("idAreaInteres")? {
        Some(id) => Ok(Some(id)),
        None => form.int("idArea"),
    }
}

fn check_dates(inicio: NaiveDate, fin: NaiveDate) -> Result<()> {
    if fin < inicio {
        return Err(Error::BadRequest(
            "fechaFinal must not be earlier than fechaInicio".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate)]
pub struct ConvocatoriaForm {
    #[validate(length(min = 1, max = 200))]
    pub titulo: String,
    #[validate(length(min = 1))]
    pub perfil: String,
    #[validate(length(min = 1))]
    pub requisitos: String,
    #[validate(required)]
    pub fecha_inicio: Option<NaiveDate>,
    #[validate(required)]
    pub fecha_final: Option<NaiveDate>,
    #[validate(required)]
    pub id_area: Option<i32>,
    #[validate(required)]
    pub id_sector: Option<i32>,
    #[validate(custom(function = "validate_estado"))]
    pub estado: Option<String>,
    #[validate(url)]
    pub formulario_externo: Option<String>,
}

impl ConvocatoriaForm {
    pub fn from_form(form: &MultipartForm) -> Result<Self> {
        Ok(Self {
            titulo: form.text("titulo").unwrap_or_default(),
            perfil: form.text("perfil").unwrap_or_default(),
            requisitos: form.text("requisitos").unwrap_or_default(),
            fecha_inicio: form.date("fechaInicio")?,
            fecha_final: form.date("fechaFinal")?,
            id_area: area_field(form)?,
            id_sector: form.int("idSector")?,
            estado: form.text("estado"),
            formulario_externo: form.text("formularioExterno"),
        })
    }

    /// Runs field validation plus the date ordering rule.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if let (Some(inicio), Some(fin)) = (self.fecha_inicio, self.fecha_final) {
            check_dates(inicio, fin)?;
        }
        Ok(())
    }

    pub fn estado(&self) -> EstadoConvocatoria {
        self.estado
            .as_deref()
            .and_then(EstadoConvocatoria::parse)
            .unwrap_or(EstadoConvocatoria::Abierta)
    }
}

/// Sparse update. After [`ConvocatoriaPatch::diff`] only the fields whose value differs
/// from the stored row remain set.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ConvocatoriaPatch {
    #[validate(length(min = 1, max = 200))]
    pub titulo: Option<String>,
    #[validate(length(min = 1))]
    pub perfil: Option<String>,
    #[validate(length(min = 1))]
    pub requisitos: Option<String>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_final: Option<NaiveDate>,
    #[validate(custom(function = "validate_estado"))]
    pub estado: Option<String>,
    pub id_area: Option<i32>,
    pub id_sector: Option<i32>,
    #[validate(url)]
    pub formulario_externo: Option<String>,
}

fn changed<T: PartialEq + Clone>(submitted: &Option<T>, stored: &T) -> Option<T> {
    submitted.as_ref().filter(|v| *v != stored).cloned()
}

impl ConvocatoriaPatch {
    pub fn from_form(form: &MultipartForm) -> Result<Self> {
        Ok(Self {
            titulo: form.text("titulo"),
            perfil: form.text("perfil"),
            requisitos: form.text("requisitos"),
            fecha_inicio: form.date("fechaInicio")?,
            fecha_final: form.date("fechaFinal")?,
            estado: form.text("estado").map(|e| e.to_lowercase()),
            id_area: area_field(form)?,
            id_sector: form.int("idSector")?,
            formulario_externo: form.text("formularioExterno"),
        })
    }

    pub fn diff(&self, current: &Convocatoria) -> Self {
        Self {
            titulo: changed(&self.titulo, &current.titulo),
            perfil: changed(&self.perfil, &current.perfil),
            requisitos: changed(&self.requisitos, &current.requisitos),
            fecha_inicio: changed(&self.fecha_inicio, &current.fecha_inicio),
            fecha_final: changed(&self.fecha_final, &current.fecha_final),
            estado: changed(&self.estado, &current.estado),
            id_area: changed(&self.id_area, &current.id_area),
            id_sector: changed(&self.id_sector, &current.id_sector),
            formulario_externo: self
                .formulario_externo
                .as_ref()
                .filter(|v| current.formulario_externo.as_ref() != Some(*v))
                .cloned(),
        }
    }

    /// Validates fields and the date range that would result from applying the patch.
    pub fn check_against(&self, current: &Convocatoria) -> Result<()> {
        self.validate()?;
        check_dates(
            self.fecha_inicio.unwrap_or(current.fecha_inicio),
            self.fecha_final.unwrap_or(current.fecha_final),
        )
    }

    /// Set on a diffed patch only when the title moved, which is what regenerates the link.
    pub fn changed_title(&self) -> Option<&str> {
        self.titulo.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvocatoriaListQuery {
    pub estado: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstadoConvocatoriaPayload {
    #[validate(custom(function = "validate_estado"))]
    pub estado: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostulacionResponse {
    pub message: String,
    pub id_convocatoria: i32,
    pub id_docente: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored() -> Convocatoria {
        let now = Utc::now();
        Convocatoria {
            id_convocatoria: 7,
            titulo: "Docente de Matematicas".into(),
            perfil: "Magister".into(),
            link: "http://localhost:4321/convocatorias/Docente%20de%20Matematicas".into(),
            requisitos: "CV".into(),
            fecha_inicio: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            fecha_final: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            estado: "abierta".into(),
            id_area: 1,
            id_sector: 2,
            imagen_portada: None,
            formulario_externo: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn resubmitting_stored_values_yields_empty_patch() {
        let current = stored();
        let patch = ConvocatoriaPatch {
            titulo: Some(current.titulo.clone()),
            perfil: Some(current.perfil.clone()),
            estado: Some("abierta".into()),
            id_area: Some(1),
            ..Default::default()
        };
        let diff = patch.diff(&current);
        assert!(diff.is_empty());
        assert_eq!(diff.changed_title(), None);
    }

    #[test]
    fn only_changed_fields_survive_diff() {
        let current = stored();
        let patch = ConvocatoriaPatch {
            titulo: Some("Docente de Fisica".into()),
            perfil: Some(current.perfil.clone()),
            id_sector: Some(3),
            formulario_externo: Some("https://forms.example.com/x".into()),
            ..Default::default()
        };
        let diff = patch.diff(&current);
        assert_eq!(diff.changed_title(), Some("Docente de Fisica"));
        assert_eq!(diff.perfil, None);
        assert_eq!(diff.id_sector, Some(3));
        assert_eq!(diff.formulario_externo.as_deref(), Some("https://forms.example.com/x"));
    }

    #[test]
    fn patch_dates_are_checked_against_stored_range() {
        let current = stored();
        let patch = ConvocatoriaPatch {
            fecha_final: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..Default::default()
        };
        assert!(matches!(patch.check_against(&current), Err(Error::BadRequest(_))));

        let patch = ConvocatoriaPatch {
            estado: Some("pausada".into()),
            ..Default::default()
        };
        assert!(matches!(patch.check_against(&current), Err(Error::Validation(_))));
    }

    #[test]
    fn area_is_read_from_either_field_name() {
        let form = MultipartForm::with_fields(&[("idAreaInteres", "4"), ("idSector", "2")]);
        let parsed = ConvocatoriaForm::from_form(&form).unwrap();
        assert_eq!(parsed.id_area, Some(4));
        assert_eq!(parsed.id_sector, Some(2));

        let form = MultipartForm::with_fields(&[("idArea", "5")]);
        assert_eq!(ConvocatoriaPatch::from_form(&form).unwrap().id_area, Some(5));

        let form = MultipartForm::with_fields(&[("idAreaInteres", "4"), ("idArea", "5")]);
        assert_eq!(ConvocatoriaPatch::from_form(&form).unwrap().id_area, Some(4));

        let form = MultipartForm::with_fields(&[("idAreaInteres", "cuatro")]);
        assert!(matches!(ConvocatoriaForm::from_form(&form), Err(Error::BadRequest(_))));
    }

    #[test]
    fn create_form_rejects_inverted_dates() {
        let form = ConvocatoriaForm {
            titulo: "Tutor virtual".into(),
            perfil: "Licenciado".into(),
            requisitos: "Titulo".into(),
            fecha_inicio: NaiveDate::from_ymd_opt(2025, 5, 1),
            fecha_final: NaiveDate::from_ymd_opt(2025, 4, 1),
            id_area: Some(1),
            id_sector: Some(1),
            estado: None,
            formulario_externo: None,
        };
        assert!(matches!(form.check(), Err(Error::BadRequest(_))));
        assert_eq!(form.estado(), EstadoConvocatoria::Abierta);
    }
}
