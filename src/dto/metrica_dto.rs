use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::metrica::Cotejo;

fn validate_tipo_evaluacion(tipo: &str) -> Result<(), ValidationError> {
    if matches!(tipo, "Tutor" | "Docente") {
        return Ok(());
    }
    let mut err = ValidationError::new("tipo_evaluacion");
    err.message = Some(Cow::Borrowed("tipoEvaluacion must be 'Tutor' or 'Docente'"));
    Err(err)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterioCotejo {
    pub id_criterio: i32,
    pub cotejo: Cotejo,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuardarMetricaPayload {
    #[validate(required)]
    pub id_docente: Option<i32>,
    #[validate(custom(function = "validate_tipo_evaluacion"))]
    pub tipo_evaluacion: Option<String>,
    #[validate(length(max = 4000))]
    pub observaciones: Option<String>,
    #[validate(length(max = 4000))]
    pub recomendaciones: Option<String>,
    #[serde(default)]
    pub criterios: Vec<CriterioCotejo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditarMetricaPayload {
    #[validate(custom(function = "validate_tipo_evaluacion"))]
    pub tipo_evaluacion: Option<String>,
    #[validate(length(max = 4000))]
    pub observaciones: Option<String>,
    #[validate(length(max = 4000))]
    pub recomendaciones: Option<String>,
    #[serde(default)]
    pub criterios: Vec<CriterioCotejo>,
}

impl From<GuardarMetricaPayload> for EditarMetricaPayload {
    fn from(p: GuardarMetricaPayload) -> Self {
        Self {
            tipo_evaluacion: p.tipo_evaluacion,
            observaciones: p.observaciones,
            recomendaciones: p.recomendaciones,
            criterios: p.criterios,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricaGuardadaResponse {
    pub message: String,
    pub id_metricas: i32,
    pub creada: bool,
}
