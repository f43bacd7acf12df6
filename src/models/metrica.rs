use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Metrica {
    pub id_metricas: i32,
    pub id_docente: i32,
    pub fecha: DateTime<Utc>,
    pub tipo_evaluacion: Option<String>,
    pub observaciones: Option<String>,
    pub recomendaciones: Option<String>,
}

/// Catalog row; the evaluation form reads these keys as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CriterioEvaluacion {
    pub id_criterio: i32,
    pub criterio: String,
    pub escala: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MetricaCriterio {
    pub id_criterio: i32,
    pub criterio: String,
    pub cotejo: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricaDetalle {
    #[serde(flatten)]
    pub metrica: Metrica,
    pub criterios: Vec<MetricaCriterio>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escala {
    Valoracion,
    Cumplimiento,
}

impl Escala {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "valoracion" => Some(Escala::Valoracion),
            "cumplimiento" => Some(Escala::Cumplimiento),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cotejo {
    Excelente,
    Bueno,
    Regular,
    Deficiente,
    Cumple,
    #[serde(rename = "No Cumple")]
    NoCumple,
}

impl Cotejo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cotejo::Excelente => "Excelente",
            Cotejo::Bueno => "Bueno",
            Cotejo::Regular => "Regular",
            Cotejo::Deficiente => "Deficiente",
            Cotejo::Cumple => "Cumple",
            Cotejo::NoCumple => "No Cumple",
        }
    }

    pub fn escala(&self) -> Escala {
        match self {
            Cotejo::Cumple | Cotejo::NoCumple => Escala::Cumplimiento,
            _ => Escala::Valoracion,
        }
    }
}
