use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::area::{AreaAsignada, AreaOption, SectorAsignado, SectorOption};
use crate::utils::validation::dedup_ids;

/// First-time preference submission from the area-selection step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertarAreasPayload {
    pub id_docente: Option<i32>,
    #[serde(default)]
    pub id_areas_interes: Vec<i32>,
    #[serde(default)]
    pub id_sectores: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestionAreasPayload {
    pub id_docente: Option<i32>,
    #[serde(rename = "areasAAñadir", default)]
    pub areas_a_anadir: Vec<i32>,
    #[serde(rename = "sectoresAAñadir", default)]
    pub sectores_a_anadir: Vec<i32>,
    #[serde(default)]
    pub areas_a_eliminar: Vec<i32>,
    #[serde(default)]
    pub sectores_a_eliminar: Vec<i32>,
}

/// Normalized add/remove lists for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaChangeSet {
    pub add_areas: Vec<i32>,
    pub add_sectores: Vec<i32>,
    pub remove_areas: Vec<i32>,
    pub remove_sectores: Vec<i32>,
}

impl AreaChangeSet {
    pub fn new(
        add_areas: &[i32],
        add_sectores: &[i32],
        remove_areas: &[i32],
        remove_sectores: &[i32],
    ) -> Result<Self> {
        let changes = Self {
            add_areas: dedup_ids(add_areas),
            add_sectores: dedup_ids(add_sectores),
            remove_areas: dedup_ids(remove_areas),
            remove_sectores: dedup_ids(remove_sectores),
        };
        if let Some(id) = first_overlap(&changes.add_areas, &changes.remove_areas) {
            return Err(Error::BadRequest(format!(
                "Area {} cannot be added and removed in the same request",
                id
            )));
        }
        if let Some(id) = first_overlap(&changes.add_sectores, &changes.remove_sectores) {
            return Err(Error::BadRequest(format!(
                "Sector {} cannot be added and removed in the same request",
                id
            )));
        }
        Ok(changes)
    }

    pub fn additions_only(add_areas: &[i32], add_sectores: &[i32]) -> Self {
        Self {
            add_areas: dedup_ids(add_areas),
            add_sectores: dedup_ids(add_sectores),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add_areas.is_empty()
            && self.add_sectores.is_empty()
            && self.remove_areas.is_empty()
            && self.remove_sectores.is_empty()
    }
}

impl TryFrom<&GestionAreasPayload> for AreaChangeSet {
    type Error = Error;

    fn try_from(payload: &GestionAreasPayload) -> Result<Self> {
        Self::new(
            &payload.areas_a_anadir,
            &payload.sectores_a_anadir,
            &payload.areas_a_eliminar,
            &payload.sectores_a_eliminar,
        )
    }
}

fn first_overlap(a: &[i32], b: &[i32]) -> Option<i32> {
    a.iter().copied().find(|id| b.contains(id))
}

/// Rows actually changed by one assignment transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaChangeCounts {
    pub areas_added: u64,
    pub sectores_added: u64,
    pub areas_removed: u64,
    pub sectores_removed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreasActuales {
    pub areas: Vec<AreaAsignada>,
    pub sectores: Vec<SectorAsignado>,
}

impl AreasActuales {
    pub fn area_ids(&self) -> Vec<i32> {
        self.areas.iter().map(|a| a.id_area).collect()
    }

    pub fn sector_ids(&self) -> Vec<i32> {
        self.sectores.iter().map(|s| s.id_sector).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestionAreasResponse {
    pub success: bool,
    /// Ids only; names come from `GET /api/docentes/:id/areas`.
    pub areas_actualizadas: Vec<i32>,
    pub sectores_actualizados: Vec<i32>,
    #[serde(rename = "areasAAñadidas")]
    pub areas_anadidas: u64,
    #[serde(rename = "sectoresAAñadidos")]
    pub sectores_anadidos: u64,
    pub areas_eliminadas: u64,
    pub sectores_eliminados: u64,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertarAreasResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub areas: u64,
    pub sectores: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreasSectoresCatalogo {
    pub areas: Vec<AreaOption>,
    pub sectores: Vec<SectorOption>,
}
