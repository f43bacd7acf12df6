use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    dto::area_dto::{
        AreaChangeSet, GestionAreasPayload, GestionAreasResponse, InsertarAreasPayload,
        InsertarAreasResponse,
    },
    error::{Error, Result},
    middleware::auth::Session,
    routes::auth::token_for,
    AppState,
};

fn require_docente_id(id: Option<i32>) -> Result<i32> {
    id.ok_or_else(|| Error::BadRequest("Missing idDocente".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/docentes/{id}/areas",
    params(
        ("id" = i32, Path, description = "Docente ID")
    ),
    responses(
        (status = 200, description = "Assigned areas and sectors"),
        (status = 403, description = "Another candidate's areas")
    )
)]
#[axum::debug_handler]
pub async fn current_areas(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id_docente): Path<i32>,
) -> Result<impl IntoResponse> {
    session.ensure_can_act_on(id_docente)?;
    let actuales = state.area_service.current(id_docente).await?;
    Ok(Json(actuales))
}

/// Initial selection after registration. The returned token carries the first chosen area,
/// which tells the UI the candidate has completed this step.
#[utoipa::path(
    post,
    path = "/api/docentes/areas",
    responses(
        (status = 200, description = "Initial areas saved, fresh token"),
        (status = 400, description = "Missing idDocente or empty selection"),
        (status = 404, description = "Docente not found")
    )
)]
#[axum::debug_handler]
pub async fn insertar_areas(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<InsertarAreasPayload>,
) -> Result<impl IntoResponse> {
    let id_docente = require_docente_id(payload.id_docente)?;
    session.ensure_can_act_on(id_docente)?;

    let changes = AreaChangeSet::additions_only(&payload.id_areas_interes, &payload.id_sectores);
    let Some(&first_area) = changes.add_areas.first() else {
        return Err(Error::BadRequest(
            "idAreasInteres must contain at least one area".to_string(),
        ));
    };

    let docente = state.docente_service.get(id_docente).await?;
    let (_, counts) = state.area_service.apply(id_docente, &changes).await?;
    let token = token_for(&state, &docente, Some(first_area))?;

    Ok(Json(InsertarAreasResponse {
        success: true,
        message: "Areas and sectors saved".to_string(),
        token,
        areas: counts.areas_added,
        sectores: counts.sectores_added,
    }))
}

#[utoipa::path(
    post,
    path = "/api/docentes/areas/gestion",
    responses(
        (status = 200, description = "Areas added and removed, fresh token"),
        (status = 400, description = "Overlapping lists or unknown ids"),
        (status = 404, description = "Docente not found")
    )
)]
#[axum::debug_handler]
pub async fn gestion_areas(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<GestionAreasPayload>,
) -> Result<impl IntoResponse> {
    let id_docente = require_docente_id(payload.id_docente)?;
    session.ensure_can_act_on(id_docente)?;
    let changes = AreaChangeSet::try_from(&payload)?;

    let docente = state.docente_service.get(id_docente).await?;
    let (actuales, counts) = state.area_service.apply(id_docente, &changes).await?;
    let id_area = actuales.areas.first().map(|a| a.id_area);
    let token = token_for(&state, &docente, id_area)?;

    Ok(Json(GestionAreasResponse {
        success: true,
        areas_actualizadas: actuales.area_ids(),
        sectores_actualizados: actuales.sector_ids(),
        areas_anadidas: counts.areas_added,
        sectores_anadidos: counts.sectores_added,
        areas_eliminadas: counts.areas_removed,
        sectores_eliminados: counts.sectores_removed,
        token,
    }))
}
