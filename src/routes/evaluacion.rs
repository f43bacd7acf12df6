use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::{
    dto::metrica_dto::{EditarMetricaPayload, GuardarMetricaPayload, MetricaGuardadaResponse},
    error::{Error, Result},
    middleware::auth::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/evaluacion/{id_docente}",
    params(
        ("id_docente" = i32, Path, description = "Docente ID")
    ),
    responses(
        (status = 200, description = "Evaluation detail"),
        (status = 404, description = "No evaluation recorded")
    )
)]
#[axum::debug_handler]
pub async fn get_evaluacion(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id_docente): Path<i32>,
) -> Result<impl IntoResponse> {
    session.ensure_can_act_on(id_docente)?;
    let detalle = state
        .metrica_service
        .detalle(id_docente)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("No evaluation recorded for docente {}", id_docente))
        })?;
    Ok(Json(detalle))
}

/// Creates the evaluation or overwrites the existing one; 201 only on creation.
#[utoipa::path(
    post,
    path = "/api/evaluacion",
    responses(
        (status = 201, description = "Evaluation created"),
        (status = 200, description = "Evaluation overwritten"),
        (status = 400, description = "Invalid scores"),
        (status = 404, description = "Docente not found")
    )
)]
#[axum::debug_handler]
pub async fn guardar_evaluacion(
    State(state): State<AppState>,
    Json(payload): Json<GuardarMetricaPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let id_docente = payload
        .id_docente
        .ok_or_else(|| Error::BadRequest("idDocente is required".to_string()))?;
    state.docente_service.get(id_docente).await?;

    let (id_metricas, creada) = state
        .metrica_service
        .guardar(id_docente, EditarMetricaPayload::from(payload))
        .await?;
    let status = if creada {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(MetricaGuardadaResponse {
            message: "Evaluation saved".to_string(),
            id_metricas,
            creada,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/evaluacion/{id_docente}",
    params(
        ("id_docente" = i32, Path, description = "Docente ID")
    ),
    responses(
        (status = 200, description = "Evaluation updated"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "No evaluation recorded")
    )
)]
#[axum::debug_handler]
pub async fn editar_evaluacion(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id_docente): Path<i32>,
    Json(payload): Json<EditarMetricaPayload>,
) -> Result<impl IntoResponse> {
    session.ensure_staff()?;
    payload.validate()?;

    let id_metricas = state.metrica_service.editar(id_docente, payload).await?;
    Ok(Json(MetricaGuardadaResponse {
        message: "Evaluation updated".to_string(),
        id_metricas,
        creada: false,
    }))
}
