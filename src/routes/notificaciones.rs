use axum::{extract::State, response::IntoResponse, Extension, Json};

use crate::{
    dto::notificacion_dto::{MarcarLeidasPayload, MarcarLeidasResponse},
    error::{Error, Result},
    middleware::auth::Session,
    services::notification_service::NotificationScope,
    utils::validation::dedup_ids,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notificaciones",
    responses(
        (status = 200, description = "Notifications visible to the caller")
    )
)]
#[axum::debug_handler]
pub async fn list_notificaciones(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let scope = NotificationScope::for_session(&session);
    let response = state.notification_service.list(scope).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/notificaciones/leer",
    responses(
        (status = 200, description = "Notifications marked as read"),
        (status = 400, description = "Empty id list")
    )
)]
#[axum::debug_handler]
pub async fn marcar_leidas(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<MarcarLeidasPayload>,
) -> Result<impl IntoResponse> {
    let ids = dedup_ids(&payload.ids_notificaciones);
    if ids.is_empty() {
        return Err(Error::BadRequest(
            "idsNotificaciones must not be empty".to_string(),
        ));
    }

    let scope = NotificationScope::for_session(&session);
    let actualizadas = state.notification_service.mark_read(scope, &ids).await?;
    Ok(Json(MarcarLeidasResponse {
        message: "Notifications marked as read".to_string(),
        actualizadas,
    }))
}
