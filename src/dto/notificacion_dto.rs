use serde::{Deserialize, Serialize};

use crate::models::notificacion::Notificacion;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificacionesResponse {
    pub notificaciones: Vec<Notificacion>,
    /// Unread rows in the caller's scope; drives the badge.
    pub total_notificaciones: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarcarLeidasPayload {
    #[serde(default)]
    pub ids_notificaciones: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarcarLeidasResponse {
    pub message: String,
    pub actualizadas: u64,
}
