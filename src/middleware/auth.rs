use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::docente::Role;
use crate::utils::token::SessionClaims;
use crate::AppState;

/// Decoded bearer token, placed in request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct Session {
    pub id_docente: i32,
    pub nombre: String,
    pub apellido_paterno: String,
    pub role: Role,
    pub id_area: Option<i32>,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id_docente: claims.id_docente,
            nombre: claims.nombre,
            apellido_paterno: claims.apellido_paterno,
            role: Role::from_id(claims.id_rol),
            id_area: claims.id_area,
        }
    }
}

impl Session {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Staff may act on any candidate, candidates only on themselves.
    pub fn ensure_can_act_on(&self, id_docente: i32) -> Result<()> {
        if self.is_staff() || self.id_docente == id_docente {
            return Ok(());
        }
        Err(Error::Forbidden(
            "You can only manage your own profile".to_string(),
        ))
    }

    pub fn ensure_staff(&self) -> Result<()> {
        if self.is_staff() {
            return Ok(());
        }
        Err(Error::Forbidden("Reviewer or administrator role required".to_string()))
    }
}

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

pub fn bearer_token(headers: &HeaderMap) -> std::result::Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("missing_authorization")?;
    let value = value.to_str().map_err(|_| "bad_authorization")?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or("unsupported_scheme")
}

fn decode_session(state: &AppState, headers: &HeaderMap) -> std::result::Result<Session, Response> {
    let token = bearer_token(headers).map_err(|code| reject(StatusCode::UNAUTHORIZED, code))?;
    match state.tokens.verify(token) {
        Ok(claims) => Ok(Session::from(claims)),
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            Err(reject(StatusCode::UNAUTHORIZED, "invalid_token"))
        }
    }
}

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match decode_session(&state, req.headers()) {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

pub async fn require_staff(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match decode_session(&state, req.headers()) {
        Ok(session) if session.is_staff() => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Ok(session) => {
            tracing::warn!(id_docente = session.id_docente, "staff route denied");
            reject(StatusCode::FORBIDDEN, "forbidden")
        }
        Err(resp) => resp,
    }
}
