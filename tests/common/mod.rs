//! Request builders and app wiring shared by the API tests.
#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use docentes_backend::{
    build_router,
    config::Config,
    utils::token::{TokenKeys, TokenSubject},
    AppState,
};
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key";
pub const BOUNDARY: &str = "docentes-test-boundary";

pub fn test_config(database_url: &str, public_dir: PathBuf) -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: database_url.into(),
        jwt_secret: SECRET.into(),
        jwt_ttl_minutes: 5,
        public_base_url: "http://localhost:4321".into(),
        public_dir,
        max_upload_bytes: 1024,
        db_max_connections: 1,
        api_rps: 1000,
        cors_origin: None,
        log_json: false,
    }
}

/// Router over a pool that is never connected; any query fails.
pub fn offline_app(public_dir: PathBuf) -> Router {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://nobody@127.0.0.1:1/unused")
        .expect("lazy pool");
    app_with_pool(pool, public_dir)
}

pub fn app_with_pool(pool: PgPool, public_dir: PathBuf) -> Router {
    let config = test_config("postgres://unused", public_dir);
    build_router(AppState::new(pool, config).expect("state"))
}

pub fn token(id_docente: i32, id_rol: i32) -> String {
    TokenKeys::new(SECRET, 5)
        .issue(TokenSubject {
            id_docente,
            nombre: "Ana".into(),
            apellido_paterno: "Paredes".into(),
            id_rol,
            id_area: None,
        })
        .expect("token")
}

pub fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: JsonValue) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// Field name, file name, content type, bytes.
    File(&'a str, &'a str, &'a str, Vec<u8>),
}

pub fn multipart_request(
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    parts: Vec<Part<'_>>,
) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, content_type, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}
