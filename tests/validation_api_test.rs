//! Request handling that must settle before any database round-trip: authentication,
//! role checks, payload validation and upload size limits. The pool is lazy and points at
//! an unreachable server, so a test that touched it would fail.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{json_request, multipart_request, offline_app, send, token, Part};
use docentes_backend::models::docente::Role;
use serde_json::json;

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn session_routes_require_a_bearer_token() {
    let dir = tempfile::tempdir().unwrap();
    let req = Request::builder()
        .uri("/api/convocatorias")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_authorization");

    let req = Request::builder()
        .uri("/api/notificaciones")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn staff_routes_reject_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let candidate = token(7, Role::CANDIDATE_ID);

    let req = Request::builder()
        .uri("/api/docentes")
        .header(header::AUTHORIZATION, format!("Bearer {}", candidate))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = json_request(
        "PUT",
        "/api/evaluacion/7",
        Some(&candidate),
        json!({ "criterios": [] }),
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = multipart_request(
        "POST",
        "/api/convocatorias",
        Some(&candidate),
        vec![Part::Text("titulo", "Docente de Física")],
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn area_requests_without_docente_id_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let candidate = token(7, Role::CANDIDATE_ID);

    let req = json_request(
        "POST",
        "/api/docentes/areas",
        Some(&candidate),
        json!({ "idAreasInteres": [1, 2], "idSectores": [3] }),
    );
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing idDocente");

    let req = json_request(
        "POST",
        "/api/docentes/areas/gestion",
        Some(&candidate),
        json!({ "areasAAñadir": [1] }),
    );
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing idDocente");
}

#[tokio::test]
async fn candidates_cannot_manage_someone_elses_areas() {
    let dir = tempfile::tempdir().unwrap();
    let candidate = token(7, Role::CANDIDATE_ID);
    let req = json_request(
        "POST",
        "/api/docentes/areas/gestion",
        Some(&candidate),
        json!({ "idDocente": 8, "areasAAñadir": [1] }),
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn overlapping_add_and_remove_lists_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let candidate = token(7, Role::CANDIDATE_ID);
    let req = json_request(
        "POST",
        "/api/docentes/areas/gestion",
        Some(&candidate),
        json!({ "idDocente": 7, "areasAAñadir": [1, 2], "areasAEliminar": [2] }),
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_mark_read_list_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let candidate = token(7, Role::CANDIDATE_ID);
    let req = json_request(
        "PUT",
        "/api/notificaciones/leer",
        Some(&candidate),
        json!({ "idsNotificaciones": [] }),
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_rejects_weak_password() {
    let dir = tempfile::tempdir().unwrap();
    let req = multipart_request(
        "POST",
        "/api/auth/register",
        None,
        vec![
            Part::Text("usuario", "ana.paredes"),
            Part::Text("password", "abc"),
            Part::Text("nombres", "Ana"),
            Part::Text("apellidoPaterno", "Paredes"),
            Part::Text("correo", "ana@example.com"),
            Part::Text("ciudadRadicacion", "La Paz"),
            Part::Text("idPais", "1"),
            Part::Text("idProfesion", "1"),
            Part::Text("telefono", "70000000"),
            Part::Text("fechaNacimiento", "1990-05-01"),
        ],
    );
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("password"));
}

#[tokio::test]
async fn oversized_upload_is_rejected_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let candidate = token(7, Role::CANDIDATE_ID);
    let req = multipart_request(
        "POST",
        "/api/archivos",
        Some(&candidate),
        vec![
            Part::Text("docente_id", "7"),
            Part::Text("idtipo_archivo", "1"),
            Part::File("archivo", "titulo.pdf", "application/pdf", vec![b'x'; 4096]),
        ],
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!dir.path().join("subidasDocente").exists());
}

#[tokio::test]
async fn non_image_uploads_are_rejected_before_storage() {
    let dir = tempfile::tempdir().unwrap();
    let reviewer = token(1, Role::REVIEWER_ID);

    let req = multipart_request(
        "POST",
        "/api/convocatorias",
        Some(&reviewer),
        vec![
            Part::Text("titulo", "Docente de Quimica"),
            Part::Text("perfil", "Magister en Quimica"),
            Part::Text("requisitos", "Tres anos de experiencia"),
            Part::Text("fechaInicio", "2025-01-10"),
            Part::Text("fechaFinal", "2025-02-10"),
            Part::Text("idAreaInteres", "1"),
            Part::Text("idSector", "1"),
            Part::File("imagen", "payload.exe", "application/x-msdownload", b"MZ".to_vec()),
        ],
    );
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("payload.exe"));

    let req = multipart_request(
        "PUT",
        "/api/convocatorias/5",
        Some(&reviewer),
        vec![Part::File(
            "imagenPortada",
            "portada.png",
            "application/octet-stream",
            b"MZ".to_vec(),
        )],
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let candidate = token(7, Role::CANDIDATE_ID);
    let req = multipart_request(
        "PATCH",
        "/api/docentes/7",
        Some(&candidate),
        vec![Part::File("fotografia", "foto.sh", "text/x-shellscript", b"#!/bin/sh".to_vec())],
    );
    let (status, _) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(!dir.path().join("images").exists());
}

#[tokio::test]
async fn openapi_document_lists_the_api() {
    let dir = tempfile::tempdir().unwrap();
    let req = Request::builder()
        .uri("/api/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(offline_app(dir.path().to_path_buf()), req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/convocatorias/{id}"]["put"].is_object());
    assert!(body["paths"]["/api/docentes/{id}"]["patch"].is_object());
    assert!(body["paths"]["/api/evaluacion"]["post"].is_object());
}
