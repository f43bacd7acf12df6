use sqlx::{PgConnection, PgPool};

use crate::dto::notificacion_dto::NotificacionesResponse;
use crate::error::Result;
use crate::middleware::auth::Session;
use crate::models::notificacion::{EstadoNotificacion, Notificacion, TipoNotificacion};

/// Which notifications a session may see: reviewers get every application event, candidates
/// only their own approvals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationScope {
    Reviewer,
    Candidate(i32),
}

impl NotificationScope {
    pub fn for_session(session: &Session) -> Self {
        if session.is_staff() {
            NotificationScope::Reviewer
        } else {
            NotificationScope::Candidate(session.id_docente)
        }
    }

    fn tipo(&self) -> TipoNotificacion {
        match self {
            NotificationScope::Reviewer => TipoNotificacion::Postulacion,
            NotificationScope::Candidate(_) => TipoNotificacion::Aprobado,
        }
    }

    fn id_docente(&self) -> Option<i32> {
        match self {
            NotificationScope::Reviewer => None,
            NotificationScope::Candidate(id) => Some(*id),
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: NotificationScope) -> Result<NotificacionesResponse> {
        let notificaciones = sqlx::query_as::<_, Notificacion>(
            "SELECT n.id_notificacion, n.id_docente,
                    d.nombres || ' ' || d.apellido_paterno AS docente,
                    c.titulo AS convocatoria, c.link,
                    t.descripcion AS tipo,
                    n.fecha_notificacion, n.estado
             FROM notificaciones n
             JOIN docentes d ON d.id_docente = n.id_docente
             JOIN tipo_notificaciones t ON t.id_tipo_notificaciones = n.id_tipo_notificaciones
             LEFT JOIN convocatorias c ON c.id_convocatoria = n.id_convocatoria
             WHERE n.id_tipo_notificaciones = $1
               AND ($2::int IS NULL OR n.id_docente = $2)
             ORDER BY n.fecha_notificacion DESC, n.id_notificacion DESC",
        )
        .bind(scope.tipo().id())
        .bind(scope.id_docente())
        .fetch_all(&self.pool)
        .await?;

        let total_notificaciones = self.count_unread(scope).await?;
        Ok(NotificacionesResponse {
            notificaciones,
            total_notificaciones,
        })
    }

    pub async fn count_unread(&self, scope: NotificationScope) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notificaciones
             WHERE id_tipo_notificaciones = $1
               AND ($2::int IS NULL OR id_docente = $2)
               AND estado = $3",
        )
        .bind(scope.tipo().id())
        .bind(scope.id_docente())
        .bind(EstadoNotificacion::Cerrado.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Flips the listed unread rows to read. Ids outside the scope are left alone.
    pub async fn mark_read(&self, scope: NotificationScope, ids: &[i32]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let updated = sqlx::query(
            "UPDATE notificaciones SET estado = $4
             WHERE id_notificacion = ANY($1)
               AND id_tipo_notificaciones = $2
               AND ($3::int IS NULL OR id_docente = $3)
               AND estado = $5",
        )
        .bind(ids)
        .bind(scope.tipo().id())
        .bind(scope.id_docente())
        .bind(EstadoNotificacion::Abierto.as_str())
        .bind(EstadoNotificacion::Cerrado.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(?scope, updated, "notifications marked read");
        Ok(updated)
    }
}

/// Inserts an unread notification on the caller's connection so it commits or rolls back with
/// the surrounding transaction.
pub async fn notify_on(
    conn: &mut PgConnection,
    id_docente: i32,
    id_convocatoria: Option<i32>,
    tipo: TipoNotificacion,
) -> Result<i32> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO notificaciones (id_docente, id_convocatoria, id_tipo_notificaciones, estado)
         VALUES ($1, $2, $3, $4)
         RETURNING id_notificacion",
    )
    .bind(id_docente)
    .bind(id_convocatoria)
    .bind(tipo.id())
    .bind(EstadoNotificacion::Cerrado.as_str())
    .fetch_one(&mut *conn)
    .await?;
    tracing::info!(id_docente, tipo = tipo.descripcion(), "notification created");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::docente::Role;

    fn session(role: Role) -> Session {
        Session {
            id_docente: 10,
            nombre: "Ana".into(),
            apellido_paterno: "Paredes".into(),
            role,
            id_area: None,
        }
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(
            NotificationScope::for_session(&session(Role::Reviewer)),
            NotificationScope::Reviewer
        );
        assert_eq!(
            NotificationScope::for_session(&session(Role::Admin)),
            NotificationScope::Reviewer
        );
        assert_eq!(
            NotificationScope::for_session(&session(Role::Candidate)),
            NotificationScope::Candidate(10)
        );
    }

    #[test]
    fn scope_filters() {
        assert_eq!(NotificationScope::Reviewer.tipo(), TipoNotificacion::Postulacion);
        assert_eq!(NotificationScope::Reviewer.id_docente(), None);
        assert_eq!(NotificationScope::Candidate(4).tipo(), TipoNotificacion::Aprobado);
        assert_eq!(NotificationScope::Candidate(4).id_docente(), Some(4));
    }
}
