use sqlx::PgPool;

use crate::dto::docente_dto::{DocenteListQuery, DocentePatch, RegisterForm};
use crate::dto::upload::UploadedFile;
use crate::error::{Error, Result};
use crate::models::docente::{Docente, EstadoDocente, PostulacionDocente, Role};
use crate::models::notificacion::TipoNotificacion;
use crate::services::notification_service::notify_on;
use crate::services::storage_service::FileStorage;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::pagination::{PageRequest, Paged};

const DOCENTE_COLUMNS: &str = "id_docente, usuario, password_hash, nombres, apellido_paterno,
    apellido_materno, correo, ciudad_radicacion, id_pais, id_profesion, telefono,
    fecha_nacimiento, numero_referencia, numero_documento, genero, direccion, fotografia,
    estado, id_rol, created_at, updated_at";

const PHOTO_DIR: &str = "docentes";

#[derive(Clone)]
pub struct DocenteService {
    pool: PgPool,
    storage: FileStorage,
}

impl DocenteService {
    pub fn new(pool: PgPool, storage: FileStorage) -> Self {
        Self { pool, storage }
    }

    pub async fn register(&self, form: RegisterForm, foto: Option<UploadedFile>) -> Result<Docente> {
        let usuario = form.usuario.trim().to_string();
        if self.find_by_usuario(&usuario).await?.is_some() {
            return Err(Error::BadRequest("Username already exists".to_string()));
        }

        let password_hash = hash_password(form.password.clone()).await?;

        let fotografia = match &foto {
            Some(file) => Some(self.storage.save_image(PHOTO_DIR, file).await?),
            None => None,
        };

        let sql = format!(
            "INSERT INTO docentes (
                usuario, password_hash, nombres, apellido_paterno, apellido_materno, correo,
                ciudad_radicacion, id_pais, id_profesion, telefono, fecha_nacimiento,
                fotografia, estado, id_rol
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}",
            DOCENTE_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Docente>(&sql)
            .bind(&usuario)
            .bind(&password_hash)
            .bind(form.nombres.trim())
            .bind(form.apellido_paterno.trim())
            .bind(form.apellido_materno.as_deref().map(str::trim))
            .bind(form.correo.trim().to_lowercase())
            .bind(form.ciudad_radicacion.trim())
            .bind(form.id_pais)
            .bind(form.id_profesion)
            .bind(form.telefono.trim())
            .bind(form.fecha_nacimiento)
            .bind(&fotografia)
            .bind(EstadoDocente::Postulante.as_str())
            .bind(Role::CANDIDATE_ID)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(docente) => {
                tracing::info!(id_docente = docente.id_docente, usuario = %docente.usuario, "docente registered");
                Ok(docente)
            }
            Err(e) => {
                if let Some(path) = &fotografia {
                    self.storage.remove(path).await;
                }
                Err(e.into())
            }
        }
    }

    /// `None` when the user does not exist or the password does not match.
    pub async fn authenticate(&self, usuario: &str, password: &str) -> Result<Option<Docente>> {
        let Some(docente) = self.find_by_usuario(usuario.trim()).await? else {
            return Ok(None);
        };
        if verify_password(password.to_string(), docente.password_hash.clone()).await? {
            Ok(Some(docente))
        } else {
            Ok(None)
        }
    }

    pub async fn find_by_usuario(&self, usuario: &str) -> Result<Option<Docente>> {
        let sql = format!("SELECT {} FROM docentes WHERE usuario = $1", DOCENTE_COLUMNS);
        let docente = sqlx::query_as::<_, Docente>(&sql)
            .bind(usuario)
            .fetch_optional(&self.pool)
            .await?;
        Ok(docente)
    }

    pub async fn get(&self, id_docente: i32) -> Result<Docente> {
        let sql = format!("SELECT {} FROM docentes WHERE id_docente = $1", DOCENTE_COLUMNS);
        sqlx::query_as::<_, Docente>(&sql)
            .bind(id_docente)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Docente {} not found", id_docente)))
    }

    pub async fn list(&self, query: DocenteListQuery) -> Result<Paged<Docente>> {
        let page = PageRequest::new(query.page, query.per_page);

        let mut filters = vec!["id_rol = $1".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(estado) = query.estado.as_deref().filter(|e| !e.trim().is_empty()) {
            let estado = estado
                .parse::<EstadoDocente>()
                .map_err(Error::BadRequest)?;
            filters.push(format!("estado = ${}", args.len() + 2));
            args.push(estado.as_str().to_string());
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let n = args.len() + 2;
            filters.push(format!(
                "(nombres || ' ' || apellido_paterno || ' ' || COALESCE(apellido_materno, '') ILIKE ${n}
                  OR correo ILIKE ${n}
                  OR COALESCE(numero_documento, '') ILIKE ${n})"
            ));
            args.push(format!("%{}%", search));
        }

        let where_clause = format!("WHERE {}", filters.join(" AND "));
        let items_query = format!(
            "SELECT {} FROM docentes {} ORDER BY apellido_paterno, nombres, id_docente LIMIT ${} OFFSET ${}",
            DOCENTE_COLUMNS,
            where_clause,
            args.len() + 2,
            args.len() + 3
        );
        let total_query = format!("SELECT COUNT(*) FROM docentes {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, Docente>(&items_query).bind(Role::CANDIDATE_ID);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        let items = items_statement
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query).bind(Role::CANDIDATE_ID);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok(Paged::new(items, total, page))
    }

    pub async fn postulaciones(&self, id_docente: i32) -> Result<Vec<PostulacionDocente>> {
        let items = sqlx::query_as::<_, PostulacionDocente>(
            "SELECT c.id_convocatoria, c.titulo, c.estado, p.fecha_postulacion
             FROM postulaciones p
             JOIN convocatorias c ON c.id_convocatoria = p.id_convocatoria
             WHERE p.id_docente = $1
             ORDER BY p.fecha_postulacion DESC",
        )
        .bind(id_docente)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Applies the set fields of `patch`; a new photo replaces the stored one, which is
    /// removed only after the row points at the new file.
    pub async fn update_profile(
        &self,
        id_docente: i32,
        patch: DocentePatch,
        foto: Option<UploadedFile>,
    ) -> Result<Docente> {
        let current = self.get(id_docente).await?;

        let nueva_foto = match &foto {
            Some(file) => Some(self.storage.save_image(PHOTO_DIR, file).await?),
            None => None,
        };

        let sql = format!(
            "UPDATE docentes SET
                nombres = COALESCE($2, nombres),
                apellido_paterno = COALESCE($3, apellido_paterno),
                apellido_materno = CASE WHEN $16 THEN $4 ELSE apellido_materno END,
                correo = COALESCE($5, correo),
                ciudad_radicacion = COALESCE($6, ciudad_radicacion),
                id_pais = COALESCE($7, id_pais),
                id_profesion = COALESCE($8, id_profesion),
                telefono = COALESCE($9, telefono),
                fecha_nacimiento = COALESCE($10, fecha_nacimiento),
                numero_referencia = COALESCE($11, numero_referencia),
                numero_documento = COALESCE($12, numero_documento),
                genero = COALESCE($13, genero),
                direccion = COALESCE($14, direccion),
                fotografia = COALESCE($15, fotografia),
                updated_at = NOW()
            WHERE id_docente = $1
            RETURNING {}",
            DOCENTE_COLUMNS
        );
        let updated = sqlx::query_as::<_, Docente>(&sql)
            .bind(id_docente)
            .bind(&patch.nombres)
            .bind(&patch.apellido_paterno)
            .bind(patch.apellido_materno.clone().flatten())
            .bind(&patch.correo)
            .bind(&patch.ciudad_radicacion)
            .bind(patch.id_pais)
            .bind(patch.id_profesion)
            .bind(&patch.telefono)
            .bind(patch.fecha_nacimiento)
            .bind(&patch.numero_referencia)
            .bind(&patch.numero_documento)
            .bind(&patch.genero)
            .bind(&patch.direccion)
            .bind(&nueva_foto)
            .bind(patch.apellido_materno.is_some())
            .fetch_one(&self.pool)
            .await;

        let docente = match updated {
            Ok(docente) => docente,
            Err(e) => {
                if let Some(path) = &nueva_foto {
                    self.storage.remove(path).await;
                }
                return Err(e.into());
            }
        };

        if nueva_foto.is_some() {
            if let Some(old) = &current.fotografia {
                self.storage.remove(old).await;
            }
        }
        tracing::info!(id_docente, "docente profile updated");
        Ok(docente)
    }

    /// Sets the candidate status. Approval also queues an unread `aprobado` notification in
    /// the same transaction.
    pub async fn update_estado(&self, id_docente: i32, estado: EstadoDocente) -> Result<Docente> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE docentes SET estado = $2, updated_at = NOW() WHERE id_docente = $1 RETURNING {}",
            DOCENTE_COLUMNS
        );
        let docente = sqlx::query_as::<_, Docente>(&sql)
            .bind(id_docente)
            .bind(estado.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Docente {} not found", id_docente)))?;

        if estado == EstadoDocente::Aprobado {
            notify_on(&mut *tx, id_docente, None, TipoNotificacion::Aprobado).await?;
        }
        tx.commit().await?;

        tracing::info!(id_docente, estado = %estado, "docente status changed");
        Ok(docente)
    }
}
