use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use url::Url;

use crate::dto::convocatoria_dto::{ConvocatoriaForm, ConvocatoriaListQuery, ConvocatoriaPatch};
use crate::dto::upload::UploadedFile;
use crate::error::{Error, Result};
use crate::models::convocatoria::{
    Convocatoria, ConvocatoriaConPostulantes, EstadoConvocatoria, Postulante,
};
use crate::models::notificacion::TipoNotificacion;
use crate::services::notification_service::notify_on;
use crate::services::storage_service::FileStorage;
use crate::utils::pagination::{PageRequest, Paged};

const CONVOCATORIA_COLUMNS: &str = "id_convocatoria, titulo, perfil, link, requisitos, fecha_inicio,
    fecha_final, estado, id_area, id_sector, imagen_portada, formulario_externo, created_at,
    updated_at";

const IMAGE_DIR: &str = "convocatorias";

/// `<base>/convocatorias/<title>` with the title percent-encoded as a single path segment.
pub fn public_link(base: &Url, titulo: &str) -> Result<String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("PUBLIC_BASE_URL cannot be used as a base: {}", base)))?
        .pop_if_empty()
        .push("convocatorias")
        .push(titulo.trim());
    Ok(url.to_string())
}

fn attach_postulantes(
    items: Vec<Convocatoria>,
    postulantes: Vec<Postulante>,
) -> Vec<ConvocatoriaConPostulantes> {
    let mut by_convocatoria: HashMap<i32, Vec<Postulante>> = HashMap::new();
    for p in postulantes {
        by_convocatoria.entry(p.id_convocatoria).or_default().push(p);
    }
    items
        .into_iter()
        .map(|convocatoria| ConvocatoriaConPostulantes {
            postulantes: by_convocatoria
                .remove(&convocatoria.id_convocatoria)
                .unwrap_or_default(),
            convocatoria,
        })
        .collect()
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::BadRequest(format!("{} is required", field)))
}

#[derive(Clone)]
pub struct ConvocatoriaService {
    pool: PgPool,
    storage: FileStorage,
    base_url: Url,
}

impl ConvocatoriaService {
    pub fn new(pool: PgPool, storage: FileStorage, base_url: Url) -> Self {
        Self {
            pool,
            storage,
            base_url,
        }
    }

    pub async fn list(&self, query: ConvocatoriaListQuery) -> Result<Paged<ConvocatoriaConPostulantes>> {
        let page = PageRequest::new(query.page, query.per_page);

        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(raw) = query.estado.as_deref().filter(|e| !e.trim().is_empty()) {
            let estado = EstadoConvocatoria::parse(raw)
                .ok_or_else(|| Error::BadRequest(format!("Invalid estado: {}", raw)))?;
            filters.push(format!("estado = ${}", args.len() + 1));
            args.push(estado.as_str().to_string());
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let n = args.len() + 1;
            filters.push(format!("(titulo ILIKE ${n} OR perfil ILIKE ${n})"));
            args.push(format!("%{}%", search));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM convocatorias {} ORDER BY fecha_inicio DESC, id_convocatoria DESC LIMIT ${} OFFSET ${}",
            CONVOCATORIA_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM convocatorias {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, Convocatoria>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        let items = items_statement
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        let ids: Vec<i32> = items.iter().map(|c| c.id_convocatoria).collect();
        let postulantes = self.postulantes_for(&ids).await?;

        Ok(Paged::new(attach_postulantes(items, postulantes), total, page))
    }

    async fn postulantes_for(&self, ids: &[i32]) -> Result<Vec<Postulante>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = sqlx::query_as::<_, Postulante>(
            "SELECT p.id_convocatoria, d.id_docente, d.nombres, d.apellido_paterno, d.correo,
                    d.estado, p.fecha_postulacion
             FROM postulaciones p
             JOIN docentes d ON d.id_docente = p.id_docente
             WHERE p.id_convocatoria = ANY($1)
             ORDER BY p.fecha_postulacion",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn find(&self, id: i32) -> Result<Convocatoria> {
        let sql = format!(
            "SELECT {} FROM convocatorias WHERE id_convocatoria = $1",
            CONVOCATORIA_COLUMNS
        );
        sqlx::query_as::<_, Convocatoria>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Convocatoria {} not found", id)))
    }

    pub async fn get(&self, id: i32) -> Result<ConvocatoriaConPostulantes> {
        let convocatoria = self.find(id).await?;
        let postulantes = self.postulantes_for(&[id]).await?;
        Ok(ConvocatoriaConPostulantes {
            convocatoria,
            postulantes,
        })
    }

    /// Expects a form that already passed [`ConvocatoriaForm::check`].
    pub async fn create(
        &self,
        form: ConvocatoriaForm,
        imagen: Option<UploadedFile>,
    ) -> Result<Convocatoria> {
        let fecha_inicio = required(form.fecha_inicio, "fechaInicio")?;
        let fecha_final = required(form.fecha_final, "fechaFinal")?;
        let id_area = required(form.id_area, "idArea")?;
        let id_sector = required(form.id_sector, "idSector")?;
        let link = public_link(&self.base_url, &form.titulo)?;

        let imagen_portada = match &imagen {
            Some(file) => Some(self.storage.save_image(IMAGE_DIR, file).await?),
            None => None,
        };

        let sql = format!(
            "INSERT INTO convocatorias (
                titulo, perfil, link, requisitos, fecha_inicio, fecha_final, estado,
                id_area, id_sector, imagen_portada, formulario_externo
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}",
            CONVOCATORIA_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Convocatoria>(&sql)
            .bind(form.titulo.trim())
            .bind(form.perfil.trim())
            .bind(&link)
            .bind(form.requisitos.trim())
            .bind(fecha_inicio)
            .bind(fecha_final)
            .bind(form.estado().as_str())
            .bind(id_area)
            .bind(id_sector)
            .bind(&imagen_portada)
            .bind(&form.formulario_externo)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(convocatoria) => {
                tracing::info!(
                    id_convocatoria = convocatoria.id_convocatoria,
                    titulo = %convocatoria.titulo,
                    "convocatoria created"
                );
                Ok(convocatoria)
            }
            Err(e) => {
                if let Some(path) = &imagen_portada {
                    self.storage.remove(path).await;
                }
                Err(e.into())
            }
        }
    }

    /// Writes only the fields that differ from the stored row. The public link follows the
    /// title; a new cover image replaces the old file.
    pub async fn update(
        &self,
        id: i32,
        patch: ConvocatoriaPatch,
        imagen: Option<UploadedFile>,
    ) -> Result<Convocatoria> {
        let current = self.find(id).await?;
        patch.check_against(&current)?;
        let changes = patch.diff(&current);

        if changes.is_empty() && imagen.is_none() {
            tracing::info!(id_convocatoria = id, "convocatoria update with no changes");
            return Ok(current);
        }

        let link = match changes.changed_title() {
            Some(titulo) => Some(public_link(&self.base_url, titulo)?),
            None => None,
        };

        let nueva_imagen = match &imagen {
            Some(file) => Some(self.storage.save_image(IMAGE_DIR, file).await?),
            None => None,
        };

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE convocatorias SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(v) = &changes.titulo {
                set.push("titulo = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &link {
                set.push("link = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &changes.perfil {
                set.push("perfil = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &changes.requisitos {
                set.push("requisitos = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = changes.fecha_inicio {
                set.push("fecha_inicio = ").push_bind_unseparated(v);
            }
            if let Some(v) = changes.fecha_final {
                set.push("fecha_final = ").push_bind_unseparated(v);
            }
            if let Some(v) = &changes.estado {
                set.push("estado = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = changes.id_area {
                set.push("id_area = ").push_bind_unseparated(v);
            }
            if let Some(v) = changes.id_sector {
                set.push("id_sector = ").push_bind_unseparated(v);
            }
            if let Some(v) = &changes.formulario_externo {
                set.push("formulario_externo = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &nueva_imagen {
                set.push("imagen_portada = ").push_bind_unseparated(v.clone());
            }
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id_convocatoria = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(CONVOCATORIA_COLUMNS);

        let updated = match qb.build_query_as::<Convocatoria>().fetch_one(&self.pool).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(path) = &nueva_imagen {
                    self.storage.remove(path).await;
                }
                return Err(e.into());
            }
        };

        if nueva_imagen.is_some() {
            if let Some(old) = &current.imagen_portada {
                self.storage.remove(old).await;
            }
        }
        tracing::info!(
            id_convocatoria = id,
            link_regenerated = link.is_some(),
            "convocatoria updated"
        );
        Ok(updated)
    }

    pub async fn set_estado(&self, id: i32, estado: EstadoConvocatoria) -> Result<Convocatoria> {
        let sql = format!(
            "UPDATE convocatorias SET estado = $2, updated_at = NOW()
             WHERE id_convocatoria = $1 RETURNING {}",
            CONVOCATORIA_COLUMNS
        );
        let convocatoria = sqlx::query_as::<_, Convocatoria>(&sql)
            .bind(id)
            .bind(estado.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Convocatoria {} not found", id)))?;
        tracing::info!(id_convocatoria = id, estado = estado.as_str(), "convocatoria status changed");
        Ok(convocatoria)
    }

    /// Records the application and the reviewers' `postulacion` notification together.
    pub async fn postular(&self, id_convocatoria: i32, id_docente: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {} FROM convocatorias WHERE id_convocatoria = $1 FOR SHARE",
            CONVOCATORIA_COLUMNS
        );
        let convocatoria = sqlx::query_as::<_, Convocatoria>(&sql)
            .bind(id_convocatoria)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Convocatoria {} not found", id_convocatoria)))?;
        if !convocatoria.is_open() {
            return Err(Error::BadRequest("This convocatoria is closed".to_string()));
        }

        let inserted = sqlx::query_scalar::<_, i32>(
            "INSERT INTO postulaciones (id_docente, id_convocatoria)
             VALUES ($1, $2)
             ON CONFLICT (id_docente, id_convocatoria) DO NOTHING
             RETURNING id_postulacion",
        )
        .bind(id_docente)
        .bind(id_convocatoria)
        .fetch_optional(&mut *tx)
        .await?;
        if inserted.is_none() {
            return Err(Error::BadRequest(
                "You have already applied to this convocatoria".to_string(),
            ));
        }

        notify_on(
            &mut *tx,
            id_docente,
            Some(id_convocatoria),
            TipoNotificacion::Postulacion,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(id_convocatoria, id_docente, "application recorded");
        Ok(())
    }
}
