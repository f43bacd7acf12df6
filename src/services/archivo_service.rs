use sqlx::PgPool;

use crate::dto::archivo_dto::{ArchivoUpdate, NuevoArchivo};
use crate::error::{Error, Result};
use crate::models::archivo::Archivo;
use crate::services::storage_service::{sanitize_file_name, FileStorage};

const ARCHIVO_SELECT: &str = "SELECT a.id_ad, a.id_docente, a.nombre_archivo, a.ruta_archivo,
    a.id_tipo_archivo, t.tipo, a.created_at
    FROM archivos_docentes a
    LEFT JOIN tipos_archivo t ON t.id_ta = a.id_tipo_archivo";

/// Credential documents. The row and the file on disk change together: a failed insert
/// removes the written file and a replaced or deleted row takes its old file with it.
#[derive(Clone)]
pub struct ArchivoService {
    pool: PgPool,
    storage: FileStorage,
}

impl ArchivoService {
    pub fn new(pool: PgPool, storage: FileStorage) -> Self {
        Self { pool, storage }
    }

    pub async fn list_for(&self, id_docente: i32) -> Result<Vec<Archivo>> {
        let sql = format!("{} WHERE a.id_docente = $1 ORDER BY a.created_at DESC, a.id_ad DESC", ARCHIVO_SELECT);
        let items = sqlx::query_as::<_, Archivo>(&sql)
            .bind(id_docente)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get(&self, id: i32) -> Result<Archivo> {
        let sql = format!("{} WHERE a.id_ad = $1", ARCHIVO_SELECT);
        sqlx::query_as::<_, Archivo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Archivo {} not found", id)))
    }

    /// Directory name comes from the stored profile, never from the form.
    async fn owner_name(&self, id_docente: i32) -> Result<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT nombres || ' ' || apellido_paterno FROM docentes WHERE id_docente = $1",
        )
        .bind(id_docente)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Docente {} not found", id_docente)))
    }

    pub async fn create(&self, nuevo: NuevoArchivo) -> Result<Archivo> {
        let nombre = self.owner_name(nuevo.id_docente).await?;
        let ruta = self
            .storage
            .save_docente_file(&nombre, nuevo.id_docente, &nuevo.archivo.file_name, &nuevo.archivo.data)
            .await?;

        let inserted = sqlx::query_scalar::<_, i32>(
            "INSERT INTO archivos_docentes (id_docente, nombre_archivo, ruta_archivo, id_tipo_archivo)
             VALUES ($1, $2, $3, $4)
             RETURNING id_ad",
        )
        .bind(nuevo.id_docente)
        .bind(sanitize_file_name(&nuevo.archivo.file_name))
        .bind(&ruta)
        .bind(nuevo.id_tipo_archivo)
        .fetch_one(&self.pool)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                self.storage.remove(&ruta).await;
                return Err(e.into());
            }
        };
        tracing::info!(id_archivo = id, id_docente = nuevo.id_docente, ruta = %ruta, "archivo stored");
        self.get(id).await
    }

    pub async fn update(&self, id: i32, update: ArchivoUpdate) -> Result<Archivo> {
        let current = self.get(id).await?;

        let (nueva_ruta, nuevo_nombre) = match &update.archivo {
            Some(file) => {
                let nombre = self.owner_name(current.id_docente).await?;
                let ruta = self
                    .storage
                    .save_docente_file(&nombre, current.id_docente, &file.file_name, &file.data)
                    .await?;
                (Some(ruta), Some(sanitize_file_name(&file.file_name)))
            }
            None => (None, None),
        };

        let result = sqlx::query(
            "UPDATE archivos_docentes SET
                id_tipo_archivo = COALESCE($2, id_tipo_archivo),
                ruta_archivo = COALESCE($3, ruta_archivo),
                nombre_archivo = COALESCE($4, nombre_archivo)
             WHERE id_ad = $1",
        )
        .bind(id)
        .bind(update.id_tipo_archivo)
        .bind(&nueva_ruta)
        .bind(&nuevo_nombre)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            if let Some(ruta) = &nueva_ruta {
                self.storage.remove(ruta).await;
            }
            return Err(e.into());
        }

        if nueva_ruta.is_some() {
            self.storage.remove(&current.ruta_archivo).await;
        }
        tracing::info!(id_archivo = id, file_replaced = nueva_ruta.is_some(), "archivo updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let ruta = sqlx::query_scalar::<_, String>(
            "DELETE FROM archivos_docentes WHERE id_ad = $1 RETURNING ruta_archivo",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Archivo {} not found", id)))?;

        self.storage.remove(&ruta).await;
        tracing::info!(id_archivo = id, "archivo deleted");
        Ok(())
    }
}
