use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::{Pool, PooledConnection};
use serde::Serialize;
use thiserror::Error;

use crate::{configuration::DatabaseSettings, telemetry::spawn_blocking_with_tracing};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub fn error_fmt_chain(f: &mut std::fmt::Formatter<'_>, source: &Option<impl Error>) -> std::fmt::Result{
    if let Some(error) = source{
        write!(f, "\n\tCaused By:\n\t")?;
        write!(f, "{:?}", &error)?;
        error_fmt_chain(f, &error.source())
    } else {
        Ok(())
    }
}

// Pool is built lazily so the server can start before postgres accepts connections
pub fn build_pool(settings: &DatabaseSettings) -> DbPool{
    let manager = ConnectionManager::<PgConnection>::new(settings.get_database_table_url());
    Pool::builder()
        .connection_timeout(std::time::Duration::from_secs(5))
        .build_unchecked(manager)
}

pub async fn get_pooled_connection(
    pool: &web::Data<DbPool>
) -> Result<DbConnection, PoolGetError>{
    let pool_clone = pool.clone();

    let res = spawn_blocking_with_tracing(move || {
        pool_clone.get()
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum PoolGetError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to get connection from pool")]
    DbPoolError(#[from] r2d2::Error),
}

impl Debug for PoolGetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Serializes rows as a CSV attachment
pub fn csv_response<T: Serialize>(
    file_name: &str,
    rows: &[T]
) -> Result<HttpResponse, anyhow::Error>{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows{
        writer.serialize(row)?;
    }
    let body = writer.into_inner()
                .map_err(|e| anyhow::anyhow!("Failed to flush csv writer: {}", e))?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name)
        ))
        .body(body))
}
