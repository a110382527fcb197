use std::{error::Error, net::TcpListener};

use actix_web::{dev::Server, error::JsonPayloadError, web, App, HttpRequest, HttpServer};
use anyhow::Context;
use diesel::pg::Pg;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing_actix_web::TracingLogger;

use crate::{auth::Tokenizer, configuration::{ReviewSettings, Settings}, error::ApiError, routes, telemetry::spawn_blocking_with_tracing, utils::{build_pool, DbPool}};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = build_pool(&settings.database);

        let migration_pool = pool.clone();
        spawn_blocking_with_tracing(move || -> Result<(), anyhow::Error> {
            let mut conn = migration_pool.get()
                            .context("Failed to get a connection for migrations")?;
            run_migrations(&mut conn)
                .map_err(|e| anyhow::anyhow!(e))
                .context("Failed to run migrations")
        })
        .await??;

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))?;
        let port = listener.local_addr()?.port();

        let server = run(listener, pool, Tokenizer::new(&settings.jwt), settings.review)?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }
}

// Malformed bodies get the same {"message"} shape as every other 400
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error{
    ApiError::validation(err.to_string()).into()
}

fn run(
    listener: TcpListener,
    pool: DbPool,
    tokenizer: Tokenizer,
    review_settings: ReviewSettings
) -> Result<Server, anyhow::Error>{
    let pool = web::Data::new(pool);
    let tokenizer = web::Data::new(tokenizer);
    let review_settings = web::Data::new(review_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(pool.clone())
            .app_data(tokenizer.clone())
            .app_data(review_settings.clone())
            .configure(routes::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
