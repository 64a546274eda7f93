//! Test database helper utilities
//!
//! Database tests run against `TEST_DATABASE_URL` when it is set, otherwise
//! against a throwaway PostgreSQL container. A configured but unusable
//! `TEST_DATABASE_URL` fails the test. Without one, an unavailable container
//! makes the helper yield `None` and the test skips itself with a notice on
//! stderr.

use std::sync::Once;
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use PlaceBot::CommonRepository;

static INIT: Once = Once::new();

pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    /// Migrated, empty database, or `None` when no PostgreSQL is available
    pub async fn try_new() -> Option<Self> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt::try_init();
        });

        if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
            return match Self::prepare(url, None).await {
                Ok(db) => Some(db),
                Err(e) => panic!("TEST_DATABASE_URL is set but unusable: {}", e),
            };
        }

        let container = match PostgresImage::default().start().await {
            Ok(container) => container,
            Err(e) => return skip(e),
        };
        let address = async {
            let host = container.get_host().await?;
            let port = container.get_host_port_ipv4(5432).await?;
            Ok::<_, testcontainers::TestcontainersError>((host, port))
        };
        let (host, port) = match address.await {
            Ok(address) => address,
            Err(e) => return skip(e),
        };
        let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

        match Self::prepare(url, Some(container)).await {
            Ok(db) => Some(db),
            Err(e) => skip(e),
        }
    }

    async fn prepare(
        database_url: String,
        container: Option<ContainerAsync<PostgresImage>>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = PgPool::connect(&database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        sqlx::query("TRUNCATE places, users RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await?;

        Ok(Self {
            pool,
            database_url,
            _container: container,
        })
    }

    pub fn repository(&self) -> CommonRepository {
        CommonRepository::new(self.pool.clone())
    }
}

fn skip<E: std::fmt::Display>(reason: E) -> Option<TestDatabase> {
    eprintln!(
        "SKIPPED database test, no PostgreSQL available ({}); set TEST_DATABASE_URL to run it",
        reason
    );
    None
}
