use sqlx::{postgres::PgPoolOptions, PgPool};

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        bootstrap_schema(&pool).await?;

        Ok(Self { pool })
    }
}

/// Creates the application tables if they do not exist yet.
/// Schema migration tooling is out of scope; the shape is small enough
/// to bootstrap in place.
async fn bootstrap_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            company TEXT NOT NULL,
            message TEXT NOT NULL,
            source TEXT NOT NULL,
            score INTEGER NOT NULL,
            category TEXT NOT NULL,
            reason TEXT NOT NULL,
            action TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS competitors (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            website TEXT NOT NULL,
            strengths TEXT NOT NULL,
            weaknesses TEXT NOT NULL,
            market_share DOUBLE PRECISION NOT NULL,
            last_updated TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS market_trends (
            id UUID PRIMARY KEY,
            trend TEXT NOT NULL,
            impact TEXT NOT NULL,
            description TEXT NOT NULL,
            source TEXT NOT NULL,
            date TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
