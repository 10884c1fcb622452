use crate::errors::AppError;
use crate::models::{Competitor, Lead, LeadForm, MarketTrend, NewCompetitor, NewTrend, Qualification};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Capability abstraction over lead/market persistence.
///
/// Two implementations exist: `PgStore` for production and `MemoryStore`
/// for degraded-mode operation and tests. The backend is chosen by
/// configuration at startup (see `config::StoreBackend`); callers receive
/// an `Arc<dyn Store>` and never know which one they hold.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persists a qualified lead, assigning its id and creation timestamp.
    /// One atomic insert per lead; no partial writes.
    async fn insert_lead(
        &self,
        form: &LeadForm,
        qualification: &Qualification,
    ) -> Result<Lead, AppError>;

    /// Returns leads newest-first by creation timestamp, capped at `limit`.
    async fn list_leads(&self, limit: i64) -> Result<Vec<Lead>, AppError>;

    async fn insert_competitor(&self, new: &NewCompetitor) -> Result<Competitor, AppError>;

    /// Competitors newest-first by `last_updated`.
    async fn list_competitors(&self) -> Result<Vec<Competitor>, AppError>;

    async fn insert_trend(&self, new: &NewTrend) -> Result<MarketTrend, AppError>;

    /// Trends newest-first by `date`.
    async fn list_trends(&self) -> Result<Vec<MarketTrend>, AppError>;
}

// ============ Postgres ============

/// Postgres-backed store over a shared connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_lead(
        &self,
        form: &LeadForm,
        qualification: &Qualification,
    ) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (id, name, email, phone, company, message, source,
                               score, category, reason, action)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&form.name)
        .bind(&form.email)
        .bind(&form.phone)
        .bind(&form.company)
        .bind(&form.message)
        .bind(&form.source)
        .bind(qualification.score)
        .bind(qualification.category.as_str())
        .bind(&qualification.reason)
        .bind(&qualification.action)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Persisted lead {}", lead.id);
        Ok(lead)
    }

    async fn list_leads(&self, limit: i64) -> Result<Vec<Lead>, AppError> {
        // Secondary id ordering keeps repeated reads identical when two
        // leads share a timestamp.
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    async fn insert_competitor(&self, new: &NewCompetitor) -> Result<Competitor, AppError> {
        let competitor = sqlx::query_as::<_, Competitor>(
            r#"
            INSERT INTO competitors (id, name, website, strengths, weaknesses, market_share)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.website)
        .bind(&new.strengths)
        .bind(&new.weaknesses)
        .bind(new.market_share)
        .fetch_one(&self.pool)
        .await?;

        Ok(competitor)
    }

    async fn list_competitors(&self) -> Result<Vec<Competitor>, AppError> {
        let competitors = sqlx::query_as::<_, Competitor>(
            "SELECT * FROM competitors ORDER BY last_updated DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(competitors)
    }

    async fn insert_trend(&self, new: &NewTrend) -> Result<MarketTrend, AppError> {
        let trend = sqlx::query_as::<_, MarketTrend>(
            r#"
            INSERT INTO market_trends (id, trend, impact, description, source)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.trend)
        .bind(&new.impact)
        .bind(&new.description)
        .bind(&new.source)
        .fetch_one(&self.pool)
        .await?;

        Ok(trend)
    }

    async fn list_trends(&self) -> Result<Vec<MarketTrend>, AppError> {
        let trends = sqlx::query_as::<_, MarketTrend>(
            "SELECT * FROM market_trends ORDER BY date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(trends)
    }
}

// ============ In-memory ============

/// In-memory store used when `STORE_BACKEND=memory` and throughout the
/// test suite. Data does not survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    leads: RwLock<Vec<Lead>>,
    competitors: RwLock<Vec<Competitor>>,
    trends: RwLock<Vec<MarketTrend>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_lead(
        &self,
        form: &LeadForm,
        qualification: &Qualification,
    ) -> Result<Lead, AppError> {
        let mut leads = self.leads.write().await;

        // Creation timestamps must be non-decreasing across records even
        // if the wall clock steps backwards.
        let mut created_at = Utc::now();
        if let Some(last) = leads.last() {
            if created_at < last.created_at {
                created_at = last.created_at;
            }
        }

        let lead = Lead::from_parts(form, qualification, Uuid::new_v4(), created_at);
        leads.push(lead.clone());
        Ok(lead)
    }

    async fn list_leads(&self, limit: i64) -> Result<Vec<Lead>, AppError> {
        let leads = self.leads.read().await;
        // Insertion order is creation order, so reverse iteration yields
        // newest-first even across identical timestamps.
        Ok(leads
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn insert_competitor(&self, new: &NewCompetitor) -> Result<Competitor, AppError> {
        let competitor = Competitor {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            website: new.website.clone(),
            strengths: new.strengths.clone(),
            weaknesses: new.weaknesses.clone(),
            market_share: new.market_share,
            last_updated: Utc::now(),
        };
        self.competitors.write().await.push(competitor.clone());
        Ok(competitor)
    }

    async fn list_competitors(&self) -> Result<Vec<Competitor>, AppError> {
        let competitors = self.competitors.read().await;
        Ok(competitors.iter().rev().cloned().collect())
    }

    async fn insert_trend(&self, new: &NewTrend) -> Result<MarketTrend, AppError> {
        let trend = MarketTrend {
            id: Uuid::new_v4(),
            trend: new.trend.clone(),
            impact: new.impact.clone(),
            description: new.description.clone(),
            source: new.source.clone(),
            date: Utc::now(),
        };
        self.trends.write().await.push(trend.clone());
        Ok(trend)
    }

    async fn list_trends(&self) -> Result<Vec<MarketTrend>, AppError> {
        let trends = self.trends.read().await;
        Ok(trends.iter().rev().cloned().collect())
    }
}
