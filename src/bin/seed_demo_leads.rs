//! Seeds a handful of demo leads for dashboard development.

use dotenvy::dotenv;
use leadflow_api::db::Database;
use leadflow_api::models::{LeadCategory, LeadForm, Qualification, DEFAULT_SOURCE};
use leadflow_api::store::{PgStore, Store};
use std::env;

/// Connects to the database and inserts a small set of pre-qualified
/// demo leads so the dashboard has something to render.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::new(&database_url).await?;
    let store = PgStore::new(db.pool);

    let demo_leads = [
        (
            LeadForm {
                name: "John Smith".to_string(),
                email: "john@enterprise.com".to_string(),
                phone: "555-0123".to_string(),
                company: "Enterprise Co".to_string(),
                message: "Interested in AI solutions".to_string(),
                source: DEFAULT_SOURCE.to_string(),
            },
            Qualification {
                score: 8,
                category: LeadCategory::Hot,
                reason: "Decision maker with clear budget".to_string(),
                action: "Follow up within 24 hours".to_string(),
            },
        ),
        (
            LeadForm {
                name: "Sarah Wilson".to_string(),
                email: "sarah@startup.io".to_string(),
                phone: "555-0456".to_string(),
                company: "Startup Inc".to_string(),
                message: "Looking for automation".to_string(),
                source: DEFAULT_SOURCE.to_string(),
            },
            Qualification {
                score: 6,
                category: LeadCategory::Warm,
                reason: "Shows interest but no timeline".to_string(),
                action: "Schedule discovery call".to_string(),
            },
        ),
        (
            LeadForm {
                name: "Mike Brown".to_string(),
                email: "mike@gmail.com".to_string(),
                phone: "555-0789".to_string(),
                company: "Freelance".to_string(),
                message: "Just curious what you do".to_string(),
                source: DEFAULT_SOURCE.to_string(),
            },
            Qualification {
                score: 3,
                category: LeadCategory::Cold,
                reason: "Generic email, no use case, no scale".to_string(),
                action: "Add to nurture campaign".to_string(),
            },
        ),
    ];

    for (form, qualification) in &demo_leads {
        let lead = store.insert_lead(form, qualification).await?;
        tracing::info!("Seeded lead {} ({})", lead.id, lead.name);
    }

    tracing::info!("Seeding complete: {} leads", demo_leads.len());
    Ok(())
}
