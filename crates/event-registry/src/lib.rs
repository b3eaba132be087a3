//! SQLite persistence and registration reconciliation for department events.
//!
//! This crate owns the registry schema (events, attendees, registrations)
//! and the one write path that matters: [`reconciler::reconcile`], which
//! guarantees at most one registration per (CI, event) by leaning on the
//! schema's UNIQUE constraints instead of application-level checks.
//!
//! # Example
//!
//! ```no_run
//! use event_registry::reconciler::{self, Submission};
//! use event_registry::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:registry.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let submission = Submission {
//!         event_id: "7f9caa70-8c9d-4762-9c24-30891f33e1b8".to_string(),
//!         full_name: "Ana María Rojas".to_string(),
//!         ci: "1234567".to_string(),
//!         email: "ana@example.com".to_string(),
//!         phone: None,
//!         payment_proof: None,
//!         ocr_text: None,
//!         ocr_amount: None,
//!     };
//!     let outcome = reconciler::reconcile(db.pool(), &submission).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod attendee;
pub mod error;
pub mod event;
pub mod models;
pub mod reconciler;
pub mod registration;
pub mod suggestion;

pub use error::{DatabaseError, Result};
pub use models::{
    Attendee, Event, Modality, NewEvent, NewRegistration, Registration, RegistrationFlags,
};
pub use reconciler::{Outcome, ReconcileError, Submission};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to absorb submission bursts when registration opens.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> event_registry::Result<()> {
    /// // File database
    /// let db = event_registry::Database::connect("sqlite:data/registry.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = event_registry::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Modality, NewEvent};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = test_db().await;
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_end_to_end_registration_flow() {
        let db = test_db().await;

        let event = event::create_event(
            db.pool(),
            &NewEvent {
                title: "Hackathon".to_string(),
                scheduled_at: "2025-09-27T08:00:00".to_string(),
                modality: Modality::InPerson,
                venue: Some("Laboratorio 2".to_string()),
                is_paid: false,
                cost_centavos: None,
                payment_qr: None,
            },
        )
        .await
        .unwrap();

        let outcome = reconciler::reconcile(
            db.pool(),
            &Submission {
                event_id: event.id.clone(),
                full_name: "Luis Quispe".to_string(),
                ci: "7654321".to_string(),
                email: "luis@example.com".to_string(),
                phone: None,
                payment_proof: None,
                ocr_text: None,
                ocr_amount: None,
            },
        )
        .await
        .unwrap();
        assert!(matches!(outcome, Outcome::Created(_)));

        // The new attendee is immediately suggestible for manual entry.
        let hits = suggestion::suggest_attendees(db.pool(), "quis").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ci, "7654321");
    }
}
