//! Attendee autofill suggestions for staff data entry.
//!
//! Matching is a case-insensitive substring test on the full name or the
//! CI, done in Rust rather than with SQL LIKE: SQLite's built-in case
//! folding is ASCII-only, and names here carry accents.

use sqlx::SqlitePool;

use crate::attendee;
use crate::error::Result;
use crate::models::Attendee;

/// Whether an attendee matches a partial name or CI.
pub fn attendee_matches(attendee: &Attendee, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }
    attendee.full_name.to_lowercase().contains(&query) || attendee.ci.contains(&query)
}

/// Fetch the attendees whose name or CI contains the partial input.
///
/// Read-only: suggestions never create or modify rows. An empty query
/// yields no suggestions.
pub async fn suggest_attendees(pool: &SqlitePool, query: &str) -> Result<Vec<Attendee>> {
    let attendees = attendee::list_attendees(pool).await?;
    Ok(attendees
        .into_iter()
        .filter(|attendee| attendee_matches(attendee, query))
        .collect())
}
