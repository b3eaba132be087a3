//! Attendee autocomplete route.

use axum::extract::{Query, State};
use axum::response::Json;
use event_registry::suggestion;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    /// Partial name or CI typed so far.
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionBody {
    pub id: String,
    pub full_name: String,
    pub ci: String,
}

/// Suggest known attendees matching the query.
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<SuggestionBody>>> {
    let matches = suggestion::suggest_attendees(state.db.pool(), &params.q).await?;
    Ok(Json(
        matches
            .into_iter()
            .map(|attendee| SuggestionBody {
                id: attendee.id,
                full_name: attendee.full_name,
                ci: attendee.ci,
            })
            .collect(),
    ))
}
