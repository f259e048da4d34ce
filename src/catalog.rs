//! Turning a search token into an ordered list of summaries

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::api::{ApiError, PokemonSource};
use crate::state::PokemonSummary;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchToken {
    /// Ids `1..=N`.
    Count(u32),
    /// A single lowercase name.
    Name(String),
}

impl SearchToken {
    pub fn parse(raw: &str) -> Option<SearchToken> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(count) = raw.parse::<u32>() {
            return Some(SearchToken::Count(count));
        }
        // Digits past u32::MAX are still a count; the batch stops at the first missing id.
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return Some(SearchToken::Count(u32::MAX));
        }
        Some(SearchToken::Name(raw.to_lowercase()))
    }

    pub fn is_name(&self) -> bool {
        matches!(self, SearchToken::Name(_))
    }
}

/// Fetch every summary for `token`.
///
/// Counts are fetched one id at a time in ascending order; the first failure
/// aborts the whole batch.
pub async fn load_catalog<S>(
    source: &S,
    token: &SearchToken,
) -> Result<Vec<PokemonSummary>, ApiError>
where
    S: PokemonSource + ?Sized,
{
    match token {
        SearchToken::Name(name) => {
            let summary = source.fetch_pokemon(name).await?;
            Ok(vec![summary])
        }
        SearchToken::Count(count) => {
            let mut entries = Vec::with_capacity((*count).min(1024) as usize);
            for id in 1..=*count {
                entries.push(source.fetch_pokemon(&id.to_string()).await?);
            }
            tracing::debug!(count = entries.len(), "catalog batch loaded");
            Ok(entries)
        }
    }
}

/// Result action for a failed load.
///
/// Only a name that the server does not know triggers the not-found reset.
/// Count batches and transport or parse failures are reported as errors.
pub fn failure_action(request: u64, token: &SearchToken, error: ApiError) -> Action {
    match token {
        SearchToken::Name(name) if error.is_missing() => Action::CatalogDidNotFound {
            request,
            name: name.clone(),
        },
        _ => {
            tracing::warn!(%error, ?token, "catalog load failed");
            Action::CatalogDidError {
                request,
                error: error.to_string(),
            }
        }
    }
}
