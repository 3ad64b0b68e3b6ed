use axum::{Json, extract::State, http::StatusCode};

use crate::discovery::ContentSearchSpec;

use super::AppState;
use super::models::{DemoRequest, FulfillmentEnvelope, SearchRequest, SearchResponse, SearchResult};

/// Result page requested for conversational queries.
const DEMO_PAGE_SIZE: i32 = 10;

pub async fn demo_handler(
    State(state): State<AppState>,
    Json(request): Json<DemoRequest>,
) -> Result<(StatusCode, Json<FulfillmentEnvelope>), (StatusCode, String)> {
    let text = request.text.ok_or((
        StatusCode::BAD_REQUEST,
        "Missing required field: text".to_string(),
    ))?;
    if text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Query text cannot be empty".to_string(),
        ));
    }

    log::info!("conversational query: {text}");

    let response = state
        .discovery
        .search(
            &state.config.engine_serving_config(),
            &text,
            DEMO_PAGE_SIZE,
            Some(ContentSearchSpec::with_summary()),
        )
        .await;

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            log::error!("search backend failed for conversational query: {e}");
            // Degrade to an empty summary so the chat platform still renders.
            return Ok((
                StatusCode::BAD_GATEWAY,
                Json(FulfillmentEnvelope::conversational(String::new())),
            ));
        }
    };

    for item in &response.results {
        if let Some(data) = &item.document.derived_struct_data {
            let title = data.title.as_deref().unwrap_or("Unknown Title");
            let link = data.link.as_deref().unwrap_or("Unknown Link");
            for snippet_item in &data.snippets {
                log::debug!(
                    "matched document: title={title}, link={link}, snippet={:?}",
                    snippet_item.snippet
                );
            }
        }
    }

    let summary = response.summary.map(|s| s.summary_text).unwrap_or_default();

    Ok((
        StatusCode::OK,
        Json(FulfillmentEnvelope::conversational(summary)),
    ))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<(StatusCode, Json<SearchResponse>), (StatusCode, String)> {
    let query = request.query.ok_or((
        StatusCode::BAD_REQUEST,
        "Missing required field: query".to_string(),
    ))?;
    let num_results = request.num_results.ok_or((
        StatusCode::BAD_REQUEST,
        "Missing required field: num_results".to_string(),
    ))?;

    if query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query cannot be empty".to_string()));
    }
    if num_results < 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "num_results must be non-negative".to_string(),
        ));
    }

    log::info!("structured query: {query} (num_results: {num_results})");

    let response = match state
        .discovery
        .search(&state.config.serving_config(), &query, num_results, None)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            log::error!("search backend failed for structured query: {e}");
            return Ok((
                StatusCode::BAD_GATEWAY,
                Json(SearchResponse {
                    results: Vec::new(),
                }),
            ));
        }
    };

    let results: Vec<SearchResult> = response
        .results
        .into_iter()
        .filter_map(|item| {
            let doc = item.document;
            let data = doc.derived_struct_data.unwrap_or_default();

            // A document without a snippet has nothing to display; skip it
            // rather than failing the whole request.
            let snippet = data.snippets.first().and_then(|s| s.snippet.clone());
            let Some(snippet) = snippet else {
                log::warn!("document {} has no snippet, skipping", doc.name);
                return None;
            };

            Some(SearchResult {
                name: doc.name,
                title: data.title.unwrap_or_else(|| "Unknown Title".to_string()),
                link: data.link.unwrap_or_else(|| "Unknown Link".to_string()),
                snippet,
            })
        })
        .take(num_results as usize)
        .collect();

    Ok((StatusCode::OK, Json(SearchResponse { results })))
}
