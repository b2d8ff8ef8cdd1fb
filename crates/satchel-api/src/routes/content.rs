//! Routes for static content: item definitions and class starting gear.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};

use satchel_character::domain::starting_gear::ClassStartingGear;
use satchel_content::application::query_handlers;
use satchel_core::catalog::ItemDefinition;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /starting-gear/{class}
async fn get_starting_gear(
    State(state): State<AppState>,
    Path(class): Path<String>,
) -> Result<Json<ClassStartingGear>, ApiError> {
    let gear = query_handlers::get_starting_gear(&state.starting_gear, &class)?;
    Ok(Json(gear))
}

/// GET /items/{item_id}
async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<ItemDefinition>, ApiError> {
    let definition = state
        .inventory
        .catalog
        .get_item(&item_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("unknown item '{item_id}'")))?;
    Ok(Json(definition))
}

/// Returns the router for the content context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/starting-gear/{class}", get(get_starting_gear))
        .route("/items/{item_id}", get(get_item))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::test_state::test_app_state;

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let app = router().with_state(test_app_state());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_get_starting_gear_returns_class_entry() {
        // Act
        let (status, json) = get_json("/starting-gear/fighter").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["class"], "fighter");
        assert_eq!(json["starting_gear"]["given_items"][0]["item"], "dagger");
    }

    #[tokio::test]
    async fn test_get_starting_gear_for_unknown_class_returns_404() {
        // Act
        let (status, json) = get_json("/starting-gear/bard").await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "unknown_class");
    }

    #[tokio::test]
    async fn test_get_item_returns_definition() {
        // Act
        let (status, json) = get_json("/items/backpack").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "backpack");
        assert_eq!(json["gear_slot"], "bag");
    }

    #[tokio::test]
    async fn test_get_unknown_item_returns_404() {
        // Act
        let (status, json) = get_json("/items/moonblade").await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }
}
