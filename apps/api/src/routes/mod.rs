pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::proposals::handlers as proposals;
use crate::state::AppState;
use crate::timeline::handlers as timeline;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Timeline preview
        .route("/api/v1/timeline/schedule", post(timeline::handle_schedule))
        .route("/api/v1/timeline/duration", post(timeline::handle_duration))
        // Proposals
        .route(
            "/api/v1/proposals",
            get(proposals::handle_list).post(proposals::handle_create),
        )
        .route(
            "/api/v1/proposals/:id",
            get(proposals::handle_get).patch(proposals::handle_edit),
        )
        .route("/api/v1/proposals/:id/chat", post(proposals::handle_chat))
        .route("/api/v1/proposals/:id/stage", patch(proposals::handle_stage))
        .route(
            "/api/v1/proposals/:id/calendar.ics",
            get(proposals::handle_calendar),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::errors::AppError;
    use crate::llm_client::ChatMessage;
    use crate::proposals::copilot::{CopilotReply, ProposalCopilot};
    use crate::proposals::models::ProposalContent;

    struct SilentCopilot;

    #[async_trait]
    impl ProposalCopilot for SilentCopilot {
        async fn refine(
            &self,
            _content: &ProposalContent,
            _history: &[ChatMessage],
            _message: &str,
        ) -> Result<CopilotReply, AppError> {
            Ok(CopilotReply::default())
        }
    }

    /// Router over a pool that never connects; only handlers without DB access may be hit.
    fn test_router() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/rfp_test")
            .unwrap();
        build_router(AppState {
            db,
            copilot: Arc::new(SilentCopilot),
        })
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_schedule_endpoint_returns_envelope() {
        let (status, body) = post_json(
            "/api/v1/timeline/schedule",
            json!({
                "generatedDate": "2025-01-01T00:00:00.000Z",
                "timeline": "Phase 1: A (2 weeks) Phase 2: B (3 weeks)"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["startDate"], "2025-01-01T00:00:00.000Z");
        assert_eq!(body["endDate"], "2025-02-05T00:00:00.000Z");
        assert_eq!(body["phases"].as_array().unwrap().len(), 2);
        assert_eq!(body["phases"][1]["startDate"], "2025-01-15T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_schedule_endpoint_echoes_canonical_generated_date() {
        let generated = "2025-05-17T13:14:15.250Z";
        let (status, body) = post_json(
            "/api/v1/timeline/schedule",
            json!({"generatedDate": generated, "timeline": "Phase 1: Build (6 weeks)"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["startDate"], generated);
        assert_eq!(body["phases"][0]["startDate"], generated);
    }

    #[tokio::test]
    async fn test_schedule_endpoint_normalizes_other_forms() {
        for generated in ["2025-01-01T00:00:00Z", "2025-01-01T09:00:00+09:00", "2025-01-01"] {
            let (status, body) = post_json(
                "/api/v1/timeline/schedule",
                json!({"generatedDate": generated, "timeline": ""}),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["startDate"], "2025-01-01T00:00:00.000Z");
            assert_eq!(body["phases"][0]["startDate"], body["startDate"]);
        }
    }

    #[tokio::test]
    async fn test_schedule_endpoint_rejects_bad_date() {
        let (status, body) = post_json(
            "/api/v1/timeline/schedule",
            json!({"generatedDate": "soon", "timeline": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_duration_endpoint_sums_annotations() {
        let (status, body) = post_json(
            "/api/v1/timeline/duration",
            json!({"timeline": "Setup (2 weeks) and rollout (3-4 weeks)"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalWeeks"], 6);
    }
}
