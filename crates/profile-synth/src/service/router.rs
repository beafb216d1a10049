use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::{ProfileService, ProfileServiceError};
use crate::generation::{GenerationRequest, InputError, PostalLookup};

/// Router exposing batch generation; replies with the export as an
/// attachment.
pub fn profile_router<L>(service: Arc<ProfileService<L>>) -> Router
where
    L: PostalLookup + 'static,
{
    Router::new()
        .route("/api/v1/profiles", post(generate_handler::<L>))
        .with_state(service)
}

pub(crate) async fn generate_handler<L>(
    State(service): State<Arc<ProfileService<L>>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Response
where
    L: PostalLookup + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = InputError::MalformedRequest(rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, &error);
        }
    };

    match service.generate(request).await {
        Ok(batch) => {
            let disposition = format!("attachment; filename=\"{}\"", batch.file_name);
            let disposition = HeaderValue::from_str(&disposition)
                .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
            let content_type = HeaderValue::from_str(batch.format.content_type().as_ref())
                .unwrap_or_else(|_| HeaderValue::from_static("text/plain"));

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                batch.body,
            )
                .into_response()
        }
        Err(ProfileServiceError::Input(error)) => error_response(StatusCode::BAD_REQUEST, &error),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other),
    }
}

fn error_response(status: StatusCode, error: &dyn std::error::Error) -> Response {
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{LookupFailure, NameRegistry, ProfileGenerator, ReferenceTables};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct OfflineLookup;

    impl PostalLookup for OfflineLookup {
        async fn lookup_zip(&self, _city: &str, _state: &str) -> Result<String, LookupFailure> {
            Err(LookupFailure::Transport("offline".to_string()))
        }
    }

    fn router() -> Router {
        let generator = ProfileGenerator::new(
            ReferenceTables::default(),
            NameRegistry::in_memory(),
            OfflineLookup,
        )
        .expect("generator")
        .with_seed(17);
        profile_router(Arc::new(ProfileService::new(generator)))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/profiles")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn returns_csv_attachment() {
        let response = router()
            .oneshot(post_json(
                r#"{"generated_for":"QA Team","gender":"Male","count":4,"format":"CSV"}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .expect("disposition header")
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"QA_Team_"));
        assert!(disposition.ends_with(".csv\""));

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        assert_eq!(text.lines().count(), 5);
    }

    async fn error_message(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json error body");
        payload["error"].as_str().expect("error message").to_string()
    }

    #[tokio::test]
    async fn rejects_blank_requester() {
        let response = router()
            .oneshot(post_json(r#"{"generated_for":"  ","gender":"Female"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.contains("must not be empty"));
    }

    #[tokio::test]
    async fn out_of_range_count_is_a_bad_request() {
        let response = router()
            .oneshot(post_json(
                r#"{"generated_for":"QA","gender":"Male","count":20000}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.contains("outside 1..=10000"));
    }

    #[tokio::test]
    async fn unknown_gender_is_a_bad_request() {
        let response = router()
            .oneshot(post_json(r#"{"generated_for":"QA","gender":"Robot"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.contains("'Robot'"));
    }

    #[tokio::test]
    async fn unparsable_body_is_a_bad_request() {
        let response = router()
            .oneshot(post_json(r#"{"generated_for":"QA","#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.starts_with("malformed request"));
    }

    #[tokio::test]
    async fn gender_accepts_short_and_mixed_case_forms() {
        for gender in ["mAlE", "f"] {
            let body = format!(r#"{{"generated_for":"QA","gender":"{gender}","count":1}}"#);
            let response = router()
                .oneshot(post_json(&body))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK, "gender {gender}");
        }
    }

    #[tokio::test]
    async fn requester_cannot_escape_the_attachment_name() {
        let response = router()
            .oneshot(post_json(
                r#"{"generated_for":"QA Say \"hi\" ../Zoë","gender":"Male","count":1}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .expect("disposition header")
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"QA_Say__hi__.._Zo__"));
        assert_eq!(disposition.matches('"').count(), 2);
        assert!(!disposition.contains('/'));
    }
}
