use crate::{
    filter::filter_ads,
    models::{Ad, Advertiser},
    view::{ViewParams, ViewState},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::run_tag_job;

/// An ad together with its resolved advertiser.
#[derive(Serialize)]
struct AdView<'a> {
    #[serde(flatten)]
    ad: &'a Ad,
    advertiser: &'a Advertiser,
}

#[derive(Serialize)]
struct TagsResponse {
    ad_id: String,
    tags: Vec<String>,
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Ad not found" })),
    )
        .into_response()
}

/// GET /api/ads
/// Same filter params as the library page. Ads whose advertiser does not
/// resolve are left out, as in the grid.
pub async fn list_ads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Response {
    let view = ViewState::from(params);
    let catalog = &state.catalog;

    let ads: Vec<AdView> = filter_ads(catalog.ads(), catalog.advertisers_by_id(), &view.filters)
        .into_iter()
        .filter_map(|ad| {
            catalog
                .advertiser(&ad.advertiser_id)
                .map(|advertiser| AdView { ad, advertiser })
        })
        .collect();

    Json(ads).into_response()
}

/// GET /api/ads/:id
pub async fn get_ad(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let catalog = &state.catalog;
    match catalog
        .ad(&id)
        .and_then(|ad| catalog.advertiser(&ad.advertiser_id).map(|adv| (ad, adv)))
    {
        Some((ad, advertiser)) => Json(AdView { ad, advertiser }).into_response(),
        None => not_found(),
    }
}

/// POST /api/ads/:id/tags
/// 409 while another tag request for the same ad is in flight.
pub async fn generate_tags(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Some(ad) = state.catalog.ad(&id) else {
        return not_found();
    };

    let Some(guard) = state.tag_jobs.try_start(&id) else {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Tag generation already in progress" })),
        )
            .into_response();
    };

    let tags = run_tag_job(&state.tagger, ad, guard).await;
    Json(TagsResponse { ad_id: id, tags }).into_response()
}

#[cfg(test)]
mod tests {
    use crate::tags::MISSING_KEY_TAGS;
    use crate::test_support::{body_string, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn call(state: std::sync::Arc<crate::AppState>, method: &str, uri: &str) -> (StatusCode, Value) {
        let resp = crate::router(state)
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = body_string(resp).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn list_applies_filters() {
        let (status, body) = call(test_state(), "GET", "/api/ads").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 50);

        let (_, body) = call(test_state(), "GET", "/api/ads?status=expired&country=US").await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["ad_0", "ad_20", "ad_40"]);
    }

    #[tokio::test]
    async fn get_ad_includes_advertiser() {
        let (status, body) = call(test_state(), "GET", "/api/ads/ad_12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ad_id"], "meta_ad_2012");
        assert_eq!(body["creative_type"], "video");
        assert_eq!(body["status"], "expired");
        assert_eq!(body["advertiser"]["id"], "adv_2");
        assert_eq!(body["advertiser"]["country"], "GB");
    }

    #[tokio::test]
    async fn unknown_ad_is_404() {
        let (status, body) = call(test_state(), "GET", "/api/ads/ad_x").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Ad not found");

        let (status, _) = call(test_state(), "POST", "/api/ads/ad_x/tags").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn tags_without_credential_are_the_mock_list() {
        let (status, body) = call(test_state(), "POST", "/api/ads/ad_5/tags").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ad_id"], "ad_5");
        let tags: Vec<&str> = body["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap())
            .collect();
        assert_eq!(tags, MISSING_KEY_TAGS);
    }

    #[tokio::test]
    async fn concurrent_request_for_same_ad_conflicts() {
        let state = test_state();
        let guard = state.tag_jobs.try_start("ad_5").unwrap();
        let (status, _) = call(state.clone(), "POST", "/api/ads/ad_5/tags").await;
        assert_eq!(status, StatusCode::CONFLICT);

        drop(guard);
        let (status, _) = call(state, "POST", "/api/ads/ad_5/tags").await;
        assert_eq!(status, StatusCode::OK);
    }
}
