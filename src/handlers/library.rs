use crate::{
    filter::filter_ads,
    models::{Ad, AdType, Advertiser, StatusFilter, ALL_COUNTRIES},
    view::{View, ViewParams, ViewState},
    AppState,
};
use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::run_tag_job;

// ── Static view data ───────────────────────────────────────────────────────

const COUNTRY_OPTIONS: [(&str, &str); 6] = [
    (ALL_COUNTRIES, "All Countries"),
    ("US", "United States"),
    ("BR", "Brazil"),
    ("GB", "United Kingdom"),
    ("CA", "Canada"),
    ("AU", "Australia"),
];

// (country, active, expired)
const STATUS_BY_COUNTRY: [(&str, u32, u32); 5] = [
    ("USA", 4000, 2400),
    ("Brazil", 3000, 1398),
    ("UK", 2000, 9800),
    ("Canada", 2780, 3908),
    ("Australia", 1890, 4800),
];

const TOP_ADVERTISERS: [&str; 5] = [
    "BrandX",
    "E-Shop Global",
    "FitLife",
    "LearnFast",
    "Gourmet Delivered",
];

const TOP_KEYWORDS: [&str; 6] = [
    "Fitness",
    "Summer Sale",
    "Free Shipping",
    "AI Tools",
    "Healthy Recipes",
    "Online Course",
];

// ── Template structs ───────────────────────────────────────────────────────

struct SelectOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

struct Card {
    ad: Ad,
    advertiser: Advertiser,
}

struct Detail {
    ad: Ad,
    advertiser: Advertiser,
    // Ad tags followed by any generated ones; never written back.
    tags: Vec<String>,
    tagging: bool,
    model: String,
}

struct ChartRow {
    name: &'static str,
    active: u32,
    expired: u32,
    active_pct: u32,
    expired_pct: u32,
}

#[derive(Template)]
#[template(path = "library.html")]
struct LibraryTemplate {
    state: ViewState,
    countries: Vec<SelectOption>,
    ad_types: Vec<SelectOption>,
    statuses: Vec<SelectOption>,
    cards: Vec<Card>,
    detail: Option<Detail>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    state: ViewState,
    chart: Vec<ChartRow>,
    top_advertisers: Vec<&'static str>,
    top_keywords: Vec<&'static str>,
}

/// Result of a tag request made while rendering the overlay.
enum TagOutcome {
    Busy,
    Generated(Vec<String>),
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /
/// Render whichever view the state params name; the library by default.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Response {
    render(&state, ViewState::from(params), None)
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Response {
    render(&state, ViewState::from(params).navigate(View::Dashboard), None)
}

/// POST /ads/:id/tags
/// Generate AI tags for one ad and re-render the library with its overlay
/// open. A second request for the same ad while one is in flight renders the
/// disabled "Analyzing..." state instead of calling out again.
pub async fn generate_tags(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(params): Form<ViewParams>,
) -> Response {
    let Some(ad) = state.catalog.ad(&id) else {
        return (StatusCode::NOT_FOUND, "Ad not found.").into_response();
    };

    let view = ViewState::from(params).open(id.as_str());

    let outcome = match state.tag_jobs.try_start(&id) {
        Some(guard) => TagOutcome::Generated(run_tag_job(&state.tagger, ad, guard).await),
        None => TagOutcome::Busy,
    };

    render(&state, view, Some(outcome))
}

// ── Rendering ──────────────────────────────────────────────────────────────

fn render(state: &AppState, view: ViewState, outcome: Option<TagOutcome>) -> Response {
    match view.view {
        View::Library => library(state, view, outcome).into_response(),
        View::Dashboard => dashboard_page(view).into_response(),
    }
}

fn library(state: &AppState, view: ViewState, outcome: Option<TagOutcome>) -> LibraryTemplate {
    let catalog = &state.catalog;

    // Cards whose advertiser does not resolve are skipped.
    let cards = filter_ads(catalog.ads(), catalog.advertisers_by_id(), &view.filters)
        .into_iter()
        .filter_map(|ad| {
            catalog.advertiser(&ad.advertiser_id).map(|advertiser| Card {
                ad: ad.clone(),
                advertiser: advertiser.clone(),
            })
        })
        .collect();

    let detail = view.selected.as_deref().and_then(|id| {
        let ad = catalog.ad(id)?;
        let advertiser = catalog.advertiser(&ad.advertiser_id)?;
        let mut tags = ad.tags.clone();
        let tagging = match &outcome {
            Some(TagOutcome::Generated(generated)) => {
                tags.extend(generated.iter().cloned());
                false
            }
            Some(TagOutcome::Busy) => true,
            None => state.tag_jobs.is_busy(id),
        };
        Some(Detail {
            ad: ad.clone(),
            advertiser: advertiser.clone(),
            tags,
            tagging,
            model: state.config.gemini_model.clone(),
        })
    });

    // An id that does not resolve leaves the overlay closed.
    let view = match &detail {
        None if view.selected.is_some() => view.close(),
        _ => view,
    };

    let filters = &view.filters;
    let countries = COUNTRY_OPTIONS
        .iter()
        .map(|&(value, label)| SelectOption {
            value,
            label,
            selected: filters.country == value,
        })
        .collect();
    let ad_types = AdType::OPTIONS
        .iter()
        .map(|&(t, label)| SelectOption {
            value: t.as_str(),
            label,
            selected: filters.ad_type == t,
        })
        .collect();
    let statuses = StatusFilter::OPTIONS
        .iter()
        .map(|&(s, label)| SelectOption {
            value: s.as_str(),
            label,
            selected: filters.status == s,
        })
        .collect();

    LibraryTemplate {
        state: view,
        countries,
        ad_types,
        statuses,
        cards,
        detail,
    }
}

fn dashboard_page(view: ViewState) -> DashboardTemplate {
    let max = STATUS_BY_COUNTRY
        .iter()
        .map(|(_, a, e)| (*a).max(*e))
        .max()
        .unwrap_or(0);

    let chart = STATUS_BY_COUNTRY
        .iter()
        .map(|&(name, active, expired)| ChartRow {
            name,
            active,
            expired,
            active_pct: pct(active, max),
            expired_pct: pct(expired, max),
        })
        .collect();

    DashboardTemplate {
        state: view,
        chart,
        top_advertisers: TOP_ADVERTISERS.to_vec(),
        top_keywords: TOP_KEYWORDS.to_vec(),
    }
}

/// Bar length as a percentage of the tallest bar.
fn pct(value: u32, max: u32) -> u32 {
    if max == 0 {
        0
    } else {
        value * 100 / max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_string, test_state};
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    async fn get(uri: &str) -> (StatusCode, String) {
        let app = crate::router(test_state());
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        (status, body_string(resp).await)
    }

    async fn post_form(uri: &str, form: &str) -> (StatusCode, String) {
        let app = crate::router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        (status, body_string(resp).await)
    }

    fn card_count(html: &str) -> usize {
        html.matches("class=\"ad-card\"").count()
    }

    #[tokio::test]
    async fn index_lists_every_ad() {
        let (status, html) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(card_count(&html), 50);
        assert!(html.contains("Search by keyword, advertiser, URL..."));
        assert!(!html.contains("Ad Details"));
    }

    #[tokio::test]
    async fn query_params_narrow_the_grid() {
        let (_, html) = get("/?query=OFFER+50&country=ALL&status=all").await;
        assert_eq!(card_count(&html), 1);
        assert!(html.contains("Amazing Product Offer 50"));

        let (_, html) = get("/?country=BR&status=expired").await;
        // BR advertisers are adv_1 and adv_6; expired ads are multiples of 4.
        assert_eq!(card_count(&html), 2);
    }

    #[tokio::test]
    async fn selection_opens_the_overlay() {
        let (_, html) = get("/?selected=ad_3").await;
        assert!(html.contains("Ad Details"));
        assert!(html.contains("Page ID: 1003"));
        assert!(html.contains("VIDEO"));
        assert!(html.contains("400 - 2000 USD"));
        assert!(html.contains("Generate Tags"));
        assert!(html.contains("N/A"));
    }

    #[tokio::test]
    async fn unknown_selection_renders_without_overlay() {
        let (status, html) = get("/?selected=ad_999").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("Ad Details"));
    }

    #[tokio::test]
    async fn dashboard_renders_static_analytics() {
        let (status, html) = get("/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Analytics Dashboard"));
        assert!(html.contains("Gourmet Delivered"));
        assert!(html.contains("Online Course"));
        assert!(html.contains("9800"));
        assert_eq!(card_count(&html), 0);

        let (_, via_index) = get("/?view=dashboard").await;
        assert!(via_index.contains("Analytics Dashboard"));
    }

    #[tokio::test]
    async fn tag_request_without_credential_shows_mock_tags() {
        let (status, html) = post_form("/ads/ad_2/tags", "query=&country=ALL").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Ad Details"));
        assert!(html.contains("E-commerce"));
        assert!(html.contains("Mock Tag"));
        assert!(html.contains("AI Analysis"));
    }

    #[tokio::test]
    async fn tag_request_for_unknown_ad_is_404() {
        let (status, _) = post_form("/ads/nope/tags", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn busy_ad_renders_analyzing_state() {
        let state = test_state();
        let _guard = state.tag_jobs.try_start("ad_1").unwrap();
        let app = crate::router(state.clone());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ads/ad_1/tags")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_string(resp).await;
        assert!(html.contains("Analyzing..."));
        assert!(!html.contains("Mock Tag"));
    }

    #[test]
    fn bars_scale_to_tallest() {
        assert_eq!(pct(9800, 9800), 100);
        assert_eq!(pct(4900, 9800), 50);
        assert_eq!(pct(1, 0), 0);
    }
}
