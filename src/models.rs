use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel country value meaning "do not filter by country".
pub const ALL_COUNTRIES: &str = "ALL";

/// An advertiser profile. Created once when the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertiser {
    pub id: String,
    pub page_id: String,
    pub name: String,
    pub verified: bool,
    /// ISO country code, e.g. "US"
    pub country: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreativeType {
    Image,
    Video,
    Carousel,
}

impl CreativeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreativeType::Image => "image",
            CreativeType::Video => "video",
            CreativeType::Carousel => "carousel",
        }
    }

    /// Upper-cased label used in the detail overlay.
    pub fn label(&self) -> &'static str {
        match self {
            CreativeType::Image => "IMAGE",
            CreativeType::Video => "VIDEO",
            CreativeType::Carousel => "CAROUSEL",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, CreativeType::Video)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    Active,
    Expired,
}

impl AdStatus {
    pub fn badge(&self) -> &'static str {
        match self {
            AdStatus::Active => "🟢 Active",
            AdStatus::Expired => "🔴 Expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendEstimate {
    pub min: u64,
    pub max: u64,
    pub currency: String,
}

impl std::fmt::Display for SpendEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} {}", self.min, self.max, self.currency)
    }
}

/// A single ad creative. `advertiser_id` is resolved through
/// [`crate::catalog::Catalog::advertiser`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub id: String,
    pub ad_id: String,
    pub advertiser_id: String,
    pub title: String,
    pub body: String,
    pub landing_url: String,
    pub creative_type: CreativeType,
    pub media_url: String,
    pub status: AdStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub spend_estimate: SpendEstimate,
    pub tags: Vec<String>,
}

impl Ad {
    pub fn start_date(&self) -> String {
        self.start_time.format("%Y-%m-%d").to_string()
    }

    pub fn end_date(&self) -> String {
        self.end_time
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".into())
    }
}

/// Ad category selector. Present in the toolbar but no ad carries a
/// category, so it never narrows the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    #[default]
    All,
    Politics,
    Employment,
    Credit,
    Housing,
}

impl AdType {
    pub const OPTIONS: [(AdType, &'static str); 5] = [
        (AdType::All, "All Ads"),
        (AdType::Politics, "Politics & Issues"),
        (AdType::Employment, "Employment"),
        (AdType::Credit, "Credit"),
        (AdType::Housing, "Housing"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdType::All => "all",
            AdType::Politics => "politics",
            AdType::Employment => "employment",
            AdType::Credit => "credit",
            AdType::Housing => "housing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Expired,
}

impl StatusFilter {
    pub const OPTIONS: [(StatusFilter, &'static str); 3] = [
        (StatusFilter::All, "All Statuses"),
        (StatusFilter::Active, "Active"),
        (StatusFilter::Expired, "Expired"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Expired => "expired",
        }
    }

    pub fn matches(&self, status: AdStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == AdStatus::Active,
            StatusFilter::Expired => status == AdStatus::Expired,
        }
    }
}

/// Active filter criteria for the library view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub query: String,
    pub country: String,
    pub ad_type: AdType,
    pub status: StatusFilter,
    // Carried through the toolbar but not applied.
    pub date_from: String,
    pub date_to: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            country: ALL_COUNTRIES.into(),
            ad_type: AdType::All,
            status: StatusFilter::All,
            date_from: String::new(),
            date_to: String::new(),
        }
    }
}
