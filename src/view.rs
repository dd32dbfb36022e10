use serde::{Deserialize, Serialize};

use crate::models::{AdType, FilterState, StatusFilter, ALL_COUNTRIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Library,
    Dashboard,
}

/// Everything a page render depends on besides the catalog. Each user
/// action produces a new `ViewState`; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub view: View,
    pub filters: FilterState,
    pub selected: Option<String>,
}

impl ViewState {
    pub fn navigate(&self, view: View) -> Self {
        Self {
            view,
            filters: self.filters.clone(),
            selected: match view {
                View::Library => self.selected.clone(),
                View::Dashboard => None,
            },
        }
    }

    pub fn with_filters(&self, filters: FilterState) -> Self {
        Self {
            filters,
            ..self.clone()
        }
    }

    pub fn open(&self, ad_id: impl Into<String>) -> Self {
        Self {
            view: View::Library,
            filters: self.filters.clone(),
            selected: Some(ad_id.into()),
        }
    }

    pub fn close(&self) -> Self {
        Self {
            selected: None,
            ..self.clone()
        }
    }

    pub fn is_library(&self) -> bool {
        self.view == View::Library
    }

    pub fn is_dashboard(&self) -> bool {
        self.view == View::Dashboard
    }
}

/// Flat query-string / form shape of a [`ViewState`]. Every field is
/// optional so a bare `GET /` yields the default state.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewParams {
    pub view: Option<View>,
    pub query: Option<String>,
    pub country: Option<String>,
    pub ad_type: Option<AdType>,
    pub status: Option<StatusFilter>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub selected: Option<String>,
}

impl From<ViewParams> for ViewState {
    fn from(p: ViewParams) -> Self {
        let filters = FilterState {
            query: p.query.unwrap_or_default(),
            country: p
                .country
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| ALL_COUNTRIES.into()),
            ad_type: p.ad_type.unwrap_or_default(),
            status: p.status.unwrap_or_default(),
            date_from: p.date_from.unwrap_or_default(),
            date_to: p.date_to.unwrap_or_default(),
        };
        let state = ViewState::default()
            .navigate(p.view.unwrap_or_default())
            .with_filters(filters);
        match p.selected.filter(|s| !s.is_empty()) {
            Some(id) if state.is_library() => state.open(id),
            _ => state,
        }
    }
}
