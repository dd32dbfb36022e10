use std::collections::HashMap;

use crate::models::{Ad, Advertiser, FilterState, ALL_COUNTRIES};

/// Return the ads that satisfy every clause of `filters`, in input order.
///
/// - query: empty, or a case-insensitive substring of the body, the title,
///   or the resolved advertiser's name
/// - country: `"ALL"`, or exactly the resolved advertiser's country
/// - status: `all`, or exactly the ad's status
/// - ad type: always passes
///
/// An advertiser id that does not resolve fails the name and country
/// clauses only.
pub fn filter_ads<'a>(
    ads: &'a [Ad],
    advertisers: &HashMap<String, Advertiser>,
    filters: &FilterState,
) -> Vec<&'a Ad> {
    let query = filters.query.to_lowercase();

    ads.iter()
        .filter(|ad| {
            let advertiser = advertisers.get(&ad.advertiser_id);
            matches_query(ad, advertiser, &query)
                && matches_country(advertiser, &filters.country)
                && filters.status.matches(ad.status)
        })
        .collect()
}

fn matches_query(ad: &Ad, advertiser: Option<&Advertiser>, query: &str) -> bool {
    query.is_empty()
        || ad.body.to_lowercase().contains(query)
        || ad.title.to_lowercase().contains(query)
        || advertiser.is_some_and(|a| a.name.to_lowercase().contains(query))
}

fn matches_country(advertiser: Option<&Advertiser>, country: &str) -> bool {
    country == ALL_COUNTRIES || advertiser.is_some_and(|a| a.country == country)
}
