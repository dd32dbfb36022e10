use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Ad, AdStatus, Advertiser, CreativeType, SpendEstimate};

const COUNTRIES: [&str; 5] = ["US", "BR", "GB", "CA", "AU"];
const VIDEO_URL: &str = "https://dummy-media.s3.amazonaws.com/video.mp4";

/// The session's read-only data set: every advertiser and ad, plus the
/// advertiser-by-id lookup built once at load.
#[derive(Debug, Clone)]
pub struct Catalog {
    advertisers: Vec<Advertiser>,
    ads: Vec<Ad>,
    by_id: HashMap<String, Advertiser>,
}

impl Catalog {
    pub fn new(advertisers: Vec<Advertiser>, ads: Vec<Ad>) -> Self {
        let by_id = advertisers
            .iter()
            .map(|a| (a.id.clone(), a.clone()))
            .collect();
        Self {
            advertisers,
            ads,
            by_id,
        }
    }

    /// Synthesize the fixed demo catalog: 10 advertisers, 50 ads.
    pub fn mock() -> Self {
        let catalog = Self::new(mock_advertisers(10), mock_ads(50, 10));
        tracing::info!(
            "Catalog loaded with {} advertiser(s) and {} ad(s)",
            catalog.advertisers().len(),
            catalog.ads().len()
        );
        catalog
    }

    pub fn ads(&self) -> &[Ad] {
        &self.ads
    }

    pub fn advertisers(&self) -> &[Advertiser] {
        &self.advertisers
    }

    pub fn advertisers_by_id(&self) -> &HashMap<String, Advertiser> {
        &self.by_id
    }

    pub fn ad(&self, id: &str) -> Option<&Ad> {
        self.ads.iter().find(|ad| ad.id == id)
    }

    pub fn advertiser(&self, id: &str) -> Option<&Advertiser> {
        self.by_id.get(id)
    }
}

fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, month, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

fn mock_advertisers(count: usize) -> Vec<Advertiser> {
    (0..count)
        .map(|i| Advertiser {
            id: format!("adv_{i}"),
            page_id: (1000 + i).to_string(),
            name: format!("Advertiser {} Inc.", (b'A' + (i % 26) as u8) as char),
            verified: i % 2 == 0,
            country: COUNTRIES[i % COUNTRIES.len()].into(),
            first_seen: at(1, 15, 10),
            last_seen: at(10, 20, 18),
            avatar_url: format!("https://picsum.photos/seed/{}/40/40", 1000 + i),
        })
        .collect()
}

fn mock_ads(count: usize, advertisers: usize) -> Vec<Ad> {
    (0..count)
        .map(|i| {
            let n = i as u64 + 1;
            let creative_type = match i % 3 {
                0 => CreativeType::Video,
                1 => CreativeType::Image,
                _ => CreativeType::Carousel,
            };
            let media_url = match creative_type {
                CreativeType::Video => VIDEO_URL.to_owned(),
                CreativeType::Image | CreativeType::Carousel => {
                    format!("https://picsum.photos/seed/{i}/500/500")
                }
            };
            let status = if i % 4 == 0 {
                AdStatus::Expired
            } else {
                AdStatus::Active
            };
            let month = (i % 9) as u32 + 1;
            let end_time = match status {
                AdStatus::Expired => Some(at(month + 1, 1, 12)),
                AdStatus::Active => None,
            };
            let tags = if i % 2 == 0 {
                vec!["E-commerce".to_owned(), "Promotion".to_owned()]
            } else {
                vec!["Brand Awareness".to_owned(), "Lifestyle".to_owned()]
            };

            Ad {
                id: format!("ad_{i}"),
                ad_id: format!("meta_ad_{}", 2000 + i),
                advertiser_id: format!("adv_{}", i % advertisers),
                title: format!("Amazing Product Offer {n}"),
                body: format!(
                    "Check out our new line of products. This is creative number {n} with a special discount just for you. Don't miss out! #specialoffer"
                ),
                landing_url: "https://example.com".into(),
                creative_type,
                media_url,
                status,
                start_time: at(month, 1, 12),
                end_time,
                spend_estimate: SpendEstimate {
                    min: 100 * n,
                    max: 500 * n,
                    currency: "USD".into(),
                },
                tags,
            }
        })
        .collect()
}
