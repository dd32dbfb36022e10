use dashmap::DashMap;
use std::sync::Arc;

/// Busy flags for tag requests, keyed by ad id. At most one tag request per
/// ad is in flight; the flag clears when the returned guard drops.
#[derive(Clone, Debug, Default)]
pub struct TagJobs {
    inner: Arc<DashMap<String, ()>>,
}

impl TagJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `ad_id` busy. Returns `None` if a request is already running.
    pub fn try_start(&self, ad_id: &str) -> Option<TagJobGuard> {
        use dashmap::mapref::entry::Entry;
        match self.inner.entry(ad_id.to_owned()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(TagJobGuard {
                    jobs: self.inner.clone(),
                    ad_id: ad_id.to_owned(),
                })
            }
        }
    }

    pub fn is_busy(&self, ad_id: &str) -> bool {
        self.inner.contains_key(ad_id)
    }
}

#[derive(Debug)]
pub struct TagJobGuard {
    jobs: Arc<DashMap<String, ()>>,
    ad_id: String,
}

impl Drop for TagJobGuard {
    fn drop(&mut self) {
        self.jobs.remove(&self.ad_id);
    }
}
