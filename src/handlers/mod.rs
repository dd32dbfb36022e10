pub mod api;
pub mod library;

use crate::{jobs::TagJobGuard, models::Ad, tags::Tagger};

/// Shown in place of generated tags if the tagging task dies.
pub const TAG_TASK_FAILED: &str = "Error generating tags";

/// Run one tag request on its own task. The busy flag is held until the call
/// resolves, even if the requesting client has gone away; in that case the
/// result is dropped.
pub(crate) async fn run_tag_job(tagger: &Tagger, ad: &Ad, guard: TagJobGuard) -> Vec<String> {
    let tagger = tagger.clone();
    let body = ad.body.clone();
    let title = ad.title.clone();
    let ad_id = ad.id.clone();

    let task = tokio::spawn(async move {
        let _guard = guard;
        tagger.generate_tags(&body, &title).await
    });

    match task.await {
        Ok(tags) => tags,
        Err(e) => {
            tracing::error!("Tag task for ad {} failed: {}", ad_id, e);
            vec![TAG_TASK_FAILED.to_owned()]
        }
    }
}
