pub mod tally;
pub mod window;

use crate::db::VoteStore;
use chrono::FixedOffset;
use log::{error, info};
use tally::Tally;
use window::DateWindow;

/// Fetches the votes inside `window` and counts them. A failed read is
/// logged and shows up as an empty tally.
pub async fn load_results(store: &dyn VoteStore, window: DateWindow, offset: FixedOffset) -> Tally {
    match store.votes_with_options(window.bounds(offset)).await {
        Ok(rows) => {
            let tally = tally::tally(&rows);
            info!(
                "Tallied {} votes across {} options (window {:?})",
                tally.total,
                tally.results.len(),
                window
            );
            tally
        }
        Err(e) => {
            error!("Failed to load votes for results: {}", e);
            Tally::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{NewVote, OptionForm};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    async fn vote(db: &Database, option_id: &str, at: chrono::DateTime<Utc>) {
        let vote = NewVote {
            vote_option_id: option_id.to_string(),
            request_id: Uuid::new_v4(),
            origin: None,
        };
        db.record_vote_at(&vote, at).await.unwrap();
    }

    #[tokio::test]
    async fn window_is_applied_in_local_time() {
        let db = Database::in_memory().await.unwrap();
        let form = |t: &str| OptionForm {
            text_pt: t.to_string(),
            ..OptionForm::default()
        };
        let a = db.create_option(&form("A")).await.unwrap();
        let b = db.create_option(&form("B")).await.unwrap();

        // 2026-05-01 23:30 at -03:00 is already May 2nd in UTC
        vote(&db, &a.id, Utc.with_ymd_and_hms(2026, 5, 2, 2, 30, 0).unwrap()).await;
        vote(&db, &a.id, Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()).await;
        vote(&db, &b.id, Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap()).await;

        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let may_first = NaiveDate::from_ymd_opt(2026, 5, 1);
        let tally = load_results(&db, DateWindow::new(may_first, may_first), offset).await;

        assert_eq!(tally.total, 2);
        assert_eq!(tally.results.len(), 1);
        assert_eq!(tally.results[0].text_pt, "A");

        let everything = load_results(&db, DateWindow::default(), offset).await;
        assert_eq!(everything.total, 3);
        assert_eq!(everything.results[0].option_id, a.id);
    }
}
