//! In-process store for kiosk tests that run on paused tokio time, where a
//! SQLite worker thread would let the clock race ahead.

use super::VoteStore;
use crate::error::StoreError;
use crate::models::{NewVote, OptionForm, VoteOption, VoteReceipt, VoteRow};
use crate::voting::window::UtcBounds;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    options: Mutex<Vec<VoteOption>>,
    votes: Mutex<Vec<NewVote>>,
    fail_votes: AtomicBool,
}

impl MemoryStore {
    pub fn with_options(options: Vec<VoteOption>) -> Self {
        Self {
            options: Mutex::new(options),
            ..Self::default()
        }
    }

    pub fn fail_votes(&self, fail: bool) {
        self.fail_votes.store(fail, Ordering::SeqCst);
    }

    pub fn recorded(&self) -> Vec<NewVote> {
        self.votes.lock().unwrap().clone()
    }
}

pub fn option(id: &str, order: i64, active: bool) -> VoteOption {
    let now = Utc::now();
    VoteOption {
        id: id.to_string(),
        text_pt: format!("{} pt", id),
        text_es: format!("{} es", id),
        text_en: format!("{} en", id),
        is_active: active,
        display_order: order,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn active_options(&self) -> Result<Vec<VoteOption>, StoreError> {
        Ok(self.all_options().await?.into_iter().filter(|o| o.is_active).collect())
    }

    async fn all_options(&self) -> Result<Vec<VoteOption>, StoreError> {
        let mut options = self.options.lock().unwrap().clone();
        options.sort_by_key(|o| o.display_order);
        Ok(options)
    }

    async fn option(&self, id: &str) -> Result<VoteOption, StoreError> {
        self.options
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create_option(&self, form: &OptionForm) -> Result<VoteOption, StoreError> {
        let mut options = self.options.lock().unwrap();
        let order = options.iter().map(|o| o.display_order).max().unwrap_or(0) + 1;
        let mut created = option(&Uuid::new_v4().to_string(), order, form.is_active);
        created.text_pt = form.text_pt.clone();
        created.text_es = form.text_es.clone();
        created.text_en = form.text_en.clone();
        options.push(created.clone());
        Ok(created)
    }

    async fn update_option(&self, id: &str, form: &OptionForm) -> Result<VoteOption, StoreError> {
        let mut options = self.options.lock().unwrap();
        let existing = options
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        existing.text_pt = form.text_pt.clone();
        existing.text_es = form.text_es.clone();
        existing.text_en = form.text_en.clone();
        existing.is_active = form.is_active;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_option(&self, id: &str) -> Result<(), StoreError> {
        let mut options = self.options.lock().unwrap();
        let before = options.len();
        options.retain(|o| o.id != id);
        if options.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn record_vote(&self, vote: &NewVote) -> Result<VoteReceipt, StoreError> {
        if self.fail_votes.load(Ordering::SeqCst) {
            return Err(StoreError::Corrupt("injected failure".to_string()));
        }
        let mut votes = self.votes.lock().unwrap();
        if votes.iter().any(|v| v.request_id == vote.request_id) {
            return Ok(VoteReceipt::Duplicate);
        }
        votes.push(vote.clone());
        Ok(VoteReceipt::Recorded)
    }

    async fn votes_with_options(&self, _bounds: UtcBounds) -> Result<Vec<VoteRow>, StoreError> {
        let options = self.options.lock().unwrap();
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter_map(|v| options.iter().find(|o| o.id == v.vote_option_id))
            .map(VoteRow::for_option)
            .collect())
    }
}
