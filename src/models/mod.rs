use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A selectable answer to the kiosk question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteOption {
    pub id: String,
    pub text_pt: String,
    pub text_es: String,
    pub text_en: String,
    pub is_active: bool,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The shared create/edit form for an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionForm {
    pub text_pt: String,
    pub text_es: String,
    pub text_en: String,
    pub is_active: bool,
}

impl Default for OptionForm {
    fn default() -> Self {
        Self {
            text_pt: String::new(),
            text_es: String::new(),
            text_en: String::new(),
            is_active: true,
        }
    }
}

impl From<&VoteOption> for OptionForm {
    fn from(option: &VoteOption) -> Self {
        Self {
            text_pt: option.text_pt.clone(),
            text_es: option.text_es.clone(),
            text_en: option.text_en.clone(),
            is_active: option.is_active,
        }
    }
}

/// A vote about to be inserted. `request_id` is minted once per kiosk
/// submission so a retried insert is recognised by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub vote_option_id: String,
    pub request_id: Uuid,
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteReceipt {
    Recorded,
    /// The request id had already been recorded; nothing new was written.
    Duplicate,
}

/// A vote joined with the labels of the option it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRow {
    pub vote_option_id: String,
    pub text_pt: String,
    pub text_es: String,
    pub text_en: String,
}

impl VoteRow {
    pub fn for_option(option: &VoteOption) -> Self {
        Self {
            vote_option_id: option.id.clone(),
            text_pt: option.text_pt.clone(),
            text_es: option.text_es.clone(),
            text_en: option.text_en.clone(),
        }
    }
}
