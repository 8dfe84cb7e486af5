use crate::error::FlowError;
use std::time::Duration;
use uuid::Uuid;

/// How long the thank-you screen stays up before the kiosk resets.
pub const RESET_DELAY: Duration = Duration::from_secs(3);

/// Message shown above the options after something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SubmitFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Browsing { notice: Option<Notice> },
    Submitting { option_id: String, request_id: Uuid },
    Confirmed { generation: u64 },
}

/// A vote that has been started and must now be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub option_id: String,
    pub request_id: Uuid,
}

/// browsing → submitting → confirmed → browsing, with submitting falling
/// back to browsing (plus a notice) when the store rejects the vote.
#[derive(Debug, Clone)]
pub struct VotingFlow {
    state: FlowState,
    generation: u64,
}

impl Default for VotingFlow {
    fn default() -> Self {
        Self {
            state: FlowState::Browsing { notice: None },
            generation: 0,
        }
    }
}

impl VotingFlow {
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_browsing(&self) -> bool {
        matches!(self.state, FlowState::Browsing { .. })
    }

    /// The option currently being submitted, if any.
    pub fn selected(&self) -> Option<&str> {
        match &self.state {
            FlowState::Submitting { option_id, .. } => Some(option_id),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        match self.state {
            FlowState::Browsing { notice } => notice,
            _ => None,
        }
    }

    /// Starts a vote. Only accepted while browsing; each accepted vote gets
    /// its own request id.
    pub fn begin(&mut self, option_id: &str) -> Result<Submission, FlowError> {
        if !self.is_browsing() {
            return Err(FlowError::NotBrowsing);
        }
        let submission = Submission {
            option_id: option_id.to_string(),
            request_id: Uuid::new_v4(),
        };
        self.state = FlowState::Submitting {
            option_id: submission.option_id.clone(),
            request_id: submission.request_id,
        };
        Ok(submission)
    }

    /// The store accepted the vote. Returns the generation a reset timer
    /// must present to clear this confirmation.
    pub fn confirm(&mut self) -> Option<u64> {
        if !matches!(self.state, FlowState::Submitting { .. }) {
            return None;
        }
        self.generation += 1;
        self.state = FlowState::Confirmed {
            generation: self.generation,
        };
        Some(self.generation)
    }

    /// The store rejected the vote; back to browsing with the error shown.
    pub fn fail(&mut self) {
        if matches!(self.state, FlowState::Submitting { .. }) {
            self.state = FlowState::Browsing {
                notice: Some(Notice::SubmitFailed),
            };
        }
    }

    /// Clears the confirmation scheduled as `generation`. Stale timers are
    /// ignored.
    pub fn reset(&mut self, generation: u64) -> bool {
        match self.state {
            FlowState::Confirmed { generation: current } if current == generation => {
                self.state = FlowState::Browsing { notice: None };
                true
            }
            _ => false,
        }
    }

    /// Drops a stale error notice, e.g. after a language switch.
    pub fn clear_notice(&mut self) {
        if let FlowState::Browsing { notice } = &mut self.state {
            *notice = None;
        }
    }
}
