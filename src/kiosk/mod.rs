pub mod flow;
pub mod screen;

use crate::db::VoteStore;
use crate::error::{DisplayError, KioskError};
use crate::i18n::{Language, LanguageContext};
use crate::models::{NewVote, VoteOption, VoteReceipt};
use crate::tasks::kiosk_reset;
use async_trait::async_trait;
use flow::VotingFlow;
use log::{error, info, warn};
use screen::{KioskScreen, KioskView};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Where a kiosk draws itself: a Discord message in production.
#[async_trait]
pub trait KioskDisplay: Send + Sync {
    async fn show(&self, screen: &KioskScreen) -> Result<(), DisplayError>;
    async fn remove(&self) -> Result<(), DisplayError>;
}

struct KioskState {
    flow: VotingFlow,
    language: LanguageContext,
    options: Vec<VoteOption>,
    choosing_language: bool,
    reset_task: Option<JoinHandle<()>>,
    closed: bool,
}

/// One live kiosk. State changes and redraws happen under one lock so the
/// display never shows screens out of order.
pub struct Kiosk {
    id: u64,
    channel_id: u64,
    brand: String,
    store: Arc<dyn VoteStore>,
    display: Arc<dyn KioskDisplay>,
    state: Mutex<KioskState>,
}

impl Kiosk {
    pub fn new(
        id: u64,
        channel_id: u64,
        brand: String,
        language: Language,
        store: Arc<dyn VoteStore>,
        display: Arc<dyn KioskDisplay>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            channel_id,
            brand,
            store,
            display,
            state: Mutex::new(KioskState {
                flow: VotingFlow::default(),
                language: LanguageContext::new(language),
                options: Vec::new(),
                choosing_language: false,
                reset_task: None,
                closed: false,
            }),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    fn render(&self, state: &KioskState) -> KioskScreen {
        screen::render(&KioskView {
            flow: &state.flow,
            language: state.language.language(),
            options: &state.options,
            choosing_language: state.choosing_language,
            brand: &self.brand,
        })
    }

    async fn draw(&self, state: &KioskState) {
        if state.closed {
            return;
        }
        let screen = self.render(state);
        if let Err(e) = self.display.show(&screen).await {
            warn!("Failed to redraw kiosk {}: {}", self.id, e);
        }
    }

    #[cfg(test)]
    pub async fn screen(&self) -> KioskScreen {
        let state = self.state.lock().await;
        self.render(&state)
    }

    #[cfg(test)]
    pub async fn language(&self) -> Language {
        self.state.lock().await.language.language()
    }

    /// Reloads the voter-facing options without redrawing. A failed read is
    /// logged and the previous options stay on screen.
    pub async fn load_options(&self) -> bool {
        match self.store.active_options().await {
            Ok(options) => {
                self.state.lock().await.options = options;
                true
            }
            Err(e) => {
                error!("Kiosk {} could not load options: {}", self.id, e);
                false
            }
        }
    }

    pub async fn reload_options(&self) {
        self.load_options().await;
        let state = self.state.lock().await;
        self.draw(&state).await;
    }

    pub async fn show_language_selector(&self) {
        let mut state = self.state.lock().await;
        if !state.flow.is_browsing() {
            return;
        }
        state.choosing_language = true;
        self.draw(&state).await;
    }

    pub async fn choose_language(&self, language: Language) {
        let mut state = self.state.lock().await;
        if !state.flow.is_browsing() {
            return;
        }
        state.language.set(language);
        state.choosing_language = false;
        state.flow.clear_notice();
        self.draw(&state).await;
    }

    /// Records a vote for `option_id`. On success the kiosk shows its
    /// confirmation and schedules the reset; on a store failure it returns to
    /// the option list with an error notice.
    pub async fn vote(
        self: &Arc<Self>,
        option_id: &str,
        origin: Option<String>,
    ) -> Result<VoteReceipt, KioskError> {
        let submission = {
            let mut state = self.state.lock().await;
            if !state.options.iter().any(|o| o.id == option_id) {
                return Err(KioskError::UnknownOption(option_id.to_string()));
            }
            let submission = state.flow.begin(option_id)?;
            state.choosing_language = false;
            self.draw(&state).await;
            submission
        };

        let vote = NewVote {
            vote_option_id: submission.option_id.clone(),
            request_id: submission.request_id,
            origin,
        };
        let outcome = self.store.record_vote(&vote).await;

        let mut state = self.state.lock().await;
        match outcome {
            Ok(receipt) => {
                info!(
                    "Kiosk {} recorded vote for option {} (request {}, {:?})",
                    self.id, submission.option_id, submission.request_id, receipt
                );
                if let Some(generation) = state.flow.confirm() {
                    if let Some(previous) = state.reset_task.take() {
                        previous.abort();
                    }
                    if !state.closed {
                        state.reset_task = Some(kiosk_reset::schedule(Arc::clone(self), generation));
                    }
                }
                self.draw(&state).await;
                Ok(receipt)
            }
            Err(e) => {
                error!("Kiosk {} failed to record vote: {}", self.id, e);
                state.flow.fail();
                self.draw(&state).await;
                Err(KioskError::Store(e))
            }
        }
    }

    /// Called by the reset timer. Returns whether the kiosk went back to
    /// browsing.
    pub async fn reset_after_confirmation(&self, generation: u64) -> bool {
        let mut state = self.state.lock().await;
        if !state.flow.reset(generation) {
            return false;
        }
        state.reset_task = None;
        self.draw(&state).await;
        true
    }

    /// Cancels a pending reset and takes the kiosk off its display.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if let Some(task) = state.reset_task.take() {
            task.abort();
        }
        state.closed = true;
        if let Err(e) = self.display.remove().await {
            warn!("Failed to remove kiosk {}: {}", self.id, e);
        }
        info!("Kiosk {} closed", self.id);
    }
}

/// Kiosks alive in this process, keyed by the id of the message they live
/// in.
pub struct KioskRegistry {
    kiosks: RwLock<HashMap<u64, Arc<Kiosk>>>,
    store: Arc<dyn VoteStore>,
    brand: String,
    default_language: Language,
}

impl KioskRegistry {
    pub fn new(store: Arc<dyn VoteStore>, brand: String, default_language: Language) -> Self {
        Self {
            kiosks: RwLock::new(HashMap::new()),
            store,
            brand,
            default_language,
        }
    }

    fn build(&self, id: u64, channel_id: u64, display: Arc<dyn KioskDisplay>) -> Arc<Kiosk> {
        Kiosk::new(
            id,
            channel_id,
            self.brand.clone(),
            self.default_language,
            Arc::clone(&self.store),
            display,
        )
    }

    /// Registers a freshly posted kiosk and draws it.
    pub async fn open(&self, id: u64, channel_id: u64, display: Arc<dyn KioskDisplay>) -> Arc<Kiosk> {
        let kiosk = self.build(id, channel_id, display);
        self.kiosks.write().await.insert(id, Arc::clone(&kiosk));
        kiosk.reload_options().await;
        info!("Kiosk {} opened in channel {}", id, channel_id);
        kiosk
    }

    /// The kiosk living in message `id`. Kiosk messages outlive the
    /// process, so an unknown id is adopted with fresh state.
    pub async fn get_or_attach<F>(&self, id: u64, channel_id: u64, display: F) -> Arc<Kiosk>
    where
        F: FnOnce() -> Arc<dyn KioskDisplay>,
    {
        if let Some(kiosk) = self.kiosks.read().await.get(&id) {
            return Arc::clone(kiosk);
        }
        let mut kiosks = self.kiosks.write().await;
        if let Some(kiosk) = kiosks.get(&id) {
            return Arc::clone(kiosk);
        }
        let kiosk = self.build(id, channel_id, display());
        kiosks.insert(id, Arc::clone(&kiosk));
        drop(kiosks);
        info!("Adopted kiosk message {} in channel {}", id, channel_id);
        kiosk.load_options().await;
        kiosk
    }

    /// Reloads options on every kiosk, e.g. after an option was edited.
    pub async fn refresh_all(&self) {
        let kiosks: Vec<Arc<Kiosk>> = self.kiosks.read().await.values().cloned().collect();
        for kiosk in kiosks {
            kiosk.reload_options().await;
        }
    }

    /// Closes every kiosk in `channel_id` and returns how many there were.
    pub async fn close_channel(&self, channel_id: u64) -> usize {
        let closing: Vec<Arc<Kiosk>> = {
            let mut kiosks = self.kiosks.write().await;
            let ids: Vec<u64> = kiosks
                .values()
                .filter(|k| k.channel_id() == channel_id)
                .map(|k| k.id())
                .collect();
            ids.iter().filter_map(|id| kiosks.remove(id)).collect()
        };
        for kiosk in &closing {
            kiosk.close().await;
        }
        closing.len()
    }
}
