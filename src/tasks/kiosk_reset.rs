use crate::kiosk::flow::RESET_DELAY;
use crate::kiosk::Kiosk;
use log::debug;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Puts the kiosk back on its option list once the thank-you screen has
/// been up for `RESET_DELAY`. Aborting the handle cancels the reset.
pub fn schedule(kiosk: Arc<Kiosk>, generation: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(RESET_DELAY).await;
        if kiosk.reset_after_confirmation(generation).await {
            debug!("Kiosk {} reset after confirmation {}", kiosk.id(), generation);
        }
    })
}
