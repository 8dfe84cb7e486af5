use super::display::DiscordDisplay;
use crate::error::{FlowError, KioskError};
use crate::i18n::Language;
use crate::kiosk::screen::{LANGUAGES_BUTTON, LANGUAGE_PREFIX, VOTE_PREFIX};
use crate::kiosk::KioskDisplay;
use crate::AppState;
use log::{debug, warn};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;
use std::sync::Arc;

/// What a kiosk button asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskAction {
    Vote(String),
    Language(Language),
    ShowLanguages,
}

pub fn parse_action(custom_id: &str) -> Option<KioskAction> {
    if custom_id == LANGUAGES_BUTTON {
        return Some(KioskAction::ShowLanguages);
    }
    if let Some(id) = custom_id.strip_prefix(VOTE_PREFIX) {
        return (!id.is_empty()).then(|| KioskAction::Vote(id.to_string()));
    }
    custom_id
        .strip_prefix(LANGUAGE_PREFIX)
        .and_then(Language::from_code)
        .map(KioskAction::Language)
}

/// Kiosk buttons are public. The click is acknowledged right away and the
/// kiosk redraws its own message.
pub async fn handle_kiosk_button(
    state: &AppState,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    component
        .create_interaction_response(&ctx.http, |response| {
            response.kind(InteractionResponseType::DeferredUpdateMessage)
        })
        .await?;

    let Some(action) = parse_action(&component.data.custom_id) else {
        warn!("Unknown kiosk button: {}", component.data.custom_id);
        return Ok(());
    };

    let channel_id = component.channel_id;
    let message_id = component.message.id;
    let http = Arc::clone(&ctx.http);
    let kiosk = state
        .kiosks
        .get_or_attach(message_id.0, channel_id.0, move || {
            Arc::new(DiscordDisplay::new(http, channel_id, message_id)) as Arc<dyn KioskDisplay>
        })
        .await;

    match action {
        KioskAction::Vote(option_id) => {
            let origin = Some(format!("discord:{}", component.user.id));
            match kiosk.vote(&option_id, origin).await {
                Ok(_) => {}
                // a second tap while the first one is still on screen
                Err(KioskError::Flow(FlowError::NotBrowsing)) => {
                    debug!("Kiosk {} ignored a tap while busy", kiosk.id());
                }
                Err(KioskError::UnknownOption(id)) => {
                    warn!("Kiosk {} got a vote for unknown option {}", kiosk.id(), id);
                    kiosk.reload_options().await;
                }
                // already logged and shown on the kiosk
                Err(KioskError::Store(_)) => {}
            }
        }
        KioskAction::Language(language) => kiosk.choose_language(language).await,
        KioskAction::ShowLanguages => kiosk.show_language_selector().await,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("kiosk_vote_3f2a", Some(KioskAction::Vote("3f2a".to_string())))]
    #[case("kiosk_lang_es", Some(KioskAction::Language(Language::Es)))]
    #[case("kiosk_languages", Some(KioskAction::ShowLanguages))]
    #[case("kiosk_lang_fr", None)]
    #[case("kiosk_vote_", None)]
    #[case("options_pick", None)]
    fn kiosk_button_ids(#[case] custom_id: &str, #[case] expected: Option<KioskAction>) {
        assert_eq!(parse_action(custom_id), expected);
    }
}
