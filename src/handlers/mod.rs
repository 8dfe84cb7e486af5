pub mod admin;
pub mod display;
pub mod kiosk;
pub mod options;
pub mod results;

use crate::auth::Session;
use crate::commands;
use crate::commands::admin::LOGIN_MODAL;
use crate::i18n::translations;
use crate::AppState;
use log::{error, info, warn};
use serenity::model::application::component::{ActionRow, ActionRowComponent};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::prelude::*;

// Routes buttons and select menus by custom id prefix.
pub async fn handle_component(
    state: &AppState,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let custom_id = component.data.custom_id.as_str();

    if custom_id.starts_with("kiosk_") {
        // kiosk taps are frequent; keep them out of the info log
        kiosk::handle_kiosk_button(state, ctx, component).await?;
        return Ok(());
    }

    info!("Received component interaction: {} from {}", custom_id, component.user.id);
    if custom_id.starts_with("options_") {
        options::handle_options_component(state, ctx, component).await?;
    } else if custom_id.starts_with(results::EXPORT_PREFIX) {
        results::handle_export_button(state, ctx, component).await?;
    } else {
        warn!("Unhandled component custom_id: {}", custom_id);
        reply_component(ctx, component, "Unknown button action.").await?;
    }
    Ok(())
}

pub async fn handle_modal(
    state: &AppState,
    ctx: &Context,
    modal: &ModalSubmitInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let custom_id = modal.data.custom_id.as_str();
    info!("Received modal submission: {} from {}", custom_id, modal.user.id);

    if custom_id == LOGIN_MODAL {
        admin::handle_login(state, ctx, modal).await?;
    } else if custom_id.starts_with(options::FORM_PREFIX) {
        options::handle_option_form(state, ctx, modal).await?;
    } else {
        warn!("Unhandled modal custom_id: {}", custom_id);
        reply_modal(ctx, modal, "Unknown form.").await?;
    }
    Ok(())
}

pub async fn handle_interaction(state: &AppState, ctx: &Context, interaction: Interaction) {
    let result = match interaction {
        Interaction::ApplicationCommand(command) => {
            commands::handle_command(state, ctx, &command).await
        }
        Interaction::MessageComponent(component) => handle_component(state, ctx, &component).await,
        Interaction::ModalSubmit(modal) => handle_modal(state, ctx, &modal).await,
        _ => {
            warn!("Unhandled interaction type: {:?}", interaction.kind());
            Ok(())
        }
    };

    if let Err(why) = result {
        error!("Interaction handler error: {:?}", why);
    }
}

/// Value typed into a modal's text input.
pub(crate) fn input_value(rows: &[ActionRow], id: &str) -> Option<String> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == id => Some(input.value.clone()),
            _ => None,
        })
}

pub(crate) async fn reply_component(
    ctx: &Context,
    component: &MessageComponentInteraction,
    content: &str,
) -> Result<(), serenity::Error> {
    component
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await
}

pub(crate) async fn reply_modal(
    ctx: &Context,
    modal: &ModalSubmitInteraction,
    content: &str,
) -> Result<(), serenity::Error> {
    modal
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await
}

pub(crate) async fn require_component_session(
    state: &AppState,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<Option<Session>, serenity::Error> {
    let user_id = component.user.id.0;
    if let Some(session) = state.sessions.session(user_id).await {
        return Ok(Some(session));
    }
    let t = translations(state.sessions.language_for(user_id).await);
    reply_component(ctx, component, t.not_signed_in).await?;
    Ok(None)
}

pub(crate) async fn require_modal_session(
    state: &AppState,
    ctx: &Context,
    modal: &ModalSubmitInteraction,
) -> Result<Option<Session>, serenity::Error> {
    let user_id = modal.user.id.0;
    if let Some(session) = state.sessions.session(user_id).await {
        return Ok(Some(session));
    }
    let t = translations(state.sessions.language_for(user_id).await);
    reply_modal(ctx, modal, t.not_signed_in).await?;
    Ok(None)
}
