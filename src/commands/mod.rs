pub mod admin;
pub mod kiosk;
pub mod options;
pub mod results;

use crate::auth::Session;
use crate::i18n::translations;
use crate::AppState;
use log::{info, warn};
use serenity::builder::CreateApplicationCommands;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption, CommandDataOptionValue,
};
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

pub fn register(commands: &mut CreateApplicationCommands) -> &mut CreateApplicationCommands {
    commands
        .create_application_command(|command| admin::create_admin_command(command))
        .create_application_command(|command| kiosk::create_kiosk_command(command))
        .create_application_command(|command| options::create_options_command(command))
        .create_application_command(|command| results::create_results_command(command))
}

pub async fn handle_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Received command: {} from {}", command.data.name, command.user.id);
    match command.data.name.as_str() {
        "admin" => admin::handle_admin_command(state, ctx, command).await?,
        "kiosk" => kiosk::handle_kiosk_command(state, ctx, command).await?,
        "options" => options::handle_options_command(state, ctx, command).await?,
        "results" => results::handle_results_command(state, ctx, command).await?,
        other => {
            warn!("Unknown command: {}", other);
            reply(ctx, command, "Unknown command").await?;
        }
    }
    Ok(())
}

/// The subcommand the user picked, e.g. `open` in `/kiosk open`.
pub(crate) fn subcommand(command: &ApplicationCommandInteraction) -> Option<&CommandDataOption> {
    command.data.options.first()
}

pub(crate) fn string_option<'a>(sub: &'a CommandDataOption, name: &str) -> Option<&'a str> {
    sub.options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.resolved {
            Some(CommandDataOptionValue::String(value)) => Some(value.as_str()),
            _ => None,
        })
}

/// Ephemeral text reply.
pub(crate) async fn reply(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<(), serenity::Error> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await
}

/// The caller's admin session. Without one the caller is told to sign in
/// and `None` is returned.
pub(crate) async fn require_session(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<Option<Session>, serenity::Error> {
    let user_id = command.user.id.0;
    if let Some(session) = state.sessions.session(user_id).await {
        return Ok(Some(session));
    }
    let t = translations(state.sessions.language_for(user_id).await);
    reply(ctx, command, t.not_signed_in).await?;
    Ok(None)
}
