use super::{reply, require_session, subcommand};
use crate::handlers::display::DiscordDisplay;
use crate::i18n::translations;
use crate::kiosk::KioskDisplay;
use crate::AppState;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::*;
use std::sync::Arc;

pub fn create_kiosk_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("kiosk")
        .description("Run voting kiosks in this channel")
        .create_option(|option| {
            option
                .name("open")
                .description("Post a voting kiosk in this channel")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("close")
                .description("Remove the voting kiosks from this channel")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("refresh")
                .description("Reload the options on every open kiosk")
                .kind(CommandOptionType::SubCommand)
        })
}

pub async fn handle_kiosk_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(session) = require_session(state, ctx, command).await? else {
        return Ok(());
    };
    let t = session.language.t();

    let Some(sub) = subcommand(command) else {
        reply(ctx, command, "No subcommand provided").await?;
        return Ok(());
    };

    let channel_id = command.channel_id;
    match sub.name.as_str() {
        "open" => {
            // Post a placeholder first; the kiosk lives in that message.
            let placeholder = translations(state.config.default_language).processing;
            let message = channel_id
                .send_message(&ctx.http, |m| m.content(placeholder))
                .await?;
            let display: Arc<dyn KioskDisplay> =
                Arc::new(DiscordDisplay::new(Arc::clone(&ctx.http), channel_id, message.id));
            state.kiosks.open(message.id.0, channel_id.0, display).await;
            info!(
                "{} opened kiosk {} in channel {}",
                session.identity.email, message.id, channel_id
            );
            reply(ctx, command, t.kiosk_opened).await?;
        }
        "close" => {
            let closed = state.kiosks.close_channel(channel_id.0).await;
            info!(
                "{} closed {} kiosk(s) in channel {}",
                session.identity.email, closed, channel_id
            );
            reply(ctx, command, &format!("{} {}", t.kiosk_closed, closed)).await?;
        }
        "refresh" => {
            state.kiosks.refresh_all().await;
            reply(ctx, command, t.kiosk_refreshed).await?;
        }
        _ => {
            reply(ctx, command, "Unknown subcommand").await?;
        }
    }

    Ok(())
}
