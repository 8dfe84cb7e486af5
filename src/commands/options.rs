use super::{reply, require_session, subcommand};
use crate::db::VoteStore;
use crate::handlers::options::{option_form, PICK_MENU};
use crate::models::OptionForm;
use crate::AppState;
use log::error;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

// Discord caps select menus at 25 entries and embed descriptions at 4096
// characters.
const MAX_MENU_ENTRIES: usize = 25;
const MAX_DESCRIPTION: usize = 4000;
const MENU_LABEL: usize = 100;

pub fn create_options_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("options")
        .description("Manage the answers shown on the kiosks")
        .create_option(|option| {
            option
                .name("list")
                .description("List every vote option")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("add")
                .description("Add a vote option")
                .kind(CommandOptionType::SubCommand)
        })
}

pub async fn handle_options_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(session) = require_session(state, ctx, command).await? else {
        return Ok(());
    };
    let language = session.language.language();
    let t = session.language.t();

    let Some(sub) = subcommand(command) else {
        reply(ctx, command, "No subcommand provided").await?;
        return Ok(());
    };

    match sub.name.as_str() {
        "list" => {
            let options = match state.database.all_options().await {
                Ok(options) => options,
                Err(e) => {
                    error!("Failed to list vote options: {}", e);
                    reply(ctx, command, t.save_failed).await?;
                    return Ok(());
                }
            };
            if options.is_empty() {
                reply(ctx, command, t.no_options).await?;
                return Ok(());
            }

            let mut description = String::new();
            for option in &options {
                let badge = if option.is_active { t.active } else { t.inactive };
                let line = format!(
                    "**{}.** {} / {} / {} · {}\n",
                    option.display_order, option.text_pt, option.text_es, option.text_en, badge
                );
                if description.len() + line.len() > MAX_DESCRIPTION {
                    description.push_str("...");
                    break;
                }
                description.push_str(&line);
            }

            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message
                                .ephemeral(true)
                                .embed(|e| {
                                    e.title(format!("{} ({})", t.vote_options, options.len()))
                                        .description(&description)
                                })
                                .components(|c| {
                                    c.create_action_row(|row| {
                                        row.create_select_menu(|menu| {
                                            menu.custom_id(PICK_MENU)
                                                .placeholder(t.pick_option)
                                                .options(|entries| {
                                                    for option in options.iter().take(MAX_MENU_ENTRIES) {
                                                        let label: String = format!(
                                                            "{}. {}",
                                                            option.display_order,
                                                            language.label(option)
                                                        )
                                                        .chars()
                                                        .take(MENU_LABEL)
                                                        .collect();
                                                        entries.create_option(|entry| {
                                                            entry
                                                                .label(label)
                                                                .value(&option.id)
                                                                .description(if option.is_active {
                                                                    t.active
                                                                } else {
                                                                    t.inactive
                                                                })
                                                        });
                                                    }
                                                    entries
                                                })
                                        })
                                    })
                                })
                        })
                })
                .await?;
        }
        "add" => {
            let form = OptionForm::default();
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::Modal)
                        .interaction_response_data(|modal| option_form(modal, t, None, &form))
                })
                .await?;
        }
        _ => {
            reply(ctx, command, "Unknown subcommand").await?;
        }
    }

    Ok(())
}
