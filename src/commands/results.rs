use super::{reply, require_session, string_option, subcommand};
use crate::handlers::results::{build_report, export_button_id, report_followup};
use crate::report::layout::describe_window;
use crate::voting::{self, window::parse_date, window::DateWindow};
use crate::AppState;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

// Discord embeds hold at most 25 fields.
const MAX_FIELDS: usize = 25;

fn with_window_options(
    option: &mut serenity::builder::CreateApplicationCommandOption,
) -> &mut serenity::builder::CreateApplicationCommandOption {
    option
        .create_sub_option(|sub_option| {
            sub_option
                .name("from")
                .description("First day, YYYY-MM-DD")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_sub_option(|sub_option| {
            sub_option
                .name("to")
                .description("Last day, YYYY-MM-DD")
                .kind(CommandOptionType::String)
                .required(false)
        })
}

pub fn create_results_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("results")
        .description("See how visitors answered")
        .create_option(|option| {
            with_window_options(
                option
                    .name("show")
                    .description("Show the vote counts")
                    .kind(CommandOptionType::SubCommand),
            )
        })
        .create_option(|option| {
            with_window_options(
                option
                    .name("export")
                    .description("Export the vote counts as a PDF report")
                    .kind(CommandOptionType::SubCommand),
            )
        })
}

/// Reads `from` / `to`. `Err` when a given date is not `YYYY-MM-DD`.
fn window_from(sub: &CommandDataOption) -> Result<DateWindow, ()> {
    let read = |name: &str| match string_option(sub, name) {
        Some(raw) if !raw.trim().is_empty() => parse_date(raw).map(Some).ok_or(()),
        _ => Ok(None),
    };
    Ok(DateWindow::new(read("from")?, read("to")?))
}

pub async fn handle_results_command(
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
    let Ok(window) = window_from(sub) else {
        reply(ctx, command, t.invalid_date).await?;
        return Ok(());
    };

    match sub.name.as_str() {
        "show" => {
            let tally = voting::load_results(&*state.database, window, state.config.utc_offset).await;

            let mut summary = format!("**{}:** {}", t.total_votes, tally.total);
            if let Some(period) = describe_window(window, language) {
                summary.push_str(&format!("\n{}", period));
            }
            if tally.is_empty() {
                summary.push_str(&format!("\n\n{}", t.no_data));
            }

            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message
                                .ephemeral(true)
                                .embed(|e| {
                                    e.title(t.results).description(&summary).color(0x2563EBu32);
                                    for result in tally.results.iter().take(MAX_FIELDS) {
                                        let name = result.label(language);
                                        e.field(
                                            if name.is_empty() { "-" } else { name },
                                            format!(
                                                "{} {} ({:.1}%)",
                                                result.count,
                                                t.votes,
                                                tally.percentage_of(result)
                                            ),
                                            false,
                                        );
                                    }
                                    e
                                })
                                .components(|c| {
                                    c.create_action_row(|row| {
                                        row.create_button(|button| {
                                            button
                                                .custom_id(export_button_id(window))
                                                .label(format!("📄 {}", t.export_pdf))
                                                .style(ButtonStyle::Primary)
                                        })
                                    })
                                })
                        })
                })
                .await?;
        }
        "export" => {
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                        .interaction_response_data(|data| data.ephemeral(true))
                })
                .await?;

            info!("{} exported results for {:?}", session.identity.email, window);
            let report = build_report(state, window, language).await;
            command
                .create_followup_message(&ctx.http, |followup| report_followup(followup, t, report))
                .await?;
        }
        _ => {
            reply(ctx, command, "Unknown subcommand").await?;
        }
    }

    Ok(())
}
