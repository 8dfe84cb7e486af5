use super::{reply, require_session, string_option, subcommand};
use crate::i18n::{translations, Language};
use crate::AppState;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::component::InputTextStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

pub const LOGIN_MODAL: &str = "admin_login";
pub const EMAIL_INPUT: &str = "email";
pub const PASSWORD_INPUT: &str = "password";

pub fn create_admin_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("admin")
        .description("Sign in to manage the voting kiosks")
        .create_option(|option| {
            option
                .name("login")
                .description("Sign in with your administrator account")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("logout")
                .description("End your administrator session")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("language")
                .description("Language of the admin panel")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("code")
                        .description("Panel language")
                        .kind(CommandOptionType::String)
                        .add_string_choice("Português", "pt")
                        .add_string_choice("Español", "es")
                        .add_string_choice("English", "en")
                        .required(true)
                })
        })
}

pub async fn handle_admin_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let user_id = command.user.id.0;
    let t = translations(state.sessions.language_for(user_id).await);

    let Some(sub) = subcommand(command) else {
        reply(ctx, command, "No subcommand provided").await?;
        return Ok(());
    };

    match sub.name.as_str() {
        "login" => {
            // Discord allows a modal only as the first response.
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::Modal)
                        .interaction_response_data(|modal| {
                            modal
                                .custom_id(LOGIN_MODAL)
                                .title(t.admin_panel)
                                .components(|c| {
                                    c.create_action_row(|row| {
                                        row.create_input_text(|input| {
                                            input
                                                .custom_id(EMAIL_INPUT)
                                                .label(t.email)
                                                .style(InputTextStyle::Short)
                                                .required(true)
                                        })
                                    })
                                    .create_action_row(|row| {
                                        row.create_input_text(|input| {
                                            input
                                                .custom_id(PASSWORD_INPUT)
                                                .label(t.password)
                                                .style(InputTextStyle::Short)
                                                .required(true)
                                        })
                                    })
                                })
                        })
                })
                .await?;
        }
        "logout" => {
            let content = match state.sessions.sign_out(user_id).await {
                Some(_) => t.logged_out,
                None => t.not_signed_in,
            };
            reply(ctx, command, content).await?;
        }
        "language" => {
            if require_session(state, ctx, command).await?.is_none() {
                return Ok(());
            }
            let Some(language) = string_option(sub, "code").and_then(Language::from_code) else {
                reply(ctx, command, "Unknown language").await?;
                return Ok(());
            };
            state.sessions.set_language(user_id, language).await;
            reply(ctx, command, translations(language).language_changed).await?;
        }
        _ => {
            reply(ctx, command, "Unknown subcommand").await?;
        }
    }

    Ok(())
}
