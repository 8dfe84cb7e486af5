use super::{input_value, reply_component, reply_modal, require_component_session, require_modal_session};
use crate::db::VoteStore;
use crate::error::StoreError;
use crate::i18n::{parse_yes_no, Translations};
use crate::models::{OptionForm, VoteOption};
use crate::AppState;
use log::{error, info};
use serenity::builder::CreateInteractionResponseData;
use serenity::model::application::component::{ButtonStyle, InputTextStyle};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

pub const PICK_MENU: &str = "options_pick";
pub const EDIT_PREFIX: &str = "options_edit_";
pub const DELETE_PREFIX: &str = "options_delete_";
pub const CONFIRM_PREFIX: &str = "options_confirm_";
pub const CANCEL_PREFIX: &str = "options_cancel_";
pub const FORM_PREFIX: &str = "option_form_";
const NEW_OPTION: &str = "new";

const TEXT_PT: &str = "text_pt";
const TEXT_ES: &str = "text_es";
const TEXT_EN: &str = "text_en";
const ACTIVE: &str = "active";
// option texts end up as kiosk button labels
const MAX_TEXT: u64 = 80;

/// The add/edit modal. `option_id` is `None` when adding.
pub fn option_form<'a, 'b>(
    modal: &'b mut CreateInteractionResponseData<'a>,
    t: &Translations,
    option_id: Option<&str>,
    form: &OptionForm,
) -> &'b mut CreateInteractionResponseData<'a> {
    let target = option_id.unwrap_or(NEW_OPTION);
    let title = if option_id.is_some() { t.edit } else { t.add_option };
    let fields = [
        (TEXT_PT, t.portuguese, form.text_pt.as_str()),
        (TEXT_ES, t.spanish, form.text_es.as_str()),
        (TEXT_EN, t.english, form.text_en.as_str()),
    ];
    let active = if form.is_active { t.yes } else { t.no };

    modal
        .custom_id(format!("{}{}", FORM_PREFIX, target))
        .title(title)
        .components(|c| {
            for (id, label, value) in fields {
                c.create_action_row(|row| {
                    row.create_input_text(|input| {
                        input
                            .custom_id(id)
                            .label(label)
                            .style(InputTextStyle::Short)
                            .max_length(MAX_TEXT)
                            .required(true);
                        if !value.is_empty() {
                            input.value(value);
                        }
                        input
                    })
                });
            }
            c.create_action_row(|row| {
                row.create_input_text(|input| {
                    input
                        .custom_id(ACTIVE)
                        .label(t.active_field)
                        .style(InputTextStyle::Short)
                        .required(true)
                        .value(active)
                })
            })
        })
}

/// Builds the submitted form from the modal's field values.
pub fn read_form<F>(value: F) -> OptionForm
where
    F: Fn(&str) -> Option<String>,
{
    let text = |id: &str| value(id).map(|v| v.trim().to_string()).unwrap_or_default();
    OptionForm {
        text_pt: text(TEXT_PT),
        text_es: text(TEXT_ES),
        text_en: text(TEXT_EN),
        is_active: value(ACTIVE).map(|v| parse_yes_no(&v)).unwrap_or(false),
    }
}

fn describe(option: &VoteOption, t: &Translations) -> String {
    let status = if option.is_active { t.active } else { t.inactive };
    format!(
        "🇧🇷 {}\n🇪🇸 {}\n🇺🇸 {}\n\n{}: {} · {}",
        option.text_pt, option.text_es, option.text_en, t.display_order, option.display_order, status
    )
}

pub async fn handle_options_component(
    state: &AppState,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(session) = require_component_session(state, ctx, component).await? else {
        return Ok(());
    };
    let t = session.language.t();
    let custom_id = component.data.custom_id.as_str();

    if custom_id == PICK_MENU {
        let Some(option_id) = component.data.values.first() else {
            reply_component(ctx, component, t.option_not_found).await?;
            return Ok(());
        };
        let option = match state.database.option(option_id).await {
            Ok(option) => option,
            Err(e) => {
                error!("Failed to load option {}: {}", option_id, e);
                reply_component(ctx, component, t.option_not_found).await?;
                return Ok(());
            }
        };
        component
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .ephemeral(true)
                            .embed(|e| e.title(t.vote_options).description(describe(&option, t)))
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_button(|b| {
                                        b.custom_id(format!("{}{}", EDIT_PREFIX, option.id))
                                            .label(t.edit)
                                            .style(ButtonStyle::Primary)
                                    })
                                    .create_button(|b| {
                                        b.custom_id(format!("{}{}", DELETE_PREFIX, option.id))
                                            .label(t.delete)
                                            .style(ButtonStyle::Danger)
                                    })
                                })
                            })
                    })
            })
            .await?;
    } else if let Some(option_id) = custom_id.strip_prefix(EDIT_PREFIX) {
        let option = match state.database.option(option_id).await {
            Ok(option) => option,
            Err(e) => {
                error!("Failed to load option {} for editing: {}", option_id, e);
                reply_component(ctx, component, t.option_not_found).await?;
                return Ok(());
            }
        };
        let form = OptionForm::from(&option);
        component
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| option_form(modal, t, Some(&option.id), &form))
            })
            .await?;
    } else if let Some(option_id) = custom_id.strip_prefix(DELETE_PREFIX) {
        component
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message.content(t.confirm_delete).components(|c| {
                            c.create_action_row(|row| {
                                row.create_button(|b| {
                                    b.custom_id(format!("{}{}", CONFIRM_PREFIX, option_id))
                                        .label(t.confirm)
                                        .style(ButtonStyle::Danger)
                                })
                                .create_button(|b| {
                                    b.custom_id(format!("{}{}", CANCEL_PREFIX, option_id))
                                        .label(t.cancel)
                                        .style(ButtonStyle::Secondary)
                                })
                            })
                        })
                    })
            })
            .await?;
    } else if let Some(option_id) = custom_id.strip_prefix(CONFIRM_PREFIX) {
        let content = match state.database.delete_option(option_id).await {
            Ok(()) => {
                info!("{} deleted option {}", session.identity.email, option_id);
                state.kiosks.refresh_all().await;
                t.option_deleted
            }
            Err(StoreError::NotFound(_)) => t.option_not_found,
            Err(e) => {
                error!("Failed to delete option {}: {}", option_id, e);
                t.save_failed
            }
        };
        update_to_text(ctx, component, content).await?;
    } else if custom_id.starts_with(CANCEL_PREFIX) {
        update_to_text(ctx, component, t.deletion_cancelled).await?;
    } else {
        reply_component(ctx, component, "Unknown button action.").await?;
    }

    Ok(())
}

/// Replaces the ephemeral option card with a plain line of text.
async fn update_to_text(
    ctx: &Context,
    component: &MessageComponentInteraction,
    content: &str,
) -> Result<(), serenity::Error> {
    component
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::UpdateMessage)
                .interaction_response_data(|message| {
                    message
                        .content(content)
                        .set_embeds(Vec::new())
                        .components(|c| c)
                })
        })
        .await
}

pub async fn handle_option_form(
    state: &AppState,
    ctx: &Context,
    modal: &ModalSubmitInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(session) = require_modal_session(state, ctx, modal).await? else {
        return Ok(());
    };
    let t = session.language.t();

    let Some(target) = modal.data.custom_id.strip_prefix(FORM_PREFIX) else {
        reply_modal(ctx, modal, t.save_failed).await?;
        return Ok(());
    };
    let form = read_form(|id| input_value(&modal.data.components, id));

    let saved = if target == NEW_OPTION {
        state.database.create_option(&form).await
    } else {
        state.database.update_option(target, &form).await
    };

    let content = match saved {
        Ok(option) => {
            info!(
                "{} saved option {} (order {}, active {})",
                session.identity.email, option.id, option.display_order, option.is_active
            );
            state.kiosks.refresh_all().await;
            t.option_saved
        }
        Err(StoreError::NotFound(_)) => t.option_not_found,
        Err(e) => {
            error!("Failed to save option {}: {}", target, e);
            t.save_failed
        }
    };
    reply_modal(ctx, modal, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn submitted(fields: &[(&str, &str)]) -> OptionForm {
        let values: HashMap<String, String> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        read_form(|id| values.get(id).cloned())
    }

    #[test]
    fn form_texts_are_trimmed() {
        let form = submitted(&[
            (TEXT_PT, "  Instagram "),
            (TEXT_ES, "Instagram"),
            (TEXT_EN, "Instagram\n"),
            (ACTIVE, "sim"),
        ]);
        assert_eq!(form.text_pt, "Instagram");
        assert_eq!(form.text_en, "Instagram");
        assert!(form.is_active);
    }

    #[test]
    fn unreadable_active_field_means_inactive() {
        let form = submitted(&[(TEXT_PT, "a"), (TEXT_ES, "b"), (TEXT_EN, "c"), (ACTIVE, "talvez")]);
        assert!(!form.is_active);

        let missing = submitted(&[(TEXT_PT, "a")]);
        assert!(!missing.is_active);
        assert_eq!(missing.text_es, "");
    }
}
