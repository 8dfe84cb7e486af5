use super::{input_value, reply_modal};
use crate::commands::admin::{EMAIL_INPUT, PASSWORD_INPUT};
use crate::i18n::translations;
use crate::AppState;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::prelude::*;

pub async fn handle_login(
    state: &AppState,
    ctx: &Context,
    modal: &ModalSubmitInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let user_id = modal.user.id.0;
    let email = input_value(&modal.data.components, EMAIL_INPUT).unwrap_or_default();
    let password = input_value(&modal.data.components, PASSWORD_INPUT).unwrap_or_default();

    // one message for every failure, so the reply never tells which part was wrong
    let content = match state
        .sessions
        .sign_in(&*state.database, user_id, &email, &password)
        .await
    {
        Ok(session) => session.language.t().login_success,
        Err(_) => translations(state.sessions.language_for(user_id).await).login_failed,
    };
    reply_modal(ctx, modal, content).await?;
    Ok(())
}
