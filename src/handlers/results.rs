use super::{reply_component, require_component_session};
use crate::i18n::{Language, Translations};
use crate::error::ReportError;
use crate::report::{self, ReportFile, ReportInput};
use crate::voting::{self, window::parse_date, window::DateWindow};
use crate::AppState;
use chrono::Utc;
use log::{error, info, warn};
use serenity::builder::CreateInteractionResponseFollowup;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::AttachmentType;
use serenity::prelude::*;
use std::borrow::Cow;

pub const EXPORT_PREFIX: &str = "results_export_";
const OPEN_END: &str = "any";

/// Custom id of the Export PDF button, carrying the window it was shown for.
pub fn export_button_id(window: DateWindow) -> String {
    let end = |date: Option<chrono::NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| OPEN_END.to_string())
    };
    format!("{}{}_{}", EXPORT_PREFIX, end(window.from), end(window.to))
}

pub fn parse_export_id(custom_id: &str) -> Option<DateWindow> {
    let rest = custom_id.strip_prefix(EXPORT_PREFIX)?;
    let (from, to) = rest.split_once('_')?;
    let end = |raw: &str| -> Option<Option<chrono::NaiveDate>> {
        if raw == OPEN_END {
            Some(None)
        } else {
            parse_date(raw).map(Some)
        }
    };
    Some(DateWindow::new(end(from)?, end(to)?))
}

/// Tallies `window` and renders it. Failures are logged and yield `None`.
pub async fn build_report(state: &AppState, window: DateWindow, language: Language) -> Option<ReportFile> {
    let offset = state.config.utc_offset;
    let tally = voting::load_results(&*state.database, window, offset).await;
    let input = ReportInput {
        tally: &tally,
        window,
        generated_at: Utc::now().with_timezone(&offset),
        brand: &state.config.brand,
        language,
    };
    report_outcome(report::generate(&input), window)
}

fn report_outcome(result: Result<ReportFile, ReportError>, window: DateWindow) -> Option<ReportFile> {
    match result {
        Ok(file) => Some(file),
        Err(e) => {
            error!("Report generation failed for window {:?}: {}", window, e);
            None
        }
    }
}

/// Text sent alongside the report, or in its place.
pub fn followup_content(t: &Translations, report: &Option<ReportFile>) -> &'static str {
    match report {
        Some(_) => t.report_ready,
        None => t.report_failed,
    }
}

/// Fills a followup with the report, or the generic failure notice.
pub fn report_followup<'a, 'b>(
    followup: &'b mut CreateInteractionResponseFollowup<'a>,
    t: &Translations,
    report: Option<ReportFile>,
) -> &'b mut CreateInteractionResponseFollowup<'a> {
    followup.ephemeral(true).content(followup_content(t, &report));
    match report {
        Some(file) => followup.add_file(AttachmentType::Bytes {
            data: Cow::Owned(file.bytes),
            filename: file.file_name,
        }),
        None => followup,
    }
}

pub async fn handle_export_button(
    state: &AppState,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(session) = require_component_session(state, ctx, component).await? else {
        return Ok(());
    };
    let t = session.language.t();

    let Some(window) = parse_export_id(&component.data.custom_id) else {
        warn!("Malformed export button id: {}", component.data.custom_id);
        reply_component(ctx, component, t.report_failed).await?;
        return Ok(());
    };

    component
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                .interaction_response_data(|data| data.ephemeral(true))
        })
        .await?;

    info!("{} exported results for {:?}", session.identity.email, window);
    let report = build_report(state, window, session.language.language()).await;
    component
        .create_followup_message(&ctx.http, |followup| report_followup(followup, t, report))
        .await?;
    Ok(())
}
