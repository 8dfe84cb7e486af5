use super::flow::{FlowState, Notice, VotingFlow};
use crate::i18n::{translations, Language};
use crate::models::VoteOption;

pub const VOTE_PREFIX: &str = "kiosk_vote_";
pub const LANGUAGE_PREFIX: &str = "kiosk_lang_";
pub const LANGUAGES_BUTTON: &str = "kiosk_languages";

const BLUE: u32 = 0x2563EB;
const GREEN: u32 = 0x16A34A;
const RED: u32 = 0xDC2626;

// Discord: 5 action rows of 5 buttons, 80 characters per label.
const MAX_ROWS: usize = 5;
const BUTTONS_PER_ROW: usize = 5;
const MAX_LABEL: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Primary,
    Secondary,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenButton {
    pub custom_id: String,
    pub label: String,
    pub tone: Tone,
    pub disabled: bool,
}

/// Everything a kiosk message shows, independent of Discord builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskScreen {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub footer: String,
    pub rows: Vec<Vec<ScreenButton>>,
}

impl KioskScreen {
    pub fn buttons(&self) -> impl Iterator<Item = &ScreenButton> {
        self.rows.iter().flatten()
    }
}

pub struct KioskView<'a> {
    pub flow: &'a VotingFlow,
    pub language: Language,
    pub options: &'a [VoteOption],
    pub choosing_language: bool,
    pub brand: &'a str,
}

pub fn render(view: &KioskView<'_>) -> KioskScreen {
    match view.flow.state() {
        FlowState::Confirmed { .. } => confirmation(view),
        _ if view.choosing_language => language_selector(view),
        _ => voting(view),
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL {
        let cut: String = label.chars().take(MAX_LABEL - 3).collect();
        format!("{}...", cut)
    } else if label.is_empty() {
        // Discord rejects empty button labels
        "-".to_string()
    } else {
        label.to_string()
    }
}

fn language_name(language: Language) -> &'static str {
    let t = translations(language);
    match language {
        Language::Pt => t.portuguese,
        Language::Es => t.spanish,
        Language::En => t.english,
    }
}

fn confirmation(view: &KioskView<'_>) -> KioskScreen {
    let t = translations(view.language);
    KioskScreen {
        title: format!("✅ {}", t.thank_you),
        description: t.thank_you_message.to_string(),
        color: GREEN,
        footer: view.brand.to_string(),
        rows: Vec::new(),
    }
}

fn language_selector(view: &KioskView<'_>) -> KioskScreen {
    let t = translations(view.language);
    let row = Language::ALL
        .iter()
        .map(|&language| ScreenButton {
            custom_id: format!("{}{}", LANGUAGE_PREFIX, language.code()),
            label: format!("{} {}", language.flag(), language_name(language)),
            tone: if language == view.language { Tone::Primary } else { Tone::Secondary },
            disabled: false,
        })
        .collect();
    KioskScreen {
        title: format!("🌐 {}", t.select_language),
        description: String::new(),
        color: BLUE,
        footer: view.brand.to_string(),
        rows: vec![row],
    }
}

fn voting(view: &KioskView<'_>) -> KioskScreen {
    let t = translations(view.language);
    let submitting = view.flow.selected();
    let busy = submitting.is_some();

    let mut header: Vec<ScreenButton> = [Language::Es, Language::En, Language::Pt]
        .iter()
        .map(|&language| ScreenButton {
            custom_id: format!("{}{}", LANGUAGE_PREFIX, language.code()),
            label: language.code().to_uppercase(),
            tone: if language == view.language { Tone::Primary } else { Tone::Secondary },
            disabled: busy,
        })
        .collect();
    header.push(ScreenButton {
        custom_id: LANGUAGES_BUTTON.to_string(),
        label: format!("🌐 {}", t.change_language),
        tone: Tone::Secondary,
        disabled: busy,
    });

    let option_buttons: Vec<ScreenButton> = view
        .options
        .iter()
        .take((MAX_ROWS - 1) * BUTTONS_PER_ROW)
        .map(|option| {
            let chosen = submitting == Some(option.id.as_str());
            let text = view.language.label(option);
            let label = if chosen {
                format!("{} · {}", text, t.processing)
            } else {
                text.to_string()
            };
            ScreenButton {
                custom_id: format!("{}{}", VOTE_PREFIX, option.id),
                label: truncate_label(&label),
                tone: if chosen { Tone::Success } else { Tone::Primary },
                disabled: busy,
            }
        })
        .collect();

    let mut rows = vec![header];
    rows.extend(option_buttons.chunks(BUTTONS_PER_ROW).map(|chunk| chunk.to_vec()));

    let (description, color) = match view.flow.notice() {
        Some(Notice::SubmitFailed) => (format!("⚠️ {}", t.error_submitting), RED),
        None if view.options.is_empty() => (t.no_active_options.to_string(), BLUE),
        None => (String::new(), BLUE),
    };

    KioskScreen {
        title: t.question.to_string(),
        description,
        color,
        footer: view.brand.to_string(),
        rows,
    }
}
