//! Page layout of the results report as plain draw operations. Coordinates
//! are millimetres from the top-left corner of an A4 page; text `y` is the
//! baseline.

use super::chart::{self, truncate};
use super::ReportInput;
use crate::i18n::{translations, Language, Translations};
use crate::voting::tally::percentage;
use crate::voting::window::DateWindow;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

const MARGIN: f32 = 20.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const TOP: f32 = 20.0;
const FOOTER_TOP: f32 = 287.0;
const TABLE_BOTTOM: f32 = 277.0;
const CHART_HEADING_LIMIT: f32 = 250.0;
const BAR_LIMIT: f32 = 270.0;

const HEADER_ROW_HEIGHT: f32 = 8.0;
const BODY_ROW_HEIGHT: f32 = 7.0;
const COLUMN_WIDTHS: [f32; 5] = [50.0, 50.0, 50.0, 20.0, 20.0];
const BAR_HEIGHT: f32 = 6.0;
const BAR_SPACING: f32 = 14.0;

// points to millimetres
const PT_TO_MM: f32 = 0.3528;
// average Helvetica advance as a share of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const PRIMARY: Rgb = Rgb(37, 99, 235);
pub const LIGHT: Rgb = Rgb(219, 234, 254);
pub const DARK: Rgb = Rgb(31, 41, 55);
pub const STRIPE: Rgb = Rgb(249, 250, 251);
pub const WHITE: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: Rgb,
        align: Align,
        text: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<Page>,
}

/// Rough width of `text` in millimetres for alignment with builtin fonts.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * PT_TO_MM
}

fn fit(text: &str, width: f32, size: f32) -> String {
    let budget = ((width - 4.0) / (size * AVG_GLYPH_WIDTH * PT_TO_MM)).floor().max(4.0) as usize;
    truncate(text, budget)
}

struct Canvas {
    pages: Vec<Page>,
    y: f32,
}

impl Canvas {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: TOP,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = TOP;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.push(DrawOp::Rect { x, y, width, height, color });
    }

    #[allow(clippy::too_many_arguments)]
    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, color: Rgb, align: Align, text: impl Into<String>) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            bold,
            color,
            align,
            text: text.into(),
        });
    }
}

pub fn format_long_datetime(at: DateTime<FixedOffset>, language: Language) -> String {
    let t = translations(language);
    let month = t.months[at.month0() as usize];
    match language {
        Language::En => format!("{} {}, {} {}", month, at.day(), at.year(), at.format("%H:%M")),
        Language::Pt | Language::Es => format!(
            "{:02} de {} de {} {}",
            at.day(),
            month,
            at.year(),
            at.format("%H:%M")
        ),
    }
}

pub fn format_short_date(date: NaiveDate, language: Language) -> String {
    match language {
        Language::En => date.format("%m/%d/%Y").to_string(),
        Language::Pt | Language::Es => date.format("%d/%m/%Y").to_string(),
    }
}

/// "Filtered period: <from> to <to>", open ends named. `None` when unfiltered.
pub fn describe_window(window: DateWindow, language: Language) -> Option<String> {
    if !window.is_set() {
        return None;
    }
    let t = translations(language);
    let from = window
        .from
        .map(|d| format_short_date(d, language))
        .unwrap_or_else(|| t.period_start.to_string());
    let to = window
        .to
        .map(|d| format_short_date(d, language))
        .unwrap_or_else(|| t.period_today.to_string());
    Some(format!("{}: {} {} {}", t.filtered_period, from, t.until, to))
}

pub fn build(input: &ReportInput<'_>) -> ReportLayout {
    let t = translations(input.language);
    let mut canvas = Canvas::new();

    header(&mut canvas, input, t);
    summary(&mut canvas, input, t);
    table(&mut canvas, input, t);
    chart_section(&mut canvas, input, t);
    footers(&mut canvas, input, t);

    ReportLayout {
        pages: canvas.pages,
    }
}

fn header(canvas: &mut Canvas, input: &ReportInput<'_>, t: &Translations) {
    canvas.rect(0.0, 0.0, PAGE_WIDTH, 40.0, PRIMARY);
    canvas.text(PAGE_WIDTH / 2.0, 20.0, 24.0, true, WHITE, Align::Center, input.brand.name.clone());
    canvas.text(PAGE_WIDTH / 2.0, 32.0, 14.0, false, WHITE, Align::Center, t.report_title);

    canvas.y = 50.0;
    let generated = format!(
        "{}: {}",
        t.generated_at,
        format_long_datetime(input.generated_at, input.language)
    );
    let y = canvas.y;
    canvas.text(MARGIN, y, 10.0, false, DARK, Align::Left, generated);
    canvas.y += 6.0;

    if let Some(period) = describe_window(input.window, input.language) {
        let y = canvas.y;
        canvas.text(MARGIN, y, 10.0, false, DARK, Align::Left, period);
        canvas.y += 6.0;
    }
}

fn summary(canvas: &mut Canvas, input: &ReportInput<'_>, t: &Translations) {
    canvas.y += 5.0;
    let top = canvas.y;
    canvas.rect(MARGIN, top, CONTENT_WIDTH, 25.0, LIGHT);

    canvas.y += 8.0;
    let y = canvas.y;
    canvas.text(MARGIN + 5.0, y, 12.0, true, PRIMARY, Align::Left, t.summary);

    canvas.y += 8.0;
    let y = canvas.y;
    canvas.text(
        MARGIN + 5.0,
        y,
        10.0,
        false,
        DARK,
        Align::Left,
        format!("{}: {}", t.total_votes, input.tally.total),
    );
    canvas.text(
        120.0,
        y,
        10.0,
        false,
        DARK,
        Align::Left,
        format!("{}: {}", t.options_with_votes, input.tally.results.len()),
    );
    canvas.y += 15.0;
}

fn table_header(canvas: &mut Canvas, t: &Translations) {
    let titles = [
        format!("{} (PT)", t.option_column),
        format!("{} (ES)", t.option_column),
        format!("{} (EN)", t.option_column),
        t.votes.to_string(),
        "%".to_string(),
    ];
    let top = canvas.y;
    canvas.rect(MARGIN, top, CONTENT_WIDTH, HEADER_ROW_HEIGHT, PRIMARY);
    let mut x = MARGIN;
    for (title, width) in titles.iter().zip(COLUMN_WIDTHS) {
        canvas.text(
            x + width / 2.0,
            top + 5.5,
            10.0,
            true,
            WHITE,
            Align::Center,
            fit(title, width, 10.0),
        );
        x += width;
    }
    canvas.y += HEADER_ROW_HEIGHT;
}

fn table(canvas: &mut Canvas, input: &ReportInput<'_>, t: &Translations) {
    let y = canvas.y;
    canvas.text(MARGIN, y, 12.0, true, PRIMARY, Align::Left, t.detailed_results);
    canvas.y += 5.0;
    table_header(canvas, t);

    for (index, result) in input.tally.results.iter().enumerate() {
        if canvas.y + BODY_ROW_HEIGHT > TABLE_BOTTOM {
            canvas.new_page();
            table_header(canvas, t);
        }
        let top = canvas.y;
        if index % 2 == 1 {
            canvas.rect(MARGIN, top, CONTENT_WIDTH, BODY_ROW_HEIGHT, STRIPE);
        }
        let cells = [
            result.text_pt.clone(),
            result.text_es.clone(),
            result.text_en.clone(),
            result.count.to_string(),
            format!("{:.1}%", input.tally.percentage_of(result)),
        ];
        let mut x = MARGIN;
        for (column, (cell, width)) in cells.iter().zip(COLUMN_WIDTHS).enumerate() {
            let numeric = column >= 3;
            let (anchor, align) = if numeric {
                (x + width / 2.0, Align::Center)
            } else {
                (x + 2.0, Align::Left)
            };
            canvas.text(
                anchor,
                top + 5.0,
                9.0,
                column == 4,
                DARK,
                align,
                fit(cell, width, 9.0),
            );
            x += width;
        }
        canvas.y += BODY_ROW_HEIGHT;
    }
    canvas.y += 15.0;
}

fn chart_section(canvas: &mut Canvas, input: &ReportInput<'_>, t: &Translations) {
    if canvas.y > CHART_HEADING_LIMIT {
        canvas.new_page();
    }
    let y = canvas.y;
    canvas.text(MARGIN, y, 12.0, true, PRIMARY, Align::Left, t.chart_title);
    canvas.y += 8.0;

    let bars = chart::bars(
        input
            .tally
            .results
            .iter()
            .map(|r| (r.label(input.language), r.count)),
        input.tally.max_count(),
    );

    for bar in bars {
        if canvas.y > BAR_LIMIT {
            canvas.new_page();
        }
        let top = canvas.y;
        canvas.text(MARGIN, top + 3.0, 8.0, false, DARK, Align::Left, bar.label.clone());
        canvas.rect(MARGIN, top + 5.0, bar.track_width, BAR_HEIGHT, LIGHT);
        if bar.fill_width > 0.0 {
            canvas.rect(MARGIN, top + 5.0, bar.fill_width, BAR_HEIGHT, PRIMARY);
        }
        canvas.text(
            MARGIN + bar.track_width + 3.0,
            top + 9.5,
            8.0,
            true,
            PRIMARY,
            Align::Left,
            format!("{} ({:.1}%)", bar.count, percentage(bar.count, input.tally.total)),
        );
        canvas.y += BAR_SPACING;
    }
}

/// Stamped once the page count is known.
fn footers(canvas: &mut Canvas, input: &ReportInput<'_>, t: &Translations) {
    let total = canvas.pages.len();
    for (index, page) in canvas.pages.iter_mut().enumerate() {
        page.ops.push(DrawOp::Rect {
            x: 0.0,
            y: FOOTER_TOP,
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT - FOOTER_TOP,
            color: PRIMARY,
        });
        page.ops.push(DrawOp::Text {
            x: PAGE_WIDTH / 2.0,
            y: 293.0,
            size: 8.0,
            bold: false,
            color: WHITE,
            align: Align::Center,
            text: format!("{} - {}", input.brand.name, t.voting_system),
        });
        page.ops.push(DrawOp::Text {
            x: PAGE_WIDTH - MARGIN,
            y: 293.0,
            size: 8.0,
            bold: false,
            color: WHITE,
            align: Align::Right,
            text: format!("{} {} {} {}", t.page, index + 1, t.of, total),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Brand;
    use crate::voting::tally::{tally, Tally};
    use crate::models::VoteRow;
    use chrono::TimeZone;

    fn rows(counts: &[(&str, usize)]) -> Vec<VoteRow> {
        counts
            .iter()
            .flat_map(|(id, n)| {
                std::iter::repeat(VoteRow {
                    vote_option_id: id.to_string(),
                    text_pt: format!("{} pt", id),
                    text_es: format!("{} es", id),
                    text_en: format!("{} en", id),
                })
                .take(*n)
            })
            .collect()
    }

    fn generated_at() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 14, 30, 0)
            .unwrap()
    }

    fn layout(tally: &Tally, window: DateWindow, language: Language) -> ReportLayout {
        let brand = Brand::default();
        build(&ReportInput {
            tally,
            window,
            generated_at: generated_at(),
            brand: &brand,
            language,
        })
    }

    fn all_texts(layout: &ReportLayout) -> Vec<String> {
        layout
            .pages
            .iter()
            .flat_map(|p| p.texts().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn single_page_report_has_every_section() {
        let tally = tally(&rows(&[("A", 3), ("B", 1)]));
        let layout = layout(&tally, DateWindow::default(), Language::Pt);
        assert_eq!(layout.pages.len(), 1);

        let texts = all_texts(&layout);
        assert!(texts.contains(&"Cellshop Duty Free".to_string()));
        assert!(texts.contains(&"Data de geração: 19 de outubro de 2026 14:30".to_string()));
        assert!(texts.contains(&"Total de Votos: 4".to_string()));
        assert!(texts.contains(&"Opções Votadas: 2".to_string()));
        assert!(texts.contains(&"75.0%".to_string()));
        assert!(texts.contains(&"3 (75.0%)".to_string()));
        assert!(texts.contains(&"1 (25.0%)".to_string()));
        assert!(texts.contains(&"Página 1 de 1".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("Período filtrado")));
    }

    #[test]
    fn filter_line_names_open_ends() {
        let tally = tally(&rows(&[("A", 1)]));
        let window = DateWindow::new(NaiveDate::from_ymd_opt(2026, 10, 1), None);
        let texts = all_texts(&layout(&tally, window, Language::Pt));
        assert!(texts.contains(&"Período filtrado: 01/10/2026 até Hoje".to_string()));

        let window = DateWindow::new(None, NaiveDate::from_ymd_opt(2026, 10, 2));
        let texts = all_texts(&layout(&tally, window, Language::En));
        assert!(texts.contains(&"Filtered period: Start to 10/02/2026".to_string()));
    }

    #[test]
    fn empty_tally_still_renders() {
        let layout = layout(&Tally::default(), DateWindow::default(), Language::En);
        assert_eq!(layout.pages.len(), 1);
        let texts = all_texts(&layout);
        assert!(texts.contains(&"Total Votes: 0".to_string()));
        assert!(texts.contains(&"Page 1 of 1".to_string()));
    }

    #[test]
    fn long_results_paginate_and_footer_every_page() {
        let counts: Vec<(String, usize)> = (0..40).map(|i| (format!("opt{:02}", i), 40 - i)).collect();
        let borrowed: Vec<(&str, usize)> = counts.iter().map(|(id, n)| (id.as_str(), *n)).collect();
        let tally = tally(&rows(&borrowed));
        let layout = layout(&tally, DateWindow::default(), Language::En);

        let pages = layout.pages.len();
        assert!(pages >= 3, "expected several pages, got {}", pages);
        for (i, page) in layout.pages.iter().enumerate() {
            let footer = format!("Page {} of {}", i + 1, pages);
            assert!(page.texts().any(|t| t == footer), "missing footer on page {}", i + 1);
        }

        // nothing but the footer band reaches into the footer area
        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::Rect { y, height, color, .. } = op {
                    if *color != PRIMARY || *y != FOOTER_TOP {
                        assert!(y + height <= FOOTER_TOP, "rect at {} overlaps the footer", y);
                    }
                }
            }
        }
    }

    #[test]
    fn table_cells_fit_their_columns() {
        let mut rows = rows(&[("A", 1)]);
        rows[0].text_es = "una opción con un nombre larguísimo que no cabe en la columna".to_string();
        let tally = tally(&rows);
        let texts = all_texts(&layout(&tally, DateWindow::default(), Language::Es));
        let cell = texts.iter().find(|t| t.starts_with("una opción")).unwrap();
        assert!(cell.ends_with("..."));
        assert!(text_width(cell, 9.0) <= 50.0);
    }

    #[test]
    fn english_dates_use_month_first() {
        assert_eq!(
            format_long_datetime(generated_at(), Language::En),
            "October 19, 2026 14:30"
        );
        assert_eq!(
            format_short_date(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), Language::Es),
            "09/03/2026"
        );
    }

    #[test]
    fn window_description_names_open_ends() {
        assert_eq!(describe_window(DateWindow::default(), Language::En), None);

        let both = DateWindow::new(NaiveDate::from_ymd_opt(2026, 10, 1), NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(
            describe_window(both, Language::Es).as_deref(),
            Some("Período filtrado: 01/10/2026 hasta 19/10/2026")
        );

        let open_start = DateWindow::new(None, NaiveDate::from_ymd_opt(2026, 10, 2));
        assert_eq!(
            describe_window(open_start, Language::En).as_deref(),
            Some("Filtered period: Start to 10/02/2026")
        );
    }
}
