//! PDF export of the results screen.

pub mod chart;
pub mod layout;
pub mod pdf;

use crate::config::Brand;
use crate::error::ReportError;
use crate::i18n::{translations, Language};
use crate::voting::tally::Tally;
use crate::voting::window::DateWindow;
use chrono::{DateTime, FixedOffset, NaiveDate};
use log::info;

pub struct ReportInput<'a> {
    pub tally: &'a Tally,
    pub window: DateWindow,
    pub generated_at: DateTime<FixedOffset>,
    pub brand: &'a Brand,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `<slug>-resultados-<YYYY-MM-DD>.pdf`
pub fn file_name(slug: &str, date: NaiveDate) -> String {
    format!("{}-resultados-{}.pdf", slug, date.format("%Y-%m-%d"))
}

pub fn generate(input: &ReportInput<'_>) -> Result<ReportFile, ReportError> {
    let layout = layout::build(input);
    let title = format!(
        "{} - {}",
        input.brand.name,
        translations(input.language).report_title
    );
    let bytes = pdf::render(&layout, &title)?;
    let file_name = file_name(&input.brand.slug, input.generated_at.date_naive());
    info!(
        "Generated report {} ({} pages, {} bytes)",
        file_name,
        layout.pages.len(),
        bytes.len()
    );
    Ok(ReportFile { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteRow;
    use crate::voting::tally::tally;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_slug_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(file_name("cellshop", date), "cellshop-resultados-2026-01-05.pdf");
    }

    #[test]
    fn generates_a_pdf_document() {
        let rows = vec![
            VoteRow {
                vote_option_id: "a".to_string(),
                text_pt: "Instagram".to_string(),
                text_es: "Instagram".to_string(),
                text_en: "Instagram".to_string(),
            },
            VoteRow {
                vote_option_id: "b".to_string(),
                text_pt: "Indicação".to_string(),
                text_es: "Recomendación".to_string(),
                text_en: "Referral".to_string(),
            },
        ];
        let tally = tally(&rows);
        let brand = Brand::default();
        // 23:30 local is already the next day in UTC; the name follows local time
        let generated_at = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 23, 30, 0)
            .unwrap();

        let file = generate(&ReportInput {
            tally: &tally,
            window: DateWindow::default(),
            generated_at,
            brand: &brand,
            language: Language::Pt,
        })
        .unwrap();

        assert_eq!(file.file_name, "cellshop-resultados-2026-10-19.pdf");
        assert!(file.bytes.starts_with(b"%PDF"));
    }
}
