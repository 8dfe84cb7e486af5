use crate::models::VoteOption;
use serde::{Deserialize, Serialize};

/// Languages a kiosk can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Pt,
    Es,
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Pt, Language::Es, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::Es => "es",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pt" | "pt-br" | "pt-pt" => Some(Language::Pt),
            "es" | "es-es" | "es-py" => Some(Language::Es),
            "en" | "en-us" | "en-gb" => Some(Language::En),
            _ => None,
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Language::Pt => "🇧🇷",
            Language::Es => "🇪🇸",
            Language::En => "🇺🇸",
        }
    }

    /// The option text in this language.
    pub fn label(self, option: &VoteOption) -> &str {
        match self {
            Language::Pt => &option.text_pt,
            Language::Es => &option.text_es,
            Language::En => &option.text_en,
        }
    }
}

/// Every user-facing string, one table per language.
pub struct Translations {
    // kiosk
    pub select_language: &'static str,
    pub portuguese: &'static str,
    pub spanish: &'static str,
    pub english: &'static str,
    pub question: &'static str,
    pub thank_you: &'static str,
    pub thank_you_message: &'static str,
    pub error_submitting: &'static str,
    pub processing: &'static str,
    pub no_active_options: &'static str,
    pub change_language: &'static str,

    // admin session
    pub admin_panel: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub login_failed: &'static str,
    pub login_success: &'static str,
    pub logged_out: &'static str,
    pub not_signed_in: &'static str,
    pub language_changed: &'static str,

    // options manager
    pub vote_options: &'static str,
    pub add_option: &'static str,
    pub edit: &'static str,
    pub delete: &'static str,
    pub active: &'static str,
    pub inactive: &'static str,
    pub active_field: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub display_order: &'static str,
    pub confirm_delete: &'static str,
    pub confirm: &'static str,
    pub cancel: &'static str,
    pub option_saved: &'static str,
    pub option_deleted: &'static str,
    pub option_not_found: &'static str,
    pub deletion_cancelled: &'static str,
    pub pick_option: &'static str,
    pub no_options: &'static str,
    pub save_failed: &'static str,

    // kiosk management
    pub kiosk_opened: &'static str,
    pub kiosk_closed: &'static str,
    pub kiosk_refreshed: &'static str,

    // results
    pub results: &'static str,
    pub total_votes: &'static str,
    pub votes: &'static str,
    pub no_data: &'static str,
    pub invalid_date: &'static str,
    pub export_pdf: &'static str,
    pub report_ready: &'static str,
    pub report_failed: &'static str,

    // report document
    pub report_title: &'static str,
    pub generated_at: &'static str,
    pub filtered_period: &'static str,
    pub period_start: &'static str,
    pub period_today: &'static str,
    pub until: &'static str,
    pub summary: &'static str,
    pub options_with_votes: &'static str,
    pub detailed_results: &'static str,
    pub option_column: &'static str,
    pub chart_title: &'static str,
    pub voting_system: &'static str,
    pub page: &'static str,
    pub of: &'static str,
    pub months: [&'static str; 12],
}

static PT: Translations = Translations {
    select_language: "Selecione o idioma",
    portuguese: "Português",
    spanish: "Español",
    english: "English",
    question: "Onde você nos conheceu?",
    thank_you: "Obrigado!",
    thank_you_message: "Seu voto foi registrado com sucesso.",
    error_submitting: "Erro ao enviar o voto. Tente novamente.",
    processing: "Processando...",
    no_active_options: "Nenhuma opção disponível no momento.",
    change_language: "Idioma",

    admin_panel: "Painel Administrativo",
    email: "E-mail",
    password: "Senha",
    login_failed: "Email ou senha inválidos",
    login_success: "Login realizado com sucesso.",
    logged_out: "Você saiu do painel administrativo.",
    not_signed_in: "Faça login com /admin login para continuar.",
    language_changed: "Idioma alterado.",

    vote_options: "Opções de Votação",
    add_option: "Adicionar Opção",
    edit: "Editar",
    delete: "Excluir",
    active: "Ativa",
    inactive: "Inativa",
    active_field: "Ativa? (sim/não)",
    yes: "sim",
    no: "não",
    display_order: "Ordem",
    confirm_delete: "Tem certeza que deseja excluir esta opção?",
    confirm: "Confirmar",
    cancel: "Cancelar",
    option_saved: "Opção salva.",
    option_deleted: "Opção excluída.",
    option_not_found: "Opção não encontrada.",
    deletion_cancelled: "Exclusão cancelada.",
    pick_option: "Escolha uma opção para editar",
    no_options: "Nenhuma opção cadastrada.",
    save_failed: "Não foi possível salvar. Tente novamente.",

    kiosk_opened: "Quiosque de votação aberto neste canal.",
    kiosk_closed: "Quiosques fechados neste canal:",
    kiosk_refreshed: "Quiosques atualizados.",

    results: "Resultados",
    total_votes: "Total de Votos",
    votes: "votos",
    no_data: "Nenhum voto registrado.",
    invalid_date: "Data inválida, use o formato AAAA-MM-DD.",
    export_pdf: "Exportar PDF",
    report_ready: "Relatório gerado.",
    report_failed: "Não foi possível gerar o relatório.",

    report_title: "Relatório de Resultados da Votação",
    generated_at: "Data de geração",
    filtered_period: "Período filtrado",
    period_start: "Início",
    period_today: "Hoje",
    until: "até",
    summary: "Resumo Geral",
    options_with_votes: "Opções Votadas",
    detailed_results: "Resultados Detalhados",
    option_column: "Opção",
    chart_title: "Gráfico de Distribuição",
    voting_system: "Sistema de Votação",
    page: "Página",
    of: "de",
    months: [
        "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto",
        "setembro", "outubro", "novembro", "dezembro",
    ],
};

static ES: Translations = Translations {
    select_language: "Seleccione el idioma",
    portuguese: "Português",
    spanish: "Español",
    english: "English",
    question: "¿Dónde nos conociste?",
    thank_you: "¡Gracias!",
    thank_you_message: "Tu voto fue registrado con éxito.",
    error_submitting: "Error al enviar el voto. Inténtalo de nuevo.",
    processing: "Procesando...",
    no_active_options: "No hay opciones disponibles en este momento.",
    change_language: "Idioma",

    admin_panel: "Panel de Administración",
    email: "Correo electrónico",
    password: "Contraseña",
    login_failed: "Correo o contraseña inválidos",
    login_success: "Sesión iniciada.",
    logged_out: "Saliste del panel de administración.",
    not_signed_in: "Inicia sesión con /admin login para continuar.",
    language_changed: "Idioma cambiado.",

    vote_options: "Opciones de Votación",
    add_option: "Agregar Opción",
    edit: "Editar",
    delete: "Eliminar",
    active: "Activa",
    inactive: "Inactiva",
    active_field: "¿Activa? (sí/no)",
    yes: "sí",
    no: "no",
    display_order: "Orden",
    confirm_delete: "¿Seguro que deseas eliminar esta opción?",
    confirm: "Confirmar",
    cancel: "Cancelar",
    option_saved: "Opción guardada.",
    option_deleted: "Opción eliminada.",
    option_not_found: "Opción no encontrada.",
    deletion_cancelled: "Eliminación cancelada.",
    pick_option: "Elige una opción para editar",
    no_options: "No hay opciones registradas.",
    save_failed: "No se pudo guardar. Inténtalo de nuevo.",

    kiosk_opened: "Quiosco de votación abierto en este canal.",
    kiosk_closed: "Quioscos cerrados en este canal:",
    kiosk_refreshed: "Quioscos actualizados.",

    results: "Resultados",
    total_votes: "Total de Votos",
    votes: "votos",
    no_data: "No hay votos registrados.",
    invalid_date: "Fecha inválida, usa el formato AAAA-MM-DD.",
    export_pdf: "Exportar PDF",
    report_ready: "Informe generado.",
    report_failed: "No se pudo generar el informe.",

    report_title: "Informe de Resultados de la Votación",
    generated_at: "Fecha de generación",
    filtered_period: "Período filtrado",
    period_start: "Inicio",
    period_today: "Hoy",
    until: "hasta",
    summary: "Resumen General",
    options_with_votes: "Opciones Votadas",
    detailed_results: "Resultados Detallados",
    option_column: "Opción",
    chart_title: "Gráfico de Distribución",
    voting_system: "Sistema de Votación",
    page: "Página",
    of: "de",
    months: [
        "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
        "septiembre", "octubre", "noviembre", "diciembre",
    ],
};

static EN: Translations = Translations {
    select_language: "Select your language",
    portuguese: "Português",
    spanish: "Español",
    english: "English",
    question: "Where did you meet us?",
    thank_you: "Thank you!",
    thank_you_message: "Your vote has been recorded.",
    error_submitting: "Could not submit your vote. Please try again.",
    processing: "Processing...",
    no_active_options: "No options are available right now.",
    change_language: "Language",

    admin_panel: "Admin Panel",
    email: "Email",
    password: "Password",
    login_failed: "Invalid email or password",
    login_success: "Signed in.",
    logged_out: "You left the admin panel.",
    not_signed_in: "Sign in with /admin login to continue.",
    language_changed: "Language changed.",

    vote_options: "Vote Options",
    add_option: "Add Option",
    edit: "Edit",
    delete: "Delete",
    active: "Active",
    inactive: "Inactive",
    active_field: "Active? (yes/no)",
    yes: "yes",
    no: "no",
    display_order: "Order",
    confirm_delete: "Are you sure you want to delete this option?",
    confirm: "Confirm",
    cancel: "Cancel",
    option_saved: "Option saved.",
    option_deleted: "Option deleted.",
    option_not_found: "Option not found.",
    deletion_cancelled: "Deletion cancelled.",
    pick_option: "Pick an option to edit",
    no_options: "No options yet.",
    save_failed: "Could not save. Please try again.",

    kiosk_opened: "Voting kiosk opened in this channel.",
    kiosk_closed: "Kiosks closed in this channel:",
    kiosk_refreshed: "Kiosks refreshed.",

    results: "Results",
    total_votes: "Total Votes",
    votes: "votes",
    no_data: "No votes recorded.",
    invalid_date: "Invalid date, use the YYYY-MM-DD format.",
    export_pdf: "Export PDF",
    report_ready: "Report generated.",
    report_failed: "The report could not be generated.",

    report_title: "Voting Results Report",
    generated_at: "Generated on",
    filtered_period: "Filtered period",
    period_start: "Start",
    period_today: "Today",
    until: "to",
    summary: "Summary",
    options_with_votes: "Options Voted",
    detailed_results: "Detailed Results",
    option_column: "Option",
    chart_title: "Distribution Chart",
    voting_system: "Voting System",
    page: "Page",
    of: "of",
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ],
};

pub fn translations(language: Language) -> &'static Translations {
    match language {
        Language::Pt => &PT,
        Language::Es => &ES,
        Language::En => &EN,
    }
}

/// The active UI language of one kiosk or one admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageContext {
    language: Language,
}

impl LanguageContext {
    pub fn new(default: Language) -> Self {
        Self { language: default }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set(&mut self, language: Language) {
        self.language = language;
    }

    pub fn t(&self) -> &'static Translations {
        translations(self.language)
    }
}

/// Reads the option form's active field. Unrecognised answers mean inactive.
pub fn parse_yes_no(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "yes" | "y" | "sim" | "s" | "sí" | "si" | "true" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pt", Some(Language::Pt))]
    #[case("PT-BR", Some(Language::Pt))]
    #[case("es", Some(Language::Es))]
    #[case(" en-us ", Some(Language::En))]
    #[case("fr", None)]
    fn language_codes(#[case] code: &str, #[case] expected: Option<Language>) {
        assert_eq!(Language::from_code(code), expected);
    }

    #[test]
    fn codes_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), Some(language));
        }
    }

    #[test]
    fn context_switches_translations() {
        let mut ctx = LanguageContext::new(Language::Pt);
        assert_eq!(ctx.t().question, "Onde você nos conheceu?");
        ctx.set(Language::En);
        assert_eq!(ctx.language(), Language::En);
        assert_eq!(ctx.t().question, "Where did you meet us?");
    }

    #[rstest]
    #[case("sim", true)]
    #[case("Sí", true)]
    #[case("YES", true)]
    #[case("1", true)]
    #[case("não", false)]
    #[case("", false)]
    #[case("maybe", false)]
    fn yes_no(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_yes_no(raw), expected);
    }
}
