use tui::style::{Color, Modifier, Style};
use once_cell::sync::Lazy;

/*──────────────────────── Load configured colors ──────────────────────────*/
pub static CONFIG_COLORS: Lazy<crate::config::ColorConfig> = Lazy::new(|| {
    crate::config::Config::load()
        .map(|c| c.colors)
        .unwrap_or_else(|_| crate::config::ColorConfig::default())
});

// Helper to convert RGB array to Color
#[inline]
pub fn rgb(arr: [u8; 3]) -> Color {
    Color::Rgb(arr[0], arr[1], arr[2])
}

/*──────────────────────── Style shortcuts used by the viewer ──────────────*/
#[allow(non_snake_case)]
pub mod STYLE {
    use super::{rgb, Modifier, Style, CONFIG_COLORS};

    fn fg(c: [u8; 3]) -> Style {
        Style::default().fg(rgb(c))
    }

    pub fn default_bg() -> Style { Style::default().bg(rgb(CONFIG_COLORS.default_bg)) }
    pub fn plain() -> Style { fg(CONFIG_COLORS.plain) }
    pub fn header_row() -> Style { fg(CONFIG_COLORS.header_row).add_modifier(Modifier::BOLD) }
    pub fn results_border() -> Style { fg(CONFIG_COLORS.results_border) }
    pub fn aggregate_row() -> Style { fg(CONFIG_COLORS.aggregate_row).add_modifier(Modifier::ITALIC) }
    pub fn missing_cell() -> Style { fg(CONFIG_COLORS.missing_cell).add_modifier(Modifier::DIM) }
    pub fn range_bar() -> Style { fg(CONFIG_COLORS.range_bar) }
    pub fn table_caret() -> Style {
        Style::default()
            .fg(rgb(CONFIG_COLORS.table_caret_fg))
            .bg(rgb(CONFIG_COLORS.table_caret_bg))
    }
    pub fn status_fg() -> Style { fg(CONFIG_COLORS.status_fg) }
    pub fn error_fg() -> Style { fg(CONFIG_COLORS.error_fg) }
}
