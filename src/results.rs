//! Terminal view of one heavy-hitters table.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui::{
    backend::Backend,
    layout::Rect as UiRect,
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::cells::{render_table, RenderedRow, RenderedTable};
use crate::config::DisplayConfig;
use crate::error::RenderError;
use crate::follow_up::FilterHeavyRequest;
use crate::palette::STYLE;
use crate::schema::Schema;
use crate::top_list::TopList;

const MIN_COL_WIDTH: u16 = 4;
const MAX_COL_WIDTH: u16 = 40;

/// What the event loop should do after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction {
    None,
    Quit,
    /// Ask for the rows outside the top list as a regular table.
    ShowAsTable,
}

pub struct HittersView {
    pub heavy_hitters_id: String,
    pub schema: Schema,
    pub table: RenderedTable,
    pub cursor_row: usize,
    pub view_row: usize,
    pub max_rows: usize,
    pub missing_marker: String,
    pub range_width: usize,
    pub status_message: Option<(String, bool)>,
    widths_cache: Option<Vec<u16>>,
}

impl HittersView {
    pub fn new(list: &TopList, display: &DisplayConfig) -> Result<Self, RenderError> {
        Ok(Self {
            heavy_hitters_id: list.heavy_hitters_id.clone(),
            schema: list.schema.clone(),
            table: render_table(list)?,
            cursor_row: 0,
            view_row: 0,
            max_rows: display.max_rows.max(1),
            missing_marker: display.missing_marker.clone(),
            range_width: display.range_width,
            status_message: None,
            widths_cache: None,
        })
    }

    pub fn row_count(&self) -> usize {
        self.table.rows.len()
    }

    pub fn follow_up_request(&self) -> FilterHeavyRequest {
        FilterHeavyRequest::new(self.heavy_hitters_id.clone(), self.schema.clone())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), false));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), true));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        // releases and repeats arrive as separate events on Windows
        if key.kind != KeyEventKind::Press {
            return ViewAction::None;
        }
        let last = self.row_count().saturating_sub(1);
        match (key.code, key.modifiers) {
            (KeyCode::Char('q') | KeyCode::Char('Q'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), _)
            | (KeyCode::Esc, _) => return ViewAction::Quit,
            (KeyCode::Char('t') | KeyCode::Char('T'), _) => return ViewAction::ShowAsTable,
            (KeyCode::Up, _) => self.cursor_row = self.cursor_row.saturating_sub(1),
            (KeyCode::Down, _) => self.cursor_row = (self.cursor_row + 1).min(last),
            (KeyCode::PageUp, _) => self.cursor_row = self.cursor_row.saturating_sub(self.max_rows),
            (KeyCode::PageDown, _) => self.cursor_row = (self.cursor_row + self.max_rows).min(last),
            (KeyCode::Home, _) => self.cursor_row = 0,
            (KeyCode::End, _) => self.cursor_row = last,
            _ => {}
        }
        self.nudge_viewport();
        ViewAction::None
    }

    /// Keep the cursor inside the visible window.
    pub fn nudge_viewport(&mut self) {
        if self.cursor_row < self.view_row {
            self.view_row = self.cursor_row;
        }
        if self.cursor_row >= self.view_row + self.max_rows {
            self.view_row = self.cursor_row + 1 - self.max_rows;
        }
    }

    /// Widths of every column, range bar included, padding included.
    pub fn column_widths(&mut self) -> &[u16] {
        if self.widths_cache.is_none() {
            let mut widths: Vec<u16> = self
                .table
                .headers
                .iter()
                .map(|h| h.chars().count() as u16 + 2)
                .collect();
            for row in self.table.rows.iter().take(100) {
                for (i, cell) in row.text_cells(&self.missing_marker).iter().enumerate() {
                    let len = cell.chars().take(MAX_COL_WIDTH as usize).count() as u16 + 2;
                    if let Some(w) = widths.get_mut(i) {
                        *w = (*w).max(len);
                    }
                }
            }
            for w in widths.iter_mut() {
                *w = (*w).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH);
            }
            if let Some(range) = widths.last_mut() {
                *range = (*range).max(self.range_width as u16 + 2);
            }
            self.widths_cache = Some(widths);
        }
        self.widths_cache.as_deref().unwrap_or_default()
    }

    fn title(&self) -> String {
        let listed = self.table.rows.iter().filter(|r| !r.aggregate).count();
        format!(
            "Heavy hitters {} ({} rows of {})",
            self.heavy_hitters_id, listed, self.table.total
        )
    }

    fn row_spans(&self, row: &RenderedRow, widths: &[u16], selected: bool) -> Spans<'static> {
        let base = if selected {
            STYLE::table_caret()
        } else if row.aggregate {
            STYLE::aggregate_row()
        } else {
            STYLE::plain()
        };

        let mut spans = Vec::with_capacity(widths.len());
        spans.push(Span::styled(fit(&row.rank.to_string(), widths[0]), base));
        for (j, value) in row.values.iter().enumerate() {
            let w = widths.get(j + 1).copied().unwrap_or(MIN_COL_WIDTH);
            let span = match value {
                Some(text) => Span::styled(fit(text, w), base),
                None if selected => Span::styled(fit(&self.missing_marker, w), base),
                None => Span::styled(fit(&self.missing_marker, w), STYLE::missing_cell()),
            };
            spans.push(span);
        }
        let n = row.values.len();
        let w = |i: usize| widths.get(i).copied().unwrap_or(MIN_COL_WIDTH);
        spans.push(Span::styled(fit(&row.count.to_string(), w(n + 1)), base));
        spans.push(Span::styled(fit(&row.percentage, w(n + 2)), base));
        spans.push(Span::styled(
            format!(" {}", row.range.render(self.range_width)),
            if selected { base } else { STYLE::range_bar() },
        ));
        Spans::from(spans)
    }

    pub fn render<B: Backend>(&mut self, f: &mut Frame<B>, area: UiRect) {
        let widths = self.column_widths().to_vec();

        let block = Block::default()
            .title(Span::styled(self.title(), STYLE::header_row()))
            .borders(Borders::ALL)
            .border_style(STYLE::results_border())
            .style(STYLE::default_bg());
        f.render_widget(block, area);
        if area.width < 3 || area.height < 4 {
            return;
        }

        let inner = UiRect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width - 2,
            height: area.height - 2,
        };

        // header, rows, status line
        let visible = (inner.height as usize).saturating_sub(2).min(self.max_rows);
        if visible > 0 && self.cursor_row >= self.view_row + visible {
            self.view_row = self.cursor_row + 1 - visible;
        }

        let header: Vec<Span> = self
            .table
            .headers
            .iter()
            .zip(widths.iter())
            .map(|(h, &w)| Span::styled(fit(h, w), STYLE::header_row()))
            .collect();
        let mut lines = vec![Spans::from(header)];

        for (i, row) in self
            .table
            .rows
            .iter()
            .enumerate()
            .skip(self.view_row)
            .take(visible)
        {
            lines.push(self.row_spans(row, &widths, i == self.cursor_row));
        }

        f.render_widget(
            Paragraph::new(lines),
            UiRect { height: inner.height - 1, ..inner },
        );

        let status = match &self.status_message {
            Some((msg, true)) => Span::styled(msg.clone(), STYLE::error_fg()),
            Some((msg, false)) => Span::styled(msg.clone(), STYLE::status_fg()),
            None => Span::styled("t: view as table   q: quit", STYLE::status_fg()),
        };
        f.render_widget(
            Paragraph::new(Spans::from(status)),
            UiRect { y: inner.y + inner.height - 1, height: 1, ..inner },
        );
    }
}

/// Pad or truncate to exactly `width` columns.
fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    let len = text.chars().count();
    if len + 1 > width && width > 1 {
        let kept: String = text.chars().take(width.saturating_sub(2)).collect();
        format!("{kept}… ")
    } else {
        format!("{:width$}", text, width = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heavy_hitters::Entry;
    use crate::schema::ColumnDescription;
    use crate::value::{ContentsKind, Value};

    fn view(n: usize, max_rows: usize) -> HittersView {
        let rows = (0..n)
            .map(|i| Entry::new(vec![Value::Integer(i as i64)], 10))
            .collect();
        let list = TopList {
            heavy_hitters_id: "hh-9".into(),
            schema: Schema::new(vec![ColumnDescription::new("n", ContentsKind::Integer)]),
            row_count: 10 * n as u64 + 5,
            rows: Some(rows),
        };
        let display = DisplayConfig { max_rows, ..DisplayConfig::default() };
        HittersView::new(&list, &display).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_moves_and_scrolls() {
        let mut v = view(9, 4);
        assert_eq!(v.row_count(), 10);

        for _ in 0..5 {
            assert_eq!(v.handle_key(key(KeyCode::Down)), ViewAction::None);
        }
        assert_eq!(v.cursor_row, 5);
        assert_eq!(v.view_row, 2);

        v.handle_key(key(KeyCode::End));
        assert_eq!(v.cursor_row, 9);
        v.handle_key(key(KeyCode::Down));
        assert_eq!(v.cursor_row, 9);

        v.handle_key(key(KeyCode::Home));
        assert_eq!((v.cursor_row, v.view_row), (0, 0));

        v.handle_key(key(KeyCode::PageDown));
        assert_eq!(v.cursor_row, 4);
    }

    #[test]
    fn keys_map_to_actions() {
        let mut v = view(2, 10);
        assert_eq!(v.handle_key(key(KeyCode::Char('t'))), ViewAction::ShowAsTable);
        assert_eq!(v.handle_key(key(KeyCode::Esc)), ViewAction::Quit);
        assert_eq!(
            v.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            ViewAction::Quit
        );
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut v = view(5, 10);
        let release = |code| KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release);

        assert_eq!(v.handle_key(key(KeyCode::Down)), ViewAction::None);
        assert_eq!(v.handle_key(release(KeyCode::Down)), ViewAction::None);
        assert_eq!(v.cursor_row, 1);

        assert_eq!(v.handle_key(release(KeyCode::Char('t'))), ViewAction::None);
        assert_eq!(v.handle_key(release(KeyCode::Char('q'))), ViewAction::None);
    }

    #[test]
    fn follow_up_names_this_list() {
        let v = view(1, 10);
        let req = v.follow_up_request();
        assert_eq!(req.hitters_id, "hh-9");
        assert_eq!(req.method, "filterHeavy");
        assert_eq!(req.schema.len(), 1);
    }

    #[test]
    fn range_column_fits_the_bar() {
        let mut v = view(3, 10);
        let range_width = v.range_width as u16;
        let widths = v.column_widths();
        assert_eq!(widths.len(), 5);
        assert!(*widths.last().unwrap() >= range_width + 2);
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "ab… ");
    }
}
