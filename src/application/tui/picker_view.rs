use super::session::{PickerSession, SessionOutcome};
use super::theme::Theme;
use crate::application::{DatePicker, Formatters};
use crate::domain::TableCell;
use crate::entities::{ActivePicker, Granularity};
use chrono::Weekday;
use crossterm::ExecutableCommand;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, poll,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{self, Stdout, stdout};

const PICKER_WIDTH: u16 = 36;
const TITLE_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 1;
const TABLE_HEIGHT: u16 = 11;
const HELP_HEIGHT: u16 = 3;

pub struct PickerView {
    session: PickerSession,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    show_help: bool,
    theme: Theme,
}

impl PickerView {
    pub fn new(picker: DatePicker, theme: Theme) -> io::Result<Self> {
        if !IsTty::is_tty(&std::io::stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode()
            .map_err(|e| io::Error::other(format!("Failed to enable raw mode: {}", e)))?;

        stdout()
            .execute(EnterAlternateScreen)
            .and_then(|out| out.execute(EnableMouseCapture))
            .map_err(|e| {
                let _ = disable_raw_mode(); // Clean up on failure
                io::Error::other(format!("Failed to enter alternate screen: {}", e))
            })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::other(format!("Failed to create terminal: {}", e))
        })?;

        Ok(Self {
            session: PickerSession::new(picker),
            terminal,
            show_help: false,
            theme,
        })
    }

    /// Run the picker until a value is chosen or the user leaves.
    pub fn run(&mut self) -> io::Result<SessionOutcome> {
        let outcome = loop {
            let session = &self.session;
            let theme = &self.theme;
            let show_help = self.show_help;
            self.terminal
                .draw(|frame| render(frame, session, theme, show_help))?;

            if !poll(std::time::Duration::from_millis(100))? {
                continue;
            }

            let outcome = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('?') {
                        self.show_help = !self.show_help;
                        None
                    } else {
                        self.session.handle_key(key)
                    }
                }
                Event::Mouse(mouse) => self.session.handle_mouse(mouse.kind),
                // Resize and focus events only need a redraw
                _ => None,
            };

            if let Some(outcome) = outcome {
                break outcome;
            }
        };

        self.cleanup()?;
        log::debug!("picker finished with {:?}", outcome);
        Ok(outcome)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(DisableMouseCapture)?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for PickerView {
    fn drop(&mut self) {
        // Fallback cleanup if run() returned early
        let _ = self.cleanup();
    }
}

fn render(frame: &mut Frame, session: &PickerSession, theme: &Theme, show_help: bool) {
    let picker = session.picker();
    let formatters = &picker.options().appearance.formatters;

    let height = TITLE_HEIGHT
        + HEADER_HEIGHT
        + TABLE_HEIGHT
        + if show_help { HELP_HEIGHT } else { 0 };
    let area = centered_area(frame.area(), PICKER_WIDTH, height);

    let mut constraints = vec![
        Constraint::Length(TITLE_HEIGHT),
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(TABLE_HEIGHT),
    ];
    if show_help {
        constraints.push(Constraint::Length(HELP_HEIGHT));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    frame.render_widget(title_widget(session, formatters, theme), chunks[0]);
    frame.render_widget(header_widget(session, formatters, theme), chunks[1]);

    let cells = session.cells();
    let table = match picker.active_picker() {
        ActivePicker::Year => year_table(&cells, session.cursor(), formatters, theme),
        ActivePicker::Month => month_table(&cells, session.cursor(), formatters, theme),
        ActivePicker::Date => day_table(session, formatters, theme),
    };
    frame.render_widget(table, chunks[2]);

    if show_help {
        frame.render_widget(help_widget(theme), chunks[3]);
    }
}

fn centered_area(available: Rect, needed_width: u16, needed_height: u16) -> Rect {
    let width = available.width.min(needed_width);
    let height = available.height.min(needed_height);

    Rect {
        x: available.x + available.width.saturating_sub(width) / 2,
        y: available.y + available.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn title_widget(session: &PickerSession, formatters: &Formatters, theme: &Theme) -> Paragraph<'static> {
    let picker = session.picker();
    let (year, rest) = match picker.value() {
        Some(value) => (formatters.year(&value), formatters.title(&value)),
        None => ("-".to_string(), "-".to_string()),
    };

    // The year line is highlighted while the year table is shown.
    let active = theme.colors.accent.to_ratatui_with_modifier(Modifier::BOLD);
    let inactive = theme.colors.normal_text.to_ratatui();
    let (year_style, rest_style) = match picker.active_picker() {
        ActivePicker::Year => (active, inactive),
        _ => (inactive, active),
    };

    let mut lines = vec![Line::from(Span::styled(year, year_style))];
    if picker.granularity() != Granularity::Year {
        lines.push(Line::from(Span::styled(rest, rest_style)));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.colors.border.to_ratatui()),
        )
        .alignment(Alignment::Left)
}

fn header_widget(session: &PickerSession, formatters: &Formatters, theme: &Theme) -> Paragraph<'static> {
    let picker = session.picker();
    let appearance = &picker.options().appearance;
    let label = match picker.active_picker() {
        ActivePicker::Year => {
            let decade = picker.period().decade();
            format!("{}-{}", decade, decade + 9)
        }
        ActivePicker::Month => formatters.header(&picker.period().year().to_string()),
        ActivePicker::Date => formatters.header(&picker.table_date()),
    };

    let arrow = theme.colors.accent.to_ratatui();
    Paragraph::new(Line::from(vec![
        Span::styled(icon(&appearance.prepend_icon), arrow),
        Span::styled(format!("  {}  ", label), theme.colors.header.to_ratatui()),
        Span::styled(icon(&appearance.append_icon), arrow),
    ]))
    .alignment(Alignment::Center)
}

/// Glyph for a named icon; unknown names are shown as written.
fn icon(name: &str) -> String {
    match name {
        "chevron_left" => "‹".to_string(),
        "chevron_right" => "›".to_string(),
        other => other.to_string(),
    }
}

fn cell_style(cell: &TableCell, is_cursor: bool, theme: &Theme) -> Style {
    let colors = &theme.colors;
    match (cell.selected, is_cursor) {
        // Selected colors win; the cursor on top of them is underlined.
        (true, true) => colors.selected.to_ratatui_with_modifier(Modifier::UNDERLINED),
        (true, false) => colors.selected.to_ratatui(),
        (false, true) if !cell.allowed => colors.cursor.to_ratatui_with_modifier(Modifier::DIM),
        (false, true) => colors.cursor.to_ratatui_with_modifier(Modifier::BOLD),
        (false, false) if !cell.allowed => colors.disallowed.to_ratatui(),
        (false, false) if cell.current => colors.current.to_ratatui_with_modifier(Modifier::BOLD),
        (false, false) => colors.normal_text.to_ratatui(),
    }
}

fn year_table(cells: &[TableCell], cursor: usize, formatters: &Formatters, theme: &Theme) -> Table<'static> {
    let rows: Vec<Row> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let label = formatters.year(&cell.token.to_string());
            Row::new(vec![Cell::from(label).style(cell_style(cell, i == cursor, theme))])
        })
        .collect();

    Table::new(rows, [Constraint::Percentage(100)])
}

fn month_table(cells: &[TableCell], cursor: usize, formatters: &Formatters, theme: &Theme) -> Table<'static> {
    let rows: Vec<Row> = cells
        .chunks(3)
        .enumerate()
        .map(|(row, chunk)| {
            let row_cells: Vec<Cell> = chunk
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let label = formatters.month(&cell.token.to_string());
                    Cell::from(label).style(cell_style(cell, row * 3 + col == cursor, theme))
                })
                .collect();
            Row::new(row_cells).height(2)
        })
        .collect();

    Table::new(rows, [Constraint::Ratio(1, 3); 3]).column_spacing(1)
}

fn day_table(session: &PickerSession, formatters: &Formatters, theme: &Theme) -> Table<'static> {
    let picker = session.picker();
    let cursor = session.cursor();

    let header = Row::new(
        picker
            .weekday_headers()
            .into_iter()
            .map(|weekday| {
                let colors = &theme.colors;
                let style = match weekday {
                    Weekday::Sat | Weekday::Sun => colors.weekend.to_ratatui(),
                    _ => colors.header.to_ratatui(),
                };
                Cell::from(weekday.to_string().chars().take(2).collect::<String>()).style(style)
            })
            .collect::<Vec<_>>(),
    );

    let mut index = 0;
    let rows: Vec<Row> = picker
        .day_weeks()
        .iter()
        .map(|week| {
            let row_cells: Vec<Cell> = week
                .iter()
                .map(|slot| match slot {
                    Some(cell) => {
                        let is_cursor = index == cursor;
                        index += 1;
                        let label = formatters.day(&cell.token.to_string());
                        Cell::from(format!("{:>2}", label)).style(cell_style(cell, is_cursor, theme))
                    }
                    None => Cell::from(""),
                })
                .collect();
            Row::new(row_cells)
        })
        .collect();

    Table::new(rows, [Constraint::Length(3); 7])
        .header(header)
        .column_spacing(1)
}

fn help_widget(theme: &Theme) -> Paragraph<'static> {
    let help_text = vec![
        Line::from(Span::styled(
            "←→↑↓/hjkl=Move • Enter=Pick • [ ]=Prev/Next • u=Up",
            theme.colors.help_text.to_ratatui(),
        )),
        Line::from(Span::styled(
            "PgUp/PgDn=Scroll • t=Today • ?=Help • q=Quit",
            theme.colors.help_text.to_ratatui(),
        )),
    ];

    Paragraph::new(help_text).alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateToken;

    #[test]
    fn test_centered_area_fits_small_screens() {
        let area = centered_area(Rect::new(0, 0, 100, 40), PICKER_WIDTH, 20);
        assert_eq!(area, Rect::new(32, 10, PICKER_WIDTH, 20));

        let area = centered_area(Rect::new(0, 0, 20, 10), PICKER_WIDTH, 20);
        assert_eq!(area, Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn test_cursor_uses_theme_cursor_colors() {
        let theme = Theme::dark();
        let mut cell = TableCell {
            token: DateToken::from_year(2013).unwrap(),
            selected: false,
            current: false,
            allowed: true,
        };

        assert_eq!(
            cell_style(&cell, true, &theme),
            theme.colors.cursor.to_ratatui_with_modifier(Modifier::BOLD)
        );
        assert_eq!(cell_style(&cell, false, &theme), theme.colors.normal_text.to_ratatui());

        cell.selected = true;
        assert_eq!(
            cell_style(&cell, true, &theme),
            theme.colors.selected.to_ratatui_with_modifier(Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_icon_names() {
        assert_eq!(icon("chevron_left"), "‹");
        assert_eq!(icon("<<"), "<<");
    }
}
