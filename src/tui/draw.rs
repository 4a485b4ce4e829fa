//! Frame rendering

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use super::app::{Tab, UiApp};
use crate::orchestrator::DisplayState;
use crate::render::{CurrentView, DailyCard, ForecastViews, HourlyCard, SectionView};

/// Screen regions
#[derive(Debug, Clone, Copy)]
pub struct Areas {
    pub input: Rect,
    pub tabs: Rect,
    /// Result area, inside its border
    pub main: Rect,
    pub main_block: Rect,
    pub footer: Rect,
}

#[must_use]
pub fn layout(area: Rect) -> Areas {
    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(inner);

    Areas {
        input: rows[0],
        tabs: rows[1],
        main: rows[2].inner(Margin {
            horizontal: 1,
            vertical: 1,
        }),
        main_block: rows[2],
        footer: rows[3],
    }
}

pub fn draw(frame: &mut Frame, app: &UiApp) {
    let area = frame.size();
    let areas = layout(area);
    let mono = app.mono();
    let unit = app.state().unit();

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(vec![
            Span::styled(" skypane ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                format!("{} ({}) ", unit, unit.temperature_label()),
                Style::default().fg(accent(mono, Color::Cyan)),
            ),
        ]))
        .border_style(Style::default().fg(accent(mono, Color::DarkGray)));
    frame.render_widget(outer, area);

    render_input(frame, areas.input, app);
    render_tabs(frame, areas.tabs, app.tab());

    let display = app.state().display();
    let title = match &display {
        DisplayState::Forecast(views) => views.current.heading.clone(),
        _ => "Weather".to_string(),
    };
    frame.render_widget(
        Block::default().borders(Borders::ALL).title(title),
        areas.main_block,
    );
    if let Some(backdrop) = app.backdrop() {
        frame.render_widget(backdrop, areas.main);
    }
    render_main(frame, areas.main, app.tab(), &display, mono);

    render_footer(frame, areas.footer);
}

fn accent(mono: bool, color: Color) -> Color {
    if mono { Color::White } else { color }
}

fn render_input(frame: &mut Frame, area: Rect, app: &UiApp) {
    let line = Line::from(vec![
        Span::raw(app.input().to_string()),
        Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("City (Enter to search)"),
    );
    frame.render_widget(input, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, selected: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(Span::raw(tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(selected.index())
        .block(Block::default().borders(Borders::ALL).title("View"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .divider(" | ");
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let spans = vec![
        Span::styled("Enter", bold),
        Span::raw(" search  "),
        Span::styled("F2", bold),
        Span::raw(" °C  "),
        Span::styled("F3", bold),
        Span::raw(" °F  "),
        Span::styled("Tab/←/→", bold),
        Span::raw(" views  "),
        Span::styled("Esc", bold),
        Span::raw(" quit"),
    ];
    let footer =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("Keys"));
    frame.render_widget(footer, area);
}

fn render_main(frame: &mut Frame, area: Rect, tab: Tab, display: &DisplayState, mono: bool) {
    match display {
        DisplayState::Idle => message(frame, area, "Type a city name and press Enter.", None),
        DisplayState::Loading => message(
            frame,
            area,
            "Loading weather...",
            Some(accent(mono, Color::Yellow)),
        ),
        DisplayState::Error(error) => message(frame, area, error, Some(accent(mono, Color::Red))),
        DisplayState::Forecast(views) => render_forecast(frame, area, tab, views),
    }
}

fn message(frame: &mut Frame, area: Rect, text: &str, color: Option<Color>) {
    let style = color.map_or_else(Style::default, |c| Style::default().fg(c));
    frame.render_widget(
        Paragraph::new(text.to_string())
            .style(style)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_forecast(frame: &mut Frame, area: Rect, tab: Tab, views: &ForecastViews) {
    match tab {
        Tab::Current => render_current(frame, area, &views.current),
        Tab::Hourly => render_section(frame, area, &views.hourly, hourly_table),
        Tab::Daily => render_section(frame, area, &views.daily, daily_table),
    }
}

fn render_current(frame: &mut Frame, area: Rect, current: &CurrentView) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::raw(current.glyph),
            Span::raw(" "),
            Span::styled(current.condition.clone(), bold),
        ]),
        Line::from(""),
    ];
    lines.extend(current.fields.iter().map(|field| {
        Line::from(vec![
            Span::styled(format!("{:<12}", field.label), bold),
            Span::raw(field.value.clone()),
        ])
    }));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_section<T>(
    frame: &mut Frame,
    area: Rect,
    section: &SectionView<T>,
    table: fn(&[T]) -> Table<'static>,
) {
    match section {
        SectionView::Cards(cards) => frame.render_widget(table(cards), area),
        SectionView::Placeholder(text) => message(frame, area, text, None),
    }
}

fn hourly_table(cards: &[HourlyCard]) -> Table<'static> {
    let rows: Vec<Row> = cards
        .iter()
        .map(|card| {
            Row::new(vec![
                Cell::from(card.time.clone()),
                Cell::from(card.glyph),
                Cell::from(card.temperature.clone()),
                Cell::from(card.feels_like.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Time", "", "Temp", "Feels"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .column_spacing(1)
}

fn daily_table(cards: &[DailyCard]) -> Table<'static> {
    let rows: Vec<Row> = cards
        .iter()
        .map(|card| {
            Row::new(vec![
                Cell::from(format!("{} {}", card.weekday, card.date)),
                Cell::from(card.glyph),
                Cell::from(card.description),
                Cell::from(card.high.clone()),
                Cell::from(card.low.clone()),
                Cell::from(card.feels_like.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Day", "", "Summary", "High", "Low", "Feels Like"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(3),
            Constraint::Length(14),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .column_spacing(1)
}
