use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, MAIN_MENU, PAUSE_MENU, SETTINGS_ITEMS},
    ui::{bold, centered_rect, dim, italic, HORIZONTAL_MARGIN, VERTICAL_MARGIN},
};

const TITLE: &str = "h i t c i r c l e";

fn menu_lines<S: AsRef<str>>(items: &[S], selected: usize) -> Vec<Line<'static>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            if idx == selected {
                Line::from(Span::styled(
                    format!("> {} <", item.as_ref()),
                    bold().fg(Color::Magenta),
                ))
            } else {
                Line::from(Span::styled(item.as_ref().to_string(), dim()))
            }
        })
        .collect()
}

fn status_line(app: &App) -> Paragraph<'static> {
    let text = app.status.clone().unwrap_or_default();
    Paragraph::new(Span::styled(text, Style::default().fg(Color::Red)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

pub fn render_main_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(MAIN_MENU.len() as u16),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(TITLE, bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(menu_lines(&MAIN_MENU, app.menu_index))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    status_line(app).render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(↑/↓) move / (enter) select / (q)uit",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

pub fn render_map_select(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let list_area = chunks[0];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Select a map ", bold()));
    let visible = block.inner(list_area).height.max(1) as usize;

    // keep the selection on screen
    let first = app.map_index.saturating_sub(visible - 1);
    let labels = app
        .maps
        .iter()
        .skip(first)
        .take(visible)
        .map(|m| m.label())
        .collect::<Vec<_>>();

    Paragraph::new(menu_lines(&labels, app.map_index - first))
        .block(block)
        .render(list_area, buf);

    status_line(app).render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "(↑/↓) move / (enter) play / (esc) back",
        italic(),
    ))
    .render(chunks[2], buf);
}

pub fn render_pause_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(30, PAUSE_MENU.len() as u16 + 4, area);
    Clear.render(popup, buf);

    let mut lines = vec![Line::default()];
    lines.extend(menu_lines(&PAUSE_MENU, app.menu_index));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Paused ", bold().fg(Color::Yellow))),
        )
        .render(popup, buf);
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

pub fn render_settings(app: &App, area: Rect, buf: &mut Buffer) {
    let s = &app.settings;
    let values = [
        on_off(s.custom_cursor).to_string(),
        on_off(s.show_feedback).to_string(),
        on_off(s.hitsound_bell).to_string(),
        format!("{}ms", s.clamped_tick_rate()),
    ];
    let items = SETTINGS_ITEMS
        .iter()
        .zip(values.iter())
        .map(|(name, value)| format!("{name:<18}{value:>6}"))
        .collect::<Vec<_>>();

    let popup = centered_rect(40, items.len() as u16 + 6, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(popup);

    let mut lines = vec![Line::default()];
    lines.extend(menu_lines(&items, app.menu_index));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Settings ", bold())),
        )
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(enter) toggle / (←/→) tick rate / (esc) save",
        italic().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[1], buf);
}

pub fn render_about(area: Rect, buf: &mut Buffer) {
    let text = vec![
        Line::from(Span::styled(
            format!("hitcircle {}", env!("CARGO_PKG_VERSION")),
            bold().fg(Color::Cyan),
        )),
        Line::default(),
        Line::from("Click the circles as their approach rings close."),
        Line::from("Left mouse or z / x clicks at the pointer."),
        Line::from("Perfect ±50ms, Great ±100ms, Good ±200ms."),
        Line::from("Misses cost health; run out and the map is failed."),
        Line::default(),
        Line::from(Span::styled("(any key) back", italic())),
    ];

    let popup = centered_rect(60, text.len() as u16 + 2, area);
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" About "))
        .render(popup, buf);
}

pub fn render_tutorial(area: Rect, buf: &mut Buffer) {
    let text = vec![
        Line::from(Span::styled("Tutorial", bold().fg(Color::Cyan))),
        Line::default(),
        Line::from("1. Click the circles as they appear."),
        Line::from("2. Click them in order, following the numbers."),
        Line::from("3. Click when the approach ring closes on the circle."),
        Line::from("4. Missed circles cost health."),
        Line::default(),
        Line::from("A five circle demo follows."),
        Line::default(),
        Line::from(Span::styled(
            "(space / enter / click) start demo / (esc) back",
            italic(),
        )),
    ];

    let popup = centered_rect(64, text.len() as u16 + 2, area);
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL))
        .render(popup, buf);
}
