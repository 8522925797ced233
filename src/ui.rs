use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Axis, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, ListState,
        Paragraph, Wrap,
    },
    Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::api_client::CityFeed;
use crate::classify::{classify, Classification};
use crate::suggest;
use crate::trend;

pub enum UiEvent {
    Report { city: String, feed: CityFeed },
    LookupFailed { city: String, detail: String },
    Marker(CityMarker),
    Status(String),
}

#[derive(Clone)]
pub struct CityMarker {
    pub city: String,
    pub aqi: f64,
    pub lat: f64,
    pub lng: f64,
}

pub struct UiContext {
    // candidates for "did you mean" beyond whatever is in the recent list
    pub known_cities: Vec<String>,
    pub recent: Vec<String>,
}

struct Report {
    city: String,
    feed: CityFeed,
    class: Classification,
}

struct UiState {
    input: String,
    recent: Vec<String>,
    recent_sel: ListState,
    report: Option<Report>,
    trend_points: Vec<(f64, f64)>,
    markers: Vec<CityMarker>,
    status: Vec<String>,
    pending: u32,
}

impl UiState {
    fn new(recent: Vec<String>) -> Self {
        Self {
            input: String::new(),
            recent,
            recent_sel: ListState::default(),
            report: None,
            trend_points: vec![],
            markers: vec![],
            status: vec![],
            pending: 0,
        }
    }

    fn push_status(&mut self, line: String) {
        self.status.push(line);
        if self.status.len() > 50 {
            self.status.remove(0);
        }
    }
}

fn hex_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return Color::Gray;
    }
    let byte = |i| u8::from_str_radix(&h[i..i + 2], 16).unwrap_or(0);
    Color::Rgb(byte(0), byte(2), byte(4))
}

fn format_reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "N/A".into(),
    }
}

// Chart points, y clamped to the display range of the axis.
fn trend_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v.clamp(0.0, 500.0)))
        .collect()
}

fn reading_lines(report: &Report, width: usize) -> Vec<Line<'static>> {
    let feed = &report.feed;
    let class = &report.class;
    let color = hex_color(class.color);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", feed.aqi),
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("{} — {}", report.city, class.severity.name()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", class.severity.label()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
    ];

    for row in textwrap::wrap(class.advice, width.max(20)) {
        lines.push(Line::from(row.into_owned()));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(format!(
        "temp {}   humidity {}   wind {}",
        format_reading(feed.reading("t"), "°C"),
        format_reading(feed.reading("h"), "%"),
        format_reading(feed.reading("w"), " m/s"),
    )));

    // formatting of the pollutant pairs happens here, at the edge
    let summary = feed
        .pollutants()
        .into_iter()
        .map(|(code, v)| format!("{}: {}", code.to_uppercase(), v))
        .collect::<Vec<_>>()
        .join(", ");
    for row in textwrap::wrap(&summary, width.max(20)) {
        lines.push(Line::from(Span::styled(
            row.into_owned(),
            Style::default().fg(Color::Gray),
        )));
    }

    lines.push(Line::from(Span::styled(
        format!("updated {}", feed.time.s),
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

pub fn run_loop<F, R>(
    rx: Receiver<UiEvent>,
    ctx: UiContext,
    mut on_submit: F,
    mut on_recorded: R,
) -> anyhow::Result<()>
where
    F: FnMut(String),
    R: FnMut(&str) -> Vec<String>,
{
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = UiState::new(ctx.recent);
    let mut frame = 0u64;

    loop {
        // 1) Pull fetch results (non-blocking) and update state
        while let Ok(ev) = rx.try_recv() {
            match ev {
                UiEvent::Report { city, feed } => {
                    state.pending = state.pending.saturating_sub(1);
                    let class = classify(feed.aqi);
                    state.trend_points = trend_points(&trend::synthesize(feed.aqi));
                    state.recent = on_recorded(&city);
                    if state
                        .recent_sel
                        .selected()
                        .is_some_and(|i| i >= state.recent.len())
                    {
                        state.recent_sel.select(None);
                    }
                    state.report = Some(Report { city, feed, class });
                }
                UiEvent::LookupFailed { city, detail } => {
                    state.pending = state.pending.saturating_sub(1);
                    state.push_status(format!(
                        "Could not retrieve AQI for {}. Please try again. ({})",
                        city, detail
                    ));
                    let candidates = ctx
                        .known_cities
                        .iter()
                        .chain(state.recent.iter())
                        .map(|s| s.as_str());
                    if let Some(hint) = suggest::nearest(&city, candidates) {
                        state.push_status(format!("did you mean {}?", hint));
                    }
                }
                UiEvent::Marker(m) => {
                    match state.markers.iter_mut().find(|old| old.city == m.city) {
                        Some(old) => *old = m,
                        None => state.markers.push(m),
                    }
                }
                UiEvent::Status(line) => state.push_status(line),
            }
        }

        // 2) Draw UI
        terminal.draw(|f| {
            let size = f.size();
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)])
                .split(size);

            // Header
            let header = Paragraph::new(Line::from(vec![
                Span::styled(" aqtop ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw("— live air quality in your terminal "),
                Span::styled("(Esc quits)", Style::default().fg(Color::DarkGray)),
            ]))
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(header, rows[0]);

            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
                .split(rows[1]);
            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(9), Constraint::Length(7), Constraint::Length(6)])
                .split(cols[0]);
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(cols[1]);

            // Current reading
            let inner_width = left[0].width.saturating_sub(2) as usize;
            let panel_lines = match &state.report {
                Some(report) => reading_lines(report, inner_width),
                None if state.pending > 0 => {
                    let dots = ["·  ", "·· ", "···"][(frame as usize / 10) % 3];
                    vec![Line::from(Span::styled(
                        format!("looking up {}", dots),
                        Style::default().fg(Color::DarkGray),
                    ))]
                }
                None => vec![Line::from(Span::styled(
                    "type a city name and press Enter",
                    Style::default().fg(Color::DarkGray),
                ))],
            };
            let reading = Paragraph::new(panel_lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("reading"));
            f.render_widget(reading, left[0]);

            // Recent searches, selectable for a fresh lookup
            let items: Vec<ListItem> = state
                .recent
                .iter()
                .map(|c| ListItem::new(c.clone()))
                .collect();
            let recent = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("recent (↑/↓ + Enter)"))
                .highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");
            f.render_stateful_widget(recent, left[1], &mut state.recent_sel);

            // Status / diagnostics
            let visible = left[2].height.saturating_sub(2) as usize;
            let tail = state.status.len().saturating_sub(visible);
            let status_lines: Vec<Line> = state.status[tail..]
                .iter()
                .map(|s| Line::from(Span::styled(s.clone(), Style::default().fg(Color::Yellow))))
                .collect();
            let status = Paragraph::new(status_lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("status"));
            f.render_widget(status, left[2]);

            // 7-day trend, y axis pinned to the AQI display range
            let line_color = state
                .report
                .as_ref()
                .map(|r| hex_color(r.class.color))
                .unwrap_or(Color::Gray);
            let datasets = vec![Dataset::default()
                .name("AQI")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(line_color))
                .data(&state.trend_points)];
            let chart = Chart::new(datasets)
                .block(Block::default().borders(Borders::ALL).title("7-day trend"))
                .x_axis(
                    Axis::default()
                        .bounds([0.0, (trend::DAYS - 1) as f64])
                        .labels(vec!["Day 1".into(), "Day 4".into(), "Day 7".into()])
                        .style(Style::default().fg(Color::DarkGray)),
                )
                .y_axis(
                    Axis::default()
                        .bounds([0.0, 500.0])
                        .labels(vec!["0".into(), "250".into(), "500".into()])
                        .style(Style::default().fg(Color::DarkGray)),
                );
            f.render_widget(chart, right[0]);

            // Station map
            let markers = &state.markers;
            let map = Canvas::default()
                .block(Block::default().borders(Borders::ALL).title("stations"))
                .x_bounds([60.0, 100.0])
                .y_bounds([5.0, 40.0])
                .paint(|ctx| {
                    ctx.draw(&Map {
                        resolution: MapResolution::High,
                        color: Color::DarkGray,
                    });
                    for m in markers {
                        let color = hex_color(classify(m.aqi).color);
                        ctx.print(
                            m.lng,
                            m.lat,
                            Line::from(Span::styled(
                                format!("● {} {}", m.city, m.aqi),
                                Style::default().fg(color),
                            )),
                        );
                    }
                });
            f.render_widget(map, right[1]);

            // Input
            let prompt = "city> ";
            let input = Paragraph::new(format!("{prompt}{}", state.input))
                .block(Block::default().borders(Borders::ALL).title("search"));
            f.render_widget(Clear, rows[2]);
            f.render_widget(input, rows[2]);
            let x = rows[2].x + 1 + (prompt.len() as u16) + (state.input.width() as u16);
            let y = rows[2].y + 1;
            f.set_cursor(x, y);
        })?;

        frame += 1;

        // 3) Handle keys
        if event::poll(Duration::from_millis(33))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char(c) => {
                        state.input.push(c);
                        state.recent_sel.select(None);
                    }
                    KeyCode::Backspace => {
                        state.input.pop();
                    }
                    KeyCode::Up => {
                        if !state.recent.is_empty() {
                            let next = match state.recent_sel.selected() {
                                Some(0) | None => state.recent.len() - 1,
                                Some(i) => i - 1,
                            };
                            state.recent_sel.select(Some(next));
                        }
                    }
                    KeyCode::Down => {
                        if !state.recent.is_empty() {
                            let next = match state.recent_sel.selected() {
                                Some(i) if i + 1 < state.recent.len() => i + 1,
                                _ => 0,
                            };
                            state.recent_sel.select(Some(next));
                        }
                    }
                    KeyCode::Enter => {
                        // a selected recent entry becomes the new input
                        let city = match state.recent_sel.selected() {
                            Some(i) => state.recent.get(i).cloned().unwrap_or_default(),
                            None => state.input.trim().to_string(),
                        };
                        state.recent_sel.select(None);
                        if !city.is_empty() {
                            state.input = city.clone();
                            state.pending = state.pending.saturating_add(1);
                            on_submit(city);
                        }
                    }
                    KeyCode::Esc => break,
                    _ => {}
                }
            }
        }
    }

    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
