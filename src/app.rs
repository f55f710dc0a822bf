use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use tracing::info;

use crate::screen::{self, FetchRequest, WeatherScreen};
use crate::weather::{ForecastDay, SimplifiedWeather};
use crate::weatherapi::WeatherSource;

const MISSING: &str = "--";

const TICK: Duration = Duration::from_millis(250);

type Completed = (u64, Option<SimplifiedWeather>);

/// Runs fetches off the UI thread and hands results back over a channel.
pub struct Fetcher {
    source: Arc<dyn WeatherSource + Send + Sync>,
    tx: Sender<Completed>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn WeatherSource + Send + Sync>) -> (Self, Receiver<Completed>) {
        let (tx, rx) = mpsc::channel();
        (Self { source, tx }, rx)
    }

    pub fn dispatch(&self, request: FetchRequest) {
        info!("Dispatching request {} for {}", request.id, request.city);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = source.fetch(&request.city);
            // receiver is gone once the app has quit
            let _ = tx.send((request.id, result));
        });
    }
}

#[derive(Debug, PartialEq)]
pub enum Action {
    None,
    Search(FetchRequest),
    Quit,
}

pub fn handle_key(screen: &mut WeatherScreen, key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('u') if ctrl => {
            screen.clear_query();
            Action::None
        }
        KeyCode::Char(c) if plain => {
            screen.push_char(c);
            Action::None
        }
        KeyCode::Backspace => {
            screen.pop_char();
            Action::None
        }
        KeyCode::Enter => screen.search().map_or(Action::None, Action::Search),
        _ => Action::None,
    }
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut screen: WeatherScreen,
    source: Arc<dyn WeatherSource + Send + Sync>,
) -> io::Result<()> {
    let (fetcher, completed) = Fetcher::new(source);
    if let Some(request) = screen.mount() {
        fetcher.dispatch(request);
    }

    loop {
        let today = Local::now().date_naive();
        terminal.draw(|f| ui(f, &screen, today))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                match handle_key(&mut screen, key) {
                    Action::Quit => return Ok(()),
                    Action::Search(request) => fetcher.dispatch(request),
                    Action::None => {}
                }
            }
        }

        while let Ok((id, result)) = completed.try_recv() {
            screen.complete(id, result);
        }
    }
}

fn panel<'a>(title: &str, accent: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(accent))
        .border_type(BorderType::Rounded)
}

fn display_search(screen: &WeatherScreen) -> Paragraph<'_> {
    let accent = screen.background().color();
    let hint = if screen.is_loading() {
        Span::styled("  searching...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled("_", Style::default().fg(accent))
    };
    let query = if screen.query().is_empty() && !screen.is_loading() {
        Span::styled(" Search city...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!(" {}", screen.query()))
    };
    Paragraph::new(Line::from(vec![query, hint])).block(panel("Search", accent))
}

fn display_main(weather: &SimplifiedWeather, today: NaiveDate) -> Paragraph<'_> {
    let temp = format!("{}°", screen::round_temp(weather.temp_c));
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            screen::date_headline(today).to_uppercase(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            weather.name.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            temp,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(weather.condition.text.clone()),
        Line::from(Span::styled(
            weather.condition.icon_url(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
}

fn display_details(weather: &SimplifiedWeather, accent: Color) -> Table<'_> {
    let text_or_missing = |s: &str| {
        if s.is_empty() {
            MISSING.to_string()
        } else {
            s.to_string()
        }
    };
    let rows = vec![
        Row::new(vec![Cell::from("")]),
        Row::new(vec![
            Cell::from(" Humidity"),
            Cell::from(format!("{}%", weather.humidity)).style(Style::default().fg(Color::Green)),
        ]),
        Row::new(vec![
            Cell::from(" Country"),
            Cell::from(text_or_missing(&weather.country)).style(Style::default().fg(Color::Green)),
        ]),
        Row::new(vec![
            Cell::from(" Region"),
            Cell::from(text_or_missing(&weather.region)).style(Style::default().fg(Color::Green)),
        ]),
        Row::new(vec![
            Cell::from(" Code"),
            Cell::from(weather.condition.code.to_string()).style(Style::default().fg(Color::Green)),
        ]),
    ];
    Table::new(rows, [Constraint::Length(10), Constraint::Min(10)]).block(panel("Details", accent))
}

fn display_forecast<'a>(
    day: &'a ForecastDay,
    position: usize,
    today: NaiveDate,
    accent: Color,
) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            day.condition.text.as_str(),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!("{}°", screen::round_temp(day.avg_temp_c)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(panel(&screen::forecast_label(today, position, day), accent))
}

fn display_status(screen: &WeatherScreen) -> Paragraph<'_> {
    let background = screen.background();
    Paragraph::new(Line::from(vec![
        Span::raw(" Background: "),
        Span::styled(background.token(), Style::default().fg(background.color())),
        Span::styled(
            format!(" ({})", background.asset()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("   Enter search, Esc quit"),
    ]))
}

pub fn ui(f: &mut Frame, screen: &WeatherScreen, today: NaiveDate) {
    let accent = screen.background().color();
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(display_search(screen), vert_layout[0]);
    f.render_widget(display_status(screen), vert_layout[2]);

    let Some(weather) = screen.weather() else {
        return;
    };

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(vert_layout[1]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body[0]);
    f.render_widget(
        display_main(weather, today).block(panel("Current Conditions", accent)),
        top[0],
    );
    f.render_widget(display_details(weather, accent), top[1]);

    let strip = Block::default()
        .title(Span::styled(
            " Daily Forecast ",
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left);
    let cards_area = strip.inner(body[1]);
    f.render_widget(strip, body[1]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(cards_area);
    for (position, day) in weather.forecast.iter().enumerate() {
        f.render_widget(display_forecast(day, position, today, accent), cards[position]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use ratatui::{backend::TestBackend, buffer::Buffer};

    use crate::background::Background;
    use crate::weather::Condition;

    fn condition(text: &str) -> Condition {
        Condition {
            text: text.to_string(),
            icon: "//cdn.weatherapi.com/weather/64x64/day/116.png".to_string(),
            code: 1003,
        }
    }

    fn sample_weather() -> SimplifiedWeather {
        let day = |d, text: &str, avg| ForecastDay {
            date: NaiveDate::from_ymd_opt(2026, 10, d),
            condition: condition(text),
            avg_temp_c: avg,
        };
        SimplifiedWeather {
            name: "Kolkata".to_string(),
            region: "West Bengal".to_string(),
            country: "India".to_string(),
            condition: condition("Partly cloudy"),
            humidity: 70,
            temp_c: 30.2,
            forecast: [
                day(18, "Clear", 28.4),
                day(19, "Light rain", 27.5),
                day(20, "Overcast", 26.6),
            ],
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl WeatherSource for CountingSource {
        fn fetch(&self, city: &str) -> Option<SimplifiedWeather> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (city == "Kolkata").then(sample_weather)
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn render(screen: &WeatherScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        terminal.draw(|f| ui(f, screen, today)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_blank_enter_makes_no_request() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let (fetcher, completed) = Fetcher::new(source.clone());
        let mut screen = WeatherScreen::new("  ");

        match handle_key(&mut screen, key(KeyCode::Enter)) {
            Action::Search(request) => fetcher.dispatch(request),
            action => assert_eq!(action, Action::None),
        }

        assert!(!screen.is_loading());
        assert!(completed
            .recv_timeout(Duration::from_millis(100))
            .is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fetcher_delivers_result() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let (fetcher, completed) = Fetcher::new(source.clone());
        let mut screen = WeatherScreen::new("Kolkata");

        let Action::Search(request) = handle_key(&mut screen, key(KeyCode::Enter)) else {
            panic!("expected a search");
        };
        fetcher.dispatch(request);

        let (id, result) = completed.recv_timeout(Duration::from_secs(5)).unwrap();
        screen.complete(id, result);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(screen.weather(), Some(&sample_weather()));
        assert_eq!(screen.background(), Background::Clouds);
        assert!(!screen.is_loading());
    }

    #[test]
    fn test_key_editing() {
        let mut screen = WeatherScreen::new("Pari");
        assert_eq!(handle_key(&mut screen, key(KeyCode::Char('s'))), Action::None);
        assert_eq!(screen.query(), "Paris");
        handle_key(&mut screen, key(KeyCode::Backspace));
        assert_eq!(screen.query(), "Pari");
        handle_key(
            &mut screen,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(screen.query(), "");
        handle_key(
            &mut screen,
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL),
        );
        handle_key(
            &mut screen,
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT),
        );
        assert_eq!(screen.query(), "");
        handle_key(
            &mut screen,
            KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT),
        );
        assert_eq!(screen.query(), "R");
        assert_eq!(handle_key(&mut screen, key(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            handle_key(
                &mut screen,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            Action::Quit
        );
    }

    #[test]
    fn test_render_without_weather() {
        let screen = WeatherScreen::new("Kolkata");
        let text = render(&screen);
        assert!(text.contains("Search"));
        assert!(text.contains("Kolkata"));
        assert!(text.contains("Background: default"));
        assert!(!text.contains("Daily Forecast"));
    }

    #[test]
    fn test_render_with_weather() {
        let mut screen = WeatherScreen::new("Kolkata");
        let request = screen.mount().unwrap();
        screen.complete(request.id, Some(sample_weather()));

        let text = render(&screen);
        assert!(text.contains("SUNDAY, 18 OCT"));
        assert!(text.contains("30°"));
        assert!(text.contains("Partly cloudy"));
        assert!(text.contains("70%"));
        assert!(text.contains("India"));
        assert!(text.contains("Daily Forecast"));
        assert!(text.contains(" Sun "));
        assert!(text.contains(" Mon "));
        assert!(text.contains(" Tue "));
        assert!(text.contains("Light rain"));
        assert!(text.contains("Background: clouds"));
    }

    #[test]
    fn test_render_while_loading() {
        let mut screen = WeatherScreen::new("Kolkata");
        screen.search();
        assert!(render(&screen).contains("searching..."));
    }
}
