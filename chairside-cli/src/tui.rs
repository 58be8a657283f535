use anyhow::Result;
use chairside_core::{AnimatedCounter, EstimatorOutputs, InputField, format_grouped};
use chairside_estimator::{EstimatorSession, RevealPhase, RevealSnapshot};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::state::{EstimateRecord, append_estimate, history_path};

const GOLD: Color = Color::Rgb(212, 175, 55);
const NAVY: Color = Color::Rgb(26, 54, 93);
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Counters for the current reveal, restarted whenever the generation changes
struct RevealAnimation {
    generation: u64,
    started: Instant,
    revenue: AnimatedCounter,
    savings: AnimatedCounter,
    roi: AnimatedCounter,
}

impl RevealAnimation {
    fn new(generation: u64, out: &EstimatorOutputs, duration: Duration) -> Self {
        Self {
            generation,
            started: Instant::now(),
            revenue: AnimatedCounter::new(out.annual_recovered_revenue.round(), duration).prefix("$"),
            savings: AnimatedCounter::new(out.annual_staff_savings.round(), duration).prefix("$"),
            roi: AnimatedCounter::new(out.roi_percentage as f64, duration).suffix("%"),
        }
    }
}

struct App {
    session: EstimatorSession,
    counter_duration: Duration,
    animation: Option<RevealAnimation>,
    status: Option<String>,
    show_help: bool,
    tick: usize,
}

pub fn run_tui(cfg: &Config, handle: tokio::runtime::Handle) -> Result<()> {
    // Sequencer timers are spawned onto this runtime.
    let _rt = handle.enter();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App {
        session: EstimatorSession::new(cfg.defaults.to_inputs()),
        counter_duration: cfg.display.counter_duration(),
        animation: None,
        status: None,
        show_help: true,
        tick: 0,
    };
    tracing::info!("estimator tui started");

    let res = event_loop(&mut terminal, &mut app);

    // Cancel any pending reveal before the terminal is handed back.
    app.session.dispose();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("estimator tui stopped");
    res
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        let snapshot = app.session.snapshot();
        sync_animation(app, &snapshot);
        app.tick = app.tick.wrapping_add(1);

        terminal.draw(|f| draw(f, app, &snapshot))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('?') => app.show_help = !app.show_help,
            KeyCode::Up => app.session.select_prev(),
            KeyCode::Down | KeyCode::Tab => app.session.select_next(),
            KeyCode::Left => app.session.adjust_selected(-1),
            KeyCode::Right => app.session.adjust_selected(1),
            KeyCode::PageDown => app.session.adjust_selected(-10),
            KeyCode::PageUp => app.session.adjust_selected(10),
            KeyCode::Enter => {
                // The button is disabled while calculating.
                if app.session.control_enabled() {
                    match app.session.calculate() {
                        Ok(generation) => {
                            tracing::debug!(generation, "calculate pressed");
                            app.status = None;
                        }
                        Err(e) => app.status = Some(e.to_string()),
                    }
                }
            }
            KeyCode::Char('s') => app.status = Some(save_current(&snapshot)),
            _ => {}
        }
    }
    Ok(())
}

fn sync_animation(app: &mut App, snapshot: &RevealSnapshot) {
    match (&snapshot.outputs, snapshot.phase) {
        (Some(out), RevealPhase::Revealed) => {
            let stale = app
                .animation
                .as_ref()
                .map(|a| a.generation != snapshot.generation)
                .unwrap_or(true);
            if stale {
                app.animation = Some(RevealAnimation::new(snapshot.generation, out, app.counter_duration));
            }
        }
        _ => app.animation = None,
    }
}

fn save_current(snapshot: &RevealSnapshot) -> String {
    let (Some(inputs), Some(outputs)) = (snapshot.inputs, snapshot.outputs) else {
        return "Nothing to save yet: press Enter to calculate".to_string();
    };
    let record = EstimateRecord::now(inputs, outputs);
    match history_path().and_then(|p| append_estimate(&p, &record).map(|_| p)) {
        Ok(p) => format!("Saved to {}", p.display()),
        Err(e) => {
            tracing::warn!(error = %e, "saving estimate failed");
            format!("Save failed: {e:#}")
        }
    }
}

fn draw(f: &mut Frame, app: &App, snapshot: &RevealSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    let splash = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            "Calculate Your Practice ROI",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "See what missed calls and staff hours are really costing you",
            Style::default().fg(Color::Gray),
        )),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(splash, chunks[0]);

    draw_inputs(f, app, chunks[1]);
    draw_button(f, app, snapshot, chunks[2]);
    draw_results(f, app, snapshot, chunks[3]);

    let footer = match (&app.status, app.show_help) {
        (Some(s), _) => s.clone(),
        (None, true) => "↑/↓ select  ←/→ adjust  PgUp/PgDn ×10  Enter calculate  s save  ? help  q quit".to_string(),
        (None, false) => String::new(),
    };
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::Gray)),
        chunks[4],
    );
}

fn draw_inputs(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4); 3])
        .split(area);

    let inputs = app.session.inputs();
    for (row, field) in rows.iter().zip(InputField::ALL) {
        let selected = app.session.selected() == field;
        let border = if selected {
            Style::default().fg(GOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", field.label()));

        let value = inputs.get(field);
        let label = match field {
            InputField::MissedCalls => format_grouped(value as i64),
            InputField::TreatmentValue => format!("${:.2}", value),
            InputField::HoursSaved => format!("{}h", value as i64),
        };

        match field.bounds() {
            (min, Some(max)) => {
                let ratio = ((value - min) / (max - min)).clamp(0.0, 1.0);
                let gauge = Gauge::default()
                    .block(block)
                    .gauge_style(Style::default().fg(GOLD).bg(NAVY))
                    .ratio(ratio)
                    .label(format!("{}  ({})", label, field.hint()));
                f.render_widget(gauge, *row);
            }
            (_, None) => {
                let p = Paragraph::new(Line::from(vec![
                    Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  ({})", field.hint()), Style::default().fg(Color::Gray)),
                ]))
                .block(block);
                f.render_widget(p, *row);
            }
        }
    }
}

fn draw_button(f: &mut Frame, app: &App, snapshot: &RevealSnapshot, area: Rect) {
    let (text, style) = if snapshot.phase == RevealPhase::Calculating {
        (
            format!("{} Calculating", SPINNER[(app.tick / 2) % SPINNER.len()]),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            "Calculate Your ROI →".to_string(),
            Style::default().fg(Color::White).bg(NAVY).add_modifier(Modifier::BOLD),
        )
    };
    let button = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, area);
}

fn draw_results(f: &mut Frame, app: &App, snapshot: &RevealSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Your Potential Annual Impact ");

    let (Some(anim), Some(out)) = (&app.animation, &snapshot.outputs) else {
        f.render_widget(block, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(inner);

    let elapsed = anim.started.elapsed();
    let tiles = [
        ("RECOVERED REVENUE", anim.revenue.frame(elapsed), "From missed calls"),
        ("STAFF COST SAVINGS", anim.savings.frame(elapsed), "Annually saved"),
        ("RETURN ON INVESTMENT", anim.roi.frame(elapsed), "First year ROI"),
        ("BREAK EVEN", out.payback_months.display(), "Months to profit"),
    ];

    for (col, (title, value, caption)) in cols.iter().zip(tiles) {
        let tile = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(title, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                value,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(caption, Style::default().fg(GOLD))),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(tile, *col);
    }
}
