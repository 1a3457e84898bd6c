use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph},
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::error;

use crate::config::AppConfig;
use crate::pipeline::{self, PipelineOutput};
use crate::projection::Projection;

/// Fixed bar color for the earnings chart.
const BAR_COLOR: Color = Color::Rgb(31, 119, 180);

struct App {
    config: AppConfig,
    output: PipelineOutput,
    is_refreshing: bool,
}

/// Runs the interactive results page: a title block, one text line per
/// selected asset, and a bar chart of projected earnings. `q` quits, `F5`
/// re-runs the whole pipeline in the background.
pub async fn run(output: PipelineOutput, config: AppConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App {
        config,
        output,
        is_refreshing: false,
    };
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let (data_tx, mut data_rx) = mpsc::channel::<Result<PipelineOutput>>(1);

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if let Ok(result) = data_rx.try_recv() {
            match result {
                Ok(new_output) => {
                    app.output = new_output;
                    app.is_refreshing = false;
                }
                Err(err) => {
                    // Keep the stale snapshot on a failed refresh.
                    error!("Refresh failed: {err:#}");
                    app.is_refreshing = false;
                }
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if !handle_key_event(key, &mut app, &data_tx) {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => {
                    // The next terminal.draw() picks up the new size.
                }
                _ => {}
            }
        }
    }
}

fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    tx: &mpsc::Sender<Result<PipelineOutput>>,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::F(5) if !app.is_refreshing => {
            app.is_refreshing = true;
            let tx_clone = tx.clone();
            let config = app.config.clone();
            tokio::spawn(async move {
                let result = pipeline::run(&config).await;
                let _ = tx_clone.send(result).await;
            });
        }
        _ => {}
    }
    true
}

fn ui(f: &mut Frame, app: &App) {
    let line_count = app.output.projections.len() as u16 + 2;
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(line_count),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .split(f.size());

    let time_str = app
        .output
        .snapshot
        .fetched_at
        .format("%d-%m-%Y %H:%M:%S");
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title_alignment(Alignment::Center)
            .title(format!(
                "Projected Earnings on $10,000 Investment (Data taken at {} UTC)",
                time_str
            )),
        chunks[0],
    );

    let lines: Vec<Line> = app.output.projections.iter().map(summary_line).collect();
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(format!(
            "Top {} Assets by 24h Change",
            app.output.projections.len()
        ))),
        chunks[1],
    );

    render_earnings_chart(f, &app.output.projections, chunks[2]);

    f.render_widget(
        Paragraph::new("q quits · F5 refreshes data").alignment(Alignment::Center),
        chunks[3],
    );

    if app.is_refreshing {
        let area = centered_rect(60, 20, f.size());
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new("Re-running projection pipeline...\nPlease wait.")
                .block(Block::default().title("Refreshing").borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }
}

fn summary_line(projection: &Projection) -> Line<'_> {
    Line::from(vec![
        Span::styled(
            projection.name.clone(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            ", Change Percent: {:.2}%, Projected Earnings: ${:.2}",
            projection.change_percent_24h, projection.projected_earnings
        )),
    ])
}

fn render_earnings_chart(f: &mut Frame, projections: &[Projection], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Projected Earnings (USD)");

    if projections.is_empty() {
        f.render_widget(block, area);
        return;
    }

    let bar_width = (area.width.saturating_sub(2) / projections.len() as u16)
        .saturating_sub(1)
        .clamp(3, 18);

    let bars: Vec<Bar> = projections
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.projected_earnings.max(0.0).round() as u64)
                .label(Line::from(p.name.as_str()))
                .text_value(format!("${:.0}", p.projected_earnings))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(BAR_COLOR))
        .value_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
