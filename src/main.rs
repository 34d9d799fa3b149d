use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use location_learning::simulation::{Experiment, ExperimentConfig};
use location_learning::ui::{compute_histogram_grid, draw_ui, mapping_lines};

const STEPS_PER_TICK: u64 = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ExperimentConfig::default();
    let mut experiment = Experiment::new(config)?;

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(50);
    let res = run_app(&mut terminal, &mut experiment, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    let record = experiment.record();
    println!(
        "step {} first_seen={} bad={} good={} consistency={:.3} reciprocal={:.3}",
        record.step,
        record.first_seen,
        record.bad,
        record.good,
        record.consistency,
        record.reciprocal
    );
    for line in mapping_lines(&experiment.mappings()) {
        println!("{line}");
    }
    println!("duty cycles:");
    for cycle in experiment.visitation().duty_cycles() {
        println!("{cycle:.4}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    experiment: &mut Experiment,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    let mut score = 0.0;
    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            let budget = experiment.config().iterations;
            for _ in 0..STEPS_PER_TICK {
                if experiment.stats().steps >= budget {
                    break;
                }
                experiment.step();
            }
            score = experiment.evaluate().score;
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let area = f.area();
            // Borders take two rows and columns, the HUD one more row
            let rows = (area.height as usize).saturating_sub(3);
            let cols = (area.width as usize * 6 / 10).saturating_sub(2);

            let grid = compute_histogram_grid(experiment.visitation(), rows, cols);
            let mapping = mapping_lines(&experiment.mappings());

            let stats = experiment.stats();
            let hud = format!(
                "Step: {} | New: {} | Bad: {} | Good: {} | Folds: {} | Score: {:.2}",
                stats.steps, stats.first_seen, stats.bad, stats.good, stats.conflicts, score
            );

            draw_ui(f, grid, mapping, &hud);
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
