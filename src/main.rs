use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use backtrack_maze::render::{grid_size, Renderer};
use backtrack_maze::{logging, Maze, Result, Settings, Supervisor};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing::info;

fn main() -> Result<()> {
    let settings = Settings::from_env();
    logging::init(settings.log_file.as_deref(), &settings.log_filter)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, settings: &Settings) -> Result<()> {
    let (term_w, term_h) = terminal::size()?;
    let (width, height) = grid_size(term_w, term_h)?;
    info!(width, height, "starting maze");

    let maze = Arc::new(Maze::new(width, height));
    let supervisor = Supervisor::spawn(maze.clone(), settings.run.clone())?;
    let mut renderer = Renderer::new(width, height);
    let frame_time = settings.frame_time();

    loop {
        let frame_start = Instant::now();
        if quit_requested(&mut renderer)? {
            break;
        }
        while let Some(report) = supervisor.try_report() {
            renderer.record(report);
        }
        if supervisor.is_finished() {
            break;
        }

        renderer.render(stdout, &maze, terminal::size()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }

    supervisor.shutdown()
}

fn quit_requested(renderer: &mut Renderer) -> io::Result<bool> {
    while event::poll(Duration::from_millis(0))? {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => {}
            },
            Event::Resize(_, _) => renderer.invalidate(),
            _ => {}
        }
    }
    Ok(false)
}
