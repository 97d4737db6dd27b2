use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::run::{run_once, RunOutcome, RunReport};
use crate::settings::RunSettings;
use crate::state::Maze;

/// Keeps exactly one run alive at a time, starting the next one as soon as
/// the previous worker has exited.
pub struct Supervisor {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    reports: Receiver<RunReport>,
}

impl Supervisor {
    pub fn spawn(maze: Arc<Maze>, settings: RunSettings) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = channel();
        let thread_stop = stop.clone();
        let handle = thread::Builder::new()
            .name("maze-supervisor".into())
            .spawn(move || supervise(maze, settings, thread_stop, tx))?;
        Ok(Self {
            stop,
            handle: Some(handle),
            reports: rx,
        })
    }

    pub fn try_report(&self) -> Option<RunReport> {
        self.reports.try_recv().ok()
    }

    pub fn reports(&self) -> &Receiver<RunReport> {
        &self.reports
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Asks the active worker to stop and waits for the supervisor to exit.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| Error::SupervisorPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn supervise(maze: Arc<Maze>, settings: RunSettings, stop: Arc<AtomicBool>, tx: Sender<RunReport>) {
    let mut seeder = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut completed = 0u64;

    while !stop.load(Ordering::Relaxed) {
        if settings.max_runs.is_some_and(|max| completed >= max) {
            break;
        }
        let run_seed: u64 = seeder.gen();
        let worker_maze = maze.clone();
        let worker_stop = stop.clone();
        let pacing = settings.pacing;
        let shuffle = settings.shuffle;

        let spawned = thread::Builder::new()
            .name(format!("maze-run-{}", completed + 1))
            .spawn(move || {
                let mut rng = StdRng::seed_from_u64(run_seed);
                run_once(&worker_maze, &mut rng, &pacing, shuffle, &worker_stop)
            });
        let worker = match spawned {
            Ok(worker) => worker,
            Err(err) => {
                error!(%err, "failed to spawn maze worker");
                break;
            }
        };

        let report = match worker.join() {
            Ok(report) => report,
            Err(_) => {
                error!("maze worker panicked");
                RunReport {
                    run: maze.state.run(),
                    outcome: RunOutcome::Interrupted,
                    target: maze.state.target(),
                    depth: maze.state.max_depth(),
                    carved: 0,
                }
            }
        };
        info!(
            run = report.run,
            outcome = ?report.outcome,
            carved = report.carved,
            depth = report.depth,
            "run finished"
        );
        completed += 1;
        // The receiver may be gone already during shutdown.
        let _ = tx.send(report);
    }
    info!(completed, "supervisor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::Pacing;
    use crate::state::Phase;
    use std::time::{Duration, Instant};

    #[test]
    fn stops_after_max_runs() {
        let maze = Arc::new(Maze::new(21, 15));
        let settings = RunSettings {
            pacing: Pacing::NONE,
            seed: Some(9),
            max_runs: Some(3),
            ..RunSettings::default()
        };
        let supervisor = Supervisor::spawn(maze.clone(), settings).unwrap();
        let runs: Vec<RunReport> = (0..3)
            .map(|_| supervisor.reports().recv_timeout(Duration::from_secs(10)).unwrap())
            .collect();
        assert_eq!(runs.iter().map(|r| r.run).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(runs.iter().all(|r| r.outcome == RunOutcome::Solved));
        supervisor.shutdown().unwrap();
        assert_eq!(maze.state.run(), 3);
    }

    #[test]
    fn shutdown_interrupts_a_slow_run() {
        let maze = Arc::new(Maze::new(41, 31));
        let settings = RunSettings {
            pacing: Pacing {
                carve: Duration::from_millis(5),
                solve: Duration::from_millis(5),
            },
            seed: Some(1),
            ..RunSettings::default()
        };
        let supervisor = Supervisor::spawn(maze.clone(), settings).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        while maze.state.phase() == Phase::Idle && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_ne!(maze.state.phase(), Phase::Idle);
        let reports = supervisor.reports().try_iter().count();
        supervisor.shutdown().unwrap();
        assert_eq!(reports, 0);
        assert_eq!(maze.state.run(), 1);
    }
}
