//! Sampling thread and input/render loop over the shared [`App`]
//!
//! The sampler is the only writer of the process table. The input loop
//! owns the terminal. Both hold the lock only for short critical sections:
//! publishing a generation, handling one key, or capturing a frame.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};
use thiserror::Error;

use crate::app::{perform_all, App, KeyAction, Sampler};
use crate::config::{Config, ConfigError};
use crate::constants::INPUT_POLL_MS;
use crate::system::error::ProbeError;
use crate::ui::{render, Snapshot};

// ============================================================================
// Errors
// ============================================================================

/// Errors that end the program with a non-zero exit code
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ============================================================================
// Shutdown signal
// ============================================================================

/// Cooperative stop request observed by both loops
#[derive(Debug, Default)]
pub struct Shutdown {
    requested: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

impl Shutdown {
    pub fn trigger(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.requested.store(true, Ordering::SeqCst);
        self.wake.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleeps for `timeout` or until [`Shutdown::trigger`], whichever is first.
    pub fn sleep(&self, timeout: Duration) {
        let guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = self
            .wake
            .wait_timeout_while(guard, timeout, |_| !self.is_triggered())
            .unwrap_or_else(PoisonError::into_inner);
    }
}

/// Locks the shared state, recovering from a poisoned lock.
///
/// Every critical section leaves [`App`] consistent before it can panic
/// out, so the data behind a poisoned lock is still usable.
fn lock(app: &Mutex<App>) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Performs the kill and exec requests queued by the last key.
///
/// The OS calls run with `app` unlocked so a slow terminate or spawn does
/// not hold up the sampler's publish.
fn run_process_ops(app: &Mutex<App>) {
    let Some((ops, control)) = lock(app).take_process_ops() else {
        return;
    };
    let failures = perform_all(control.as_ref(), &ops);
    if !failures.is_empty() {
        lock(app).report_failures(failures);
    }
}

// ============================================================================
// Terminal guard
// ============================================================================

/// RAII owner of the terminal modes; dropping it restores the terminal.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(stdout, EnterAlternateScreen, DisableLineWrap, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { stdout })
    }

    fn out(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best effort: there is nowhere left to report a failure
        let _ = execute!(self.stdout, Show, EnableLineWrap, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ============================================================================
// Loops
// ============================================================================

/// Runs the sampling loop on its own thread until shutdown.
///
/// A failed enumeration is fatal: it is stored in `fatal` and shutdown is
/// triggered so the input loop returns.
fn spawn_sampler(
    mut sampler: Sampler,
    interval: Duration,
    app: Arc<Mutex<App>>,
    shutdown: Arc<Shutdown>,
    fatal: Arc<Mutex<Option<ProbeError>>>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name("sampler".to_string()).spawn(move || {
        while !shutdown.is_triggered() {
            match sampler.sample(interval, |d| shutdown.sleep(d)) {
                Ok(generation) => {
                    if shutdown.is_triggered() {
                        break;
                    }
                    let mut state = lock(&app);
                    state.publish(generation);
                    log::trace!("published generation {}", state.generation);
                }
                Err(e) => {
                    log::error!("sampling stopped: {}", e);
                    *fatal.lock().unwrap_or_else(PoisonError::into_inner) = Some(e);
                    shutdown.trigger();
                }
            }
        }
        log::debug!("sampler thread exiting");
    })
}

/// Redraws, then dispatches input until the redraw interval elapses, a key
/// was handled, or the terminal was resized.
fn input_loop(
    guard: &mut TerminalGuard,
    app: &Mutex<App>,
    config: &Config,
    shutdown: &Shutdown,
) -> io::Result<()> {
    let poll = Duration::from_millis(INPUT_POLL_MS);
    let (mut width, mut height) = terminal::size()?;

    while !shutdown.is_triggered() {
        let snapshot = Snapshot::capture(&mut lock(app), width, height);
        render(guard.out(), &snapshot, &config.colors)?;

        let frame_started = Instant::now();
        while frame_started.elapsed() < config.redraw_interval {
            if shutdown.is_triggered() {
                return Ok(());
            }
            if !event::poll(poll)? {
                continue;
            }

            let mut redraw = false;
            // Drain everything already queued before repainting
            loop {
                match event::read()? {
                    Event::Key(key) => {
                        let action = lock(app).handle_key(key);
                        run_process_ops(app);
                        if action == KeyAction::Exit {
                            shutdown.trigger();
                            return Ok(());
                        }
                        redraw = true;
                    }
                    Event::Resize(w, h) => {
                        width = w;
                        height = h;
                        redraw = true;
                    }
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }

            if redraw {
                break;
            }
        }
    }

    Ok(())
}

/// Runs the monitor until the user quits or sampling fails.
///
/// # Arguments
/// * `app` - Initial state, already holding the sort and host information
/// * `sampler` - Source of generations, moved onto the sampling thread
/// * `config` - Colors and intervals
///
/// # Errors
/// Returns the fatal sampling error, or a terminal I/O failure. The
/// terminal is restored before this function returns in every case.
pub fn run(app: App, sampler: Sampler, config: &Config) -> Result<(), AppError> {
    let app = Arc::new(Mutex::new(app));
    let shutdown = Arc::new(Shutdown::default());
    let fatal = Arc::new(Mutex::new(None));

    let mut guard = TerminalGuard::acquire()?;
    let handle = spawn_sampler(
        sampler,
        config.sample_interval,
        Arc::clone(&app),
        Arc::clone(&shutdown),
        Arc::clone(&fatal),
    )?;

    let result = input_loop(&mut guard, &app, config, &shutdown);
    shutdown.trigger();
    if handle.join().is_err() {
        log::error!("sampler thread panicked");
    }
    drop(guard);
    log::info!("shutting down");

    result?;
    let fatal = fatal.lock().unwrap_or_else(PoisonError::into_inner).take();
    match fatal {
        Some(e) => Err(AppError::Probe(e)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_wakes_sleeper() {
        let shutdown = Arc::new(Shutdown::default());
        let sleeper = {
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                let started = Instant::now();
                shutdown.sleep(Duration::from_secs(30));
                started.elapsed()
            })
        };

        thread::sleep(Duration::from_millis(20));
        shutdown.trigger();
        let slept = sleeper.join().expect("sleeper thread");
        assert!(slept < Duration::from_secs(5));
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_sleep_after_trigger_returns_immediately() {
        let shutdown = Shutdown::default();
        shutdown.trigger();
        let started = Instant::now();
        shutdown.sleep(Duration::from_secs(30));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_poisoned_state_is_recovered() {
        use crate::app::SortSpec;
        use crate::system::testing::RecordingControl;
        use crate::system::HostInfo;

        let app = Arc::new(Mutex::new(App::new(
            SortSpec::default(),
            HostInfo::default(),
            Arc::new(RecordingControl::default()),
        )));
        let poisoner = Arc::clone(&app);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().expect("first lock");
            panic!("poison");
        })
        .join();

        assert!(app.is_poisoned());
        lock(&app).notice("still usable");
        assert_eq!(lock(&app).messages.len(), 1);
    }

    #[test]
    fn test_process_ops_run_with_state_unlocked() {
        use std::sync::OnceLock;

        use crate::app::SortSpec;
        use crate::system::error::{ProcessError, ProcessResult};
        use crate::system::{HostInfo, ProcessControl};

        /// Refuses pid 2 and records whether the state was free at each call.
        #[derive(Default)]
        struct LockCheckingControl {
            app: OnceLock<Arc<Mutex<App>>>,
            unlocked: Mutex<Vec<bool>>,
        }

        impl LockCheckingControl {
            fn record(&self) {
                let free = self.app.get().map_or(false, |app| app.try_lock().is_ok());
                self.unlocked.lock().expect("unlocked").push(free);
            }
        }

        impl ProcessControl for LockCheckingControl {
            fn terminate(&self, pid: u32) -> ProcessResult<()> {
                self.record();
                if pid == 2 {
                    return Err(ProcessError::AccessDenied);
                }
                Ok(())
            }

            fn launch(&self, _command_line: &str) -> ProcessResult<u32> {
                self.record();
                Ok(1)
            }
        }

        let control = Arc::new(LockCheckingControl::default());
        let app = Arc::new(Mutex::new(App::new(
            SortSpec::default(),
            HostInfo::default(),
            control.clone(),
        )));
        assert!(control.app.set(Arc::clone(&app)).is_ok());

        {
            let mut state = lock(&app);
            state.kill_pids(&["1".into(), "2".into()]);
            state.launch("calc");
        }
        run_process_ops(&app);

        assert_eq!(*control.unlocked.lock().expect("unlocked"), vec![true, true, true]);
        let texts: Vec<String> = lock(&app).messages.iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["Failed to kill process 2: access denied"]);
        assert!(lock(&app).take_process_ops().is_none());
    }

    #[test]
    fn test_sampler_failure_is_reported() {
        use crate::app::{SampleFilter, SortSpec};
        use crate::system::testing::{FakeProbe, RecordingControl};
        use crate::system::HostInfo;

        let app = Arc::new(Mutex::new(App::new(
            SortSpec::default(),
            HostInfo::default(),
            Arc::new(RecordingControl::default()),
        )));
        let shutdown = Arc::new(Shutdown::default());
        let fatal = Arc::new(Mutex::new(None));
        let mut probe = FakeProbe::new(Vec::new());
        probe.fail_enumeration = true;
        let sampler = Sampler::new(Box::new(probe), SampleFilter::default());

        let handle = spawn_sampler(
            sampler,
            Duration::from_millis(10),
            Arc::clone(&app),
            Arc::clone(&shutdown),
            Arc::clone(&fatal),
        )
        .expect("spawn");
        handle.join().expect("sampler thread");

        assert!(shutdown.is_triggered());
        assert!(fatal.lock().expect("fatal").is_some());
    }
}
