use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

// Periodic display-refresh driver. Dropping the ticker stops the thread and
// joins it, so no tick runs after the owner is gone.
pub struct ActivityTicker {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl ActivityTicker {
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(DateTime<Local>) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = Arc::clone(&stop);
        let join = thread::spawn(move || {
            let mut next_tick = Instant::now() + period;
            while !stop_for_thread.load(Ordering::Relaxed) {
                let now = Instant::now();
                if now < next_tick {
                    thread::sleep((next_tick - now).min(STOP_POLL_INTERVAL));
                    continue;
                }
                on_tick(Local::now());
                next_tick = Instant::now() + period;
            }
        });
        Self {
            stop,
            join: Some(join),
        }
    }
}

impl Drop for ActivityTicker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}
