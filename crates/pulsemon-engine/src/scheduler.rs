use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// The periodic tick driver: one spawned task running the tick closure on a
/// fixed-delay timer. Ticks run sequentially inside the task, so a slow tick
/// delays the next one instead of overlapping it.
pub(crate) struct TickLoop {
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl TickLoop {
    pub fn new() -> Self {
        Self {
            shutdown: None,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawns the timer task. The first tick fires immediately, then every
    /// `interval` thereafter. Callers must check `is_running` first.
    pub fn start<F>(&mut self, interval: Duration, tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, mut rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut tick = tick;
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = timer.tick() => tick(),
                    _ = rx.changed() => break,
                }
            }
        });
        self.shutdown = Some(tx);
        self.task = Some(task);
    }

    /// Signals the timer task to exit. Returns whether a running loop was
    /// actually stopped.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        self.task.take();
        was_running
    }
}
