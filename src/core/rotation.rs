/// Rotation controller — advances a circular image index on a fixed cadence,
/// honouring a pause flag, and owns the one recurring timer that drives it.
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::images::{ImageId, ImageList};
use crate::error::{Result, SlideshowError};

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub image: ImageId,
    pub paused: bool,
}

struct RotationState {
    images: ImageList,
    current_index: usize,
    paused: bool,
    /// Cleared by shutdown; ticks never mutate an inactive state.
    active: bool,
}

impl RotationState {
    /// The only place `current_index` changes.
    fn advance(&mut self) -> bool {
        if !self.active || self.paused {
            return false;
        }
        self.current_index = (self.current_index + 1) % self.images.len();
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Advanced,
    Suppressed,
    Stopped,
}

pub struct RotationController {
    state: Arc<Mutex<RotationState>>,
    interval: Duration,
    /// Exactly one while active, none after shutdown
    timer: Option<JoinHandle<()>>,
}

impl RotationController {
    /// Start rotating `images`, advancing once every `interval`.
    ///
    /// Must be called from within a tokio runtime; the timer is a spawned task.
    pub fn initialize(images: ImageList, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(SlideshowError::ZeroInterval);
        }
        let first_tick = Instant::now()
            .checked_add(interval)
            .ok_or(SlideshowError::IntervalTooLong(interval))?;

        info!(
            "Starting rotation over {} image(s), every {:?}",
            images.len(),
            interval
        );

        let state = Arc::new(Mutex::new(RotationState {
            images,
            current_index: 0,
            paused: false,
            active: true,
        }));
        let timer = tokio::spawn(run_timer(Arc::clone(&state), first_tick, interval));

        Ok(Self {
            state,
            interval,
            timer: Some(timer),
        })
    }

    /// Apply one tick. Normally invoked by the timer task only.
    pub fn on_tick(&self) {
        fire(&self.state);
    }

    /// Flip the pause flag and return the new value. The timer keeps running.
    pub fn toggle_pause(&self) -> bool {
        let mut state = self.state.lock();
        state.paused = !state.paused;
        info!("Rotation {}", if state.paused { "paused" } else { "resumed" });
        state.paused
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn current_image(&self) -> ImageId {
        let state = self.state.lock();
        state.images.get(state.current_index).clone()
    }

    pub fn current_index(&self) -> usize {
        self.state.lock().current_index
    }

    pub fn snapshot(&self) -> Selection {
        let state = self.state.lock();
        Selection {
            index: state.current_index,
            image: state.images.get(state.current_index).clone(),
            paused: state.paused,
        }
    }

    pub fn images(&self) -> ImageList {
        self.state.lock().images.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Cancel the timer. Idempotent; after the first call nothing mutates the index.
    pub fn shutdown(&mut self) {
        let was_active = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.active, false)
        };
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if was_active {
            info!("Rotation timer released");
        }
    }
}

impl Drop for RotationController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn fire(state: &Mutex<RotationState>) -> TickOutcome {
    let mut state = state.lock();
    if !state.active {
        return TickOutcome::Stopped;
    }
    if !state.advance() {
        debug!("Tick suppressed while paused");
        return TickOutcome::Suppressed;
    }
    debug!(
        "Rotated to image {}/{}: {}",
        state.current_index + 1,
        state.images.len(),
        state.images.get(state.current_index)
    );
    TickOutcome::Advanced
}

async fn run_timer(state: Arc<Mutex<RotationState>>, first_tick: Instant, interval: Duration) {
    let mut ticker = time::interval_at(first_tick, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if fire(&state) == TickOutcome::Stopped {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(ids: &[&str]) -> ImageList {
        ImageList::new(ids.iter().map(|s| ImageId::from(*s)).collect()).unwrap()
    }

    fn controller(ids: &[&str]) -> RotationController {
        RotationController::initialize(images(ids), Duration::from_secs(10)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_rejected() {
        let err = RotationController::initialize(images(&["A"]), Duration::ZERO)
            .err()
            .unwrap();
        assert!(matches!(err, SlideshowError::ZeroInterval));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_interval_rejected() {
        let err = RotationController::initialize(images(&["A"]), Duration::MAX)
            .err()
            .unwrap();
        assert!(matches!(err, SlideshowError::IntervalTooLong(_)));

        let err = RotationController::initialize(images(&["A"]), Duration::from_secs(u64::MAX))
            .err()
            .unwrap();
        assert!(matches!(err, SlideshowError::IntervalTooLong(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state() {
        let c = controller(&["A", "B", "C", "D"]);
        assert_eq!(c.current_index(), 0);
        assert_eq!(c.current_image().as_str(), "A");
        assert!(!c.is_paused());
        assert!(c.is_active());
        assert_eq!(c.interval(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_visit_every_index_cyclically() {
        let ids = ["A", "B", "C", "D", "E", "F"];
        for n in 1..=ids.len() {
            let c = controller(&ids[..n]);
            for start in 0..n {
                for _ in 0..start {
                    c.on_tick();
                }
                assert_eq!(c.current_index(), start);

                let mut visited = Vec::new();
                for _ in 0..n {
                    c.on_tick();
                    visited.push(c.current_index());
                }
                let expected: Vec<usize> = (1..=n).map(|k| (start + k) % n).collect();
                assert_eq!(visited, expected, "n={n} start={start}");
                assert_eq!(c.current_index(), start);

                // Walk back to 0 for the next start position
                for _ in 0..(n - start) % n {
                    c.on_tick();
                }
                assert_eq!(c.current_index(), 0);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_pause_is_an_involution() {
        let c = controller(&["A", "B"]);
        let before = c.is_paused();
        assert!(c.toggle_pause());
        assert!(!c.toggle_pause());
        assert_eq!(c.is_paused(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_ticks_do_not_move_index() {
        let c = controller(&["A", "B", "C"]);
        c.on_tick();
        c.toggle_pause();
        for _ in 0..25 {
            c.on_tick();
        }
        assert_eq!(c.current_index(), 1);
        assert!(c.snapshot().paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_full_cycle() {
        let c = controller(&["A", "B", "C", "D"]);
        assert_eq!(c.current_image().as_str(), "A");
        c.on_tick();
        assert_eq!(c.current_image().as_str(), "B");
        for _ in 0..3 {
            c.on_tick();
        }
        assert_eq!(c.current_image().as_str(), "A");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_pause_then_resume() {
        let c = controller(&["A", "B", "C", "D"]);
        c.toggle_pause();
        c.on_tick();
        assert_eq!(c.current_image().as_str(), "A");
        c.toggle_pause();
        c.on_tick();
        assert_eq!(c.current_image().as_str(), "B");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_single_image() {
        let c = controller(&["A"]);
        for _ in 0..7 {
            c.on_tick();
            assert_eq!(c.current_image().as_str(), "A");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_tick_after_shutdown() {
        let mut c = controller(&["A", "B", "C", "D"]);
        c.shutdown();
        c.on_tick();
        assert_eq!(c.current_index(), 0);
        assert!(!c.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_idempotent() {
        let mut c = controller(&["A", "B"]);
        c.on_tick();
        c.shutdown();
        let after_first = c.snapshot();
        c.shutdown();
        assert_eq!(c.snapshot(), after_first);
        assert_eq!(after_first.index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_advances_every_interval() {
        let c = controller(&["A", "B", "C", "D"]);

        time::sleep(Duration::from_millis(9_500)).await;
        assert_eq!(c.current_image().as_str(), "A");

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(c.current_image().as_str(), "B");

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(c.current_image().as_str(), "A");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_keeps_running_while_paused() {
        let c = controller(&["A", "B", "C", "D"]);
        c.toggle_pause();

        time::sleep(Duration::from_millis(20_500)).await;
        assert_eq!(c.current_index(), 0);
        assert!(c.is_active());

        c.toggle_pause();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(c.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_shutdown() {
        let mut c = controller(&["A", "B", "C", "D"]);
        time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(c.current_index(), 1);

        c.shutdown();
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(c.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinitialize_starts_fresh() {
        let mut first = controller(&["A", "B"]);
        first.on_tick();
        first.toggle_pause();
        first.shutdown();

        let second = RotationController::initialize(first.images(), first.interval()).unwrap();
        assert_eq!(second.current_index(), 0);
        assert!(!second.is_paused());
        assert!(second.is_active());
    }
}
