use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed,
    Linear,
}

/// How long to keep looking for a target that has not been mounted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub step: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Single lookup once a route transition has had time to render.
    pub const fn after_route_change() -> Self {
        Self {
            attempts: 1,
            step: Duration::from_millis(300),
            backoff: Backoff::Fixed,
        }
    }

    /// Three lookups at 100ms, 200ms and 300ms apart.
    pub const fn late_mount() -> Self {
        Self {
            attempts: 3,
            step: Duration::from_millis(100),
            backoff: Backoff::Linear,
        }
    }

    /// Delay before the 0-based `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.step,
            Backoff::Linear => self.step * (attempt + 1),
        }
    }

    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.attempts).map(|attempt| self.delay(attempt))
    }

    pub fn total(&self) -> Duration {
        self.delays().sum()
    }
}

pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        gloo_timers::future::sleep(duration)
    }
}

/// Shared flag flipped when the owner of pending lookups goes away.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Sleeps per `policy` and runs `lookup` after each delay, returning the
/// first hit. Gives up silently once the attempts run out or `cancel` fires.
pub async fn wait_for<T, F>(
    policy: RetryPolicy,
    timer: &impl Timer,
    cancel: &Cancellation,
    mut lookup: F,
) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    for delay in policy.delays() {
        timer.sleep(delay).await;
        if cancel.is_cancelled() {
            return None;
        }
        if let Some(found) = lookup() {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;

    #[derive(Default)]
    struct VirtualClock {
        now: Cell<Duration>,
    }

    impl VirtualClock {
        fn now(&self) -> Duration {
            self.now.get()
        }
    }

    impl Timer for VirtualClock {
        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
            self.now.set(self.now.get() + duration);
            std::future::ready(())
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_linear_backoff_delays() {
        let policy = RetryPolicy::late_mount();
        assert_eq!(policy.delays().collect::<Vec<_>>(), [ms(100), ms(200), ms(300)]);
        assert_eq!(policy.total(), ms(600));

        let policy = RetryPolicy::after_route_change();
        assert_eq!(policy.delays().collect::<Vec<_>>(), [ms(300)]);
    }

    #[test]
    fn test_target_mounted_late_is_found() {
        let clock = VirtualClock::default();
        let cancel = Cancellation::new();
        let mut lookups = Vec::new();

        // absent through 250ms, present from 260ms
        let found = block_on(wait_for(RetryPolicy::late_mount(), &clock, &cancel, || {
            lookups.push(clock.now());
            (clock.now() >= ms(260)).then_some("projects")
        }));

        assert_eq!(found, Some("projects"));
        assert_eq!(lookups, [ms(100), ms(300)]);
    }

    #[test]
    fn test_target_mounted_at_350_is_found_on_last_attempt() {
        let clock = VirtualClock::default();
        let cancel = Cancellation::new();
        let found = block_on(wait_for(RetryPolicy::late_mount(), &clock, &cancel, || {
            (clock.now() >= ms(350)).then_some(())
        }));
        assert_eq!(found, Some(()));
        assert_eq!(clock.now(), ms(600));
    }

    #[test]
    fn test_missing_target_gives_up_quietly() {
        let clock = VirtualClock::default();
        let cancel = Cancellation::new();
        let mut calls = 0;
        let found: Option<()> = block_on(wait_for(RetryPolicy::late_mount(), &clock, &cancel, || {
            calls += 1;
            None
        }));
        assert_eq!(found, None);
        assert_eq!(calls, 3);
        assert_eq!(clock.now(), ms(600));
    }

    #[test]
    fn test_cancelled_wait_skips_lookup() {
        let clock = VirtualClock::default();
        let cancel = Cancellation::new();
        cancel.cancel();
        let mut calls = 0;
        let found = block_on(wait_for(RetryPolicy::after_route_change(), &clock, &cancel, || {
            calls += 1;
            Some(())
        }));
        assert_eq!(found, None);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_cancellation_is_shared_between_clones() {
        let cancel = Cancellation::new();
        let handle = cancel.clone();
        assert!(!cancel.is_cancelled());
        handle.cancel();
        assert!(cancel.is_cancelled());
    }
}
