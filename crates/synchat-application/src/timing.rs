//! Human-like response timing.
//!
//! Each scheduled reply sleeps a uniform-random delay bounded by the active
//! persona's configured interval, holding the typing indicator up for the
//! full duration. The interval is read from the persona supplied at call
//! time, never cached from a previous turn, so config edits and persona
//! switches take effect on the next message.
//!
//! More than one timer may be outstanding at once: a new user message does
//! not cancel the previous pending reply, and both are allowed to land.
//! Resetting cancels everything still pending; a cancelled timer never
//! appends its reply.

use rand::Rng;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use synchat_core::persona::Persona;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Schedules delayed agent replies with a typing indicator.
pub struct ResponseTimingSimulator {
    typing_tx: watch::Sender<bool>,
    // Current cancellation scope; replaced wholesale on cancel_pending so
    // later schedules start from a live token.
    cancel: Mutex<CancellationToken>,
}

impl Default for ResponseTimingSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseTimingSimulator {
    pub fn new() -> Self {
        let (typing_tx, _) = watch::channel(false);
        Self {
            typing_tx,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Subscribes to the typing indicator.
    pub fn typing(&self) -> watch::Receiver<bool> {
        self.typing_tx.subscribe()
    }

    /// Samples a reply delay from the persona's interval, inclusive on both
    /// ends. Inverted bounds are tolerated by swapping.
    pub fn sample_delay(persona: &Persona) -> Duration {
        let (lo, hi) = if persona.interval_min <= persona.interval_max {
            (persona.interval_min, persona.interval_max)
        } else {
            (persona.interval_max, persona.interval_min)
        };
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }

    /// Schedules `reply` to run after a freshly sampled delay.
    ///
    /// The typing indicator is raised for the full delay, then cleared
    /// before the reply runs. If the pending set is cancelled before the
    /// delay elapses, the reply is suppressed entirely.
    pub fn schedule<F>(&self, persona: &Persona, reply: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = Self::sample_delay(persona);
        let token = self.cancel.lock().unwrap().clone();
        let typing = self.typing_tx.clone();
        debug!(persona = %persona.id, delay_ms = delay.as_millis() as u64, "reply scheduled");

        tokio::spawn(async move {
            let _ = typing.send(true);
            tokio::select! {
                _ = token.cancelled() => {
                    let _ = typing.send(false);
                }
                _ = tokio::time::sleep(delay) => {
                    let _ = typing.send(false);
                    reply.await;
                }
            }
        })
    }

    /// Cancels every pending timer and clears the typing indicator.
    ///
    /// Timers scheduled after this call run normally.
    pub fn cancel_pending(&self) {
        let mut guard = self.cancel.lock().unwrap();
        guard.cancel();
        *guard = CancellationToken::new();
        let _ = self.typing_tx.send(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use synchat_core::persona::PersonaKind;

    fn persona(min: u64, max: u64) -> Persona {
        Persona {
            id: "p".to_string(),
            name: "P".to_string(),
            role: "Support".to_string(),
            kind: PersonaKind::Default,
            instructions: String::new(),
            knowledge: String::new(),
            interval_min: min,
            interval_max: max,
            welcome_message: "hi".to_string(),
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn sampled_delay_stays_inside_the_interval() {
        let p = persona(1000, 2000);
        for _ in 0..200 {
            let d = ResponseTimingSimulator::sample_delay(&p).as_millis() as u64;
            assert!((1000..=2000).contains(&d), "delay {} out of bounds", d);
        }
    }

    #[test]
    fn degenerate_interval_is_exact() {
        let p = persona(1500, 1500);
        let d = ResponseTimingSimulator::sample_delay(&p);
        assert_eq!(d, Duration::from_millis(1500));
    }

    #[test]
    fn inverted_interval_is_tolerated() {
        let p = persona(3000, 1000);
        let d = ResponseTimingSimulator::sample_delay(&p).as_millis() as u64;
        assert!((1000..=3000).contains(&d));
    }

    #[tokio::test(start_paused = true)]
    async fn reply_fires_after_a_bounded_delay() {
        let sim = ResponseTimingSimulator::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();

        let started = tokio::time::Instant::now();
        let handle = sim.schedule(&persona(1000, 2000), async move {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        handle.await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed <= Duration::from_millis(2000));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_is_raised_during_the_delay_and_cleared_after() {
        let sim = ResponseTimingSimulator::new();
        let mut typing = sim.typing();
        assert!(!*typing.borrow());

        let handle = sim.schedule(&persona(500, 500), async {});
        typing.changed().await.unwrap();
        assert!(*typing.borrow());

        handle.await.unwrap();
        assert!(!*typing.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_replies() {
        let sim = ResponseTimingSimulator::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();

        let handle = sim.schedule(&persona(1000, 2000), async move {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        sim.cancel_pending();
        handle.await.unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!*sim.typing().borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_timers_both_land() {
        let sim = ResponseTimingSimulator::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let first = {
            let fired = fired.clone();
            sim.schedule(&persona(1000, 1000), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };
        let second = {
            let fired = fired.clone();
            sim.schedule(&persona(1000, 1000), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };

        first.await.unwrap();
        second.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn schedules_after_cancel_run_normally() {
        let sim = ResponseTimingSimulator::new();
        sim.cancel_pending();

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        let handle = sim.schedule(&persona(100, 100), async move {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        handle.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
