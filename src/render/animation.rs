//! Cosmetic, timer-driven animations.
//!
//! Each animation is an independent tokio task writing straight to the
//! view. Data rendering never waits on them, and [`Animations::immediate`]
//! skips them entirely by writing the final value up front.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::view::{Region, View};

/// Total run time of a count-up animation.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(1000);

/// Delay before a bar jumps to its width, so the CSS-style transition is visible.
pub const BAR_FILL_DELAY: Duration = Duration::from_millis(100);

/// Approximate display refresh interval.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Elapsed fraction of `duration`, clamped to `[0, 1]`.
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Value shown at `progress` on the way to `target`.
pub fn count_value(progress: f64, target: u32) -> u32 {
    (progress.clamp(0.0, 1.0) * f64::from(target)).floor() as u32
}

/// Handle to a running animation.
///
/// Dropping the handle detaches the task; it still runs to completion.
#[derive(Debug)]
pub struct AnimationHandle {
    task: Option<JoinHandle<()>>,
}

impl AnimationHandle {
    fn finished() -> Self {
        Self { task: None }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the animation where it is.
    pub fn cancel(&self) {
        if let Some(ref task) = self.task {
            task.abort();
        }
    }

    /// Wait for the animation to end, whether it completed or was cancelled.
    pub async fn wait(self) {
        if let Some(task) = self.task {
            let _ = task.await;
        }
    }
}

/// Animation policy shared by every renderer of one app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animations {
    enabled: bool,
}

impl Animations {
    /// Run animations on the tokio timer. Requires a running runtime.
    pub fn animated() -> Self {
        Self { enabled: true }
    }

    /// Write final values synchronously.
    pub fn immediate() -> Self {
        Self { enabled: false }
    }

    pub fn from_enabled(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Count the text of `region` up from 0 to `target` over [`COUNT_UP_DURATION`].
    ///
    /// Each call starts a fresh sequence; an older one still running on the
    /// same region is not stopped.
    pub fn count_up(&self, view: &Arc<dyn View>, region: Region, target: u32) -> AnimationHandle {
        if !self.enabled {
            view.set_text(region, &target.to_string());
            return AnimationHandle::finished();
        }

        let view = Arc::clone(view);
        let task = tokio::spawn(async move {
            let start = Instant::now();
            let mut frames = tokio::time::interval(FRAME_INTERVAL);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                frames.tick().await;
                let p = progress(start.elapsed(), COUNT_UP_DURATION);
                view.set_text(region, &count_value(p, target).to_string());
                if p >= 1.0 {
                    break;
                }
            }
        });
        AnimationHandle { task: Some(task) }
    }

    /// Set a bar's width after [`BAR_FILL_DELAY`].
    pub fn fill_bar(&self, view: &Arc<dyn View>, region: Region, percent: u8) -> AnimationHandle {
        if !self.enabled {
            view.set_width(region, percent);
            return AnimationHandle::finished();
        }

        let view = Arc::clone(view);
        let task = tokio::spawn(async move {
            tokio::time::sleep(BAR_FILL_DELAY).await;
            view.set_width(region, percent);
        });
        AnimationHandle { task: Some(task) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::Category;
    use crate::view::Screen;

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(Duration::ZERO, COUNT_UP_DURATION), 0.0);
        assert_eq!(progress(Duration::from_millis(500), COUNT_UP_DURATION), 0.5);
        assert_eq!(progress(Duration::from_secs(5), COUNT_UP_DURATION), 1.0);
        assert_eq!(progress(Duration::from_millis(1), Duration::ZERO), 1.0);
    }

    #[test]
    fn count_value_floors() {
        assert_eq!(count_value(0.0, 87), 0);
        assert_eq!(count_value(0.5, 87), 43);
        assert_eq!(count_value(0.999, 87), 86);
        assert_eq!(count_value(1.0, 87), 87);
        assert_eq!(count_value(3.0, 87), 87);
    }

    #[tokio::test(start_paused = true)]
    async fn count_up_reaches_target_and_stops() {
        let screen = Arc::new(Screen::default());
        let view: Arc<dyn View> = screen.clone();

        let handle = Animations::animated().count_up(&view, Region::OverallScore, 92);
        tokio::time::sleep(Duration::from_millis(500)).await;
        let midway: u32 = screen.snapshot().text[&Region::OverallScore].parse().unwrap();
        assert!(midway > 0 && midway < 92, "midway value was {midway}");

        handle.wait().await;
        assert_eq!(screen.snapshot().text[&Region::OverallScore], "92");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_count_up_stops_short() {
        let screen = Arc::new(Screen::default());
        let view: Arc<dyn View> = screen.clone();

        let handle = Animations::animated().count_up(&view, Region::OverallScore, 100);
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.cancel();
        handle.wait().await;
        let value: u32 = screen.snapshot().text[&Region::OverallScore].parse().unwrap();
        assert!(value < 100);
    }

    #[tokio::test(start_paused = true)]
    async fn bar_fill_waits_for_delay() {
        let screen = Arc::new(Screen::default());
        let view: Arc<dyn View> = screen.clone();
        let region = Region::CategoryBar(Category::Security);

        let handle = Animations::animated().fill_bar(&view, region, 64);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!screen.snapshot().width.contains_key(&region));

        handle.wait().await;
        assert_eq!(screen.snapshot().width[&region], 64);
    }

    #[test]
    fn immediate_mode_writes_final_values() {
        let screen = Arc::new(Screen::default());
        let view: Arc<dyn View> = screen.clone();
        let region = Region::CategoryScore(Category::Performance);

        let handle = Animations::immediate().count_up(&view, region, 55);
        assert!(handle.is_finished());
        assert_eq!(screen.snapshot().text[&region], "55");
    }
}
