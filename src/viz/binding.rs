//! Mounting, resizing and redraw scheduling for a single chart.
//!
//! The binding never sleeps. Callers pass `now` in and act on the returned
//! [`MountStatus`] or the `poll` result, so the event loop stays in charge of
//! timing.

use super::chart::{Chart, Input, Size, VizError};
use crate::store::ChangeSet;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Bounded retry for surfaces that report no size yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPolicy {
    /// Attempts before giving up (default: 25)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds (default: 40)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for MountPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl MountPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

fn default_max_attempts() -> u32 {
    25
}

fn default_backoff_ms() -> u64 {
    40
}

/// Default quiet period before a resize triggers a rebuild.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStatus {
    Mounted,
    /// Surface not measurable yet; call `mount` again after the delay.
    Retry { after: Duration },
    Failed,
}

/// What a [`ChartBinding::apply`] call did to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    None,
    Recreated,
    Updated,
}

/// Owns one chart and decides between rebuild and restyle.
pub struct ChartBinding<C: Chart> {
    chart: C,
    options: C::Options,
    policy: MountPolicy,
    debounce: Duration,
    size: Option<Size>,
    status: Option<MountStatus>,
    attempts: u32,
    next_attempt: Option<Instant>,
    pending_resize: Option<(Size, Instant)>,
    renders: usize,
}

impl<C: Chart> ChartBinding<C> {
    pub fn new(chart: C, options: C::Options) -> Self {
        Self::with_policy(chart, options, MountPolicy::default(), RESIZE_DEBOUNCE)
    }

    pub fn with_policy(chart: C, options: C::Options, policy: MountPolicy, debounce: Duration) -> Self {
        Self {
            chart,
            options,
            policy,
            debounce,
            size: None,
            status: None,
            attempts: 0,
            next_attempt: None,
            pending_resize: None,
            renders: 0,
        }
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn options(&self) -> &C::Options {
        &self.options
    }

    pub fn status(&self) -> Option<MountStatus> {
        self.status
    }

    pub fn is_mounted(&self) -> bool {
        self.status == Some(MountStatus::Mounted)
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Number of full renders so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Time at which the next mount attempt is due, if one is scheduled.
    pub fn next_attempt(&self) -> Option<Instant> {
        self.next_attempt
    }

    /// Try to mount at `size`.
    ///
    /// An unmeasurable surface schedules another attempt after the policy
    /// backoff. Once the attempts run out the binding is marked failed and
    /// stays that way until `unmount`.
    pub fn mount(&mut self, size: Size, now: Instant) -> Result<MountStatus, VizError> {
        match self.status {
            Some(MountStatus::Mounted) => return Ok(MountStatus::Mounted),
            Some(MountStatus::Failed) => {
                return Err(VizError::SurfaceUnmeasurable {
                    attempts: self.attempts,
                })
            }
            _ => {}
        }

        if size.is_measurable() {
            self.render_at(size)?;
            self.attempts = 0;
            self.next_attempt = None;
            self.status = Some(MountStatus::Mounted);
            return Ok(MountStatus::Mounted);
        }

        self.attempts += 1;
        if self.attempts >= self.policy.max_attempts {
            tracing::warn!(attempts = self.attempts, "Giving up on unmeasurable chart surface");
            self.status = Some(MountStatus::Failed);
            self.next_attempt = None;
            return Err(VizError::SurfaceUnmeasurable {
                attempts: self.attempts,
            });
        }

        let after = self.policy.backoff();
        tracing::trace!(attempt = self.attempts, ?after, "Chart surface not measurable yet");
        self.next_attempt = Some(now + after);
        let status = MountStatus::Retry { after };
        self.status = Some(status);
        Ok(status)
    }

    /// Record a resize. The rebuild happens in [`poll`](Self::poll) once the
    /// size has been stable for the debounce period.
    pub fn on_resize(&mut self, size: Size, now: Instant) {
        if !self.is_mounted() {
            return;
        }
        self.pending_resize = Some((size, now + self.debounce));
    }

    /// Fire a due resize. Returns true when the chart was rebuilt.
    pub fn poll(&mut self, now: Instant) -> Result<bool, VizError> {
        let Some((size, deadline)) = self.pending_resize else {
            return Ok(false);
        };
        if now < deadline {
            return Ok(false);
        }
        self.pending_resize = None;
        if Some(size) == self.size || !size.is_measurable() {
            return Ok(false);
        }
        self.render_at(size)?;
        Ok(true)
    }

    /// New data: rebuild the chart when mounted, otherwise keep the options
    /// for the eventual mount.
    pub fn data_changed(&mut self, options: C::Options) -> Result<(), VizError> {
        self.options = options;
        match self.size {
            Some(size) if self.is_mounted() => self.render_at(size),
            _ => Ok(()),
        }
    }

    /// Selection or hover changed: restyle in place.
    pub fn selection_changed(&mut self, update: &C::Update) -> Result<(), VizError> {
        if !self.is_mounted() {
            return Ok(());
        }
        self.chart.update(update)
    }

    /// Route a store change set to a rebuild or a restyle.
    pub fn apply(
        &mut self,
        changes: &ChangeSet,
        options: impl FnOnce() -> C::Options,
        update: impl FnOnce() -> C::Update,
    ) -> Result<Redraw, VizError> {
        if changes.needs_recreate() {
            self.data_changed(options())?;
            Ok(Redraw::Recreated)
        } else if changes.needs_update() {
            self.selection_changed(&update())?;
            Ok(Redraw::Updated)
        } else {
            Ok(Redraw::None)
        }
    }

    pub fn handle_input(&mut self, input: Input) -> Option<C::Event> {
        if !self.is_mounted() {
            return None;
        }
        self.chart.handle_input(input)
    }

    /// Tear down: cancel scheduled work and drop the scene.
    pub fn unmount(&mut self) {
        self.pending_resize = None;
        self.next_attempt = None;
        self.attempts = 0;
        self.status = None;
        self.size = None;
        self.chart.destroy();
    }

    fn render_at(&mut self, size: Size) -> Result<(), VizError> {
        self.chart.render(size, &self.options)?;
        self.size = Some(size);
        self.renders += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::scene::Scene;

    #[derive(Debug, Default)]
    struct CountingChart {
        scene: Option<Scene>,
        rendered_with: Vec<(Size, u32)>,
        updates: Vec<u32>,
    }

    impl Chart for CountingChart {
        type Options = u32;
        type Update = u32;
        type Event = ();

        fn render(&mut self, size: Size, options: &u32) -> Result<(), VizError> {
            self.scene = Some(Scene::new(size.width, size.height));
            self.rendered_with.push((size, *options));
            Ok(())
        }

        fn update(&mut self, update: &u32) -> Result<(), VizError> {
            if self.scene.is_none() {
                return Err(VizError::NotRendered);
            }
            self.updates.push(*update);
            Ok(())
        }

        fn handle_input(&mut self, _input: Input) -> Option<()> {
            Some(())
        }

        fn destroy(&mut self) {
            self.scene = None;
        }

        fn scene(&self) -> Option<&Scene> {
            self.scene.as_ref()
        }
    }

    fn binding() -> ChartBinding<CountingChart> {
        ChartBinding::new(CountingChart::default(), 1)
    }

    const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    #[test]
    fn test_mount_renders_once_measurable() {
        let mut b = binding();
        let now = Instant::now();
        assert_eq!(
            b.mount(ZERO, now).unwrap(),
            MountStatus::Retry {
                after: Duration::from_millis(40)
            }
        );
        assert_eq!(b.next_attempt(), Some(now + Duration::from_millis(40)));
        assert_eq!(b.render_count(), 0);

        assert_eq!(b.mount(Size::new(300.0, 200.0), now).unwrap(), MountStatus::Mounted);
        assert_eq!(b.render_count(), 1);
        assert!(b.chart().scene().is_some());
    }

    #[test]
    fn test_mount_gives_up_after_policy_attempts() {
        let policy = MountPolicy {
            max_attempts: 3,
            backoff_ms: 10,
        };
        let mut b = ChartBinding::with_policy(CountingChart::default(), 1, policy, RESIZE_DEBOUNCE);
        let now = Instant::now();
        assert!(b.mount(ZERO, now).is_ok());
        assert!(b.mount(ZERO, now).is_ok());
        assert_eq!(
            b.mount(ZERO, now),
            Err(VizError::SurfaceUnmeasurable { attempts: 3 })
        );
        assert_eq!(b.status(), Some(MountStatus::Failed));
        // Failure is sticky even if the surface shows up later.
        assert!(b.mount(Size::new(10.0, 10.0), now).is_err());
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut b = binding();
        let t0 = Instant::now();
        b.mount(Size::new(300.0, 200.0), t0).unwrap();

        b.on_resize(Size::new(400.0, 200.0), t0);
        b.on_resize(Size::new(500.0, 200.0), t0 + Duration::from_millis(100));
        assert!(!b.poll(t0 + Duration::from_millis(200)).unwrap());
        assert!(b.poll(t0 + Duration::from_millis(250)).unwrap());

        assert_eq!(b.render_count(), 2);
        assert_eq!(b.size(), Some(Size::new(500.0, 200.0)));
        assert!(!b.poll(t0 + Duration::from_millis(400)).unwrap());
    }

    #[test]
    fn test_apply_picks_recreate_or_update() {
        let mut b = binding();
        b.mount(Size::new(300.0, 200.0), Instant::now()).unwrap();

        let filters = ChangeSet {
            filters: true,
            ..ChangeSet::default()
        };
        assert_eq!(b.apply(&filters, || 7, || 0).unwrap(), Redraw::Recreated);

        let hover = ChangeSet {
            selection: true,
            ..ChangeSet::default()
        };
        assert_eq!(b.apply(&hover, || 0, || 9).unwrap(), Redraw::Updated);
        assert_eq!(b.apply(&ChangeSet::default(), || 0, || 0).unwrap(), Redraw::None);

        let chart = b.chart();
        assert_eq!(chart.rendered_with.last().map(|(_, o)| *o), Some(7));
        assert_eq!(chart.updates, vec![9]);
    }

    #[test]
    fn test_unmount_drops_pending_resize() {
        let mut b = binding();
        let t0 = Instant::now();
        b.mount(Size::new(300.0, 200.0), t0).unwrap();
        b.on_resize(Size::new(600.0, 200.0), t0);
        b.unmount();

        assert!(!b.poll(t0 + Duration::from_secs(1)).unwrap());
        assert!(b.chart().scene().is_none());
        assert!(b.handle_input(Input::PointerLeave).is_none());
        assert_eq!(b.status(), None);
    }

    #[test]
    fn test_data_before_mount_is_kept() {
        let mut b = binding();
        b.data_changed(5).unwrap();
        assert_eq!(b.render_count(), 0);
        b.mount(Size::new(100.0, 100.0), Instant::now()).unwrap();
        assert_eq!(b.chart().rendered_with[0].1, 5);
    }
}
