use rand::{SeedableRng, rngs::StdRng};
use std::time::Duration;
use tracing::{debug, info};
use types::{AnalyticsEvent, Message, Phase};

use crate::{
    analytics::{AnalyticsSink, LogSink, NoopSink},
    config::WidgetConfig,
    dismissal::{DismissalStore, is_recently_dismissed},
    error::{Error, Result},
    render::{CLOSE_LABEL, Chrome, Renderer},
    rotator,
    scheduler::{Clock, Scheduler, SystemClock, TimerHandle},
    storage::KeyValueStore,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Start even if the tab was closed within the dismissal window.
    pub force: bool,
}

impl StartOptions {
    pub const fn forced() -> Self {
        Self { force: true }
    }
}

/// Mutable lifecycle state of one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    /// Index of the displayed message; always within the message set.
    pub current: usize,
    pub phase: Phase,
    /// The single pending phase timer, if any.
    pub active_timer: Option<TimerHandle>,
    pub has_been_shown_once: bool,
}

/// A floating notification tab.
///
/// The tab alternates between showing a message for `time_to_show` and
/// staying hidden for `time_to_hide`, switching to another message before
/// each reappearance. Hovering pauses the cycle while the tab is visible.
/// Closing the tab suppresses automatic starts for the dismissal window.
///
/// All timing goes through the `Scheduler`; fired handles must be passed
/// back through `handle_timer`.
pub struct FloatingTab {
    action_url: String,
    time_to_show: Duration,
    time_to_hide: Duration,
    messages: Vec<Message>,
    state: WidgetState,
    recently_dismissed: bool,
    renderer: Box<dyn Renderer>,
    scheduler: Box<dyn Scheduler>,
    dismissal: DismissalStore,
    analytics: Box<dyn AnalyticsSink>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl FloatingTab {
    pub fn builder(config: WidgetConfig) -> FloatingTabBuilder {
        FloatingTabBuilder::new(config)
    }

    pub fn start(&mut self, options: StartOptions) {
        if self.recently_dismissed && !options.force {
            info!("Floating tab was recently closed; not starting");
            return;
        }

        info!("Starting floating tab");
        self.show();
        self.schedule_phase_timer();
    }

    pub fn stop(&mut self) {
        self.cancel_timer();
        self.hide();
        info!("Stopped floating tab");
    }

    pub fn handle_hover_start(&mut self) {
        if self.state.phase.is_showing() {
            self.cancel_timer();
        }
    }

    /// Resumes the cycle after a hover. The showing countdown restarts
    /// from the full `time_to_show`.
    pub fn handle_hover_end(&mut self) {
        if self.state.phase.is_showing() {
            self.schedule_phase_timer();
        }
    }

    pub fn handle_close(&mut self) {
        self.hide();
        self.cancel_timer();

        let now = self.clock.now_millis();
        self.dismissal.record_close(now);
        self.recently_dismissed = true;

        self.analytics.push(&AnalyticsEvent::Closed);
        info!("Floating tab closed by user at {}", now);
    }

    pub fn handle_action(&mut self) {
        self.analytics.push(&AnalyticsEvent::Click);
        self.renderer.open_url(&self.action_url);
    }

    /// Advance the cycle for a fired timer. Handles other than the single
    /// pending one are stale and ignored.
    pub fn handle_timer(&mut self, handle: TimerHandle) {
        if self.state.active_timer != Some(handle) {
            debug!("Ignoring stale timer {}", handle.id());
            return;
        }
        self.state.active_timer = None;

        match self.state.phase {
            Phase::Showing => {
                debug!("Show phase expired");
                self.hide();
            }
            Phase::Hidden => {
                debug!("Hide phase expired");
                self.switch_message();
                self.show();
            }
        }

        self.schedule_phase_timer();
    }

    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    pub const fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn current_message(&self) -> &Message {
        &self.messages[self.state.current]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub const fn has_active_timer(&self) -> bool {
        self.state.active_timer.is_some()
    }

    pub const fn was_recently_dismissed(&self) -> bool {
        self.recently_dismissed
    }

    fn show(&mut self) {
        if !self.state.has_been_shown_once {
            self.state.has_been_shown_once = true;
            self.analytics.push(&AnalyticsEvent::View);
        }

        self.state.phase = Phase::Showing;
        self.render();
    }

    fn hide(&mut self) {
        self.state.phase = Phase::Hidden;
        self.render();
    }

    fn switch_message(&mut self) {
        self.state.current = rotator::select_next(
            self.state.current,
            &mut self.messages,
            &mut self.rng,
        );
        debug!("Switched to message {:?}", self.current_message().title);
    }

    fn schedule_phase_timer(&mut self) {
        self.cancel_timer();

        let delay = match self.state.phase {
            Phase::Showing => self.time_to_show,
            Phase::Hidden => self.time_to_hide,
        };
        self.state.active_timer = Some(self.scheduler.schedule_once(delay));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.state.active_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn render(&mut self) {
        let message = &self.messages[self.state.current];
        self.renderer.set_message(&message.title, &message.subtitle);
        self.renderer.set_visible(self.state.phase.is_showing());
    }
}

/// Collects the collaborators of a `FloatingTab`.
///
/// A renderer, a scheduler and a store are required; the analytics sink,
/// clock and random source have defaults.
pub struct FloatingTabBuilder {
    config: WidgetConfig,
    renderer: Option<Box<dyn Renderer>>,
    scheduler: Option<Box<dyn Scheduler>>,
    store: Option<Box<dyn KeyValueStore>>,
    analytics: Option<Box<dyn AnalyticsSink>>,
    clock: Option<Box<dyn Clock>>,
    rng: Option<StdRng>,
}

impl FloatingTabBuilder {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            renderer: None,
            scheduler: None,
            store: None,
            analytics: None,
            clock: None,
            rng: None,
        }
    }

    #[must_use]
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    #[must_use]
    pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    #[must_use]
    pub fn analytics(mut self, sink: impl AnalyticsSink + 'static) -> Self {
        self.analytics = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    #[must_use]
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate the configuration and build the tab in its hidden state.
    ///
    /// The dismissal record is read once here.
    ///
    /// # Errors
    /// `Error::Config` for invalid configuration and
    /// `Error::MissingCollaborator` when a required collaborator is absent.
    pub fn build(self) -> Result<FloatingTab> {
        let config = self.config;
        config.validate()?;

        let mut renderer = self
            .renderer
            .ok_or(Error::MissingCollaborator("renderer"))?;
        let scheduler = self
            .scheduler
            .ok_or(Error::MissingCollaborator("scheduler"))?;
        let store = self.store.ok_or(Error::MissingCollaborator("store"))?;

        let analytics: Box<dyn AnalyticsSink> = if config.dev_mode {
            Box::new(LogSink)
        } else {
            self.analytics.unwrap_or_else(|| Box::new(NoopSink))
        };
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let rng = self.rng.unwrap_or_else(StdRng::from_os_rng);

        let dismissal = DismissalStore::new(store, config.storage_key.clone());
        let now = clock.now_millis();
        let recently_dismissed =
            is_recently_dismissed(now, dismissal.closed_at(now));
        if recently_dismissed {
            info!("Floating tab was closed within the dismissal window");
        }

        let mut messages: Vec<Message> =
            config.messages.iter().map(Message::from).collect();
        // the first message is on screen before any rotation
        messages[0].has_been_seen = true;

        renderer.mount(&Chrome {
            action_text: config.action_text.clone(),
            action_url: config.action_url.clone(),
            close_label: CLOSE_LABEL.to_string(),
        });

        let mut tab = FloatingTab {
            time_to_show: config.time_to_show(),
            time_to_hide: config.time_to_hide(),
            action_url: config.action_url,
            messages,
            state: WidgetState {
                current: 0,
                phase: Phase::Hidden,
                active_timer: None,
                has_been_shown_once: false,
            },
            recently_dismissed,
            renderer,
            scheduler,
            dismissal,
            analytics,
            clock,
            rng,
        };
        tab.render();

        Ok(tab)
    }
}
