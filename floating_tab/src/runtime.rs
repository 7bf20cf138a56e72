use tokio::sync::mpsc::{Receiver, UnboundedReceiver};
use tracing::debug;

use crate::{
    scheduler::TimerHandle,
    widget::{FloatingTab, StartOptions},
};

/// A user or host action delivered to a running tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Start { force: bool },
    Stop,
    HoverStart,
    HoverEnd,
    Close,
    Action,
}

impl Interaction {
    /// Parse a console command such as `hover` or `start --force`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["start"] => Some(Interaction::Start { force: false }),
            ["start", "--force"] => Some(Interaction::Start { force: true }),
            ["stop"] => Some(Interaction::Stop),
            ["hover"] => Some(Interaction::HoverStart),
            ["leave"] => Some(Interaction::HoverEnd),
            ["close"] => Some(Interaction::Close),
            ["click"] => Some(Interaction::Action),
            _ => None,
        }
    }
}

pub fn apply(tab: &mut FloatingTab, interaction: Interaction) {
    debug!("Applying {:?}", interaction);

    match interaction {
        Interaction::Start { force } => tab.start(StartOptions { force }),
        Interaction::Stop => tab.stop(),
        Interaction::HoverStart => tab.handle_hover_start(),
        Interaction::HoverEnd => tab.handle_hover_end(),
        Interaction::Close => tab.handle_close(),
        Interaction::Action => tab.handle_action(),
    }
}

/// Drive `tab` from fired timers and interactions on a single task.
///
/// Returns the stopped tab once the interaction channel closes, which is
/// how a host signals teardown.
pub async fn run(
    mut tab: FloatingTab,
    mut timers: UnboundedReceiver<TimerHandle>,
    mut interactions: Receiver<Interaction>,
) -> FloatingTab {
    loop {
        tokio::select! {
            interaction = interactions.recv() => match interaction {
                Some(interaction) => apply(&mut tab, interaction),
                None => break,
            },
            Some(handle) = timers.recv() => tab.handle_timer(handle),
        }
    }

    tab.stop();
    tab
}
