use std::{
    io::Write,
    sync::{Arc, Mutex},
};
use tracing::warn;

pub const CLOSE_LABEL: &str = "Close";

/// Static parts of the tab, rendered once when an instance is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub action_text: String,
    pub action_url: String,
    pub close_label: String,
}

/// Receives render intents from the widget. Implementations own the
/// display surface; the widget never waits on them.
pub trait Renderer: Send {
    fn mount(&mut self, chrome: &Chrome);

    fn set_visible(&mut self, visible: bool);

    fn set_message(&mut self, title: &str, subtitle: &str);

    /// Open `url` in a new browsing context.
    fn open_url(&mut self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderIntent {
    Mount(Chrome),
    SetVisible(bool),
    SetMessage { title: String, subtitle: String },
    OpenUrl(String),
}

/// Records every intent it receives. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    intents: Arc<Mutex<Vec<RenderIntent>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> Vec<RenderIntent> {
        self.intents
            .lock()
            .map(|intents| intents.clone())
            .unwrap_or_default()
    }

    /// Visibility as of the most recent `SetVisible` intent.
    pub fn visible(&self) -> bool {
        self.intents().iter().rev().find_map(|intent| match intent {
            RenderIntent::SetVisible(visible) => Some(*visible),
            _ => None,
        }) == Some(true)
    }

    /// Title of the most recently rendered message.
    pub fn title(&self) -> Option<String> {
        self.intents().into_iter().rev().find_map(|intent| match intent {
            RenderIntent::SetMessage { title, .. } => Some(title),
            _ => None,
        })
    }

    pub fn clear(&self) {
        if let Ok(mut intents) = self.intents.lock() {
            intents.clear();
        }
    }

    fn record(&self, intent: RenderIntent) {
        if let Ok(mut intents) = self.intents.lock() {
            intents.push(intent);
        }
    }
}

impl Renderer for RecordingRenderer {
    fn mount(&mut self, chrome: &Chrome) {
        self.record(RenderIntent::Mount(chrome.clone()));
    }

    fn set_visible(&mut self, visible: bool) {
        self.record(RenderIntent::SetVisible(visible));
    }

    fn set_message(&mut self, title: &str, subtitle: &str) {
        self.record(RenderIntent::SetMessage {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
        });
    }

    fn open_url(&mut self, url: &str) {
        self.record(RenderIntent::OpenUrl(url.to_string()));
    }
}

/// Draws the tab as text, one frame per visibility or message change.
pub struct ConsoleRenderer<W: Write + Send> {
    out: W,
    chrome: Option<Chrome>,
    visible: bool,
    title: String,
    subtitle: String,
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            chrome: None,
            visible: false,
            title: String::new(),
            subtitle: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) {
        let frame = if self.visible {
            let (action, close) = self.chrome.as_ref().map_or(
                ("", CLOSE_LABEL),
                |c| (c.action_text.as_str(), c.close_label.as_str()),
            );
            format!(
                "[tab] {} | {} [{}] [{}]",
                self.title, self.subtitle, action, close
            )
        } else {
            "[tab] (hidden)".to_string()
        };

        if let Err(e) = writeln!(self.out, "{frame}") {
            warn!("Failed to draw floating tab: {}", e);
        }
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn mount(&mut self, chrome: &Chrome) {
        self.chrome = Some(chrome.clone());
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.draw();
        }
    }

    fn set_message(&mut self, title: &str, subtitle: &str) {
        if self.title != title || self.subtitle != subtitle {
            title.clone_into(&mut self.title);
            subtitle.clone_into(&mut self.subtitle);
            if self.visible {
                self.draw();
            }
        }
    }

    fn open_url(&mut self, url: &str) {
        if let Err(e) = writeln!(self.out, "[tab] opening {url} in a new window")
        {
            warn!("Failed to draw floating tab: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chrome() -> Chrome {
        Chrome {
            action_text: "Shop".to_string(),
            action_url: "https://example.com".to_string(),
            close_label: CLOSE_LABEL.to_string(),
        }
    }

    #[test]
    fn test_console_renderer_draws_visible_frames_only_on_change() {
        let mut renderer = ConsoleRenderer::new(Vec::new());

        renderer.mount(&chrome());
        renderer.set_message("Sale", "Today only");
        renderer.set_visible(true);
        renderer.set_visible(true);
        renderer.set_visible(false);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            output,
            "[tab] Sale | Today only [Shop] [Close]\n[tab] (hidden)\n"
        );
    }

    #[test]
    fn test_recording_renderer_tracks_latest_state() {
        let mut renderer = RecordingRenderer::new();
        let view = renderer.clone();

        renderer.set_message("A", "a");
        renderer.set_visible(true);
        renderer.set_message("B", "b");

        assert!(view.visible());
        assert_eq!(view.title(), Some("B".to_string()));
        assert_eq!(view.intents().len(), 3);
    }
}
