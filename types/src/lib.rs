use serde::{Deserialize, Serialize};

/// The configured form of a message, as supplied by the embedding page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub title: String,

    #[serde(default)]
    pub subtitle: String,
}

/// A message together with its rotation bookkeeping.
///
/// The title is the identity of a message; `has_been_seen` is reset every
/// time a rotation cycle is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub title: String,

    pub subtitle: String,

    #[serde(default)]
    pub has_been_seen: bool,
}

impl From<MessageContent> for Message {
    fn from(content: MessageContent) -> Self {
        Message {
            title: content.title,
            subtitle: content.subtitle,
            has_been_seen: false,
        }
    }
}

impl From<&MessageContent> for Message {
    fn from(content: &MessageContent) -> Self {
        Message::from(content.clone())
    }
}

/// Visibility phase of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Hidden,

    Showing,
}

impl Phase {
    pub const fn is_showing(self) -> bool {
        matches!(self, Phase::Showing)
    }
}

/// Events pushed to the analytics sink.
///
/// Serialises the way tag-manager data layers expect them, e.g.
/// `{"event": "floatingTabView"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AnalyticsEvent {
    #[serde(rename = "floatingTabView")]
    View,

    #[serde(rename = "floatingTabClicked")]
    Click,

    #[serde(rename = "floatingTabClosed")]
    Closed,
}

impl AnalyticsEvent {
    pub const fn name(self) -> &'static str {
        match self {
            AnalyticsEvent::View => "floatingTabView",
            AnalyticsEvent::Click => "floatingTabClicked",
            AnalyticsEvent::Closed => "floatingTabClosed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_event_serializes_with_event_name() {
        let value = serde_json::to_value(AnalyticsEvent::Closed).unwrap();

        assert_eq!(value, serde_json::json!({ "event": "floatingTabClosed" }));
        assert_eq!(value["event"], AnalyticsEvent::Closed.name());
    }

    #[test]
    fn test_message_from_content_starts_unseen() {
        let content = MessageContent {
            title: "Free shipping".to_string(),
            subtitle: "On orders over $50".to_string(),
        };

        let message = Message::from(&content);

        assert_eq!(message.title, "Free shipping");
        assert_eq!(message.subtitle, "On orders over $50");
        assert!(!message.has_been_seen);
    }

    #[test]
    fn test_message_content_subtitle_is_optional() {
        let content: MessageContent =
            serde_json::from_str(r#"{"title": "Hello"}"#).unwrap();

        assert_eq!(content.subtitle, "");
    }
}
