// Floating Tab - a rotating, dismissible on-page notification
//
// The library holds the widget state machine and its collaborators.
// The console host is in src/main.rs

pub mod analytics;
pub mod config;
pub mod dismissal;
pub mod error;
pub mod render;
pub mod rotator;
pub mod runtime;
pub mod scheduler;
pub mod storage;
pub mod widget;

pub use config::{ConfigError, WidgetConfig};
pub use error::{Error, Result};
pub use runtime::Interaction;
pub use scheduler::{Clock, ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::{AnalyticsEvent, Message, MessageContent, Phase};
pub use widget::{FloatingTab, FloatingTabBuilder, StartOptions, WidgetState};
