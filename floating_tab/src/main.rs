use floating_tab::{
    Error, FloatingTab, Interaction, JsonFileStore, StartOptions, TimerHandle,
    TokioScheduler, WidgetConfig, analytics::LogSink, render::ConsoleRenderer,
    runtime,
};
use ft_app::ContextProvider;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::{self, Sender, UnboundedReceiver},
};
use tracing::{info, warn};

const DEFAULT_STORAGE_PATH: &str = ".floating-tab/storage.json";

#[derive(Debug, Clone, Deserialize)]
struct Config {
    #[serde(flatten)]
    widget: WidgetConfig,

    #[serde(default = "default_storage_path")]
    storage_path: PathBuf,

    #[serde(default)]
    force: bool,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_PATH)
}

struct AppContext {
    tab: FloatingTab,
    timers: UnboundedReceiver<TimerHandle>,
    force: bool,
}

impl ContextProvider<Config> for AppContext {
    type Error = Error;

    async fn new(config: Config) -> Result<Self, Error> {
        let (scheduler, timers) = TokioScheduler::new()?;

        info!("Using dismissal storage at {}", config.storage_path.display());

        let tab = FloatingTab::builder(config.widget)
            .renderer(ConsoleRenderer::new(std::io::stdout()))
            .scheduler(scheduler)
            .store(JsonFileStore::new(config.storage_path))
            .analytics(LogSink)
            .build()?;

        Ok(Self {
            tab,
            timers,
            force: config.force,
        })
    }
}

async fn read_interactions(interactions: Sender<Interaction>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read from stdin: {}", e);
                break;
            }
        };

        if line.trim() == "quit" {
            break;
        }

        match Interaction::parse(&line) {
            Some(interaction) => {
                if interactions.send(interaction).await.is_err() {
                    break;
                }
            }
            None => warn!(
                "Unknown command {:?}; try hover, leave, click, close, stop, start [--force] or quit",
                line.trim()
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let AppContext {
        mut tab,
        timers,
        force,
    } = ft_app::create_app_context::<AppContext, Config>().await?;

    tab.start(StartOptions { force });

    let (sender, receiver) = mpsc::channel(16);
    tokio::spawn(read_interactions(sender));

    let tab = runtime::run(tab, timers, receiver).await;
    info!(
        "Floating tab shut down showing {:?}",
        tab.current_message().title
    );

    Ok(())
}
