mod common;
mod config;
mod registry;
mod shell;
mod ui;

use std::error::Error;

use clap::{Parser, Subcommand};
use common::{RegistryCommand, RegistryEvent};
use dotenvy::dotenv;
use registry::{Registry, RegistryService};
use tokio::sync::mpsc;
use ui::ChatApp;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "chat_registry",
    version,
    about = "In-memory chat registry with a two-person chat window"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Print shell/demo outcomes as JSON
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Two-pane chat window (default)
    Gui,
    /// Read registry commands from stdin
    Shell,
    /// Run the scripted Alice/Bob walkthrough and exit
    Demo,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    match cli.mode.unwrap_or(Mode::Gui) {
        Mode::Demo => {
            shell::run_demo(cli.json, &app_config.timestamp_format);
            Ok(())
        }
        Mode::Shell => run_shell(app_config, cli.json).await,
        Mode::Gui => run_gui(app_config).map_err(|err| err.to_string().into()),
    }
}

fn spawn_registry(
    capacity: usize,
) -> (
    mpsc::Sender<RegistryCommand>,
    mpsc::Receiver<RegistryEvent>,
) {
    // UI/shell -> Registry
    let (cmd_tx, cmd_rx) = mpsc::channel(capacity);
    // Registry -> UI/shell
    let (event_tx, event_rx) = mpsc::channel(capacity);

    tokio::spawn(async move {
        let service = RegistryService::new(Registry::with_system_clock(), event_tx, cmd_rx);
        service.run().await;
    });

    (cmd_tx, event_rx)
}

async fn run_shell(app_config: AppConfig, as_json: bool) -> Result<(), Box<dyn Error>> {
    let (cmd_tx, event_rx) = spawn_registry(app_config.channel_capacity);
    shell::run_shell(cmd_tx, event_rx, as_json, &app_config.timestamp_format).await
}

fn run_gui(app_config: AppConfig) -> Result<(), eframe::Error> {
    let (cmd_tx, event_rx) = spawn_registry(app_config.channel_capacity);

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let title = app_config.window_title.clone();

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!(
                "Chat window started for {} and {}",
                app_config.participants[0],
                app_config.participants[1]
            );

            Ok(Box::new(ChatApp::new(
                cc,
                &app_config,
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}
