use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{RegistryCommand, RegistryEvent};
use crate::config::AppConfig;

use super::components::{chat_pane, input_bar, login};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    title: String,
    command_sender: mpsc::Sender<RegistryCommand>,
    event_receiver: mpsc::Receiver<RegistryEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        command_sender: mpsc::Sender<RegistryCommand>,
        event_receiver: mpsc::Receiver<RegistryEvent>,
    ) -> Self {
        Self {
            state: AppState::new(&config.participants, &config.timestamp_format),
            title: config.window_title.clone(),
            command_sender,
            event_receiver,
        }
    }

    fn handle_registry_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply_event(event);
        }
    }

    fn send_command(&mut self, command: RegistryCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to registry: {err}");
            let reason = err.to_string();
            self.state.command_failed(err.into_inner(), &reason);
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_registry_events();

        let mut outgoing = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            ui.separator();

            let chatting = self.state.is_chatting();
            let mut start = false;
            let mut send_from = None;

            ui.columns(2, |columns| {
                for (index, column) in columns.iter_mut().enumerate() {
                    let participant = &mut self.state.participants[index];
                    start |= login::render(column, index, participant);
                    column.separator();
                    chat_pane::render(column, index, &participant.lines);

                    if chatting {
                        column.separator();
                        let hint = "Type a message";
                        if input_bar::render(column, &mut participant.input_text, hint) {
                            send_from = Some(index);
                        }
                    }
                }
            });

            if start {
                outgoing.extend(self.state.start_chat());
            }
            if let Some(index) = send_from {
                outgoing.extend(self.state.compose(index));
            }
        });

        for command in outgoing {
            self.send_command(command);
        }

        ctx.request_repaint();
    }
}
