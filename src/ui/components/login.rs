use eframe::egui;

use crate::ui::state::Participant;

/// Username field for one column. Returns true when Start was pressed.
pub fn render(ui: &mut egui::Ui, index: usize, participant: &mut Participant) -> bool {
    let mut start = false;
    ui.heading(format!("User {}", index + 1));

    if let Some(username) = &participant.username {
        ui.colored_label(egui::Color32::GREEN, format!("● {username}"));
        return false;
    }

    ui.horizontal(|ui| {
        let waiting = participant.pending.is_some();
        ui.add_enabled(
            !waiting,
            egui::TextEdit::singleline(&mut participant.name_input).hint_text("Username"),
        );
        if waiting {
            ui.spinner();
        } else if ui.button("Start chat").clicked() {
            start = true;
        }
    });

    start
}
