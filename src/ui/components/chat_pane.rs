use eframe::egui;

use crate::ui::state::{LineKind, PaneLine};

pub fn render(ui: &mut egui::Ui, index: usize, lines: &[PaneLine]) {
    egui::ScrollArea::vertical()
        .id_salt(("chat_pane", index))
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .max_height((ui.available_height() - 40.0).max(60.0))
        .show(ui, |ui| {
            for line in lines {
                match line.kind {
                    LineKind::Message => {
                        ui.label(&line.text);
                    }
                    LineKind::System => {
                        ui.label(egui::RichText::new(&line.text).weak().italics());
                    }
                    LineKind::Error => {
                        ui.colored_label(egui::Color32::LIGHT_RED, &line.text);
                    }
                }
            }
        });
}
