use common::protocol::PlayerInfo;
use eframe::egui;

use crate::state::ListState;
use super::colors;

const CARD_WIDTH: f32 = 200.0;

pub fn render_watch_players(ui: &mut egui::Ui, players: &ListState<PlayerInfo>) {
    ui.vertical_centered(|ui| {
        ui.heading("Watching Other Players");
        ui.add_space(10.0);

        if let Some(error) = &players.error {
            ui.label(egui::RichText::new(error).color(egui::Color32::RED));
            ui.add_space(5.0);
        }

        if !players.loaded {
            if players.error.is_none() {
                ui.label("Loading players...");
            }
            return;
        }

        if players.items.is_empty() {
            ui.label(egui::RichText::new("No players currently playing").color(egui::Color32::GRAY));
            ui.label(egui::RichText::new("Start a game to see players in action!").small().color(egui::Color32::GRAY));
        }
    });

    if !players.loaded || players.items.is_empty() {
        return;
    }

    let columns = ((ui.available_width() / (CARD_WIDTH + 12.0)) as usize).max(1);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for row in players.items.chunks(columns) {
            ui.horizontal(|ui| {
                for player in row {
                    render_card(ui, player);
                }
            });
            ui.add_space(8.0);
        }
    });
}

fn render_card(ui: &mut egui::Ui, player: &PlayerInfo) {
    let color = colors::status_color(player.status);

    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.5, color))
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.horizontal(|ui| {
                ui.strong(&player.username);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(player.status.to_string()).small().strong().color(color));
                });
            });
            ui.label(format!("Score: {}", player.score));
            ui.label(format!("Mode: {}", player.game_mode));
        });
}
