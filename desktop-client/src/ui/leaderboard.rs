use common::protocol::LeaderboardEntry;
use eframe::egui;

use crate::state::ListState;
use super::colors;

pub fn render_leaderboard(ui: &mut egui::Ui, leaderboard: &ListState<LeaderboardEntry>) {
    ui.vertical_centered(|ui| {
        ui.heading("Leaderboard");
        ui.add_space(10.0);

        if let Some(error) = &leaderboard.error {
            ui.label(egui::RichText::new(error).color(egui::Color32::RED));
            ui.add_space(5.0);
        }

        if !leaderboard.loaded {
            if leaderboard.error.is_none() {
                ui.label("Loading leaderboard...");
            }
            return;
        }

        if leaderboard.items.is_empty() {
            ui.label(egui::RichText::new("No finished games yet").italics().color(egui::Color32::GRAY));
        } else {
            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("leaderboard_grid")
                    .num_columns(3)
                    .striped(true)
                    .spacing([40.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong("Rank");
                        ui.strong("Player");
                        ui.strong("Score");
                        ui.end_row();

                        for (rank, entry) in leaderboard.items.iter().enumerate() {
                            ui.label((rank + 1).to_string());
                            ui.label(&entry.username);
                            ui.label(egui::RichText::new(entry.score.to_string()).strong().color(colors::SCORE));
                            ui.end_row();
                        }
                    });
            });
        }

        ui.add_space(10.0);
        ui.label(egui::RichText::new("Top players based on highest scores").color(egui::Color32::GRAY));
        ui.label(egui::RichText::new("Updates automatically").small().color(egui::Color32::GRAY));
    });
}
