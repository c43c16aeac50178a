use eframe::egui;
use tokio::sync::mpsc;

use crate::state::{ClientCommand, LoginState};

#[derive(Default)]
pub struct LoginForm {
    username: String,
    focus_requested: bool,
}

impl LoginForm {
    pub fn render(
        &mut self,
        ui: &mut egui::Ui,
        login: &LoginState,
        command_tx: &mpsc::UnboundedSender<ClientCommand>,
    ) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Login to Play");
            ui.add_space(20.0);

            ui.label("Username:");
            ui.add_space(5.0);

            let response = ui.add_enabled(
                !login.pending,
                egui::TextEdit::singleline(&mut self.username)
                    .hint_text("Enter your username")
                    .desired_width(220.0),
            );

            if !self.focus_requested {
                response.request_focus();
                self.focus_requested = true;
            }

            let enter_pressed = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(15.0);

            let can_submit = !self.username.trim().is_empty() && !login.pending;
            let label = if login.pending { "Logging in..." } else { "Login" };
            let button_clicked = ui.add_enabled(can_submit, egui::Button::new(label)).clicked();

            if can_submit && (enter_pressed || button_clicked) {
                let _ = command_tx.send(ClientCommand::Login {
                    username: self.username.trim().to_string(),
                });
            }

            if let Some(error) = &login.error {
                ui.add_space(10.0);
                ui.label(egui::RichText::new(error).color(egui::Color32::RED));
            }
        });
    }
}
