use std::time::{Duration, Instant};
use eframe::egui;
use tokio::sync::mpsc;

use crate::router::{Route, View, resolve_view};
use crate::state::{AppState, ClientCommand, SharedState};
use super::game::render_game;
use super::leaderboard::render_leaderboard;
use super::login::LoginForm;
use super::watch_players::render_watch_players;

pub struct SnakeApp {
    shared_state: SharedState,
    command_tx: mpsc::UnboundedSender<ClientCommand>,
    login_form: LoginForm,
    shutdown_timeout: Duration,
    closing: Option<Instant>,
}

impl SnakeApp {
    pub fn new(
        shared_state: SharedState,
        command_tx: mpsc::UnboundedSender<ClientCommand>,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            shared_state,
            command_tx,
            login_form: LoginForm::default(),
            shutdown_timeout,
            closing: None,
        }
    }

    fn send(&self, command: ClientCommand) {
        let _ = self.command_tx.send(command);
    }

    /// The client task reports the running game as finished before the
    /// window is allowed to close.
    fn handle_close(&mut self, ctx: &egui::Context) {
        if self.shared_state.should_close() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            match self.closing {
                Some(since) if since.elapsed() >= self.shutdown_timeout => {}
                Some(_) => ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose),
                None => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                    self.send(ClientCommand::Shutdown);
                    self.closing = Some(Instant::now());
                }
            }
        }

        if let Some(since) = self.closing {
            if since.elapsed() >= self.shutdown_timeout {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            } else {
                ctx.request_repaint_after(Duration::from_millis(50));
            }
        }
    }

    fn render_error(&self, ctx: &egui::Context) {
        let Some(error) = self.shared_state.get_error() else {
            return;
        };

        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&error);
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    self.shared_state.clear_error();
                }
            });
    }
}

fn render_header(ui: &mut egui::Ui, state: &AppState, command_tx: &mpsc::UnboundedSender<ClientCommand>) {
    ui.horizontal(|ui| {
        ui.heading("Snake Game");

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(user) = &state.user {
                if ui.button("Logout").clicked() {
                    let _ = command_tx.send(ClientCommand::Logout);
                }
                nav_button(ui, state.view, Route::WatchPlayers, "Watch Players", command_tx);
                nav_button(ui, state.view, Route::Leaderboard, "Leaderboard", command_tx);
                nav_button(ui, state.view, Route::Game, "Play", command_tx);
                ui.label(egui::RichText::new(&user.username).strong());
            } else {
                nav_button(ui, state.view, Route::WatchPlayers, "Watch Players", command_tx);
                nav_button(ui, state.view, Route::Leaderboard, "Leaderboard", command_tx);
                nav_button(ui, state.view, Route::Login, "Login", command_tx);
            }
        });
    });
}

fn nav_button(
    ui: &mut egui::Ui,
    current: View,
    route: Route,
    label: &str,
    command_tx: &mpsc::UnboundedSender<ClientCommand>,
) {
    let selected = resolve_view(route.token(), true) == current;
    if ui.selectable_label(selected, label).clicked() && !selected {
        let _ = command_tx.send(ClientCommand::Navigate(route));
    }
}

impl eframe::App for SnakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.shared_state.has_context() {
            self.shared_state.set_context(ctx.clone());
        }

        self.handle_close(ctx);
        self.render_error(ctx);

        let state = self.shared_state.get_state();

        egui::CentralPanel::default().show(ctx, |ui| {
            render_header(ui, &state, &self.command_tx);
            ui.separator();

            if self.closing.is_some() {
                ui.centered_and_justified(|ui| {
                    ui.label("Saving your game...");
                });
                return;
            }

            match state.view {
                View::Login => self.login_form.render(ui, &state.login, &self.command_tx),
                View::Game => render_game(ui, ctx, &state.game, &self.command_tx),
                View::Leaderboard => render_leaderboard(ui, &state.leaderboard),
                View::WatchPlayers => render_watch_players(ui, &state.players),
            }
        });
    }
}
