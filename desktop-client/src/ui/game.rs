use common::games::snake::{
    GameMode, GameOverSummary, GameSnapshot, InputAction, InputMapper, KeyInput, Point,
};
use eframe::egui;
use tokio::sync::mpsc;

use crate::state::{ClientCommand, GameCommand, GameViewState};
use super::colors;

const MAX_BOARD_SIZE: f32 = 480.0;

pub fn render_game(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    game: &GameViewState,
    command_tx: &mpsc::UnboundedSender<ClientCommand>,
) {
    let Some(snapshot) = &game.snapshot else {
        ui.centered_and_justified(|ui| {
            if game.starting {
                ui.label("Starting game...");
            } else {
                ui.label("No game running");
            }
        });
        return;
    };

    for action in ctx.input(|i| key_actions(&i.events)) {
        send(command_tx, GameCommand::Input(action));
    }

    ui.vertical_centered(|ui| {
        render_controls(ui, snapshot, command_tx);
        ui.add_space(10.0);
        render_board(ui, snapshot, game.game_over.as_ref());
        ui.add_space(10.0);

        if snapshot.is_game_over {
            if ui.button("Play Again").clicked() {
                send(command_tx, GameCommand::Reset);
            }
        } else {
            ui.label(egui::RichText::new("Use arrow keys to control the snake").color(egui::Color32::GRAY));
            ui.label(egui::RichText::new("Press Space to pause/resume the game").color(egui::Color32::GRAY));
        }
    });
}

/// Game actions for this frame's key presses, in the order they happened.
fn key_actions(events: &[egui::Event]) -> Vec<InputAction> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key { key, pressed: true, repeat: false, .. } => key_input(*key),
            _ => None,
        })
        .map(InputMapper::map)
        .collect()
}

fn key_input(key: egui::Key) -> Option<KeyInput> {
    match key {
        egui::Key::ArrowUp => Some(KeyInput::ArrowUp),
        egui::Key::ArrowDown => Some(KeyInput::ArrowDown),
        egui::Key::ArrowLeft => Some(KeyInput::ArrowLeft),
        egui::Key::ArrowRight => Some(KeyInput::ArrowRight),
        egui::Key::Space => Some(KeyInput::Space),
        _ => None,
    }
}

fn render_controls(
    ui: &mut egui::Ui,
    snapshot: &GameSnapshot,
    command_tx: &mpsc::UnboundedSender<ClientCommand>,
) {
    ui.horizontal(|ui| {
        let switch_label = match snapshot.mode {
            GameMode::WrapAround => "Switch to Walls Mode",
            GameMode::Walls => "Switch to Pass-through Mode",
        };
        if ui.button(switch_label).clicked() {
            send(command_tx, GameCommand::ToggleMode);
        }

        let pause_label = if snapshot.is_playing { "Pause" } else { "Play" };
        if ui.add_enabled(!snapshot.is_game_over, egui::Button::new(pause_label)).clicked() {
            send(command_tx, GameCommand::Input(InputAction::TogglePause));
        }

        if ui.button("Reset Game").clicked() {
            send(command_tx, GameCommand::Reset);
        }
    });

    ui.add_space(5.0);
    ui.label(
        egui::RichText::new(format!("Score: {}", snapshot.score))
            .color(colors::SCORE)
            .size(20.0),
    );
    ui.label(format!("Mode: {}", snapshot.mode));
}

fn render_board(ui: &mut egui::Ui, snapshot: &GameSnapshot, game_over: Option<&GameOverSummary>) {
    let available = ui.available_size();
    let side = available.x.min(available.y - 60.0).clamp(200.0, MAX_BOARD_SIZE);
    let cell_size = side / snapshot.grid_size as f32;

    let (rect, _) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 0.0, colors::BOARD_BACKGROUND);
    for i in 0..=snapshot.grid_size {
        let offset = i as f32 * cell_size;
        let stroke = egui::Stroke::new(1.0, colors::GRID_LINE);
        painter.line_segment([rect.left_top() + egui::vec2(offset, 0.0), rect.left_bottom() + egui::vec2(offset, 0.0)], stroke);
        painter.line_segment([rect.left_top() + egui::vec2(0.0, offset), rect.right_top() + egui::vec2(0.0, offset)], stroke);
    }

    let cell_rect = |point: Point| {
        egui::Rect::from_min_size(
            rect.left_top() + egui::vec2(point.x as f32 * cell_size, point.y as f32 * cell_size),
            egui::vec2(cell_size, cell_size),
        )
    };

    painter.circle_filled(cell_rect(snapshot.food).center(), cell_size * 0.45, colors::FOOD);

    for (index, segment) in snapshot.snake.iter().enumerate() {
        let color = if index == 0 { colors::SNAKE_HEAD } else { colors::SNAKE_BODY };
        painter.rect_filled(cell_rect(*segment).shrink(1.0), 2.0, color);
    }

    if snapshot.is_game_over {
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(200));
        painter.text(
            rect.center() - egui::vec2(0.0, 16.0),
            egui::Align2::CENTER_CENTER,
            "Game Over!",
            egui::FontId::proportional(28.0),
            colors::FOOD,
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 16.0),
            egui::Align2::CENTER_CENTER,
            format!("Final Score: {}", snapshot.score),
            egui::FontId::proportional(20.0),
            egui::Color32::WHITE,
        );
        if let Some(reason) = death_message(game_over) {
            painter.text(
                rect.center() + egui::vec2(0.0, 44.0),
                egui::Align2::CENTER_CENTER,
                reason,
                egui::FontId::proportional(16.0),
                egui::Color32::GRAY,
            );
        }
    } else if !snapshot.is_playing {
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(150));
        painter.text(
            rect.center() - egui::vec2(0.0, 14.0),
            egui::Align2::CENTER_CENTER,
            "Game Paused",
            egui::FontId::proportional(26.0),
            colors::PAUSED,
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 16.0),
            egui::Align2::CENTER_CENTER,
            "Press Play or Space to continue",
            egui::FontId::proportional(16.0),
            egui::Color32::WHITE,
        );
    }
}

fn death_message(game_over: Option<&GameOverSummary>) -> Option<String> {
    game_over
        .and_then(|summary| summary.reason)
        .map(|reason| format!("The snake {}", reason))
}

fn send(command_tx: &mpsc::UnboundedSender<ClientCommand>, command: GameCommand) {
    let _ = command_tx.send(ClientCommand::Game(command));
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::GameId;
    use common::games::snake::{DeathReason, Direction};

    fn key(key: egui::Key, pressed: bool, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_key_actions_keep_press_order() {
        let events = vec![
            key(egui::Key::ArrowDown, true, false),
            key(egui::Key::ArrowDown, false, false),
            key(egui::Key::ArrowUp, true, false),
            key(egui::Key::A, true, false),
            key(egui::Key::ArrowLeft, true, false),
        ];
        assert_eq!(
            key_actions(&events),
            vec![
                InputAction::Turn(Direction::Down),
                InputAction::Turn(Direction::Up),
                InputAction::Turn(Direction::Left),
            ]
        );
    }

    #[test]
    fn test_key_repeat_is_ignored() {
        let events = vec![key(egui::Key::Space, true, false), key(egui::Key::Space, true, true)];
        assert_eq!(key_actions(&events), vec![InputAction::TogglePause]);
    }

    #[test]
    fn test_death_message() {
        let summary = GameOverSummary {
            game_id: GameId::new(1),
            score: 30,
            reason: Some(DeathReason::WallCollision),
        };
        assert_eq!(death_message(Some(&summary)).as_deref(), Some("The snake hit a wall"));

        let stopped = GameOverSummary { reason: None, ..summary };
        assert_eq!(death_message(Some(&stopped)), None);
        assert_eq!(death_message(None), None);
    }
}
