use common::protocol::GameStatus;
use eframe::egui::Color32;

pub const BOARD_BACKGROUND: Color32 = Color32::from_rgb(31, 41, 55);
pub const GRID_LINE: Color32 = Color32::from_rgb(55, 65, 81);
pub const SNAKE_HEAD: Color32 = Color32::from_rgb(34, 197, 94);
pub const SNAKE_BODY: Color32 = Color32::from_rgb(74, 222, 128);
pub const FOOD: Color32 = Color32::from_rgb(239, 68, 68);
pub const SCORE: Color32 = Color32::from_rgb(74, 222, 128);
pub const PAUSED: Color32 = Color32::from_rgb(250, 204, 21);

pub fn status_color(status: GameStatus) -> Color32 {
    match status {
        GameStatus::Playing => Color32::from_rgb(34, 197, 94),
        GameStatus::Idle => Color32::from_rgb(234, 179, 8),
        GameStatus::Finished => Color32::from_rgb(239, 68, 68),
    }
}
