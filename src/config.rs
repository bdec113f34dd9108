use egui::{Color32, Vec2, vec2};

#[derive(Clone, serde::Deserialize, serde::Serialize)]
pub struct CanvasConfig {
    pub node_size: Vec2,
    pub terminal_size: f32,
    pub terminal_color: Color32,
    pub wire_thickness: f32,
    pub highlight_thickness: f32,
    pub highlight_color: Color32,
    pub selection_color: Color32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            node_size: vec2(90.0, 60.0),
            terminal_size: 12.0,
            terminal_color: Color32::LIGHT_GRAY,
            wire_thickness: 4.0,
            highlight_thickness: 10.0,
            highlight_color: Color32::from_rgba_unmultiplied(255, 230, 0, 140),
            selection_color: Color32::LIGHT_BLUE,
        }
    }
}
