use egui::{
    Align, Align2, Button, Color32, CornerRadius, FontId, Id, Layout, Painter, Pos2, Rect,
    RichText, Sense, Stroke, StrokeKind, Ui, Vec2, Widget as _, pos2, vec2,
};

use crate::{
    compatibility::CompatibilityTable,
    config::CanvasConfig,
    db::{ComponentKind, Endpoint, InstanceId, WireColor},
    session::{Selected, Session},
    surface::{Scene, Surface as _},
};

pub const PANEL_BUTTON_WIDTH: f32 = 130.0;
pub const PANEL_BUTTON_HEIGHT: f32 = 34.0;

// Grid
pub const GRID_SIZE: f32 = 20.0;
pub const COLOR_GRID_LIGHT: Color32 = Color32::from_rgb(230, 230, 230);
pub const COLOR_GRID_DARK: Color32 = Color32::from_rgb(40, 40, 40);

// Hover
pub const COLOR_HOVER_OUTLINE: Color32 = Color32::GRAY;
pub const COLOR_DROP_PREVIEW: Color32 = Color32::LIGHT_BLUE;

pub const NODE_OUTLINE_THICKNESS: f32 = 2.0;
pub const NODE_CORNER_RADIUS: u8 = 6;

/// One click on the canvas, already resolved to what it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasClick {
    /// Primary click on a component or terminal.
    Select(Endpoint),
    /// Secondary click on a component or one of its terminals.
    Highlight(InstanceId),
    /// Primary click on empty canvas.
    Background,
}

impl CanvasClick {
    /// Secondary click on `endpoint`. A terminal highlights its component.
    pub fn highlight(endpoint: Endpoint) -> Self {
        Self::Highlight(endpoint.instance())
    }
}

pub struct App {
    pub canvas_config: CanvasConfig,
    pub session: Session,
    pub scene: Scene,
    pub hovered: Option<Endpoint>,
    pub show_debug: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            canvas_config: CanvasConfig::default(),
            session: Session::new(CompatibilityTable::default()),
            scene: Scene::default(),
            hovered: None,
            show_debug: false,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                let is_web = cfg!(target_arch = "wasm32");

                ui.menu_button("File", |ui| {
                    if ui.button("Clear canvas").clicked() {
                        self.clear();
                    }
                    if !is_web {
                        ui.separator();
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    }
                });
                ui.add_space(16.0);

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug");
                });
                ui.add_space(16.0);

                ui.label(format!("Wire: {}", self.session.wire));

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    egui::widgets::global_theme_preference_buttons(ui);

                    ui.add_space(16.0);
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_main(ui);
        });

        self.draw_notice(ctx);
        draw_drag_preview(ctx);
    }
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("wiring session started");
        Self::default()
    }

    /// Start over with an empty canvas. Same as reloading the page.
    pub fn clear(&mut self) {
        self.session = Session::new(self.session.table.clone());
        self.scene = Scene::default();
        self.hovered = None;
        log::info!("canvas cleared");
    }

    pub fn draw_main(&mut self, ui: &mut Ui) {
        if self.show_debug {
            egui::Window::new("Debug logs").show(ui.ctx(), |ui| {
                egui_logger::logger_ui().show(ui);
            });
        }

        ui.with_layout(Layout::left_to_right(Align::Min), |ui| {
            if self.show_debug {
                let full_h = ui.available_height();
                ui.vertical(|ui| {
                    if ui.button("Copy JSON").clicked() {
                        match self.session.snapshot_json() {
                            Ok(json) => ui.ctx().copy_text(json),
                            Err(e) => log::error!("Failed to serialize session: {e}"),
                        }
                    }
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        let mut dbg = self.session.display();
                        ui.add_sized(vec2(320.0, full_h), egui::TextEdit::multiline(&mut dbg));
                    });
                });
            }

            ui.vertical(|ui| {
                ui.heading("Components");
                self.draw_panel(ui);
            });
            ui.separator();
            ui.vertical(|ui| {
                ui.heading("Canvas");
                ui.label("drag components onto the canvas");
                ui.label("click two components or terminals to wire them");
                ui.label("right click a component to highlight its wires");
                self.draw_canvas(ui);
            });
        });
    }

    fn draw_panel(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([true, false])
            .show(ui, |ui| {
                for kind in ComponentKind::ALL {
                    draw_panel_button(ui, kind);
                }

                ui.add_space(8.0);
                ui.label("Wires:");
                for wire in WireColor::ALL {
                    let text = RichText::new(wire.name()).color(wire.color()).strong();
                    if ui
                        .selectable_label(self.session.wire == wire, text)
                        .clicked()
                    {
                        self.session.select_wire(wire);
                    }
                }

                ui.add_space(8.0);
                if Button::new("Clear")
                    .min_size(vec2(PANEL_BUTTON_WIDTH, PANEL_BUTTON_HEIGHT))
                    .ui(ui)
                    .clicked()
                {
                    self.clear();
                }
            });
    }

    fn draw_canvas(&mut self, ui: &mut Ui) {
        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let canvas_rect = resp.rect;
        let origin = canvas_rect.min.to_vec2();

        Self::draw_grid(ui, &painter, canvas_rect);

        if let Some(kind) = resp.dnd_hover_payload::<ComponentKind>()
            && let Some(mouse) = ui.ctx().pointer_interact_pos()
        {
            let rect = Rect::from_min_size(mouse, self.canvas_config.node_size);
            painter.rect_stroke(
                rect,
                CornerRadius::same(NODE_CORNER_RADIUS),
                Stroke::new(NODE_OUTLINE_THICKNESS, COLOR_DROP_PREVIEW),
                StrokeKind::Outside,
            );
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                kind.name(),
                FontId::proportional(13.0),
                COLOR_DROP_PREVIEW,
            );
        }

        if let Some(kind) = resp.dnd_release_payload::<ComponentKind>()
            && let Some(mouse) = ui.ctx().pointer_interact_pos()
        {
            self.drop_component(*kind, (mouse - canvas_rect.min).to_pos2());
        }

        self.scene.layout(&self.session.board, &self.canvas_config);

        self.draw_lines(&painter, origin);

        self.hovered = None;
        let mut clicked = None;
        let mut highlight = None;
        for id in self.session.board.ids() {
            let (primary, secondary) = self.draw_component(ui, &painter, id, origin);
            if primary {
                clicked = Some(Endpoint::Component(id));
            }
            if secondary {
                highlight = Some(Endpoint::Component(id));
            }
            for terminal in self.session.board.terminals_of(id) {
                let (primary, secondary) =
                    self.draw_terminal(ui, &painter, Endpoint::Terminal(terminal), origin);
                if primary {
                    clicked = Some(Endpoint::Terminal(terminal));
                }
                // Terminals sit on top of their component and swallow its clicks.
                if secondary {
                    highlight = Some(Endpoint::Terminal(terminal));
                }
            }
        }

        let click = if let Some(endpoint) = clicked {
            Some(CanvasClick::Select(endpoint))
        } else if let Some(endpoint) = highlight {
            Some(CanvasClick::highlight(endpoint))
        } else if resp.clicked() {
            Some(CanvasClick::Background)
        } else {
            None
        };
        if let Some(click) = click {
            self.handle_click(click);
        }
    }

    /// Place a component dropped from the palette at `pos`, relative to the
    /// canvas origin. Returns `None` when a notice is blocking the canvas.
    pub fn drop_component(&mut self, kind: ComponentKind, pos: Pos2) -> Option<InstanceId> {
        if self.session.notice().is_some() {
            log::debug!("canvas blocked by a notice, dropped {kind} ignored");
            return None;
        }
        Some(self.session.place(kind, pos))
    }

    pub fn handle_click(&mut self, click: CanvasClick) {
        if self.session.notice().is_some() {
            log::debug!("canvas blocked by a notice, {click:?} ignored");
            return;
        }

        match click {
            CanvasClick::Select(endpoint) => {
                // Rejections are already logged and queued as a notice.
                if let Ok(Selected::Connected(c)) = self.session.select(endpoint, &mut self.scene)
                {
                    log::debug!("new wire: {}", c.display_short(&self.session.board));
                }
            }
            CanvasClick::Highlight(id) => self.session.highlight_paths(id, &mut self.scene),
            CanvasClick::Background => self.session.clear_highlights(&mut self.scene),
        }
    }

    fn draw_grid(ui: &Ui, painter: &Painter, canvas_rect: Rect) {
        let grid_color = if ui.visuals().dark_mode {
            COLOR_GRID_DARK
        } else {
            COLOR_GRID_LIGHT
        };

        let mut x = canvas_rect.left();
        while x <= canvas_rect.right() {
            painter.line_segment(
                [pos2(x, canvas_rect.top()), pos2(x, canvas_rect.bottom())],
                Stroke::new(1.0, grid_color),
            );
            x += GRID_SIZE;
        }

        let mut y = canvas_rect.top();
        while y <= canvas_rect.bottom() {
            painter.line_segment(
                [pos2(canvas_rect.left(), y), pos2(canvas_rect.right(), y)],
                Stroke::new(1.0, grid_color),
            );
            y += GRID_SIZE;
        }
    }

    fn draw_lines(&self, painter: &Painter, origin: Vec2) {
        for line in self.scene.lines.values() {
            let a = line.segment.origin + origin;
            let b = line.segment.end() + origin;
            if line.marked {
                painter.line_segment(
                    [a, b],
                    Stroke::new(
                        self.canvas_config.highlight_thickness,
                        self.canvas_config.highlight_color,
                    ),
                );
            }
            painter.line_segment(
                [a, b],
                Stroke::new(self.canvas_config.wire_thickness, line.wire.color()),
            );
        }
    }

    /// Returns (primary clicked, secondary clicked).
    fn draw_component(
        &mut self,
        ui: &Ui,
        painter: &Painter,
        id: InstanceId,
        origin: Vec2,
    ) -> (bool, bool) {
        let endpoint = Endpoint::Component(id);
        let (Some(kind), Some(rect)) = (self.session.board.kind(id), self.scene.bounds(endpoint))
        else {
            return (false, false);
        };
        let rect = rect.translate(origin);

        let response = ui.interact(rect, ui.id().with(("component", id)), Sense::click());
        if response.hovered() {
            self.hovered = Some(endpoint);
        }

        let radius = CornerRadius::same(NODE_CORNER_RADIUS);
        painter.rect_filled(rect, radius, kind.graphics().fill);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            kind.name(),
            FontId::proportional(13.0),
            Color32::WHITE,
        );

        if let Some(color) = self.outline_color(endpoint) {
            painter.rect_stroke(
                rect,
                radius,
                Stroke::new(NODE_OUTLINE_THICKNESS, color),
                StrokeKind::Outside,
            );
        }

        (response.clicked(), response.secondary_clicked())
    }

    /// Returns (primary clicked, secondary clicked).
    fn draw_terminal(
        &mut self,
        ui: &Ui,
        painter: &Painter,
        endpoint: Endpoint,
        origin: Vec2,
    ) -> (bool, bool) {
        let Endpoint::Terminal(terminal) = endpoint else {
            return (false, false);
        };
        let (Some(kind), Some(rect)) = (
            self.session.board.kind(terminal.ins),
            self.scene.bounds(endpoint),
        ) else {
            return (false, false);
        };
        let rect = rect.translate(origin);

        let response = ui.interact(rect, ui.id().with(("terminal", terminal)), Sense::click());
        if response.hovered() {
            self.hovered = Some(endpoint);
        }

        let center: Pos2 = rect.center();
        let radius = self.canvas_config.terminal_size / 2.0;
        painter.circle_filled(center, radius, self.canvas_config.terminal_color);
        if let Some(color) = self.outline_color(endpoint) {
            painter.circle_stroke(center, radius + 2.0, Stroke::new(NODE_OUTLINE_THICKNESS, color));
        }
        let clicked = (response.clicked(), response.secondary_clicked());
        response.on_hover_text(terminal.label(kind));
        clicked
    }

    fn outline_color(&self, endpoint: Endpoint) -> Option<Color32> {
        if self.session.is_pending(endpoint) {
            Some(self.canvas_config.selection_color)
        } else if self.hovered == Some(endpoint) {
            Some(COLOR_HOVER_OUTLINE)
        } else {
            None
        }
    }

    fn draw_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.session.notice().copied() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice.message());
                ui.add_space(8.0);
                if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    dismissed = true;
                }
            });

        if dismissed {
            self.session.dismiss_notice();
        }
    }
}

fn draw_panel_button(ui: &mut Ui, kind: ComponentKind) {
    let text = RichText::new(kind.name()).color(Color32::WHITE);
    let resp = ui.add(
        Button::new(text)
            .fill(kind.graphics().fill)
            .sense(Sense::click_and_drag())
            .min_size(vec2(PANEL_BUTTON_WIDTH, PANEL_BUTTON_HEIGHT)),
    );
    resp.dnd_set_drag_payload(kind);
    ui.add_space(4.0);
}

/// Name of the component being dragged, following the pointer.
fn draw_drag_preview(ctx: &egui::Context) {
    let Some(kind) = egui::DragAndDrop::payload::<ComponentKind>(ctx) else {
        return;
    };
    let Some(mouse) = ctx.pointer_interact_pos() else {
        return;
    };
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Tooltip,
        Id::new("drag_preview"),
    ));
    painter.text(
        mouse + vec2(12.0, 12.0),
        Align2::LEFT_TOP,
        kind.name(),
        FontId::proportional(13.0),
        kind.graphics().fill,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::Terminal,
        session::{Notice, Selection},
    };

    fn setup() -> (App, InstanceId, InstanceId) {
        env_logger::builder().is_test(true).try_init().ok();
        let mut app = App::default();
        let battery = app
            .drop_component(ComponentKind::Battery, pos2(0.0, 0.0))
            .expect("canvas is free");
        let motor = app
            .drop_component(ComponentKind::StarterMotor, pos2(300.0, 0.0))
            .expect("canvas is free");
        app.scene.layout(&app.session.board, &app.canvas_config);
        (app, battery, motor)
    }

    #[test]
    fn drop_is_ignored_while_a_notice_is_open() {
        let (mut app, battery, motor) = setup();
        app.handle_click(CanvasClick::Select(Endpoint::Component(battery)));
        app.handle_click(CanvasClick::Select(Endpoint::Component(motor)));
        assert_eq!(app.session.notice(), Some(&Notice::CircuitComplete));

        let placed = app.drop_component(ComponentKind::Cdi, pos2(0.0, 300.0));
        assert_eq!(placed, None);
        assert_eq!(app.session.board.len(), 2);

        app.session.dismiss_notice();
        assert!(app.drop_component(ComponentKind::Cdi, pos2(0.0, 300.0)).is_some());
        assert_eq!(app.session.board.len(), 3);
    }

    #[test]
    fn clicks_are_ignored_while_a_notice_is_open() {
        let (mut app, battery, motor) = setup();
        app.handle_click(CanvasClick::Select(Endpoint::Component(battery)));
        app.handle_click(CanvasClick::Select(Endpoint::Component(motor)));

        app.handle_click(CanvasClick::Select(Endpoint::Component(battery)));
        assert_eq!(app.session.selection, Selection::Idle);
        app.handle_click(CanvasClick::Highlight(battery));
        assert!(app.session.highlights.is_empty());
    }

    #[test]
    fn highlight_from_a_terminal_marks_its_component_wires() {
        let (mut app, battery, motor) = setup();
        app.handle_click(CanvasClick::Select(Endpoint::Terminal(Terminal::new(
            battery, 0,
        ))));
        app.handle_click(CanvasClick::Select(Endpoint::Component(motor)));
        app.session.dismiss_notice();
        assert_eq!(app.session.registry.len(), 1);

        let terminal = Endpoint::Terminal(Terminal::new(motor, 0));
        assert_eq!(CanvasClick::highlight(terminal), CanvasClick::Highlight(motor));
        app.handle_click(CanvasClick::highlight(terminal));
        assert_eq!(app.scene.marked_lines().count(), 1);

        app.handle_click(CanvasClick::Background);
        assert_eq!(app.scene.marked_lines().count(), 0);
    }
}
