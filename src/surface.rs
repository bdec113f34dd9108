use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};
use slotmap::SlotMap;

use crate::{
    config::CanvasConfig,
    db::{Board, Endpoint, WireColor},
};

slotmap::new_key_type! {
    pub struct LineId;
}

/// A straight wire, stored the way it is drawn: start point, length and
/// rotation in radians.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub origin: Pos2,
    pub length: f32,
    pub angle: f32,
}

impl Segment {
    /// Center of `from` to center of `to`.
    pub fn between(from: Rect, to: Rect) -> Self {
        let a = from.center();
        let d = to.center() - a;
        Self {
            origin: a,
            length: d.length(),
            angle: d.y.atan2(d.x),
        }
    }

    pub fn end(&self) -> Pos2 {
        self.origin + Vec2::angled(self.angle) * self.length
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub segment: Segment,
    pub wire: WireColor,
    pub marked: bool,
}

/// What the wiring logic needs from whatever shows the canvas.
pub trait Surface {
    /// Bounding box of an endpoint relative to the surface origin, if it is
    /// currently laid out.
    fn bounds(&self, endpoint: Endpoint) -> Option<Rect>;

    fn draw_segment(&mut self, segment: Segment, wire: WireColor) -> LineId;

    /// Returns false when the line doesn't exist.
    fn set_marked(&mut self, line: LineId, marked: bool) -> bool;
}

/// Retained side of the canvas: endpoint rectangles from the last layout
/// and every line drawn so far. The app paints straight from this.
#[derive(Default)]
pub struct Scene {
    bounds: HashMap<Endpoint, Rect>,
    pub lines: SlotMap<LineId, Line>,
}

impl Scene {
    /// Recompute endpoint rectangles for every placed component. Lines are
    /// left alone, they keep the geometry they were drawn with.
    pub fn layout(&mut self, board: &Board, canvas_config: &CanvasConfig) {
        self.bounds.clear();
        for (id, component) in &board.components {
            let rect = component.rect(canvas_config);
            self.bounds.insert(Endpoint::Component(id), rect);

            for terminal in board.terminals_of(id) {
                let info = component.kind.graphics().terminals[terminal.index as usize];
                let terminal_rect = Rect::from_center_size(
                    rect.center() + info.offset,
                    Vec2::splat(canvas_config.terminal_size),
                );
                self.bounds.insert(Endpoint::Terminal(terminal), terminal_rect);
            }
        }
    }

    pub fn marked_lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines
            .iter()
            .filter(|(_, line)| line.marked)
            .map(|(id, _)| id)
    }
}

impl Surface for Scene {
    fn bounds(&self, endpoint: Endpoint) -> Option<Rect> {
        self.bounds.get(&endpoint).copied()
    }

    fn draw_segment(&mut self, segment: Segment, wire: WireColor) -> LineId {
        self.lines.insert(Line {
            segment,
            wire,
            marked: false,
        })
    }

    fn set_marked(&mut self, line: LineId, marked: bool) -> bool {
        let Some(line) = self.lines.get_mut(line) else {
            return false;
        };
        line.marked = marked;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ComponentKind, Terminal};
    use egui::{pos2, vec2};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn segment_runs_center_to_center() {
        let from = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
        let to = Rect::from_min_size(pos2(30.0, 40.0), vec2(10.0, 10.0));

        let s = Segment::between(from, to);

        assert_eq!(s.origin, pos2(5.0, 5.0));
        assert!(approx(s.length, 50.0), "length was {}", s.length);
        assert!(approx(s.angle, (40.0_f32).atan2(30.0)));
        let end = s.end();
        assert!(approx(end.x, 35.0) && approx(end.y, 45.0), "end was {end:?}");
    }

    #[test]
    fn segment_points_from_source_to_destination() {
        let a = Rect::from_center_size(pos2(100.0, 100.0), vec2(4.0, 4.0));
        let left = Rect::from_center_size(pos2(50.0, 100.0), vec2(4.0, 4.0));
        let below = Rect::from_center_size(pos2(100.0, 150.0), vec2(4.0, 4.0));

        assert!(approx(Segment::between(a, left).angle.abs(), PI));
        assert!(approx(Segment::between(a, below).angle, FRAC_PI_2));
        assert!(approx(Segment::between(below, a).angle, -FRAC_PI_2));
    }

    #[test]
    fn layout_covers_components_and_terminals() {
        let config = CanvasConfig::default();
        let mut board = Board::default();
        let id = board.place(ComponentKind::Battery, pos2(20.0, 30.0));

        let mut scene = Scene::default();
        scene.layout(&board, &config);

        let body = scene
            .bounds(Endpoint::Component(id))
            .expect("component laid out");
        assert_eq!(body.min, pos2(20.0, 30.0));
        assert_eq!(body.size(), config.node_size);

        let plus = scene
            .bounds(Endpoint::Terminal(Terminal::new(id, 0)))
            .expect("terminal laid out");
        let offset = ComponentKind::Battery.graphics().terminals[0].offset;
        assert_eq!(plus.center(), body.center() + offset);
        assert!(scene.bounds(Endpoint::Terminal(Terminal::new(id, 9))).is_none());
    }

    #[test]
    fn marking_a_missing_line_is_reported() {
        let mut scene = Scene::default();
        let line = scene.draw_segment(
            Segment {
                origin: Pos2::ZERO,
                length: 1.0,
                angle: 0.0,
            },
            WireColor::Red,
        );
        assert!(scene.set_marked(line, true));
        assert_eq!(scene.marked_lines().collect::<Vec<_>>(), vec![line]);

        scene.lines.remove(line);
        assert!(!scene.set_marked(line, false));
    }
}
