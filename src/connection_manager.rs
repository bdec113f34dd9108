use crate::{
    db::{Board, ComponentKind, Endpoint, InstanceId, WireColor},
    surface::{LineId, Segment, Surface},
};

#[derive(serde::Deserialize, serde::Serialize, Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
    pub wire: WireColor,
}

impl Connection {
    pub fn new(from: Endpoint, to: Endpoint, wire: WireColor) -> Self {
        Self { from, to, wire }
    }

    pub fn involves_instance(&self, id: InstanceId) -> bool {
        self.from.instance() == id || self.to.instance() == id
    }

    pub fn display_short(&self, board: &Board) -> String {
        format!(
            "{} -> {} ({})",
            board.display_endpoint(self.from),
            board.display_endpoint(self.to),
            self.wire
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub connection: Connection,
    /// Line drawn for this connection, if both endpoints were laid out.
    pub line: Option<LineId>,
}

/// Append-only list of every wire made this session, in creation order.
/// Nothing is ever removed and duplicates are kept.
#[derive(Default, Debug, Clone)]
pub struct Registry {
    records: Vec<Record>,
}

impl Registry {
    /// Record a wire and draw it. Compatibility is the caller's business.
    pub fn connect<S: Surface>(
        &mut self,
        from: Endpoint,
        to: Endpoint,
        wire: WireColor,
        surface: &mut S,
    ) -> Connection {
        let connection = Connection::new(from, to, wire);
        let line = match (surface.bounds(from), surface.bounds(to)) {
            (Some(a), Some(b)) => Some(surface.draw_segment(Segment::between(a, b), wire)),
            _ => {
                log::debug!("no layout for {from} or {to}, recording {wire} wire without a line");
                None
            }
        };
        self.records.push(Record { connection, line });
        log::info!("connected {from} -> {to} with {wire} wire");
        connection
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.records.iter().map(|r| &r.connection)
    }

    pub fn last(&self) -> Option<&Connection> {
        self.records.last().map(|r| &r.connection)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lines of every wire touching component `id`, through any of its
    /// terminals.
    pub fn lines_touching(&self, id: InstanceId) -> Vec<LineId> {
        self.records
            .iter()
            .filter(|r| r.connection.involves_instance(id))
            .filter_map(|r| r.line)
            .collect()
    }

    /// Whole-registry presence scan. No graph walk: the battery and the
    /// starter motor don't have to share a wire or be reachable.
    pub fn circuit_status(&self, board: &Board) -> CircuitStatus {
        let mut status = CircuitStatus::default();
        for c in self.connections() {
            for endpoint in [c.from, c.to] {
                match board.endpoint_kind(endpoint) {
                    Some(ComponentKind::Battery) => status.battery = true,
                    Some(ComponentKind::StarterMotor) => status.starter_motor = true,
                    _ => {}
                }
            }
        }
        status
    }
}

#[derive(serde::Deserialize, serde::Serialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitStatus {
    pub battery: bool,
    pub starter_motor: bool,
}

impl CircuitStatus {
    pub fn is_complete(&self) -> bool {
        self.battery && self.starter_motor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::CanvasConfig, db::Terminal, surface::Scene};
    use egui::pos2;

    fn setup() -> (Board, Scene) {
        (Board::default(), Scene::default())
    }

    #[test]
    fn connect_appends_in_order_and_draws() {
        let (mut board, mut scene) = setup();
        let battery = board.place(ComponentKind::Battery, pos2(0.0, 0.0));
        let motor = board.place(ComponentKind::StarterMotor, pos2(200.0, 0.0));
        let regulator = board.place(ComponentKind::VoltageRegulator, pos2(0.0, 200.0));
        scene.layout(&board, &CanvasConfig::default());

        let mut registry = Registry::default();
        let a = Endpoint::Component(battery);
        let b = Endpoint::Terminal(Terminal::new(motor, 0));
        let c = Endpoint::Component(regulator);

        registry.connect(a, b, WireColor::Red, &mut scene);
        let second = registry.connect(a, c, WireColor::Black, &mut scene);

        assert_eq!(registry.len(), 2);
        assert_eq!(second, Connection::new(a, c, WireColor::Black));
        assert_eq!(registry.last(), Some(&Connection::new(a, c, WireColor::Black)));
        assert_eq!(scene.lines.len(), 2);

        let line = registry.records()[0].line.expect("line drawn");
        let drawn = scene.lines[line];
        assert_eq!(drawn.wire, WireColor::Red);
        let from_rect = scene.bounds(a).expect("battery bounds");
        assert_eq!(drawn.segment.origin, from_rect.center());
    }

    #[test]
    fn duplicates_are_kept() {
        let (mut board, mut scene) = setup();
        let battery = board.place(ComponentKind::Battery, pos2(0.0, 0.0));
        let motor = board.place(ComponentKind::StarterMotor, pos2(200.0, 0.0));
        scene.layout(&board, &CanvasConfig::default());

        let mut registry = Registry::default();
        for _ in 0..3 {
            registry.connect(
                Endpoint::Component(battery),
                Endpoint::Component(motor),
                WireColor::Red,
                &mut scene,
            );
        }
        assert_eq!(registry.len(), 3);
        assert_eq!(scene.lines.len(), 3);
    }

    #[test]
    fn missing_layout_still_records_connection() {
        let (mut board, mut scene) = setup();
        let battery = board.place(ComponentKind::Battery, pos2(0.0, 0.0));
        let motor = board.place(ComponentKind::StarterMotor, pos2(200.0, 0.0));

        let mut registry = Registry::default();
        registry.connect(
            Endpoint::Component(battery),
            Endpoint::Component(motor),
            WireColor::Green,
            &mut scene,
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.records()[0].line, None);
        assert!(scene.lines.is_empty());
    }

    #[test]
    fn lines_are_frozen_when_components_move() {
        let (mut board, mut scene) = setup();
        let config = CanvasConfig::default();
        let battery = board.place(ComponentKind::Battery, pos2(0.0, 0.0));
        let motor = board.place(ComponentKind::StarterMotor, pos2(200.0, 0.0));
        scene.layout(&board, &config);

        let mut registry = Registry::default();
        registry.connect(
            Endpoint::Component(battery),
            Endpoint::Component(motor),
            WireColor::Red,
            &mut scene,
        );
        let line = registry.records()[0].line.expect("line drawn");
        let before = scene.lines[line].segment;

        board.components[motor].pos = pos2(500.0, 500.0);
        scene.layout(&board, &config);

        assert_eq!(scene.lines[line].segment, before);
    }

    #[test]
    fn circuit_status_is_a_presence_check() {
        let (mut board, mut scene) = setup();
        let battery = board.place(ComponentKind::Battery, pos2(0.0, 0.0));
        let regulator = board.place(ComponentKind::VoltageRegulator, pos2(0.0, 100.0));
        let motor = board.place(ComponentKind::StarterMotor, pos2(300.0, 0.0));
        let solenoid = board.place(ComponentKind::Solenoid, pos2(300.0, 100.0));
        scene.layout(&board, &CanvasConfig::default());

        let mut registry = Registry::default();
        assert!(!registry.circuit_status(&board).is_complete());

        registry.connect(
            Endpoint::Component(battery),
            Endpoint::Component(regulator),
            WireColor::Red,
            &mut scene,
        );
        let status = registry.circuit_status(&board);
        assert!(status.battery && !status.starter_motor);

        // Separate, unconnected island still completes the check.
        registry.connect(
            Endpoint::Terminal(Terminal::new(solenoid, 1)),
            Endpoint::Terminal(Terminal::new(motor, 0)),
            WireColor::Black,
            &mut scene,
        );
        assert!(registry.circuit_status(&board).is_complete());
    }
}
