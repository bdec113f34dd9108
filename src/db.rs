use std::fmt::Display;

use egui::{Color32, Pos2, Rect};
use slotmap::SlotMap;

use crate::{assets, config::CanvasConfig};

slotmap::new_key_type! {
    pub struct InstanceId;
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("{:?}", self.0))
    }
}

#[derive(
    serde::Deserialize, serde::Serialize, Copy, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Solenoid,
    IgnitionKey,
    Stator,
    Coil,
    VoltageRegulator,
    Cdi,
    Battery,
    StarterMotor,
}

impl ComponentKind {
    pub const ALL: [Self; 8] = [
        Self::Battery,
        Self::StarterMotor,
        Self::Solenoid,
        Self::IgnitionKey,
        Self::Stator,
        Self::VoltageRegulator,
        Self::Coil,
        Self::Cdi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Solenoid => "solenoid",
            Self::IgnitionKey => "ignition-key",
            Self::Stator => "stator",
            Self::Coil => "coil",
            Self::VoltageRegulator => "voltage-regulator",
            Self::Cdi => "cdi",
            Self::Battery => "battery",
            Self::StarterMotor => "starter-motor",
        }
    }

    /// Kinds this kind may be wired to in the stock table.
    pub fn default_partners(&self) -> &'static [Self] {
        match self {
            Self::Solenoid => &[Self::IgnitionKey, Self::Stator, Self::StarterMotor],
            Self::IgnitionKey => &[Self::Solenoid, Self::StarterMotor],
            Self::Stator => &[Self::VoltageRegulator, Self::Coil],
            Self::Coil => &[Self::Cdi, Self::VoltageRegulator],
            Self::VoltageRegulator => &[Self::Stator, Self::Coil, Self::Battery],
            Self::Cdi => &[Self::Coil],
            Self::Battery => &[Self::StarterMotor, Self::VoltageRegulator],
            Self::StarterMotor => &[Self::Battery, Self::Solenoid, Self::IgnitionKey],
        }
    }

    pub fn graphics(&self) -> &'static assets::ComponentGraphics {
        match self {
            Self::Solenoid => &assets::SOLENOID_GRAPHICS,
            Self::IgnitionKey => &assets::IGNITION_KEY_GRAPHICS,
            Self::Stator => &assets::STATOR_GRAPHICS,
            Self::Coil => &assets::COIL_GRAPHICS,
            Self::VoltageRegulator => &assets::VOLTAGE_REGULATOR_GRAPHICS,
            Self::Cdi => &assets::CDI_GRAPHICS,
            Self::Battery => &assets::BATTERY_GRAPHICS,
            Self::StarterMotor => &assets::STARTER_MOTOR_GRAPHICS,
        }
    }
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(serde::Deserialize, serde::Serialize, Copy, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WireColor {
    #[default]
    Red,
    Black,
    Yellow,
    Green,
    Blue,
}

impl WireColor {
    pub const ALL: [Self; 5] = [Self::Red, Self::Black, Self::Yellow, Self::Green, Self::Blue];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Self::Red => Color32::from_rgb(220, 40, 40),
            Self::Black => Color32::from_rgb(30, 30, 30),
            Self::Yellow => Color32::from_rgb(235, 200, 30),
            Self::Green => Color32::from_rgb(40, 170, 70),
            Self::Blue => Color32::from_rgb(50, 110, 220),
        }
    }
}

impl Display for WireColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(serde::Deserialize, serde::Serialize, Copy, Debug, Clone, PartialEq)]
pub struct PlacedComponent {
    /// Top-left corner relative to the canvas origin.
    pub pos: Pos2,
    pub kind: ComponentKind,
}

impl PlacedComponent {
    pub fn rect(&self, canvas_config: &CanvasConfig) -> Rect {
        Rect::from_min_size(self.pos, canvas_config.node_size)
    }

    pub fn display(&self, id: InstanceId) -> String {
        format!("{} [{id}]", self.kind)
    }
}

// A specific terminal on a placed component
#[derive(
    serde::Deserialize, serde::Serialize, Copy, Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd,
)]
pub struct Terminal {
    pub ins: InstanceId,
    pub index: u32,
}

impl Terminal {
    pub fn new(ins: InstanceId, index: u32) -> Self {
        Self { ins, index }
    }

    pub fn label(&self, kind: ComponentKind) -> &'static str {
        kind.graphics()
            .terminals
            .get(self.index as usize)
            .map(|t| t.label)
            .unwrap_or("?")
    }
}

/// Something the user can click to start or finish a wire.
#[derive(serde::Deserialize, serde::Serialize, Eq, PartialEq, Hash, Copy, Debug, Clone)]
pub enum Endpoint {
    Component(InstanceId),
    Terminal(Terminal),
}

impl Endpoint {
    /// The placed component this endpoint belongs to.
    pub fn instance(&self) -> InstanceId {
        match self {
            Self::Component(id) => *id,
            Self::Terminal(terminal) => terminal.ins,
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component(id) => write!(f, "[{id}]"),
            Self::Terminal(t) => write!(f, "[{}]#{}", t.ins, t.index),
        }
    }
}

/// Every component placed on the canvas this session.
#[derive(Default, serde::Deserialize, serde::Serialize, Debug, Clone)]
pub struct Board {
    pub components: SlotMap<InstanceId, PlacedComponent>,
}

impl Board {
    /// Drop a new component at `pos`. Positions are not checked against the
    /// canvas, anything finite is accepted.
    pub fn place(&mut self, kind: ComponentKind, pos: Pos2) -> InstanceId {
        let id = self.components.insert(PlacedComponent { pos, kind });
        log::info!("placed {kind} [{id}] at ({:.0}, {:.0})", pos.x, pos.y);
        id
    }

    pub fn get(&self, id: InstanceId) -> Option<&PlacedComponent> {
        self.components.get(id)
    }

    pub fn kind(&self, id: InstanceId) -> Option<ComponentKind> {
        self.components.get(id).map(|c| c.kind)
    }

    pub fn endpoint_kind(&self, endpoint: Endpoint) -> Option<ComponentKind> {
        self.kind(endpoint.instance())
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.components.keys().collect()
    }

    pub fn terminals_of(&self, id: InstanceId) -> Vec<Terminal> {
        let Some(kind) = self.kind(id) else {
            return Vec::new();
        };
        (0..kind.graphics().terminals.len())
            .map(|i| Terminal::new(id, i as u32))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Short display for endpoints: "battery[1v1]#0"
    pub fn display_endpoint(&self, endpoint: Endpoint) -> String {
        let name = self
            .endpoint_kind(endpoint)
            .map(|k| k.name())
            .unwrap_or("?");
        match endpoint {
            Endpoint::Component(id) => format!("{name}[{id}]"),
            Endpoint::Terminal(t) => {
                let label = self.kind(t.ins).map(|k| t.label(k)).unwrap_or("?");
                format!("{name}[{}].{label}", t.ins)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn placing_same_kind_twice_gives_two_instances() {
        let mut board = Board::default();
        let a = board.place(ComponentKind::Battery, pos2(10.0, 10.0));
        let b = board.place(ComponentKind::Battery, pos2(10.0, 10.0));

        assert_ne!(a, b);
        assert_eq!(board.len(), 2);
        assert_eq!(board.kind(a), Some(ComponentKind::Battery));
        assert_eq!(board.kind(b), Some(ComponentKind::Battery));
    }

    #[test]
    fn out_of_bounds_placement_is_accepted() {
        let mut board = Board::default();
        let id = board.place(ComponentKind::Coil, pos2(-5000.0, 99999.0));

        let placed = board.get(id).expect("component should exist");
        assert_eq!(placed.pos, pos2(-5000.0, 99999.0));
    }

    #[test]
    fn terminal_endpoint_belongs_to_its_component() {
        let mut board = Board::default();
        let id = board.place(ComponentKind::Solenoid, Pos2::ZERO);
        let terminals = board.terminals_of(id);

        assert_eq!(terminals.len(), ComponentKind::Solenoid.graphics().terminals.len());
        for t in terminals {
            assert_eq!(Endpoint::Terminal(t).instance(), id);
            assert_eq!(board.endpoint_kind(Endpoint::Terminal(t)), Some(ComponentKind::Solenoid));
        }
    }

    #[test]
    fn kind_names_match_serde_identifiers() {
        for kind in ComponentKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize kind");
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }
}
