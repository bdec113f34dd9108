use std::collections::VecDeque;
use std::fmt::Write as _;

use egui::Pos2;

use crate::{
    compatibility::CompatibilityTable,
    connection_manager::{CircuitStatus, Connection, Registry},
    db::{Board, ComponentKind, Endpoint, InstanceId, WireColor},
    error::WiringError,
    surface::{LineId, Surface},
};

#[derive(serde::Deserialize, serde::Serialize, Eq, PartialEq, Copy, Debug, Clone, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// First endpoint clicked, waiting for its pair.
    Pending(Endpoint),
}

/// Result of a click that didn't get rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected {
    Pending(Endpoint),
    Connected(Connection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    IncompatibleConnection {
        from: Option<ComponentKind>,
        to: Option<ComponentKind>,
    },
    CircuitComplete,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Self::IncompatibleConnection { .. } => "Incompatible components",
            Self::CircuitComplete => "Circuit complete",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::IncompatibleConnection { from, to } => {
                let name = |k: &Option<ComponentKind>| k.map(|k| k.name()).unwrap_or("?");
                format!(
                    "Incompatible components! Cannot connect {} to {}.",
                    name(from),
                    name(to)
                )
            }
            Self::CircuitComplete => {
                "Circuit complete! Battery and starter motor are both wired.".to_owned()
            }
        }
    }
}

/// All mutable state of one wiring session.
#[derive(Default)]
pub struct Session {
    pub table: CompatibilityTable,
    pub board: Board,
    pub registry: Registry,
    pub selection: Selection,
    /// Lines currently marked by the path highlighter.
    pub highlights: Vec<LineId>,
    /// Colour used for the next wire.
    pub wire: WireColor,
    notices: VecDeque<Notice>,
}

impl Session {
    pub fn new(table: CompatibilityTable) -> Self {
        for (from, to) in table.asymmetric_pairs() {
            log::debug!("compatibility is one way: {from} -> {to}");
        }
        Self {
            table,
            ..Default::default()
        }
    }

    pub fn place(&mut self, kind: ComponentKind, pos: Pos2) -> InstanceId {
        self.board.place(kind, pos)
    }

    pub fn select_wire(&mut self, wire: WireColor) {
        if self.wire != wire {
            log::debug!("wire colour {} -> {wire}", self.wire);
        }
        self.wire = wire;
    }

    pub fn is_pending(&self, endpoint: Endpoint) -> bool {
        self.selection == Selection::Pending(endpoint)
    }

    /// Two-click wiring. The first click marks an endpoint, the second one
    /// either wires the pair or rejects it. Either way the selection goes
    /// back to idle, a rejected second click doesn't become pending.
    pub fn select<S: Surface>(
        &mut self,
        endpoint: Endpoint,
        surface: &mut S,
    ) -> Result<Selected, WiringError> {
        let Selection::Pending(from) = std::mem::take(&mut self.selection) else {
            log::debug!("pending {}", self.board.display_endpoint(endpoint));
            self.selection = Selection::Pending(endpoint);
            return Ok(Selected::Pending(endpoint));
        };

        let from_kind = self.board.endpoint_kind(from);
        let to_kind = self.board.endpoint_kind(endpoint);
        let compatible = from.instance() != endpoint.instance()
            && from_kind
                .zip(to_kind)
                .is_some_and(|(a, b)| self.table.is_compatible(a, b));

        if !compatible {
            log::warn!(
                "rejected {} -> {}",
                self.board.display_endpoint(from),
                self.board.display_endpoint(endpoint)
            );
            self.notices.push_back(Notice::IncompatibleConnection {
                from: from_kind,
                to: to_kind,
            });
            return Err(WiringError::IncompatibleConnection { from, to: endpoint });
        }

        let connection = self.registry.connect(from, endpoint, self.wire, surface);
        self.validate_circuit();
        Ok(Selected::Connected(connection))
    }

    /// Mark every line touching component `id`, replacing the previous
    /// highlight.
    pub fn highlight_paths<S: Surface>(&mut self, id: InstanceId, surface: &mut S) {
        self.clear_highlights(surface);
        for line in self.registry.lines_touching(id) {
            if surface.set_marked(line, true) {
                self.highlights.push(line);
            } else {
                log::debug!("line {line:?} is gone, skipping");
            }
        }
        log::debug!("highlighted {} line(s) for [{id}]", self.highlights.len());
    }

    pub fn clear_highlights<S: Surface>(&mut self, surface: &mut S) {
        for line in self.highlights.drain(..) {
            surface.set_marked(line, false);
        }
    }

    /// Runs after every successful connection.
    pub fn validate_circuit(&mut self) -> CircuitStatus {
        let status = self.registry.circuit_status(&self.board);
        if status.is_complete() {
            log::info!("circuit complete");
            self.notices.push_back(Notice::CircuitComplete);
        }
        status
    }

    /// Oldest notice the user hasn't dismissed yet.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn display(&self) -> String {
        let mut out = String::new();

        writeln!(out, "======================================").ok();
        writeln!(out, "  COMPONENTS ({} total)", self.board.len()).ok();
        writeln!(out, "======================================").ok();
        let ids = self.board.ids();
        for (idx, id) in ids.iter().enumerate() {
            let branch = if idx == ids.len() - 1 { "`-" } else { "|-" };
            let Some(component) = self.board.get(*id) else {
                continue;
            };
            let wires = self
                .registry
                .connections()
                .filter(|c| c.involves_instance(*id))
                .count();
            writeln!(out, "{branch} {} ({wires} wire(s))", component.display(*id)).ok();
        }

        writeln!(out).ok();
        writeln!(out, "======================================").ok();
        writeln!(out, "  CONNECTIONS ({} total)", self.registry.len()).ok();
        writeln!(out, "======================================").ok();
        for c in self.registry.connections() {
            writeln!(out, "{}", c.display_short(&self.board)).ok();
        }

        writeln!(out).ok();
        let pending = match self.selection {
            Selection::Idle => "none".to_owned(),
            Selection::Pending(e) => self.board.display_endpoint(e),
        };
        writeln!(out, "pending: {pending}").ok();
        writeln!(out, "wire: {}", self.wire).ok();
        writeln!(out, "highlighted: {}", self.highlights.len()).ok();
        let status = self.registry.circuit_status(&self.board);
        writeln!(
            out,
            "battery wired: {}, starter motor wired: {}",
            status.battery, status.starter_motor
        )
        .ok();
        for (from, to) in self.table.asymmetric_pairs() {
            writeln!(out, "one way: {from} -> {to}").ok();
        }

        out
    }

    /// Pretty JSON of the board and registry, for pasting into bug reports.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        #[derive(serde::Serialize)]
        struct Snapshot<'a> {
            board: &'a Board,
            connections: Vec<&'a Connection>,
            selection: Selection,
            wire: WireColor,
            status: CircuitStatus,
        }

        serde_json::to_string_pretty(&Snapshot {
            board: &self.board,
            connections: self.registry.connections().collect(),
            selection: self.selection,
            wire: self.wire,
            status: self.registry.circuit_status(&self.board),
        })
    }
}
