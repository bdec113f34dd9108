use egui::{Color32, Vec2};

pub struct ComponentGraphics {
    pub fill: Color32,
    pub terminals: &'static [TerminalGraphics],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalGraphics {
    pub label: &'static str,
    /// Offset from the component's center.
    pub offset: Vec2,
}

// TODO: offsets assume the default node size, derive them from CanvasConfig::node_size
pub static BATTERY_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(70, 70, 80),
    terminals: &[
        TerminalGraphics {
            label: "+",
            offset: Vec2::new(45.0, -12.0),
        },
        TerminalGraphics {
            label: "-",
            offset: Vec2::new(45.0, 12.0),
        },
    ],
};

pub static STARTER_MOTOR_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(120, 80, 40),
    terminals: &[
        TerminalGraphics {
            label: "post",
            offset: Vec2::new(-45.0, 0.0),
        },
        TerminalGraphics {
            label: "gnd",
            offset: Vec2::new(0.0, 30.0),
        },
    ],
};

pub static SOLENOID_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(90, 60, 120),
    terminals: &[
        TerminalGraphics {
            label: "bat",
            offset: Vec2::new(-45.0, -12.0),
        },
        TerminalGraphics {
            label: "mot",
            offset: Vec2::new(45.0, -12.0),
        },
        TerminalGraphics {
            label: "trig",
            offset: Vec2::new(0.0, 30.0),
        },
    ],
};

pub static IGNITION_KEY_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(150, 130, 40),
    terminals: &[
        TerminalGraphics {
            label: "in",
            offset: Vec2::new(-45.0, 0.0),
        },
        TerminalGraphics {
            label: "out",
            offset: Vec2::new(45.0, 0.0),
        },
    ],
};

pub static STATOR_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(40, 110, 110),
    terminals: &[
        TerminalGraphics {
            label: "ac1",
            offset: Vec2::new(45.0, -12.0),
        },
        TerminalGraphics {
            label: "ac2",
            offset: Vec2::new(45.0, 12.0),
        },
    ],
};

pub static VOLTAGE_REGULATOR_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(40, 90, 60),
    terminals: &[
        TerminalGraphics {
            label: "ac",
            offset: Vec2::new(-45.0, 0.0),
        },
        TerminalGraphics {
            label: "dc",
            offset: Vec2::new(45.0, 0.0),
        },
    ],
};

pub static COIL_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(160, 70, 50),
    terminals: &[
        TerminalGraphics {
            label: "pri",
            offset: Vec2::new(-45.0, 0.0),
        },
        TerminalGraphics {
            label: "sec",
            offset: Vec2::new(45.0, 0.0),
        },
    ],
};

pub static CDI_GRAPHICS: ComponentGraphics = ComponentGraphics {
    fill: Color32::from_rgb(60, 60, 140),
    terminals: &[
        TerminalGraphics {
            label: "trig",
            offset: Vec2::new(-45.0, 0.0),
        },
        TerminalGraphics {
            label: "out",
            offset: Vec2::new(45.0, 0.0),
        },
    ],
};
