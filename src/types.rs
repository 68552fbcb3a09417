/// Body axes driven by the regulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Yaw,
    Pitch,
    Roll,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Yaw, Axis::Pitch, Axis::Roll];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Commands sent to the actuators each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlOutput {
    pub thrust: f32,
    pub steer: f32,
    pub elevator: f32,
}

impl ControlOutput {
    pub const ZERO: ControlOutput = ControlOutput { thrust: 0.0, steer: 0.0, elevator: 0.0 };
}

/// Last manual command received from the operator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RemoteOverride {
    pub thrust: f32,
    pub steer: f32,
    pub elevator: f32,
}

impl RemoteOverride {
    #[inline]
    pub const fn new() -> Self {
        RemoteOverride { thrust: 0.0, steer: 0.0, elevator: 0.0 }
    }
}

impl From<RemoteOverride> for ControlOutput {
    fn from(rc: RemoteOverride) -> Self {
        ControlOutput { thrust: rc.thrust, steer: rc.steer, elevator: rc.elevator }
    }
}
