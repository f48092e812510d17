pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    fn set_cancelled(&mut self, cancelled: bool);

    fn outcome(&self) -> EventOutcome {
        if self.is_cancelled() {
            EventOutcome::Cancelled
        } else {
            EventOutcome::Allowed
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum EventOutcome {
    #[default]
    Allowed,
    Cancelled,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Raised by the host when a player inserts an eye into an end portal frame.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PortalActivation {
    pub player: String,
    pub frame: BlockPos,
    cancelled: bool,
}

impl PortalActivation {
    pub fn new(player: impl Into<String>, frame: BlockPos) -> Self {
        Self {
            player: player.into(),
            frame,
            cancelled: false,
        }
    }
}

impl Cancellable for PortalActivation {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}
