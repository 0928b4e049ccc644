/// Where a scene is in its enable/disable/destroy lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Built (or disabled); nothing advances
    #[default]
    Idle,
    Running,
    /// Component state released; every call is a no-op
    Destroyed,
}

impl Lifecycle {
    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    pub fn is_destroyed(self) -> bool {
        self == Lifecycle::Destroyed
    }
}
