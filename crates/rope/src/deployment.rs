//! Deploy/undeploy state machine and its easing curves.

use glam::Vec3;

/// Animation phase of the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeploymentState {
    /// Placed fully extended without animating.
    #[default]
    Instant,
    Deploying,
    Deployed,
    Undeploying,
    Undeployed,
}

impl DeploymentState {
    /// Deploying and undeploying are the only states that change on their own.
    pub fn is_transient(self) -> bool {
        matches!(self, DeploymentState::Deploying | DeploymentState::Undeploying)
    }

    /// Progress a freshly built rope starts with in this state.
    fn initial_progress(self) -> f32 {
        match self {
            DeploymentState::Instant | DeploymentState::Deployed | DeploymentState::Undeploying => 1.0,
            DeploymentState::Deploying | DeploymentState::Undeployed => 0.0,
        }
    }
}

/// `1 - (1 - x)^k`: fast start, gentle landing.
#[inline]
pub fn ease_out(x: f32, exponent: f32) -> f32 {
    1.0 - (1.0 - x).powf(exponent)
}

/// `x^k`: gentle start, fast finish.
#[inline]
pub fn ease_in(x: f32, exponent: f32) -> f32 {
    x.powf(exponent)
}

/// Distances the last segment must be within before a transient state settles.
#[derive(Debug, Clone, Copy)]
pub struct SettleTolerance {
    pub deployed: f32,
    pub retracted: f32,
}

/// Deployment state plus its progress scalar in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct Deployment {
    state: DeploymentState,
    progress: f32,
}

impl Deployment {
    pub fn new(state: DeploymentState) -> Self {
        Self {
            state,
            progress: state.initial_progress(),
        }
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn start_deploying(&mut self) {
        self.state = DeploymentState::Deploying;
    }

    pub fn start_undeploying(&mut self) {
        self.state = DeploymentState::Undeploying;
    }

    /// Move progress by `dt` in the direction of the current transient state.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        match self.state {
            DeploymentState::Deploying => self.progress = (self.progress + dt).clamp(0.0, 1.0),
            DeploymentState::Undeploying => self.progress = (self.progress - dt).clamp(0.0, 1.0),
            _ => {}
        }
    }

    /// How far each segment sits between the retracted point (0) and its target (1).
    pub fn interpolation_factor(&self, exponent: f32) -> f32 {
        match self.state {
            DeploymentState::Instant | DeploymentState::Deployed => 1.0,
            DeploymentState::Undeployed => 0.0,
            DeploymentState::Deploying => ease_out(self.progress, exponent),
            DeploymentState::Undeploying => ease_in(self.progress, exponent),
        }
    }

    /// Settle a transient state once progress has run out and the free end has
    /// actually arrived. Returns the new state when a transition happens.
    pub fn settle(
        &mut self,
        last_segment: Vec3,
        deployed_target: Vec3,
        retracted: Vec3,
        tolerance: SettleTolerance,
    ) -> Option<DeploymentState> {
        let next = match self.state {
            DeploymentState::Deploying
                if self.progress >= 1.0
                    && last_segment.distance(deployed_target) <= tolerance.deployed =>
            {
                DeploymentState::Deployed
            }
            DeploymentState::Undeploying
                if self.progress <= 0.0 && last_segment.distance(retracted) <= tolerance.retracted =>
            {
                DeploymentState::Undeployed
            }
            _ => return None,
        };
        self.state = next;
        Some(next)
    }
}
