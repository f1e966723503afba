//! Membership verification guarding entry to the intake flow.

use log::{debug, warn};
use rollcall_rs_protocol::{Transport, UserId};
use std::sync::Arc;

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every required channel reported an active membership.
    Passed,
    /// Channels the user is not an active member of.
    Missing(Vec<String>),
}

impl GateOutcome {
    /// Whether the user may enter the flow.
    pub fn passed(&self) -> bool {
        matches!(self, GateOutcome::Passed)
    }
}

/// Checks that a user is an active member of every required channel.
///
/// Each check is a fresh remote query; results are never cached. Any query
/// failure counts as "not a member", so the gate fails closed.
pub struct MembershipGate {
    transport: Arc<dyn Transport>,
    channels: Vec<String>,
}

impl MembershipGate {
    /// Create a gate over the given channel handles.
    pub fn new(transport: Arc<dyn Transport>, channels: Vec<String>) -> Self {
        Self {
            transport,
            channels,
        }
    }

    /// Whether any channels are configured; an empty list disables the gate.
    pub fn is_enabled(&self) -> bool {
        !self.channels.is_empty()
    }

    /// The channels the gate requires.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Check the user against every required channel.
    pub async fn check(&self, user_id: UserId) -> GateOutcome {
        let mut missing = Vec::new();
        for channel in &self.channels {
            match self.transport.membership_status(channel, user_id).await {
                Ok(status) if status.is_active() => {
                    debug!(
                        "membership confirmed (channel={}, user_id={})",
                        channel, user_id
                    );
                }
                Ok(status) => {
                    debug!(
                        "membership missing (channel={}, user_id={}, status={:?})",
                        channel, user_id, status
                    );
                    missing.push(channel.clone());
                }
                Err(err) => {
                    warn!(
                        "membership check failed, treating as not a member (channel={}, user_id={}, error={})",
                        channel, user_id, err
                    );
                    missing.push(channel.clone());
                }
            }
        }
        if missing.is_empty() {
            GateOutcome::Passed
        } else {
            GateOutcome::Missing(missing)
        }
    }
}
