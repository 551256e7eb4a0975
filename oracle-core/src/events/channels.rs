//! Channel handles between the event loops and the transaction worker.

use crate::actuators::Actuator;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
///
/// Large enough to absorb a burst of dispatches while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for actuators awaiting transaction construction.
pub type ActuatorSender = mpsc::Sender<Box<dyn Actuator>>;
/// Receiver handle for actuators awaiting transaction construction.
pub type ActuatorReceiver = mpsc::Receiver<Box<dyn Actuator>>;

/// Create a new actuator channel.
///
/// Both event loops clone the sender; the transaction worker owns the receiver.
pub fn actuator_channel() -> (ActuatorSender, ActuatorReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
