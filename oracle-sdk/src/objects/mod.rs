pub mod contract_event;
pub mod envelope;
pub mod events;
pub mod status;
pub mod task;

pub use contract_event::ContractEventMessage;
pub use envelope::{EnvelopeError, EventEnvelope};
pub use events::{
    DepositTrc10Event, DepositTrc20Event, DepositTrc721Event, DepositTrxEvent, EventRecord,
    EventType, WithdrawTrc10Event, WithdrawTrc20Event, WithdrawTrc721Event, WithdrawTrxEvent,
};
pub use status::{NonceStatus, NonceStatusRecord};
pub use task::{RawTransaction, TaskKind, TransactionTask};
