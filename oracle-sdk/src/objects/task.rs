//! Transactions built for the counterpart chain.

use serde::{Deserialize, Serialize};

/// Which chain a built transaction must be signed and broadcast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    MainChain,
    SideChain,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::MainChain => write!(f, "MAIN_CHAIN"),
            TaskKind::SideChain => write!(f, "SIDE_CHAIN"),
        }
    }
}

/// An unsigned transaction as returned by a node's build endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data_hex: String,
}

/// A built transaction together with its routing tag and display nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTask {
    pub kind: TaskKind,
    pub nonce: String,
    pub transaction: RawTransaction,
}
