#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod actuators;
pub mod events;
pub mod factory;
pub mod framework;
pub mod gateway;
pub mod processors;
pub mod store;
pub mod submitter;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
