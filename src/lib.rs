//! rup - Rancher service rolling upgrade library.
//!
//! The binary wires [`config::Config`] into a [`dispatch::Dispatcher`]; the
//! library surface exists so the whole upgrade flow is testable end to end.

pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod rancher;
pub mod upgrade;
