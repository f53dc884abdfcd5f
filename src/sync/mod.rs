//! Membership Synchronization Module
//!
//! Three stateless handlers over the Telegram capability trait:
//! - Greeter: answers direct /start contact
//! - Gatekeeper: resolves join requests to the secondary group against
//!   primary-group membership
//! - DepartureSync: removes users from the secondary group when they leave
//!   the primary one
//!
//! GroupSyncBot wires them to the update stream.

pub mod bot;
pub mod departure;
pub mod gatekeeper;
pub mod greeter;

pub use bot::{BotConfig, GroupSyncBot};
pub use departure::DepartureSync;
pub use gatekeeper::Gatekeeper;
pub use greeter::Greeter;
