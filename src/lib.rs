//! Groupsync - Telegram Group Membership Bridge
//!
//! A Telegram bot that gates entry to a secondary group on membership in a
//! primary group, and removes departing primary-group members from the
//! secondary group.
//!
//! Key principles:
//! - NO persisted state (every decision is a fresh directory lookup)
//! - Stateless handlers, one per platform event
//! - Telegram is the source of truth for membership

pub mod sync;
pub mod telegram;
