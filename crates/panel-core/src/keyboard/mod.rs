//! On-screen keyboard domain types.
//!
//! This module contains only the *static* description of the keyboard: the
//! key table and the per-role rendering rules.  The interactive widget that
//! uses this table (focus tracking, caps-lock, show/hide) lives in the
//! `panel-client` application layer, because it talks to a host page.

/// The fixed key table and per-key rendering rules.
///
/// See [`layout::KEY_LAYOUT`] for the table itself.
pub mod layout;
