//! Account table internals
//!
//! Leaves first: [`lock`] (locked writer), [`record`] and the per-table
//! codecs ([`passwd`], [`group`], [`shadow`]), then [`entries`] on top.

pub mod crypt;
pub mod days;
pub mod entries;
pub mod group;
pub mod lock;
pub mod options;
pub mod passwd;
pub mod record;
pub mod shadow;
pub mod validation;
