//! Display-ready layout of an itinerary.
//!
//! [`render_plan`] turns a parsed plan into a tree of [`ViewNode`]s. Fields
//! that came back as free text instead of lists are shown as a single block;
//! absent fields produce no node at all. The terminal surface draws that tree.

pub mod render;
pub mod terminal;

pub use render::{day_label, render_plan, Column, ItineraryView, ViewNode};
pub use terminal::TerminalView;
