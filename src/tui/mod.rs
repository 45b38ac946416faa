//! Terminal User Interface for the kline viewer.
//!
//! Shows the series of the selected symbol and interval as it grows,
//! with one live stream session behind it.

pub mod app;
pub mod components;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::{App, ChartState, Selection};
pub use event::{Action, Event, Message};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
