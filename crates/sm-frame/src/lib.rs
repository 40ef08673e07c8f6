//! Per-frame behaviour of the selection menu.
//!
//! Every component here is a plain state machine: it consumes normalized
//! events or messages and returns what the host should do. Nothing touches
//! the DOM, a clock, or the network.

pub mod debounce;
pub mod input;
pub mod keys;
pub mod menu;
pub mod placement;
pub mod relay;
pub mod router;

pub use input::InputEvent;
pub use menu::{Clipboard, MenuAction, MenuView, SearchDispatch, SelectionMenuController};
pub use placement::{MenuSize, Placement, Side, place_menu};
pub use relay::{FrameRelay, MessageOrigin, RelayAction, RelayError};
pub use router::{InputEventRouter, RouterConfig, RouterEffect, TimerSlot};
