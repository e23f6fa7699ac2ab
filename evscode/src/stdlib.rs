//! Wrappers around the [`Host`](crate::Host) API using the builder pattern.

pub mod input_box;
pub mod message;
pub mod quick_pick;
pub mod state;
pub mod treedata;

pub use input_box::InputBox;
pub use message::Message;
pub use quick_pick::QuickPick;
pub use state::State;
pub use treedata::{CollapsibleState, TreeItem};
