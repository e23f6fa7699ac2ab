//! Evscode is a Rust framework for writing editor extensions that run outside of the editor process.
//!
//! The editor itself is hidden behind the [`Host`] trait, which a frontend (e.g. a JSON bridge to a VS Code shim) implements. On top of
//! it, Evscode provides builders for common UI elements, persistent state, events, tree view items and a rich error type.

#![deny(missing_docs)]

pub mod error;
pub mod event;
pub mod host;
pub mod memento;
pub mod stdlib;

pub use error::{E, R};
pub use event::EventEmitter;
pub use host::Host;
pub use memento::{FileMemento, Memento, MemoryMemento};
pub use stdlib::*;
