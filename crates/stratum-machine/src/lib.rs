//! Stratum Machine: the actor hierarchy that drives the viewer.
//!
//! ```text
//! ViewerMachine
//! ├── UiMachine
//! ├── RenderingMachine
//! │   └── LayersCoordinator
//! │       └── LayerActor (one per layer)
//! └── EmitterActor
//! ```
//!
//! External commands enter through [`ViewerMachine::send`] (or
//! [`ViewerMachine::send_json`]) and notifications leave through the
//! channel handed to [`ViewerMachine::new`].

pub mod actor;
pub mod context;
pub mod emitter;
pub mod error;
pub mod events;
pub mod layer_actor;
pub mod layers;
pub mod options;
pub mod rendering;
pub mod ui;
pub mod viewer;

pub use error::{MachineError, Result};
pub use events::{Notification, ViewerEvent};
pub use layers::LayersCoordinator;
pub use options::ViewerOptions;
pub use rendering::RenderingMachine;
pub use viewer::{ViewerMachine, ViewerState};
