//! Text input - the locally-editable side of the protocol.
//!
//! - [`backed`] - Capability interface over native editing controls
//! - [`text_state`] - Reconciliation between remote commits and local edits
//! - [`events`] - Callback sinks emitted by the view
//! - [`keys`] - Native key events into the local-edit path

pub mod backed;
pub mod events;
pub mod keys;
pub mod text_state;

pub use backed::{BackedTextInput, BufferedTextInput};
pub use events::{TextInputCallbacks, TextInputDelta};
pub use keys::apply_key;
pub use text_state::{ensure_caret_visible, InputBehavior, TextStateView};
