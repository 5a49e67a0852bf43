//! Machine status mirrored from the controller.
//!
//! The controller pushes three named events.  Each carries one flat record:
//!
//! | Event            | Record                     | Store effect        |
//! |------------------|----------------------------|---------------------|
//! | `status_update`  | [`records::AppStatusPatch`] | shallow merge       |
//! | `pin_update`     | [`records::PinStatus`]      | replace             |
//! | `top_bar_update` | [`records::TopBarStatus`]   | replace             |
//!
//! No ordering or delivery guarantees are enforced: the last event received
//! wins.

pub mod events;
pub mod pins;
pub mod records;
pub mod store;

pub use events::{EventError, PushEvent};
pub use pins::{PinName, PinSpec, PIN_CATALOGUE};
pub use records::{AppStatus, AppStatusPatch, PinStatus, TopBarStatus};
pub use store::ApplicationStore;
