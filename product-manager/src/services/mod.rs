// Services layer
//
// Host-facing glue around the table transforms: the remote operations the
// table depends on, the typed events it receives and the controller that
// ties them together.

pub mod backend;
pub mod events;
pub mod manager;

pub use backend::{InMemoryBackend, ItemConfig, ProductBackend};
pub use events::{
    FilterInput, Notification, NotificationVariant, RowActionName, TableEffect, TableEvent,
};
pub use manager::{FilterOption, ProductTable};
