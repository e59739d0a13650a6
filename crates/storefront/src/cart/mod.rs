//! Client-side cart engine.
//!
//! Each browsing context owns one [`CartSession`]. The session keeps the
//! in-memory [`Cart`](vitrine_core::Cart), writes it to the durable slot after
//! every mutation and projects it onto the context's [`Page`]. Contexts that
//! share a storage area converge through storage change notifications.
//!
//! # Modules
//!
//! - [`storage`] - Key-value storage areas with cross-context notifications
//! - [`store`] - The durable cart slot
//! - [`page`] - Retained page surfaces that show cart data
//! - [`projector`] - Derives page state from the cart
//! - [`session`] - Mutate, persist, project
//! - [`sync`] - Cross-tab consistency listener

pub mod page;
pub mod projector;
pub mod session;
pub mod storage;
pub mod store;
pub mod sync;

pub use page::{Badge, CartPanel, CartRow, ControlState, Page, ProductSurface};
pub use projector::Projector;
pub use session::CartSession;
pub use storage::{
    ContextId, FileStorage, MemoryStorage, Notification, StorageArea, StorageError, StorageEvent,
    StorageSubscription,
};
pub use store::{CART_SLOT, CartStore};
pub use sync::CrossTabListener;
