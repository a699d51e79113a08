//! Client-side state containers.
//!
//! The session and cart stores are explicit, dependency-injected containers
//! (constructed once in [`crate::state::AppState`], cloned into handlers)
//! rather than ambient globals, so tests can build isolated instances.
//! Both persist their durable fields through the [`StateStorage`]
//! abstraction; UI-only state (the cart drawer flag, the hydration marker)
//! is always computed fresh per process start.

pub mod cart;
pub mod persist;
pub mod session;

pub use cart::{CartLine, CartStore};
pub use persist::{FileStorage, MemoryStorage, StateStorage, StorageError};
pub use session::SessionStore;
