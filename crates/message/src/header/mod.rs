//! Header storage shared by every message.
//!
//! - [`HeaderStore`]: ordered entries, case-insensitive lookup, multi-valued
//! - [`HeaderEntry`]: a name with its ordered values
//! - [`Headers`] / [`HeaderValues`]: lazy, restartable iterators

mod iter;
mod store;

pub use iter::HeaderValues;
pub use iter::Headers;
pub use store::HeaderEntry;
pub use store::HeaderStore;
