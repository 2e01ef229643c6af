//! Bump arenas and a string interner for the viewer's display cache.
//!
//! Four independently-capacity-limited pools (entries, strings,
//! truncated-string slots, intern entries), all released at once when the
//! viewer tears down. There is no per-entry free; callers degrade to a
//! fallback when a pool is exhausted instead of treating it as fatal.

mod interner;
mod pool;

pub use interner::{fnv1a, Interner};
pub use pool::{Arena, ArenaLimits, ArenaUsage};
