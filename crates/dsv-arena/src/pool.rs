use bumpalo::Bump;
use std::cell::Cell;

/// Fixed capacities for the four pools, sourced from the loaded config by
/// the caller (cache size, cache string pool size, max truncated versions,
/// intern table size).
#[derive(Debug, Clone, Copy)]
pub struct ArenaLimits {
    pub entry_pool_capacity: usize,
    pub string_pool_bytes: usize,
    pub truncated_pool_capacity: usize,
    pub intern_entry_pool_capacity: usize,
    /// Bucket count for the string intern table (`intern_table_size` in the
    /// config file); distinct from `intern_entry_pool_capacity`, which bounds
    /// total chain-entry allocations across all buckets.
    pub intern_table_buckets: usize,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self {
            entry_pool_capacity: 16_384 * 2,
            string_pool_bytes: 4 * 1024 * 1024,
            truncated_pool_capacity: 16_384 * 8,
            intern_entry_pool_capacity: 4096,
            intern_table_buckets: 4096,
        }
    }
}

/// Used-counts for each pool, exposed so callers (and tests) can observe
/// degradation without re-deriving it from the bump allocators.
#[derive(Debug, Default)]
pub struct ArenaUsage {
    pub entries_used: Cell<usize>,
    pub string_bytes_used: Cell<usize>,
    pub truncated_used: Cell<usize>,
    pub intern_entries_used: Cell<usize>,
}

/// Four independent bump regions, one per spec.md §3 "Arena state".
///
/// Every allocator here takes `&self`: `Bump::alloc` only needs a shared
/// reference, which lets `Arena` live behind a plain reference rather than
/// `RefCell`-wrapped mutable state, matching how a single-threaded cooperative
/// event loop (spec.md §5) touches it once per render.
pub struct Arena {
    entries: Bump,
    strings: Bump,
    truncated: Bump,
    intern_entries: Bump,
    limits: ArenaLimits,
    usage: ArenaUsage,
}

impl Arena {
    pub fn new(limits: ArenaLimits) -> Self {
        Self {
            entries: Bump::new(),
            strings: Bump::new(),
            truncated: Bump::new(),
            intern_entries: Bump::new(),
            limits,
            usage: ArenaUsage::default(),
        }
    }

    pub fn usage(&self) -> &ArenaUsage {
        &self.usage
    }

    pub fn limits(&self) -> ArenaLimits {
        self.limits
    }

    /// Allocate one value of `T` from the entry pool. `None` when the pool's
    /// entry-count budget is exhausted; callers fall back to cache-bypass.
    pub fn alloc_entry<T>(&self, value: T) -> Option<&mut T> {
        if self.usage.entries_used.get() >= self.limits.entry_pool_capacity {
            tracing::trace!(target: "arena.pool", capacity = self.limits.entry_pool_capacity, "entry_pool_exhausted");
            return None;
        }
        self.usage.entries_used.set(self.usage.entries_used.get() + 1);
        Some(self.entries.alloc(value))
    }

    /// Allocate a fixed-size slice of `n` truncated-version slots.
    pub fn alloc_truncated_array<T: Clone + Default>(&self, n: usize) -> Option<&mut [T]> {
        if self.usage.truncated_used.get() + n > self.limits.truncated_pool_capacity {
            tracing::trace!(target: "arena.pool", requested = n, capacity = self.limits.truncated_pool_capacity, "truncated_pool_exhausted");
            return None;
        }
        self.usage.truncated_used.set(self.usage.truncated_used.get() + n);
        Some(self.truncated.alloc_slice_fill_default(n))
    }

    /// Allocate one intern-table chain entry.
    pub fn alloc_intern_entry<T>(&self, value: T) -> Option<&mut T> {
        if self.usage.intern_entries_used.get() >= self.limits.intern_entry_pool_capacity {
            return None;
        }
        self.usage
            .intern_entries_used
            .set(self.usage.intern_entries_used.get() + 1);
        Some(self.intern_entries.alloc(value))
    }

    /// Copy `s` into the string pool, bounded by `string_pool_bytes`.
    /// Degrades to `None` (caller typically falls back to its own,
    /// non-arena-owned string) rather than aborting.
    pub fn strdup_into_pool(&self, s: &str) -> Option<&str> {
        if self.usage.string_bytes_used.get() + s.len() > self.limits.string_pool_bytes {
            return None;
        }
        self.usage
            .string_bytes_used
            .set(self.usage.string_bytes_used.get() + s.len());
        Some(self.strings.alloc_str(s))
    }
}
