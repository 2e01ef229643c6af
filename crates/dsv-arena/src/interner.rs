use crate::pool::Arena;
use std::cell::RefCell;

/// FNV-1a, matching `string_intern.c`'s hash function (`hash_utils.c`).
/// Public so the display cache can bucket on the same hash as the interner.
pub fn fnv1a(s: &str) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;
    let mut hash = FNV_OFFSET;
    for byte in s.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Chained-bucket string interning table, backed by `Arena`'s string and
/// intern-entry pools. Never shrinks; entries live exactly as long as the
/// arena. Bucket chains are plain `Vec`s rather than hand-linked nodes: the
/// thing spec.md cares about (stable, arena-owned pointers, one-shot
/// teardown, no per-entry free) holds either way, and a `Vec` chain avoids
/// unsafe raw-pointer bookkeeping for an otherwise single-threaded structure.
pub struct Interner<'a> {
    arena: &'a Arena,
    buckets: RefCell<Vec<Vec<&'a str>>>,
}

impl<'a> Interner<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        let bucket_count = arena.limits().intern_table_buckets.max(1);
        Self {
            arena,
            buckets: RefCell::new(vec![Vec::new(); bucket_count]),
        }
    }

    /// Probe bucket `hash % N`; return the first string-equal hit, else
    /// arena-strdup `s` and append a new chain entry. Returns `None` only
    /// when the string pool is exhausted — callers must then keep using
    /// their own copy instead of the interned one.
    pub fn intern(&self, s: &str) -> Option<&'a str> {
        let bucket_count = self.buckets.borrow().len();
        let idx = (fnv1a(s) as usize) % bucket_count;

        if let Some(existing) = self.buckets.borrow()[idx].iter().find(|&&e| e == s) {
            return Some(existing);
        }

        let Some(stored) = self.arena.strdup_into_pool(s) else {
            tracing::trace!(target: "arena.intern", len = s.len(), "string_pool_exhausted");
            return None;
        };
        // Charge one intern-entry-pool slot for the chain link; if that pool
        // is full we still return the interned string (the string pool slot
        // was already spent), matching "degrade gracefully" rather than
        // losing work already done.
        if self.arena.alloc_intern_entry(()).is_none() {
            tracing::trace!(target: "arena.intern", "intern_entry_pool_exhausted");
        }
        self.buckets.borrow_mut()[idx].push(stored);
        Some(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ArenaLimits;

    #[test]
    fn equal_content_interns_to_same_pointer() {
        let arena = Arena::new(ArenaLimits::default());
        let interner = Interner::new(&arena);
        let a = interner.intern("apple").unwrap();
        let b = interner.intern("apple").unwrap();
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn distinct_content_interns_distinctly() {
        let arena = Arena::new(ArenaLimits::default());
        let interner = Interner::new(&arena);
        let a = interner.intern("apple").unwrap();
        let b = interner.intern("banana").unwrap();
        assert_ne!(a.as_ptr(), b.as_ptr());
        assert_eq!(a, "apple");
        assert_eq!(b, "banana");
    }
}
