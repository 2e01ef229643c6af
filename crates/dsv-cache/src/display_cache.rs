//! Arena-backed truncated-string cache. spec.md §4.E.

use dsv_arena::{fnv1a, Arena, Interner};
use dsv_text::{truncate_to_width, Encoding};
use std::cell::{Cell, RefCell};
use std::ops::Deref;

#[derive(Debug, Clone, Copy, Default)]
struct TruncatedSlot<'a> {
    width: usize,
    text: Option<&'a str>,
}

struct CacheEntry<'a> {
    hash: u32,
    original: &'a str,
    #[allow(dead_code)]
    display_width: usize,
    truncated_slots: &'a [Cell<TruncatedSlot<'a>>],
    truncated_count: Cell<usize>,
}

/// Either a stable arena-owned string or a transient one computed because a
/// pool was exhausted. Transient values are only valid for the caller's
/// current use; the next cache call may reuse or drop that memory.
pub enum CachedStr<'s> {
    Borrowed(&'s str),
    Transient(String),
}

impl<'s> Deref for CachedStr<'s> {
    type Target = str;
    fn deref(&self) -> &str {
        match self {
            CachedStr::Borrowed(s) => s,
            CachedStr::Transient(s) => s,
        }
    }
}

impl<'s> std::fmt::Display for CachedStr<'s> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &**self)
    }
}

pub struct DisplayCache<'a> {
    arena: &'a Arena,
    interner: Interner<'a>,
    buckets: RefCell<Vec<Vec<&'a CacheEntry<'a>>>>,
    cache_size: usize,
    max_truncated_versions: usize,
    encoding: Encoding,
}

impl<'a> DisplayCache<'a> {
    pub fn new(arena: &'a Arena, cache_size: usize, max_truncated_versions: usize, encoding: Encoding) -> Self {
        Self {
            arena,
            interner: Interner::new(arena),
            buckets: RefCell::new(vec![Vec::new(); cache_size.max(1)]),
            cache_size: cache_size.max(1),
            max_truncated_versions,
            encoding,
        }
    }

    /// `get_truncated(original, width)`, spec.md §4.E. Requires the arena
    /// (lifetime `'a`) to outlive the input string's lifetime `'s`, which
    /// holds for any string drawn from the same session's mmap or arena.
    pub fn get_truncated<'s>(&self, original: &'s str, width: usize) -> CachedStr<'s>
    where
        'a: 's,
    {
        if original.len() <= width {
            return CachedStr::Borrowed(original);
        }

        let hash = fnv1a(original);
        let idx = (hash as usize) % self.cache_size;

        if let Some(entry) = self.buckets.borrow()[idx]
            .iter()
            .find(|e| e.hash == hash && e.original == original)
        {
            let count = entry.truncated_count.get();
            for slot in &entry.truncated_slots[..count] {
                let s = slot.get();
                if s.width == width {
                    return CachedStr::Borrowed(s.text.expect("stored slot always has text"));
                }
            }
            return self.append_truncated(entry, width);
        }

        self.insert_new_entry(idx, hash, original, width)
    }

    fn compute_truncated(&self, original: &str, width: usize) -> String {
        let truncated = truncate_to_width(original.as_bytes(), self.encoding, width);
        String::from_utf8_lossy(&truncated).into_owned()
    }

    fn append_truncated<'s>(&self, entry: &'a CacheEntry<'a>, width: usize) -> CachedStr<'s>
    where
        'a: 's,
    {
        let computed = self.compute_truncated(entry.original, width);
        let count = entry.truncated_count.get();
        if count < entry.truncated_slots.len() {
            if let Some(stored) = self.interner.intern(&computed) {
                entry.truncated_slots[count].set(TruncatedSlot {
                    width,
                    text: Some(stored),
                });
                entry.truncated_count.set(count + 1);
                return CachedStr::Borrowed(stored);
            }
        }
        CachedStr::Transient(computed)
    }

    fn insert_new_entry<'s>(&self, idx: usize, hash: u32, original: &'s str, width: usize) -> CachedStr<'s>
    where
        'a: 's,
    {
        let Some(truncated_slots) = self
            .arena
            .alloc_truncated_array::<Cell<TruncatedSlot<'a>>>(self.max_truncated_versions)
        else {
            tracing::trace!(target: "cache.display", "bypass_truncated_pool_exhausted");
            return CachedStr::Borrowed(original);
        };

        let Some(interned_original) = self.interner.intern(original) else {
            tracing::trace!(target: "cache.display", "bypass_string_pool_exhausted");
            return CachedStr::Borrowed(original);
        };

        let display_width = dsv_text::display_width(original.as_bytes(), self.encoding);
        let computed = self.compute_truncated(original, width);
        let (stored_text, truncated_count) = match self.interner.intern(&computed) {
            Some(stored) => {
                truncated_slots[0].set(TruncatedSlot {
                    width,
                    text: Some(stored),
                });
                (Some(stored), 1)
            }
            None => (None, 0),
        };

        let entry = CacheEntry {
            hash,
            original: interned_original,
            display_width,
            truncated_slots,
            truncated_count: Cell::new(truncated_count),
        };
        // Entry pool exhausted: degrade to bypass (spec.md §4.E), even though
        // the string pool already absorbed `interned_original`/`computed` —
        // those bytes are simply unreachable from any bucket now.
        let Some(entry) = self.arena.alloc_entry(entry) else {
            tracing::trace!(target: "cache.display", "bypass_entry_pool_exhausted");
            return CachedStr::Borrowed(original);
        };

        self.buckets.borrow_mut()[idx].insert(0, entry);
        match stored_text {
            Some(s) => CachedStr::Borrowed(s),
            None => CachedStr::Transient(computed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsv_arena::ArenaLimits;

    fn cache(arena: &Arena) -> DisplayCache<'_> {
        DisplayCache::new(arena, 64, 4, Encoding::Ascii)
    }

    #[test]
    fn short_string_is_returned_unchanged() {
        let arena = Arena::new(ArenaLimits::default());
        let c = cache(&arena);
        let result = c.get_truncated("hi", 10);
        assert_eq!(&*result, "hi");
    }

    #[test]
    fn long_string_is_truncated() {
        let arena = Arena::new(ArenaLimits::default());
        let c = cache(&arena);
        let result = c.get_truncated("hello world", 5);
        assert_eq!(&*result, "hello");
    }

    #[test]
    fn repeated_lookup_returns_same_pointer() {
        let arena = Arena::new(ArenaLimits::default());
        let c = cache(&arena);
        let first = c.get_truncated("hello world", 5);
        let second = c.get_truncated("hello world", 5);
        match (first, second) {
            (CachedStr::Borrowed(a), CachedStr::Borrowed(b)) => assert_eq!(a.as_ptr(), b.as_ptr()),
            _ => panic!("expected both lookups to hit the arena-backed cache"),
        }
    }

    #[test]
    fn second_width_for_same_original_appends_a_new_slot() {
        let arena = Arena::new(ArenaLimits::default());
        let c = cache(&arena);
        let a = c.get_truncated("hello world", 5);
        let b = c.get_truncated("hello world", 7);
        assert_eq!(&*a, "hello");
        assert_eq!(&*b, "hello w");
    }

    #[test]
    fn exhausted_entry_pool_degrades_to_original() {
        let limits = ArenaLimits {
            entry_pool_capacity: 0,
            ..ArenaLimits::default()
        };
        let arena = Arena::new(limits);
        let c = cache(&arena);
        let result = c.get_truncated("hello world", 5);
        assert_eq!(&*result, "hello world");
    }

    proptest::proptest! {
        #[test]
        fn get_truncated_result_never_exceeds_requested_width(
            original in "[a-zA-Z0-9 ]{0,40}",
            width in 0usize..40,
        ) {
            let arena = Arena::new(ArenaLimits::default());
            let c = cache(&arena);
            let result = c.get_truncated(&original, width);
            prop_assert!(dsv_text::display_width(result.as_bytes(), Encoding::Ascii) <= width);
            prop_assert!(result.len() <= original.len());
        }
    }
}
