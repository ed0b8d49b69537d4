/// Fresh identifiers for generated locals.
///
/// Names are `<prefix><n>` with one counter shared by every prefix, so no
/// two calls return the same name. Prefixes start with `_` and end in a
/// non-digit: user fields are only reached through the receiver (`p.Name`),
/// and the trailing digit run of a name is always exactly the counter.
/// One allocator per structure; a new pass starts from zero.
#[derive(Debug, Default)]
pub struct NameAllocator {
    next: usize,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self, prefix: &str) -> String {
        debug_assert!(prefix.starts_with('_'));
        debug_assert!(!prefix.ends_with(|c: char| c.is_ascii_digit()));
        let name = format!("{prefix}{}", self.next);
        self.next += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_never_repeat_across_prefixes() {
        let mut names = NameAllocator::new();
        let prefixes = ["_elem", "_i", "_key", "_value", "_src", "_exist", "_v", "_tgt"];
        let issued: Vec<String> = (0..64).map(|i| names.fresh(prefixes[i % prefixes.len()])).collect();
        let unique: HashSet<_> = issued.iter().collect();
        assert_eq!(unique.len(), issued.len());
        assert_eq!(issued[0], "_elem0");
        assert_eq!(issued[9], "_i9");
    }

    #[test]
    fn fresh_allocator_restarts() {
        let mut a = NameAllocator::new();
        a.fresh("_elem");
        a.fresh("_elem");
        assert_eq!(NameAllocator::new().fresh("_elem"), "_elem0");
    }
}
