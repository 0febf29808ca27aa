//! Cache key generation for memoized calls

use xxhash_rust::xxh3::Xxh3;

/// Build a stable key for caching the result of `function` called with `args`
///
/// Arguments are hashed with a separator so `["ab", "c"]` and `["a", "bc"]`
/// produce different keys.
pub fn cache_key(prefix: &str, function: &str, args: &[&str]) -> String {
    let mut hasher = Xxh3::new();
    for arg in args {
        hasher.update(arg.as_bytes());
        hasher.update(&[0x1f]);
    }
    format!("{prefix}:{function}:{:016x}", hasher.digest())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_arguments_same_key() {
        let a = cache_key("func_cache", "list_workflows", &["history-1", "true"]);
        let b = cache_key("func_cache", "list_workflows", &["history-1", "true"]);
        assert_eq!(a, b);
        assert!(a.starts_with("func_cache:list_workflows:"));
    }

    #[test]
    fn test_argument_boundaries_matter() {
        assert_ne!(
            cache_key("p", "f", &["ab", "c"]),
            cache_key("p", "f", &["a", "bc"])
        );
        assert_ne!(cache_key("p", "f", &[]), cache_key("p", "g", &[]));
    }
}
