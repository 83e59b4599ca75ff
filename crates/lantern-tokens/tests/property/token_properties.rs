use std::sync::OnceLock;

use lantern_tokens::TokenCounter;
use proptest::prelude::*;

fn counter() -> &'static TokenCounter {
    static COUNTER: OnceLock<TokenCounter> = OnceLock::new();
    COUNTER.get_or_init(TokenCounter::default)
}

proptest! {
    #[test]
    fn count_is_bounded(s in ".*") {
        let count = counter().count(&s);
        prop_assert!(count < usize::MAX);
    }

    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let uncached = counter().count(&s);
        let cached = counter().count_cached(&s);
        prop_assert_eq!(uncached, cached);
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = counter();
        let combined = format!("{}{}", a, b);
        let count_a = counter.count(&a);
        let count_b = counter.count(&b);
        let count_combined = counter.count(&combined);
        prop_assert!(
            count_combined <= count_a + count_b + 1,
            "subadditivity: {} <= {} + {} + 1",
            count_combined, count_a, count_b
        );
    }
}
