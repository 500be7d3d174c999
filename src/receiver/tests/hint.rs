use std::sync::Arc;

use crate::receiver::hint::*;
use crate::testing::CountingHint;

#[test]
fn test_token_releases_on_drop() {
    let hint = Arc::new(CountingHint::default());

    let token = PerformanceToken::acquire(hint.clone());
    assert_eq!(hint.acquired(), 1);
    assert_eq!(hint.released(), 0);

    drop(token);
    assert_eq!(hint.released(), 1);
}

#[test]
fn test_no_hint_is_inert() {
    let _token = PerformanceToken::acquire(Arc::new(NoPerformanceHint));
}
