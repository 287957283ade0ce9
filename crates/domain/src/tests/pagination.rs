// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Pagination};

#[test]
fn test_defaults_when_absent() {
    let page = Pagination::new(None, None);
    assert_eq!(page.page(), 1);
    assert_eq!(page.limit(), DEFAULT_PAGE_LIMIT);
    assert_eq!(page.offset(), 0);
    assert_eq!(Pagination::default(), page);
}

#[test]
fn test_non_positive_values_are_normalized() {
    let page = Pagination::new(Some(0), Some(0));
    assert_eq!(page.page(), 1);
    assert_eq!(page.limit(), DEFAULT_PAGE_LIMIT);

    let page = Pagination::new(Some(-3), Some(-1));
    assert_eq!(page.page(), 1);
    assert_eq!(page.limit(), DEFAULT_PAGE_LIMIT);
}

#[test]
fn test_limit_is_capped() {
    let page = Pagination::new(Some(2), Some(500));
    assert_eq!(page.limit(), MAX_PAGE_LIMIT);
    assert_eq!(page.offset(), MAX_PAGE_LIMIT);

    assert_eq!(Pagination::new(None, Some(40)).limit(), 40);
    assert_eq!(Pagination::new(None, Some(1)).limit(), 1);
}

#[test]
fn test_offset_is_zero_based() {
    let page = Pagination::new(Some(3), Some(15));
    assert_eq!(page.offset(), 30);
}
