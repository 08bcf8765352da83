// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn test_raised_from_str() {
    let thrown = Thrown::from("oh no");
    assert_eq!(thrown.message(), "oh no");
    assert_eq!(thrown.origin(), &Origin::Raised);
    assert!(!thrown.is_panic());
    assert_eq!(thrown.to_string(), "oh no");
}

#[test]
fn test_timeout_message() {
    let thrown = Thrown::timeout(2000);
    assert_eq!(
        thrown.message(),
        "Timeout of 2000ms exceeded. For async tests and hooks, ensure \"done()\" is called."
    );
    assert_eq!(thrown.origin(), &Origin::Timeout { after_ms: 2000 });
}

#[yare::parameterized(
    raised = { Thrown::new("boom"), "Error: boom" },
    panic_with_location = {
        Thrown::panic("boom", Some("fixture.rs:3:5".to_string())),
        "Error: boom (panicked at fixture.rs:3:5)"
    },
    panic_without_location = { Thrown::panic("boom", None), "Error: boom" },
)]
fn test_display_error(thrown: Thrown, expected: &str) {
    assert_eq!(thrown.display_error().to_string(), expected);
}
