//! announce-assert - assertion matcher and harness adapters
//!
//! Thin layer over the capture engine for use inside test suites:
//!
//! ```
//! use announce_assert::{expect_announced, Harness, RegisterOptions};
//! use announce_dom::Document;
//!
//! let mut doc = Document::new();
//! let harness = Harness::register(&mut doc, RegisterOptions::default()).unwrap();
//!
//! let region = doc.create_element("div");
//! doc.set_attribute(region, "role", "status").unwrap();
//! doc.append_child(doc.root(), region).unwrap();
//! doc.set_text_content(region, "Saved!").unwrap();
//!
//! expect_announced(harness.engine(), "Saved!", None).unwrap();
//! harness.teardown(&mut doc);
//! ```

mod harness;
mod matcher;

pub use harness::{Harness, RegisterOptions};
pub use matcher::{
    expect_announced, expect_not_announced, to_be_announced, AnnouncedQuery, AssertionError,
    MatchResult,
};
