//! announce-live - Live-region detection and announcement capture
//!
//! Approximates browser and assistive-technology semantics for ARIA live
//! regions using only DOM introspection and mutation interception: which
//! elements are live regions, what politeness setting governs them, and
//! which text changes an assistive technology would announce.
//!
//! Capture is synchronous: hooks run inside the mutation call, so the
//! announcement log can be read immediately afterwards.

mod engine;
mod intercept;
mod politeness;

pub use engine::{Announcement, AnnouncementEngine, CaptureHandle, CaptureOptions};
pub use intercept::{intercept_method, intercept_setter, InstrumentationSession, InterceptError};
pub use politeness::{
    closest_element, is_live_region, is_live_region_attribute, parent_live_region,
    resolve_politeness, Politeness, LIVE_REGION_ROLES,
};
