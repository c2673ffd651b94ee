//! Edge cases - deduplication, off regions, attribute transitions

use announce_dom::{AdjacentPosition, Document, DomError, NodeId};
use announce_live::{AnnouncementEngine, CaptureHandle, CaptureOptions, Politeness};

fn setup() -> (Document, AnnouncementEngine, CaptureHandle) {
    let mut doc = Document::new();
    let engine = AnnouncementEngine::new(CaptureOptions::default());
    let handle = engine.install(&mut doc).unwrap();
    (doc, engine, handle)
}

fn status_container(doc: &mut Document) -> NodeId {
    let region = doc.create_element("div");
    doc.set_attribute(region, "role", "status").unwrap();
    region
}

// ============================================================================
// DEDUPLICATION
// ============================================================================

#[test]
fn test_identical_rerender_is_not_announced_twice() {
    let (mut doc, engine, _handle) = setup();
    let region = status_container(&mut doc);
    doc.append_child(doc.root(), region).unwrap();

    doc.set_text_content(region, "Hello world").unwrap();
    doc.set_text_content(region, "Hello world").unwrap();

    assert_eq!(engine.announcements().len(), 1);
}

#[test]
fn test_returning_to_previous_value_announces_again() {
    let (mut doc, engine, _handle) = setup();
    let region = status_container(&mut doc);
    doc.append_child(doc.root(), region).unwrap();

    doc.set_text_content(region, "A").unwrap();
    doc.set_text_content(region, "B").unwrap();
    doc.set_text_content(region, "A").unwrap();

    let texts: Vec<String> = engine.announcements().into_iter().map(|a| a.text).collect();
    assert_eq!(texts, vec!["A".to_string(), "B".to_string(), "A".to_string()]);
}

#[test]
fn test_transition_to_empty_destroys_cache_without_announcing() {
    let (mut doc, engine, _handle) = setup();
    let region = status_container(&mut doc);
    doc.append_child(doc.root(), region).unwrap();

    doc.set_text_content(region, "A").unwrap();
    doc.set_text_content(region, "").unwrap();
    doc.set_text_content(region, "A").unwrap();

    let texts: Vec<String> = engine.announcements().into_iter().map(|a| a.text).collect();
    assert_eq!(texts, vec!["A".to_string(), "A".to_string()]);
}

// ============================================================================
// OFF REGIONS
// ============================================================================

#[test]
fn test_explicit_off_region_never_announces() {
    let (mut doc, engine, _handle) = setup();
    let region = doc.create_element("div");
    doc.set_attribute(region, "aria-live", "off").unwrap();
    doc.append_child(doc.root(), region).unwrap();

    for text in ["First", "Second", "Third"] {
        doc.set_text_content(region, text).unwrap();
    }

    assert!(engine.announcements().is_empty());
    assert_eq!(engine.tracked_region_count(), 0);
}

#[test]
fn test_aria_live_off_wins_over_role() {
    let (mut doc, engine, _handle) = setup();
    let region = doc.create_element("div");
    doc.set_attribute(region, "role", "alert").unwrap();
    doc.set_attribute(region, "aria-live", "off").unwrap();
    doc.append_child(doc.root(), region).unwrap();

    doc.set_text_content(region, "Silenced").unwrap();

    assert!(engine.announcements().is_empty());
}

#[test]
fn test_implicit_off_roles_are_not_candidates() {
    for role in ["marquee", "timer"] {
        let (mut doc, engine, _handle) = setup();
        let element = doc.create_element("div");
        doc.set_attribute(element, "role", role).unwrap();
        doc.append_child(doc.root(), element).unwrap();

        doc.set_text_content(element, "Ticker").unwrap();

        assert!(engine.announcements().is_empty(), "role={role}");
    }
}

#[test]
fn test_node_outside_any_live_region_is_silent() {
    let (mut doc, engine, _handle) = setup();
    let div = doc.create_element("div");
    doc.append_child(doc.root(), div).unwrap();

    doc.set_text_content(div, "Plain content").unwrap();

    assert!(engine.announcements().is_empty());
}

// ============================================================================
// ATTRIBUTE TRANSITIONS
// ============================================================================

#[test]
fn test_changing_role_to_non_live_stops_tracking() {
    let (mut doc, engine, _handle) = setup();
    let region = status_container(&mut doc);
    doc.append_child(doc.root(), region).unwrap();
    doc.set_text_content(region, "First").unwrap();

    doc.set_attribute(region, "role", "banner").unwrap();
    doc.set_text_content(region, "Second").unwrap();

    assert!(engine.was_announced("First").is_some());
    assert_eq!(engine.was_announced("Second"), None);
}

#[test]
fn test_removing_role_stops_tracking() {
    let (mut doc, engine, _handle) = setup();
    let region = status_container(&mut doc);
    doc.append_child(doc.root(), region).unwrap();

    doc.remove_attribute(region, "role").unwrap();
    doc.set_text_content(region, "Hello").unwrap();

    assert_eq!(engine.was_announced("Hello"), None);
}

#[test]
fn test_upgrade_to_assertive_reevaluates_content() {
    let (mut doc, engine, _handle) = setup();
    let region = status_container(&mut doc);
    doc.append_child(doc.root(), region).unwrap();
    doc.set_text_content(region, "Original").unwrap();
    assert_eq!(engine.was_announced("Original"), Some(Politeness::Polite));

    // Unchanged text does not re-announce on upgrade
    doc.set_attribute(region, "aria-live", "assertive").unwrap();
    assert_eq!(engine.announcements().len(), 1);

    // But the next change is captured with the upgraded setting
    doc.set_text_content(region, "Updated").unwrap();
    assert_eq!(engine.was_announced("Updated"), Some(Politeness::Assertive));
}

#[test]
fn test_unrelated_attributes_are_ignored() {
    let (mut doc, engine, _handle) = setup();
    let div = doc.create_element("div");
    doc.set_text_content(div, "Hello").unwrap();
    doc.append_child(doc.root(), div).unwrap();

    doc.set_attribute(div, "class", "status").unwrap();
    doc.set_attribute(div, "data-role", "alert").unwrap();

    assert_eq!(engine.tracked_region_count(), 0);
    assert!(engine.announcements().is_empty());
}

#[test]
fn test_detached_element_attribute_changes_are_ignored() {
    let (mut doc, engine, _handle) = setup();
    let region = doc.create_element("div");
    doc.set_text_content(region, "Hello").unwrap();
    doc.set_attribute(region, "role", "alert").unwrap();

    assert_eq!(engine.tracked_region_count(), 0);
    assert!(engine.announcements().is_empty());
}

// ============================================================================
// STRUCTURAL ERRORS
// ============================================================================

#[test]
fn test_orphan_adjacent_insert_is_surfaced() {
    let (mut doc, _engine, _handle) = setup();
    let orphan = doc.create_element("div");

    let err = doc
        .insert_adjacent_text(orphan, AdjacentPosition::BeforeBegin, "Hello world")
        .unwrap_err();
    assert!(matches!(err, DomError::OrphanInsert { .. }));
    assert_eq!(err.to_string(), "unable to find parent node for Hello world");
}

// ============================================================================
// LOG POLICIES
// ============================================================================

#[test]
fn test_announcement_map_is_last_write_wins() {
    let (mut doc, engine, _handle) = setup();

    let polite = status_container(&mut doc);
    doc.append_child(doc.root(), polite).unwrap();
    let assertive = doc.create_element("div");
    doc.set_attribute(assertive, "role", "alert").unwrap();
    doc.append_child(doc.root(), assertive).unwrap();

    doc.set_text_content(polite, "Saved").unwrap();
    doc.set_text_content(assertive, "Saved").unwrap();

    let map = engine.announcement_map();
    assert_eq!(map.get("Saved"), Some(&Politeness::Assertive));
    assert_eq!(map.len(), 1);
    // The ordered log keeps both captures
    assert_eq!(engine.announcements().len(), 2);
}

#[test]
fn test_clear_between_tests_forgets_regions() {
    let (mut doc, engine, _handle) = setup();
    let region = status_container(&mut doc);
    doc.append_child(doc.root(), region).unwrap();
    doc.set_text_content(region, "Hello").unwrap();

    engine.clear();

    assert!(engine.announcements().is_empty());
    assert_eq!(engine.tracked_region_count(), 0);
    assert!(engine.incorrect_status_messages().is_empty());
}
