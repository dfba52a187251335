// Integration test for the bundled boundary tables

use cornering::track_metadata::{bundled_boundary_tables, load_boundary_tables, storage};
use cornering::{CorneringError, SegmentLabel, SegmentLabeler};
use tempfile::TempDir;

#[test]
fn test_bundled_tables_are_well_formed() {
    let tables = bundled_boundary_tables().unwrap();
    assert!(!tables.is_empty());

    for key in tables.keys() {
        let table = tables.get(key).unwrap();
        for interval in table.intervals() {
            assert!(
                interval.start < interval.end,
                "{}: {:?} is empty",
                key,
                interval
            );
        }
    }
}

#[test]
fn test_bahrain_labels() {
    let tables = bundled_boundary_tables().unwrap();
    let labeler = SegmentLabeler::new(&tables);
    let key = "2023 Season Round 1: Bahrain Grand Prix - Qualifying";

    assert_eq!(labeler.label(key, 100.).unwrap(), SegmentLabel::Straight);
    assert_eq!(labeler.label(key, 530.).unwrap(), SegmentLabel::Straight);
    assert_eq!(labeler.label(key, 531.).unwrap(), SegmentLabel::Low);
    assert_eq!(labeler.label(key, 900.).unwrap(), SegmentLabel::Low);
    // Turn 4 ends where the turn 5 to 7 complex starts
    assert_eq!(labeler.label(key, 2070.).unwrap(), SegmentLabel::High);
    assert_eq!(labeler.label(key, 2071.).unwrap(), SegmentLabel::Low);
}

#[test]
fn test_abu_dhabi_2023_reuses_2022_layout() {
    let tables = bundled_boundary_tables().unwrap();
    let labeler = SegmentLabeler::new(&tables);
    let key_2022 = "2022 Season Round 22: Abu Dhabi Grand Prix - Qualifying";
    let key_2023 = "2023 Season Round 22: Abu Dhabi Grand Prix - Qualifying";

    assert_eq!(labeler.table(key_2023).unwrap(), labeler.table(key_2022).unwrap());
    assert!(matches!(
        labeler.label("2023 Season Round 23: Nowhere Grand Prix - Qualifying", 10.),
        Err(CorneringError::UnknownTrackKey { .. })
    ));
}

#[test]
fn test_saved_tables_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tables").join("boundaries.json");
    let tables = bundled_boundary_tables().unwrap();

    storage::save_boundary_tables(&path, &tables).unwrap();
    assert_eq!(load_boundary_tables(&path).unwrap(), tables);
}
