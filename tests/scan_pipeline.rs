//! Classification and interest scoring over a realistic scan sequence.

use edwatch::journal::{EventKind, JournalEvent};
use edwatch::scan::{classify, evaluate, BodyKind, BodyRegistry, ScanEvent};

fn scan_event(json: &str) -> ScanEvent {
    let event = JournalEvent::from_line(json).unwrap();
    assert_eq!(event.kind, EventKind::Scan);
    ScanEvent::from_entry(&event.entry).unwrap()
}

#[test]
fn system_scan_sequence_classifies_and_scores() {
    let mut registry = BodyRegistry::new();
    let system = "Synuefe XR-H d11-102";

    // Primary star.
    let star = scan_event(
        r#"{"timestamp":"2024-03-01T10:00:00Z","event":"Scan","ScanType":"AutoScan",
            "StarSystem":"Synuefe XR-H d11-102","BodyName":"Synuefe XR-H d11-102 A",
            "BodyID":1,"StarType":"G","Subclass":2,"StellarMass":0.95,
            "Radius":600000000.0,"Luminosity":"Va","SurfaceTemperature":5500.0}"#,
    );
    let star = classify(&star).unwrap();
    assert_eq!(star.kind(), BodyKind::Star);
    assert!(evaluate(&star, system, &registry).is_empty());
    registry.upsert(system, star);

    // Ringed gas giant orbiting the star.
    let giant = scan_event(
        r#"{"timestamp":"2024-03-01T10:01:00Z","event":"Scan","ScanType":"Detailed",
            "StarSystem":"Synuefe XR-H d11-102","BodyName":"Synuefe XR-H d11-102 A 1",
            "BodyID":7,"MassEM":300.0,"Radius":60000000.0,"SurfaceGravity":24.0,
            "SemiMajorAxis":200000000000.0,"OrbitalInclination":0.4,
            "Parents":[{"Star":1}],
            "Rings":[{"Name":"Synuefe XR-H d11-102 A 1 A Ring",
                      "RingClass":"eRingClass_MetalRich",
                      "InnerRad":90000000.0,"OuterRad":95000000.0}]}"#,
    );
    let giant = classify(&giant).unwrap();
    assert_eq!(giant.kind(), BodyKind::Planet);
    registry.upsert(system, giant);

    // Small moon skimming the giant's ring with a tilted orbit.
    let moon = scan_event(
        r#"{"timestamp":"2024-03-01T10:02:00Z","event":"Scan","ScanType":"Detailed",
            "StarSystem":"Synuefe XR-H d11-102","BodyName":"Synuefe XR-H d11-102 A 1 a",
            "BodyID":8,"MassEM":0.002,"Radius":2000000.0,"SurfaceGravity":4.0,
            "SemiMajorAxis":100000000.0,"OrbitalInclination":14.0,
            "OrbitalPeriod":20000.0,"Landable":true,
            "Parents":[{"Planet":7},{"Star":1}]}"#,
    );
    let moon = classify(&moon).unwrap();
    assert_eq!(moon.kind(), BodyKind::Moon);
    let moon = registry.upsert(system, moon).clone();

    let labels = evaluate(&moon, system, &registry);
    assert!(labels.contains(&"Fast orbit".to_string()));
    assert!(labels.contains(&"Close orbit relative to parent body size".to_string()));
    assert!(labels.contains(&"Close ring proximity".to_string()));
    assert!(labels
        .contains(&"Close ring proximity with different orbital inclination".to_string()));

    // The ring itself classifies by name, never by parent chain.
    let ring = scan_event(
        r#"{"timestamp":"2024-03-01T10:03:00Z","event":"Scan","ScanType":"AutoScan",
            "StarSystem":"Synuefe XR-H d11-102",
            "BodyName":"Synuefe XR-H d11-102 A 1 A Ring","BodyID":9,
            "Parents":[{"Planet":7},{"Star":1}]}"#,
    );
    let ring = classify(&ring).unwrap();
    assert_eq!(ring.kind(), BodyKind::Ring);
    assert!(evaluate(&ring, system, &registry).is_empty());
    registry.upsert(system, ring);

    assert_eq!(registry.len(), 4);
}

#[test]
fn rescan_refines_registry_entry_used_by_later_rules() {
    let mut registry = BodyRegistry::new();
    let system = "Test";

    // First scan of the parent omits its rings.
    let bare = scan_event(
        r#"{"event":"Scan","StarSystem":"Test","BodyName":"Test 1","BodyID":1,
            "MassEM":300.0,"Radius":60000000.0}"#,
    );
    registry.upsert(system, classify(&bare).unwrap());

    let moon = scan_event(
        r#"{"event":"Scan","StarSystem":"Test","BodyName":"Test 1 a","BodyID":2,
            "MassEM":0.002,"Radius":2000000.0,"SemiMajorAxis":100000000.0,
            "Parents":[{"Planet":1}]}"#,
    );
    let moon = classify(&moon).unwrap();
    let moon = registry.upsert(system, moon).clone();
    assert!(!evaluate(&moon, system, &registry)
        .contains(&"Close ring proximity".to_string()));

    // A detailed re-scan adds the rings; the moon now scores against them.
    let detailed = scan_event(
        r#"{"event":"Scan","StarSystem":"Test","BodyName":"Test 1","BodyID":1,
            "MassEM":300.0,
            "Rings":[{"Name":"Test 1 A Ring","RingClass":"eRingClass_Icy",
                      "InnerRad":90000000.0,"OuterRad":95000000.0}]}"#,
    );
    registry.upsert(system, classify(&detailed).unwrap());

    let stored = registry.get(system, 1).unwrap();
    // Refinement kept the radius from the first scan.
    assert_eq!(stored.radius_km(), Some(60_000.0));

    assert!(evaluate(&moon, system, &registry)
        .contains(&"Close ring proximity".to_string()));
}
