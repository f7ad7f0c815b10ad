use bystander::{
    preprocess::{
        detect_emergency_type, detect_intent, extract_locations, EntityPreprocessor,
        IntentPreprocessor, PassthroughPreprocessor, Preprocessor,
    },
    types::{EmergencyType, Intent},
};

#[test]
fn test_passthrough_extracts_nothing() {
    let context = PassthroughPreprocessor.extract("fire near Central World");
    assert_eq!(context.raw_query, "fire near Central World");
    assert!(context.locations.is_empty());
    assert_eq!(context.emergency_type, None);
    assert_eq!(context.detected_intent, None);
}

#[test]
fn test_entity_preprocessor() {
    let context = EntityPreprocessor.extract("Car accident at Sukhumvit Road, please help");
    assert_eq!(context.locations, vec!["Sukhumvit Road"]);
    assert_eq!(context.emergency_type, Some(EmergencyType::TrafficAccident));
    assert_eq!(context.detected_intent, None);
}

#[test]
fn test_entity_preprocessor_on_thai_text() {
    let context = EntityPreprocessor.extract("มีคนหมดสติที่ห้าง");
    assert!(context.locations.is_empty());
    assert_eq!(context.emergency_type, Some(EmergencyType::Unknown));
}

#[test]
fn test_emergency_type_priority() {
    // Fire is checked before accident.
    assert_eq!(
        detect_emergency_type("FIRE after a traffic accident"),
        EmergencyType::Fire
    );
    assert_eq!(
        detect_emergency_type("an Accident on the highway"),
        EmergencyType::TrafficAccident
    );
    assert_eq!(detect_emergency_type("someone fainted"), EmergencyType::Unknown);
}

#[test]
fn test_intent_detection() {
    assert_eq!(
        detect_intent("What should I tell the Operator?"),
        Intent::OperatorScript
    );
    assert_eq!(
        detect_intent("nearest hospital or clinic"),
        Intent::FacilityFinding
    );
    // Operator wins over facility keywords.
    assert_eq!(
        detect_intent("operator asked which hospital"),
        Intent::OperatorScript
    );
    assert_eq!(detect_intent("he is bleeding"), Intent::Guidance);

    let context = IntentPreprocessor.extract("find a clinic");
    assert_eq!(context.detected_intent, Some(Intent::FacilityFinding));
    assert_eq!(context.emergency_type, None);
}

#[test]
fn test_extract_locations_keeps_order_and_duplicates() {
    let locations =
        extract_locations("crash at Silom Road then near Lumpini Park and at Silom Road");
    assert_eq!(locations, vec!["Silom Road", "Lumpini Park", "Silom Road"]);
}

#[test]
fn test_extract_locations_requires_two_words() {
    assert!(extract_locations("fell at home").is_empty());
    assert!(extract_locations("that cat sat down").is_empty());
}

/// `at` and `near` only count as whole words, so "that old man" names no place.
#[test]
fn test_extract_locations_ignores_at_inside_words() {
    assert!(extract_locations("that old man collapsed").is_empty());
    assert!(extract_locations("the cat sat near").is_empty());
    assert_eq!(
        extract_locations("that old man collapsed at Siam Square"),
        vec!["Siam Square"]
    );
}

#[test]
fn test_preprocessing_is_deterministic() {
    let query = "fire near Siam Paragon at Rama 1";
    assert_eq!(
        EntityPreprocessor.extract(query),
        EntityPreprocessor.extract(query)
    );
}
