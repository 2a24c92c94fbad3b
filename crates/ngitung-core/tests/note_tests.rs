use ngitung_core::note::{search_notes, Note};
use ngitung_core::pricing::recommendations::{generate_recommendations, RecommendationKind};
use ngitung_core::store::{InMemoryNoteStore, NoteStore};
use ngitung_core::{AnalysisConfig, NgitungError, PricingParameters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Note lifecycle through a store
// ===========================================================================

#[test]
fn test_note_edit_recompute_save_cycle() {
    let mut store = InMemoryNoteStore::new();
    let mut note = store.create("Toko Roti").unwrap();

    note.add_fixed_cost("Rent", dec!(1_000_000));
    let flour = note.add_variable_cost("Flour", dec!(2_000), dec!(1));
    note.set_parameters(PricingParameters {
        profit_margin: Some(dec!(30)),
        estimated_sales: 100,
        ..Default::default()
    });
    note.apply_result();
    let saved = store.update(note).unwrap();

    let loaded = store.get(&saved.id).unwrap();
    assert_eq!(loaded.price, "Rp 15.600");
    assert_eq!(loaded.bpp, "Rp 12.000");

    // editing an item and recomputing replaces the whole result
    let mut note = loaded;
    note.update_variable_cost(&flour, None, Some(dec!(3_000)), None)
        .unwrap();
    let r = note.apply_result();
    assert_eq!(r.bpp, dec!(13_000));
    assert_eq!(note.bpp, "Rp 13.000");
    store.update(note).unwrap();
    assert_eq!(store.get(&saved.id).unwrap().bpp, "Rp 13.000");
}

#[test]
fn test_store_round_trips_through_json() {
    let mut store = InMemoryNoteStore::new();
    let mut note = store.create("Kopi Susu").unwrap();
    note.add_fixed_cost("Sewa", dec!(750_000));
    note.apply_result();
    store.update(note).unwrap();

    let json = serde_json::to_string(&store.list().unwrap()).unwrap();
    let restored: Vec<Note> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, store.list().unwrap());
}

#[test]
fn test_unknown_note_is_not_found() {
    let store = InMemoryNoteStore::new();
    assert!(matches!(
        store.get("missing"),
        Err(NgitungError::NoteNotFound(id)) if id == "missing"
    ));
}

#[test]
fn test_search_across_store() {
    let mut store = InMemoryNoteStore::new();
    store.create("Toko Roti").unwrap();
    store.create("Roti Bakar").unwrap();
    store.create("Kopi").unwrap();
    let notes = store.list().unwrap();
    assert_eq!(search_notes(&notes, "ROTI").len(), 2);
    assert!(search_notes(&notes, "teh").is_empty());
}

#[test]
fn test_recommendations_for_stored_note() {
    let mut note = Note::new("Warung").unwrap();
    note.add_fixed_cost("Sewa", dec!(1_000_000));
    note.add_variable_cost("Beras", dec!(2_000), dec!(1));
    note.set_parameters(PricingParameters {
        profit_margin: Some(dec!(25)),
        estimated_sales: 100,
        ..Default::default()
    });
    let r = note.recompute();
    let recs = generate_recommendations(&r, &note.parameters, &AnalysisConfig::default());
    assert!(recs.iter().any(|r| r.kind == RecommendationKind::LowMargin));
    assert!(recs.iter().any(|r| r.kind == RecommendationKind::SafetyMargin));
    assert!(recs
        .iter()
        .filter_map(|r| r.units)
        .all(|u| u > Decimal::ZERO));
}
