//! Codec round-trip and hash lookup invariants (§8: "Codec round-trip",
//! "Hash lookup").

mod common;

use common::build_test_database;
use tts_pt_br::database::Database;

#[test]
fn round_trip_preserves_text_and_samples() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = build_test_database(tmp.path());
    let db = Database::open(&db_path).unwrap();

    let mun = db.lookup("mun").unwrap().unwrap();
    assert_eq!(mun.byte_len, "mun".len());
    assert_eq!(mun.char_count, 3);
    assert!(!mun.samples.is_empty());

    // Reopening the same file and looking the unit up again yields the exact
    // same byte-for-byte sample sequence.
    let db2 = Database::open(&db_path).unwrap();
    let mun2 = db2.lookup("mun").unwrap().unwrap();
    assert_eq!(mun.samples, mun2.samples);
}

#[test]
fn every_unit_in_the_dataset_is_found_by_its_own_text() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = build_test_database(tmp.path());
    let db = Database::open(&db_path).unwrap();

    for text in ["a", "o", "l", "á", "ç", "mu", "mun", "do", "ol", "lá", "ca", "sa", "rr"] {
        let found = db.lookup(text).unwrap();
        assert!(found.is_some(), "expected {text:?} to be found");
    }
}

#[test]
fn lookup_of_unknown_text_is_none() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = build_test_database(tmp.path());
    let db = Database::open(&db_path).unwrap();

    assert!(db.lookup("xyz").unwrap().is_none());
    assert!(db.lookup("").unwrap().is_none());
}

#[test]
fn header_fields_are_consistent_with_the_dataset() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = build_test_database(tmp.path());
    let db = Database::open(&db_path).unwrap();

    assert_eq!(db.unit_count(), 13);
    assert_eq!(db.sample_rate(), 22_050);
    // Longest unit text in the fixture is 3 code points ("mun").
    assert_eq!(db.max_unit_chars(), 3);
}

#[test]
fn rejects_a_file_with_a_bad_magic_number() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = build_test_database(tmp.path());
    let mut bytes = std::fs::read(&db_path).unwrap();
    bytes[0..4].copy_from_slice(&0u32.to_le_bytes());
    let corrupt_path = tmp.path().join("corrupt.db");
    std::fs::write(&corrupt_path, &bytes).unwrap();

    assert!(Database::open(&corrupt_path).is_err());
}
