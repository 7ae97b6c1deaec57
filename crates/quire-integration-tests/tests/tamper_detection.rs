//! Tampering with a sequence file on disk is detected on reload.

mod common;

use common::GroupHarness;
use quire_audit::{AuditError, FIELD_DELIMITER, PeerActionSequence, SequenceStore, ViolationKind};

fn five_record_group() -> GroupHarness {
    let harness = GroupHarness::new(2);
    for i in 0..5 {
        harness.add(i % 2, format!("record {i}").as_bytes());
    }
    harness
}

fn replace_field(line: &str, field: usize, value: &str) -> String {
    let mut fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    fields[field] = value;
    let delimiter = FIELD_DELIMITER.to_string();
    fields.join(delimiter.as_str())
}

#[test]
fn edited_group_field_invalidates_only_that_record() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    lines[2] = replace_field(&lines[2], 2, "other-group");
    harness.write_lines(&lines);

    let result = harness.load().verify();
    assert!(!result.valid);
    assert_eq!(result.entries_verified, 5);
    // Record 3 chains from the untouched signature of record 2.
    assert_eq!(result.violation_indices(), vec![2]);
    assert_eq!(result.violations[0].kind, ViolationKind::InvalidDigest);
}

#[test]
fn replaced_signature_breaks_record_and_successor() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    let foreign_signature = lines[0].split(FIELD_DELIMITER).nth(3).unwrap().to_owned();
    lines[3] = replace_field(&lines[3], 3, &foreign_signature);
    harness.write_lines(&lines);

    let result = harness.load().verify();
    assert_eq!(result.violation_indices(), vec![3, 4]);
}

#[test]
fn swapped_signer_key_is_detected() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    let other_key = lines[1].split(FIELD_DELIMITER).nth(1).unwrap().to_owned();
    lines[0] = replace_field(&lines[0], 1, &other_key);
    harness.write_lines(&lines);

    let result = harness.load().verify();
    assert!(result.violation_indices().contains(&0));
}

#[test]
fn removed_record_is_detected() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    lines.remove(1);
    harness.write_lines(&lines);

    let result = harness.load().verify();
    assert!(!result.valid);
    assert_eq!(result.violation_indices(), vec![1]);
}

#[test]
fn reordered_records_are_detected() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    lines.swap(1, 2);
    harness.write_lines(&lines);

    let result = harness.load().verify();
    assert_eq!(result.violation_indices(), vec![1, 2, 3]);
}

#[test]
fn truncated_tail_still_verifies() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    lines.truncate(3);
    harness.write_lines(&lines);

    // Dropping trailing records leaves a valid prefix; length must be
    // checked out of band.
    let loaded = harness.load();
    assert_eq!(loaded.len(), 3);
    assert!(loaded.verify().valid);
}

#[test]
fn corrupted_line_fails_to_load_with_line_number() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    lines[3] = replace_field(&lines[3], 1, "not-hex");
    harness.write_lines(&lines);

    match harness.store().load() {
        Err(AuditError::MalformedLine { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected malformed line error, got {other:?}"),
    }
}

#[test]
fn tampered_ciphertext_fails_digest_and_decryption() {
    let harness = five_record_group();
    let mut lines = harness.lines();
    let other_payload = lines[4].split(FIELD_DELIMITER).next().unwrap().to_owned();
    lines[0] = replace_field(&lines[0], 0, &other_payload);
    harness.write_lines(&lines);

    let loaded: PeerActionSequence = harness.load();
    assert!(loaded.verify().violation_indices().contains(&0));
    // Payload from record 4 still decrypts: confidentiality and integrity
    // are checked separately.
    assert_eq!(
        loaded.get(0).unwrap().decrypt(&harness.group_key).unwrap(),
        b"record 4"
    );
}
