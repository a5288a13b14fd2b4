//! Basic usage example for `sealed-fields`.

use sealed_fields::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("sealed-fields Basic Usage Example");
    println!("=================================\n");

    // In production the ring comes from SEALED_FIELDS_KEY via
    // KeyRing::global(); here we build one in place.
    let ring = KeyRing::new(vec![KeyRing::generate_key()])?.with_index_salt(b"demo".to_vec());
    println!("✓ Key ring created ({} key)\n", ring.len());

    // A searchable text field, e.g. `users.email`.
    let email = EncryptedField::new(FieldConfig::new(ValueKind::Text).searchable())?;

    let value = Value::Text("alice@example.com".into());
    println!("Plaintext: alice@example.com");

    // Write path: encode -> encrypt -> append blind-index suffix.
    let blob = email.store(&ring, Some(&value))?.expect("value present");
    println!("✓ Stored blob ({} bytes): {}", blob.len(), String::from_utf8_lossy(&blob));

    // Read path: strip suffix -> decrypt -> decode.
    let loaded = email.load(&ring, Some(&blob))?;
    assert_eq!(loaded, Some(value.clone()));
    println!("✓ Round-trip verification successful\n");

    // Equality query without decryption: the condition is a suffix match
    // over the stored column.
    let condition = translate(&email, &Lookup::Exact(value), &ring)?;
    println!("SQL LIKE patterns: {:?}", condition.like_patterns());
    assert!(condition.matches(Some(&blob)));
    println!("✓ Equality query matches the stored blob\n");

    // Membership query: one suffix per candidate value, OR'd together.
    let one_of = Lookup::In(vec![
        Value::Text("alice@example.com".into()),
        Value::Text("bob@example.com".into()),
    ]);
    let condition = translate(&email, &one_of, &ring)?;
    println!("Membership patterns: {} branches", condition.like_patterns().len());
    assert!(condition.matches(Some(&blob)));
    println!("✓ Membership query matches the stored blob\n");

    // Unsupported lookups fail fast, before any query is issued.
    let binary = EncryptedField::new(FieldConfig::new(ValueKind::Binary))?;
    let err = translate(&binary, &Lookup::IsNull(false), &ring).unwrap_err();
    println!("✓ Binary lookup rejected: {err}");

    println!("\n=================================");
    println!("All operations successful!");

    Ok(())
}
