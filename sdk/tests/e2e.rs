//! End-to-end tests for the Quantower SDK.
//!
//! These walk the full wallet flow through the public API only:
//! passphrase to keys, building, fees, encryption, signing, encoding,
//! decoding on the receiving side and verification.

use std::sync::Arc;
use std::thread;

use quantower_sdk::amount::{format_units, parse_quantity, parse_units, total_order_price};
use quantower_sdk::config::{DEFAULT_DEADLINE, DEFAULT_FEE, SIGNATURE_OFFSET};
use quantower_sdk::crypto::{
    self, decrypt_note, decrypt_text, encrypt_message, encrypt_note, name_id, KeyCache,
    KeyCacheConfig, KeyPair, ObjectId,
};
use quantower_sdk::transaction::{
    Appendix, AppendixKind, Attachment, BroadcastPayload, CodecError, FeeSchedule,
    SignedTransaction, Transaction, TransactionBuilder, TransactionType,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const ALICE: &str = "alice's long and entirely fictional passphrase";
const BOB: &str = "bob's long and entirely fictional passphrase";

fn keys(passphrase: &str) -> KeyPair {
    KeyPair::from_passphrase(passphrase)
}

/// Sign, serialize, and parse back as a node would.
fn through_the_wire(signed: &SignedTransaction) -> SignedTransaction {
    SignedTransaction::from_bytes(&signed.bytes()).expect("signed bytes decode")
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn payment_lifecycle() {
    let alice = keys(ALICE);
    let bob = keys(BOB);
    let amount = parse_units("12.5").unwrap();

    let signed = TransactionBuilder::payment(bob.account_id(), amount)
        .public_message("rent, march")
        .sign(&alice)
        .unwrap();

    let tx = signed.transaction();
    assert_eq!(tx.transaction_type(), TransactionType::Payment);
    assert_eq!(tx.amount, 1_250_000_000);
    assert_eq!(tx.fee, DEFAULT_FEE);
    assert_eq!(tx.deadline, DEFAULT_DEADLINE);
    assert_eq!(tx.recipient, bob.account_id());
    assert_eq!(tx.sender_id(), alice.account_id());
    assert_eq!(format_units(tx.amount), "12.5");

    let received = through_the_wire(&signed);
    assert!(received.verify());
    assert_eq!(received.id(), signed.id());
    assert_eq!(received.full_hash(), signed.full_hash());
    match &received.transaction().appendices[..] {
        [Appendix::PublicMessage(m)] => assert_eq!(m.as_text(), Some("rent, march")),
        other => panic!("unexpected appendices: {other:?}"),
    }
}

#[test]
fn private_message_is_readable_by_both_parties_only() {
    let alice = keys(ALICE);
    let bob = keys(BOB);
    let eve = keys("eve");

    let encrypted = encrypt_message("meet at noon", &bob.public_key(), &alice).unwrap();
    let signed = TransactionBuilder::private_message(&bob.public_key(), encrypted)
        .sign(&alice)
        .unwrap();
    let received = through_the_wire(&signed);
    assert!(received.verify());

    let tx = received.transaction();
    assert_eq!(tx.recipient, bob.account_id());
    let Some(Appendix::EncryptedMessage(message)) = tx.appendices.first() else {
        panic!("missing encrypted message");
    };
    let sender = tx.sender_public_key;

    assert_eq!(decrypt_text(message, &sender, &bob).unwrap(), "meet at noon");
    assert_eq!(
        decrypt_text(message, &bob.public_key(), &alice).unwrap(),
        "meet at noon"
    );
    assert!(decrypt_text(message, &sender, &eve).is_err());
}

#[test]
fn note_to_self_is_addressed_to_sender() {
    let alice = keys(ALICE);
    let note = encrypt_note("seed phrase is in the drawer", &alice).unwrap();
    let signed = TransactionBuilder::private_message_to_self(note)
        .sign(&alice)
        .unwrap();
    let tx = through_the_wire(&signed).into_transaction();

    assert_eq!(tx.recipient, alice.account_id());
    let Some(Appendix::EncryptedMessageToSelf(note)) = tx.appendices.first() else {
        panic!("missing note");
    };
    assert_eq!(
        decrypt_note(note, &alice).unwrap(),
        "seed phrase is in the drawer"
    );
}

#[test]
fn every_attachment_survives_signing() {
    let alice = keys(ALICE);
    let builders = [
        TransactionBuilder::payment(ObjectId(1), 1),
        TransactionBuilder::arbitrary_message(ObjectId(2), "hello"),
        TransactionBuilder::asset_issuance("https://quantower.online/gold", None, 1000, 0, true),
        TransactionBuilder::asset_issuance("", Some([7; 32]), 1_000_000, 3, false),
        TransactionBuilder::asset_transfer(ObjectId(3), ObjectId(77), 500),
        TransactionBuilder::place_ask_order(ObjectId(5), ObjectId(77), 400_000, 2_000_000, 3600),
        TransactionBuilder::place_bid_order(ObjectId(5), ObjectId(77), 400_000, 2_000_000, 3600),
        TransactionBuilder::cancel_ask_order(ObjectId(88)),
        TransactionBuilder::cancel_bid_order(ObjectId(99)),
        TransactionBuilder::lease_balance(ObjectId(4), 1440),
    ];
    for builder in builders {
        let signed = builder.timestamp(1_000).sign(&alice).unwrap();
        let received = through_the_wire(&signed);
        assert!(received.verify(), "{}", signed.transaction().attachment);
        assert_eq!(received, signed);
    }
}

#[test]
fn all_appendices_in_one_transaction() {
    let alice = keys(ALICE);
    let bob = keys(BOB);
    let name_sig = alice.sign(b"alice@quantower.online");

    let signed = TransactionBuilder::payment(bob.account_id(), 1)
        .appendix(Appendix::PublicNameAssignment {
            name: "alice@quantower.online".into(),
            signature: name_sig,
        })
        .appendix(Appendix::PublicNameAnnouncement("alice@quantower.online".into()))
        .appendix(Appendix::PrivateNameAssignment {
            name: name_id("alice@quantower.online"),
            signature: name_sig,
        })
        .appendix(Appendix::private_name_announcement("alice@quantower.online"))
        .appendix(Appendix::EncryptedMessageToSelf(encrypt_note("n", &alice).unwrap()))
        .announce_public_key(alice.public_key())
        .appendix(Appendix::EncryptedMessage(
            encrypt_message("m", &bob.public_key(), &alice).unwrap(),
        ))
        .public_message("p")
        .sign(&alice)
        .unwrap();

    assert_eq!(signed.transaction().flags(), 0xff);
    let received = through_the_wire(&signed);
    assert!(received.verify());
    let kinds: Vec<AppendixKind> = received
        .transaction()
        .appendices
        .iter()
        .map(Appendix::kind)
        .collect();
    assert_eq!(kinds, AppendixKind::ALL.to_vec());
}

#[test]
fn issued_asset_is_traded_through_the_book() {
    let alice = keys(ALICE);
    let bob = keys(BOB);

    let issuance = TransactionBuilder::asset_issuance("https://quantower.online/gold", None, 1000, 2, false)
        .public_message("gold")
        .timestamp(5_000)
        .sign(&alice)
        .unwrap();
    assert_eq!(issuance.transaction().fee, 0);
    let asset = through_the_wire(&issuance).id();

    let quantity = parse_quantity("2.5", 2).unwrap();
    let price = parse_units("0.04").unwrap();
    let bid = TransactionBuilder::place_bid_order(ObjectId(0), asset, quantity, price, 3600)
        .timestamp(5_010)
        .sign(&bob)
        .unwrap();
    let received = through_the_wire(&bid);
    assert!(received.verify());
    assert_eq!(received.transaction().fee, DEFAULT_FEE);
    match &received.transaction().attachment {
        Attachment::BidOrderPlacement(order) => {
            assert_eq!(order.asset, asset);
            assert_eq!(order.quantity, 250);
            assert_eq!(total_order_price(order.quantity, order.price), Ok(10));
        }
        other => panic!("unexpected attachment {other}"),
    }
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[test]
fn custom_fee_schedule_applies_per_appendix() {
    let alice = keys(ALICE);
    let mut schedule = FeeSchedule::default();
    schedule.appendix_fees.insert(AppendixKind::PublicMessage, 10);
    schedule.base_fees.insert((0, 0), 100);

    let tx = TransactionBuilder::payment(ObjectId(1), 1)
        .public_message("a")
        .fee_schedule(schedule.clone())
        .build(alice.public_key());
    assert_eq!(tx.fee, 110);
    assert_eq!(tx.minimum_fee(&schedule), 110);

    let explicit = TransactionBuilder::payment(ObjectId(1), 1)
        .fee(5)
        .build(alice.public_key());
    assert_eq!(explicit.fee, 5);
}

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

#[test]
fn tampering_breaks_verification() {
    let alice = keys(ALICE);
    let signed = TransactionBuilder::payment(ObjectId(5), 100)
        .timestamp(42)
        .sign(&alice)
        .unwrap();
    let bytes = signed.bytes();

    for offset in [0usize, 2, 10, 42, 50, 58, 130, 150] {
        let mut tampered = bytes.clone();
        tampered[offset] ^= 0x04;
        // Structurally invalid bytes are rejected by the decoder instead.
        if let Ok(parsed) = SignedTransaction::from_bytes(&tampered) {
            assert!(!parsed.verify(), "offset {offset}");
        }
    }

    let mut bad_sig = bytes.clone();
    bad_sig[SIGNATURE_OFFSET + 3] ^= 0x01;
    let parsed = SignedTransaction::from_bytes(&bad_sig).unwrap();
    assert!(!parsed.verify());
}

#[test]
fn malformed_bytes_are_rejected() {
    let alice = keys(ALICE);
    let bytes = TransactionBuilder::payment(ObjectId(5), 100)
        .sign(&alice)
        .unwrap()
        .bytes();

    assert!(matches!(
        SignedTransaction::from_bytes(&bytes[..bytes.len() - 1]),
        Err(CodecError::Truncated { .. })
    ));
    let mut long = bytes.clone();
    long.push(0);
    assert_eq!(
        SignedTransaction::from_bytes(&long),
        Err(CodecError::TrailingBytes(1))
    );
    assert!(SignedTransaction::from_bytes(&[]).is_err());
}

#[test]
fn unsigned_bytes_reload_as_transaction() {
    let alice = keys(ALICE);
    let tx = TransactionBuilder::asset_transfer(ObjectId(3), ObjectId(77), 500)
        .timestamp(9)
        .build(alice.public_key());
    let bytes = tx.unsigned_bytes().unwrap();
    let reloaded = Transaction::from_bytes(&bytes).unwrap();
    assert_eq!(reloaded, tx);
    assert_eq!(
        reloaded.attachment,
        Attachment::AssetTransfer {
            asset: ObjectId(77),
            quantity: 500
        }
    );

    // An external signer can produce the signature over the same bytes.
    let signature = crypto::sign(&bytes, &alice);
    let signed = reloaded.with_signature(signature).unwrap();
    assert!(signed.verify());
    assert_eq!(signed.id(), crypto::transaction_id(&bytes, &signature));
}

// ---------------------------------------------------------------------------
// Broadcast & Concurrency
// ---------------------------------------------------------------------------

#[test]
fn broadcast_payload_serializes_to_json() {
    let alice = keys(ALICE);
    let signed = TransactionBuilder::payment(ObjectId(5), 100)
        .sign(&alice)
        .unwrap();
    let json = serde_json::to_string(&signed.broadcast_payload()).unwrap();
    let payload: BroadcastPayload = serde_json::from_str(&json).unwrap();
    let received = SignedTransaction::from_bytes(&payload.transaction_bytes).unwrap();
    assert_eq!(received.id(), payload.transaction_id);
    assert_eq!(*received.full_hash(), payload.full_hash);
}

#[test]
fn concurrent_signing_with_shared_cache() {
    let cache = Arc::new(KeyCache::new(KeyCacheConfig { capacity: 4 }));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let keys = cache.get_or_derive(if i % 2 == 0 { ALICE } else { BOB });
                let signed = TransactionBuilder::payment(ObjectId(i), i + 1)
                    .timestamp(1)
                    .sign(&keys)
                    .unwrap();
                assert!(signed.verify());
                signed.id()
            })
        })
        .collect();

    let ids: Vec<ObjectId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids.len(), 8);
    assert_eq!(cache.len(), 2);
}
