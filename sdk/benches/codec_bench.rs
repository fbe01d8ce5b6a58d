// Transaction codec benchmarks: encoding, strict decoding and full-hash
// derivation for a plain payment and one carrying every appendix.

use criterion::{criterion_group, criterion_main, Criterion};

use quantower_sdk::crypto::{encrypt_message, encrypt_note, full_hash, KeyPair, ObjectId};
use quantower_sdk::transaction::{
    decode, encode, Appendix, SignedTransaction, Transaction, TransactionBuilder,
};

fn payment(keys: &KeyPair) -> Transaction {
    TransactionBuilder::payment(ObjectId(7), 100)
        .timestamp(1)
        .build(keys.public_key())
}

fn loaded(keys: &KeyPair) -> Transaction {
    let other = KeyPair::from_passphrase("codec bench recipient");
    TransactionBuilder::payment(other.account_id(), 100)
        .timestamp(1)
        .public_message("invoice 2291")
        .appendix(Appendix::EncryptedMessage(
            encrypt_message("private memo", &other.public_key(), keys).unwrap(),
        ))
        .announce_public_key(keys.public_key())
        .appendix(Appendix::EncryptedMessageToSelf(encrypt_note("note", keys).unwrap()))
        .appendix(Appendix::private_name_announcement("bench@quantower.online"))
        .appendix(Appendix::PublicNameAnnouncement("bench@quantower.online".into()))
        .build(keys.public_key())
}

fn bench_codec(c: &mut Criterion) {
    let keys = KeyPair::from_passphrase("codec bench sender");

    for (name, tx) in [("payment", payment(&keys)), ("all_appendices", loaded(&keys))] {
        let signed = tx.sign(&keys).unwrap();
        let bytes = signed.bytes();

        c.bench_function(&format!("codec/encode/{name}"), |b| {
            b.iter(|| encode(&tx, signed.signature()).unwrap());
        });
        c.bench_function(&format!("codec/decode/{name}"), |b| {
            b.iter(|| decode(&bytes).unwrap());
        });
        c.bench_function(&format!("codec/load_signed/{name}"), |b| {
            b.iter(|| SignedTransaction::from_bytes(&bytes).unwrap());
        });
        c.bench_function(&format!("codec/full_hash/{name}"), |b| {
            b.iter(|| full_hash(signed.unsigned_bytes(), signed.signature()));
        });
    }
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
