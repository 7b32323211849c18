//! Simple decoder to inspect execution transform lists.
//!
//! Reads a JSON array of `{"key": ..., "transform": ...}` documents (or an
//! object holding one under `"transforms"`) and prints one line per entry.

use std::fs;

use casper_codec::codec::decode_transforms;
use casper_codec::{Transform, TransformKind};

fn describe(transform: &Transform) -> String {
    match &transform.kind {
        TransformKind::WriteCLValue(value) => format!("{:?} = {}", value.cl_type, value.parsed),
        TransformKind::WriteAccount(key) => key.to_string(),
        TransformKind::WriteDeployInfo(info) => format!("gas {}", info.gas),
        TransformKind::WriteEraInfo(info) => format!(
            "{} allocations, total {}",
            info.seigniorage_allocations.len(),
            info.total_amount()
        ),
        TransformKind::WriteTransfer(transfer) => format!("{} motes", transfer.amount),
        TransformKind::WriteBid(bid) => format!("{} staked by {}", bid.staked_amount, bid.validator_public_key),
        TransformKind::WriteWithdraw(purses) | TransformKind::WriteUnbonding(purses) => {
            format!("{} purses", purses.len())
        }
        TransformKind::AddInt32(v) => v.to_string(),
        TransformKind::AddUInt64(v) => v.to_string(),
        TransformKind::AddUInt128(v) => v.to_string(),
        TransformKind::AddUInt256(v) => v.to_string(),
        TransformKind::AddUInt512(v) => v.to_string(),
        TransformKind::AddKeys(keys) => keys
            .iter()
            .map(|k| k.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        TransformKind::Failure(message) => format!("\"{}\"", message),
        _ => String::new(),
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "transforms.json".to_string());

    println!("Reading: {}", path);

    let text = fs::read_to_string(&path).expect("Failed to read file");
    let document: serde_json::Value = serde_json::from_str(&text).expect("Failed to parse JSON");
    let list = document.get("transforms").unwrap_or(&document);

    let transforms = decode_transforms(list).expect("Failed to decode");
    println!("Transforms: {}\n", transforms.len());

    for (i, transform) in transforms.iter().enumerate() {
        println!(
            "[{:4}] {:<22} {} {}",
            i,
            transform.transform_type(),
            transform.key,
            describe(transform)
        );
    }
}
