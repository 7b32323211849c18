//! Payload sub-components and their binary encodings.
//!
//! Each component serializes as a calltable whose field 0 holds a one-byte
//! variant tag and whose later fields hold the variant's data.

use serde::{Deserialize, Serialize};

use crate::codec::calltable::CalltableBuilder;
use crate::codec::primitives::Writer;
use crate::error::EncodeError;
use crate::model::key::AccountHash;
use crate::model::public_key::PublicKey;

/// Types with a canonical binary encoding.
pub trait ToBytes {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError>;
}

const TAG_FIELD_INDEX: u16 = 0;

fn tagged(tag: u8) -> Result<CalltableBuilder, EncodeError> {
    CalltableBuilder::new().add_field(TAG_FIELD_INDEX, vec![tag])
}

fn option_u32_bytes(value: Option<u32>) -> Vec<u8> {
    match value {
        None => vec![0],
        Some(v) => {
            let mut out = vec![1];
            out.extend_from_slice(&v.to_le_bytes());
            out
        }
    }
}

fn string_bytes(s: &str) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(4 + s.len());
    writer.write_string(s)?;
    Ok(writer.into_bytes())
}

// =============================================================================
// INITIATOR ADDRESS
// =============================================================================

/// Who initiated a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitiatorAddr {
    PublicKey(PublicKey),
    AccountHash(AccountHash),
}

impl ToBytes for InitiatorAddr {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let table = match self {
            InitiatorAddr::PublicKey(key) => tagged(0)?.add_field(1, key.to_bytes())?,
            InitiatorAddr::AccountHash(hash) => tagged(1)?.add_field(1, hash.as_bytes().to_vec())?,
        };
        table.build().to_bytes()
    }
}

impl From<PublicKey> for InitiatorAddr {
    fn from(key: PublicKey) -> Self {
        InitiatorAddr::PublicKey(key)
    }
}

impl From<AccountHash> for InitiatorAddr {
    fn from(hash: AccountHash) -> Self {
        InitiatorAddr::AccountHash(hash)
    }
}

// =============================================================================
// PRICING MODE
// =============================================================================

/// How a transaction pays for execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingMode {
    /// Pays up to `payment_amount` motes.
    PaymentLimited {
        payment_amount: u64,
        gas_price_tolerance: u8,
        standard_payment: bool,
    },
    /// Fixed cost per transaction category.
    Fixed {
        additional_computation_factor: u8,
        gas_price_tolerance: u8,
    },
    /// Paid in advance; references the payment receipt.
    Prepaid {
        #[serde(with = "hex")]
        receipt: [u8; 32],
    },
}

impl ToBytes for PricingMode {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let table = match self {
            PricingMode::PaymentLimited {
                payment_amount,
                gas_price_tolerance,
                standard_payment,
            } => tagged(0)?
                .add_field(1, payment_amount.to_le_bytes().to_vec())?
                .add_field(2, vec![*gas_price_tolerance])?
                .add_field(3, vec![*standard_payment as u8])?,
            PricingMode::Fixed {
                additional_computation_factor,
                gas_price_tolerance,
            } => tagged(1)?
                .add_field(1, vec![*additional_computation_factor])?
                .add_field(2, vec![*gas_price_tolerance])?,
            PricingMode::Prepaid { receipt } => tagged(2)?.add_field(1, receipt.to_vec())?,
        };
        table.build().to_bytes()
    }
}

// =============================================================================
// TARGET
// =============================================================================

/// Execution engine for stored or session code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionRuntime {
    #[default]
    VmCasperV1,
    VmCasperV2,
}

impl ToBytes for TransactionRuntime {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let tag = match self {
            TransactionRuntime::VmCasperV1 => 0,
            TransactionRuntime::VmCasperV2 => 1,
        };
        tagged(tag)?.build().to_bytes()
    }
}

/// How stored code is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionInvocationTarget {
    ByHash([u8; 32]),
    ByName(String),
    ByPackageHash { addr: [u8; 32], version: Option<u32> },
    ByPackageName { name: String, version: Option<u32> },
}

impl ToBytes for TransactionInvocationTarget {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let table = match self {
            TransactionInvocationTarget::ByHash(hash) => tagged(0)?.add_field(1, hash.to_vec())?,
            TransactionInvocationTarget::ByName(name) => tagged(1)?.add_field(1, string_bytes(name)?)?,
            TransactionInvocationTarget::ByPackageHash { addr, version } => tagged(2)?
                .add_field(1, addr.to_vec())?
                .add_field(2, option_u32_bytes(*version))?,
            TransactionInvocationTarget::ByPackageName { name, version } => tagged(3)?
                .add_field(1, string_bytes(name)?)?
                .add_field(2, option_u32_bytes(*version))?,
        };
        table.build().to_bytes()
    }
}

/// What a transaction executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionTarget {
    /// A native (system) operation.
    Native,
    /// Code already stored on chain.
    Stored {
        id: TransactionInvocationTarget,
        runtime: TransactionRuntime,
    },
    /// Wasm supplied with the transaction.
    Session {
        is_install_upgrade: bool,
        runtime: TransactionRuntime,
        module_bytes: Vec<u8>,
    },
}

impl ToBytes for TransactionTarget {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let table = match self {
            TransactionTarget::Native => tagged(0)?,
            TransactionTarget::Stored { id, runtime } => tagged(1)?
                .add_field(1, id.to_bytes()?)?
                .add_field(2, runtime.to_bytes()?)?,
            TransactionTarget::Session {
                is_install_upgrade,
                runtime,
                module_bytes,
            } => tagged(2)?
                .add_field(1, vec![*is_install_upgrade as u8])?
                .add_field(2, runtime.to_bytes()?)?
                .add_written(3, |w| w.write_bytes_prefixed(module_bytes))?,
        };
        table.build().to_bytes()
    }
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// The entry point a transaction invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionEntryPoint {
    Call,
    Custom(String),
    Transfer,
    AddBid,
    WithdrawBid,
    Delegate,
    Undelegate,
    Redelegate,
    ActivateBid,
    ChangeBidPublicKey,
    AddReservations,
    CancelReservations,
}

impl TransactionEntryPoint {
    pub fn tag(&self) -> u8 {
        match self {
            TransactionEntryPoint::Call => 0,
            TransactionEntryPoint::Custom(_) => 1,
            TransactionEntryPoint::Transfer => 2,
            TransactionEntryPoint::AddBid => 3,
            TransactionEntryPoint::WithdrawBid => 4,
            TransactionEntryPoint::Delegate => 5,
            TransactionEntryPoint::Undelegate => 6,
            TransactionEntryPoint::Redelegate => 7,
            TransactionEntryPoint::ActivateBid => 8,
            TransactionEntryPoint::ChangeBidPublicKey => 9,
            TransactionEntryPoint::AddReservations => 10,
            TransactionEntryPoint::CancelReservations => 11,
        }
    }
}

impl ToBytes for TransactionEntryPoint {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut table = tagged(self.tag())?;
        if let TransactionEntryPoint::Custom(name) = self {
            table = table.add_field(1, string_bytes(name)?)?;
        }
        table.build().to_bytes()
    }
}

// =============================================================================
// SCHEDULING
// =============================================================================

/// When a transaction may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionScheduling {
    #[default]
    Standard,
    FutureEra(u64),
    FutureTimestamp(u64),
}

impl ToBytes for TransactionScheduling {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let table = match self {
            TransactionScheduling::Standard => tagged(0)?,
            TransactionScheduling::FutureEra(era) => tagged(1)?.add_field(1, era.to_le_bytes().to_vec())?,
            TransactionScheduling::FutureTimestamp(ts) => tagged(2)?.add_field(1, ts.to_le_bytes().to_vec())?,
        };
        table.build().to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::calltable::Calltable;

    fn decode(bytes: &[u8]) -> Calltable {
        Calltable::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_tag_at_field_zero() {
        let table = decode(&TransactionScheduling::Standard.to_bytes().unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some(&[0u8][..]));

        let table = decode(&TransactionEntryPoint::Delegate.to_bytes().unwrap());
        assert_eq!(table.get(0), Some(&[5u8][..]));
    }

    #[test]
    fn test_initiator() {
        let key = PublicKey::Ed25519([3; 32]);
        let table = decode(&InitiatorAddr::from(key).to_bytes().unwrap());
        assert_eq!(table.get(0), Some(&[0u8][..]));
        assert_eq!(table.get(1), Some(&key.to_bytes()[..]));

        let table = decode(&InitiatorAddr::AccountHash(AccountHash([4; 32])).to_bytes().unwrap());
        assert_eq!(table.get(0), Some(&[1u8][..]));
        assert_eq!(table.get(1), Some(&[4u8; 32][..]));
    }

    #[test]
    fn test_pricing_mode() {
        let mode = PricingMode::PaymentLimited {
            payment_amount: 2_500_000_000,
            gas_price_tolerance: 1,
            standard_payment: true,
        };
        let table = decode(&mode.to_bytes().unwrap());
        assert_eq!(table.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(table.get(1), Some(&2_500_000_000u64.to_le_bytes()[..]));
        assert_eq!(table.get(3), Some(&[1u8][..]));
    }

    #[test]
    fn test_pricing_mode_json() {
        let json = serde_json::json!({"Fixed": {"additional_computation_factor": 0, "gas_price_tolerance": 5}});
        let mode: PricingMode = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(
            mode,
            PricingMode::Fixed {
                additional_computation_factor: 0,
                gas_price_tolerance: 5
            }
        );
        assert_eq!(serde_json::to_value(mode).unwrap(), json);

        let prepaid: PricingMode =
            serde_json::from_value(serde_json::json!({"Prepaid": {"receipt": "11".repeat(32)}})).unwrap();
        assert_eq!(prepaid, PricingMode::Prepaid { receipt: [0x11; 32] });
    }

    #[test]
    fn test_initiator_json() {
        let key = PublicKey::Ed25519([8; 32]);
        let json = serde_json::to_value(InitiatorAddr::PublicKey(key)).unwrap();
        assert_eq!(json, serde_json::json!({"PublicKey": key.to_string()}));
        let back: InitiatorAddr = serde_json::from_value(json).unwrap();
        assert_eq!(back, InitiatorAddr::PublicKey(key));
    }

    #[test]
    fn test_session_target() {
        let target = TransactionTarget::Session {
            is_install_upgrade: false,
            runtime: TransactionRuntime::VmCasperV1,
            module_bytes: vec![0x00, 0x61, 0x73, 0x6d],
        };
        let table = decode(&target.to_bytes().unwrap());
        assert_eq!(table.get(0), Some(&[2u8][..]));
        assert_eq!(table.get(3), Some(&[4, 0, 0, 0, 0x00, 0x61, 0x73, 0x6d][..]));
        let runtime = decode(table.get(2).unwrap());
        assert_eq!(runtime.get(0), Some(&[0u8][..]));
    }

    #[test]
    fn test_stored_by_package_name() {
        let target = TransactionTarget::Stored {
            id: TransactionInvocationTarget::ByPackageName {
                name: "cep18".to_string(),
                version: Some(2),
            },
            runtime: TransactionRuntime::default(),
        };
        let table = decode(&target.to_bytes().unwrap());
        let id = decode(table.get(1).unwrap());
        assert_eq!(id.get(0), Some(&[3u8][..]));
        assert_eq!(id.get(2), Some(&[1, 2, 0, 0, 0][..]));
    }

    #[test]
    fn test_custom_entry_point() {
        let table = decode(&TransactionEntryPoint::Custom("mint".to_string()).to_bytes().unwrap());
        assert_eq!(table.get(0), Some(&[1u8][..]));
        assert_eq!(table.get(1), Some(&[4, 0, 0, 0, b'm', b'i', b'n', b't'][..]));
    }

    #[test]
    fn test_future_scheduling() {
        let table = decode(&TransactionScheduling::FutureEra(77).to_bytes().unwrap());
        assert_eq!(table.get(1), Some(&77u64.to_le_bytes()[..]));
    }
}
