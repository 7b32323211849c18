//! Execution transforms: one recorded mutation of global state.

use std::fmt;

use lazy_static::lazy_static;
use primitive_types::{U128, U256, U512};
use rustc_hash::FxHashMap;

use crate::model::cl_value::CLValue;
use crate::model::key::GlobalStateKey;
use crate::model::records::{Bid, DeployInfo, EraInfo, NamedKey, Transfer, UnbondingPurse};

/// Transform discriminant, as named in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformType {
    Identity,
    WriteContractWasm,
    WriteContract,
    WriteContractPackage,
    WriteCLValue,
    WriteAccount,
    WriteDeployInfo,
    WriteEraInfo,
    WriteTransfer,
    WriteBid,
    WriteWithdraw,
    AddInt32,
    AddUInt64,
    AddUInt128,
    AddUInt256,
    AddUInt512,
    AddKeys,
    Failure,
    WriteUnbonding,
}

impl TransformType {
    pub const ALL: [TransformType; 19] = [
        TransformType::Identity,
        TransformType::WriteContractWasm,
        TransformType::WriteContract,
        TransformType::WriteContractPackage,
        TransformType::WriteCLValue,
        TransformType::WriteAccount,
        TransformType::WriteDeployInfo,
        TransformType::WriteEraInfo,
        TransformType::WriteTransfer,
        TransformType::WriteBid,
        TransformType::WriteWithdraw,
        TransformType::AddInt32,
        TransformType::AddUInt64,
        TransformType::AddUInt128,
        TransformType::AddUInt256,
        TransformType::AddUInt512,
        TransformType::AddKeys,
        TransformType::Failure,
        TransformType::WriteUnbonding,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransformType::Identity => "Identity",
            TransformType::WriteContractWasm => "WriteContractWasm",
            TransformType::WriteContract => "WriteContract",
            TransformType::WriteContractPackage => "WriteContractPackage",
            TransformType::WriteCLValue => "WriteCLValue",
            TransformType::WriteAccount => "WriteAccount",
            TransformType::WriteDeployInfo => "WriteDeployInfo",
            TransformType::WriteEraInfo => "WriteEraInfo",
            TransformType::WriteTransfer => "WriteTransfer",
            TransformType::WriteBid => "WriteBid",
            TransformType::WriteWithdraw => "WriteWithdraw",
            TransformType::AddInt32 => "AddInt32",
            TransformType::AddUInt64 => "AddUInt64",
            TransformType::AddUInt128 => "AddUInt128",
            TransformType::AddUInt256 => "AddUInt256",
            TransformType::AddUInt512 => "AddUInt512",
            TransformType::AddKeys => "AddKeys",
            TransformType::Failure => "Failure",
            TransformType::WriteUnbonding => "WriteUnbonding",
        }
    }

    /// Looks up a discriminant by its JSON name.
    pub fn from_name(name: &str) -> Option<TransformType> {
        TRANSFORM_TYPES.get(name).copied()
    }

    /// True for discriminants that carry no payload.
    pub fn is_unit(self) -> bool {
        matches!(
            self,
            TransformType::Identity
                | TransformType::WriteContractWasm
                | TransformType::WriteContract
                | TransformType::WriteContractPackage
        )
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

lazy_static! {
    static ref TRANSFORM_TYPES: FxHashMap<&'static str, TransformType> =
        TransformType::ALL.into_iter().map(|t| (t.name(), t)).collect();
}

/// A transform's payload, one case per discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformKind {
    Identity,
    WriteContractWasm,
    WriteContract,
    WriteContractPackage,
    WriteCLValue(CLValue),
    WriteAccount(GlobalStateKey),
    WriteDeployInfo(DeployInfo),
    WriteEraInfo(EraInfo),
    WriteTransfer(Transfer),
    WriteBid(Box<Bid>),
    WriteWithdraw(Vec<UnbondingPurse>),
    AddInt32(i32),
    AddUInt64(u64),
    AddUInt128(U128),
    AddUInt256(U256),
    AddUInt512(U512),
    AddKeys(Vec<NamedKey>),
    Failure(String),
    WriteUnbonding(Vec<UnbondingPurse>),
}

impl TransformKind {
    pub fn transform_type(&self) -> TransformType {
        match self {
            TransformKind::Identity => TransformType::Identity,
            TransformKind::WriteContractWasm => TransformType::WriteContractWasm,
            TransformKind::WriteContract => TransformType::WriteContract,
            TransformKind::WriteContractPackage => TransformType::WriteContractPackage,
            TransformKind::WriteCLValue(_) => TransformType::WriteCLValue,
            TransformKind::WriteAccount(_) => TransformType::WriteAccount,
            TransformKind::WriteDeployInfo(_) => TransformType::WriteDeployInfo,
            TransformKind::WriteEraInfo(_) => TransformType::WriteEraInfo,
            TransformKind::WriteTransfer(_) => TransformType::WriteTransfer,
            TransformKind::WriteBid(_) => TransformType::WriteBid,
            TransformKind::WriteWithdraw(_) => TransformType::WriteWithdraw,
            TransformKind::AddInt32(_) => TransformType::AddInt32,
            TransformKind::AddUInt64(_) => TransformType::AddUInt64,
            TransformKind::AddUInt128(_) => TransformType::AddUInt128,
            TransformKind::AddUInt256(_) => TransformType::AddUInt256,
            TransformKind::AddUInt512(_) => TransformType::AddUInt512,
            TransformKind::AddKeys(_) => TransformType::AddKeys,
            TransformKind::Failure(_) => TransformType::Failure,
            TransformKind::WriteUnbonding(_) => TransformType::WriteUnbonding,
        }
    }

    /// The payload-less value for a unit discriminant.
    pub fn unit(transform_type: TransformType) -> Option<TransformKind> {
        match transform_type {
            TransformType::Identity => Some(TransformKind::Identity),
            TransformType::WriteContractWasm => Some(TransformKind::WriteContractWasm),
            TransformType::WriteContract => Some(TransformKind::WriteContract),
            TransformType::WriteContractPackage => Some(TransformKind::WriteContractPackage),
            _ => None,
        }
    }
}

/// A transform applied to one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub key: GlobalStateKey,
    pub kind: TransformKind,
}

impl Transform {
    pub fn new(key: GlobalStateKey, kind: TransformKind) -> Self {
        Self { key, kind }
    }

    pub fn transform_type(&self) -> TransformType {
        self.kind.transform_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_table() {
        for t in TransformType::ALL {
            assert_eq!(TransformType::from_name(t.name()), Some(t));
        }
        assert_eq!(TransformType::from_name("identity"), None);
        assert_eq!(TransformType::from_name("WriteNothing"), None);
    }

    #[test]
    fn test_unit_kinds() {
        for t in TransformType::ALL {
            match TransformKind::unit(t) {
                Some(kind) => {
                    assert!(t.is_unit());
                    assert_eq!(kind.transform_type(), t);
                }
                None => assert!(!t.is_unit()),
            }
        }
    }
}
