//! Ledger records carried by write transforms.
//!
//! Amounts in motes are decimal strings in JSON.

use std::collections::BTreeMap;

use primitive_types::U512;
use serde::{Deserialize, Serialize};

use crate::model::key::{AccountHash, GlobalStateKey, URef};
use crate::model::public_key::PublicKey;
use crate::model::serde_helper::{decimal, option_decimal_list};

/// Information about a processed deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployInfo {
    #[serde(with = "hex")]
    pub deploy_hash: [u8; 32],
    /// Transfers performed by the deploy (`transfer-` keys).
    pub transfers: Vec<GlobalStateKey>,
    pub from: AccountHash,
    /// Main purse of the paying account.
    pub source: URef,
    #[serde(with = "decimal")]
    pub gas: U512,
}

/// Rewards paid out in one era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraInfo {
    pub seigniorage_allocations: Vec<SeigniorageAllocation>,
}

impl EraInfo {
    /// Sum of all allocations.
    pub fn total_amount(&self) -> U512 {
        self.seigniorage_allocations
            .iter()
            .fold(U512::zero(), |acc, a| acc.saturating_add(a.amount()))
    }
}

/// One reward entry of an [`EraInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeigniorageAllocation {
    Validator {
        validator_public_key: PublicKey,
        #[serde(with = "decimal")]
        amount: U512,
    },
    Delegator {
        delegator_public_key: PublicKey,
        validator_public_key: PublicKey,
        #[serde(with = "decimal")]
        amount: U512,
    },
}

impl SeigniorageAllocation {
    pub fn amount(&self) -> U512 {
        match self {
            SeigniorageAllocation::Validator { amount, .. } | SeigniorageAllocation::Delegator { amount, .. } => {
                *amount
            }
        }
    }
}

/// A token transfer between purses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(with = "hex")]
    pub deploy_hash: [u8; 32],
    pub from: AccountHash,
    #[serde(default)]
    pub to: Option<AccountHash>,
    pub source: URef,
    pub target: URef,
    #[serde(with = "decimal")]
    pub amount: U512,
    #[serde(with = "decimal")]
    pub gas: U512,
    #[serde(default)]
    pub id: Option<u64>,
}

/// Locked stake release schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub initial_release_timestamp_millis: u64,
    #[serde(with = "option_decimal_list", default)]
    pub locked_amounts: Option<Vec<U512>>,
}

/// Stake delegated to a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegator {
    pub delegator_public_key: PublicKey,
    #[serde(with = "decimal")]
    pub staked_amount: U512,
    pub bonding_purse: URef,
    pub validator_public_key: PublicKey,
    #[serde(default)]
    pub vesting_schedule: Option<VestingSchedule>,
}

/// A validator's auction bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub validator_public_key: PublicKey,
    pub bonding_purse: URef,
    #[serde(with = "decimal")]
    pub staked_amount: U512,
    pub delegation_rate: u8,
    #[serde(default)]
    pub vesting_schedule: Option<VestingSchedule>,
    #[serde(default)]
    pub delegators: BTreeMap<PublicKey, Delegator>,
    pub inactive: bool,
}

/// Stake waiting to be released to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingPurse {
    pub bonding_purse: URef,
    pub validator_public_key: PublicKey,
    pub unbonder_public_key: PublicKey,
    pub era_of_creation: u64,
    #[serde(with = "decimal")]
    pub amount: U512,
    #[serde(default)]
    pub new_validator: Option<PublicKey>,
}

/// A name bound to a key in an account's or contract's named keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedKey {
    pub name: String,
    pub key: GlobalStateKey,
}
