//! Data model types.
//!
//! - Global-state keys, URefs and public keys
//! - Typed values and named arguments
//! - Transaction payloads and their sub-components
//! - Ledger records and execution transforms

pub mod builder;
pub mod cl_value;
pub mod key;
pub mod payload;
pub mod public_key;
pub mod records;
pub(crate) mod serde_helper;
pub mod transaction;
pub mod transform;

pub use builder::PayloadBuilder;
pub use cl_value::{CLType, CLValue, NamedArg};
pub use key::{AccessRights, AccountHash, GlobalStateKey, KeyIdentifier, URef};
pub use payload::{PayloadBody, PayloadFieldKey, PayloadFields, TransactionV1Payload};
pub use public_key::PublicKey;
pub use records::{
    Bid, Delegator, DeployInfo, EraInfo, NamedKey, SeigniorageAllocation, Transfer, UnbondingPurse,
    VestingSchedule,
};
pub use transaction::{
    InitiatorAddr, PricingMode, ToBytes, TransactionEntryPoint, TransactionInvocationTarget, TransactionRuntime,
    TransactionScheduling, TransactionTarget,
};
pub use transform::{Transform, TransformKind, TransformType};
