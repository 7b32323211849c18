//! Builder API for ergonomic payload construction.
//!
//! # Example
//!
//! ```rust
//! use casper_codec::model::{CLValue, PayloadBuilder, PricingMode, PublicKey, TransactionEntryPoint};
//!
//! let sender = PublicKey::Ed25519([1u8; 32]);
//! let payload = PayloadBuilder::new(sender, "casper-test")
//!     .timestamp(1_714_564_800_000)
//!     .ttl(3_600_000)
//!     .pricing_mode(PricingMode::Fixed { additional_computation_factor: 0, gas_price_tolerance: 1 })
//!     .arg("target", CLValue::public_key(PublicKey::Ed25519([2u8; 32])))
//!     .entry_point(TransactionEntryPoint::Transfer)
//!     .build();
//! assert_eq!(payload.runtime_args().unwrap().len(), 1);
//! ```

use crate::limits::DEFAULT_TTL_MILLIS;
use crate::model::cl_value::{CLValue, NamedArg};
use crate::model::payload::{PayloadBody, TransactionV1Payload};
use crate::model::transaction::{
    InitiatorAddr, PricingMode, TransactionEntryPoint, TransactionScheduling, TransactionTarget,
};
use crate::util::datetime::now_millis;

/// Builder for constructing a [`TransactionV1Payload`] with typed components.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    initiator_addr: InitiatorAddr,
    chain_name: String,
    timestamp: u64,
    ttl: u64,
    pricing_mode: PricingMode,
    runtime_args: Vec<NamedArg>,
    target: TransactionTarget,
    entry_point: TransactionEntryPoint,
    scheduling: TransactionScheduling,
}

impl PayloadBuilder {
    /// Creates a builder for a native `Call` with standard scheduling,
    /// stamped now with the default TTL.
    pub fn new(initiator: impl Into<InitiatorAddr>, chain_name: impl Into<String>) -> Self {
        Self {
            initiator_addr: initiator.into(),
            chain_name: chain_name.into(),
            timestamp: now_millis(),
            ttl: DEFAULT_TTL_MILLIS,
            pricing_mode: PricingMode::PaymentLimited {
                payment_amount: 0,
                gas_price_tolerance: 1,
                standard_payment: true,
            },
            runtime_args: Vec::new(),
            target: TransactionTarget::Native,
            entry_point: TransactionEntryPoint::Call,
            scheduling: TransactionScheduling::Standard,
        }
    }

    /// Sets the timestamp (milliseconds since Unix epoch).
    pub fn timestamp(mut self, millis: u64) -> Self {
        self.timestamp = millis;
        self
    }

    /// Sets the time to live in milliseconds.
    pub fn ttl(mut self, millis: u64) -> Self {
        self.ttl = millis;
        self
    }

    pub fn pricing_mode(mut self, pricing_mode: PricingMode) -> Self {
        self.pricing_mode = pricing_mode;
        self
    }

    /// Appends a runtime argument.
    pub fn arg(mut self, name: impl Into<String>, value: CLValue) -> Self {
        self.runtime_args.push(NamedArg::new(name, value));
        self
    }

    /// Appends several runtime arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = NamedArg>) -> Self {
        self.runtime_args.extend(args);
        self
    }

    pub fn target(mut self, target: TransactionTarget) -> Self {
        self.target = target;
        self
    }

    pub fn entry_point(mut self, entry_point: TransactionEntryPoint) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn scheduling(mut self, scheduling: TransactionScheduling) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Builds the payload.
    pub fn build(self) -> TransactionV1Payload {
        TransactionV1Payload {
            initiator_addr: self.initiator_addr,
            timestamp: self.timestamp,
            ttl: self.ttl,
            pricing_mode: self.pricing_mode,
            chain_name: self.chain_name,
            body: PayloadBody::Typed {
                runtime_args: self.runtime_args,
                target: self.target,
                entry_point: self.entry_point,
                scheduling: self.scheduling,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::key::AccountHash;

    #[test]
    fn test_defaults() {
        let payload = PayloadBuilder::new(AccountHash([1; 32]), "casper").build();
        assert_eq!(payload.ttl, DEFAULT_TTL_MILLIS);
        assert!(payload.timestamp > 0);
        assert_eq!(payload.target().unwrap(), &TransactionTarget::Native);
        assert_eq!(payload.entry_point().unwrap(), &TransactionEntryPoint::Call);
        assert_eq!(payload.scheduling().unwrap(), &TransactionScheduling::Standard);
        assert!(payload.runtime_args().unwrap().is_empty());
    }

    #[test]
    fn test_args_keep_insertion_order() {
        let payload = PayloadBuilder::new(AccountHash([1; 32]), "casper")
            .arg("z", CLValue::u8(1))
            .args([NamedArg::new("a", CLValue::u8(2))])
            .arg("m", CLValue::u8(3))
            .build();
        let names: Vec<_> = payload.runtime_args().unwrap().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }
}
