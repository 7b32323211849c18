//! The body of a version-1 transaction.

use crate::codec::calltable::{Calltable, CalltableBuilder};
use crate::codec::primitives::Writer;
use crate::error::{DecodeError, EncodeError};
use crate::limits::DEFAULT_TTL_MILLIS;
use crate::model::cl_value::NamedArg;
use crate::model::transaction::{
    InitiatorAddr, PricingMode, ToBytes, TransactionEntryPoint, TransactionScheduling, TransactionTarget,
};
use crate::util::datetime::now_millis;

/// The four keys of the payload `fields` sub-map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum PayloadFieldKey {
    Args = 0,
    Target = 1,
    EntryPoint = 2,
    Scheduling = 3,
}

impl PayloadFieldKey {
    pub const ALL: [PayloadFieldKey; 4] = [
        PayloadFieldKey::Args,
        PayloadFieldKey::Target,
        PayloadFieldKey::EntryPoint,
        PayloadFieldKey::Scheduling,
    ];

    pub fn index(self) -> u16 {
        self as u16
    }

    pub fn from_index(index: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.index() == index)
    }
}

/// The `fields` sub-map: serialized args, target, entry point and scheduling.
///
/// Only the four [`PayloadFieldKey`] indices can be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadFields {
    table: Calltable,
}

impl PayloadFields {
    /// Serializes the typed components.
    pub fn from_typed(
        runtime_args: &[NamedArg],
        target: &TransactionTarget,
        entry_point: &TransactionEntryPoint,
        scheduling: &TransactionScheduling,
    ) -> Result<Self, EncodeError> {
        let table = CalltableBuilder::new()
            .add_written(PayloadFieldKey::Args.index(), |w| write_args(w, runtime_args))?
            .add_field(PayloadFieldKey::Target.index(), target.to_bytes()?)?
            .add_field(PayloadFieldKey::EntryPoint.index(), entry_point.to_bytes()?)?
            .add_field(PayloadFieldKey::Scheduling.index(), scheduling.to_bytes()?)?
            .build();
        Ok(Self { table })
    }

    /// Builds the sub-map from already-serialized values.
    pub fn from_raw(entries: impl IntoIterator<Item = (PayloadFieldKey, Vec<u8>)>) -> Result<Self, EncodeError> {
        let table = entries
            .into_iter()
            .try_fold(CalltableBuilder::new(), |builder, (key, value)| {
                builder.add_field(key.index(), value)
            })?
            .build();
        Ok(Self { table })
    }

    /// Returns the serialized value stored under `key`.
    pub fn get(&self, key: PayloadFieldKey) -> Option<&[u8]> {
        self.table.get(key.index())
    }

    /// Iterates the present entries in ascending key order.
    pub fn entries(&self) -> impl Iterator<Item = (PayloadFieldKey, &[u8])> {
        self.table
            .fields()
            .filter_map(|f| PayloadFieldKey::from_index(f.index).map(|k| (k, f.value.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn as_calltable(&self) -> &Calltable {
        &self.table
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        self.table.to_bytes()
    }
}

/// Count-prefixed list of serialized named arguments.
fn write_args(writer: &mut Writer, args: &[NamedArg]) -> Result<(), EncodeError> {
    let count = i32::try_from(args.len()).map_err(|_| EncodeError::LengthExceedsLimit {
        field: "runtime args",
        len: args.len(),
        max: i32::MAX as usize,
    })?;
    writer.write_i32(count);
    for arg in args {
        arg.write_to(writer)?;
    }
    Ok(())
}

/// The variable part of a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadBody {
    /// Typed components, as assembled by callers.
    Typed {
        runtime_args: Vec<NamedArg>,
        target: TransactionTarget,
        entry_point: TransactionEntryPoint,
        scheduling: TransactionScheduling,
    },
    /// Serialized components, as read from the JSON projection.
    Fields(PayloadFields),
}

/// A version-1 transaction payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionV1Payload {
    pub initiator_addr: InitiatorAddr,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Time to live in milliseconds.
    pub ttl: u64,
    pub pricing_mode: PricingMode,
    pub chain_name: String,
    pub body: PayloadBody,
}

impl TransactionV1Payload {
    /// Creates a payload stamped with the current time and the default TTL.
    pub fn new(
        initiator_addr: InitiatorAddr,
        pricing_mode: PricingMode,
        chain_name: impl Into<String>,
        body: PayloadBody,
    ) -> Self {
        Self {
            initiator_addr,
            timestamp: now_millis(),
            ttl: DEFAULT_TTL_MILLIS,
            pricing_mode,
            chain_name: chain_name.into(),
            body,
        }
    }

    /// Returns the `fields` sub-map, serializing typed components if needed.
    pub fn fields(&self) -> Result<PayloadFields, EncodeError> {
        match &self.body {
            PayloadBody::Typed {
                runtime_args,
                target,
                entry_point,
                scheduling,
            } => PayloadFields::from_typed(runtime_args, target, entry_point, scheduling),
            PayloadBody::Fields(fields) => Ok(fields.clone()),
        }
    }

    /// True when the typed components are available.
    pub fn is_typed(&self) -> bool {
        matches!(self.body, PayloadBody::Typed { .. })
    }

    pub fn runtime_args(&self) -> Result<&[NamedArg], DecodeError> {
        match &self.body {
            PayloadBody::Typed { runtime_args, .. } => Ok(runtime_args),
            PayloadBody::Fields(_) => Err(DecodeError::UnsupportedOperation {
                operation: "reading runtime args from serialized payload fields",
            }),
        }
    }

    pub fn target(&self) -> Result<&TransactionTarget, DecodeError> {
        match &self.body {
            PayloadBody::Typed { target, .. } => Ok(target),
            PayloadBody::Fields(_) => Err(DecodeError::UnsupportedOperation {
                operation: "reading target from serialized payload fields",
            }),
        }
    }

    pub fn entry_point(&self) -> Result<&TransactionEntryPoint, DecodeError> {
        match &self.body {
            PayloadBody::Typed { entry_point, .. } => Ok(entry_point),
            PayloadBody::Fields(_) => Err(DecodeError::UnsupportedOperation {
                operation: "reading entry point from serialized payload fields",
            }),
        }
    }

    pub fn scheduling(&self) -> Result<&TransactionScheduling, DecodeError> {
        match &self.body {
            PayloadBody::Typed { scheduling, .. } => Ok(scheduling),
            PayloadBody::Fields(_) => Err(DecodeError::UnsupportedOperation {
                operation: "reading scheduling from serialized payload fields",
            }),
        }
    }
}
