//! Flag codec: packed modifier words
//!
//! Each declaration record carries its modifiers as one compact `u64`.
//! The codec is a set of pure per-kind decode functions (with symmetric
//! encoders for record producers); no state.
//!
//! Shared layout: bits 0..=3 visibility, bits 4..=5 modality where the kind
//! has one, kind-specific boolean modifiers above. Type, value and local
//! variable parameters use their own compact layouts documented on each
//! record type.

use serde::{Deserialize, Serialize};

use crate::error::MalformedModule;
use crate::ir::ty::Variance;

/// Declaration visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Visibility {
    Private,
    Protected,
    Internal,
    #[default]
    Public,
    /// Scoped to a function body; never link-visible
    Local,
}

impl Visibility {
    fn decode(bits: u64) -> Result<Self, MalformedModule> {
        match bits & 0xF {
            0 => Ok(Self::Private),
            1 => Ok(Self::Protected),
            2 => Ok(Self::Internal),
            3 => Ok(Self::Public),
            4 => Ok(Self::Local),
            other => Err(MalformedModule::InvalidVisibility(other)),
        }
    }

    const fn encode(self) -> u64 {
        match self {
            Self::Private => 0,
            Self::Protected => 1,
            Self::Internal => 2,
            Self::Public => 3,
            Self::Local => 4,
        }
    }

    /// Private or body-local: never reachable through the public surface
    pub const fn is_private_or_local(self) -> bool {
        matches!(self, Self::Private | Self::Local)
    }
}

/// Openness of a class or member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Modality {
    #[default]
    Final,
    Open,
    Abstract,
    Sealed,
}

impl Modality {
    fn decode(bits: u64) -> Result<Self, MalformedModule> {
        match (bits >> 4) & 0x3 {
            0 => Ok(Self::Final),
            1 => Ok(Self::Open),
            2 => Ok(Self::Abstract),
            3 => Ok(Self::Sealed),
            _ => unreachable!(),
        }
    }

    const fn encode(self) -> u64 {
        ((match self {
            Self::Final => 0u64,
            Self::Open => 1,
            Self::Abstract => 2,
            Self::Sealed => 3,
        }) << 4)
    }
}

/// Flavor of a class declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    EnumClass,
    Object,
    Annotation,
}

impl ClassKind {
    fn decode(bits: u64) -> Result<Self, MalformedModule> {
        match (bits >> 6) & 0x7 {
            0 => Ok(Self::Class),
            1 => Ok(Self::Interface),
            2 => Ok(Self::EnumClass),
            3 => Ok(Self::Object),
            4 => Ok(Self::Annotation),
            other => Err(MalformedModule::InvalidClassKind(other)),
        }
    }

    const fn encode(self) -> u64 {
        ((match self {
            Self::Class => 0u64,
            Self::Interface => 1,
            Self::EnumClass => 2,
            Self::Object => 3,
            Self::Annotation => 4,
        }) << 6)
    }
}

const fn bit(bits: u64, n: u32) -> bool {
    bits & (1 << n) != 0
}

const fn set(flag: bool, n: u32) -> u64 {
    (flag as u64) << n
}

fn variance_decode(bits: u64, shift: u32) -> Result<Variance, MalformedModule> {
    match (bits >> shift) & 0x3 {
        0 => Ok(Variance::Invariant),
        1 => Ok(Variance::Covariant),
        2 => Ok(Variance::Contravariant),
        other => Err(MalformedModule::InvalidVariance(other)),
    }
}

const fn variance_encode(v: Variance, shift: u32) -> u64 {
    ((match v {
        Variance::Invariant => 0u64,
        Variance::Covariant => 1,
        Variance::Contravariant => 2,
    }) << shift)
}

/// Modifiers of a class declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClassFlags {
    pub visibility: Visibility,
    pub modality: Modality,
    pub kind: ClassKind,
    pub is_inner: bool,
    pub is_companion: bool,
    pub is_data: bool,
    pub is_value: bool,
    pub is_expect: bool,
    pub is_fun: bool,
}

impl ClassFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            visibility: Visibility::decode(bits)?,
            modality: Modality::decode(bits)?,
            kind: ClassKind::decode(bits)?,
            is_inner: bit(bits, 9),
            is_companion: bit(bits, 10),
            is_data: bit(bits, 11),
            is_value: bit(bits, 12),
            is_expect: bit(bits, 13),
            is_fun: bit(bits, 14),
        })
    }

    pub const fn encode(self) -> u64 {
        self.visibility.encode()
            | self.modality.encode()
            | self.kind.encode()
            | set(self.is_inner, 9)
            | set(self.is_companion, 10)
            | set(self.is_data, 11)
            | set(self.is_value, 12)
            | set(self.is_expect, 13)
            | set(self.is_fun, 14)
    }
}

/// Modifiers of a function or constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FunctionFlags {
    pub visibility: Visibility,
    pub modality: Modality,
    pub is_operator: bool,
    pub is_infix: bool,
    pub is_inline: bool,
    pub is_tailrec: bool,
    pub is_external: bool,
    pub is_suspend: bool,
    pub is_expect: bool,
    pub is_fake_override: bool,
    /// Primary constructor marker (constructors only)
    pub is_primary: bool,
}

impl FunctionFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            visibility: Visibility::decode(bits)?,
            modality: Modality::decode(bits)?,
            is_operator: bit(bits, 6),
            is_infix: bit(bits, 7),
            is_inline: bit(bits, 8),
            is_tailrec: bit(bits, 9),
            is_external: bit(bits, 10),
            is_suspend: bit(bits, 11),
            is_expect: bit(bits, 12),
            is_fake_override: bit(bits, 13),
            is_primary: bit(bits, 14),
        })
    }

    pub const fn encode(self) -> u64 {
        self.visibility.encode()
            | self.modality.encode()
            | set(self.is_operator, 6)
            | set(self.is_infix, 7)
            | set(self.is_inline, 8)
            | set(self.is_tailrec, 9)
            | set(self.is_external, 10)
            | set(self.is_suspend, 11)
            | set(self.is_expect, 12)
            | set(self.is_fake_override, 13)
            | set(self.is_primary, 14)
    }
}

/// Modifiers of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PropertyFlags {
    pub visibility: Visibility,
    pub modality: Modality,
    pub is_var: bool,
    pub is_const: bool,
    pub is_lateinit: bool,
    pub is_external: bool,
    pub is_delegated: bool,
    pub is_expect: bool,
    pub is_fake_override: bool,
}

impl PropertyFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            visibility: Visibility::decode(bits)?,
            modality: Modality::decode(bits)?,
            is_var: bit(bits, 6),
            is_const: bit(bits, 7),
            is_lateinit: bit(bits, 8),
            is_external: bit(bits, 9),
            is_delegated: bit(bits, 10),
            is_expect: bit(bits, 11),
            is_fake_override: bit(bits, 12),
        })
    }

    pub const fn encode(self) -> u64 {
        self.visibility.encode()
            | self.modality.encode()
            | set(self.is_var, 6)
            | set(self.is_const, 7)
            | set(self.is_lateinit, 8)
            | set(self.is_external, 9)
            | set(self.is_delegated, 10)
            | set(self.is_expect, 11)
            | set(self.is_fake_override, 12)
    }
}

/// Modifiers of a backing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldFlags {
    pub visibility: Visibility,
    pub is_final: bool,
    pub is_external: bool,
    pub is_static: bool,
}

impl FieldFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            visibility: Visibility::decode(bits)?,
            is_final: bit(bits, 4),
            is_external: bit(bits, 5),
            is_static: bit(bits, 6),
        })
    }

    pub const fn encode(self) -> u64 {
        self.visibility.encode()
            | set(self.is_final, 4)
            | set(self.is_external, 5)
            | set(self.is_static, 6)
    }
}

/// Modifiers of a value parameter (layout: bit 0 crossinline, 1 noinline,
/// 2 hidden, 3 assignable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValueParameterFlags {
    pub is_crossinline: bool,
    pub is_noinline: bool,
    pub is_hidden: bool,
    pub is_assignable: bool,
}

impl ValueParameterFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            is_crossinline: bit(bits, 0),
            is_noinline: bit(bits, 1),
            is_hidden: bit(bits, 2),
            is_assignable: bit(bits, 3),
        })
    }

    pub const fn encode(self) -> u64 {
        set(self.is_crossinline, 0)
            | set(self.is_noinline, 1)
            | set(self.is_hidden, 2)
            | set(self.is_assignable, 3)
    }
}

/// Modifiers of a type parameter (layout: bits 0..=1 variance, bit 2
/// reified)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TypeParameterFlags {
    pub variance: Variance,
    pub is_reified: bool,
}

impl TypeParameterFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            variance: variance_decode(bits, 0)?,
            is_reified: bit(bits, 2),
        })
    }

    pub const fn encode(self) -> u64 {
        variance_encode(self.variance, 0) | set(self.is_reified, 2)
    }
}

/// Modifiers of a local variable (layout: bit 0 var, 1 const, 2 lateinit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocalVarFlags {
    pub is_var: bool,
    pub is_const: bool,
    pub is_lateinit: bool,
}

impl LocalVarFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            is_var: bit(bits, 0),
            is_const: bit(bits, 1),
            is_lateinit: bit(bits, 2),
        })
    }

    pub const fn encode(self) -> u64 {
        set(self.is_var, 0) | set(self.is_const, 1) | set(self.is_lateinit, 2)
    }
}

/// Modifiers of a type alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TypeAliasFlags {
    pub visibility: Visibility,
    pub is_actual: bool,
}

impl TypeAliasFlags {
    pub fn decode(bits: u64) -> Result<Self, MalformedModule> {
        Ok(Self {
            visibility: Visibility::decode(bits)?,
            is_actual: bit(bits, 4),
        })
    }

    pub const fn encode(self) -> u64 {
        self.visibility.encode() | set(self.is_actual, 4)
    }
}
