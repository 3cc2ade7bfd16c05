//! Declaration origins
//!
//! An origin records why an IR node exists: written in source, synthesized
//! by the compiler for a bridge, a default constructor, and so on. Records
//! store origins by name; unlisted names become [`Origin::Custom`] tags
//! instead of failing the decode, so newer producers stay readable.

use lasso::Spur;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Origins this reader knows by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownOrigin {
    /// Written in source
    Defined,
    FakeOverride,
    DelegatedMember,
    Bridge,
    DefaultConstructor,
    EnumClassSpecialMember,
    FieldForEnumEntry,
    FieldForObjectInstance,
    InstanceReceiver,
    DefaultPropertyAccessor,
    DelegatedPropertyAccessor,
    GeneratedSetterParameter,
    LocalFunction,
    FileClass,
}

impl KnownOrigin {
    /// Serialized tag name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Defined => "DEFINED",
            Self::FakeOverride => "FAKE_OVERRIDE",
            Self::DelegatedMember => "DELEGATED_MEMBER",
            Self::Bridge => "BRIDGE",
            Self::DefaultConstructor => "DEFAULT_CONSTRUCTOR",
            Self::EnumClassSpecialMember => "ENUM_CLASS_SPECIAL_MEMBER",
            Self::FieldForEnumEntry => "FIELD_FOR_ENUM_ENTRY",
            Self::FieldForObjectInstance => "FIELD_FOR_OBJECT_INSTANCE",
            Self::InstanceReceiver => "INSTANCE_RECEIVER",
            Self::DefaultPropertyAccessor => "DEFAULT_PROPERTY_ACCESSOR",
            Self::DelegatedPropertyAccessor => "DELEGATED_PROPERTY_ACCESSOR",
            Self::GeneratedSetterParameter => "GENERATED_SETTER_PARAMETER",
            Self::LocalFunction => "LOCAL_FUNCTION",
            Self::FileClass => "FILE_CLASS",
        }
    }

    /// Look up a serialized tag name
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    const ALL: [Self; 14] = [
        Self::Defined,
        Self::FakeOverride,
        Self::DelegatedMember,
        Self::Bridge,
        Self::DefaultConstructor,
        Self::EnumClassSpecialMember,
        Self::FieldForEnumEntry,
        Self::FieldForObjectInstance,
        Self::InstanceReceiver,
        Self::DefaultPropertyAccessor,
        Self::DelegatedPropertyAccessor,
        Self::GeneratedSetterParameter,
        Self::LocalFunction,
        Self::FileClass,
    ];
}

static BY_NAME: Lazy<FxHashMap<&'static str, KnownOrigin>> = Lazy::new(|| {
    KnownOrigin::ALL
        .iter()
        .map(|origin| (origin.name(), *origin))
        .collect()
});

/// Why a declaration node exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Known(KnownOrigin),
    /// A tag name this reader does not list; preserved verbatim
    Custom(Spur),
}

impl Origin {
    /// The authored-in-source origin
    pub const DEFINED: Self = Self::Known(KnownOrigin::Defined);

    /// Is this the fake-override origin?
    pub const fn is_fake_override(self) -> bool {
        matches!(self, Self::Known(KnownOrigin::FakeOverride))
    }
}
