//! C•CURE object type names and enumerations.

use std::fmt;

/// Object types this library works with.
///
/// The server addresses types by their full .NET class name, which is what
/// [`full_name`](ObjectType::full_name) returns and what goes in
/// `TypeFullName`, `type` and `Children[i][Type]` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Clearance,
    /// A `PersonnelClearancePair`: one clearance assigned to one person.
    ClearanceAssignment,
    Credential,
    ClearanceItem,
    Door,
    Elevator,
    Image,
    IStarController,
    Personnel,
    TimeSpec,
}

impl ObjectType {
    /// Full vendor type name.
    pub fn full_name(&self) -> &'static str {
        match self {
            ObjectType::Clearance => "SoftwareHouse.NextGen.Common.SecurityObjects.Clearance",
            ObjectType::ClearanceAssignment => {
                "SoftwareHouse.NextGen.Common.SecurityObjects.PersonnelClearancePair"
            }
            ObjectType::Credential => "SoftwareHouse.NextGen.Common.SecurityObjects.Credential",
            ObjectType::ClearanceItem => {
                "SoftwareHouse.NextGen.Common.SecurityObjects.ClearanceItem"
            }
            ObjectType::Door => "SoftwareHouse.NextGen.Common.SecurityObjects.Door",
            ObjectType::Elevator => "SoftwareHouse.NextGen.Common.SecurityObjects.Elevator",
            ObjectType::Image => "SoftwareHouse.NextGen.Common.SecurityObjects.Images",
            ObjectType::IStarController => {
                "SoftwareHouse.NextGen.Common.SecurityObjects.iStarController"
            }
            ObjectType::Personnel => "SoftwareHouse.NextGen.Common.SecurityObjects.Personnel",
            ObjectType::TimeSpec => "SoftwareHouse.CrossFire.Common.Objects.TimeSpec",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

impl AsRef<str> for ObjectType {
    fn as_ref(&self) -> &str {
        self.full_name()
    }
}

/// Kinds of clearance item a [`ClearanceItemClient`](crate::ClearanceItemClient)
/// can manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearanceItemType {
    Door,
    Elevator,
}

impl ClearanceItemType {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ClearanceItemType::Door => ObjectType::Door,
            ClearanceItemType::Elevator => ObjectType::Elevator,
        }
    }
}

/// `ImageType` codes of the `Images` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ImageType {
    Unknown = 0,
    Portrait = 1,
    Signature = 2,
    Fingerprint = 3,
    Handprint = 4,
    DynamicBadgeImage = 5,
    StaticBadgeImage = 6,
    SystemImage = 7,
    PrivateImage = 8,
    SharedImage = 9,
}

impl ImageType {
    /// Numeric code sent to the server.
    pub fn code(self) -> u8 {
        self as u8
    }
}
