//! Actor (user) entity and the role classifier.
//!
//! A role is a single tagged variant rather than a set of independent flags:
//! a bound role carries its school id in the type, so "school admin with no
//! school" is unrepresentable in memory. The only place the illegal state can
//! appear is durable storage, and `Role::from_parts` turns it into a fatal
//! `MisconfiguredActor` error at decode time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, RoleRequirement};

/// Privilege tier plus school binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "school_id", rename_all = "snake_case")]
pub enum Role {
    /// Unrestricted cross-school access, used for provisioning and platform
    /// management only. Tenant-agnostic by design.
    Superuser,
    /// Full management rights within one school.
    SchoolAdmin(Uuid),
    /// Teaching staff of one school.
    Staff(Uuid),
    /// End user (student) of one school.
    Student(Uuid),
}

impl Role {
    /// Rebuild a role from its stored parts. A bound role kind with no school
    /// id is a provisioning bug, not a deniable request.
    pub fn from_parts(kind: &str, school_id: Option<Uuid>, who: &str) -> Result<Role, AppError> {
        match (kind, school_id) {
            ("superuser", _) => Ok(Role::Superuser),
            ("school_admin", Some(id)) => Ok(Role::SchoolAdmin(id)),
            ("staff", Some(id)) => Ok(Role::Staff(id)),
            ("student", Some(id)) => Ok(Role::Student(id)),
            ("school_admin", None) | ("staff", None) | ("student", None) => {
                Err(AppError::MisconfiguredActor(who.to_string()))
            }
            _ => Err(AppError::Internal(format!("Unknown role kind: {kind}"))),
        }
    }

    /// The stored `(role_kind, school_id)` pair.
    pub fn to_parts(&self) -> (&'static str, Option<Uuid>) {
        match self {
            Role::Superuser => ("superuser", None),
            Role::SchoolAdmin(id) => ("school_admin", Some(*id)),
            Role::Staff(id) => ("staff", Some(*id)),
            Role::Student(id) => ("student", Some(*id)),
        }
    }

    /// School binding, `None` only for superusers.
    pub fn school_id(&self) -> Option<Uuid> {
        self.to_parts().1
    }

    pub fn is_superuser(&self) -> bool {
        matches!(self, Role::Superuser)
    }

    pub fn is_school_admin_or_higher(&self) -> bool {
        matches!(self, Role::Superuser | Role::SchoolAdmin(_))
    }

    pub fn is_staff_or_higher(&self) -> bool {
        matches!(self, Role::Superuser | Role::SchoolAdmin(_) | Role::Staff(_))
    }

    pub fn is_student_or_higher(&self) -> bool {
        // Every role tier can at least do what a student can.
        true
    }

    pub fn require_superuser(&self) -> Result<(), AppError> {
        if self.is_superuser() {
            Ok(())
        } else {
            Err(AppError::InsufficientRole(RoleRequirement::Superuser))
        }
    }

    pub fn require_school_admin(&self) -> Result<(), AppError> {
        if self.is_school_admin_or_higher() {
            Ok(())
        } else {
            Err(AppError::InsufficientRole(RoleRequirement::SchoolAdmin))
        }
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff_or_higher() {
            Ok(())
        } else {
            Err(AppError::InsufficientRole(RoleRequirement::Staff))
        }
    }
}

/// An authenticated principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an actor. The school binding lives inside
/// `role`; creation flows derive it from the creator's resolved school,
/// never from client input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_parts() {
        let school = Uuid::new_v4();
        for role in [
            Role::Superuser,
            Role::SchoolAdmin(school),
            Role::Staff(school),
            Role::Student(school),
        ] {
            let (kind, id) = role.to_parts();
            assert_eq!(Role::from_parts(kind, id, "t").unwrap(), role);
        }
    }

    #[test]
    fn test_bound_role_without_school_is_fatal() {
        for kind in ["school_admin", "staff", "student"] {
            match Role::from_parts(kind, None, "jdoe") {
                Err(AppError::MisconfiguredActor(who)) => assert_eq!(who, "jdoe"),
                other => panic!("expected MisconfiguredActor for {kind}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_superuser_binding_is_ignored() {
        // A superuser row with a leftover school id still decodes to a
        // tenant-agnostic superuser.
        let role = Role::from_parts("superuser", Some(Uuid::new_v4()), "root").unwrap();
        assert_eq!(role, Role::Superuser);
        assert_eq!(role.school_id(), None);
    }

    #[test]
    fn test_capability_predicates_are_monotonic() {
        let school = Uuid::new_v4();
        let superuser = Role::Superuser;
        let admin = Role::SchoolAdmin(school);
        let staff = Role::Staff(school);
        let student = Role::Student(school);

        assert!(superuser.is_school_admin_or_higher());
        assert!(superuser.is_staff_or_higher());
        assert!(admin.is_school_admin_or_higher());
        assert!(admin.is_staff_or_higher());
        assert!(staff.is_staff_or_higher());
        assert!(!staff.is_school_admin_or_higher());
        assert!(!student.is_staff_or_higher());
        assert!(student.is_student_or_higher());
    }

    #[test]
    fn test_require_helpers_name_the_missing_role() {
        let student = Role::Student(Uuid::new_v4());
        assert!(matches!(
            student.require_superuser(),
            Err(AppError::InsufficientRole(RoleRequirement::Superuser))
        ));
        assert!(matches!(
            student.require_school_admin(),
            Err(AppError::InsufficientRole(RoleRequirement::SchoolAdmin))
        ));
        assert!(matches!(
            student.require_staff(),
            Err(AppError::InsufficientRole(RoleRequirement::Staff))
        ));
    }
}
