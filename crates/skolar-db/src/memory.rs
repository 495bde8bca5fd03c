//! In-memory registry.
//!
//! Implements every registry trait over a single mutex-guarded store. Used by
//! the integration tests and handy for local development without Postgres.
//! Uniqueness checks and provisioning atomicity mirror the Postgres
//! constraints: all checks run under one lock before anything is inserted.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use skolar_core::error::AppError;
use skolar_core::models::{
    NewSchool, NewStudent, NewUser, Role, School, SchoolUpdate, StudentRecord, User,
};
use skolar_core::registry::{
    NewSchoolAdmin, SchoolRegistry, StudentRecords, UserDirectory,
};
use skolar_core::routing_key;

#[derive(Default)]
struct Inner {
    schools: Vec<School>,
    users: Vec<User>,
    students: Vec<StudentRecord>,
}

#[derive(Clone, Default)]
pub struct MemoryRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("registry lock poisoned")
    }

    /// Insert a user directly, bypassing uniqueness checks. Test setup only.
    pub fn seed_user(&self, user: User) {
        self.lock().users.push(user);
    }
}

fn new_user_record(user: NewUser) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: user.username,
        email: user.email,
        password_hash: user.password_hash,
        role: user.role,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl SchoolRegistry for MemoryRegistry {
    async fn find_by_routing_key(&self, key: &str) -> Result<Option<School>, AppError> {
        let key = routing_key::normalize(key);
        Ok(self
            .lock()
            .schools
            .iter()
            .find(|s| s.routing_key == key)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, AppError> {
        Ok(self.lock().schools.iter().find(|s| s.id == id).cloned())
    }

    async fn find_earliest(&self) -> Result<Option<School>, AppError> {
        Ok(self
            .lock()
            .schools
            .iter()
            .min_by_key(|s| s.created_at)
            .cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock().schools.len() as i64)
    }

    async fn list(&self) -> Result<Vec<School>, AppError> {
        let mut schools = self.lock().schools.clone();
        schools.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(schools)
    }

    async fn create_with_admin(
        &self,
        school: NewSchool,
        admin: NewSchoolAdmin,
    ) -> Result<(School, User), AppError> {
        let mut inner = self.lock();

        // All uniqueness checks happen before either insert so a failure
        // leaves the store untouched, matching the Postgres transaction.
        let key = routing_key::normalize(&school.routing_key);
        if inner.schools.iter().any(|s| s.routing_key == key) {
            return Err(AppError::DuplicateRoutingKey(key));
        }
        if inner.schools.iter().any(|s| s.name == school.name) {
            return Err(AppError::InvalidInput(
                "School name is already in use".to_string(),
            ));
        }
        if inner.users.iter().any(|u| u.username == admin.username) {
            return Err(AppError::InvalidInput(
                "Username is already in use".to_string(),
            ));
        }

        let now = Utc::now();
        let created = School {
            id: Uuid::new_v4(),
            name: school.name,
            routing_key: key,
            logo_url: school.logo_url,
            primary_color: school.primary_color,
            secondary_color: school.secondary_color,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let admin_user = new_user_record(NewUser {
            username: admin.username,
            email: admin.email,
            password_hash: admin.password_hash,
            role: Role::SchoolAdmin(created.id),
        });

        inner.schools.push(created.clone());
        inner.users.push(admin_user.clone());

        Ok((created, admin_user))
    }

    async fn update(&self, id: Uuid, update: SchoolUpdate) -> Result<School, AppError> {
        let mut inner = self.lock();
        let school = inner
            .schools
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;

        if let Some(name) = update.name {
            school.name = name;
        }
        if let Some(logo_url) = update.logo_url {
            school.logo_url = Some(logo_url);
        }
        if let Some(primary) = update.primary_color {
            school.primary_color = primary;
        }
        if let Some(secondary) = update.secondary_color {
            school.secondary_color = secondary;
        }
        school.updated_at = Utc::now();

        Ok(school.clone())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<School, AppError> {
        let mut inner = self.lock();
        let school = inner
            .schools
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;

        school.is_active = is_active;
        school.updated_at = Utc::now();
        Ok(school.clone())
    }
}

#[async_trait]
impl UserDirectory for MemoryRegistry {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::InvalidInput(
                "Username is already in use".to_string(),
            ));
        }
        let created = new_user_record(user);
        inner.users.push(created.clone());
        Ok(created)
    }

    async fn list_for_school(&self, school_id: Uuid) -> Result<Vec<User>, AppError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| u.role.school_id() == Some(school_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StudentRecords for MemoryRegistry {
    async fn create(&self, student: NewStudent) -> Result<StudentRecord, AppError> {
        let mut inner = self.lock();
        if inner
            .students
            .iter()
            .any(|s| s.school_id == student.school_id && s.enrollment_no == student.enrollment_no)
        {
            return Err(AppError::InvalidInput(
                "Enrollment number is already in use".to_string(),
            ));
        }
        let record = StudentRecord {
            id: Uuid::new_v4(),
            school_id: student.school_id,
            full_name: student.full_name,
            enrollment_no: student.enrollment_no,
            created_at: Utc::now(),
        };
        inner.students.push(record.clone());
        Ok(record)
    }

    async fn list_for_school(&self, school_id: Uuid) -> Result<Vec<StudentRecord>, AppError> {
        Ok(self
            .lock()
            .students
            .iter()
            .filter(|s| s.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn find_for_school(
        &self,
        school_id: Uuid,
        id: Uuid,
    ) -> Result<Option<StudentRecord>, AppError> {
        Ok(self
            .lock()
            .students
            .iter()
            .find(|s| s.school_id == school_id && s.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_school(name: &str, key: &str) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            routing_key: key.to_string(),
            logo_url: None,
            primary_color: "#007bff".to_string(),
            secondary_color: "#6c757d".to_string(),
        }
    }

    fn new_admin(username: &str) -> NewSchoolAdmin {
        NewSchoolAdmin {
            username: username.to_string(),
            email: None,
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_provisioning_creates_school_and_admin() {
        let registry = MemoryRegistry::new();
        let (school, admin) = registry
            .create_with_admin(new_school("Greenwood High", "greenwood"), new_admin("gw_admin"))
            .await
            .unwrap();

        assert_eq!(admin.role, Role::SchoolAdmin(school.id));
        assert_eq!(registry.count().await.unwrap(), 1);
        assert!(registry
            .find_by_routing_key("GREENWOOD")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_routing_key_is_case_insensitive() {
        let registry = MemoryRegistry::new();
        registry
            .create_with_admin(new_school("Greenwood High", "greenwood"), new_admin("a1"))
            .await
            .unwrap();

        let err = registry
            .create_with_admin(new_school("Other School", "GreenWood"), new_admin("a2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateRoutingKey(_)));
        assert_eq!(registry.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_admin_leaves_no_orphan_school() {
        let registry = MemoryRegistry::new();
        registry
            .create_with_admin(new_school("Greenwood High", "greenwood"), new_admin("taken"))
            .await
            .unwrap();

        // Same admin username fails; the second school must not exist after.
        let err = registry
            .create_with_admin(new_school("Riverside Academy", "riverside"), new_admin("taken"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(registry.count().await.unwrap(), 1);
        assert!(registry
            .find_by_routing_key("riverside")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_earliest_orders_by_creation() {
        let registry = MemoryRegistry::new();
        let (first, _) = registry
            .create_with_admin(new_school("First", "first"), new_admin("a1"))
            .await
            .unwrap();
        registry
            .create_with_admin(new_school("Second", "second"), new_admin("a2"))
            .await
            .unwrap();

        assert_eq!(registry.find_earliest().await.unwrap().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_student_lookup_is_scoped() {
        let registry = MemoryRegistry::new();
        let (greenwood, _) = registry
            .create_with_admin(new_school("Greenwood", "greenwood"), new_admin("a1"))
            .await
            .unwrap();
        let (riverside, _) = registry
            .create_with_admin(new_school("Riverside", "riverside"), new_admin("a2"))
            .await
            .unwrap();

        let record = StudentRecords::create(
            &registry,
            NewStudent {
                school_id: greenwood.id,
                full_name: "Ada Mensah".to_string(),
                enrollment_no: "GW-2026-1".to_string(),
            },
        )
        .await
        .unwrap();

        // Visible inside its own school, invisible from the other.
        assert!(registry
            .find_for_school(greenwood.id, record.id)
            .await
            .unwrap()
            .is_some());
        assert!(registry
            .find_for_school(riverside.id, record.id)
            .await
            .unwrap()
            .is_none());
        assert!(StudentRecords::list_for_school(&registry, riverside.id)
            .await
            .unwrap()
            .is_empty());
    }
}
