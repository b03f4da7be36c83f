//! In-memory store.
//!
//! Mirrors the PostgreSQL semantics closely enough for the HTTP tests:
//! unique emails, one OTP per `(email, purpose)`, one enrollment per
//! `(user, course)`, and cascading deletes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use edugate_auth::{OtpPurpose, OtpRecord};
use edugate_models::{
    Course, CourseEnrollee, EnrolledCourse, Enrollment, NewCourse, NewUser, UpdateCourseDto,
    UpdateProfileDto, UserRecord,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{CourseStore, EnrollmentStore, OtpStore, StoreError, UserStore};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserRecord>,
    otps: HashMap<(String, OtpPurpose), OtpRecord>,
    courses: HashMap<Uuid, Course>,
    enrollments: Vec<Enrollment>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

/// Slices one page out of an already ordered list.
fn paginate<T>(mut items: Vec<T>, limit: i64, offset: i64) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let offset = offset.max(0) as usize;
    let limit = limit.max(0) as usize;
    let page = if offset >= items.len() {
        Vec::new()
    } else {
        items.drain(offset..).take(limit).collect()
    };
    (page, total)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("User"));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_verified: user.is_verified,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn list_users(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UserRecord>, i64), StoreError> {
        let state = self.state.read().await;
        let mut users: Vec<UserRecord> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(users, limit, offset))
    }

    async fn mark_user_verified(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.is_verified = true;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &UpdateProfileDto,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(first_name) = &changes.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &changes.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(bio) = &changes.bio {
            user.bio = Some(bio.clone());
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let Some(removed) = state.users.remove(&id) else {
            return Ok(false);
        };
        state.otps.retain(|(email, _), _| *email != removed.email);

        let owned: Vec<Uuid> = state
            .courses
            .values()
            .filter(|c| c.instructor_id == id)
            .map(|c| c.id)
            .collect();
        for course_id in &owned {
            state.courses.remove(course_id);
        }
        state
            .enrollments
            .retain(|e| e.user_id != id && !owned.contains(&e.course_id));
        Ok(true)
    }
}

#[async_trait]
impl OtpStore for MemoryStore {
    async fn upsert_otp(&self, record: OtpRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .otps
            .insert((record.email.clone(), record.purpose), record);
        Ok(())
    }

    async fn find_otp(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state.otps.get(&(email.to_string(), purpose)).cloned())
    }

    async fn delete_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.otps.remove(&(email.to_string(), purpose));
        Ok(())
    }

    async fn record_otp_failure(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<i32>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state
            .otps
            .get_mut(&(email.to_string(), purpose))
            .map(|record| {
                record.attempts += 1;
                record.attempts
            }))
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn create_course(&self, course: NewCourse) -> Result<Course, StoreError> {
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            title: course.title,
            description: course.description,
            instructor_id: course.instructor_id,
            created_at: now,
            updated_at: now,
        };
        let mut state = self.state.write().await;
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, StoreError> {
        Ok(self.state.read().await.courses.get(&id).cloned())
    }

    async fn list_courses(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Course>, i64), StoreError> {
        let state = self.state.read().await;
        let mut courses: Vec<Course> = state.courses.values().cloned().collect();
        courses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(courses, limit, offset))
    }

    async fn update_course(
        &self,
        id: Uuid,
        changes: &UpdateCourseDto,
    ) -> Result<Option<Course>, StoreError> {
        let mut state = self.state.write().await;
        let Some(course) = state.courses.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            course.title = title.clone();
        }
        if let Some(description) = &changes.description {
            course.description = Some(description.clone());
        }
        course.updated_at = Utc::now();
        Ok(Some(course.clone()))
    }

    async fn delete_course(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if state.courses.remove(&id).is_none() {
            return Ok(false);
        }
        state.enrollments.retain(|e| e.course_id != id);
        Ok(true)
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<Enrollment, StoreError> {
        let mut state = self.state.write().await;
        if state
            .enrollments
            .iter()
            .any(|e| e.user_id == user_id && e.course_id == course_id)
        {
            return Err(StoreError::Duplicate("Enrollment"));
        }

        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            enrolled_at: Utc::now(),
        };
        state.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn unenroll(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let before = state.enrollments.len();
        state
            .enrollments
            .retain(|e| !(e.user_id == user_id && e.course_id == course_id));
        Ok(state.enrollments.len() < before)
    }

    async fn list_enrolled_courses(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EnrolledCourse>, StoreError> {
        let state = self.state.read().await;
        let courses = state
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter_map(|e| {
                state.courses.get(&e.course_id).map(|c| EnrolledCourse {
                    course_id: c.id,
                    title: c.title.clone(),
                    description: c.description.clone(),
                    instructor_id: c.instructor_id,
                    enrolled_at: e.enrolled_at,
                })
            })
            .collect();
        Ok(courses)
    }

    async fn list_course_enrollees(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<CourseEnrollee>, StoreError> {
        let state = self.state.read().await;
        let enrollees = state
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id)
            .filter_map(|e| {
                state.users.get(&e.user_id).map(|u| CourseEnrollee {
                    user_id: u.id,
                    email: u.email.clone(),
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    enrolled_at: e.enrolled_at,
                })
            })
            .collect();
        Ok(enrollees)
    }
}
