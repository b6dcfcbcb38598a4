//! Storage layer for mentors and students

mod memory_store;
mod mongo_store;

pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::Result;
use crate::types::{BulkAssignment, Mentor, Student};

/// Mentor persistence
#[async_trait]
pub trait MentorStore: Send + Sync {
    /// Persist a new mentor with a freshly generated id
    async fn create_mentor(&self, name: String, email: String) -> Result<Mentor>;

    async fn get_mentor(&self, id: ObjectId) -> Result<Option<Mentor>>;
}

/// Student persistence and mentor assignment
///
/// Assignment never checks that the mentor exists; any well-formed id is stored.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Persist a new, unassigned student
    async fn create_student(&self, name: String, email: String) -> Result<Student>;

    /// Overwrite a student's mentor and return the updated student.
    /// Fails with `NotFound` when the student does not exist.
    async fn set_mentor(&self, student_id: ObjectId, mentor_id: ObjectId) -> Result<Student>;

    /// Overwrite the mentor of every listed student that exists; unknown ids are skipped
    async fn set_mentor_bulk(
        &self,
        student_ids: &[ObjectId],
        mentor_id: ObjectId,
    ) -> Result<BulkAssignment>;

    /// Students with no mentor, oldest first
    async fn list_unassigned(&self) -> Result<Vec<Student>>;

    /// Students currently assigned to `mentor_id`, oldest first
    async fn list_by_mentor(&self, mentor_id: ObjectId) -> Result<Vec<Student>>;

    /// Resolve a student's current mentor.
    ///
    /// `Ok(None)` when the student is unassigned or the mentor record is gone;
    /// `NotFound` when the student itself does not exist.
    async fn get_mentor_of(&self, student_id: ObjectId) -> Result<Option<Mentor>>;
}
