//! In-process store with the same semantics as the MongoDB backend

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{MentorStore, StudentStore};
use crate::error::{Error, Result};
use crate::types::{BulkAssignment, Mentor, Student};

#[derive(Debug, Clone)]
struct MentorRecord {
    name: String,
    email: String,
}

#[derive(Debug, Clone)]
struct StudentRecord {
    name: String,
    email: String,
    mentor: Option<ObjectId>,
}

impl MentorRecord {
    fn to_mentor(&self, id: &ObjectId) -> Mentor {
        Mentor {
            id: id.to_hex(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl StudentRecord {
    fn to_student(&self, id: &ObjectId) -> Student {
        Student {
            id: id.to_hex(),
            name: self.name.clone(),
            email: self.email.clone(),
            mentor: self.mentor.map(|m| m.to_hex()),
        }
    }
}

/// Map-backed store used by tests and `--in-memory` runs.
///
/// Keys are ObjectIds, so iteration order is creation order.
#[derive(Default)]
pub struct MemoryStore {
    mentors: RwLock<BTreeMap<ObjectId, MentorRecord>>,
    students: RwLock<BTreeMap<ObjectId, StudentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn students_where<F>(&self, predicate: F) -> Vec<Student>
    where
        F: Fn(&StudentRecord) -> bool,
    {
        let students = self.students.read().await;
        students
            .iter()
            .filter(|(_, record)| predicate(record))
            .map(|(id, record)| record.to_student(id))
            .collect()
    }
}

#[async_trait]
impl MentorStore for MemoryStore {
    async fn create_mentor(&self, name: String, email: String) -> Result<Mentor> {
        let id = ObjectId::new();
        let record = MentorRecord { name, email };
        let mentor = record.to_mentor(&id);

        let mut mentors = self.mentors.write().await;
        mentors.insert(id, record);
        Ok(mentor)
    }

    async fn get_mentor(&self, id: ObjectId) -> Result<Option<Mentor>> {
        let mentors = self.mentors.read().await;
        Ok(mentors.get(&id).map(|record| record.to_mentor(&id)))
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn create_student(&self, name: String, email: String) -> Result<Student> {
        let id = ObjectId::new();
        let record = StudentRecord {
            name,
            email,
            mentor: None,
        };
        let student = record.to_student(&id);

        let mut students = self.students.write().await;
        students.insert(id, record);
        Ok(student)
    }

    async fn set_mentor(&self, student_id: ObjectId, mentor_id: ObjectId) -> Result<Student> {
        let mut students = self.students.write().await;
        let record = students
            .get_mut(&student_id)
            .ok_or_else(|| Error::student_not_found(student_id))?;

        record.mentor = Some(mentor_id);
        Ok(record.to_student(&student_id))
    }

    async fn set_mentor_bulk(
        &self,
        student_ids: &[ObjectId],
        mentor_id: ObjectId,
    ) -> Result<BulkAssignment> {
        let wanted: HashSet<&ObjectId> = student_ids.iter().collect();

        let mut matched_count = 0;
        let mut modified_count = 0;

        let mut students = self.students.write().await;
        for id in wanted {
            let Some(record) = students.get_mut(id) else {
                continue;
            };
            matched_count += 1;
            if record.mentor != Some(mentor_id) {
                record.mentor = Some(mentor_id);
                modified_count += 1;
            }
        }

        Ok(BulkAssignment {
            matched_count,
            modified_count,
        })
    }

    async fn list_unassigned(&self) -> Result<Vec<Student>> {
        Ok(self.students_where(|s| s.mentor.is_none()).await)
    }

    async fn list_by_mentor(&self, mentor_id: ObjectId) -> Result<Vec<Student>> {
        Ok(self
            .students_where(|s| s.mentor == Some(mentor_id))
            .await)
    }

    async fn get_mentor_of(&self, student_id: ObjectId) -> Result<Option<Mentor>> {
        let mentor_id = {
            let students = self.students.read().await;
            students
                .get(&student_id)
                .ok_or_else(|| Error::student_not_found(student_id))?
                .mentor
        };

        match mentor_id {
            Some(mentor_id) => self.get_mentor(mentor_id).await,
            None => Ok(None),
        }
    }
}
