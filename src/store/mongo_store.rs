//! MongoDB-backed store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::{MentorStore, StudentStore};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{BulkAssignment, Mentor, Student};

const MENTORS: &str = "mentors";
const STUDENTS: &str = "students";

#[derive(Debug, Serialize, Deserialize)]
struct MentorDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StudentDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mentor: Option<ObjectId>,
}

impl From<MentorDocument> for Mentor {
    fn from(doc: MentorDocument) -> Self {
        Mentor {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
        }
    }
}

impl From<StudentDocument> for Student {
    fn from(doc: StudentDocument) -> Self {
        Student {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
            mentor: doc.mentor.map(|m| m.to_hex()),
        }
    }
}

/// Store over the `mentors` and `students` collections of one database
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect, verify the server answers a ping, and select the database.
    ///
    /// The database named in the connection string wins over `config.database_name`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Client::with_uri_str(&config.database_url).await?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.database_name));

        tracing::info!("Connected to MongoDB database '{}'", db.name());
        Ok(Self::new(db))
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn mentors(&self) -> Collection<MentorDocument> {
        self.db.collection(MENTORS)
    }

    fn students(&self) -> Collection<StudentDocument> {
        self.db.collection(STUDENTS)
    }

    async fn find_students(&self, filter: Document) -> Result<Vec<Student>> {
        let cursor = self.students().find(filter).sort(doc! { "_id": 1 }).await?;
        let docs: Vec<StudentDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Student::from).collect())
    }
}

#[async_trait]
impl MentorStore for MongoStore {
    async fn create_mentor(&self, name: String, email: String) -> Result<Mentor> {
        let doc = MentorDocument {
            id: ObjectId::new(),
            name,
            email,
        };
        self.mentors().insert_one(&doc).await?;
        tracing::debug!("Created mentor {}", doc.id);
        Ok(doc.into())
    }

    async fn get_mentor(&self, id: ObjectId) -> Result<Option<Mentor>> {
        let found = self.mentors().find_one(doc! { "_id": id }).await?;
        Ok(found.map(Mentor::from))
    }
}

#[async_trait]
impl StudentStore for MongoStore {
    async fn create_student(&self, name: String, email: String) -> Result<Student> {
        let doc = StudentDocument {
            id: ObjectId::new(),
            name,
            email,
            mentor: None,
        };
        self.students().insert_one(&doc).await?;
        tracing::debug!("Created student {}", doc.id);
        Ok(doc.into())
    }

    async fn set_mentor(&self, student_id: ObjectId, mentor_id: ObjectId) -> Result<Student> {
        let updated = self
            .students()
            .find_one_and_update(
                doc! { "_id": student_id },
                doc! { "$set": { "mentor": mentor_id } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        updated
            .map(Student::from)
            .ok_or_else(|| Error::student_not_found(student_id))
    }

    async fn set_mentor_bulk(
        &self,
        student_ids: &[ObjectId],
        mentor_id: ObjectId,
    ) -> Result<BulkAssignment> {
        if student_ids.is_empty() {
            return Ok(BulkAssignment {
                matched_count: 0,
                modified_count: 0,
            });
        }

        let result = self
            .students()
            .update_many(
                doc! { "_id": { "$in": student_ids.to_vec() } },
                doc! { "$set": { "mentor": mentor_id } },
            )
            .await?;

        Ok(BulkAssignment {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn list_unassigned(&self) -> Result<Vec<Student>> {
        // `null` matches both a missing field and an explicit null
        self.find_students(doc! { "mentor": null }).await
    }

    async fn list_by_mentor(&self, mentor_id: ObjectId) -> Result<Vec<Student>> {
        self.find_students(doc! { "mentor": mentor_id }).await
    }

    async fn get_mentor_of(&self, student_id: ObjectId) -> Result<Option<Mentor>> {
        let student = self
            .students()
            .find_one(doc! { "_id": student_id })
            .await?
            .ok_or_else(|| Error::student_not_found(student_id))?;

        match student.mentor {
            Some(mentor_id) => self.get_mentor(mentor_id).await,
            None => Ok(None),
        }
    }
}
