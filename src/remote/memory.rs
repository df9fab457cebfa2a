//! Remote Store Layer - In-Memory Store
//!
//! [`StoreClient`] implementation backed by in-memory tables. Stands in
//! for the hosted store in the test-suite and offline runs: sequential
//! server-assigned identifiers, creation timestamps, and the referential
//! rules the hosted store enforces on delete (a category delete takes its
//! subcategories and questions with it).
//!
//! Write failures can be injected, and every write call is counted, so
//! tests can assert "no remote call issued" and "no local mutation on
//! failure".

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    remove_by_id, Category, DomainError, DomainResult, NewCategory, NewQuestion, NewSubcategory,
    ParentKind, Question, Subcategory,
};
use super::traits::StoreClient;

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    questions: Vec<Question>,
}

/// In-memory implementation of the remote store
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    next_id: AtomicUsize,
    write_calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write call fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of write calls received so far (failed ones included)
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Count the write and apply injected failure
    fn begin_write(&self) -> DomainResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::Remote("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Newest first; ties resolved toward the later insert
fn newest_first<T, K>(rows: &[T], timestamp: K) -> Vec<T>
where
    T: Clone,
    K: Fn(&T) -> chrono::DateTime<Utc>,
{
    let mut sorted: Vec<T> = rows.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| timestamp(b).cmp(&timestamp(a)));
    sorted
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(&tables.categories, |c| c.timestamp))
    }

    async fn list_subcategories(&self) -> DomainResult<Vec<Subcategory>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(&tables.subcategories, |s| s.timestamp))
    }

    async fn list_questions(&self) -> DomainResult<Vec<Question>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(&tables.questions, |q| q.timestamp))
    }

    async fn create_category(&self, row: &NewCategory) -> DomainResult<Category> {
        self.begin_write()?;
        let stored = Category {
            id: self.next_id("c"),
            name: row.name.clone(),
            icon: row.icon.clone(),
            timestamp: Utc::now(),
            user_id: None,
        };
        self.tables.lock().await.categories.push(stored.clone());
        Ok(stored)
    }

    async fn create_subcategory(&self, row: &NewSubcategory) -> DomainResult<Subcategory> {
        self.begin_write()?;
        let stored = Subcategory {
            id: self.next_id("s"),
            name: row.name.clone(),
            category_id: row.category_id.clone(),
            timestamp: Utc::now(),
        };
        self.tables.lock().await.subcategories.push(stored.clone());
        Ok(stored)
    }

    async fn create_questions(&self, rows: &[NewQuestion]) -> DomainResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        for row in rows {
            let stored = Question {
                id: self.next_id("q"),
                category_id: row.category_id.clone(),
                parent_id: row.parent_id.clone(),
                parent_type: row.parent_type,
                title: row.title.clone(),
                completed: row.completed,
                timestamp: Utc::now(),
                user_id: None,
            };
            tables.questions.push(stored);
        }
        Ok(())
    }

    async fn set_question_completed(&self, id: &str, completed: bool) -> DomainResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        // Matching zero rows is not an error, same as the hosted store.
        if let Some(question) = tables.questions.iter_mut().find(|q| q.id == id) {
            question.completed = completed;
        }
        Ok(())
    }

    async fn delete_category(&self, id: &str) -> DomainResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        remove_by_id(&mut tables.categories, &id.to_string());
        tables.subcategories.retain(|s| s.category_id != id);
        tables.questions.retain(|q| q.category_id != id);
        Ok(())
    }

    async fn delete_subcategory(&self, id: &str) -> DomainResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        remove_by_id(&mut tables.subcategories, &id.to_string());
        tables
            .questions
            .retain(|q| !q.has_parent(ParentKind::Subcategory, id));
        Ok(())
    }

    async fn delete_question(&self, id: &str) -> DomainResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        remove_by_id(&mut tables.questions, &id.to_string());
        Ok(())
    }

    async fn restore_category(&self, row: &Category) -> DomainResult<()> {
        self.begin_write()?;
        self.tables.lock().await.categories.push(row.clone());
        Ok(())
    }

    async fn restore_subcategory(&self, row: &Subcategory) -> DomainResult<()> {
        self.begin_write()?;
        self.tables.lock().await.subcategories.push(row.clone());
        Ok(())
    }

    async fn restore_questions(&self, rows: &[Question]) -> DomainResult<()> {
        self.begin_write()?;
        self.tables.lock().await.questions.extend(rows.iter().cloned());
        Ok(())
    }
}
