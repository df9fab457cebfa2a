//! Remote Store Layer - Hosted REST Store
//!
//! [`StoreClient`] implementation for a hosted tabular store speaking the
//! PostgREST dialect: `GET <base>/<table>?select=*&order=timestamp.desc`,
//! `POST` with `Prefer: return=representation` where rows are needed back,
//! `PATCH`/`DELETE` with `id=eq.<id>` filters. Authentication is an API
//! key sent as both `apikey` and bearer token.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::domain::{
    Category, DomainError, DomainResult, NewCategory, NewQuestion, NewSubcategory, Question,
    Subcategory,
};
use super::traits::StoreClient;

const TABLE_CATEGORIES: &str = "categories";
const TABLE_SUBCATEGORIES: &str = "subcategories";
const TABLE_QUESTIONS: &str = "questions";

/// Ordering applied to every select: creation time, newest first
const ORDER_NEWEST_FIRST: &str = "timestamp.desc";

/// REST client for the remote store
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: &Config) -> DomainResult<Self> {
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| DomainError::Config(format!("invalid api key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| DomainError::Config(format!("invalid api key: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Map a non-success response to a `DomainError::Remote`
    async fn check(table: &str, response: reqwest::Response) -> DomainResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DomainError::Remote(format!(
            "{}: HTTP {} {}",
            table,
            status.as_u16(),
            body
        )))
    }

    async fn select_all<T: DeserializeOwned + Send>(&self, table: &str) -> DomainResult<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("order", ORDER_NEWEST_FIRST)])
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("{}: {}", table, e)))?;

        Self::check(table, response)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| DomainError::Remote(format!("{}: decode: {}", table, e)))
    }

    /// Insert rows and decode the generated rows from the response
    async fn insert_returning<B, T>(&self, table: &str, rows: &B) -> DomainResult<Vec<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("{}: {}", table, e)))?;

        Self::check(table, response)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| DomainError::Remote(format!("{}: decode: {}", table, e)))
    }

    /// Insert rows without asking for the generated rows back
    async fn insert_minimal<B>(&self, table: &str, rows: &B) -> DomainResult<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("{}: {}", table, e)))?;

        Self::check(table, response).await.map(|_| ())
    }

    async fn delete_by_id(&self, table: &str, id: &str) -> DomainResult<()> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("{}: {}", table, e)))?;

        Self::check(table, response).await.map(|_| ())
    }
}

#[async_trait]
impl StoreClient for HttpStore {
    async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        self.select_all(TABLE_CATEGORIES).await
    }

    async fn list_subcategories(&self) -> DomainResult<Vec<Subcategory>> {
        self.select_all(TABLE_SUBCATEGORIES).await
    }

    async fn list_questions(&self) -> DomainResult<Vec<Question>> {
        self.select_all(TABLE_QUESTIONS).await
    }

    async fn create_category(&self, row: &NewCategory) -> DomainResult<Category> {
        self.insert_returning(TABLE_CATEGORIES, std::slice::from_ref(row))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Remote("categories: empty insert response".to_string()))
    }

    async fn create_subcategory(&self, row: &NewSubcategory) -> DomainResult<Subcategory> {
        self.insert_returning(TABLE_SUBCATEGORIES, std::slice::from_ref(row))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Remote("subcategories: empty insert response".to_string()))
    }

    async fn create_questions(&self, rows: &[NewQuestion]) -> DomainResult<()> {
        self.insert_minimal(TABLE_QUESTIONS, rows).await
    }

    async fn set_question_completed(&self, id: &str, completed: bool) -> DomainResult<()> {
        let response = self
            .client
            .patch(self.table_url(TABLE_QUESTIONS))
            .query(&[("id", format!("eq.{}", id))])
            .json(&serde_json::json!({ "completed": completed }))
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("{}: {}", TABLE_QUESTIONS, e)))?;

        Self::check(TABLE_QUESTIONS, response).await.map(|_| ())
    }

    async fn delete_category(&self, id: &str) -> DomainResult<()> {
        self.delete_by_id(TABLE_CATEGORIES, id).await
    }

    async fn delete_subcategory(&self, id: &str) -> DomainResult<()> {
        self.delete_by_id(TABLE_SUBCATEGORIES, id).await
    }

    async fn delete_question(&self, id: &str) -> DomainResult<()> {
        self.delete_by_id(TABLE_QUESTIONS, id).await
    }

    async fn restore_category(&self, row: &Category) -> DomainResult<()> {
        self.insert_minimal(TABLE_CATEGORIES, std::slice::from_ref(row))
            .await
    }

    async fn restore_subcategory(&self, row: &Subcategory) -> DomainResult<()> {
        self.insert_minimal(TABLE_SUBCATEGORIES, std::slice::from_ref(row))
            .await
    }

    async fn restore_questions(&self, rows: &[Question]) -> DomainResult<()> {
        self.insert_minimal(TABLE_QUESTIONS, rows).await
    }
}
