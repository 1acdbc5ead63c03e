//! Document collection endpoints

use async_trait::async_trait;
use common::ServiceResult;
use reqwest::Method;
use serde_json::{Value, json};

use super::AppwriteClient;
use crate::backend::{DocumentApi, Query};
use crate::models::DocumentList;

fn documents_path(database_id: &str, collection_id: &str) -> String {
    format!(
        "/databases/{}/collections/{}/documents",
        database_id, collection_id
    )
}

#[async_trait]
impl DocumentApi for AppwriteClient {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> ServiceResult<DocumentList> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_query_string()))
            .collect();

        let request = self
            .http
            .request(Method::GET, self.url(&documents_path(database_id, collection_id)))
            .query(&params);

        self.send_json(request).await
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> ServiceResult<Value> {
        let request = self
            .http
            .request(Method::POST, self.url(&documents_path(database_id, collection_id)))
            .json(&json!({
                "documentId": document_id,
                "data": data,
            }));

        self.send_json(request).await
    }
}
