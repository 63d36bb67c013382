/*
[INPUT]:  GraphQL document, root field name, variables, optional session
[OUTPUT]: JSON value found under the root field, or a typed error
[POS]:    HTTP layer - GraphQL envelope handling
[UPDATE]: When error envelope handling or transport mapping changes
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::auth::Session;
use crate::http::{LensClient, LensError, Result};

const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

impl LensClient {
    /// Execute a query or mutation and return `data.<field>`.
    ///
    /// Transport failures surface as `Http`, non-2xx statuses as `Api`, and a
    /// non-empty `errors` array as `GraphQl`.
    pub(crate) async fn execute(
        &self,
        document: &str,
        field: &str,
        variables: Value,
        session: Option<&Session>,
    ) -> Result<Value> {
        debug!(field, authenticated = session.is_some(), "sending graphql request");

        let response = self
            .graphql_request(session)
            .json(&GraphQlRequest {
                query: document,
                variables: &variables,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LensError::api_error(status, truncate(&body)));
        }

        let envelope: GraphQlResponse = serde_json::from_str(&body)?;
        if !envelope.errors.is_empty() {
            return Err(LensError::GraphQl {
                messages: envelope.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        let mut data = envelope
            .data
            .ok_or_else(|| LensError::InvalidResponse("response carried no data".to_string()))?;
        data.get_mut(field)
            .map(Value::take)
            .ok_or_else(|| LensError::InvalidResponse(format!("response data missing `{field}`")))
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
