// src/services/sheets_service.rs

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use yup_oauth2::authenticator::Authenticator;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

use crate::errors::{AppError, Result};
use crate::services::tabular_store::{Row, TabularStore};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

// Size of a sheet created by ensure_table
const NEW_SHEET_ROWS: u32 = 1000;
const NEW_SHEET_COLS: u32 = 10;

type HyperConnector = yup_oauth2::hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;
type AuthType = Authenticator<HyperConnector>;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Google Sheets REST client. One spreadsheet, one sheet per table.
pub struct SheetsService {
    authenticator: Arc<Mutex<AuthType>>,
    client: Client,
    spreadsheet_id: String,
}

impl SheetsService {
    pub async fn new(
        spreadsheet_id: String,
        service_account_path: &Path,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let service_account_key = read_service_account_key(service_account_path)
            .await
            .map_err(|e| anyhow!("Failed to read service account key: {}", e))?;

        let authenticator = ServiceAccountAuthenticator::builder(service_account_key)
            .build()
            .await
            .map_err(|e| anyhow!("Failed to build authenticator: {}", e))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            authenticator: Arc::new(Mutex::new(authenticator)),
            client,
            spreadsheet_id,
        })
    }

    async fn get_access_token(&self) -> Result<String> {
        let auth = self.authenticator.lock().await;

        let token = auth
            .token(&[SHEETS_SCOPE])
            .await
            .map_err(|e| AppError::store_unavailable(format!("Failed to get token: {}", e)))?;

        token
            .token()
            .map(|t| t.to_string())
            .ok_or_else(|| AppError::store_unavailable("Access token was empty"))
    }

    async fn sheet_titles(&self) -> Result<Vec<String>> {
        let mut url = spreadsheet_url(&self.spreadsheet_id)?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties.title");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.get_access_token().await?)
            .send()
            .await?;
        let meta: SpreadsheetMeta = check_response(response, "spreadsheet").await?.json().await?;

        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    async fn clear_range(&self, table: &str, range: &str) -> Result<()> {
        let response = self
            .client
            .post(values_url(&self.spreadsheet_id, range, ":clear")?)
            .bearer_auth(self.get_access_token().await?)
            .json(&json!({}))
            .send()
            .await?;
        check_response(response, table).await?;
        Ok(())
    }
}

fn spreadsheet_url(spreadsheet_id: &str) -> Result<Url> {
    let mut url =
        Url::parse(SHEETS_BASE_URL).map_err(|e| AppError::internal_server_error(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| AppError::internal_server_error("Sheets base URL cannot be a base"))?
        .push(spreadsheet_id);
    Ok(url)
}

/// `.../values/{range}{suffix}`, with the range percent-encoded as one segment.
fn values_url(spreadsheet_id: &str, range: &str, suffix: &str) -> Result<Url> {
    let mut url = spreadsheet_url(spreadsheet_id)?;
    url.path_segments_mut()
        .map_err(|_| AppError::internal_server_error("Sheets base URL cannot be a base"))?
        .push("values")
        .push(&format!("{}{}", range, suffix));
    Ok(url)
}

fn batch_update_url(spreadsheet_id: &str) -> Result<Url> {
    let mut url =
        Url::parse(SHEETS_BASE_URL).map_err(|e| AppError::internal_server_error(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| AppError::internal_server_error("Sheets base URL cannot be a base"))?
        .push(&format!("{}:batchUpdate", spreadsheet_id));
    Ok(url)
}

/// Everything below the first `row_count` rows.
fn tail_range(table: &str, row_count: usize) -> String {
    format!("{}!A{}:Z", table, row_count + 1)
}

// values.get drops trailing empty cells and values.update leaves cells past
// the end of a short row as they were. Every row is written at the full
// table width so no cell of a shifted row survives.
fn pad_rows(mut rows: Vec<Row>) -> Vec<Row> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}

fn update_body(range: &str, rows: Vec<Row>) -> Value {
    json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": pad_rows(rows),
    })
}

/// Map Sheets API failures onto the store error taxonomy.
async fn check_response(response: Response, table: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!("Sheets API error on {}: {} - {}", table, status, body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::store_unavailable(
            format!("Sheets authorization failed: {}", status),
        )),
        StatusCode::NOT_FOUND => Err(AppError::ResourceNotFound(table.to_string())),
        StatusCode::BAD_REQUEST if body.contains("Unable to parse range") => {
            Err(AppError::ResourceNotFound(table.to_string()))
        }
        s if s.is_server_error() => Err(AppError::store_unavailable(format!(
            "Sheets API returned {}",
            s
        ))),
        s => Err(AppError::external_api(format!("Sheets API returned {}: {}", s, body))),
    }
}

#[async_trait]
impl TabularStore for SheetsService {
    async fn fetch_all_rows(&self, table: &str) -> Result<Vec<Row>> {
        let mut url = values_url(&self.spreadsheet_id, table, "")?;
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.get_access_token().await?)
            .send()
            .await?;
        let range: ValueRange = check_response(response, table).await?.json().await?;

        tracing::debug!("Fetched {} rows from {}", range.values.len(), table);
        Ok(range.values)
    }

    async fn append_row(&self, table: &str, row: Row) -> Result<()> {
        let mut url = values_url(&self.spreadsheet_id, table, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response = self
            .client
            .post(url)
            .bearer_auth(self.get_access_token().await?)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        check_response(response, table).await?;
        Ok(())
    }

    async fn clear_all_rows(&self, table: &str) -> Result<()> {
        self.clear_range(table, table).await
    }

    // Writes the new rows over the top of the sheet first, then clears
    // whatever is left below them, so readers never see an empty table.
    async fn replace_all_rows(&self, table: &str, rows: Vec<Row>) -> Result<()> {
        if rows.is_empty() {
            return self.clear_all_rows(table).await;
        }

        let row_count = rows.len();
        let start = format!("{}!A1", table);
        let mut url = values_url(&self.spreadsheet_id, &start, "")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let response = self
            .client
            .put(url)
            .bearer_auth(self.get_access_token().await?)
            .json(&update_body(&start, rows))
            .send()
            .await?;
        check_response(response, table).await?;

        self.clear_range(table, &tail_range(table, row_count)).await?;

        tracing::info!("Replaced {} with {} rows", table, row_count);
        Ok(())
    }

    async fn ensure_table(&self, table: &str, header: &[&str]) -> Result<bool> {
        if self.sheet_titles().await?.iter().any(|t| t == table) {
            return Ok(false);
        }

        tracing::info!("Sheet {} not found, creating it", table);
        let response = self
            .client
            .post(batch_update_url(&self.spreadsheet_id)?)
            .bearer_auth(self.get_access_token().await?)
            .json(&json!({
                "requests": [{
                    "addSheet": {
                        "properties": {
                            "title": table,
                            "gridProperties": {
                                "rowCount": NEW_SHEET_ROWS,
                                "columnCount": NEW_SHEET_COLS,
                            }
                        }
                    }
                }]
            }))
            .send()
            .await?;
        check_response(response, table).await?;

        self.append_row(table, header.iter().map(|h| h.to_string()).collect())
            .await?;
        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        let mut url = spreadsheet_url(&self.spreadsheet_id)?;
        url.query_pairs_mut().append_pair("fields", "spreadsheetId");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.get_access_token().await?)
            .send()
            .await?;
        check_response(response, "spreadsheet").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prediction::{header_row, PREDICTIONS_HEADER};

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(http::Response::builder().status(status).body(body).unwrap())
    }

    #[tokio::test]
    async fn test_auth_failures_mean_store_unavailable() {
        for status in [401, 403] {
            let result = check_response(response(status, "denied"), "PALPITES").await;
            assert!(matches!(result, Err(AppError::StoreUnavailable(_))), "{}", status);
        }
    }

    #[tokio::test]
    async fn test_missing_sheet_is_not_found() {
        let result = check_response(response(404, ""), "PALPITES").await;
        assert!(matches!(result, Err(AppError::ResourceNotFound(ref t)) if t == "PALPITES"));

        let body = r#"{"error":{"code":400,"message":"Unable to parse range: PALPITES"}}"#;
        let result = check_response(response(400, body), "PALPITES").await;
        assert!(matches!(result, Err(AppError::ResourceNotFound(ref t)) if t == "PALPITES"));
    }

    #[tokio::test]
    async fn test_other_failures() {
        for status in [500, 503] {
            let result = check_response(response(status, "backend error"), "JOGOS").await;
            assert!(matches!(result, Err(AppError::StoreUnavailable(_))), "{}", status);
        }

        let result = check_response(response(400, "Invalid values[1][0]"), "JOGOS").await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));

        let result = check_response(response(429, "Quota exceeded"), "JOGOS").await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_success_passes_response_through() {
        let response = check_response(response(200, r#"{"values":[["a"]]}"#), "JOGOS")
            .await
            .unwrap();
        let range: ValueRange = response.json().await.unwrap();
        assert_eq!(range.values, vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_values_urls() {
        assert_eq!(
            values_url("sheet-id", "PALPITES", "").unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/PALPITES"
        );
        assert_eq!(
            values_url("sheet-id", "PALPITES!A3:Z", ":clear").unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/PALPITES!A3:Z:clear"
        );
        assert_eq!(
            values_url("sheet-id", "Minha Aba/2", ":append").unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/Minha%20Aba%2F2:append"
        );
        assert_eq!(
            batch_update_url("sheet-id").unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id:batchUpdate"
        );
    }

    #[test]
    fn test_tail_range_starts_after_written_rows() {
        assert_eq!(tail_range("PALPITES", 3), "PALPITES!A4:Z");
        assert_eq!(tail_range("PALPITES", 1), "PALPITES!A2:Z");
    }

    #[test]
    fn test_update_body_pads_short_rows() {
        let header = header_row();
        // Maria's unscored row as values.get returns it, four cells long
        let maria: Row = vec!["Maria".into(), "7".into(), "1".into(), "1".into()];

        let body = update_body("PALPITES!A1", vec![header, maria]);

        assert_eq!(body["range"], "PALPITES!A1");
        let values = body["values"].as_array().unwrap();
        assert!(values
            .iter()
            .all(|row| row.as_array().unwrap().len() == PREDICTIONS_HEADER.len()));
        assert_eq!(values[1][0], "Maria");
        assert_eq!(values[1][4], "");
        assert_eq!(values[1][7], "");
    }

    #[test]
    fn test_pad_rows_keeps_wider_rows_intact() {
        let rows = pad_rows(vec![vec!["a".into()], vec!["b".into(), "c".into()], vec![]]);
        assert_eq!(rows, vec![vec!["a", ""], vec!["b", "c"], vec!["", ""]]);
    }
}
