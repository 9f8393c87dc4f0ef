use std::path::{Path, PathBuf};
use async_trait::async_trait;

use crate::config::{GridLocation, SheetsSettings};
use crate::error::AppError;
use crate::grid::{rows_from_json, Row};

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Supplies the raw rows of the week grid
#[async_trait]
pub trait GridSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<Row>, AppError>;
}

/// Reads the grid through the Sheets v4 API with grid data included
pub struct SheetsSource<'a> {
    client: reqwest::Client,
    settings: &'a SheetsSettings,
    base_url: String,
}

impl<'a> SheetsSource<'a> {
    pub fn new(settings: &'a SheetsSettings) -> Self {
        Self::with_base_url(settings, SHEETS_API_BASE)
    }

    /// Same source against another API root, e.g. a local endpoint
    pub fn with_base_url(settings: &'a SheetsSettings, base_url: &str) -> Self {
        SheetsSource {
            client: reqwest::Client::new(),
            settings,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Bearer token for the request. An explicit token wins; an API key alone
    /// needs none; otherwise one is minted from the service-account key.
    async fn bearer_token(&self) -> Result<Option<String>, AppError> {
        if let Some(token) = &self.settings.access_token {
            return Ok(Some(token.clone()));
        }
        if self.settings.api_key.is_some() {
            return Ok(None);
        }
        service_account_token(&self.settings.credentials_file).await.map(Some)
    }

    fn request(&self, token: Option<&str>) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, self.settings.spreadsheet_id);
        let mut request = self.client.get(url).query(&[
            ("ranges", self.settings.range.as_str()),
            ("includeGridData", "true"),
        ]);
        if let Some(key) = &self.settings.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }
}

/// Exchanges a service-account key file for a read-only Sheets access token
async fn service_account_token(key_path: &Path) -> Result<String, AppError> {
    let key_error = |source| AppError::ServiceAccountKey {
        path: key_path.display().to_string(),
        source,
    };

    let key = yup_oauth2::read_service_account_key(key_path)
        .await
        .map_err(key_error)?;
    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(key_error)?;

    tracing::debug!(key = %key_path.display(), "requesting service account token");
    let token = auth
        .token(&[SHEETS_READONLY_SCOPE])
        .await
        .map_err(|e| AppError::Token(e.to_string()))?;
    token
        .token()
        .map(str::to_string)
        .ok_or_else(|| AppError::Token("token response carried no access token".to_string()))
}

#[async_trait]
impl GridSource for SheetsSource<'_> {
    async fn fetch_rows(&self) -> Result<Vec<Row>, AppError> {
        tracing::info!(
            spreadsheet = %self.settings.spreadsheet_id,
            range = %self.settings.range,
            "fetching grid from Sheets API"
        );

        let token = self.bearer_token().await?;
        let response = self.request(token.as_deref()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::HttpStatus {
                service: "sheets api",
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let rows = rows_from_json(&bytes)?;
        tracing::debug!(rows = rows.len(), "grid fetched");
        Ok(rows)
    }
}

/// Reads a saved `spreadsheets.get` response from disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl GridSource for FileSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>, AppError> {
        tracing::info!(path = %self.path.display(), "reading grid from file");
        let bytes = tokio::fs::read(&self.path).await?;
        rows_from_json(&bytes)
    }
}

/// Picks the source for a configured location
pub fn source_for(location: &GridLocation) -> Box<dyn GridSource + '_> {
    match location {
        GridLocation::Sheets(settings) => Box::new(SheetsSource::new(settings)),
        GridLocation::File(path) => Box::new(FileSource::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::TestServer;
    use serde_json::json;
    use std::io::Write;

    fn settings() -> SheetsSettings {
        SheetsSettings {
            spreadsheet_id: "sheet-1".to_string(),
            range: "Week_40!A6:Q39".to_string(),
            credentials_file: PathBuf::from("/nonexistent/service_account.json"),
            access_token: Some("token".to_string()),
            api_key: Some("key".to_string()),
        }
    }

    fn grid_json() -> String {
        json!({
            "sheets": [{ "data": [{ "rowData": [
                { "values": [{ "formattedValue": "dzień:" }, { "formattedValue": "kto:" }, { "formattedValue": "18:00" }] },
                { "values": [{ "formattedValue": "Pn" }, { "formattedValue": "Ala" }] }
            ] }] }]
        })
        .to_string()
    }

    #[test]
    fn sheets_request_asks_for_grid_data() {
        let settings = settings();
        let source = SheetsSource::new(&settings);
        let request = source.request(Some("token")).build().unwrap();

        assert_eq!(request.url().path(), "/v4/spreadsheets/sheet-1");
        let query: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("ranges".to_string(), "Week_40!A6:Q39".to_string())));
        assert!(query.contains(&("includeGridData".to_string(), "true".to_string())));
        assert!(query.contains(&("key".to_string(), "key".to_string())));
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer token"
        );
    }

    #[tokio::test]
    async fn file_source_reads_saved_response() {
        crate::logging::init_test();
        let body = json!({
            "sheets": [{ "data": [{ "rowData": [
                { "values": [{ "formattedValue": "dzień:" }, { "formattedValue": "kto:" }, { "formattedValue": "18:00" }] },
                { "values": [{ "formattedValue": "Pn" }, { "formattedValue": "Ala" }] }
            ] }] }]
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.to_string().as_bytes()).unwrap();

        let location = GridLocation::File(file.path().to_path_buf());
        let rows = source_for(&location).fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].text_at(1), "Ala");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = FileSource::new("/nonexistent/week.json");
        let err = source.fetch_rows().await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[actix_web::test]
    async fn sheets_rows_are_fetched_with_explicit_token() {
        let server = TestServer::start(vec![(200, grid_json())]);
        let settings = SheetsSettings { api_key: None, ..settings() };
        let source = SheetsSource::with_base_url(&settings, &format!("{}/v4/spreadsheets", server.base_url));

        let rows = source.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 2);

        let received = server.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].path, "/v4/spreadsheets/sheet-1");
        assert!(received[0].query.contains("includeGridData=true"));
        assert_eq!(received[0].authorization.as_deref(), Some("Bearer token"));
        server.stop().await;
    }

    #[actix_web::test]
    async fn api_key_alone_skips_service_account() {
        let server = TestServer::start(vec![(200, grid_json())]);
        let settings = SheetsSettings { access_token: None, ..settings() };
        let source = SheetsSource::with_base_url(&settings, &server.base_url);

        source.fetch_rows().await.unwrap();
        let received = server.received();
        assert!(received[0].query.contains("key=key"));
        assert_eq!(received[0].authorization, None);
        server.stop().await;
    }

    #[actix_web::test]
    async fn error_status_from_sheets_is_reported() {
        let server = TestServer::start(vec![(403, r#"{"error":"denied"}"#.to_string())]);
        let settings = settings();
        let source = SheetsSource::with_base_url(&settings, &server.base_url);

        let err = source.fetch_rows().await.unwrap_err();
        match err {
            AppError::HttpStatus { service, status, body } => {
                assert_eq!(service, "sheets api");
                assert_eq!(status, 403);
                assert!(body.contains("denied"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        server.stop().await;
    }

    #[tokio::test]
    async fn missing_service_account_key_is_reported_before_any_request() {
        let settings = SheetsSettings {
            access_token: None,
            api_key: None,
            ..settings()
        };
        // nothing listens on the discard port
        let source = SheetsSource::with_base_url(&settings, "http://127.0.0.1:9");

        let err = source.fetch_rows().await.unwrap_err();
        match err {
            AppError::ServiceAccountKey { path, .. } => {
                assert_eq!(path, "/nonexistent/service_account.json");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
