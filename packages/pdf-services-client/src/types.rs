use serde::{Deserialize, Serialize};

/// Media types accepted by `POST /assets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MimeType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "application/zip")]
    Zip,
    #[serde(rename = "application/json")]
    Json,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Pdf => "application/pdf",
            MimeType::Zip => "application/zip",
            MimeType::Json => "application/json",
        }
    }
}

/// Response from `POST /token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Body of `POST /assets`.
#[derive(Debug, Clone, Serialize)]
pub struct AssetUploadRequest {
    #[serde(rename = "mediaType")]
    pub media_type: MimeType,
}

/// Pre-signed upload location for a new asset.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetUploadResponse {
    #[serde(rename = "uploadUri")]
    pub upload_uri: String,
    #[serde(rename = "assetID")]
    pub asset_id: String,
}

/// A file held by the service: an uploaded input or a generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    /// Pre-signed download location, present on job outputs.
    #[serde(rename = "downloadUri", default, skip_serializing_if = "Option::is_none")]
    pub download_uri: Option<String>,
}

impl Asset {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            download_uri: None,
        }
    }
}

/// Structured element kinds the extract operation can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractElementType {
    Text,
    Tables,
}

/// Element kinds that can additionally be rendered to files in the zip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractRenditionsElementType {
    Tables,
    Figures,
}

/// Output format for table renditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStructureType {
    Csv,
    Xlsx,
}

/// Parameters for the extract operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractPdfParams {
    #[serde(rename = "elementsToExtract", skip_serializing_if = "Vec::is_empty")]
    pub elements_to_extract: Vec<ExtractElementType>,
    #[serde(
        rename = "elementsToExtractRenditions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub elements_to_extract_renditions: Vec<ExtractRenditionsElementType>,
    #[serde(rename = "tableOutputFormat", skip_serializing_if = "Option::is_none")]
    pub table_structure_type: Option<TableStructureType>,
    #[serde(rename = "addCharInfo", skip_serializing_if = "Option::is_none")]
    pub add_char_info: Option<bool>,
    #[serde(rename = "getStylingInfo", skip_serializing_if = "Option::is_none")]
    pub get_styling_info: Option<bool>,
}

impl ExtractPdfParams {
    /// Text elements only, no renditions.
    pub fn text_only() -> Self {
        Self::default().with_element(ExtractElementType::Text)
    }

    pub fn with_element(mut self, element: ExtractElementType) -> Self {
        if !self.elements_to_extract.contains(&element) {
            self.elements_to_extract.push(element);
        }
        self
    }

    pub fn with_rendition(mut self, element: ExtractRenditionsElementType) -> Self {
        if !self.elements_to_extract_renditions.contains(&element) {
            self.elements_to_extract_renditions.push(element);
        }
        self
    }

    pub fn with_table_structure(mut self, format: TableStructureType) -> Self {
        self.table_structure_type = Some(format);
        self
    }

    pub fn with_char_info(mut self, enabled: bool) -> Self {
        self.add_char_info = Some(enabled);
        self
    }

    pub fn with_styling_info(mut self, enabled: bool) -> Self {
        self.get_styling_info = Some(enabled);
        self
    }
}

/// Body of `POST /operation/extractpdf`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractPdfJob {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    #[serde(flatten)]
    pub params: ExtractPdfParams,
}

impl ExtractPdfJob {
    pub fn new(input: &Asset, params: ExtractPdfParams) -> Self {
        Self {
            asset_id: input.asset_id.clone(),
            params,
        }
    }
}

/// Lifecycle state reported by the polling endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Done,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "in progress" => JobStatus::InProgress,
            "done" => JobStatus::Done,
            "failed" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

/// Error details attached to a failed job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

/// Response from `GET <polling location>`.
#[derive(Debug, Clone, Deserialize)]
pub struct PollResponse {
    pub status: String,
    /// `structuredData.json` on its own.
    #[serde(default)]
    pub content: Option<Asset>,
    /// The zip archive with the JSON and any renditions.
    #[serde(default)]
    pub resource: Option<Asset>,
    #[serde(default)]
    pub error: Option<JobError>,
}

impl PollResponse {
    pub fn job_status(&self) -> JobStatus {
        JobStatus::parse(&self.status)
    }
}

/// Outputs of a completed extract job.
#[derive(Debug, Clone)]
pub struct ExtractPdfResult {
    pub content: Option<Asset>,
    pub resource: Asset,
}
