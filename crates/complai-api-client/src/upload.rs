//! Files selected for multipart upload.

use std::path::Path;

use crate::error::ApiError;

/// A file to send as a multipart `file` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// In-memory file; the MIME type is guessed from the extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub(crate) fn into_part(self, endpoint: &str) -> Result<reqwest::multipart::Part, ApiError> {
        reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_is_guessed_from_extension() {
        assert_eq!(UploadFile::new("tasks.CSV", vec![]).mime, "text/csv");
        assert_eq!(UploadFile::new("challan.pdf", vec![]).mime, "application/pdf");
        assert_eq!(UploadFile::new("blob", vec![]).mime, "application/octet-stream");
    }

    #[tokio::test]
    async fn from_path_reports_missing_file() {
        let err = UploadFile::from_path("/definitely/not/here.csv").await.unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
