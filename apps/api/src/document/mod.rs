//! Document preprocessing: uploaded résumé PDF → inline image part for the model.

pub mod render;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Serialize;
use thiserror::Error;

use crate::document::render::{PageRasterizer, RenderError};

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No file uploaded")]
    MissingInput,

    #[error("Could not read the uploaded PDF: {0}")]
    Render(#[from] RenderError),
}

/// One encoded page, ready to be sent inline to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPart {
    pub mime_type: String,
    /// Standard-alphabet base64 of the JPEG bytes.
    pub data: String,
}

/// Renders the first page of `upload` to JPEG and wraps it as a single `DocumentPart`.
/// Later pages are ignored.
pub async fn prepare_document(
    upload: Option<&[u8]>,
    rasterizer: &dyn PageRasterizer,
) -> Result<Vec<DocumentPart>, DocumentError> {
    let pdf_bytes = upload
        .filter(|bytes| !bytes.is_empty())
        .ok_or(DocumentError::MissingInput)?;

    let jpeg = rasterizer.first_page_jpeg(pdf_bytes).await?;

    Ok(vec![DocumentPart {
        mime_type: JPEG_MIME_TYPE.to_string(),
        data: BASE64_STANDARD.encode(jpeg),
    }])
}
