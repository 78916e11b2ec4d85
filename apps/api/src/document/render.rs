//! First-page rasterization of uploaded PDFs.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error while rendering PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF renderer not found at {0}")]
    ToolMissing(String),

    #[error("pdftoppm exited with {status}: {stderr}")]
    Tool { status: String, stderr: String },

    #[error("PDF renderer produced no image")]
    EmptyOutput,
}

/// Turns PDF bytes into a JPEG of the first page.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn first_page_jpeg(&self, pdf_bytes: &[u8]) -> Result<Vec<u8>, RenderError>;
}

/// Rasterizer backed by poppler's `pdftoppm` CLI.
#[derive(Clone)]
pub struct PdftoppmRasterizer {
    pub executable_path: String,
    pub dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(executable_path: String, dpi: u32) -> Self {
        Self {
            executable_path,
            dpi,
        }
    }

    fn command(&self, input: &Path, output_prefix: &Path) -> Command {
        let mut command = Command::new(&self.executable_path);
        command
            .arg("-jpeg")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg("-singlefile")
            .arg(input)
            .arg(output_prefix)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn first_page_jpeg(&self, pdf_bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempfile::Builder::new().prefix("ats-render-").tempdir()?;

        let input_path: PathBuf = temp_dir.path().join("upload.pdf");
        let output_prefix: PathBuf = temp_dir.path().join("page");
        tokio::fs::write(&input_path, pdf_bytes).await?;

        let output = self
            .command(&input_path, &output_prefix)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    RenderError::ToolMissing(self.executable_path.clone())
                }
                _ => RenderError::Io(e),
            })?;
        if !output.status.success() {
            return Err(RenderError::Tool {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // -singlefile writes <prefix>.jpg
        let jpeg = tokio::fs::read(output_prefix.with_extension("jpg")).await?;
        if jpeg.is_empty() {
            return Err(RenderError::EmptyOutput);
        }

        debug!(
            "Rendered first PDF page: {} bytes in, {} bytes JPEG out",
            pdf_bytes.len(),
            jpeg.len()
        );
        Ok(jpeg)
    }
}
