//! Subcommand implementations.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use pdftext_client::{
    ClientError, ExtractionClient, ExtractionMethod, HealthStatus, RemoteExtractionRequest,
};

/// Characters of extracted text printed by default.
pub const DEFAULT_PREVIEW_CHARS: usize = 5000;

pub async fn health(client: &ExtractionClient) -> anyhow::Result<()> {
    let status = check_health(client).await?;
    print_health(&status);
    Ok(())
}

pub async fn extract(client: &ExtractionClient, path: &Path, preview: usize) -> anyhow::Result<()> {
    let started = Instant::now();
    print_health(&check_health(client).await?);

    println!("Extracting text from {}...", path.display());
    let result = client
        .extract_file(path, None)
        .await
        .context("Text extraction failed")?;

    println!("Extraction successful!");
    println!("File: {}", result.file_name);
    println!("Size: {} bytes", result.file_size);
    println!("Pages: {}", result.page_count);
    println!("\nExtracted Text Preview (first {} chars):", preview);
    println!("{}", preview_text(&result.full_text(), preview));
    println!("\nTotal time: {:?}", started.elapsed());
    Ok(())
}

pub async fn extract_gcs(
    client: &ExtractionClient,
    input: String,
    output: Option<String>,
    method: ExtractionMethod,
    project: Option<String>,
    preview: usize,
) -> anyhow::Result<()> {
    let started = Instant::now();
    print_health(&check_health(client).await?);

    let mut request = RemoteExtractionRequest::new(input).with_method(method);
    if let Some(output) = output {
        request = request.with_output(output);
    }
    if let Some(project) = project {
        request = request.with_project_id(project);
    }

    println!("Extracting text from GCS: {}...", request.input_gcs_url);
    let result = client
        .extract_from_gcs(&request, None)
        .await
        .context("GCS text extraction failed")?;

    println!("Extraction successful!");
    println!("File: {}", result.file_name);
    println!("Size: {} bytes", result.file_size);
    println!("Pages: {}", result.page_count);
    println!("Method: {}", result.method);
    if let Some(location) = &result.output_location {
        println!("Output written to: {}", location);
    }
    println!("\nExtracted Text Preview (first {} chars):", preview);
    println!("{}", preview_text(&result.full_text(), preview));
    println!("\nTotal time: {:?}", started.elapsed());
    Ok(())
}

async fn check_health(client: &ExtractionClient) -> anyhow::Result<HealthStatus> {
    println!("Checking API health...");
    client.health_check(None).await.context("Health check failed")
}

fn print_health(status: &HealthStatus) {
    println!("API Status: {}, Version: {}\n", status.status, status.version);
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Print an error chain, naming the remote failure category when known.
pub fn report(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);

    let kind = err
        .downcast_ref::<ClientError>()
        .and_then(ClientError::remote)
        .and_then(|remote| remote.kind());
    if let Some(kind) = kind {
        eprintln!("Category: {}", kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_is_unchanged() {
        assert_eq!(preview_text("hello", 10), "hello");
        assert_eq!(preview_text("hello", 5), "hello");
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        assert_eq!(preview_text("hello world", 5), "hello...");
        assert_eq!(preview_text("Größe ändern", 4), "Größ...");
    }

    #[test]
    fn test_report_finds_remote_error_behind_context() {
        let err = anyhow::Error::from(ClientError::from(pdftext_client::RemoteError::new(
            404,
            "",
            Some("Blob does not exist".to_string()),
        )))
        .context("GCS text extraction failed");
        let remote = err.downcast_ref::<ClientError>().and_then(ClientError::remote);
        assert_eq!(remote.map(|r| r.status), Some(404));
    }
}
