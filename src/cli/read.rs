use std::io::{self, Write};
use std::path::{Path, PathBuf};
use url_reader::core::ReaderResult;
use url_reader::tree::ReadUrlOptions;
use url_reader::UrlReader;

pub async fn run(
    config_path: Option<&Path>,
    url: String,
    etag: Option<String>,
    output: Option<PathBuf>,
) -> ReaderResult<()> {
    let readers = super::readers(config_path)?;
    let response = readers.read_url(&url, ReadUrlOptions { etag }).await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &response.buffer).await?;
            println!(
                "✓ Wrote {} byte(s) to {}",
                response.buffer.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&response.buffer)?;
            stdout.flush()?;
        }
    }

    if let Some(etag) = response.etag {
        eprintln!("etag: {}", etag);
    }
    if let Some(modified) = response.last_modified_at {
        eprintln!("last-modified: {}", modified.to_rfc2822());
    }

    Ok(())
}
