use std::path::Path;
use url_reader::core::ReaderResult;
use url_reader::tree::SearchOptions;
use url_reader::UrlReader;

pub async fn run(config_path: Option<&Path>, url: String, etag: Option<String>) -> ReaderResult<()> {
    let readers = super::readers(config_path)?;
    let mut response = readers.search(&url, SearchOptions { etag }).await?;

    if response.files.is_empty() {
        println!("No files matched");
    }

    response.files.sort_by(|a, b| a.path.cmp(&b.path));
    for file in &response.files {
        match file.url {
            Some(ref url) => println!("{}\t{}", file.path, url),
            None => println!("{}", file.path),
        }
    }

    if !response.etag.is_empty() {
        eprintln!("etag: {}", response.etag);
    }
    Ok(())
}
