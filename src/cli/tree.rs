use std::path::{Path, PathBuf};
use url_reader::core::ReaderResult;
use url_reader::tree::ReadTreeOptions;
use url_reader::UrlReader;

pub async fn run(
    config_path: Option<&Path>,
    url: String,
    etag: Option<String>,
    out: Option<PathBuf>,
) -> ReaderResult<()> {
    let readers = super::readers(config_path)?;
    let options = ReadTreeOptions {
        etag,
        ..Default::default()
    };
    let response = readers.read_tree(&url, options).await?;

    match out {
        Some(dir) => {
            let dir = response.dir(Some(dir.as_path())).await?;
            println!(
                "✓ {} file(s) written to {}",
                response.paths().len(),
                dir.display()
            );
        }
        None => {
            for path in response.paths() {
                println!("{}", path);
            }
        }
    }

    eprintln!("etag: {}", response.etag());
    Ok(())
}
