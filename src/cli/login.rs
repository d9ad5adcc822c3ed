use std::io::{self, Write};
use url_reader::core::{CredentialStore, ReaderError, ReaderResult};

pub async fn run(host: String) -> ReaderResult<()> {
    let host = host.trim().to_ascii_lowercase();
    if host.is_empty() {
        return Err(ReaderError::Config("Host cannot be empty".to_string()));
    }

    println!("Token login for {}", host);
    println!();

    print!("Token: ");
    io::stdout().flush()?;
    let mut token = String::new();
    io::stdin().read_line(&mut token)?;
    let token = token.trim().to_string();

    if token.is_empty() {
        return Err(ReaderError::Credentials("Token cannot be empty".to_string()));
    }

    CredentialStore::store(&CredentialStore::token_key(&host), &token)?;

    println!();
    println!("✓ Token stored securely");

    Ok(())
}
