use std::{
    io::Write,
    path::PathBuf,
    sync::Arc,
};

use clap::Parser;
use direct_upload_client::{
    types::UploadMethod, ProgressCallback, UploadClient, UploadFile, UploadOutcome,
};
use eyre::eyre;
use tracing_subscriber::EnvFilter;

/// Upload a file straight to object storage using a credential from the
/// upload server.
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The file to upload
    file: PathBuf,

    /// Base URL of the upload server
    #[clap(long, env = "UPLOAD_SERVER", default_value_t = String::from("http://127.0.0.1:7205"))]
    server: String,

    /// Content type to upload as. Guessed from the file extension if omitted.
    #[clap(long)]
    content_type: Option<String>,

    /// Upload with a signed form (post) or a presigned URL (put). Uses the
    /// server's default if omitted.
    #[clap(long)]
    method: Option<UploadMethod>,

    /// Print the result as JSON
    #[clap(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let env_filter = EnvFilter::try_from_env("LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let file = UploadFile::from_path(&args.file, args.content_type.clone()).await?;
    let client = UploadClient::new(&args.server);

    let progress: Option<ProgressCallback> = if args.json {
        None
    } else {
        Some(Arc::new(|percent| {
            eprint!("\rUploading... {:>3}%", percent);
            std::io::stderr().flush().ok();
        }))
    };

    let result = client.upload(&file, args.method, progress).await;
    if !args.json {
        eprintln!();
    }

    let success = result.is_ok();
    if args.json {
        let outcome = UploadOutcome::from(result);
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match result {
            Ok(uploaded) => println!("{}", uploaded.access_url),
            Err(e) => eprintln!("{}: {}", e.code(), e.message()),
        }
    }

    if success {
        Ok(())
    } else {
        Err(eyre!("Upload failed"))
    }
}
