//! `notesnap` -- terminal client for the capture-to-PDF notes backend.
//!
//! Snap a photo of handwritten notes (staged as an image file), upload
//! it for PDF conversion, and browse, search, and join classes.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default                 | Description                  |
//! |-------------------------|----------|-------------------------|------------------------------|
//! | `NOTESNAP_API_BASE_URL` | no       | `http://127.0.0.1:8000` | Backend base URL             |
//! | `NOTESNAP_EMAIL`        | no       | --                      | Account email for sign-in    |
//! | `NOTESNAP_PASSWORD`     | no       | --                      | Account password for sign-in |

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notesnap=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli).await
}
