//! # verbum
//!
//! Terminal front end for the reader view-models.
//!
//! ```text
//! verbum [BOOK] [CHAPTER]     print a chapter (default: Genesis 1)
//! verbum --daily              print a random verse
//! ```
//!
//! Configuration comes from `VERBUM_*` environment variables; see
//! [`ClientConfig`].

use anyhow::Context;
use tracing::info;

use verbum_client::{init_tracing, App, ClientConfig, NoticeLevel, Notifier};
use verbum_shared::constants::{APP_NAME, DEFAULT_BOOK};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    let (notifier, mut notices) = Notifier::channel();
    let app = App::new(config, notifier).context("failed to build client")?;

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("--daily") {
        let daily = app.daily();
        daily.refresh().await;
        let snap = daily.snapshot().await;
        if let (Some(reference), Some(text)) = (snap.reference, snap.text) {
            println!("{reference}\n{text}");
        }
    } else {
        // Book names may contain spaces ("1 John"), so the chapter is the
        // last argument when it parses as a number.
        let (book, chapter) = match args.split_last() {
            Some((last, rest)) if !rest.is_empty() && last.parse::<u32>().is_ok() => {
                (rest.join(" "), last.parse::<u32>().unwrap_or(1))
            }
            Some(_) => (args.join(" "), 1),
            None => (DEFAULT_BOOK.to_string(), 1),
        };

        let reader = app.reader_at(&book, chapter);
        reader.open().await;
        let snap = reader.snapshot().await;
        println!("{} {} ({})", snap.book, snap.chapter, snap.translation.to_uppercase());
        for verse in &snap.verses {
            println!("{:>3}  {}", verse.number, verse.text);
        }
    }

    let mut failed = false;
    while let Ok(notice) = notices.try_recv() {
        if notice.level == NoticeLevel::Error {
            eprintln!("{}", notice.message);
            failed = true;
        }
    }
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
