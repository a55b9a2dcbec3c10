//! Arena Binary
//!
//! Runs one competition, reading JSON requests from stdin and writing
//! broadcasts to stdout, one JSON object per line.
//!
//! Options: --dir, --name, --seed

use clap::Parser;
use rbb::competition::Competition;
use rbb::gameroom::Arena;
use rbb::gameroom::Request;
use rbb::save::Archive;
use rbb::save::SaveError;
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;

#[derive(Parser)]
#[command(name = "arena", about = "Run a robot basketball competition")]
struct Args {
    /// Directory holding the competition documents
    #[arg(long)]
    dir: PathBuf,
    /// Create a competition with this name when none is saved
    #[arg(long)]
    name: Option<String>,
    /// Seed for reproducible pairings and coin flips
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rbb::log();
    let args = Args::parse();
    let archive = Archive::disk(&args.dir).await?;
    let competition = match archive.load(args.seed).await {
        Ok(competition) => competition,
        Err(SaveError::NoSavedState) => match (args.name, args.seed) {
            (Some(name), Some(seed)) => Competition::seeded(name, seed),
            (Some(name), None) => Competition::new(name),
            (None, _) => anyhow::bail!(
                "no saved competition in {}; pass --name to create one",
                args.dir.display()
            ),
        },
        Err(e) => return Err(e.into()),
    };
    let (requests, mut messages, task) = Arena::spawn(competition, archive);
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = messages.recv().await {
            match message.to_json() {
                Ok(line) => {
                    stdout.write_all(line.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await?;
                }
                Err(e) => log::error!("[arena] cannot encode {}: {}", message.name(), e),
            }
        }
        anyhow::Ok(())
    });
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match Request::decode(&line) {
            Ok(request) => {
                if requests.send(request).is_err() {
                    break;
                }
            }
            Err(e) => log::warn!("[arena] {}", e),
        }
    }
    drop(requests);
    let competition = task.await?;
    log::info!("[arena] saved {}", competition.name());
    printer.await??;
    Ok(())
}
