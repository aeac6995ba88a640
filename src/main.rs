use std::sync::Arc;

use clap::Parser;

use aqualite_client::auth::AuthContext;
use aqualite_client::domain::poller::StatusPoller;
use aqualite_client::transport::http::HttpTransport;
use aqualite_client::transport::portal::SharedTransport;
use aqualite_client::{logger, submit_from_plan};

/// Submits a job to the Aqualite portal from a JSON plan and polls it to a
/// terminal state.
#[derive(Debug, Parser)]
#[command(name = "aqualite-client")]
struct Cli {
    /// Path to the JSON submission plan.
    #[arg(long)]
    plan: String,

    /// Portal API root.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Portal API token.
    #[arg(long, env = "AQUALITE_TOKEN")]
    token: String,

    /// Authenticated user id.
    #[arg(long)]
    user: i64,

    /// Group owning the submission.
    #[arg(long)]
    group: i64,

    /// Seconds between status reads.
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let auth = AuthContext::new(cli.token, cli.user, cli.group);
    let transport: SharedTransport = Arc::new(HttpTransport::new(&cli.base_url)?);

    let job = submit_from_plan(&cli.plan, transport.clone(), auth.clone()).await?;
    log::info!("Job {} submitted, waiting for a terminal state...", job.job_id);

    let poller = StatusPoller::new(transport, auth, job.kind.domain(), std::time::Duration::from_secs(cli.poll_interval));
    let mut updates = poller.watch(job.job_id);

    loop {
        if updates.changed().await.is_err() {
            break;
        }
        let snapshot = updates.borrow_and_update().clone();
        if let Some(descriptor) = snapshot {
            log::info!("Job {} status: {:?}", descriptor.job_id, descriptor.status);
            if descriptor.status.is_terminal() {
                if let Some(message) = &descriptor.error_message {
                    log::error!("Job {} failed: {}", descriptor.job_id, message);
                }
                for (name, url) in &descriptor.result_links {
                    println!("{}: {}", name, url);
                }
                break;
            }
        }
    }

    Ok(())
}
