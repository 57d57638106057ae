use std::time::Duration;

use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use log::{error, info, warn};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::{Client, ClientBuilder};
use serde_json::json;
use uuid::Uuid;

const NAMES: &[&str] = &[
    "Ada", "Grace", "Linus", "Barbara", "Ken", "Margaret", "Dennis", "Frances",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// GET /producer/publish/{message}
    Message,
    /// POST /producer/publish/customer
    Customer,
    /// Alternate between both endpoints
    Mixed,
}

#[derive(Parser, Debug)]
#[command(
    name = "publish-daemon",
    about = "Mock traffic generator for the producer gateway with rate & concurrency control"
)]
struct Args {
    /// Base URL of a running gateway
    #[arg(long, env = "GATEWAY_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    /// Which endpoint(s) to exercise
    #[arg(long, value_enum, default_value_t = Mode::Mixed)]
    mode: Mode,

    /// Publish rate (requests / second) per worker
    #[arg(short, long, default_value_t = 10.0)]
    rate: f64,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 1)]
    concurrency: usize,

    /// Base seed for deterministic payload generation
    #[arg(short, long, default_value_t = 42u64)]
    seed: u64,

    /// Optional number of requests per worker (if omitted, runs indefinitely)
    #[arg(short, long)]
    messages: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    if args.concurrency == 0 {
        anyhow::bail!("concurrency must be > 0");
    }
    if args.rate <= 0.0 {
        anyhow::bail!("rate must be > 0");
    }

    info!(
        "Starting publish daemon: endpoint={}, mode={:?}, per_worker_rate={:.3} req/s, concurrency={}, seed={}, messages_per_worker={:?}",
        args.endpoint, args.mode, args.rate, args.concurrency, args.seed, args.messages
    );

    let http_client = ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .build()?;
    let base = args.endpoint.trim_end_matches('/').to_string() + "/producer/publish";

    let mut handles = Vec::with_capacity(args.concurrency);

    for i in 0..args.concurrency {
        let client = http_client.clone();
        let base = base.clone();
        let seed = args.seed + i as u64;
        let messages_target = args.messages;
        let per_rate = args.rate;
        let mode = args.mode;

        handles.push(tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            let sleep_duration = Duration::from_secs_f64(1.0 / per_rate);
            let ids = Uniform::new(1i64, 1_000_000);

            info!(
                "worker={} started per_rate={:.3} req/s target_messages={:?}",
                i, per_rate, messages_target
            );

            let mut sent: u64 = 0;
            let mut failed: u64 = 0;
            loop {
                if let Some(limit) = messages_target {
                    if sent >= limit {
                        break;
                    }
                }

                let as_customer = match mode {
                    Mode::Message => false,
                    Mode::Customer => true,
                    Mode::Mixed => sent % 2 == 1,
                };

                let ok = if as_customer {
                    let id = ids.sample(&mut rng);
                    let name = NAMES.choose(&mut rng).copied().unwrap_or("Anonymous");
                    send_customer(&client, &base, id, name).await
                } else {
                    let message = deterministic_uuid(&mut rng).simple().to_string();
                    send_message(&client, &base, &message).await
                };
                if !ok {
                    failed += 1;
                }

                sent += 1;
                if sent % 1000 == 0 {
                    info!("worker={} sent={} failed={}", i, sent, failed);
                }

                tokio::time::sleep(sleep_duration).await;
            }

            info!("worker={} finished total_sent={} failed={}", i, sent, failed);
        }));
    }

    if args.messages.is_none() {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { info!("Ctrl-C received, shutting down"); }
        }
        for h in &handles {
            h.abort();
        }
    }

    for h in handles {
        let _ = h.await;
    }

    info!("publish daemon exiting");
    Ok(())
}

async fn send_message(client: &Client, base: &str, message: &str) -> bool {
    let res = client.get(format!("{base}/{message}")).send().await;
    check(res, "message")
}

async fn send_customer(client: &Client, base: &str, id: i64, name: &str) -> bool {
    let res = client
        .post(format!("{base}/customer"))
        .json(&json!({ "id": id, "name": name }))
        .send()
        .await;
    check(res, "customer")
}

fn check(res: reqwest::Result<reqwest::Response>, kind: &str) -> bool {
    match res {
        Ok(resp) if resp.status().is_success() => true,
        Ok(resp) => {
            warn!("{kind} publish rejected with status {}", resp.status());
            false
        }
        Err(e) => {
            error!("{kind} HTTP send error: {e}");
            false
        }
    }
}

fn deterministic_uuid(rng: &mut StdRng) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    // v4 layout: version nibble and RFC4122 variant
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    Uuid::from_bytes(bytes)
}
