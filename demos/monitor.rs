use std::env;
use std::time::Duration;

use roth_touchline::{DeviceResult, TouchlineClient};

#[tokio::main]
async fn main() -> roth_touchline::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let host = args.get(1).expect("usage: monitor <host> [interval-secs]");
    let interval: u64 = args
        .get(2)
        .map(|s| s.parse().expect("interval must be a number"))
        .unwrap_or(30);

    let mut client = TouchlineClient::builder(host.clone()).build();

    println!("Polling {host} every {interval}s...");
    loop {
        match client.get_all_devices_data().await {
            Ok(snapshot) => {
                println!(
                    "status: {} | {} zone(s)",
                    snapshot.status(),
                    snapshot.device_count
                );
                for (index, entry) in &snapshot.devices {
                    match entry {
                        DeviceResult::Snapshot(zone) => {
                            let name = zone.name().unwrap_or("?");
                            let current = zone
                                .current_temperature()
                                .map(|t| format!("{t:.2}\u{00b0}C"))
                                .unwrap_or_else(|| "n/a".to_string());
                            let target = zone
                                .target_temperature()
                                .map(|t| format!("{t:.2}\u{00b0}C"))
                                .unwrap_or_else(|| "n/a".to_string());
                            println!(
                                "  [{index}] {name}: {current} -> {target} | mode: {:?} | prog: {:?}",
                                zone.operation_mode(),
                                zone.week_program(),
                            );
                        }
                        DeviceResult::Failed(error) => {
                            println!("  [{index}] read failed: {error}");
                        }
                    }
                }
            }
            Err(e) => eprintln!("Poll error: {e}"),
        }
        tokio::time::sleep(Duration::from_secs(interval)).await;
    }
}
