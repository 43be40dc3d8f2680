use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use flag_registry::flags;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn reader_thread(id: usize, iterations: usize) {
    for _ in 0..iterations {
        let dark_mode = flags::is_enabled("dark_mode");
        let max_conn = flags::get_value::<i64>("max_connections");
        let endpoint = flags::get_value::<String>("api_endpoint");

        if dark_mode && max_conn.is_some() && endpoint.is_some() {
            COUNTER.fetch_add(1, Ordering::Relaxed);
        }

        std::thread::sleep(Duration::from_micros(10));
    }

    tracing::info!(id, "Reader thread completed");
}

fn writer_thread(id: usize, iterations: usize) {
    for i in 0..iterations {
        flags::update("dark_mode", i % 2 == 0);
        flags::update("max_connections", 100 + i as i64);
        flags::update("api_endpoint", format!("https://api{i}.example.com"));

        COUNTER.fetch_add(1, Ordering::Relaxed);

        std::thread::sleep(Duration::from_millis(1));
    }

    tracing::info!(id, "Writer thread completed");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    flags::define("dark_mode", false, "Enable dark mode UI");
    flags::define("max_connections", 100, "Maximum number of connections");
    flags::define("api_endpoint", "https://api.example.com", "API endpoint URL");

    std::thread::scope(|s| {
        for id in 0..8 {
            s.spawn(move || reader_thread(id, 1000));
        }

        for id in 0..2 {
            s.spawn(move || writer_thread(id, 100));
        }
    });

    println!("\nFinal flag values:");
    println!("dark_mode: {}", flags::is_enabled("dark_mode"));

    if let Some(max_conn) = flags::get_value::<i64>("max_connections") {
        println!("max_connections: {max_conn}");
    }

    if let Some(endpoint) = flags::get_value::<String>("api_endpoint") {
        println!("api_endpoint: {endpoint}");
    }

    println!("Total operations: {}", COUNTER.load(Ordering::Relaxed));

    match serde_json::to_string_pretty(&flags::snapshot()) {
        Ok(json) => println!("\n{json}"),
        Err(e) => tracing::error!(%e, "Failed to serialize the flag snapshot"),
    }
}
