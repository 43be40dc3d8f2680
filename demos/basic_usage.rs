use flag_registry::{FlagValue, Registry};

fn print_flags(registry: &Registry) {
    let mut all = registry.get_all();
    all.sort_by(|a, b| a.name().cmp(b.name()));

    for flag in all {
        let value = match flag.value() {
            FlagValue::Text(s) => format!("{s:?}"),
            other => other.to_string(),
        };

        if flag.description().is_empty() {
            println!("- {}: {value}", flag.name());
        } else {
            println!("- {}: {value} ({})", flag.name(), flag.description());
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = Registry::builder()
        .add_flag("dark_mode", true, "Enable dark mode UI")
        .add_flag("max_connections", 100, "Maximum number of connections")
        .add_flag("api_endpoint", "https://api.example.com", "API endpoint URL")
        .add_flag("timeout_seconds", 30.5, "Connection timeout in seconds")
        .build();

    let before = registry.snapshot();

    if registry.is_enabled("dark_mode") {
        println!("Dark mode is enabled");
    } else {
        println!("Dark mode is disabled");
    }

    if let Some(max_conn) = registry.get_value::<i64>("max_connections") {
        println!("Max connections: {max_conn}");
    }

    if let Some(endpoint) = registry.get_value::<String>("api_endpoint") {
        println!("API endpoint: {endpoint}");
    }

    if let Some(timeout) = registry.get_value::<f64>("timeout_seconds") {
        println!("Timeout: {timeout} seconds");
    }

    println!("\nUpdating flags...\n");
    registry.update("dark_mode", false);
    registry.update("max_connections", 200);
    registry.update("api_endpoint", "https://api2.example.com");
    registry.update("timeout_seconds", 60.0);

    if let Err(e) = registry.update_typed("max_connections", "unlimited") {
        println!("Refused: {e}");
    }

    println!(
        "Dark mode is {}",
        if registry.is_enabled("dark_mode") {
            "enabled"
        } else {
            "disabled"
        }
    );

    println!("\nAll registered flags:");
    print_flags(&registry);

    println!("\nChanges:");
    for change in registry.snapshot().changes(&before) {
        println!("{change}");
    }
}
