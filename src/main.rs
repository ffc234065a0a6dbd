/// Console walkthrough of the GeoMark viewer for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use geomark::constants::DEFAULT_VIEWPORT;
    use geomark::{AppConfig, LogLevel, console};
    use geomark_core::Viewport;

    const USAGE: &str = "\
usage: geomark-native [--config <path>] [--log-level <level>] [--viewport <w>x<h>]
                      [--save-config]

Reads commands from stdin, one per line. Type 'help' for the list.";

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{}", USAGE);
        return;
    }
    let save_config = args.contains("--save-config");

    let config_path: Option<PathBuf> = match args.opt_value_from_str("--config") {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    let log_level: Option<LogLevel> = match args.opt_value_from_str("--log-level") {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    let viewport = match args.opt_value_from_fn("--viewport", console::parse_size) {
        Ok(size) => size.unwrap_or(DEFAULT_VIEWPORT),
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    // Logging is not up yet, so config problems go to stderr
    let config = match &config_path {
        Some(path) => match AppConfig::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => AppConfig::load_from_default_path().unwrap_or_default(),
    };

    let level = log_level.unwrap_or(config.preferences.log_level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
    log::info!("{} starting, log level {}", config.app_name, level.name());

    if save_config {
        if let Err(e) = config.save_to_default_path() {
            log::error!("Failed to save configuration: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let stdin = std::io::stdin();
    let controller = console::run_script(
        &config,
        Viewport::new(viewport.0, viewport.1),
        stdin.lock(),
        std::io::stdout(),
    );

    log::info!(
        "Session ended with {} marker(s); markers are not kept",
        controller.markers().len()
    );
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
