use drizzle::config::WidgetConfig;
use drizzle::error::RunError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = try_main() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), RunError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = WidgetConfig::load(&path)?;
            log::info!("loaded config from {path}");
            config
        }
        None => WidgetConfig::default(),
    };

    drizzle::run(config)
}
