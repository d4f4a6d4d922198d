use glint_engine::logging::{LoggingConfig, init_logging};
use glint_engine::window::{Runtime, RuntimeConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Glint Studio".to_string(),
        ..Default::default()
    };
    log::info!("starting with display target `{}`", config.target_id);

    Runtime::run(config)
}
