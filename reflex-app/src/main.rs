mod app;
mod sim;

pub use app::App;
use reflex_game::GameConfig;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config_path = std::env::var_os("REFLEX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("reflex.json"));
    let config = GameConfig::load(&config_path)?;

    let app = App::new(config)?;
    app.run()?;

    Ok(())
}
