use anyhow::Result;
use vk_bootstrap_app::{app::MESSAGE_TARGET, App, AppConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "trace"))
        // layer messages are printed whatever RUST_LOG says
        .filter_module(MESSAGE_TARGET, log::LevelFilter::Trace)
        .init();
    let mut app = App::new(AppConfig::default())?;

    app.run();

    Ok(())
}
