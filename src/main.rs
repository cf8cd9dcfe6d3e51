use anyhow::{Result, bail};
use console::{Term, style};
use log::{info, warn};
use media_provider_probe::component::{
    DirectoryService, HttpDirectory, Orchestrator, StaticDirectory,
};
use media_provider_probe::config::{Config, ProbeSettings};
use media_provider_probe::init;
use media_provider_probe::menu::show_main_menu;
use media_provider_probe::signal::setup_shutdown_signal;
use media_provider_probe::tools::Transport;
use std::sync::Arc;

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal();
    let config = Config::new();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let transport = Transport::new(
        config.settings.http_base_url.as_deref(),
        config.settings.request_timeout(),
    )?;
    let directory = select_backend(&config.settings, &transport)?;
    let orchestrator = Orchestrator::from_settings(&config.settings, directory, &transport);

    loop {
        match show_main_menu(&term, &shutdown_signal, &runtime, &orchestrator) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("再見！").green().bold());
                info!("程式正常結束");
                break;
            }
            Err(e) => {
                warn!("程式錯誤: {e}");
                eprintln!("{} {}", style("錯誤:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}

/// fixture 檔優先，其次是 HTTP 目錄服務
fn select_backend(
    settings: &ProbeSettings,
    transport: &Transport,
) -> Result<Arc<dyn DirectoryService>> {
    if let Some(path) = &settings.fixture_path {
        info!("使用 fixture 目錄: {}", path.display());
        return Ok(Arc::new(StaticDirectory::from_json_file(path)?));
    }

    if let Some(base) = transport.content_base() {
        info!("使用 HTTP 目錄服務: {base}");
        return Ok(Arc::new(HttpDirectory::new(transport.clone())));
    }

    bail!("settings.json 需要設定 fixture_path 或 http_base_url 其中之一")
}
