use crate::component::{Orchestrator, PipelineState};
use crate::menu::result_view::render_state;
use crate::pause;
use crate::signal::is_shutdown_requested;
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::watch;

const SPINNER_TICK: Duration = Duration::from_millis(100);

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    runtime: &Runtime,
    orchestrator: &Arc<Orchestrator>,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 媒體目錄驗證 ===").cyan().bold());
    println!("{}", style("ESC 離開").dim());

    let options = vec!["Query media", "Exit"];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_query(term, shutdown_signal, runtime, orchestrator)?;
            Ok(true)
        }
        Some(1) | None => Ok(false),
        _ => unreachable!(),
    }
}

/// 觸發一次查詢，查詢階段結束即顯示結果，驗證完成後再更新，按 Enter 關閉
fn run_query(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    runtime: &Runtime,
    orchestrator: &Arc<Orchestrator>,
) -> Result<()> {
    let mut receiver = orchestrator.subscribe();
    let started = {
        let _guard = runtime.enter();
        orchestrator.start().is_some()
    };
    if !started {
        println!("{}", style("已有查詢進行中").yellow());
        pause(term)?;
        return Ok(());
    }

    let spinner = new_spinner()?;
    let queried = runtime.block_on(wait_until(
        &mut receiver,
        &spinner,
        shutdown_signal,
        |state| !state.is_loading,
    ));
    let Some(mut state) = queried else {
        spinner.abandon_with_message("操作已中斷");
        orchestrator.dismiss();
        return Ok(());
    };
    spinner.finish_and_clear();
    render_state(&state);

    if !state.is_settled() {
        let spinner = new_spinner()?;
        let settled = runtime.block_on(wait_until(
            &mut receiver,
            &spinner,
            shutdown_signal,
            PipelineState::is_settled,
        ));
        let Some(settled) = settled else {
            spinner.abandon_with_message("操作已中斷");
            orchestrator.dismiss();
            return Ok(());
        };
        spinner.finish_and_clear();
        state = settled;

        term.clear_screen()?;
        render_state(&state);
    }

    pause(term)?;
    orchestrator.dismiss();
    info!("結果已關閉");
    Ok(())
}

fn new_spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    Ok(spinner)
}

/// 等到狀態符合 `ready`，期間更新 spinner；收到中斷信號時回傳 `None`
async fn wait_until(
    receiver: &mut watch::Receiver<PipelineState>,
    spinner: &ProgressBar,
    shutdown_signal: &AtomicBool,
    ready: impl Fn(&PipelineState) -> bool,
) -> Option<PipelineState> {
    loop {
        let state = receiver.borrow_and_update().clone();
        if ready(&state) {
            return Some(state);
        }
        spinner.set_message(progress_message(&state));

        if is_shutdown_requested(shutdown_signal) {
            return None;
        }

        // 逾時只是為了讓 spinner 轉動並檢查中斷信號
        if let Ok(Err(_)) = tokio::time::timeout(SPINNER_TICK, receiver.changed()).await {
            return Some(receiver.borrow().clone());
        }
        spinner.tick();
    }
}

fn progress_message(state: &PipelineState) -> String {
    if state.is_loading {
        "查詢目錄中...".to_string()
    } else if state.image.is_loading() {
        "解碼圖片中...".to_string()
    } else {
        "等待影片串流就緒...".to_string()
    }
}
