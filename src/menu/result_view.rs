use crate::component::orchestrator::{QueryOutcome, SampleReport};
use crate::component::{PipelineState, ValidationStatus};
use console::style;

pub fn render_state(state: &PipelineState) {
    match &state.outcome {
        None => println!("{}", style("沒有查詢結果").dim()),
        Some(QueryOutcome::Error { message }) => {
            println!("\n{} {}", style("錯誤:").red().bold(), message);
        }
        Some(QueryOutcome::Success { summary, sample }) => {
            println!("\n{}", style("查詢結果").cyan().bold());
            println!("  URI:   {}", summary.uri);
            println!("  筆數:  {}", style(summary.count).green());
            println!("  欄位:  {}", summary.columns.join(", "));

            match sample {
                Some(report) => render_sample(report),
                None => println!("\n{}", style("目錄沒有任何資料").yellow()),
            }
        }
    }

    println!("\n{}", style("驗證").cyan().bold());
    println!("  圖片:  {}", format_status(&state.image));
    println!("  影片:  {}", format_status(&state.video));
}

fn render_sample(report: &SampleReport) {
    let entry = &report.entry;
    println!("\n{} (第 {} 筆)", style("抽樣").cyan().bold(), entry.position);
    println!("  定位:  {}", or_dash(Some(entry.locator.as_str()).filter(|l| !l.is_empty())));
    println!("  路徑:  {}", or_dash(entry.local_path_hint.as_deref()));
    println!("  MIME:  {}", or_dash(report.content_type()));
    println!("  檔名:  {}", or_dash(report.metadata.display_name.as_deref()));
    println!("  類型:  {}", style(report.kind).bold());
}

fn format_status(status: &ValidationStatus) -> String {
    match status {
        ValidationStatus::Idle => style("未執行").dim().to_string(),
        ValidationStatus::Loading => style("進行中").yellow().to_string(),
        ValidationStatus::Success(locator) => format!("{} {locator}", style("成功").green().bold()),
        ValidationStatus::Error(message) => format!("{} {message}", style("失敗").red().bold()),
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
