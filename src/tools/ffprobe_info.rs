use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

/// 串流開啟後可播放的基本資訊
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub duration_seconds: Option<f64>,
    pub frame_rate: Option<f64>,
    pub codec: Option<String>,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamEntry>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamEntry {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

/// 建立 ffprobe 指令；行程在 future 被丟棄時會一併終止
#[must_use]
fn ffprobe_command(ffprobe_path: &str, input: &str) -> Command {
    let mut command = Command::new(ffprobe_path);
    command
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}

/// 使用 ffprobe 開啟串流並取得視訊資訊
pub async fn probe_stream(ffprobe_path: &str, input: &str) -> Result<StreamInfo> {
    let output = ffprobe_command(ffprobe_path, input)
        .output()
        .await
        .with_context(|| format!("無法執行 ffprobe: {input}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(stdout: &str) -> Result<StreamInfo> {
    let probe: FfprobeOutput =
        serde_json::from_str(stdout).context("無法解析 ffprobe 輸出")?;

    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow!("找不到視訊串流"))?;

    let width = video_stream
        .width
        .filter(|w| *w > 0)
        .ok_or_else(|| anyhow!("無法取得影片寬度"))?;
    let height = video_stream
        .height
        .filter(|h| *h > 0)
        .ok_or_else(|| anyhow!("無法取得影片高度"))?;

    // 優先從 format 取長度，其次從 stream
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok());

    let frame_rate = video_stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate);

    Ok(StreamInfo {
        width,
        height,
        duration_seconds,
        frame_rate,
        codec: video_stream.codec_name.clone(),
    })
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}
