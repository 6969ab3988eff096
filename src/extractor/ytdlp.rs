//! yt-dlp process backend
//!
//! Maps `ExtractOptions` onto yt-dlp command line flags, runs the binary
//! and parses the single JSON document it prints with `-J`.

use async_trait::async_trait;
use std::ffi::OsString;
use std::process::{Output, Stdio};
use tokio::process::Command;

use super::{ExtractOptions, InfoDict, MediaExtractor, PostProcessor};
use crate::config::ExtractorConfig;
use crate::error::{AppError, Result};

/// Engine implementation that shells out to yt-dlp
#[derive(Debug, Clone)]
pub struct YtDlp {
    config: ExtractorConfig,
}

impl YtDlp {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Build the argument list for one invocation
    pub fn build_args(&self, url: &str, options: &ExtractOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-J".into(), "--no-progress".into()];

        if options.flat_playlist {
            args.push("--flat-playlist".into());
        }
        if !options.skip_download {
            // -J implies simulate; downloads need it switched back off.
            args.push("--no-simulate".into());
        }
        if options.ignore_errors {
            args.push("--ignore-errors".into());
        }
        if let Some(format) = &options.format {
            args.push("-f".into());
            args.push(format.into());
        }
        if let Some(template) = &options.output_template {
            args.push("-o".into());
            args.push(template.into());
        }
        for pp in &options.postprocessors {
            match pp {
                PostProcessor::ExtractAudio { codec, quality } => {
                    args.push("--extract-audio".into());
                    args.push("--audio-format".into());
                    args.push(codec.into());
                    args.push("--audio-quality".into());
                    args.push(audio_quality_arg(quality).into());
                }
            }
        }
        if let Some(ffmpeg) = &self.config.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.into());
        }
        args.extend(self.config.extra_args.iter().map(OsString::from));

        args.push("--".into());
        args.push(url.into());
        args
    }

    async fn run(&self, url: &str, options: &ExtractOptions) -> Result<Output> {
        let args = self.build_args(url, options);
        tracing::debug!("Running {} {:?}", self.config.binary, args);

        Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                AppError::Extractor(format!("failed to run {}: {}", self.config.binary, e))
            })
    }
}

#[async_trait]
impl MediaExtractor for YtDlp {
    async fn extract_info(&self, url: &str, options: &ExtractOptions) -> Result<Option<InfoDict>> {
        let output = self.run(url, options).await?;
        parse_output(&output)
    }

    fn name(&self) -> &str {
        &self.config.binary
    }
}

/// yt-dlp reads `--audio-quality` values up to 10 as VBR levels, so a
/// bitrate tier like `192` needs an explicit `K` suffix.
fn audio_quality_arg(quality: &str) -> String {
    match quality.parse::<u32>() {
        Ok(q) if q > 10 => format!("{}K", q),
        _ => quality.to_string(),
    }
}

/// Interpret a finished yt-dlp run.
///
/// With `--ignore-errors` a playlist with failed entries exits non-zero but
/// still prints its JSON, so parsable output wins over the exit status.
fn parse_output(output: &Output) -> Result<Option<InfoDict>> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();

    let failed = || AppError::ExtractorFailed {
        status: output.status.to_string(),
        stderr: last_error_line(&output.stderr),
    };

    if stdout.is_empty() {
        return if output.status.success() {
            Ok(None)
        } else {
            Err(failed())
        };
    }

    match InfoDict::from_json(stdout) {
        Ok(info) => {
            if !output.status.success() {
                tracing::warn!(
                    "yt-dlp reported errors but produced output: {}",
                    last_error_line(&output.stderr)
                );
            }
            Ok(info)
        }
        Err(_) if !output.status.success() => Err(failed()),
        Err(e) => Err(e.into()),
    }
}

fn last_error_line(stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    stderr
        .lines()
        .rev()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()))
        .unwrap_or("")
        .trim()
        .to_string()
}
