//! Final video assembly with ffmpeg.

use async_trait::async_trait;
use bulletin_core::{CompositionPlan, TitleOverlay};
use bulletin_error::{RenderError, RenderErrorKind};
use bulletin_interface::Compositor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Draws title overlays on each clip and concatenates them with ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegCompositor {
    ffmpeg: String,
    font_file: Option<PathBuf>,
}

impl FfmpegCompositor {
    /// Creates a compositor invoking `ffmpeg`.
    pub fn new(ffmpeg: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            font_file: None,
        }
    }

    /// Uses `font_file` for overlay text instead of the fontconfig default.
    pub fn with_font_file(mut self, font_file: Option<PathBuf>) -> Self {
        self.font_file = font_file;
        self
    }

    async fn run(&self, args: &[String]) -> Result<(), RenderError> {
        debug!(ffmpeg = %self.ffmpeg, ?args, "Running ffmpeg");
        let output = tokio::process::Command::new(&self.ffmpeg)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| composition_error(format!("Failed to start {}: {}", self.ffmpeg, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            return Err(composition_error(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                tail.join(" | ")
            )));
        }
        Ok(())
    }

    fn drawtext(&self, text_file: &Path, size: u32, x: &str, y: &str) -> String {
        let mut filter = format!(
            "drawtext=textfile='{}':fontsize={}:fontcolor=white:box=1:boxcolor=black@0.55:boxborderw=18:x={}:y={}",
            escape_filter_path(text_file),
            size,
            x,
            y
        );
        if let Some(font) = &self.font_file {
            filter.push_str(&format!(":fontfile='{}'", escape_filter_path(font)));
        }
        filter
    }

    /// Filter chain for one overlay, given the files holding its lines.
    pub(crate) fn overlay_filter(&self, overlay: &TitleOverlay, lines: &[PathBuf]) -> String {
        let centered = "(w-text_w)/2";
        match (overlay, lines) {
            (TitleOverlay::Card { .. }, [title, subtitle]) => [
                self.drawtext(title, 64, centered, "(h/2)-text_h-20"),
                self.drawtext(subtitle, 44, centered, "(h/2)+20"),
            ]
            .join(","),
            (TitleOverlay::EventInfo { .. }, [name, when, where_]) => [
                self.drawtext(name, 44, "40", "h-300"),
                self.drawtext(when, 34, "40", "h-220"),
                self.drawtext(where_, 34, "40", "h-150"),
            ]
            .join(","),
            _ => "null".to_string(),
        }
    }
}

fn composition_error(message: String) -> RenderError {
    RenderError::new(RenderErrorKind::Composition(message))
}

/// Text lines drawn for an overlay, top to bottom.
pub(crate) fn overlay_lines(overlay: &TitleOverlay) -> Vec<&str> {
    match overlay {
        TitleOverlay::Card { title, subtitle } => vec![title.as_str(), subtitle.as_str()],
        TitleOverlay::EventInfo { name, when, where_ } => {
            vec![name.as_str(), when.as_str(), where_.as_str()]
        }
    }
}

/// Escapes a path for use inside a quoted filter option.
pub(crate) fn escape_filter_path(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
}

/// Concat demuxer input listing `clips` in order.
pub(crate) fn concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| format!("file '{}'\n", clip.display().to_string().replace('\'', "'\\''")))
        .collect()
}

#[async_trait]
impl Compositor for FfmpegCompositor {
    #[instrument(skip(self, plan), fields(segments = plan.segments.len(), output = %plan.output.display()))]
    async fn compose(&self, plan: &CompositionPlan) -> Result<(), RenderError> {
        if plan.segments.is_empty() {
            return Err(composition_error("Nothing to compose".to_string()));
        }

        let work_dir = plan
            .output
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("titles");
        tokio::fs::create_dir_all(&work_dir)
            .await
            .map_err(|e| composition_error(format!("{}: {}", work_dir.display(), e)))?;

        let mut titled = Vec::with_capacity(plan.segments.len());
        for (index, segment) in plan.segments.iter().enumerate() {
            let mut line_files = Vec::new();
            for (line, text) in overlay_lines(&segment.overlay).into_iter().enumerate() {
                let path = work_dir.join(format!("segment_{}_line_{}.txt", index, line));
                tokio::fs::write(&path, text)
                    .await
                    .map_err(|e| composition_error(format!("{}: {}", path.display(), e)))?;
                line_files.push(path);
            }

            let out = work_dir.join(format!("segment_{}.mp4", index));
            let args: Vec<String> = vec![
                "-y".into(),
                "-i".into(),
                segment.clip.display().to_string(),
                "-vf".into(),
                self.overlay_filter(&segment.overlay, &line_files),
                "-c:v".into(),
                "libx264".into(),
                "-c:a".into(),
                "aac".into(),
                out.display().to_string(),
            ];
            self.run(&args).await?;
            debug!(segment = index, clip = %segment.clip.display(), "Titled segment");
            titled.push(out);
        }

        let list_path = work_dir.join("concat.txt");
        tokio::fs::write(&list_path, concat_list(&titled))
            .await
            .map_err(|e| composition_error(format!("{}: {}", list_path.display(), e)))?;

        let args: Vec<String> = vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            list_path.display().to_string(),
            "-c:v".into(),
            "libx264".into(),
            "-c:a".into(),
            "aac".into(),
            "-f".into(),
            "mp4".into(),
            plan.output.display().to_string(),
        ];
        self.run(&args).await?;

        info!("Wrote video");
        Ok(())
    }
}
