//! Generation orchestrator: idea in, draft out.
//!
//! Steps run strictly in order (caption, image, then storyboard and render
//! for video content). The first failing step aborts the run; nothing is
//! retried and nothing is persisted here.

use socialspark_api::{
    CaptionRequest, ImageRequest, PollPolicy, RenderTask, RenderVideoRequest, SocialSparkClient,
    StoryboardRequest, TaskPoller, TaskState, TaskStatusResponse,
};
use socialspark_core::{
    strip_hash_marks, BrandPresets, BusinessType, ContentType, Language, LibraryItem,
    LibraryPatch, NewDraft, Platform, Tone,
};
use socialspark_store::{DraftStore, StoreError};
use uuid::Uuid;
use tokio_util::sync::CancellationToken;

use crate::StudioError;

const TITLE_MAX_CHARS: usize = 60;
const DEFAULT_ASPECT_RATIO: &str = "1:1";
const DEFAULT_HASHTAGS_COUNT: u32 = 4;
const DEFAULT_NUMBER_OF_SHOTS: u32 = 3;

/// Everything the dashboard collects before pressing "generate".
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub idea: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub tone: Tone,
    pub business_type: BusinessType,
    pub language: Language,
    pub hashtags_count: u32,
    pub number_of_shots: u32,
    pub cta: Option<String>,
    pub aspect_ratio: Option<String>,
    pub brand_presets: BrandPresets,
    /// Poll the render task to completion instead of returning its handle.
    pub wait_for_render: bool,
}

impl GenerationRequest {
    /// An image post for Instagram in English with the dashboard defaults.
    #[must_use]
    pub fn new(idea: impl Into<String>, brand_presets: BrandPresets) -> Self {
        Self {
            idea: idea.into(),
            platform: Platform::Instagram,
            content_type: ContentType::Image,
            tone: Tone::Playful,
            business_type: BusinessType::Cafe,
            language: Language::English,
            hashtags_count: DEFAULT_HASHTAGS_COUNT,
            number_of_shots: DEFAULT_NUMBER_OF_SHOTS,
            cta: None,
            aspect_ratio: None,
            brand_presets,
            wait_for_render: true,
        }
    }

    /// Brand presets with the request tone filled in when the brand has none.
    fn effective_brand(&self) -> BrandPresets {
        let mut brand = self.brand_presets.clone();
        if brand.tone.as_deref().map_or(true, |t| t.trim().is_empty()) {
            brand.tone = Some(self.tone.to_string());
        }
        brand
    }
}

/// Progress checkpoints reported while generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Caption,
    CaptionReady,
    Image,
    ImageReady,
    Storyboard,
    StoryboardReady,
    RenderSubmitted,
    /// A non-terminal render status seen while waiting.
    Rendering(TaskState),
    Complete,
}

impl GenerationStage {
    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            GenerationStage::Caption => 20,
            GenerationStage::CaptionReady => 40,
            GenerationStage::Image => 60,
            GenerationStage::ImageReady => 80,
            GenerationStage::Storyboard => 85,
            GenerationStage::StoryboardReady => 90,
            GenerationStage::RenderSubmitted | GenerationStage::Rendering(_) => 95,
            GenerationStage::Complete => 100,
        }
    }
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStage::Caption => write!(f, "generating caption"),
            GenerationStage::CaptionReady => write!(f, "caption ready"),
            GenerationStage::Image => write!(f, "generating image"),
            GenerationStage::ImageReady => write!(f, "image ready"),
            GenerationStage::Storyboard => write!(f, "generating storyboard"),
            GenerationStage::StoryboardReady => write!(f, "storyboard ready"),
            GenerationStage::RenderSubmitted => write!(f, "video render submitted"),
            GenerationStage::Rendering(state) => write!(f, "video {state}"),
            GenerationStage::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    pub draft: NewDraft,
    /// Present for video content. `video_url` is set once the render finished.
    pub render_task: Option<RenderTask>,
}

pub struct Generator<'a> {
    client: &'a SocialSparkClient,
    poll_policy: PollPolicy,
}

impl<'a> Generator<'a> {
    #[must_use]
    pub fn new(client: &'a SocialSparkClient) -> Self {
        Self {
            client,
            poll_policy: PollPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    /// Runs the generation pipeline for `request`.
    ///
    /// # Errors
    ///
    /// - [`StudioError::Validation`] for a blank idea (no request is sent).
    /// - [`StudioError::Generation`] naming the step that failed.
    pub async fn generate<F>(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<GeneratedContent, StudioError>
    where
        F: FnMut(GenerationStage),
    {
        let idea = request.idea.trim();
        if idea.is_empty() {
            return Err(StudioError::validation("idea", "must not be blank"));
        }
        let brand = request.effective_brand();
        tracing::info!(
            platform = %request.platform,
            content_type = %request.content_type,
            business = %request.business_type,
            brand = %brand.name,
            "starting generation"
        );

        on_progress(GenerationStage::Caption);
        let caption = self
            .client
            .generate_caption(&CaptionRequest {
                idea: idea.to_string(),
                platform: request.platform,
                language: request.language,
                hashtags_count: request.hashtags_count,
                brand_presets: brand.clone(),
                business_type: Some(request.business_type),
            })
            .await
            .map_err(|source| step_failed("generate caption", source))?;
        let mut draft = NewDraft {
            title: derive_title(idea),
            caption: caption.caption,
            // Brand defaults are already folded in server-side.
            hashtags: strip_hash_marks(&caption.hashtags),
            image_url: None,
            video_url: None,
            platform: request.platform,
            content_type: request.content_type,
            storyboard: None,
            overlays: None,
        };
        on_progress(GenerationStage::CaptionReady);

        on_progress(GenerationStage::Image);
        let image = self
            .client
            .generate_image(&ImageRequest {
                idea: idea.to_string(),
                aspect_ratio: request
                    .aspect_ratio
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string()),
                brand_presets: brand.clone(),
                style: Some(request.tone.to_string()),
            })
            .await
            .map_err(|source| step_failed("generate image", source))?;
        draft.image_url = Some(image.image_url);
        on_progress(GenerationStage::ImageReady);

        let render_task = if request.content_type == ContentType::Video {
            Some(
                self.produce_video(request, idea, brand, &mut draft, cancel, &mut on_progress)
                    .await?,
            )
        } else {
            None
        };

        on_progress(GenerationStage::Complete);
        tracing::info!(title = %draft.title, "generation complete");
        Ok(GeneratedContent { draft, render_task })
    }

    async fn produce_video<F>(
        &self,
        request: &GenerationRequest,
        idea: &str,
        brand: BrandPresets,
        draft: &mut NewDraft,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<RenderTask, StudioError>
    where
        F: FnMut(GenerationStage),
    {
        on_progress(GenerationStage::Storyboard);
        let storyboard = self
            .client
            .generate_storyboard(&StoryboardRequest {
                idea: idea.to_string(),
                platform: request.platform,
                language: request.language,
                number_of_shots: request.number_of_shots,
                cta: request.cta.clone(),
                brand_presets: brand,
            })
            .await
            .map_err(|source| step_failed("generate storyboard", source))?;
        draft.storyboard = Some(storyboard.shots.clone());
        on_progress(GenerationStage::StoryboardReady);

        let submitted = self
            .client
            .render_video(&RenderVideoRequest {
                shots: storyboard.shots,
                music: storyboard.music,
            })
            .await
            .map_err(|source| step_failed("start video rendering", source))?;
        tracing::info!(task_id = %submitted.task_id, "render task submitted");
        on_progress(GenerationStage::RenderSubmitted);

        let mut task = RenderTask {
            task_id: submitted.task_id,
            status: submitted.status,
            video_url: None,
        };
        if !request.wait_for_render {
            return Ok(task);
        }

        let poller = TaskPoller::new(self.client, self.poll_policy.clone());
        let video_url = poller
            .wait(&task.task_id, cancel, |status| {
                on_progress(GenerationStage::Rendering(status.status));
            })
            .await
            .map_err(|source| step_failed("render video", source))?;
        task.status = TaskState::Ready;
        task.video_url = Some(video_url.clone());
        draft.video_url = Some(video_url);
        Ok(task)
    }

    /// Waits for a render started without `wait_for_render` and writes the
    /// finished video URL into the library item `draft_id`.
    ///
    /// The item is looked up before polling so a wrong id fails fast.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when `draft_id` is not in the library.
    /// - [`StudioError::Generation`] (step `render video`) when the task
    ///   fails, times out or is cancelled; the item is left untouched.
    pub async fn attach_render<F>(
        &self,
        store: &dyn DraftStore,
        task_id: &str,
        draft_id: Uuid,
        cancel: &CancellationToken,
        on_status: F,
    ) -> Result<LibraryItem, StudioError>
    where
        F: FnMut(&TaskStatusResponse),
    {
        if store.get_from_library(draft_id).await?.is_none() {
            return Err(StoreError::NotFound(draft_id).into());
        }
        let video_url = TaskPoller::new(self.client, self.poll_policy.clone())
            .wait(task_id, cancel, on_status)
            .await
            .map_err(|source| step_failed("render video", source))?;
        let patch = LibraryPatch {
            video_url: Some(video_url),
            ..LibraryPatch::default()
        };
        let item = store.update_in_library(draft_id, patch, None).await?;
        tracing::info!(%task_id, %draft_id, "rendered video attached to library item");
        Ok(item)
    }
}

fn step_failed(step: &'static str, source: socialspark_api::ApiError) -> StudioError {
    tracing::warn!(step, error = %source, "generation step failed");
    StudioError::Generation { step, source }
}

/// First [`TITLE_MAX_CHARS`] characters of the idea, trimmed.
fn derive_title(idea: &str) -> String {
    idea.chars()
        .take(TITLE_MAX_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
