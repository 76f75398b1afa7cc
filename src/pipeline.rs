//! Production pipeline state machine.
//!
//! Owns the [`ProductionSession`] and drives its six stage transitions
//! against an injected [`Generator`]. Every transition is split-phase:
//! `begin_*` validates the stage precondition and snapshots a typed
//! request under a fresh per-stage epoch ticket; `commit_*` applies the
//! provider output only if the ticket is still the latest issued for
//! that stage. Stale responses from overlapping regenerations are
//! ignored, making "last request wins" a defined guarantee.
//!
//! The convenience `generate_*` methods run begin, provider call and
//! commit in one await. Provider failures propagate without touching
//! committed state.

use crate::audio::PcmBuffer;
use crate::error::{Result, SkrivError};
use crate::provider::{
    Generator, ImagePromptRequest, ScriptRequest, SeoRequest, ThumbnailRequest, TitleRequest,
    VoiceRequest,
};
use crate::session::{
    ProductionSession, ScriptDocument, SeoRecord, ThumbnailAsset, TitleCandidate,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Characters of script fed to SEO generation; a bound on prompt size.
const SEO_EXCERPT_CHARS: usize = 4000;

/// Characters of script summarized in the thumbnail prompt.
const THUMBNAIL_EXCERPT_CHARS: usize = 200;

/// The six generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Titles,
    Script,
    Seo,
    ImagePrompts,
    Thumbnail,
    Voice,
}

impl Stage {
    fn index(&self) -> usize {
        match self {
            Stage::Titles => 0,
            Stage::Script => 1,
            Stage::Seo => 2,
            Stage::ImagePrompts => 3,
            Stage::Thumbnail => 4,
            Stage::Voice => 5,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Titles => write!(f, "titles"),
            Stage::Script => write!(f, "script"),
            Stage::Seo => write!(f, "seo"),
            Stage::ImagePrompts => write!(f, "image-prompts"),
            Stage::Thumbnail => write!(f, "thumbnail"),
            Stage::Voice => write!(f, "voice"),
        }
    }
}

/// Ticket for a begun stage transition.
#[derive(Debug, Clone, Copy)]
pub struct StageTicket {
    stage: Stage,
    epoch: u64,
}

/// Whether a commit was applied or superseded by a newer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CommitOutcome {
    Committed,
    Stale,
}

/// A begun stage transition: the ticket plus the request snapshot.
#[derive(Debug, Clone)]
pub struct Pending<R> {
    pub ticket: StageTicket,
    pub request: R,
}

/// The production pipeline: session state plus the generation capability.
pub struct Pipeline {
    provider: Arc<dyn Generator>,
    session: ProductionSession,
    epochs: [u64; 6],
}

impl Pipeline {
    pub fn new(provider: Arc<dyn Generator>, session: ProductionSession) -> Self {
        Self {
            provider,
            session,
            epochs: [0; 6],
        }
    }

    /// The injected generation capability.
    pub fn provider(&self) -> Arc<dyn Generator> {
        self.provider.clone()
    }

    pub fn session(&self) -> &ProductionSession {
        &self.session
    }

    /// Mutable session access for configuration. Stage outputs are
    /// committed through the stage transitions, not through this.
    pub fn session_mut(&mut self) -> &mut ProductionSession {
        &mut self.session
    }

    fn issue(&mut self, stage: Stage) -> StageTicket {
        let slot = &mut self.epochs[stage.index()];
        *slot += 1;
        StageTicket {
            stage,
            epoch: *slot,
        }
    }

    fn accept(&self, ticket: StageTicket) -> bool {
        let latest = self.epochs[ticket.stage.index()];
        if ticket.epoch == latest {
            true
        } else {
            warn!(
                "Ignoring stale {} response (epoch {} superseded by {})",
                ticket.stage, ticket.epoch, latest
            );
            false
        }
    }

    // --- Stage 1: titles -------------------------------------------------

    pub fn begin_titles(&mut self) -> Result<Pending<TitleRequest>> {
        let source = &self.session.source;
        if source.input.trim().is_empty() {
            return Err(SkrivError::Validation(
                "source content is empty; provide text or upload a file first".to_string(),
            ));
        }
        let request = TitleRequest {
            content: source.input.clone(),
            language: source.language,
            topic: source.topic,
            count: source.title_count,
        };
        Ok(Pending {
            ticket: self.issue(Stage::Titles),
            request,
        })
    }

    pub fn commit_titles(
        &mut self,
        ticket: StageTicket,
        batch: Vec<TitleCandidate>,
    ) -> CommitOutcome {
        if !self.accept(ticket) {
            return CommitOutcome::Stale;
        }
        info!("Committing batch of {} title candidates", batch.len());
        self.session.source.titles = batch;
        CommitOutcome::Committed
    }

    #[instrument(skip(self))]
    pub async fn generate_titles(&mut self) -> Result<&[TitleCandidate]> {
        let pending = self.begin_titles()?;
        let batch = self.provider.generate_titles(&pending.request).await?;
        let _ = self.commit_titles(pending.ticket, batch);
        Ok(&self.session.source.titles)
    }

    /// Select a title from the current batch by index.
    pub fn select_title(&mut self, index: usize) -> Result<&TitleCandidate> {
        self.session.select_title(index)
    }

    // --- Stage 2: script -------------------------------------------------

    pub fn begin_script(&mut self) -> Result<Pending<ScriptRequest>> {
        let title = self.selected_title_or_err("generating a script")?;
        let request = ScriptRequest {
            title,
            section_count: self.session.script.section_count,
            words_per_section: self.session.script.words_per_section,
            language: self.session.source.language,
            mode: self.session.effective_customization(),
            original_content: self.session.original_content(),
        };
        Ok(Pending {
            ticket: self.issue(Stage::Script),
            request,
        })
    }

    pub fn commit_script(&mut self, ticket: StageTicket, text: String) -> CommitOutcome {
        if !self.accept(ticket) {
            return CommitOutcome::Stale;
        }
        let document = ScriptDocument::new(text);
        let detected = document.section_count();
        if detected != self.session.script.section_count as usize {
            warn!(
                "Script has {} detected sections, {} were requested",
                detected, self.session.script.section_count
            );
        }
        info!("Committing script with {} detected sections", detected);
        self.session.script.document = document;
        CommitOutcome::Committed
    }

    #[instrument(skip(self))]
    pub async fn generate_script(&mut self) -> Result<&ScriptDocument> {
        let pending = self.begin_script()?;
        let text = self.provider.generate_script(&pending.request).await?;
        let _ = self.commit_script(pending.ticket, text);
        Ok(&self.session.script.document)
    }

    // --- Stage 3: SEO ----------------------------------------------------

    pub fn begin_seo(&mut self) -> Result<Pending<SeoRequest>> {
        let title = self.selected_title_or_err("generating SEO metadata")?;
        let document = &self.session.script.document;
        if document.is_empty() {
            return Err(SkrivError::Validation(
                "no script has been generated yet; SEO metadata is derived from it".to_string(),
            ));
        }
        let request = SeoRequest {
            title,
            script_excerpt: document.excerpt(SEO_EXCERPT_CHARS).to_string(),
            language: self.session.source.language,
        };
        Ok(Pending {
            ticket: self.issue(Stage::Seo),
            request,
        })
    }

    pub fn commit_seo(&mut self, ticket: StageTicket, record: SeoRecord) -> CommitOutcome {
        if !self.accept(ticket) {
            return CommitOutcome::Stale;
        }
        self.session.seo.record = Some(record);
        CommitOutcome::Committed
    }

    #[instrument(skip(self))]
    pub async fn generate_seo(&mut self) -> Result<&SeoRecord> {
        let pending = self.begin_seo()?;
        let record = self.provider.generate_seo(&pending.request).await?;
        let _ = self.commit_seo(pending.ticket, record);
        self.session
            .seo
            .record
            .as_ref()
            .ok_or_else(|| SkrivError::Generation("SEO result was not committed".to_string()))
    }

    // --- Stage 4: image prompts ------------------------------------------

    pub fn begin_image_prompts(&mut self) -> Result<Pending<ImagePromptRequest>> {
        let document = &self.session.script.document;
        if document.is_empty() {
            return Err(SkrivError::Validation(
                "no script has been generated yet; image prompts follow its sections".to_string(),
            ));
        }
        let request = ImagePromptRequest {
            script: document.text().to_string(),
            prompts_per_section: self.session.image_prompts.prompts_per_section,
            language: self.session.source.language,
            style: self.session.image_prompts.style,
        };
        Ok(Pending {
            ticket: self.issue(Stage::ImagePrompts),
            request,
        })
    }

    pub fn commit_image_prompts(
        &mut self,
        ticket: StageTicket,
        prompts: Vec<String>,
    ) -> CommitOutcome {
        if !self.accept(ticket) {
            return CommitOutcome::Stale;
        }
        let expected = self.session.script.document.section_count()
            * self.session.image_prompts.prompts_per_section as usize;
        if expected > 0 && prompts.len() != expected {
            warn!(
                "Image prompt count {} differs from expected {} (sections x prompts-per-section)",
                prompts.len(),
                expected
            );
        }
        self.session.image_prompts.prompts = prompts;
        CommitOutcome::Committed
    }

    #[instrument(skip(self))]
    pub async fn generate_image_prompts(&mut self) -> Result<&[String]> {
        let pending = self.begin_image_prompts()?;
        let prompts = self
            .provider
            .generate_image_prompts(&pending.request)
            .await?;
        let _ = self.commit_image_prompts(pending.ticket, prompts);
        Ok(&self.session.image_prompts.prompts)
    }

    // --- Stage 5: thumbnail ----------------------------------------------

    pub fn begin_thumbnail(&mut self) -> Result<Pending<ThumbnailRequest>> {
        let title = self.selected_title_or_err("generating a thumbnail")?;
        let thumbnail = &self.session.thumbnail;
        let watermark = if thumbnail.watermark_enabled {
            let text = thumbnail.watermark_text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        } else {
            None
        };
        let request = ThumbnailRequest {
            title,
            script_excerpt: self
                .session
                .script
                .document
                .excerpt(THUMBNAIL_EXCERPT_CHARS)
                .to_string(),
            size: thumbnail.size,
            language: self.session.source.language,
            style: self.session.image_prompts.style,
            reference: thumbnail.reference.clone(),
            watermark,
        };
        Ok(Pending {
            ticket: self.issue(Stage::Thumbnail),
            request,
        })
    }

    pub fn commit_thumbnail(
        &mut self,
        ticket: StageTicket,
        asset: Option<ThumbnailAsset>,
    ) -> CommitOutcome {
        if !self.accept(ticket) {
            return CommitOutcome::Stale;
        }
        if asset.is_none() {
            warn!("Thumbnail generation yielded no image");
        }
        self.session.thumbnail.asset = asset;
        CommitOutcome::Committed
    }

    #[instrument(skip(self))]
    pub async fn generate_thumbnail(&mut self) -> Result<Option<&ThumbnailAsset>> {
        let pending = self.begin_thumbnail()?;
        let asset = self.provider.generate_thumbnail(&pending.request).await?;
        let _ = self.commit_thumbnail(pending.ticket, asset);
        Ok(self.session.thumbnail.asset.as_ref())
    }

    // --- Stage 6: voice --------------------------------------------------

    pub fn begin_voice(&mut self) -> Result<Pending<VoiceRequest>> {
        let document = &self.session.script.document;
        if document.is_empty() {
            return Err(SkrivError::Validation(
                "no script has been generated yet; narration reads the full script".to_string(),
            ));
        }
        let request = VoiceRequest {
            text: document.text().to_string(),
            voice: self.session.voice.voice,
        };
        Ok(Pending {
            ticket: self.issue(Stage::Voice),
            request,
        })
    }

    pub fn commit_voice(
        &mut self,
        ticket: StageTicket,
        track: Option<PcmBuffer>,
    ) -> CommitOutcome {
        if !self.accept(ticket) {
            return CommitOutcome::Stale;
        }
        if track.is_none() {
            warn!("Voice generation yielded no audio");
        }
        self.session.voice.track = track;
        CommitOutcome::Committed
    }

    #[instrument(skip(self))]
    pub async fn generate_voice(&mut self) -> Result<Option<&PcmBuffer>> {
        let pending = self.begin_voice()?;
        let track = self.provider.generate_voice(&pending.request).await?;
        let _ = self.commit_voice(pending.ticket, track);
        Ok(self.session.voice.track.as_ref())
    }

    /// Synthesize the fixed demo sentence; stateless, no epoch involved.
    pub async fn generate_demo_voice(&self) -> Result<Option<PcmBuffer>> {
        self.provider
            .generate_demo_voice(self.session.voice.voice)
            .await
    }

    fn selected_title_or_err(&self, action: &str) -> Result<String> {
        self.session
            .selected_title()
            .map(str::to_string)
            .ok_or_else(|| {
                SkrivError::Validation(format!("select a title before {}", action))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomizationMode, ProductionDefaults};
    use crate::provider::FakeGenerator;

    fn pipeline() -> Pipeline {
        Pipeline::new(
            Arc::new(FakeGenerator::new()),
            ProductionSession::new(&ProductionDefaults::default()),
        )
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    async fn pipeline_with_script() -> Pipeline {
        let mut p = pipeline();
        p.session_mut().source.input = "a seed idea".to_string();
        p.generate_titles().await.unwrap();
        p.select_title(0).unwrap();
        p.generate_script().await.unwrap();
        p
    }

    #[tokio::test]
    async fn test_titles_require_source_input() {
        let mut p = pipeline();
        let err = p.generate_titles().await.unwrap_err();
        assert!(matches!(err, SkrivError::Validation(_)));
        assert!(p.session().source.titles.is_empty());
    }

    #[tokio::test]
    async fn test_script_requires_selected_title() {
        let mut p = pipeline();
        p.session_mut().source.input = "a seed idea".to_string();

        let err = p.generate_script().await.unwrap_err();
        assert!(matches!(err, SkrivError::Validation(_)));
        assert!(p.session().script.document.is_empty());
    }

    #[tokio::test]
    async fn test_failed_precondition_leaves_prior_script_untouched() {
        let mut p = pipeline_with_script().await;
        let before = p.session().script.document.clone();

        // Deselect: the precondition now fails and the script must stay.
        p.session_mut().source.selected = None;
        let err = p.generate_script().await.unwrap_err();
        assert!(matches!(err, SkrivError::Validation(_)));
        assert_eq!(p.session().script.document, before);
    }

    #[tokio::test]
    async fn test_seo_requires_script_and_title() {
        let mut p = pipeline();
        p.session_mut().source.input = "a seed idea".to_string();
        p.generate_titles().await.unwrap();
        p.select_title(0).unwrap();

        let err = p.generate_seo().await.unwrap_err();
        assert!(matches!(err, SkrivError::Validation(_)));
        assert!(p.session().seo.record.is_none());
    }

    #[tokio::test]
    async fn test_thumbnail_needs_only_selected_title() {
        // Jumping from titles straight to thumbnail is allowed.
        let mut p = pipeline();
        p.session_mut().source.input = "a seed idea".to_string();
        p.generate_titles().await.unwrap();
        p.select_title(0).unwrap();

        let asset = p.generate_thumbnail().await.unwrap();
        assert!(asset.is_some());
    }

    #[tokio::test]
    async fn test_customization_gate_in_request() {
        let mut p = pipeline();
        p.session_mut().source.input = words(30);
        p.session_mut().script.customization = CustomizationMode::Deepen;
        p.generate_titles().await.unwrap();
        p.select_title(0).unwrap();

        let short = p.begin_script().unwrap();
        assert_eq!(short.request.mode, CustomizationMode::Expand);
        assert!(short.request.original_content.is_none());

        p.session_mut().source.input = words(51);
        let long = p.begin_script().unwrap();
        assert_eq!(long.request.mode, CustomizationMode::Deepen);
        assert_eq!(long.request.original_content.as_deref(), Some(words(51).as_str()));
    }

    #[tokio::test]
    async fn test_regeneration_overwrites_only_its_stage() {
        let mut p = pipeline_with_script().await;
        p.generate_seo().await.unwrap();
        let seo_before = p.session().seo.record.clone();

        p.session_mut().script.section_count = 7;
        p.generate_script().await.unwrap();

        assert_eq!(p.session().script.document.section_count(), 7);
        // SEO is not auto-invalidated; regeneration is manual.
        assert_eq!(p.session().seo.record, seo_before);
    }

    #[tokio::test]
    async fn test_stale_commit_is_ignored() {
        let mut p = pipeline_with_script().await;

        let older = p.begin_voice().unwrap();
        let newer = p.begin_voice().unwrap();

        let newer_track = p.provider().generate_voice(&newer.request).await.unwrap();
        let outcome = p.commit_voice(newer.ticket, newer_track);
        assert_eq!(outcome, CommitOutcome::Committed);
        let committed = p.session().voice.track.clone();

        // The older response resolves late and must not overwrite.
        let stale = p.commit_voice(older.ticket, None);
        assert_eq!(stale, CommitOutcome::Stale);
        assert_eq!(p.session().voice.track, committed);
    }

    #[tokio::test]
    async fn test_epochs_are_per_stage() {
        let mut p = pipeline_with_script().await;

        let voice = p.begin_voice().unwrap();
        // Another stage beginning does not invalidate the voice ticket.
        let _seo = p.begin_seo().unwrap();

        let outcome = p.commit_voice(voice.ticket, None);
        assert_eq!(outcome, CommitOutcome::Committed);
    }

    #[tokio::test]
    async fn test_demo_voice_has_no_precondition() {
        let p = pipeline();
        let buffer = p.generate_demo_voice().await.unwrap();
        assert!(buffer.is_some());
    }

    #[tokio::test]
    async fn test_end_to_end_production() {
        let mut p = pipeline();
        p.session_mut().source.input = "a seed idea".to_string();
        p.session_mut().source.title_count = 5;
        p.session_mut().script.section_count = 5;
        p.session_mut().script.words_per_section = 500;

        assert_eq!(p.generate_titles().await.unwrap().len(), 5);
        p.select_title(1).unwrap();
        let document = p.generate_script().await.unwrap();
        assert_eq!(document.section_count(), 5);

        p.generate_seo().await.unwrap();
        p.generate_image_prompts().await.unwrap();
        assert!(p.generate_thumbnail().await.unwrap().is_some());
        assert!(p.generate_voice().await.unwrap().is_some());

        let package = crate::packager::package(p.session()).unwrap();
        assert_eq!(
            package.entry_names().unwrap(),
            vec![
                "01_title.txt".to_string(),
                "02_script.txt".to_string(),
                "03_seo.txt".to_string(),
                "04_image_prompts.txt".to_string(),
                "05_thumbnail.jpg".to_string(),
                "06_voice.wav".to_string(),
            ]
        );
    }
}
