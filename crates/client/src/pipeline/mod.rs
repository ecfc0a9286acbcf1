//! Fetch → extract → LLM → render → persist orchestration.
//!
//! ### Steps
//! 1. INPUT: fetch and extract when a URL is given, otherwise take the
//!    caller's title, author and content. Page fields win; caller values
//!    only fill fields the page left empty.
//! 2. VALIDATE: analysis type and required inputs are checked before any
//!    network call.
//! 3. GENERATE: one chat-completion request.
//! 4. RENDER and PERSIST: Markdown report written atomically.
//!
//! Inner steps return `Result<_, Error>`; the public entry points convert
//! every error into an [`ErrorEnvelope`].

pub mod persist;
pub mod result;

pub use persist::{WrittenFile, write_report};
pub use result::{
    ANALYSIS_COMPLETED, ANALYSIS_METHOD, AnalysisInfo, AnalysisReport, AnalysisResult, ArticleInfo, ArticleSummary,
    ParseResult,
};

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use wxmp_core::{AnalysisType, AppConfig, ArticleRecord, Error, ErrorEnvelope, UNKNOWN};

use crate::extract::{Extractor, WechatExtractor};
use crate::fetch::{FetchClient, FetchConfig};
use crate::llm::{LlmConfig, PROVIDER, Summarizer};
use crate::render::{
    AnalysisDocument, SummaryDocument, UNTITLED, analysis_file_name, render_analysis_markdown, render_summary_markdown,
    summary_file_name,
};

/// Parameters of one analysis call. Blank strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    /// Explicit report path; defaults to a name derived from the title.
    pub save_path: Option<PathBuf>,
    pub model: Option<String>,
    /// `comprehensive`, `viewpoint` or `structure`.
    pub analysis_type: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Article fields after URL/explicit-value precedence is applied.
#[derive(Debug)]
struct ArticleInput {
    title: String,
    author: String,
    content: String,
    source_url: Option<String>,
}

/// Shared, read-only orchestrator behind both tools.
pub struct Pipeline {
    fetcher: FetchClient,
    extractor: Box<dyn Extractor>,
    summarizer: Summarizer,
    default_model: String,
    output_dir: PathBuf,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("fetcher", &self.fetcher)
            .field("summarizer", &self.summarizer)
            .field("default_model", &self.default_model)
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        fetcher: FetchClient, summarizer: Summarizer, default_model: impl Into<String>, output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            extractor: Box::new(WechatExtractor::new()),
            summarizer,
            default_model: default_model.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Build every component from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(config))?;
        let summarizer = Summarizer::new(LlmConfig::from(config))?;
        Ok(Self::new(fetcher, summarizer, config.default_model.clone(), config.output_dir.clone()))
    }

    /// Swap the extraction engine.
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.summarizer.has_api_key()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Fetch, extract and summarize one article; optionally save the summary.
    pub async fn parse_article(&self, url: &str, save_summary: bool) -> ParseResult {
        let start = Instant::now();
        match self.try_parse_article(url, save_summary).await {
            Ok(summary) => {
                tracing::info!("parse_article completed in {:?}: {}", start.elapsed(), summary.title);
                ParseResult::Completed(summary)
            }
            Err(e) => {
                tracing::warn!("parse_article failed for {}: {}", url, e);
                ParseResult::Failed(ErrorEnvelope::from(e))
            }
        }
    }

    /// Produce and save one analysis report.
    pub async fn run_analysis(&self, request: AnalysisRequest) -> AnalysisResult {
        let start = Instant::now();
        match self.try_run_analysis(request).await {
            Ok(report) => {
                tracing::info!("analysis completed in {:?}: {}", start.elapsed(), report.file_path);
                AnalysisResult::Completed(report)
            }
            Err(e) => {
                tracing::warn!("analysis failed: {}", e);
                AnalysisResult::Failed(ErrorEnvelope::from(e))
            }
        }
    }

    async fn fetch_record(&self, url: &str) -> Result<ArticleRecord, Error> {
        let page = self.fetcher.fetch(url).await?;
        let record = self.extractor.extract(&page)?;
        tracing::debug!("extracted \"{}\" ({} chars) from {}", record.title, record.content_length(), url);
        Ok(record)
    }

    async fn try_parse_article(&self, url: &str, save_summary: bool) -> Result<ArticleSummary, Error> {
        let canonical = self.fetcher.validate(url)?;
        let record = self.fetch_record(canonical.as_str()).await?;
        let summary = self.summarizer.summarize(&record.content, &record.title, &self.default_model).await?;

        let written = if save_summary {
            let markdown = render_summary_markdown(&SummaryDocument {
                record: &record,
                url: canonical.as_str(),
                generated_at: Utc::now(),
                summary: &summary,
            });
            let path = self.output_dir.join(summary_file_name(&record.title));
            Some(write_report(path, markdown).await?)
        } else {
            None
        };

        Ok(ArticleSummary {
            success: true,
            url: canonical.to_string(),
            title: record.title,
            author: record.author,
            publish_time: record.publish_time,
            description: record.description,
            summary,
            metadata: record.metadata,
            file_path: written.as_ref().map(|w| w.path.display().to_string()),
            file_size: written.as_ref().map(|w| w.size),
        })
    }

    /// INPUT and VALIDATE. Missing input is reported before any fetch.
    async fn resolve_input(&self, request: &AnalysisRequest) -> Result<ArticleInput, Error> {
        let Some(url) = present(&request.url) else {
            let content = present(&request.content);
            let title = present(&request.title);
            let (Some(title), Some(content)) = (title, content) else {
                return Err(Error::MissingInput(
                    "Either url or both title and content must be provided.".into(),
                ));
            };
            return Ok(ArticleInput {
                title: title.to_string(),
                author: present(&request.author).unwrap_or(UNKNOWN).to_string(),
                content: content.to_string(),
                source_url: None,
            });
        };

        let canonical = self.fetcher.validate(url)?;
        let record = self.fetch_record(canonical.as_str()).await?;

        let title = Some(record.title.trim())
            .filter(|t| !t.is_empty())
            .or_else(|| present(&request.title))
            .unwrap_or(UNTITLED)
            .to_string();
        let author = record.known_author().or_else(|| present(&request.author)).unwrap_or(UNKNOWN).to_string();
        let content = Some(record.content.trim())
            .filter(|c| !c.is_empty())
            .or_else(|| present(&request.content))
            .ok_or_else(|| Error::MissingInput("Article content is empty; nothing to analyze.".into()))?
            .to_string();

        Ok(ArticleInput { title, author, content, source_url: Some(canonical.to_string()) })
    }

    async fn try_run_analysis(&self, request: AnalysisRequest) -> Result<AnalysisReport, Error> {
        let analysis_type = match present(&request.analysis_type) {
            Some(kind) => kind.parse::<AnalysisType>()?,
            None => AnalysisType::default(),
        };
        let model = present(&request.model).unwrap_or(self.default_model.as_str()).to_string();

        let input = self.resolve_input(&request).await?;
        let content_chars = input.content.chars().count();

        tracing::info!(
            "analyzing \"{}\": type={}, model={}, chars={}",
            input.title,
            analysis_type,
            model,
            content_chars
        );

        let body = self.summarizer.analyze(&input.content, &input.title, &input.author, analysis_type, &model).await?;

        let markdown = render_analysis_markdown(&AnalysisDocument {
            title: &input.title,
            author: &input.author,
            source_url: input.source_url.as_deref(),
            model: &model,
            analysis_type,
            content_chars,
            generated_at: Utc::now(),
            body: &body,
        });

        let path = match &request.save_path {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => self.output_dir.join(analysis_file_name(&input.title, analysis_type)),
        };
        let written = write_report(path, markdown).await?;

        Ok(AnalysisReport {
            success: true,
            message: ANALYSIS_COMPLETED.to_string(),
            file_path: written.path.display().to_string(),
            file_size: written.size,
            article_info: ArticleInfo { title: input.title, author: input.author, content_length: content_chars },
            analysis_info: AnalysisInfo {
                analysis_type,
                model,
                provider: PROVIDER.to_string(),
                method: ANALYSIS_METHOD.to_string(),
            },
        })
    }
}
