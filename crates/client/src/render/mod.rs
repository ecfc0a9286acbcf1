//! Markdown report rendering and output file naming.
//!
//! Report header format:
//! ```markdown
//! # LLM 深度分析报告（微信公众号文章）
//!
//! **文章标题**: <title>
//! **作者**: <author>
//! **来源**: <url>            (only when analyzed from a URL)
//! **分析时间**: <YYYY-MM-DD HH:MM:SS UTC>
//! **分析类型**: <type>（<label>）
//! **使用模型**: <model>
//! **文章统计**: 总字数约 <n> 字
//!
//! ---
//! <LLM output>
//! ---
//! ```

use chrono::{DateTime, Utc};
use wxmp_core::{AnalysisType, ArticleRecord};

/// Title used when neither the page nor the caller supplied one.
pub const UNTITLED: &str = "未命名文章";

const MAX_FILE_STEM_CHARS: usize = 50;

/// Everything that goes into an analysis report.
#[derive(Debug, Clone)]
pub struct AnalysisDocument<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub source_url: Option<&'a str>,
    pub model: &'a str,
    pub analysis_type: AnalysisType,
    pub content_chars: usize,
    pub generated_at: DateTime<Utc>,
    /// LLM output, inserted verbatim.
    pub body: &'a str,
}

/// Everything that goes into a saved summary.
#[derive(Debug, Clone)]
pub struct SummaryDocument<'a> {
    pub record: &'a ArticleRecord,
    pub url: &'a str,
    pub generated_at: DateTime<Utc>,
    pub summary: &'a str,
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render the analysis report.
pub fn render_analysis_markdown(doc: &AnalysisDocument<'_>) -> String {
    let mut header = vec![
        format!("**文章标题**: {}", doc.title),
        format!("**作者**: {}", doc.author),
    ];
    if let Some(url) = doc.source_url {
        header.push(format!("**来源**: {url}"));
    }
    header.push(format!("**分析时间**: {}", timestamp(&doc.generated_at)));
    header.push(format!("**分析类型**: {}（{}）", doc.analysis_type, doc.analysis_type.label()));
    header.push(format!("**使用模型**: {}", doc.model));
    header.push(format!("**文章统计**: 总字数约 {} 字", doc.content_chars));

    format!(
        "# LLM 深度分析报告（微信公众号文章）\n\n{header}\n\n---\n\n{body}\n\n---\n\n\
         **注**: 本分析由 LLM 生成，基于语义理解和深度推理。如需更精确的分析，建议结合人工审核。\n",
        header = header.join("  \n"),
        body = doc.body.trim(),
    )
}

/// Render the saved summary for `parse_article`.
pub fn render_summary_markdown(doc: &SummaryDocument<'_>) -> String {
    let record = doc.record;
    let title = if record.title.is_empty() { UNTITLED } else { record.title.as_str() };

    format!(
        "# 文章摘要\n\n\
         **文章标题**: {title}  \n\
         **作者**: {author}  \n\
         **发布时间**: {publish_time}  \n\
         **文章链接**: {url}  \n\
         **生成时间**: {generated_at}\n\n\
         ---\n\n\
         ## 详细摘要\n\n\
         {summary}\n\n\
         ---\n\n\
         **注**: 本摘要由 LLM 生成，基于语义理解和深度分析。\n",
        author = record.author,
        publish_time = record.publish_time,
        url = doc.url,
        generated_at = timestamp(&doc.generated_at),
        summary = doc.summary.trim(),
    )
}

/// File-name-safe stem for a title.
///
/// Keeps alphanumerics (CJK included), `-`, `_` and spaces, replaces anything
/// else with `_`, and cuts to 50 characters.
pub fn sanitize_title(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ') { c } else { '_' })
        .take(MAX_FILE_STEM_CHARS)
        .collect();

    let stem = stem.trim().to_string();
    if stem.is_empty() { UNTITLED.to_string() } else { stem }
}

/// `{sanitized_title}-LLM{label}.md`
pub fn analysis_file_name(title: &str, analysis_type: AnalysisType) -> String {
    format!("{}-LLM{}.md", sanitize_title(title), analysis_type.label())
}

/// `{sanitized_title}-摘要.md`
pub fn summary_file_name(title: &str) -> String {
    format!("{}-摘要.md", sanitize_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-20T08:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn structure_doc(source_url: Option<&'static str>) -> AnalysisDocument<'static> {
        AnalysisDocument {
            title: "如何养成阅读习惯",
            author: "读书笔记",
            source_url,
            model: "glm-4-plus",
            analysis_type: AnalysisType::Structure,
            content_chars: 1234,
            generated_at: fixed_time(),
            body: "\n## 文章结构\n开头提出问题。\n",
        }
    }

    #[test]
    fn test_render_analysis_header() {
        let md = render_analysis_markdown(&structure_doc(Some("https://mp.weixin.qq.com/s/abc")));

        assert!(md.starts_with("# LLM 深度分析报告（微信公众号文章）\n\n"));
        assert!(md.contains("**文章标题**: 如何养成阅读习惯"));
        assert!(md.contains("**作者**: 读书笔记"));
        assert!(md.contains("**来源**: https://mp.weixin.qq.com/s/abc"));
        assert!(md.contains("**分析时间**: 2025-01-20 08:00:00 UTC"));
        assert!(md.contains("**分析类型**: structure（结构分析）"));
        assert!(md.contains("**使用模型**: glm-4-plus"));
        assert!(md.contains("**文章统计**: 总字数约 1234 字"));
        assert!(md.contains("---\n\n## 文章结构\n开头提出问题。\n\n---"));
    }

    #[test]
    fn test_render_analysis_without_source() {
        let md = render_analysis_markdown(&structure_doc(None));
        assert!(!md.contains("**来源**"));
    }

    #[test]
    fn test_render_summary() {
        let record = ArticleRecord {
            title: "标题".into(),
            author: "作者".into(),
            publish_time: "2024-03-01".into(),
            ..Default::default()
        };
        let md = render_summary_markdown(&SummaryDocument {
            record: &record,
            url: "https://mp.weixin.qq.com/s/abc",
            generated_at: fixed_time(),
            summary: "**总论点**：坚持。",
        });

        assert!(md.starts_with("# 文章摘要"));
        assert!(md.contains("**文章标题**: 标题"));
        assert!(md.contains("**发布时间**: 2024-03-01"));
        assert!(md.contains("**文章链接**: https://mp.weixin.qq.com/s/abc"));
        assert!(md.contains("## 详细摘要\n\n**总论点**：坚持。"));
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("如何/养成:阅读?习惯"), "如何_养成_阅读_习惯");
        assert_eq!(sanitize_title("  Rust 入门-指南_1  "), "Rust 入门-指南_1");
        assert_eq!(sanitize_title("？！"), "__");
        assert_eq!(sanitize_title("   "), UNTITLED);
    }

    #[test]
    fn test_sanitize_title_truncates() {
        let long = "长".repeat(80);
        assert_eq!(sanitize_title(&long).chars().count(), 50);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(analysis_file_name("读书", AnalysisType::Structure), "读书-LLM结构分析.md");
        assert_eq!(analysis_file_name("读书", AnalysisType::Comprehensive), "读书-LLM综合分析.md");
        assert_eq!(summary_file_name("读书"), "读书-摘要.md");
    }
}
