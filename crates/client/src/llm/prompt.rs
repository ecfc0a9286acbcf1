//! Prompt templates for the summary and the three analysis modes.
//!
//! Article text is cut at a hard character cap before it is embedded; text at
//! or below the cap is embedded verbatim.

use std::sync::LazyLock;

use regex::Regex;
use wxmp_core::AnalysisType;

/// Summaries are not requested for bodies shorter than this many characters.
pub const MIN_SUMMARY_CHARS: usize = 100;

/// Returned in place of a summary when the body is under [`MIN_SUMMARY_CHARS`].
pub const TOO_SHORT_SUMMARY: &str = "文章内容过短，无法生成详细摘要。";

/// First `cap` characters of `text`.
pub fn truncate_chars(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Long-form summary: at least ten sentences, core argument then sub-arguments.
pub fn build_summary_prompt(title: &str, text: &str, cap: usize) -> String {
    let title = if title.trim().is_empty() { "未提供" } else { title };
    let body = truncate_chars(text, cap);

    format!(
        r#"请为以下文章生成详细摘要，要求：

**输出结构：**
1. 使用"**总论点**："作为标题，然后用1-2句话总结文章的核心观点
2. 使用"**分论点**："作为标题，然后按照文章的自然结构，逐一阐述各个分论点
3. 每个分论点用独立的自然段落表达，不使用列表符号（如 -、•、1. 2. 3. 等）

**必须做到：**
- 至少十句话，全面总结文章核心内容
- 按文章结构和逻辑顺序，用流畅的段落文字逐一阐述各个分论点
- 使用"文章"、"作者"等第三人称客观转述，保持人称一致，不要使用"你"、"他"
- 段落之间空一行，完全使用自然段落文字

文章标题：{title}

文章正文：
{body}"#
    )
}

/// Prompt for one of the deep-analysis modes.
pub fn build_analysis_prompt(kind: AnalysisType, title: &str, author: &str, text: &str, cap: usize) -> String {
    let body = truncate_chars(text, cap);
    let header = format!("**文章标题**: {title}\n**作者**: {author}\n**文章内容**:\n{body}");

    match kind {
        AnalysisType::Viewpoint => format!(
            r#"请对以下微信公众号文章进行观点提取和分析：

{header}

请完成以下分析：

1. **核心观点识别**：提取文章的核心观点（1-2句话）
2. **分论点链条**：识别文章的主要分论点（3-5个），并说明它们如何支撑核心观点
3. **论证方式**：分析文章使用了哪些论证方式（案例、数据、引用、故事等）
4. **观点价值评估**：评估核心观点和分论点的价值（1-5分，说明理由）
5. **逻辑结构**：分析文章的逻辑结构是否清晰，是否存在逻辑跳跃

请以 Markdown 格式输出，包含表格和结构化内容。"#
        ),
        AnalysisType::Structure => format!(
            r#"请对以下微信公众号文章进行结构分析：

{header}

请完成以下分析：

1. **文章结构**：分析文章的整体结构（开头、主体、结尾）
2. **段落组织**：分析段落之间的逻辑关系
3. **过渡衔接**：评估段落之间的过渡是否自然
4. **层次划分**：识别文章的信息层次（标题、小标题、段落等）
5. **可读性**：评估文章的可读性，给出改进建议

请以 Markdown 格式输出。"#
        ),
        AnalysisType::Comprehensive => format!(
            r#"请对以下微信公众号文章进行深度综合分析：

{header}

请完成以下综合分析：

## 1. 核心观点提取
- 核心观点（1-2句话）
- 分论点链条（3-5个主要分论点）
- 观点之间的逻辑关系

## 2. 结构分析
- 文章整体结构（开头、主体、结尾）
- 段落组织与逻辑关系
- 过渡衔接是否自然

## 3. 论证方式分析
- 使用的论证方式（案例、数据、引用、故事、对比等）
- 每种论证方式的效果评估

## 4. 语言风格分析
- 语言特点（简洁/冗长、生动/平淡、专业/通俗等）
- 表达技巧（修辞手法、金句等）
- 可读性评估

## 5. 价值与影响评估
- 观点价值（创新性、实用性、传播价值）
- 目标读者群体
- 可能的传播效果

请以 Markdown 格式输出，使用表格和结构化内容，确保分析深入、具体、可操作。不要包含优化建议部分。

**重要**：直接输出 Markdown 内容，不要使用代码块（```）包裹。"#
        ),
    }
}

static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*```[\w-]*[ \t]*\r?\n?").expect("invalid fence regex"));

/// Remove Markdown code-fence lines the model sometimes wraps its answer in.
pub fn strip_code_fences(output: &str) -> String {
    FENCE_LINE.replace_all(output.trim(), "").trim().to_string()
}
