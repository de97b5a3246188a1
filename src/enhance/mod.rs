//! Optional LLM enhancement of an analysis
//!
//! A heuristic gate decides whether a corpus is complex enough to be worth a
//! remote call. The provider's answer is parsed into [`EnhancedAnalysis`];
//! any failure or timeout degrades to a neutral fallback instead of an error.

mod gemini;

pub use gemini::GeminiProvider;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::EnhancementConfig;

static CONTRASTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"하지만|그런데|근데|그러나|다만").expect("contrastive pattern"));
static CRITICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"심각|중요|문제|이슈|버그").expect("critical pattern"));
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json object pattern"));

const NO_KEYWORDS: &str = "없음";
const FALLBACK_IMPORTANCE: f64 = 0.5;
const FALLBACK_CATEGORY: &str = "quality";

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("Provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

// Request URLs can carry credentials, so they never reach an error message
impl From<reqwest::Error> for EnhanceError {
    fn from(e: reqwest::Error) -> Self {
        EnhanceError::Http(e.without_url())
    }
}

/// Remote text-completion backend
///
/// Implementations only transport the prompt; parsing and fallback are
/// handled by [`enhance_or_fallback`].
pub trait EnhancementProvider: Send + Sync {
    fn name(&self) -> &str;

    fn complete(&self, prompt: &str)
        -> impl Future<Output = Result<String, EnhanceError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordSentiment {
    Positive,
    Negative,
    Neutral,
    Concern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordIntent {
    Praise,
    Suggestion,
    Question,
    Issue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancedPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedKeyword {
    pub text: String,
    /// 0.0 to 1.0
    pub importance: f64,
    pub sentiment: KeywordSentiment,
    pub intent: KeywordIntent,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedActionItem {
    pub priority: EnhancedPriority,
    pub title: String,
    pub description: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedAnalysis {
    #[serde(default)]
    pub enhanced_keywords: Vec<EnhancedKeyword>,
    #[serde(default)]
    pub action_items: Vec<EnhancedActionItem>,
    #[serde(default)]
    pub summary: String,
}

impl EnhancedAnalysis {
    /// Neutral result used whenever the provider cannot be used
    pub fn fallback(existing_keywords: &[String]) -> Self {
        Self {
            enhanced_keywords: existing_keywords
                .iter()
                .map(|text| EnhancedKeyword {
                    text: text.clone(),
                    importance: FALLBACK_IMPORTANCE,
                    sentiment: KeywordSentiment::Neutral,
                    intent: KeywordIntent::Suggestion,
                    category: FALLBACK_CATEGORY.to_string(),
                })
                .collect(),
            action_items: vec![EnhancedActionItem {
                priority: EnhancedPriority::Medium,
                title: "코드 리뷰 내용 검토".to_string(),
                description: "AI 분석을 사용할 수 없어 기본 분석 결과입니다.".to_string(),
                reasoning: "AI 서비스 연결 실패".to_string(),
            }],
            summary: "코드 리뷰 댓글들을 검토해보세요.".to_string(),
        }
    }
}

/// Where an enhancement result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementSource {
    Provider,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancementOutcome {
    pub source: EnhancementSource,
    pub analysis: EnhancedAnalysis,
}

/// Complexity signals observed in a corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GateSignals {
    pub long_text: bool,
    pub has_question: bool,
    pub contrastive: bool,
    pub critical_vocabulary: bool,
    pub many_comments: bool,
}

impl GateSignals {
    pub fn count(&self) -> usize {
        [
            self.long_text,
            self.has_question,
            self.contrastive,
            self.critical_vocabulary,
            self.many_comments,
        ]
        .iter()
        .filter(|signal| **signal)
        .count()
    }
}

/// Heuristic deciding whether a corpus warrants the enhancement call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnhancementGate {
    pub min_text_length: usize,
    pub min_comment_count: usize,
    pub min_signals: usize,
}

impl Default for EnhancementGate {
    fn default() -> Self {
        Self::from_config(&EnhancementConfig::default())
    }
}

impl EnhancementGate {
    pub fn from_config(config: &EnhancementConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
            min_comment_count: config.min_comment_count,
            min_signals: config.min_signals,
        }
    }

    pub fn signals(&self, comments: &[String]) -> GateSignals {
        let text = comments.join(" ");
        GateSignals {
            long_text: text.chars().count() > self.min_text_length,
            has_question: comments.iter().any(|c| c.contains('?')),
            contrastive: CONTRASTIVE.is_match(&text),
            critical_vocabulary: CRITICAL.is_match(&text),
            many_comments: comments.len() > self.min_comment_count,
        }
    }

    pub fn should_enhance(&self, comments: &[String]) -> bool {
        self.signals(comments).count() >= self.min_signals
    }
}

/// Prompt asking for a bare JSON object in the [`EnhancedAnalysis`] shape
pub fn build_prompt(comments: &[String], existing_keywords: &[String]) -> String {
    let comments_text = comments.join("\n---\n");
    let keywords = if existing_keywords.is_empty() {
        NO_KEYWORDS.to_string()
    } else {
        existing_keywords.join(", ")
    };

    format!(
        r#"당신은 코드 리뷰 분석 전문가입니다. 다음 PR 리뷰 댓글들을 분석해주세요.

리뷰 댓글들:
{comments_text}

기존 시스템이 찾은 키워드들: {keywords}

중요: 다른 설명 없이 오직 아래 JSON 형식으로만 응답해주세요. 마크다운 코드 블록이나 추가 텍스트는 포함하지 마세요:
{{
  "enhancedKeywords": [
    {{
      "text": "키워드",
      "importance": 0.8,
      "sentiment": "positive|negative|neutral|concern",
      "intent": "praise|suggestion|question|issue",
      "category": "performance|security|quality|architecture|testing|documentation"
    }}
  ],
  "actionItems": [
    {{
      "priority": "high|medium|low",
      "title": "구체적인 액션 제목",
      "description": "상세한 설명과 해결 방법",
      "reasoning": "왜 이 액션이 필요한지"
    }}
  ],
  "summary": "전체 리뷰의 핵심 요약 (1-2문장)"
}}

분석 시 고려사항:
1. 한국어와 영어 모두 고려
2. 문맥을 파악하여 감정과 의도 정확히 분류
3. 기존 키워드 외에 놓친 중요한 키워드가 있으면 추가
4. 액션 아이템은 실행 가능하고 구체적으로 작성
5. 우선순위는 보안/성능 이슈는 high, 코드 품질은 medium, 문서화는 low"#
    )
}

/// Parse the outermost `{...}` span of a model answer
pub fn parse_response(content: &str) -> Result<EnhancedAnalysis, EnhanceError> {
    if content.trim().is_empty() {
        return Err(EnhanceError::EmptyResponse);
    }
    let json = JSON_OBJECT
        .find(content)
        .map(|m| m.as_str())
        .unwrap_or(content);

    let mut analysis: EnhancedAnalysis = serde_json::from_str(json)
        .map_err(|e| EnhanceError::MalformedResponse(e.to_string()))?;
    for keyword in &mut analysis.enhanced_keywords {
        keyword.importance = keyword.importance.clamp(0.0, 1.0);
    }
    Ok(analysis)
}

/// Ask the provider, falling back to the neutral result on any failure
///
/// No retries happen here; callers that want them wrap this call.
pub async fn enhance_or_fallback<P: EnhancementProvider>(
    provider: &P,
    comments: &[String],
    existing_keywords: &[String],
    timeout: Duration,
) -> EnhancementOutcome {
    let prompt = build_prompt(comments, existing_keywords);

    let attempt = match tokio::time::timeout(timeout, provider.complete(&prompt)).await {
        Ok(Ok(content)) => parse_response(&content),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(EnhanceError::Timeout(timeout)),
    };

    match attempt {
        Ok(analysis) => {
            tracing::info!(
                "{} returned {} keywords and {} action items",
                provider.name(),
                analysis.enhanced_keywords.len(),
                analysis.action_items.len()
            );
            EnhancementOutcome {
                source: EnhancementSource::Provider,
                analysis,
            }
        }
        Err(e) => {
            tracing::warn!("Enhancement via {} failed, using fallback: {}", provider.name(), e);
            EnhancementOutcome {
                source: EnhancementSource::Fallback,
                analysis: EnhancedAnalysis::fallback(existing_keywords),
            }
        }
    }
}
