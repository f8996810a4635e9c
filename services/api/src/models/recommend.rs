//! AI recommendation models and prompt templates

use serde::Deserialize;
use serde_json::{Value, json};

use crate::validation::{Validate, ValidationErrors};

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant for SkillSync, a peer learning platform for SRM AP students. Be encouraging, practical, and concise.";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;

/// Kinds of recommendation the text generator can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationType {
    CareerPath,
    LearnNext,
    MatchSummary,
    SkillGap,
}

impl RecommendationType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "career_path" => Some(Self::CareerPath),
            "learn_next" => Some(Self::LearnNext),
            "match_summary" => Some(Self::MatchSummary),
            "skill_gap" => Some(Self::SkillGap),
            _ => None,
        }
    }

    /// Render the prompt template for this type
    ///
    /// Missing context fields render as a placeholder, never an error.
    pub fn prompt(&self, context: &Value) -> String {
        match self {
            Self::CareerPath => format!(
                r#"You are a career advisor for college students. Based on the following skills, suggest 3 potential career paths with brief explanations (2-3 sentences each).

Skills: {skills}
Year: {year}
Branch: {branch}

Respond in JSON format:
{{
  "paths": [
    {{"title": "Career Title", "description": "Brief explanation", "matchScore": 85}}
  ]
}}"#,
                skills = list_field(context, "skills", "None specified"),
                year = scalar_field(context, "year", "Unknown"),
                branch = scalar_field(context, "branch", "Unknown"),
            ),
            Self::LearnNext => format!(
                r#"You are a learning advisor for college students. Based on the skills they already know, suggest 3 skills they should learn next to advance their career.

Current Skills: {skills}
Career Interest: {interest}

Respond in JSON format:
{{
  "suggestions": [
    {{"skill": "Skill Name", "reason": "Why this skill", "priority": "high|medium|low"}}
  ]
}}"#,
                skills = list_field(context, "currentSkills", "None"),
                interest = scalar_field(context, "interest", "Tech"),
            ),
            Self::MatchSummary => format!(
                r#"You are helping students connect for peer learning. Write a brief, friendly 2-sentence summary explaining why this mentor is a good match.

Seeker wants to learn: {skill}
Mentor: {mentor} (Year {year}, {branch})
Match Score: {score}%
Connection: {degree} degree connection
Mutual Exchange: {exchange}

Keep it casual and encouraging, like a friend recommending someone."#,
                skill = scalar_field(context, "skill", "Unknown"),
                mentor = scalar_field(context, "mentorName", "Unknown"),
                year = scalar_field(context, "mentorYear", "Unknown"),
                branch = scalar_field(context, "mentorBranch", "Unknown"),
                score = scalar_field(context, "matchScore", "Unknown"),
                degree = scalar_field(context, "connectionDegree", "Unknown"),
                exchange = scalar_field(context, "mutualExchange", "None"),
            ),
            Self::SkillGap => format!(
                r#"Analyze the skill gap for this student and provide actionable advice.

Current Skills: {skills}
Target Role: {role}

Provide 3 specific skills they should focus on, with learning resources.

Respond in JSON format:
{{
  "gaps": [
    {{"skill": "Skill Name", "priority": "high|medium|low", "resources": ["Resource 1", "Resource 2"]}}
  ]
}}"#,
                skills = list_field(context, "currentSkills", "None"),
                role = scalar_field(context, "targetRole", "Software Developer"),
            ),
        }
    }

    /// Shape the generated text into the response body
    ///
    /// Summaries are returned verbatim; every other type is expected to be
    /// JSON and falls back to `{"text": ...}` when it is not.
    pub fn shape_response(&self, text: String) -> Value {
        match self {
            Self::MatchSummary => json!({ "summary": text }),
            _ => serde_json::from_str::<Value>(&text).unwrap_or_else(|_| json!({ "text": text })),
        }
    }
}

fn list_field(context: &Value, key: &str, fallback: &str) -> String {
    let items: Vec<String> = context
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(render_scalar).collect())
        .unwrap_or_default();

    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn scalar_field(context: &Value, key: &str, fallback: &str) -> String {
    context
        .get(key)
        .and_then(render_scalar)
        .unwrap_or_else(|| fallback.to_string())
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Request for an AI recommendation
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub context: Option<Value>,
}

/// Validated recommendation request
#[derive(Debug, Clone)]
pub struct Recommend {
    pub kind: RecommendationType,
    pub context: Value,
}

impl Validate for RecommendRequest {
    type Output = Recommend;

    fn validate(self) -> Result<Recommend, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let kind = errors.required("type", self.kind).and_then(|kind| {
            let parsed = RecommendationType::parse(&kind);
            if parsed.is_none() {
                errors.add("type", "Invalid recommendation type");
            }
            parsed
        });

        let context = errors
            .required("context", self.context.filter(|c| !c.is_null()))
            .and_then(|context| {
                if context.is_object() {
                    Some(context)
                } else {
                    errors.add("context", "context must be an object");
                    None
                }
            });

        match (kind, context) {
            (Some(kind), Some(context)) if errors.is_empty() => Ok(Recommend { kind, context }),
            _ => Err(errors),
        }
    }
}
