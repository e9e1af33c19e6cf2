use crate::ai::{ChatPrompt, Upstream};
use crate::models::{ChatHistory, HistoryBuckets};
use crate::proxy::ProxyHandler;
use crate::{prompts, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Extracts lessons learned from a project and its conversations.
pub struct ProjectLessons;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonsRequest {
    pub project_title: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub chat_histories: Vec<ChatHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LessonsResponse {
    pub lessons: Vec<Lesson>,
    /// Set when the generated content could not be parsed and the fixed
    /// fallback lesson was substituted.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LessonPayload {
    List(Vec<Lesson>),
    Wrapped { lessons: Vec<Lesson> },
}

/// Remove Markdown code-fence markers around generated JSON.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse_lessons(text: &str) -> serde_json::Result<Vec<Lesson>> {
    let payload: LessonPayload = serde_json::from_str(&strip_code_fences(text))?;
    Ok(match payload {
        LessonPayload::List(lessons) => lessons,
        LessonPayload::Wrapped { lessons } => lessons,
    })
}

pub fn fallback_lessons() -> Vec<Lesson> {
    vec![Lesson {
        title: "Project Review".to_string(),
        description: "Reflect on the goals, progress and open questions of this project."
            .to_string(),
        concepts: vec![
            "Research planning".to_string(),
            "Iterative experimentation".to_string(),
        ],
        tips: vec![
            "Revisit the original objectives regularly".to_string(),
            "Record decisions and their reasons as you go".to_string(),
        ],
    }]
}

impl ProxyHandler for ProjectLessons {
    type Request = LessonsRequest;
    type Response = LessonsResponse;

    const NAME: &'static str = "project-lessons";
    const UPSTREAM: Upstream = Upstream::ChatCompletion;

    fn build_prompt(request: &Self::Request) -> Result<ChatPrompt> {
        let histories = HistoryBuckets::group(&request.chat_histories).render();

        Ok(ChatPrompt::new(
            prompts::LESSONS_SYSTEM.trim(),
            prompts::render(
                prompts::LESSONS_USER,
                &[
                    ("title", request.project_title.as_str()),
                    ("description", request.project_description.as_str()),
                    ("histories", histories.as_str()),
                ],
            ),
        ))
    }

    fn transform(_request: Self::Request, generated: String) -> Result<Self::Response> {
        match parse_lessons(&generated) {
            Ok(lessons) => Ok(LessonsResponse {
                lessons,
                fallback: false,
            }),
            Err(e) => {
                warn!("Generated lessons were not valid JSON, using fallback: {}", e);
                Ok(LessonsResponse {
                    lessons: fallback_lessons(),
                    fallback: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request() -> LessonsRequest {
        LessonsRequest {
            project_title: "Solar Cells".to_string(),
            project_description: "Perovskite efficiency".to_string(),
            chat_histories: vec![
                ChatHistory {
                    source: "KRIS".to_string(),
                    content: "a".to_string(),
                },
                ChatHistory {
                    source: "Lab notebook".to_string(),
                    content: "c".to_string(),
                },
            ],
        }
    }

    const LESSON_JSON: &str = r#"[{"title":"Stability","description":"Degradation matters","concepts":["humidity"],"tips":["encapsulate"]}]"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
    }

    #[test]
    fn test_parse_lessons_from_fenced_block() {
        let lessons = parse_lessons(&format!("```json\n{}\n```", LESSON_JSON)).unwrap();

        assert_eq!(
            lessons,
            vec![Lesson {
                title: "Stability".to_string(),
                description: "Degradation matters".to_string(),
                concepts: vec!["humidity".to_string()],
                tips: vec!["encapsulate".to_string()],
            }]
        );
    }

    #[test]
    fn test_parse_lessons_accepts_wrapped_object() {
        let lessons = parse_lessons(&format!("{{\"lessons\": {}}}", LESSON_JSON)).unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].title, "Stability");
    }

    #[test]
    fn test_transform_uses_fallback_on_invalid_json() {
        let response =
            ProjectLessons::transform(request(), "Here are some lessons: 1. Test".to_string())
                .unwrap();

        assert_eq!(response.lessons, fallback_lessons());
        assert_eq!(response.lessons.len(), 1);
        assert!(response.fallback);
    }

    #[test]
    fn test_transform_parsed_response_omits_fallback_flag() {
        let response = ProjectLessons::transform(request(), LESSON_JSON.to_string()).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert!(!response.fallback);
        assert!(json.get("fallback").is_none());
        assert_eq!(json["lessons"][0]["tips"][0], "encapsulate");
    }

    #[test]
    fn test_build_prompt_includes_project_and_histories() {
        let prompt = ProjectLessons::build_prompt(&request()).unwrap();

        assert!(prompt.user.contains("Project title: Solar Cells"));
        assert!(prompt.user.contains("KRIS conversations:\na"));
        assert!(prompt.user.contains("Other interactions:\nc"));
        assert!(prompt.user.contains("AI Scientist conversations:\n(none)"));
    }
}
