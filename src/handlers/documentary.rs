use crate::ai::{ChatPrompt, Upstream};
use crate::models::{ChatHistory, HistoryBuckets};
use crate::proxy::ProxyHandler;
use crate::{prompts, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Writes a Markdown documentary of a project and its logged conversations.
pub struct ProjectDocumentary;

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_phase: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentaryRequest {
    pub project_data: ProjectData,
    #[serde(default)]
    pub chat_histories: Vec<ChatHistory>,
}

/// Document properties for rendering the documentary as a PDF.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PdfMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
}

impl PdfMetadata {
    pub fn for_project(project: &ProjectData, created: DateTime<Utc>) -> Self {
        Self {
            title: format!("{} - Project Documentary", project.title),
            author: "KRIS AI Research Assistant".to_string(),
            subject: format!("Documentary of the {} project", project.title),
            keywords: format!("{}, documentary, research, KRIS", project.title),
            creator: "KRIS".to_string(),
            producer: "KRIS Documentary Generator".to_string(),
            creation_date: created.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentaryResponse {
    pub documentary: String,
    pub pdf_metadata: PdfMetadata,
    pub markdown: String,
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

impl ProxyHandler for ProjectDocumentary {
    type Request = DocumentaryRequest;
    type Response = DocumentaryResponse;

    const NAME: &'static str = "project-documentary";
    const UPSTREAM: Upstream = Upstream::ChatCompletion;

    fn build_prompt(request: &Self::Request) -> Result<ChatPrompt> {
        let project = &request.project_data;
        let histories = HistoryBuckets::group(&request.chat_histories).render();

        Ok(ChatPrompt::new(
            prompts::DOCUMENTARY_SYSTEM.trim(),
            prompts::render(
                prompts::DOCUMENTARY_USER,
                &[
                    ("title", project.title.as_str()),
                    ("description", project.description.as_str()),
                    ("status", or_unknown(&project.status)),
                    ("phase", or_unknown(&project.current_phase)),
                    ("created_at", or_unknown(&project.created_at)),
                    ("histories", histories.as_str()),
                ],
            ),
        ))
    }

    fn transform(request: Self::Request, generated: String) -> Result<Self::Response> {
        // Stamped at response time; the project's own created_at is not used.
        let pdf_metadata = PdfMetadata::for_project(&request.project_data, Utc::now());

        Ok(DocumentaryResponse {
            documentary: generated.clone(),
            pdf_metadata,
            markdown: generated,
        })
    }
}
