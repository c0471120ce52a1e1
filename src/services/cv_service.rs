use pulldown_cmark::{html, Parser};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvProfile {
    pub name: String,
    pub job_title: String,
    pub experience: String,
    pub skills: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TailoredApplication {
    pub tailored_cv: String,
    pub cover_letter: String,
}

const COVER_LETTER_FALLBACK: &str = "Cover letter generation failed, but CV was tailored.";

#[derive(Clone)]
pub struct CvService {
    client: Client,
    api_key: String,
}

impl CvService {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }

    /// Builds a structured HTML resume from profile fields.
    pub async fn generate_cv(&self, profile: &CvProfile) -> Result<String> {
        let system_prompt = r#"You are an expert resume builder. Create a structured, professional resume in clean, semantic HTML format.

RULES:
1. Use ONLY standard HTML tags: <h1>, <h2>, <p>, <ul>, <li>, <strong>, <em>.
2. NEVER use Markdown symbols like #, *, -, or __.
3. Do NOT include <html>, <head>, or <body> tags. Just the content.
4. Ensure a modern, professional layout with sections for Summary, Experience, Education, and Skills.
5. Use <h1> for the name and <h2> for section headers."#;

        let user_content = format!(
            "Name: {}\nTarget Job Title: {}\nExperience: {}\nSkills: {}",
            profile.name, profile.job_title, profile.experience, profile.skills
        );

        info!(job_title = %profile.job_title, "Generating CV");
        let content = self.chat(system_prompt, &user_content).await?;
        Ok(render_markdown(&strip_code_fences(&content)))
    }

    /// Restructures raw text from an uploaded CV into a polished HTML resume.
    pub async fn improve_cv(&self, cv_content: &str) -> Result<String> {
        let system_prompt = r#"You are an expert career coach and resume writer. Your task is to take raw text from an uploaded CV and transform it into a professional, modern, and highly-effective resume in clean, semantic HTML.

GOALS:
1. Re-organize the content into logical sections (Summary, Experience, Education, Skills).
2. Improve the language: Use strong action verbs, quantify achievements where possible, and ensure error-free grammar.
3. Maintain ALL the core information (dates, companies, degrees) but present it better.

RULES:
1. Use ONLY standard HTML tags: <h1>, <h2>, <p>, <ul>, <li>, <strong>, <em>.
2. NEVER use Markdown symbols like #, *, -, or __.
3. Do NOT include <html>, <head>, or <body> tags. Just the content.
4. Use <h1> for the name and <h2> for section headers."#;

        let user_content = format!("Raw CV Content to improve:\n\n{}", cv_content);

        let content = self.chat(system_prompt, &user_content).await?;
        Ok(render_markdown(&strip_code_fences(&content)))
    }

    /// Tailors a CV to a job description and drafts a cover letter.
    pub async fn tailor_application(
        &self,
        cv_content: &str,
        job_description: &str,
    ) -> Result<TailoredApplication> {
        let system_prompt = r#"You are an expert career coach. Tailor the given CV to the job description and write a compelling cover letter.

Return the result in clean, semantic HTML format.

RULES:
1. Use ONLY standard HTML tags: <h1>, <h2>, <p>, <ul>, <li>, <strong>, <em>.
2. NEVER use Markdown symbols like #, *, -, or __.
3. Structure the output into two main sections: <div id="tailored-cv"> and <div id="cover-letter">.
4. Within each section, use <h1> for the title and <h2> for subheaders."#;

        let user_content = format!(
            "CV Content: {}\n\nJob Description: {}",
            cv_content, job_description
        );

        let content = self.chat(system_prompt, &user_content).await?;
        let (cv_part, letter_part) = split_cover_letter(&content);

        let tailored_cv = render_markdown(&strip_code_fences(&cv_part));
        let cover_letter = match letter_part {
            Some(letter) if !strip_code_fences(&letter).is_empty() => {
                render_markdown(&strip_code_fences(&letter))
            }
            _ => COVER_LETTER_FALLBACK.to_string(),
        };

        Ok(TailoredApplication {
            tailored_cv,
            cover_letter,
        })
    }

    async fn chat(&self, system_prompt: &str, user_content: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_content}
            ]
        });

        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenAI API Error {}: {}", status, text).into());
        }

        let body: serde_json::Value = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response format").into())
    }
}

/// Models occasionally wrap output in ``` fences despite instructions.
fn strip_code_fences(content: &str) -> String {
    content
        .replace("```markdown", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn render_markdown(content: &str) -> String {
    let parser = Parser::new(content);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out.trim().to_string()
}

/// Splits combined model output on the first "Cover Letter" heading,
/// case-insensitively. Returns the CV part and, if found, the remainder.
fn split_cover_letter(content: &str) -> (String, Option<String>) {
    let lower = content.to_lowercase();
    match lower.find("cover letter") {
        Some(idx) => {
            let cv = content[..idx].to_string();
            let letter = content[idx + "cover letter".len()..].to_string();
            (cv, Some(letter))
        }
        None => (content.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fences() {
        let raw = "```markdown\n# Resume\n```";
        assert_eq!(strip_code_fences(raw), "# Resume");
    }

    #[test]
    fn renders_markdown_to_html() {
        let html = render_markdown("# Alice\n\n- Rust\n- SQL");
        assert!(html.contains("<h1>Alice</h1>"));
        assert!(html.contains("<li>Rust</li>"));
    }

    #[test]
    fn html_passes_through_markdown_renderer() {
        let html = render_markdown("<h1>Alice</h1><p>Engineer</p>");
        assert!(html.contains("<h1>Alice</h1>"));
    }

    #[test]
    fn splits_on_cover_letter_heading() {
        let (cv, letter) = split_cover_letter("My CV body\n\nCOVER LETTER\nDear team,");
        assert!(cv.contains("My CV body"));
        assert!(letter.expect("letter part").contains("Dear team,"));
    }

    #[test]
    fn missing_cover_letter_heading_keeps_whole_cv() {
        let (cv, letter) = split_cover_letter("Only a CV here");
        assert_eq!(cv, "Only a CV here");
        assert!(letter.is_none());
    }
}
