//! The `classaide generate` command family.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use classaide_core::model::{ContentType, MaterialType};
use classaide_core::traits::InlineImage;

use super::{build_assistant, resolve_language};
use crate::ProviderArgs;

#[derive(Subcommand, Debug)]
pub enum Tool {
    /// Story, poem, explanation or example rooted in the local context
    Content {
        /// story, poem, explanation, example
        #[arg(long = "type", default_value = "story")]
        content_type: ContentType,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "Grade 3")]
        grade: String,
        /// Village, landmarks, festivals to weave in
        #[arg(long, default_value = "")]
        context: String,
        #[arg(long)]
        language: Option<String>,
    },

    /// One worksheet/quiz/activity/summary per grade
    Materials {
        /// Topic to build materials on
        #[arg(long, required_unless_present = "image")]
        topic: Option<String>,
        /// Photo of a textbook page to build materials from
        #[arg(long, conflicts_with = "topic")]
        image: Option<PathBuf>,
        /// Comma-separated grades, e.g. "Grade 1,Grade 3"
        #[arg(long, value_delimiter = ',', required = true)]
        grades: Vec<String>,
        /// worksheet, quiz, activity, summary
        #[arg(long = "type", default_value = "worksheet")]
        material_type: MaterialType,
        #[arg(long)]
        language: Option<String>,
    },

    /// Answer a student's question at their level
    Ask {
        #[arg(long)]
        question: String,
        #[arg(long, default_value = "Grade 3")]
        grade: String,
        #[arg(long)]
        language: Option<String>,
    },

    /// Blackboard drawing instructions for a visual aid
    Visual {
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "General")]
        subject: String,
        #[arg(long)]
        language: Option<String>,
    },

    /// A classroom game needing no materials
    Game {
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "Grade 3")]
        grade: String,
        #[arg(long)]
        language: Option<String>,
    },

    /// A lesson plan for the given duration
    Lesson {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "Grade 3")]
        grade: String,
        #[arg(long, default_value = "1 week")]
        duration: String,
        #[arg(long)]
        language: Option<String>,
    },
}

pub async fn execute(args: ProviderArgs, tool: Tool) -> Result<()> {
    let (assistant, config) = build_assistant(&args)?;
    tracing::info!(provider = assistant.provider_name(), "generating");

    let output = match tool {
        Tool::Content {
            content_type,
            topic,
            grade,
            context,
            language,
        } => {
            let language = resolve_language(language.as_deref(), &config)?;
            assistant
                .hyper_local_content(content_type, &topic, &grade, &context, language)
                .await?
        }
        Tool::Materials {
            topic,
            image,
            grades,
            material_type,
            language,
        } => {
            let language = resolve_language(language.as_deref(), &config)?;
            let grades: Vec<String> = grades
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect();

            let materials = match image {
                Some(path) => {
                    let image = InlineImage::from_path(&path)?;
                    assistant
                        .materials_from_textbook(image, &grades, material_type, language)
                        .await?
                }
                None => {
                    let topic = topic.unwrap_or_default();
                    assistant
                        .differentiated_materials(&topic, &grades, material_type, language)
                        .await?
                }
            };

            materials
                .iter()
                .map(|(grade, material)| format!("## {grade}\n\n{}\n", material.trim_end()))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Tool::Ask {
            question,
            grade,
            language,
        } => {
            let language = resolve_language(language.as_deref(), &config)?;
            assistant.answer_question(&question, &grade, language).await?
        }
        Tool::Visual {
            description,
            subject,
            language,
        } => {
            let language = resolve_language(language.as_deref(), &config)?;
            assistant.visual_aid(&description, &subject, language).await?
        }
        Tool::Game {
            topic,
            grade,
            language,
        } => {
            let language = resolve_language(language.as_deref(), &config)?;
            assistant.educational_game(&topic, &grade, language).await?
        }
        Tool::Lesson {
            subject,
            topic,
            grade,
            duration,
            language,
        } => {
            let language = resolve_language(language.as_deref(), &config)?;
            assistant
                .lesson_plan(&subject, &topic, &grade, &duration, language)
                .await?
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}
