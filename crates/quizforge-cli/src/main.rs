//! Command-line front end: parse one document, print the questions.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use quizforge_core::model::QuestionKind;

#[derive(Parser)]
#[command(
    name = "quizforge",
    version,
    about = "Extract quiz questions from DOCX, PDF and TXT documents"
)]
struct Cli {
    /// Input document; the extension selects the extraction backend
    file: PathBuf,

    /// Print the questions as pretty JSON instead of a readable summary
    #[arg(long)]
    json: bool,

    /// Write extracted images into this directory
    #[arg(long, value_name = "DIR")]
    images_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let bytes = fs::read(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let filename = cli
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("input path has no filename")?;

    let outcome = quizforge_pipeline::parse_document(filename, &bytes)
        .with_context(|| format!("parsing {filename}"))?;
    info!(
        "{}: {} questions, {} images",
        filename,
        outcome.questions.len(),
        outcome.images.len()
    );

    if let Some(dir) = &cli.images_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        for image in &outcome.images {
            let path = dir.join(&image.suggested_name);
            fs::write(&path, &image.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.questions)?);
        return Ok(());
    }

    for (index, question) in outcome.questions.iter().enumerate() {
        println!("{}. {}", index + 1, question.question);
        if let Some(topic) = &question.topic {
            println!("   topic: {topic}");
        }
        match question.kind {
            QuestionKind::Mcq => {
                for (option, letter) in question.options.iter().zip('A'..) {
                    println!("   {letter}) {option}");
                }
                println!("   answer: {}", question.correct_answer);
            }
            QuestionKind::ShortAnswer => {
                println!("   answer: {}", question.correct_answer);
            }
        }
        if !question.explanation.is_empty() {
            println!("   explanation: {}", question.explanation);
        }
    }
    if outcome.questions.is_empty() {
        println!("no questions found");
    }

    Ok(())
}
