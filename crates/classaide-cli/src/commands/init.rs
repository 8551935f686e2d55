//! The `classaide init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("classaide.toml").exists() {
        println!("classaide.toml already exists, skipping.");
    } else {
        std::fs::write("classaide.toml", SAMPLE_CONFIG)?;
        println!("Created classaide.toml");
    }

    std::fs::create_dir_all("rosters")?;
    let example_path = std::path::Path::new("rosters/example.toml");
    if example_path.exists() {
        println!("rosters/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ROSTER)?;
        println!("Created rosters/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set GEMINI_API_KEY or edit classaide.toml");
    println!("  2. Run: classaide validate --roster rosters/example.toml");
    println!("  3. Run: classaide batch --roster rosters/example.toml --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# classaide configuration

default_provider = "gemini"
default_model = "gemini-pro"
vision_model = "gemini-pro-vision"
language = "en"
temperature = 0.7
max_tokens = 2048
output_dir = "./classaide-results"

[assessment]
pronunciation_penalty = 10
max_struggled_words = 5
max_recommendations = 3

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;

const EXAMPLE_ROSTER: &str = r#"[assessment]
id = "example"
name = "Example Class"
expected_text = "The quick brown fox jumps over the lazy dog"
language = "en"
grade = "Grade 3"

[[readings]]
student = "Asha"
transcript = "the quick brown fox jumps over the lazy dog"

[[readings]]
student = "Ravi"
transcript = "the quick brown fox jumps over the lazy cat"

[[readings]]
student = "Meena"
transcript = "the quick brown box"
"#;
