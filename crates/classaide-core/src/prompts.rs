//! Prompt builders for the classroom tools.
//!
//! Each builder is a pure function of the form fields; the
//! [`Assistant`](crate::assistant::Assistant) sends the result to a provider.

use crate::model::{ContentType, Language, MaterialType};

/// Story, poem, explanation or example rooted in the students' surroundings.
pub fn hyper_local_content(
    content_type: ContentType,
    topic: &str,
    grade_level: &str,
    local_context: &str,
    language: Language,
) -> String {
    let lang = language.name();
    format!(
        "Create a {content_type} about \"{topic}\" for {grade_level} students in {lang} language.\n\
         \n\
         Requirements:\n\
         - Use local context: {local_context}\n\
         - Make it culturally relevant and relatable\n\
         - Use simple, age-appropriate language\n\
         - Include local examples and references\n\
         - Make it engaging and educational\n\
         \n\
         Please provide the content in {lang} with proper formatting."
    )
}

/// One grade's version of a worksheet, quiz, activity or summary.
pub fn differentiated_material(
    topic: &str,
    grade: &str,
    material_type: MaterialType,
    language: Language,
) -> String {
    let lang = language.name();
    format!(
        "Create a {material_type} for Grade {grade} on the topic \"{topic}\" in {lang}.\n\
         \n\
         Requirements for Grade {grade}:\n\
         - Age-appropriate difficulty level\n\
         - Relevant questions and activities\n\
         - Clear instructions in {lang}\n\
         - Include answer key if applicable\n\
         \n\
         Format as a complete {material_type} ready for classroom use."
    )
}

pub fn student_answer(question: &str, grade_level: &str, language: Language) -> String {
    format!(
        "Answer this student question in {lang} for {grade_level} level:\n\
         \"{question}\"\n\
         \n\
         Requirements:\n\
         - Use simple, clear language appropriate for {grade_level}\n\
         - Provide relatable examples and analogies\n\
         - Make it engaging and easy to understand\n\
         - Include practical applications if relevant\n\
         - Keep the explanation concise but complete",
        lang = language.name()
    )
}

/// Drawing instructions for a blackboard-friendly visual aid.
pub fn visual_aid(description: &str, subject: &str, language: Language) -> String {
    let lang = language.name();
    format!(
        "Create detailed instructions for drawing/creating a visual aid based on this description:\n\
         \"{description}\"\n\
         \n\
         Subject: {subject}\n\
         Language: {lang}\n\
         \n\
         Provide:\n\
         1. Step-by-step drawing instructions\n\
         2. Labels and text in {lang}\n\
         3. Key elements to include\n\
         4. Suggested colors and layout\n\
         5. Educational points to highlight\n\
         \n\
         Make it suitable for blackboard or simple drawing materials."
    )
}

pub fn educational_game(topic: &str, grade_level: &str, language: Language) -> String {
    format!(
        "Create an interactive educational game about \"{topic}\" for {grade_level} in {lang}.\n\
         \n\
         Include:\n\
         1. Game name and objective\n\
         2. Rules and instructions\n\
         3. Questions or challenges (at least 10)\n\
         4. Scoring system\n\
         5. Materials needed (simple classroom items)\n\
         6. Variations for different skill levels\n\
         \n\
         Make it engaging, educational, and easy to implement in a classroom setting.",
        lang = language.name()
    )
}

pub fn lesson_plan(
    subject: &str,
    topic: &str,
    grade_level: &str,
    duration: &str,
    language: Language,
) -> String {
    format!(
        "Create a detailed lesson plan in {lang} for:\n\
         Subject: {subject}\n\
         Topic: {topic}\n\
         Grade: {grade_level}\n\
         Duration: {duration}\n\
         \n\
         Include:\n\
         1. Learning objectives\n\
         2. Materials needed\n\
         3. Introduction activity (5-10 minutes)\n\
         4. Main lesson content with activities\n\
         5. Assessment methods\n\
         6. Homework/follow-up activities\n\
         7. Differentiation strategies\n\
         8. Time allocation for each section\n\
         \n\
         Make it practical for rural classroom settings with limited resources.",
        lang = language.name()
    )
}

/// Prompt accompanying a photographed textbook page.
pub fn textbook_image_analysis(instructions: &str) -> String {
    format!(
        "Analyze this textbook page image and {instructions}\n\
         \n\
         Please provide a detailed analysis and follow the specific instructions given."
    )
}

/// Instructions used when chaining page analysis into per-grade materials.
pub fn textbook_material_instructions(material_type: MaterialType, grades: &[String]) -> String {
    format!(
        "Create {material_type} for grades {} based on this textbook page",
        grades.join(", ")
    )
}

pub fn translation(text: &str, language: Language) -> String {
    format!(
        "Translate the following text to {}. Only provide the translation, no additional text:\n\n\"{text}\"",
        language.name()
    )
}
