//! 提示词构建
//!
//! 分级内容生成、作答反馈、出题、学习材料与测评反馈的提示词模板。

use crate::models::Difficulty;

/// 模块正文在提示词中的最大长度（字符）
pub const MODULE_TEXT_LIMIT: usize = 2000;
/// 提示词末尾重复正文摘要的长度（字符）
pub const MODULE_EXCERPT_LIMIT: usize = 500;

/// 按字符截断，保证不会切断多字节字符
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

struct LevelWording {
    content: &'static str,
    mcq: &'static str,
    short: &'static str,
}

fn wording(difficulty: Difficulty) -> LevelWording {
    match difficulty {
        Difficulty::Easy => LevelWording {
            content: "a clear and simple beginner-level explanation (at least 80 words). Avoid placeholders or repetition.",
            mcq: "basic question.",
            short: "short-answer question for beginners.",
        },
        Difficulty::Medium => LevelWording {
            content: "a detailed, intermediate-level explanation (at least 100 words). Cover key topics and examples.",
            mcq: "intermediate-level question.",
            short: "intermediate-level short-answer question.",
        },
        Difficulty::High => LevelWording {
            content: "an advanced-level explanation (at least 120 words). Include applied/critical concepts and real-world relevance.",
            mcq: "advanced-level question.",
            short: "advanced-level short-answer question.",
        },
    }
}

/// 单个难度的内容生成提示词
pub fn difficulty_prompt(difficulty: Difficulty, title: &str, module_text: &str) -> String {
    let w = wording(difficulty);
    let level = difficulty.as_str();

    format!(
        r#"You are to produce ONLY a JSON object, no markdown fences, no explanations, no "thinking".
Given a learning module titled "{title}", with content (truncated):
"{text}..."
Return ONLY valid JSON with these keys:
{{
  "{content_key}": "string - {content_desc}",
  "questions": {{
    "{level}": {{
      "mcq": [
        {{
          "question": "string - {mcq_desc}",
          "options": ["Option A", "Option B", "Option C", "Option D"],
          "answer": "exactly one of the options above.",
          "explanation": "20-40 words explaining why the answer is correct."
        }}
      ],
      "short": [
        {{
          "question": "string - {short_desc}",
          "answer": "concise factual answer (1-2 sentences).",
          "explanation": "15-35 words explaining the concept clearly."
        }}
      ]
    }}
  }}
}}


Title: "{title}"
Content: "{excerpt}""#,
        title = title,
        text = truncate_chars(module_text, MODULE_TEXT_LIMIT),
        content_key = difficulty.content_key(),
        content_desc = w.content,
        level = level,
        mcq_desc = w.mcq,
        short_desc = w.short,
        excerpt = truncate_chars(module_text, MODULE_EXCERPT_LIMIT),
    )
}

/// 单题作答反馈提示词
pub fn answer_feedback_prompt(question: &str, correct_answer: &str, student_answer: &str) -> String {
    format!(
        "Provide concise formative feedback.\n\n\
         Question: {question}\n\
         Correct Answer: {correct_answer}\n\
         Student Answer: {student_answer}\n\n\
         - If correct: confirm & add one helpful insight.\n\
         - If incorrect: explain the mismatch and give 1 hint."
    )
}

/// 选择题批量生成提示词
pub fn questions_prompt(topic: &str, level: &str, num_questions: u32) -> String {
    format!(
        r#"Generate {num_questions} multiple-choice questions about {topic} for a {level} level student.
Each question should have 4 options (A, B, C, D) and indicate the correct answer.
Also include a brief explanation for each answer.

Format the response as a JSON array with the following structure:
[
  {{
    "id": "unique-question-id",
    "text": "The question text",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correctAnswer": 0-3 (index of correct option),
    "explanation": "Brief explanation of the correct answer"
  }}
]

Keep the questions focused on {topic} and ensure they are appropriate for the {level} difficulty level.
Make sure each question is unique and covers different aspects of {topic}."#
    )
}

/// 学习材料生成提示词
pub fn learning_materials_prompt(topic: &str, level: &str, num_items: u32) -> String {
    format!(
        r#"Generate {num_items} learning materials about {topic} for a {level} level student.
Each learning material should have a title and content explaining the concept.
The content should be detailed enough to teach the concept but not too overwhelming.

Format the response as a JSON array with the following structure:
[
  {{
    "id": "unique-item-id",
    "title": "Title of the learning item",
    "content": "Detailed content explaining the concept in a clear way"
  }}
]

Ensure the learning materials are appropriate for the {level} difficulty level and cover various aspects of {topic}.
The materials should build on each other to create a comprehensive learning path."#
    )
}

/// 前后测对比反馈提示词
pub fn performance_feedback_prompt(
    pre_test_score: f64,
    post_test_score: f64,
    topic: &str,
    level: &str,
) -> String {
    format!(
        r#"Generate personalized feedback for a student who completed the {topic} module.
Pre-test score: {pre_test_score}%
Post-test score: {post_test_score}%
Level: {level}

Provide feedback that includes:
1. An assessment of the student's performance
2. Recognition of improvement (or lack thereof)
3. Specific areas of strength
4. Areas that need improvement
5. Recommendations for next steps

Format the response as a JSON object with the following structure:
{{
  "summary": "A brief summary of the performance",
  "strengths": ["List of strengths"],
  "improvements": ["List of areas for improvement"],
  "recommendations": ["List of recommendations for future learning"]
}}

The feedback should be encouraging but honest, appropriate for the student's level,
and actionable for future learning."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_difficulty_prompt_mentions_level_keys() {
        let prompt = difficulty_prompt(Difficulty::High, "Thermodynamics", "Energy is conserved.");
        assert!(prompt.contains("\"content_high\""));
        assert!(prompt.contains("\"high\": {"));
        assert!(prompt.contains("at least 120 words"));
        assert!(prompt.contains("Title: \"Thermodynamics\""));
        assert!(prompt.starts_with("You are to produce ONLY a JSON object"));
    }

    #[test]
    fn test_difficulty_prompt_word_minimums() {
        assert!(difficulty_prompt(Difficulty::Easy, "t", "x").contains("at least 80 words"));
        assert!(difficulty_prompt(Difficulty::Medium, "t", "x").contains("at least 100 words"));
    }

    #[test]
    fn test_difficulty_prompt_truncates_module_text() {
        let text = "a".repeat(3000);
        let prompt = difficulty_prompt(Difficulty::Easy, "Long", &text);
        assert!(prompt.contains(&format!("\"{}...\"", "a".repeat(2000))));
        assert!(!prompt.contains(&"a".repeat(2001)));
        assert!(prompt.ends_with(&format!("Content: \"{}\"", "a".repeat(500))));
    }

    #[test]
    fn test_answer_feedback_prompt() {
        let prompt = answer_feedback_prompt("2+2?", "4", "5");
        assert!(prompt.contains("Correct Answer: 4"));
        assert!(prompt.contains("Student Answer: 5"));
    }

    #[test]
    fn test_adhoc_prompts_embed_counts() {
        assert!(questions_prompt("Algebra", "easy", 30).starts_with("Generate 30 multiple-choice"));
        assert!(learning_materials_prompt("Algebra", "high", 10).starts_with("Generate 10 learning"));
        let feedback = performance_feedback_prompt(40.0, 85.0, "Algebra", "medium");
        assert!(feedback.contains("Pre-test score: 40%"));
        assert!(feedback.contains("Post-test score: 85%"));
    }
}
