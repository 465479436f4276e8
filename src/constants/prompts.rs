pub const QUESTION_WRITER_ROLE: &str = "You are a teaching assistant who writes exam-quality multiple-choice questions. You answer with JSON only, never with prose or markdown.";

pub const QUESTION_RULES: &str = "Each question must have:
- \"question\": the question statement
- \"options\": an array of exactly 4 distinct answer options
- \"correctAnswer\": the 0-based index of the correct option
- \"explanation\": a brief explanation of the answer

Return the response as a JSON array of such objects and nothing else.";

pub const EVALUATOR_ROLE: &str = "You are an expert evaluator for competitive exam descriptive writing. You answer with JSON only.";

pub fn from_text_prompt(text: &str, topic: Option<&str>, count: usize, schema: &str) -> String {
    let focus = topic
        .map(|t| format!(" Focus the questions on: {}.", t))
        .unwrap_or_default();

    format!(
        "Based on the following content, generate {count} multiple-choice questions.{focus}

{QUESTION_RULES}

The objects must conform to this JSON schema:
{schema}

Content:
\"\"\"
{text}
\"\"\""
    )
}

pub fn category_prompt(subject: &str, count: usize, schema: &str) -> String {
    format!(
        "Generate {count} multiple-choice questions testing {subject}. Prefer recent, verifiable facts and avoid trick questions.

{QUESTION_RULES}

The objects must conform to this JSON schema:
{schema}"
    )
}

pub fn evaluate_prompt(exam_name: &str, question: &str, answer: &str) -> String {
    format!(
        "Evaluate the following answer written for the {exam_name} descriptive writing section.

Question: {question}
Answer: {answer}

Provide:
1. A score out of 100
2. Detailed feedback on content, structure and language
3. A list of strengths
4. A list of areas to improve
5. Specific suggestions for improvement

Format the response as a JSON object with these fields:
{{
  \"score\": number,
  \"feedback\": string,
  \"strengths\": string[],
  \"areasToImprove\": string[],
  \"suggestions\": string[]
}}"
    )
}

pub fn improve_prompt(exam_name: &str, question: &str, answer: &str) -> String {
    format!(
        "You are an expert evaluator for the {exam_name} descriptive writing section.
Improve the following answer while keeping its core meaning and structure. Make it more concise, clear and effective, paying attention to grammar, coherence, vocabulary and flow.

Question: {question}
Original Answer: {answer}

Reply with the improved answer only, without comments or explanations."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_prompt_includes_topic_and_count() {
        let prompt = from_text_prompt("Photosynthesis converts light.", Some("biology"), 5, "{}");

        assert!(prompt.contains("generate 5 multiple-choice"));
        assert!(prompt.contains("Focus the questions on: biology."));
        assert!(prompt.contains("Photosynthesis converts light."));
    }

    #[test]
    fn evaluate_prompt_escapes_braces() {
        let prompt = evaluate_prompt("SSC CGL", "Q", "A");
        assert!(prompt.contains("\"areasToImprove\": string[]"));
        assert!(prompt.starts_with("Evaluate"));
    }
}
