/// System instruction sent with every summarization request.
pub const SUMMARY_SYSTEM_PROMPT: &str = "אתה מסכם טקסטים בעברית בקצרה ובבהירות.";

/// Lead-in placed before the text to summarize in the user message.
const SUMMARY_REQUEST: &str = "צור תקציר קצר בעברית לטקסט הבא:";

/// Build the user message for `text`
pub fn build_summary_request(text: &str) -> String {
    format!("{}\n{}", SUMMARY_REQUEST, text.trim())
}
