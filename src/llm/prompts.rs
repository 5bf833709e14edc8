/// Revision of the summary prompt. Bump whenever section names or rules change.
pub const PROMPT_VERSION: u32 = 1;

/// Marker that precedes the transcript in every prompt.
pub const TRANSCRIPT_MARKER: &str = "Transcript:\n";

/// Build a deterministic summary prompt for a meeting transcript.
///
/// The transcript is interpolated verbatim after [`TRANSCRIPT_MARKER`] and
/// nowhere else.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        "Summarize the following meeting transcript as a single, structured summary in Markdown format.\n\
\n\
**Rules:**\n\
\n\
- Use clear Markdown headings (## Summary, ## Action Items, ## Attendance, ## Topics Covered).\n\
- Highlight key points with double asterisks (**bold**) or with Markdown headings.\n\
- For lists (like action items or attendees), use bullet points (-) or numbered lists.\n\
- Group all sections into one Markdown-formatted response.\n\
- Do NOT output code blocks or JSON. Do NOT use triple backticks.\n\
- Do NOT include any AI explanation, meta-commentary or disclaimer.\n\
- If the transcript has no content for a section, omit that section.\n\
\n\
**Sections to include if present:**\n\
- Summary: concise summary of key points and decisions\n\
- Action Items: list with assignee and deadline if available (e.g., \"- Draft creative concepts - Alice (by April 20)\")\n\
- Attendance: list of attendees\n\
- Topics Covered: main topics discussed\n\
\n\
{TRANSCRIPT_MARKER}{transcript}"
    )
}
