// ============================================================
// Layer 1 — Page Rendering
// ============================================================
// HTML for the single form page. Rendered server-side on every
// request; there is no client-side script.

use crate::domain::query::EXAMPLES;
use crate::web::form::escape_html;

pub const TITLE: &str = "📊 Quant AI Q&A Bot";
pub const DESCRIPTION: &str =
    "Ask a quantitative-finance question and give me some context. I'll do my best to answer! 🤖";

/// What the form currently shows.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormState {
    pub question: String,
    pub context:  String,
    pub answer:   String,
    /// User-facing error line, shown above the answer field
    pub error:    Option<&'static str>,
}

pub fn render(state: &FormState) -> String {
    let examples: String = EXAMPLES
        .iter()
        .enumerate()
        .map(|(i, ex)| format!(
            r#"      <li><a href="/?example={i}">{q}</a></li>"#,
            q = escape_html(ex.question),
        ))
        .collect::<Vec<_>>()
        .join("\n");

    let error = state
        .error
        .map(|msg| format!(r#"    <p class="error">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: sans-serif; max-width: 46rem; margin: 2rem auto; }}
    label {{ display: block; margin-top: 1rem; font-weight: bold; }}
    input, textarea {{ width: 100%; box-sizing: border-box; }}
    .error {{ color: #b00020; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>{description}</p>
  <form method="post" action="/">
    <label for="question">question</label>
    <input id="question" name="question" type="text" value="{question}">
    <label for="context">context</label>
    <textarea id="context" name="context" rows="8">{context}</textarea>
    <button type="submit">Submit</button>
  </form>
{error}
  <label for="answer">answer</label>
  <textarea id="answer" rows="3" readonly>{answer}</textarea>
  <h2>Examples</h2>
  <ul>
{examples}
  </ul>
</body>
</html>
"#,
        title       = escape_html(TITLE),
        description = escape_html(DESCRIPTION),
        question    = escape_html(&state.question),
        context     = escape_html(&state.context),
        answer      = escape_html(&state.answer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_example() {
        let html = render(&FormState::default());
        assert!(html.contains(r#"href="/?example=0""#));
        assert!(html.contains(r#"href="/?example=1""#));
        assert!(html.contains("What is Black-Scholes model?"));
        assert!(!html.contains(r#"class="error""#));
    }

    #[test]
    fn test_render_escapes_user_text() {
        let html = render(&FormState {
            question: r#""><script>alert(1)</script>"#.into(),
            answer:   "<b>".into(),
            ..Default::default()
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_render_shows_error_line() {
        let html = render(&FormState { error: Some("oops"), ..Default::default() });
        assert!(html.contains(r#"<p class="error">oops</p>"#));
    }
}
