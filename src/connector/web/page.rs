//! Static page chrome for the chat UI.
//!
//! Help text, tips and message bodies are markdown rendered with
//! [`markdown::to_html`], which escapes raw HTML.

use crate::domain::{ChatMessage, Transcript};

pub const PAGE_TITLE: &str = "Public Safety Chatbot";
pub const PAGE_ICON: &str = "🚔";
pub const HOME_ICON: &str = "🏠";
pub const INPUT_PLACEHOLDER: &str = "Ask for safety tips...";

pub const HELP_MARKDOWN: &str = "\
#### Welcome to the Public Safety Chatbot
This chatbot is designed to provide you with important safety and awareness information. \
It is a multilingual platform, so feel free to ask questions in your preferred language. \
Here are some questions you might ask:
- \"List some safety tips.\"
- \"List new police initiatives that I need to be aware of.\"

Feel free to explore and ask other questions related to public safety!
";

pub const TIPS_MARKDOWN: &str = "\
### Safety and Awareness Tips
- **Tip 1:** Always be aware of your surroundings.
- **Tip 2:** Do not share personal information with strangers.
- **Tip 3:** Report any suspicious activity to the police immediately.
- **Tip 4:** Keep emergency numbers saved in your phone.
- **Tip 5:** Follow the local laws and regulations for your safety.
";

const STYLESHEET: &str = "
body {
    background-color: #1e1e2f;
    color: #ffffff;
    font-family: sans-serif;
    margin: 0;
}
.app {
    background-color: #1e1e2f;
    color: #ffffff;
    max-width: 46rem;
    margin: 0 auto;
    padding: 1rem;
}
.messages {
    max-height: 60vh;
    overflow-y: auto;
}
.chat-message {
    border-radius: 10px;
    padding: 10px;
    margin: 5px;
    background-color: #2a2a40;
    border: 2px solid #4a69bd;
}
.chat-message.user {
    background-color: #4a69bd;
    color: #ffffff;
}
.chat-message.assistant {
    background-color: #6a89cc;
    color: #ffffff;
}
.error {
    border: 2px solid #e55039;
    border-radius: 10px;
    padding: 10px;
    margin: 5px;
}
button, .home-button {
    background-color: #4a69bd;
    color: #ffffff;
    border: none;
    border-radius: 6px;
    padding: 6px 12px;
    text-decoration: none;
}
form.chat-input {
    display: flex;
    gap: 8px;
}
form.chat-input input {
    flex: 1;
    padding: 8px;
}
";

/// Render the full page: chrome, transcript and chat input.
///
/// `error` is shown above the input when the last turn failed.
pub fn render_page(transcript: &Transcript, error: Option<&str>) -> String {
    let mut messages = String::new();
    for message in transcript {
        messages.push_str(&render_message(message));
    }

    let error_banner = error
        .map(|e| format!("<div class=\"error\" role=\"alert\">{}</div>\n", escape_html(e)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{PAGE_TITLE}</title>
<link rel=\"icon\" href=\"data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>{PAGE_ICON}</text></svg>\">
<style>{STYLESHEET}</style>
</head>
<body>
<main class=\"app\">
<h1>{PAGE_ICON} {PAGE_TITLE}</h1>
<a class=\"home-button\" href=\"/\" title=\"Home\">{HOME_ICON}</a>
<section class=\"help\">
{help}</section>
<section class=\"tips\">
{tips}</section>
<section class=\"messages\">
{messages}</section>
{error_banner}<form class=\"chat-input\" method=\"post\" action=\"/chat\">
<input type=\"text\" name=\"prompt\" placeholder=\"{INPUT_PLACEHOLDER}\" autocomplete=\"off\" autofocus>
<button type=\"submit\">Send</button>
</form>
</main>
</body>
</html>
",
        help = markdown::to_html(HELP_MARKDOWN),
        tips = markdown::to_html(TIPS_MARKDOWN),
    )
}

fn render_message(message: &ChatMessage) -> String {
    format!(
        "<div class=\"chat-message {role}\">\n{body}</div>\n",
        role = message.role(),
        body = markdown::to_html(message.content()),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_renders_chrome() {
        let html = render_page(&Transcript::new(), None);

        assert!(html.contains("<title>Public Safety Chatbot</title>"));
        assert!(html.contains("Welcome to the Public Safety Chatbot"));
        assert!(html.contains("<strong>Tip 5:</strong>"));
        assert!(html.contains(INPUT_PLACEHOLDER));
        assert!(html.contains("href=\"/\""));
        assert!(!html.contains("chat-message user"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn messages_render_in_order_with_role_classes() {
        let mut transcript = Transcript::new();
        transcript.append(ChatMessage::user("first question"));
        transcript.append(ChatMessage::assistant("**bold** answer"));

        let html = render_page(&transcript, None);

        let user_at = html.find("chat-message user").unwrap();
        let assistant_at = html.find("chat-message assistant").unwrap();
        assert!(user_at < assistant_at);
        assert!(html.contains("<strong>bold</strong> answer"));
    }

    #[test]
    fn raw_html_in_messages_is_not_passed_through() {
        let mut transcript = Transcript::new();
        transcript.append(ChatMessage::user("<script>alert(1)</script>"));

        let html = render_page(&transcript, None);

        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn error_banner_is_escaped() {
        let html = render_page(&Transcript::new(), Some("bad <thing>"));
        assert!(html.contains("bad &lt;thing&gt;"));
    }
}
