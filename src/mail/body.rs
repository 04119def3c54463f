use pulldown_cmark::{Options, Parser, html};

/// Renders a markdown body into the HTML fragment conversation messages carry.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options);
    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);
    rendered.trim_end().to_string()
}

/// Flattens an HTML message body for terminal display.
pub fn html_to_text(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut in_tag = false;
    let mut tag = String::new();

    for ch in body.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if breaks_line(&tag) {
                    text.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => text.push(ch),
        }
    }

    let decoded = html_escape::decode_html_entities(&text);
    let lines = decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>();

    let mut out = Vec::new();
    for line in lines {
        if line.is_empty() && out.last().is_none_or(|last: &String| last.is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n").trim().to_string()
}

fn breaks_line(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|ch: char| ch.is_whitespace() || ch == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(
        name.as_str(),
        "br" | "p" | "div" | "li" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_markdown_fragment() {
        let html = markdown_to_html("## Bonjour\n\nRendez-vous **demain**.");
        assert!(html.contains("<h2>Bonjour</h2>"));
        assert!(html.contains("<strong>demain</strong>"));
        assert!(!html.contains("<html"));
    }

    #[test]
    fn flattens_html_body() {
        let text =
            html_to_text("<div>Bonjour &amp; bienvenue</div><p>R&eacute;union <b>lundi</b></p><br/>");
        assert_eq!(text, "Bonjour & bienvenue\n\nRéunion lundi");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_text("hello   world"), "hello world");
    }
}
