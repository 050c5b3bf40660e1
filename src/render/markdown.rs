use pulldown_cmark::{html, Event, Options, Parser};

/// GFM-flavoured markdown to HTML. Raw HTML in the source is escaped, never emitted.
pub fn markdown_to_html(markdown: &str) -> String {
  let mut options: Options = Options::empty();
  options.insert(Options::ENABLE_TABLES);
  options.insert(Options::ENABLE_STRIKETHROUGH);
  options.insert(Options::ENABLE_TASKLISTS);

  let parser = Parser::new_ext(markdown, options).map(|event| match event {
    Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
    other => other,
  });

  let mut html_output: String = String::new();
  html::push_html(&mut html_output, parser);
  html_output
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_headings_and_emphasis() {
    let html: String = markdown_to_html("## Outlook\n\nA **strong** quarter.");
    assert!(html.contains("<h2>Outlook</h2>"));
    assert!(html.contains("<strong>strong</strong>"));
  }

  #[test]
  fn renders_tables() {
    let html: String = markdown_to_html("| Metric | Value |\n|---|---|\n| P/E | 28.4 |\n");
    assert!(html.contains("<table>"));
    assert!(html.contains("<td>28.4</td>"));
  }

  #[test]
  fn escapes_raw_html() {
    let html: String = markdown_to_html("<script>alert(1)</script>\n\nhi <b>there</b>");
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<b>"));
  }
}
