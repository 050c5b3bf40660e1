use minijinja::{context, Environment};
use serde::Serialize;

use crate::conversation::conversation::Conversation;
use crate::conversation::message::{Message, Role};
use crate::render::markdown::markdown_to_html;
use crate::render::report::StockReport;

#[derive(Debug, Serialize)]
struct MessageView {
  id: String,
  role: Role,
  html: String,
  time: String,
  report: Option<StockReport>,
}

impl MessageView {
  fn from_message(message: &Message) -> Self {
    MessageView {
      id: message.id.clone(),
      role: message.role,
      html: markdown_to_html(&message.content),
      time: message.created_at.format("%H:%M UTC").to_string(),
      report: message.data.as_ref().and_then(StockReport::from_value),
    }
  }
}

pub struct TemplateEngine {
  env: Environment<'static>,
}

impl TemplateEngine {
  pub fn new() -> anyhow::Result<Self> {
    let mut env: Environment<'static> = Environment::new();
    env.add_template("page.html", include_str!("templates/page.html"))?;
    env.add_template("message.html", include_str!("templates/message.html"))?;
    env.add_template("report.html", include_str!("templates/report.html"))?;
    env.add_template("loader.html", include_str!("templates/loader.html"))?;
    Ok(TemplateEngine { env })
  }

  pub fn render_page(&self, conversation: &Conversation) -> anyhow::Result<String> {
    let messages: Vec<MessageView> = conversation.messages().iter().map(MessageView::from_message).collect();
    let template = self.env.get_template("page.html")?;
    let html: String = template.render(context! {
      messages => messages,
      in_flight => conversation.in_flight(),
    })?;
    Ok(html)
  }
}
