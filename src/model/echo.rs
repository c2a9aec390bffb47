use async_trait::async_trait;

use super::{ChatModel, ModelReply, ModelRequest, Usage};
use crate::chat::Role;
use crate::error::OmniResult;

/// Offline model that answers with a formatted echo of the last user message.
///
/// Useful for exercising the client without network access: the reply uses
/// headings, lists and code so the renderer has something to chew on.
#[derive(Debug, Default, Clone)]
pub struct EchoModel;

impl EchoModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: ModelRequest) -> OmniResult<ModelReply> {
        let last = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("[no input]");

        let persona_line = request
            .instructions
            .lines()
            .rev()
            .find(|l| l.starts_with("Current mode:"))
            .unwrap_or("Current mode: unknown.");

        let text = format!(
            "## Echo\n\
             You said:\n\
             ```text\n{last}\n```\n\
             - **turns so far:** {turns}\n\
             - *{persona_line}*\n\
             ---\n\
             Offline model; no request left this machine.",
            turns = request.messages.len(),
        );

        let input_tokens = request.instructions.split_whitespace().count()
            + request.messages.iter().map(|m| m.content.split_whitespace().count()).sum::<usize>();
        let output_tokens = text.split_whitespace().count();

        Ok(ModelReply {
            text,
            searched: request.web_search,
            usage: Some(Usage {
                input_tokens: input_tokens as u64,
                output_tokens: output_tokens as u64,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{render, Block};
    use crate::model::ApiMessage;

    fn request(content: &str, web_search: bool) -> ModelRequest {
        ModelRequest {
            instructions: "You are X.\n\nCurrent mode: CODER. Date: 2026-01-01.".into(),
            messages: vec![ApiMessage { role: Role::User, content: content.into() }],
            web_search,
        }
    }

    #[tokio::test]
    async fn test_echo_reply() {
        let reply = EchoModel::new().complete(request("# hello <b>", true)).await.unwrap();
        assert!(reply.searched);
        assert!(reply.usage.unwrap().total() > 0);

        // The echoed text lands inside a code block, never as a heading
        let doc = render(&reply.text);
        assert!(doc.code_blocks().any(|(lang, text)| lang == "text" && text == "# hello <b>"));
        assert!(doc.blocks.iter().any(|b| matches!(b, Block::List(items) if items.len() == 2)));
    }
}
