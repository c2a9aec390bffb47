//! Integration tests for the Omni library

use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_crate_root_reexports() {
    use omni::{ChatSession, Config, KvStore, MemoryKvStore, OmniError, OmniResult, Role};

    let kv = Arc::new(MemoryKvStore::new());
    let mut session = ChatSession::open(kv.clone(), &Config::default());
    let result: OmniResult<_> = session.set_persona("pirate").map(|p| p.key);
    assert!(matches!(result, Err(OmniError::UnknownPersona(ref key)) if key == "pirate"));

    session.begin_send("hello").unwrap();
    assert_eq!(session.messages()[0].role, Role::User);
    assert!(kv.get(omni::chat::HISTORY_KEY).unwrap().is_some());
}

#[test]
fn test_config_default() {
    use omni::Config;

    let config = Config::default();
    assert_eq!(config.data_dir.to_str().unwrap(), "./data");
    assert_eq!(config.persona, "omni");
    assert!(!config.web_search);
    assert!(config.memory_enabled);
}

#[test]
fn test_render_reply_to_html() {
    let doc = omni::render(
        "## Plan\nSteps:\n1. **Parse** input\n2. Emit `html`\n```rust\nlet x = a < b;\n```\n---",
    );
    assert_eq!(
        doc.to_html(),
        "<h2 class=\"md-h2\">Plan</h2>\n\
         <p class=\"md-p\">Steps:</p>\n\
         <ul class=\"md-ul\"><li class=\"md-li md-ol\"><strong>Parse</strong> input</li><li class=\"md-li md-ol\">Emit <code class=\"inline-code\">html</code></li></ul>\n\
         <div class=\"code-block\"><div class=\"code-lang\">rust</div><pre><code>let x = a &lt; b;</code></pre></div>\n\
         <hr class=\"md-hr\"/>"
    );
}

#[test]
fn test_render_never_emits_raw_markup() {
    let hostile = "<img src=x onerror=alert(1)>\n# <b>hi</b>\n- <i>x</i>\n```<script>\n</script>\n```";
    let html = omni::render(hostile).to_html();
    assert!(!html.contains("<img"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("<b>"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
}

#[test]
fn test_render_is_deterministic() {
    let raw = "# T\n*a* **b** `c`\n- x\n```\ny\n```";
    assert_eq!(omni::render(raw), omni::render(raw));
    assert_eq!(omni::render(raw).to_html(), omni::render(raw).to_html());
}

#[test]
fn test_persona_registry_fails_closed() {
    use omni::PersonaRegistry;

    let registry = PersonaRegistry::builtin();
    assert_eq!(registry.get("nonexistent").key, "omni");
    assert_eq!(registry.get("").key, "omni");
    assert_eq!(registry.get("strategist").label, "STRAT");
}

#[test]
fn test_fjall_store_session_persistence() {
    use omni::{ChatSession, Config};
    use omni::model::ModelReply;

    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: temp_dir.path().to_path_buf(),
        ..Config::default()
    };

    {
        let store = config.open_store().unwrap();
        let mut session = ChatSession::open(store.clone(), &config);
        let turn = session.begin_send("What is fjall?").unwrap();
        session.complete_send(turn, Ok(ModelReply::text("An **LSM** keyspace.")));
        let id = session.add_note("Works on storage engines").unwrap();
        assert!(id > 0);
        store.flush().unwrap();
    }

    let store = config.open_store().unwrap();
    let session = ChatSession::open(store, &config);
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[1].content, "An **LSM** keyspace.");
    assert_eq!(session.notes().len(), 1);
    assert_eq!(session.notes()[0].text, "Works on storage engines");
}

#[test]
fn test_history_retention_window() {
    use omni::chat::{ConversationStore, Message, HISTORY_KEY, HISTORY_LIMIT};
    use omni::{KvStore, MemoryKvStore};

    let kv = Arc::new(MemoryKvStore::new());
    let mut history = ConversationStore::new(kv.clone());
    for i in 0..(HISTORY_LIMIT + 7) {
        history.append(Message::user(format!("message {}", i), "omni"));
    }
    assert_eq!(history.len(), HISTORY_LIMIT + 7);

    let persisted: Vec<Message> = serde_json::from_str(&kv.get(HISTORY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted.len(), HISTORY_LIMIT);
    assert_eq!(persisted[0].content, "message 7");

    let reloaded = ConversationStore::load(kv);
    assert_eq!(reloaded.len(), HISTORY_LIMIT);
}

#[test]
fn test_message_wire_format() {
    use omni::chat::Message;

    let msg = Message::error("timeout", "coder");
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["role"], "assistant");
    assert_eq!(value["content"], "**Error:** timeout");
    assert_eq!(value["mode"], "coder");
    assert_eq!(value["isError"], true);
    assert_eq!(value["searched"], false);
    assert!(value["ts"].is_i64());
}

#[tokio::test]
async fn test_echo_model_session() {
    use omni::{ChatSession, Config, EchoModel, MemoryKvStore};

    let mut session = ChatSession::open(Arc::new(MemoryKvStore::new()), &Config::default());
    session.set_web_search(true);
    let model = EchoModel::new();

    let reply = session.send("ping", &model).await.unwrap().clone();
    assert!(reply.searched);
    assert!(reply.content.contains("ping"));

    let doc = omni::render(&reply.content);
    assert!(doc.code_blocks().any(|(_, text)| text == "ping"));
}
