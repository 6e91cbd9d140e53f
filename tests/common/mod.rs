//! Shared fixtures: an in-memory chat transport, a scripted command runner,
//! and a throwaway on-disk store plus registry per test.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use subscription_console::AppState;
use subscription_console::config::Config;
use subscription_console::database;
use subscription_console::services::commands::{CommandOutcome, CommandRunner};
use subscription_console::services::registry::AccountRecord;
use subscription_console::transport::{
    Actor, BotCommand, ChatApi, ChatError, Inbound, Invoice, Keyboard, Update,
};
use tempfile::TempDir;

pub const ADMIN_ID: i64 = 1;
pub const ADD_CMD: &str = "add-user";
pub const DEL_CMD: &str = "del-user";
pub const SYNC_CMD: &str = "sync-expire";
pub const HEALTH_CMD: &str = "healthcheck";
pub const METRICS_CMD: &str = "metrics";

#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub chat_id: i64,
    pub text: String,
    pub callbacks: Vec<String>,
    pub html: bool,
}

#[derive(Default)]
pub struct FakeChat {
    pub sent: Mutex<Vec<Sent>>,
    pub acks: Mutex<Vec<String>>,
    pub pre_checkouts: Mutex<Vec<(String, bool)>>,
    pub invoices: Mutex<Vec<(i64, Invoice)>>,
    pub commands: Mutex<Vec<BotCommand>>,
    pub updates: Mutex<VecDeque<Result<Vec<Update>, String>>>,
    pub fail_sends: AtomicBool,
}

impl FakeChat {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<Sent> {
        self.sent().into_iter().filter(|s| s.chat_id == chat_id).collect()
    }

    pub fn last_to(&self, chat_id: i64) -> Sent {
        self.sent_to(chat_id).pop().expect("no message sent to this chat")
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::SeqCst);
    }

    pub fn push_updates(&self, batch: Vec<Update>) {
        self.updates.lock().unwrap().push_back(Ok(batch));
    }
}

fn refused(method: &str) -> ChatError {
    ChatError::Api {
        method: method.to_string(),
        description: "forbidden: bot was blocked by the user".into(),
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn get_updates(&self, _offset: i64, _timeout: Duration) -> Result<Vec<Update>, ChatError> {
        match self.updates.lock().unwrap().pop_front() {
            Some(Ok(batch)) => Ok(batch),
            Some(Err(description)) => Err(ChatError::Api {
                method: "getUpdates".into(),
                description,
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
        html: bool,
    ) -> Result<(), ChatError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(refused("sendMessage"));
        }
        self.sent.lock().unwrap().push(Sent {
            chat_id,
            text: text.to_string(),
            callbacks: keyboard
                .map(|k| k.callbacks().into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
            html,
        });
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), ChatError> {
        self.acks.lock().unwrap().push(query_id.to_string());
        Ok(())
    }

    async fn answer_pre_checkout(&self, query_id: &str, ok: bool, _error: Option<&str>) -> Result<(), ChatError> {
        self.pre_checkouts.lock().unwrap().push((query_id.to_string(), ok));
        Ok(())
    }

    async fn send_invoice(&self, chat_id: i64, invoice: &Invoice) -> Result<(), ChatError> {
        self.invoices.lock().unwrap().push((chat_id, invoice.clone()));
        Ok(())
    }

    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), ChatError> {
        self.commands.lock().unwrap().extend_from_slice(commands);
        Ok(())
    }
}

pub fn ok(output: &str) -> CommandOutcome {
    CommandOutcome {
        code: 0,
        output: output.to_string(),
    }
}

pub fn failed(code: i32, output: &str) -> CommandOutcome {
    CommandOutcome {
        code,
        output: output.to_string(),
    }
}

/// Replays scripted outcomes per program (success with no output once a
/// script runs dry). A successful add also writes the account into the
/// registry file, the way the real provisioning command does.
pub struct FakeRunner {
    scripts: Mutex<HashMap<String, VecDeque<CommandOutcome>>>,
    calls: Mutex<Vec<Vec<String>>>,
    registry: PathBuf,
}

impl FakeRunner {
    pub fn new(registry: &Path) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            registry: registry.to_path_buf(),
        }
    }

    pub fn script(&self, program: &str, outcome: CommandOutcome) {
        self.scripts
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, program: &str) -> Vec<Vec<String>> {
        self.calls().into_iter().filter(|c| c[0] == program).collect()
    }

    fn register(&self, args: &[String]) {
        let (Some(name), Some(days)) = (arg_after(args, "--name"), arg_after(args, "--days")) else {
            return;
        };
        let mut accounts = read_registry(&self.registry);
        if accounts.iter().any(|c| c.name == name) {
            return;
        }
        let mut record = AccountRecord::new(name);
        record.expire = subscription_console::util::now_ts() + days.parse::<i64>().unwrap_or(1) * 86_400;
        accounts.push(record);
        write_registry(&self.registry, &accounts);
    }
}

fn arg_after(args: &[String], flag: &str) -> Option<String> {
    let at = args.iter().position(|a| a == flag)?;
    args.get(at + 1).cloned()
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, args: &[String], _timeout: Duration) -> CommandOutcome {
        self.calls.lock().unwrap().push(args.to_vec());
        let outcome = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&args[0])
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| ok(""));
        if args[0] == ADD_CMD && outcome.success() {
            self.register(args);
        }
        outcome
    }
}

pub fn read_registry(path: &Path) -> Vec<AccountRecord> {
    match std::fs::read_to_string(path) {
        Ok(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).unwrap(),
        _ => Vec::new(),
    }
}

pub fn write_registry(path: &Path, accounts: &[AccountRecord]) {
    let body = serde_json::to_string_pretty(accounts).unwrap();
    std::fs::write(path, body + "\n").unwrap();
}

pub fn account(name: &str, expire: i64, trial: bool, revoked: bool) -> AccountRecord {
    let mut c = AccountRecord::new(name);
    c.expire = expire;
    c.trial = trial;
    c.revoked = revoked;
    c
}

pub fn test_config(dir: &Path, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("BOT_TOKEN", "test-token"),
        ("BASE_URL", "https://sub.example.test/"),
        ("SUPPORT_TEXT", "Support: @helpdesk"),
        ("SUPPORT_CHAT_URL", "https://t.me/helpdesk"),
        ("FREE_DAYS", "1"),
        ("ADD_USER_CMD", ADD_CMD),
        ("DEL_USER_CMD", DEL_CMD),
        ("SYNC_EXPIRE_CMD", SYNC_CMD),
        ("MONITOR_CMD", HEALTH_CMD),
        ("METRICS_CMD", METRICS_CMD),
        ("ADMIN_TG_IDS", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.insert("DB_PATH".into(), dir.join("bot.db").display().to_string());
    vars.insert("CLIENTS_JSON".into(), dir.join("clients.json").display().to_string());
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub struct TestEnv {
    pub dir: TempDir,
    pub state: AppState,
    pub chat: Arc<FakeChat>,
    pub runner: Arc<FakeRunner>,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_config(&[]).await
    }

    pub async fn with_config(overrides: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Arc::new(test_config(dir.path(), overrides));
        let db = database::connect(&config.db_path).await.unwrap();
        let chat = Arc::new(FakeChat::default());
        let runner = Arc::new(FakeRunner::new(&config.clients_json));
        let state = AppState::new(db, config, chat.clone(), runner.clone());
        Self { dir, state, chat, runner }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.state.config.clients_json.clone()
    }

    pub fn seed(&self, accounts: &[AccountRecord]) {
        write_registry(&self.registry_path(), accounts);
    }

    pub fn accounts(&self) -> Vec<AccountRecord> {
        read_registry(&self.registry_path())
    }

    pub fn find(&self, name: &str) -> AccountRecord {
        self.accounts()
            .into_iter()
            .find(|c| c.name == name)
            .expect("account missing from registry")
    }
}

pub fn actor(id: i64, username: Option<&str>) -> Actor {
    Actor {
        id,
        username: username.map(str::to_string),
        first_name: Some(format!("User{id}")),
        last_name: None,
    }
}

pub fn admin() -> Actor {
    actor(ADMIN_ID, Some("boss"))
}

/// A private-chat message: chat id equals the sender's id.
pub fn text(from: &Actor, body: &str) -> Inbound {
    Inbound::Text {
        actor: from.clone(),
        chat_id: from.id,
        text: body.to_string(),
    }
}

pub fn press(from: &Actor, data: &str) -> Inbound {
    Inbound::Callback {
        query_id: format!("q-{}-{data}", from.id),
        actor: from.clone(),
        chat_id: Some(from.id),
        data: data.to_string(),
    }
}
