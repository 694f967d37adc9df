//! Telegram Bot API front end.
//!
//! Long-polls `getUpdates` and turns commands, menu buttons and
//! inline button presses into [RouteCommands] calls. Everything the
//! user sees besides the menu comes from the returned [Reply].

use crate::options::{Keyboard, Telegram};
use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use route::{
    format::{NEXT_POINT_BUTTON, SHOW_PROFILE_BUTTON, START_ROUTE_BUTTON},
    Reply, RouteCommands, SessionId,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::mpsc;

/// Server side long poll duration, in seconds.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed poll.
const POLL_RETRY: Duration = Duration::from_secs(5);

const GREETING: &str = "Hi! I help build route elevation profiles.\n\
                        /menu - open the route menu";

const MENU: &str = "Route menu:\n\
                    🚴 Start route - begin a new route\n\
                    ✨ Next point - add a point to the route\n\
                    ➡️ Show route profile - show the route so far";

const USE_MENU: &str = "Use /menu to work with your route.";

/// The three things a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    StartRoute,
    NextPoint,
    ShowProfile,
}

impl Action {
    const ALL: [Self; 3] = [Self::StartRoute, Self::NextPoint, Self::ShowProfile];

    fn label(self) -> &'static str {
        match self {
            Self::StartRoute => START_ROUTE_BUTTON,
            Self::NextPoint => NEXT_POINT_BUTTON,
            Self::ShowProfile => SHOW_PROFILE_BUTTON,
        }
    }

    fn callback_data(self) -> &'static str {
        match self {
            Self::StartRoute => "start_route",
            Self::NextPoint => "next_point",
            Self::ShowProfile => "show_profile",
        }
    }

    fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.callback_data() == data)
    }
}

/// What an incoming text message asks of us.
#[derive(Debug, PartialEq, Eq)]
enum Event<'a> {
    Greet,
    Menu,
    Action(Action),
    Text(&'a str),
}

fn classify(text: &str) -> Event<'_> {
    let text = text.trim();
    if let Some(action) = Action::ALL.into_iter().find(|a| a.label() == text) {
        return Event::Action(action);
    }
    // Commands may be addressed as `/cmd@bot_name` in group chats.
    let command = text
        .strip_prefix('/')
        .and_then(|cmd| cmd.split_whitespace().next())
        .map(|cmd| cmd.split('@').next().unwrap_or(cmd));
    match command {
        Some("start") => Event::Greet,
        Some("menu") => Event::Menu,
        Some("route") => Event::Action(Action::StartRoute),
        Some("next") => Event::Action(Action::NextPoint),
        Some("profile") => Event::Action(Action::ShowProfile),
        _ => Event::Text(text),
    }
}

fn menu_markup(keyboard: Keyboard) -> Value {
    match keyboard {
        Keyboard::Reply => json!({
            "keyboard": [Action::ALL.map(|a| json!({"text": a.label()}))],
            "resize_keyboard": true,
            "is_persistent": true,
        }),
        Keyboard::Inline => json!({
            "inline_keyboard": Action::ALL.map(|a| [json!({
                "text": a.label(),
                "callback_data": a.callback_data(),
            })]),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
    callback_query: Option<CallbackQuery>,
}

impl Update {
    fn chat_id(&self) -> Option<i64> {
        self.message
            .as_ref()
            .or_else(|| self.callback_query.as_ref()?.message.as_ref())
            .map(|message| message.chat.id)
    }
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    id: String,
    message: Option<Message>,
    data: Option<String>,
}

/// Minimal Bot API client.
#[derive(Clone)]
struct BotApi {
    http: reqwest::Client,
    /// `<api_url>/bot<token>`
    base: String,
}

impl BotApi {
    fn new(api_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()?;
        let base = format!("{}/bot{token}", api_url.trim_end_matches('/'));
        Ok(Self { http, base })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base)
    }

    async fn decode<T: DeserializeOwned>(method: &str, resp: reqwest::Response) -> Result<T> {
        let ApiResponse {
            ok,
            result,
            description,
        } = resp.json::<ApiResponse<T>>().await?;
        match (ok, result) {
            (true, Some(result)) => Ok(result),
            _ => Err(anyhow!(
                "Telegram {method} failed: {}",
                description.as_deref().unwrap_or("no description")
            )),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let resp = self.http.post(self.url(method)).json(body).send().await?;
        Self::decode(method, resp).await
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": POLL_TIMEOUT_SECS,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    async fn send_message(&self, chat_id: i64, text: &str, markup: Option<Value>) -> Result<()> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = markup {
            body["reply_markup"] = markup;
        }
        self.call::<Value>("sendMessage", &body).await?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, photo: Vec<u8>, file_name: String) -> Result<()> {
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", Part::bytes(photo).file_name(file_name));
        let resp = self
            .http
            .post(self.url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;
        Self::decode::<Value>("sendPhoto", resp).await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        self.call::<Value>(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_query_id }),
        )
        .await?;
        Ok(())
    }
}

struct Bot {
    api: BotApi,
    commands: Arc<dyn RouteCommands>,
    keyboard: Keyboard,
    image: Option<PathBuf>,
}

pub async fn run(opts: Telegram, commands: Arc<dyn RouteCommands>) -> Result<()> {
    let Telegram {
        token,
        api_url,
        keyboard,
        image,
    } = opts;
    let bot = Arc::new(Bot {
        api: BotApi::new(&api_url, &token)?,
        commands,
        keyboard,
        image,
    });

    info!("polling for updates; keyboard: {keyboard:?}");
    let mut workers = ChatWorkers::new(Arc::clone(&bot));
    let mut offset = 0;
    loop {
        let updates = match bot.api.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("poll failed, {e:#}");
                tokio::time::sleep(POLL_RETRY).await;
                continue;
            }
        };
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            offset = last + 1;
        }

        for update in updates {
            workers.dispatch(update);
        }
    }
}

/// One long lived task per chat. Chats are served concurrently while
/// each chat's updates are handled in arrival order, across polls.
struct ChatWorkers {
    bot: Arc<Bot>,
    queues: HashMap<i64, mpsc::UnboundedSender<Update>>,
}

impl ChatWorkers {
    fn new(bot: Arc<Bot>) -> Self {
        Self {
            bot,
            queues: HashMap::new(),
        }
    }

    fn dispatch(&mut self, update: Update) {
        let Some(chat_id) = update.chat_id() else {
            debug!("ignoring update {}", update.update_id);
            return;
        };
        let queue = self
            .queues
            .entry(chat_id)
            .or_insert_with(|| Self::spawn(Arc::clone(&self.bot), chat_id));
        if let Err(mpsc::error::SendError(update)) = queue.send(update) {
            warn!("chat {chat_id}: worker gone, restarting");
            let queue = Self::spawn(Arc::clone(&self.bot), chat_id);
            if queue.send(update).is_err() {
                warn!("chat {chat_id}: dropping update");
            }
            self.queues.insert(chat_id, queue);
        }
    }

    fn spawn(bot: Arc<Bot>, chat_id: i64) -> mpsc::UnboundedSender<Update> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Update>();
        tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                if let Err(e) = bot.handle(update).await {
                    warn!("chat {chat_id}: {e:#}");
                }
            }
        });
        tx
    }
}

impl Bot {
    async fn handle(&self, update: Update) -> Result<()> {
        if let Some(query) = update.callback_query {
            // Only clears the button's spinner. Stale queries are
            // rejected but the press is still served.
            if let Err(e) = self.api.answer_callback_query(&query.id).await {
                warn!("callback {}: {e:#}", query.id);
            }
            let action = query.data.as_deref().and_then(Action::from_callback_data);
            return match (query.message, action) {
                (Some(message), Some(action)) => self.act(message.chat.id, action).await,
                _ => Ok(()),
            };
        }

        let Some(Message {
            chat,
            text: Some(text),
        }) = update.message
        else {
            return Ok(());
        };
        match classify(&text) {
            Event::Greet => self.api.send_message(chat.id, GREETING, None).await,
            Event::Menu => {
                let markup = menu_markup(self.keyboard);
                self.api.send_message(chat.id, MENU, Some(markup)).await
            }
            Event::Action(action) => self.act(chat.id, action).await,
            Event::Text(text) => self.coordinate(chat.id, text).await,
        }
    }

    async fn act(&self, chat_id: i64, action: Action) -> Result<()> {
        let id = SessionId::from(chat_id);
        let reply = match action {
            Action::StartRoute => self.commands.start_route(&id).await,
            Action::NextPoint => self.commands.advance_route(&id).await,
            Action::ShowProfile => self.commands.show_profile(&id).await,
        };
        if reply == Reply::RouteStarted {
            self.send_image(chat_id).await;
        }
        self.api.send_message(chat_id, &reply.to_string(), None).await
    }

    async fn coordinate(&self, chat_id: i64, text: &str) -> Result<()> {
        let id = SessionId::from(chat_id);
        let reply = if self.commands.awaiting_coordinate(&id).await {
            match self.commands.supply_coordinate(&id, text).await {
                Ok(reply) => reply.to_string(),
                Err(e) => {
                    debug!("chat {chat_id}: {e}");
                    USE_MENU.to_string()
                }
            }
        } else {
            USE_MENU.to_string()
        };
        self.api.send_message(chat_id, &reply, None).await
    }

    /// Sends the start route picture, if any. Failures are logged and
    /// otherwise ignored.
    async fn send_image(&self, chat_id: i64) {
        let Some(path) = &self.image else {
            return;
        };
        let file_name = path
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("route.png")
            .to_string();
        let result = match tokio::fs::read(path).await {
            Ok(photo) => self.api.send_photo(chat_id, photo, file_name).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!("chat {chat_id}: route image {path:?} not sent, {e:#}");
        }
    }
}
