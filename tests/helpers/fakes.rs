//! In-memory fakes for the controller's collaborators

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use PlaceBot::database::Store;
use PlaceBot::handlers::Messenger;
use PlaceBot::models::{Place, User, UserStatus};
use PlaceBot::state::InMemoryDraftStore;
use PlaceBot::{DialogueController, PlaceBotError, Result};

/// [`Store`] over plain vectors; `set_failing(true)` makes every call error until
/// cleared
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    places: Mutex<Vec<Place>>,
    next_place_id: AtomicI64,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn places(&self) -> Vec<Place> {
        self.places.lock().unwrap().clone()
    }

    pub fn insert_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlaceBotError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && !u.is_deleted())
            .cloned())
    }

    async fn find_any_user(&self, id: i64) -> Result<Option<User>> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn register_user(&self, user: User) -> Result<User> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.id == user.id) {
            return Err(PlaceBotError::InvalidInput(format!("duplicate user {}", user.id)));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> Result<bool> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(stored) => {
                stored.nickname = user.nickname.clone();
                stored.status = user.status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn save_place(&self, mut place: Place) -> Result<Place> {
        self.check()?;
        place.id = self.next_place_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.places.lock().unwrap().push(place.clone());
        Ok(place)
    }

    async fn places_by_priority(&self) -> Result<Vec<Place>> {
        self.check()?;
        let mut places = self.places();
        places.sort_by(|a, b| b.place_priority.cmp(&a.place_priority).then(a.id.cmp(&b.id)));
        Ok(places)
    }
}

/// [`Messenger`] that records every reply instead of sending it
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(i64, String)>>,
    failing: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Replies sent to `chat_id`, in order
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(chat, _)| *chat == chat_id)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlaceBotError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// A controller wired to fresh fakes
pub struct TestBot {
    pub store: Arc<MemoryStore>,
    pub drafts: Arc<InMemoryDraftStore>,
    pub messenger: Arc<RecordingMessenger>,
    pub controller: DialogueController,
}

impl TestBot {
    pub fn new() -> Self {
        Self::with_drafts(InMemoryDraftStore::new())
    }

    pub fn with_drafts(drafts: InMemoryDraftStore) -> Self {
        let store = Arc::new(MemoryStore::new());
        let drafts = Arc::new(drafts);
        let messenger = Arc::new(RecordingMessenger::new());
        let controller = DialogueController::new(store.clone(), drafts.clone(), messenger.clone());
        Self {
            store,
            drafts,
            messenger,
            controller,
        }
    }

    /// A user already registered and enabled
    pub fn with_user(user_id: i64) -> Self {
        let bot = Self::new();
        bot.store.insert_user(User::new(user_id, format!("user{}", user_id)));
        bot
    }

    pub async fn send(&self, user_id: i64, text: &str) {
        self.controller.handle(&super::text_from(user_id, text)).await;
    }

    pub fn last_reply(&self, chat_id: i64) -> Option<String> {
        self.messenger.texts_to(chat_id).pop()
    }
}

pub fn deleted_user(id: i64, nickname: &str) -> User {
    let mut user = User::new(id, nickname);
    user.status = UserStatus::Deleted;
    user
}
