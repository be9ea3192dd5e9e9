//! In-memory stand-ins for the Discord side, used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, CreateCommand, GuildId, UserId};

use crate::{
    directory::{ChannelDirectory, ChannelSnapshot, RoomSpec},
    dispatch::{Command, CommandInteraction, SubCommand},
    error::DirectoryError,
    models::Error,
};

pub fn channel(id: u64) -> ChannelId {
    ChannelId::new(id)
}

pub fn user(id: u64) -> UserId {
    UserId::new(id)
}

pub fn guild() -> GuildId {
    GuildId::new(7)
}

struct FakeChannel {
    name: String,
    parent_id: Option<ChannelId>,
}

#[derive(Default)]
struct DirectoryState {
    channels: HashMap<ChannelId, FakeChannel>,
    locations: HashMap<UserId, ChannelId>,
    next_id: u64,
    max_bitrate: Option<u32>,
    fail_creates: bool,
    fail_moves: bool,
    fail_deletes: bool,
    created: Vec<RoomSpec>,
    deleted: Vec<ChannelId>,
}

/// A guild whose channels and voice members live in memory
#[derive(Default)]
pub struct FakeDirectory {
    state: Mutex<DirectoryState>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        let directory = Self::default();
        directory.state.lock().unwrap().next_id = 1000;
        directory
    }

    pub fn add_voice_channel(&self, id: ChannelId, name: &str, parent_id: Option<ChannelId>) {
        self.state.lock().unwrap().channels.insert(
            id,
            FakeChannel {
                name: name.to_string(),
                parent_id,
            },
        );
    }

    /// Delete a channel behind the manager's back
    pub fn remove_channel(&self, id: ChannelId) {
        self.state.lock().unwrap().channels.remove(&id);
    }

    pub fn place(&self, user_id: UserId, channel_id: Option<ChannelId>) {
        let mut state = self.state.lock().unwrap();
        match channel_id {
            Some(channel_id) => state.locations.insert(user_id, channel_id),
            None => state.locations.remove(&user_id),
        };
    }

    pub fn location(&self, user_id: UserId) -> Option<ChannelId> {
        self.state.lock().unwrap().locations.get(&user_id).copied()
    }

    pub fn set_max_bitrate(&self, max_bitrate: Option<u32>) {
        self.state.lock().unwrap().max_bitrate = max_bitrate;
    }

    pub fn fail_creates(&self, fail: bool) {
        self.state.lock().unwrap().fail_creates = fail;
    }

    pub fn fail_moves(&self, fail: bool) {
        self.state.lock().unwrap().fail_moves = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    pub fn created(&self) -> Vec<RoomSpec> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn deleted(&self) -> Vec<ChannelId> {
        self.state.lock().unwrap().deleted.clone()
    }

    fn snapshot(state: &DirectoryState, id: ChannelId, channel: &FakeChannel) -> ChannelSnapshot {
        ChannelSnapshot {
            id,
            name: channel.name.clone(),
            parent_id: channel.parent_id,
            is_voice: true,
            occupants: state.locations.values().filter(|c| **c == id).count(),
        }
    }
}

#[async_trait]
impl ChannelDirectory for FakeDirectory {
    fn channel(&self, channel_id: ChannelId) -> Option<ChannelSnapshot> {
        let state = self.state.lock().unwrap();
        let channel = state.channels.get(&channel_id)?;
        Some(Self::snapshot(&state, channel_id, channel))
    }

    fn voice_channels(&self, _guild_id: GuildId) -> Vec<ChannelSnapshot> {
        let state = self.state.lock().unwrap();
        let mut channels: Vec<_> = state
            .channels
            .iter()
            .map(|(id, channel)| Self::snapshot(&state, *id, channel))
            .collect();
        channels.sort_by_key(|snapshot| snapshot.id);
        channels
    }

    fn max_bitrate(&self, _guild_id: GuildId) -> Option<u32> {
        self.state.lock().unwrap().max_bitrate
    }

    async fn create_voice_channel(
        &self,
        _guild_id: GuildId,
        room: &RoomSpec,
    ) -> Result<ChannelId, DirectoryError> {
        // Suspend like a network call so concurrent events interleave
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        if state.fail_creates {
            return Err(DirectoryError::Rejected("create refused".to_string()));
        }
        state.next_id += 1;
        let id = ChannelId::new(state.next_id);
        state.channels.insert(
            id,
            FakeChannel {
                name: room.name.clone(),
                parent_id: room.category_id,
            },
        );
        state.created.push(room.clone());
        Ok(id)
    }

    async fn move_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
        _reason: &str,
    ) -> Result<(), DirectoryError> {
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        if state.fail_moves {
            return Err(DirectoryError::Rejected("move refused".to_string()));
        }
        if !state.channels.contains_key(&channel_id) {
            return Err(DirectoryError::Rejected("unknown channel".to_string()));
        }
        state.locations.insert(user_id, channel_id);
        Ok(())
    }

    async fn delete_channel(
        &self,
        channel_id: ChannelId,
        _reason: &str,
    ) -> Result<(), DirectoryError> {
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(DirectoryError::Rejected("delete refused".to_string()));
        }
        if state.channels.remove(&channel_id).is_none() {
            return Err(DirectoryError::Rejected("unknown channel".to_string()));
        }
        state.deleted.push(channel_id);
        Ok(())
    }
}

/// A slash command invocation that records replies
pub struct FakeInteraction {
    name: String,
    group: Option<String>,
    subcommand: Option<String>,
    user_id: UserId,
    replies: Mutex<Vec<String>>,
}

impl FakeInteraction {
    pub fn new(name: &str, user_id: u64) -> Self {
        Self {
            name: name.to_string(),
            group: None,
            subcommand: None,
            user_id: UserId::new(user_id),
            replies: Mutex::new(Vec::new()),
        }
    }

    pub fn with_subcommand(mut self, group: Option<&str>, subcommand: &str) -> Self {
        self.group = group.map(str::to_string);
        self.subcommand = Some(subcommand.to_string());
        self
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandInteraction for FakeInteraction {
    fn command_name(&self) -> &str {
        &self.name
    }

    fn subcommand_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    async fn reply(&self, content: String, _ephemeral: bool) -> Result<(), Error> {
        self.replies.lock().unwrap().push(content);
        Ok(())
    }
}

/// A command that counts its invocations
pub struct RecordingCommand {
    name: String,
    cooldown_secs: Option<u64>,
    fails: bool,
    calls: AtomicUsize,
}

impl RecordingCommand {
    pub fn new(name: &str, cooldown_secs: Option<u64>) -> Self {
        Self {
            name: name.to_string(),
            cooldown_secs,
            fails: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<I: CommandInteraction> Command<I> for RecordingCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn cooldown_secs(&self) -> Option<u64> {
        self.cooldown_secs
    }

    fn definition(&self) -> CreateCommand {
        CreateCommand::new(&self.name).description("test command")
    }

    async fn execute(&self, _interaction: &I) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fails {
            return Err("handler exploded".into());
        }
        Ok(())
    }
}

/// A sub-command that counts its invocations
pub struct RecordingSubCommand {
    key: String,
    calls: AtomicUsize,
}

impl RecordingSubCommand {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<I: CommandInteraction> SubCommand<I> for RecordingSubCommand {
    fn key(&self) -> String {
        self.key.clone()
    }

    async fn execute(&self, _interaction: &I) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
