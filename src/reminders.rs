//! # Meal Reminders
//!
//! Each chat that sends `/setreminder` gets one daily firing per meal slot.
//! Registration is keyed by chat id: registering again replaces the chat's
//! firings instead of stacking duplicates. Registrations live in memory and
//! are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};
use parking_lot::Mutex;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ReminderConfig;
use crate::errors::error_logging;
use crate::localization::{t_lang, LocalizationManager};
use crate::observability::record_reminder_fired;

/// Meal slot a reminder announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealReminder {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealReminder {
    pub fn message_key(self) -> &'static str {
        match self {
            MealReminder::Breakfast => "reminder-breakfast",
            MealReminder::Lunch => "reminder-lunch",
            MealReminder::Dinner => "reminder-dinner",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MealReminder::Breakfast => "breakfast",
            MealReminder::Lunch => "lunch",
            MealReminder::Dinner => "dinner",
        }
    }
}

/// Daily firing times, in slot order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSchedule {
    slots: Vec<(NaiveTime, MealReminder)>,
}

impl ReminderSchedule {
    pub fn from_config(config: &ReminderConfig) -> Self {
        Self {
            slots: vec![
                (config.breakfast, MealReminder::Breakfast),
                (config.lunch, MealReminder::Lunch),
                (config.dinner, MealReminder::Dinner),
            ],
        }
    }

    pub fn slots(&self) -> &[(NaiveTime, MealReminder)] {
        &self.slots
    }

    pub fn time_of(&self, meal: MealReminder) -> Option<NaiveTime> {
        self.slots
            .iter()
            .find(|(_, slot)| *slot == meal)
            .map(|(time, _)| *time)
    }
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        Self::from_config(&ReminderConfig::default())
    }
}

/// Whether a registration created a chat's reminders or replaced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created,
    Replaced,
}

/// A pending firing for one chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledFiring {
    pub meal: MealReminder,
    pub time: NaiveTime,
    pub next_due: NaiveDateTime,
}

/// A firing whose time has come
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub chat_id: i64,
    pub meal: MealReminder,
    pub language_code: Option<String>,
}

#[derive(Debug)]
struct ChatReminders {
    language_code: Option<String>,
    firings: Vec<ScheduledFiring>,
}

/// First occurrence of `time` strictly after `after`
pub fn next_occurrence(time: NaiveTime, after: NaiveDateTime) -> NaiveDateTime {
    let candidate = after.date().and_time(time);
    if candidate > after {
        candidate
    } else {
        candidate + TimeDelta::days(1)
    }
}

/// In-memory reminder registrations keyed by chat id
#[derive(Debug)]
pub struct ReminderRegistry {
    schedule: ReminderSchedule,
    chats: Mutex<HashMap<i64, ChatReminders>>,
}

impl ReminderRegistry {
    pub fn new(schedule: ReminderSchedule) -> Self {
        Self {
            schedule,
            chats: Mutex::new(HashMap::new()),
        }
    }

    pub fn schedule(&self) -> &ReminderSchedule {
        &self.schedule
    }

    /// Register (or re-register) every slot of the schedule for a chat
    pub fn register(
        &self,
        chat_id: i64,
        language_code: Option<String>,
        now: NaiveDateTime,
    ) -> RegistrationOutcome {
        let firings = self
            .schedule
            .slots()
            .iter()
            .map(|(time, meal)| ScheduledFiring {
                meal: *meal,
                time: *time,
                next_due: next_occurrence(*time, now),
            })
            .collect();

        let previous = self.chats.lock().insert(
            chat_id,
            ChatReminders {
                language_code,
                firings,
            },
        );

        match previous {
            Some(_) => RegistrationOutcome::Replaced,
            None => RegistrationOutcome::Created,
        }
    }

    /// Pending firings for one chat, in slot order
    pub fn firings_for(&self, chat_id: i64) -> Vec<ScheduledFiring> {
        self.chats
            .lock()
            .get(&chat_id)
            .map(|chat| chat.firings.clone())
            .unwrap_or_default()
    }

    pub fn total_firings(&self) -> usize {
        self.chats.lock().values().map(|chat| chat.firings.len()).sum()
    }

    pub fn registered_chats(&self) -> usize {
        self.chats.lock().len()
    }

    /// Collect every firing due at `now` and advance it to its next occurrence
    pub fn take_due(&self, now: NaiveDateTime) -> Vec<DueReminder> {
        let mut due = Vec::new();
        let mut chats = self.chats.lock();

        for (chat_id, chat) in chats.iter_mut() {
            for firing in chat.firings.iter_mut().filter(|f| f.next_due <= now) {
                due.push(DueReminder {
                    chat_id: *chat_id,
                    meal: firing.meal,
                    language_code: chat.language_code.clone(),
                });
                firing.next_due = next_occurrence(firing.time, now);
            }
        }

        due
    }
}

/// Check for due reminders every `tick` and send them until `cancel` fires
pub async fn run_reminder_loop(
    bot: Bot,
    registry: Arc<ReminderRegistry>,
    localization: Arc<LocalizationManager>,
    tick: Duration,
    cancel: CancellationToken,
) {
    info!(tick_ms = tick.as_millis() as u64, "Reminder loop started");
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let due = registry.take_due(Local::now().naive_local());
        for reminder in due {
            let text = t_lang(&localization, reminder.meal.message_key(), reminder.language_code.as_deref());
            let delivered = match bot.send_message(ChatId(reminder.chat_id), text).await {
                Ok(_) => {
                    debug!(chat_id = reminder.chat_id, meal = reminder.meal.as_str(), "Reminder sent");
                    true
                }
                Err(e) => {
                    error_logging::log_network_error(&e, "send_reminder", Some("sendMessage"), None);
                    false
                }
            };
            record_reminder_fired(reminder.meal.as_str(), delivered);
        }
    }

    info!(
        registered_chats = registry.registered_chats(),
        "Reminder loop stopped"
    );
}
