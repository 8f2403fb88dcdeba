//! Runtime UI localization.
//!
//! A locale change fetches a fresh table and replaces the previous one
//! wholesale. Loading tries the requested locale, then the default locale once,
//! and stops there.

use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::client::StudioClient;
use crate::config::LocaleOptions;
use crate::notice::{self, Notice};
use crate::view::{ElementUpdate, TaggedElement, UpdateTarget, View};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Empty strings count as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The locales to try, in order: the requested one, then the default once.
pub fn locale_attempts(requested: &str, default_locale: &str) -> Vec<String> {
    let requested = requested.trim();
    if requested.is_empty() || requested == default_locale {
        vec![default_locale.to_string()]
    } else {
        vec![requested.to_string(), default_locale.to_string()]
    }
}

/// Updates for every tagged element whose key the table knows.
pub fn translation_updates(
    elements: &[TaggedElement],
    table: &TranslationTable,
) -> Vec<ElementUpdate> {
    elements
        .iter()
        .filter_map(|element| {
            table.get(&element.key).map(|value| ElementUpdate {
                id: element.id.clone(),
                target: UpdateTarget::from(element.kind),
                value: value.to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocaleLoadOutcome {
    Loaded { locale: String },
    /// The requested locale failed and the default one was used.
    FellBack { requested: String, locale: String },
    /// Every attempt failed; the previous table is kept.
    Unavailable { warning: Notice },
}

pub struct TranslationLoader {
    client: StudioClient,
    default_locale: String,
    warning_delay: Duration,
    table: TranslationTable,
    locale: Option<String>,
}

impl TranslationLoader {
    pub fn new(client: StudioClient, options: &LocaleOptions) -> Self {
        Self {
            client,
            default_locale: options.default_locale.clone(),
            warning_delay: options.warning_dismiss_delay(),
            table: TranslationTable::default(),
            locale: None,
        }
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn current_locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Looks up a key in the active table, falling back to the key itself.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).unwrap_or(key)
    }

    pub async fn load<V: View + ?Sized>(&mut self, view: &mut V, requested: &str) -> LocaleLoadOutcome {
        for locale in locale_attempts(requested, &self.default_locale) {
            info!("loading translations for {}", locale);
            match self.client.fetch_translations(&locale).await {
                Ok(entries) => {
                    self.table = TranslationTable::new(entries);
                    self.locale = Some(locale.clone());
                    let updates = translation_updates(&view.tagged_elements(), &self.table);
                    view.apply_translations(&updates);
                    info!(
                        "applied {} translation(s) to {} element(s)",
                        self.table.len(),
                        updates.len()
                    );

                    return if locale == requested.trim() {
                        LocaleLoadOutcome::Loaded { locale }
                    } else {
                        LocaleLoadOutcome::FellBack {
                            requested: requested.to_string(),
                            locale,
                        }
                    };
                }
                Err(err) => warn!("failed to load translations for {}: {}", locale, err),
            }
        }

        let warning = Notice::warning(notice::TRANSLATIONS_UNAVAILABLE, self.warning_delay);
        view.show_banner(&warning);
        LocaleLoadOutcome::Unavailable { warning }
    }
}

/// Removes a banner once its delay has passed. Notices without a delay stay.
pub fn schedule_dismissal<V>(mut view: V, notice: &Notice) -> Option<JoinHandle<()>>
where
    V: View + Send + 'static,
{
    let delay = notice.dismiss_after()?;
    let notice_id = notice.id.clone();
    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        view.dismiss_banner(&notice_id);
    }))
}
