//! Shopping list items and their lifecycle.
//!
//! ```text
//! pending -> correcting -> vague -> searching -> ready
//!                 |                    |
//!                 +-----> searching    +-> error -> correcting
//!                 +-----> error
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quote::{sort_quotes, PriceQuote};
use crate::CoreError;

/// Icon shown until an item has been resolved.
pub const DEFAULT_ICON: &str = "🛒";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Correcting,
    Vague,
    Searching,
    Ready,
    Error,
}

impl ItemStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub fn can_move_to(self, next: ItemStatus) -> bool {
        use ItemStatus::{Correcting, Error, Pending, Ready, Searching, Vague};
        matches!(
            (self, next),
            (Pending | Error, Correcting)
                | (Correcting, Vague | Searching | Error)
                | (Vague, Searching)
                | (Searching, Ready | Error)
        )
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Correcting => "correcting",
            ItemStatus::Vague => "vague",
            ItemStatus::Searching => "searching",
            ItemStatus::Ready => "ready",
            ItemStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub original: String,
    /// Empty until the resolver has run.
    pub canonical_name: String,
    pub icon: String,
    pub status: ItemStatus,
    pub options: Vec<String>,
    pub example: Option<String>,
    /// Cheapest first.
    pub quotes: Vec<PriceQuote>,
    pub error: Option<String>,
    pub selected: bool,
}

impl Item {
    /// Creates a pending item from user text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyName`] if `raw` is blank.
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let original = raw.trim();
        if original.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self {
            id: ItemId::new(),
            original: original.to_string(),
            canonical_name: String::new(),
            icon: DEFAULT_ICON.to_string(),
            status: ItemStatus::Pending,
            options: Vec::new(),
            example: None,
            quotes: Vec::new(),
            error: None,
            selected: false,
        })
    }

    /// Name to show: canonical once resolved, otherwise what the user typed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.canonical_name.is_empty() {
            &self.original
        } else {
            &self.canonical_name
        }
    }

    /// The quote the list displays for this item.
    #[must_use]
    pub fn best_quote(&self) -> Option<&PriceQuote> {
        self.quotes.first()
    }

    #[must_use]
    pub fn quote_at(&self, shop: &str) -> Option<&PriceQuote> {
        self.quotes.iter().find(|q| q.is_at(shop))
    }

    pub fn toggle_selected(&mut self) {
        self.selected = !self.selected;
    }

    fn transition(&mut self, next: ItemStatus) -> Result<(), CoreError> {
        if !self.status.can_move_to(next) {
            return Err(CoreError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Enters `correcting`, from a fresh item or an explicit user retry.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTransition`] unless the item is pending or errored.
    pub fn begin_correcting(&mut self) -> Result<(), CoreError> {
        self.transition(ItemStatus::Correcting)?;
        self.error = None;
        Ok(())
    }

    /// Records the resolver's answer. A vague answer parks the item in
    /// `vague` with its options; a specific one moves it to `searching`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTransition`] unless the item is correcting, or
    /// [`CoreError::EmptyName`] for a specific answer with no name.
    pub fn apply_resolution(
        &mut self,
        canonical_name: &str,
        icon: &str,
        vague: Option<(Vec<String>, Option<String>)>,
    ) -> Result<(), CoreError> {
        let canonical_name = canonical_name.trim();
        match vague {
            Some((options, example)) => {
                self.transition(ItemStatus::Vague)?;
                self.options = options;
                self.example = example;
            }
            None => {
                if canonical_name.is_empty() {
                    return Err(CoreError::EmptyName);
                }
                self.transition(ItemStatus::Searching)?;
                self.options.clear();
                self.example = None;
            }
        }
        if !canonical_name.is_empty() {
            self.canonical_name = canonical_name.to_string();
        }
        if !icon.trim().is_empty() {
            self.icon = icon.trim().to_string();
        }
        Ok(())
    }

    /// The user picked one of the options, or typed their own.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyName`] for a blank choice, or
    /// [`CoreError::InvalidTransition`] unless the item is vague.
    pub fn choose_option(&mut self, choice: &str) -> Result<(), CoreError> {
        let choice = choice.trim();
        if choice.is_empty() {
            return Err(CoreError::EmptyName);
        }
        self.transition(ItemStatus::Searching)?;
        self.canonical_name = choice.to_string();
        self.options.clear();
        self.example = None;
        Ok(())
    }

    /// Stores the quote list (sorted cheapest-first) and marks the item ready.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTransition`] unless the item is searching, or
    /// [`CoreError::EmptyName`] if it somehow has no canonical name.
    pub fn finish_pricing(&mut self, mut quotes: Vec<PriceQuote>) -> Result<(), CoreError> {
        if self.canonical_name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        self.transition(ItemStatus::Ready)?;
        sort_quotes(&mut quotes);
        self.quotes = quotes;
        Ok(())
    }

    /// Moves a correcting or searching item to `error`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTransition`] from any other state.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.transition(ItemStatus::Error)?;
        self.error = Some(message.into());
        Ok(())
    }
}
