//! The ordered set of items the user is shopping for.

use cartwise_core::{CoreError, Item, ItemId, ItemStatus};

#[derive(Debug, Default, Clone)]
pub struct ShoppingList {
    items: Vec<Item>,
}

impl ShoppingList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending item built from `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyName`] if `raw` is blank.
    pub fn add(&mut self, raw: &str) -> Result<ItemId, CoreError> {
        let item = Item::new(raw)?;
        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotFound`] if no item has `id`.
    pub fn get_mut(&mut self, id: ItemId) -> Result<&mut Item, CoreError> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CoreError::ItemNotFound(id))
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ready items in list order.
    #[must_use]
    pub fn ready_items(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::Ready)
            .cloned()
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotFound`] if no item has `id`.
    pub fn delete(&mut self, id: ItemId) -> Result<Item, CoreError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CoreError::ItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Clears the list. Destructive, so a non-empty list is only cleared
    /// when `confirmed` is set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfirmationRequired`] for an unconfirmed clear
    /// of a non-empty list.
    pub fn delete_all(&mut self, confirmed: bool) -> Result<usize, CoreError> {
        let count = self.items.len();
        if count > 0 && !confirmed {
            return Err(CoreError::ConfirmationRequired { count });
        }
        self.items.clear();
        Ok(count)
    }

    /// Flips the selection flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotFound`] if no item has `id`.
    pub fn toggle_select(&mut self, id: ItemId) -> Result<bool, CoreError> {
        let item = self.get_mut(id)?;
        item.toggle_selected();
        Ok(item.selected)
    }

    /// Removes every selected item and returns how many went.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.selected);
        before - self.items.len()
    }
}
