//! Ordered option list with stable identities.
//!
//! [`OptionList`] is a value type: every edit returns a new list and leaves
//! the receiver untouched. After every edit the `order` field of each
//! option is rewritten to its zero-based index, whether or not the edit
//! changed the shape of the list, so the persisted order always matches
//! list position.
//!
//! # Examples
//!
//! ```
//! use wawidget_protocol::{ContactOption, OptionId, OptionList, OptionType};
//!
//! let list = OptionList::from(vec![
//!     ContactOption::new(OptionId::Numeric(1), "Sales", OptionType::Whatsapp),
//!     ContactOption::new(OptionId::Numeric(2), "Support", OptionType::Virfon),
//! ]);
//!
//! let cloned = list.clone_option(&OptionId::Numeric(1)).unwrap();
//! assert_eq!(cloned.len(), 3);
//! assert_eq!(cloned.as_slice()[2].order, 2);
//!
//! let reordered = cloned.reorder(2, 0).unwrap();
//! assert_eq!(reordered.as_slice()[0].title, "Sales");
//! assert_eq!(reordered.as_slice()[1].id, OptionId::Numeric(1));
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::option::{ContactOption, OptionId};

/// An ordered collection of contact options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ContactOption>", into = "Vec<ContactOption>")]
pub struct OptionList {
    items: Vec<ContactOption>,
}

impl OptionList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list has no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the options as a slice, in list order.
    #[must_use]
    pub fn as_slice(&self) -> &[ContactOption] {
        &self.items
    }

    /// Returns an iterator over the options in list order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContactOption> {
        self.items.iter()
    }

    /// Consumes the list, returning the options.
    #[must_use]
    pub fn into_vec(self) -> Vec<ContactOption> {
        self.items
    }

    /// Looks up an option by identity.
    #[must_use]
    pub fn get(&self, id: &OptionId) -> Option<&ContactOption> {
        self.items.iter().find(|o| &o.id == id)
    }

    /// Returns the index of the option with the given identity.
    #[must_use]
    pub fn position(&self, id: &OptionId) -> Option<usize> {
        self.items.iter().position(|o| &o.id == id)
    }

    /// Generates an identity that no option in the list currently uses.
    #[must_use]
    pub fn generate_id(&self) -> OptionId {
        loop {
            let candidate = OptionId::Generated(Uuid::new_v4().simple().to_string());
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Appends a copy of the option with `id` under a fresh identity.
    ///
    /// The copy lands at the end of the list, so its `order` equals the
    /// previous list length. The source option is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::OptionNotFound`] if no option has `id`.
    pub fn clone_option(&self, id: &OptionId) -> Result<Self> {
        let source = self
            .get(id)
            .ok_or_else(|| ProtocolError::OptionNotFound { id: id.clone() })?;

        let mut copy = source.clone();
        copy.id = self.generate_id();

        let mut items = self.items.clone();
        items.push(copy);
        Ok(Self::renumbered(items))
    }

    /// Appends a new option, replacing its identity if it collides with an
    /// existing one.
    #[must_use]
    pub fn append(&self, mut option: ContactOption) -> Self {
        if self.get(&option.id).is_some() {
            option.id = self.generate_id();
        }
        let mut items = self.items.clone();
        items.push(option);
        Self::renumbered(items)
    }

    /// Removes the option with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::OptionNotFound`] if no option has `id`.
    pub fn delete(&self, id: &OptionId) -> Result<Self> {
        let index = self
            .position(id)
            .ok_or_else(|| ProtocolError::OptionNotFound { id: id.clone() })?;

        let mut items = self.items.clone();
        items.remove(index);
        Ok(Self::renumbered(items))
    }

    /// Moves the option at `from` so that it ends up at index `to`.
    ///
    /// Every other option keeps its identity and relative order.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::IndexOutOfRange`] if either index is not a
    /// valid position in the list.
    pub fn reorder(&self, from: usize, to: usize) -> Result<Self> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(ProtocolError::IndexOutOfRange { index, len });
            }
        }

        let mut items = self.items.clone();
        let moved = items.remove(from);
        items.insert(to, moved);
        Ok(Self::renumbered(items))
    }

    /// Replaces the option that has the same identity as `option`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::OptionNotFound`] if no option has that identity.
    pub fn replace(&self, option: ContactOption) -> Result<Self> {
        let index = self.position(&option.id).ok_or_else(|| ProtocolError::OptionNotFound {
            id: option.id.clone(),
        })?;

        let mut items = self.items.clone();
        items[index] = option;
        Ok(Self::renumbered(items))
    }

    fn renumbered(mut items: Vec<ContactOption>) -> Self {
        for (index, option) in items.iter_mut().enumerate() {
            option.order = index;
        }
        Self { items }
    }
}

impl From<Vec<ContactOption>> for OptionList {
    /// Builds a list, discarding whatever `order` values the options carried.
    fn from(items: Vec<ContactOption>) -> Self {
        Self::renumbered(items)
    }
}

impl From<OptionList> for Vec<ContactOption> {
    fn from(list: OptionList) -> Self {
        list.items
    }
}

impl<'a> IntoIterator for &'a OptionList {
    type Item = &'a ContactOption;
    type IntoIter = std::slice::Iter<'a, ContactOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::option::OptionType;
    use proptest::prelude::*;

    fn arb_list() -> impl Strategy<Value = OptionList> {
        prop::collection::vec("[a-zA-Z ]{0,12}", 1..12).prop_map(|titles| {
            OptionList::from(
                titles
                    .into_iter()
                    .enumerate()
                    .map(|(i, title)| {
                        ContactOption::new(OptionId::Numeric(i as i64 + 1), title, OptionType::Whatsapp)
                    })
                    .collect::<Vec<_>>(),
            )
        })
    }

    fn is_dense(list: &OptionList) -> bool {
        list.iter().enumerate().all(|(i, o)| o.order == i)
    }

    proptest! {
        /// Cloning appends exactly one copy with an unseen id and order == old length.
        #[test]
        fn clone_properties(list in arb_list(), pick in any::<prop::sample::Index>()) {
            let source = &list.as_slice()[pick.index(list.len())];
            let result = list.clone_option(&source.id).unwrap();

            prop_assert_eq!(result.len(), list.len() + 1);
            let copy = &result.as_slice()[list.len()];
            prop_assert!(list.get(&copy.id).is_none());
            prop_assert_eq!(copy.order, list.len());
            prop_assert!(copy.same_content(source));
            prop_assert!(is_dense(&result));
        }

        /// Deleting removes exactly the target and leaves a dense order.
        #[test]
        fn delete_properties(list in arb_list(), pick in any::<prop::sample::Index>()) {
            let id = list.as_slice()[pick.index(list.len())].id.clone();
            let result = list.delete(&id).unwrap();

            prop_assert_eq!(result.len(), list.len() - 1);
            prop_assert!(result.get(&id).is_none());
            prop_assert!(is_dense(&result));
        }

        /// Reordering moves one element and preserves the relative order of the rest.
        #[test]
        fn reorder_properties(
            list in arb_list(),
            from in any::<prop::sample::Index>(),
            to in any::<prop::sample::Index>(),
        ) {
            let (i, j) = (from.index(list.len()), to.index(list.len()));
            let moved = list.as_slice()[i].id.clone();
            let result = list.reorder(i, j).unwrap();

            prop_assert_eq!(&result.as_slice()[j].id, &moved);

            let others_before: Vec<_> = list.iter().filter(|o| o.id != moved).map(|o| &o.id).collect();
            let others_after: Vec<_> = result.iter().filter(|o| o.id != moved).map(|o| &o.id).collect();
            prop_assert_eq!(others_before, others_after);
            prop_assert!(is_dense(&result));
        }
    }
}
