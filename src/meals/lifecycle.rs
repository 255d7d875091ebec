//! A meal exists exactly while it has items. Per (user, date, meal type) the
//! slot is either absent or present with at least one item; "present and
//! empty" is not representable.

use std::num::NonZeroU32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Absent,
    Present { items: NonZeroU32 },
}

/// Storage action required by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealEffect {
    CreateMeal,
    KeepMeal,
    DeleteMeal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot remove an item from a meal that does not exist")]
pub struct NoSuchItem;

impl MealSlot {
    pub fn from_count(count: u32) -> Self {
        match NonZeroU32::new(count) {
            Some(items) => MealSlot::Present { items },
            None => MealSlot::Absent,
        }
    }

    pub fn item_count(self) -> u32 {
        match self {
            MealSlot::Absent => 0,
            MealSlot::Present { items } => items.get(),
        }
    }

    pub fn add_item(self) -> (MealSlot, MealEffect) {
        match self {
            MealSlot::Absent => (
                MealSlot::Present { items: NonZeroU32::MIN },
                MealEffect::CreateMeal,
            ),
            MealSlot::Present { items } => (
                MealSlot::Present { items: items.saturating_add(1) },
                MealEffect::KeepMeal,
            ),
        }
    }

    pub fn remove_item(self) -> Result<(MealSlot, MealEffect), NoSuchItem> {
        match self {
            MealSlot::Absent => Err(NoSuchItem),
            MealSlot::Present { items } => match NonZeroU32::new(items.get() - 1) {
                Some(rest) => Ok((MealSlot::Present { items: rest }, MealEffect::KeepMeal)),
                None => Ok((MealSlot::Absent, MealEffect::DeleteMeal)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_item_creates_meal() {
        let (slot, effect) = MealSlot::Absent.add_item();
        assert_eq!(effect, MealEffect::CreateMeal);
        assert_eq!(slot.item_count(), 1);
    }

    #[test]
    fn further_items_keep_meal() {
        let (slot, effect) = MealSlot::from_count(2).add_item();
        assert_eq!(effect, MealEffect::KeepMeal);
        assert_eq!(slot.item_count(), 3);
    }

    #[test]
    fn removing_last_item_deletes_meal() {
        let (slot, effect) = MealSlot::from_count(1).remove_item().unwrap();
        assert_eq!(effect, MealEffect::DeleteMeal);
        assert_eq!(slot, MealSlot::Absent);
    }

    #[test]
    fn removing_one_of_many_keeps_meal() {
        let (slot, effect) = MealSlot::from_count(3).remove_item().unwrap();
        assert_eq!(effect, MealEffect::KeepMeal);
        assert_eq!(slot.item_count(), 2);
    }

    #[test]
    fn removing_from_absent_meal_fails() {
        assert_eq!(MealSlot::Absent.remove_item(), Err(NoSuchItem));
    }

    #[test]
    fn zero_count_is_absent() {
        assert_eq!(MealSlot::from_count(0), MealSlot::Absent);
    }

    #[test]
    fn add_then_remove_round_trips_through_absent() {
        let mut slot = MealSlot::Absent;
        let mut effects = Vec::new();
        for _ in 0..2 {
            let (next, e) = slot.add_item();
            slot = next;
            effects.push(e);
        }
        for _ in 0..2 {
            let (next, e) = slot.remove_item().unwrap();
            slot = next;
            effects.push(e);
            // Every reachable present state has at least one item.
            if let MealSlot::Present { items } = slot {
                assert!(items.get() >= 1);
            }
        }
        assert_eq!(slot, MealSlot::Absent);
        assert_eq!(
            effects,
            [
                MealEffect::CreateMeal,
                MealEffect::KeepMeal,
                MealEffect::KeepMeal,
                MealEffect::DeleteMeal
            ]
        );
    }
}
