//! Sets of runtime objects that stand for one logical entity

use opera_core::{OperaError, Result};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A renderer-owned object shared between the renderer and editing handles
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value as a [`Shared`] object
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// The runtime objects behind one logical entity.
///
/// Invariants: never empty, no object appears twice, and every member holds
/// the same value for each property the entity exposes. Reads go to the
/// first member; writes go to all members in one pass before returning.
pub struct CorrelatedObjects<T> {
    members: Vec<Shared<T>>,
}

impl<T> CorrelatedObjects<T> {
    /// Build a set from `members`, dropping duplicates (by identity).
    /// `what` names the entity in the error for an empty set.
    pub fn new(members: Vec<Shared<T>>, what: &str) -> Result<Self> {
        let mut unique: Vec<Shared<T>> = Vec::with_capacity(members.len());
        for member in members {
            if !unique.iter().any(|m| Rc::ptr_eq(m, &member)) {
                unique.push(member);
            }
        }
        if unique.is_empty() {
            return Err(OperaError::EmptyCorrelation(what.to_string()));
        }
        Ok(Self { members: unique })
    }

    /// A set with exactly one member
    pub fn single(object: Shared<T>) -> Self {
        Self {
            members: vec![object],
        }
    }

    /// The member reads are served from
    pub fn representative(&self) -> &Shared<T> {
        &self.members[0]
    }

    /// Borrow the representative member
    pub fn borrow(&self) -> Ref<'_, T> {
        self.members[0].borrow()
    }

    /// Read a value from the representative member
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.members[0].borrow())
    }

    /// Apply `f` to every member. Returns the number of objects written.
    pub fn write(&self, mut f: impl FnMut(&mut T)) -> usize {
        for member in &self.members {
            f(&mut member.borrow_mut());
        }
        self.members.len()
    }

    /// Whether `object` is one of the members
    pub fn contains(&self, object: &Shared<T>) -> bool {
        self.members.iter().any(|m| Rc::ptr_eq(m, object))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shared<T>> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members. Construction rejects empty sets, so
    /// this is false for every `CorrelatedObjects`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> Clone for CorrelatedObjects<T> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
        }
    }
}

impl<T> fmt::Debug for CorrelatedObjects<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelatedObjects")
            .field("len", &self.members.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_rejected() {
        let err = CorrelatedObjects::<u32>::new(Vec::new(), "material 3").unwrap_err();
        assert!(err.to_string().contains("material 3"));
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let a = shared(1u32);
        let b = shared(1u32);
        let set = CorrelatedObjects::new(vec![a.clone(), b.clone(), a.clone()], "x").unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert!(set.contains(&a));
        assert!(set.contains(&b));
        assert!(!set.contains(&shared(1u32)));
    }

    #[test]
    fn test_write_fans_out() {
        let members: Vec<_> = (0..3).map(|_| shared(0u32)).collect();
        let set = CorrelatedObjects::new(members.clone(), "x").unwrap();
        assert_eq!(set.write(|v| *v = 7), 3);
        assert!(members.iter().all(|m| *m.borrow() == 7));
        assert_eq!(set.read(|v| *v), 7);
    }

    #[test]
    fn test_read_uses_first_member() {
        let first = shared(String::from("first"));
        let second = shared(String::from("second"));
        let set = CorrelatedObjects::new(vec![first, second], "x").unwrap();
        assert_eq!(&*set.borrow(), "first");
        assert!(Rc::ptr_eq(set.representative(), set.iter().next().unwrap()));
    }
}
