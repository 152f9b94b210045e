//! Hierarchical cache of operator decisions
//!
//! Every directory visited gets its own [`PermissionStore`] scope. All scopes
//! of a run share one root mapping; answers recorded there hold for the rest
//! of the run, everywhere. Answers recorded locally hold for the scope that
//! recorded them and for scopes created from it afterwards.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::action::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	Granted,
	Denied,
}

impl Decision {
	pub fn is_granted(self) -> bool {
		self == Decision::Granted
	}
}

/// Where a recorded decision lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
	/// Whole run, every directory
	Root,
	/// This directory and the directories descended into from it
	Local,
}

type DecisionMap = HashMap<Category, Decision>;

#[derive(Debug)]
pub struct PermissionStore {
	root: Rc<RefCell<DecisionMap>>,
	/// None for the root scope itself
	local: Option<DecisionMap>,
}

impl PermissionStore {
	pub fn new_root() -> Self {
		PermissionStore { root: Rc::new(RefCell::new(HashMap::new())), local: None }
	}

	pub fn is_root(&self) -> bool {
		self.local.is_none()
	}

	/// Root answer if any, else the local one
	pub fn query(&self, category: Category) -> Option<Decision> {
		if let Some(decision) = self.root.borrow().get(&category) {
			return Some(*decision);
		}
		self.local.as_ref().and_then(|local| local.get(&category).copied())
	}

	pub fn record(&mut self, category: Category, decision: Decision, scope: Scope) {
		debug!("Recording {:?} for {} ({:?} scope)", decision, category, scope);
		match (scope, self.local.as_mut()) {
			(Scope::Local, Some(local)) => {
				local.insert(category, decision);
			}
			_ => {
				self.root.borrow_mut().insert(category, decision);
			}
		}
	}

	/// Scope for a subdirectory, starting from a copy of this scope's mapping
	pub fn child(&self) -> PermissionStore {
		let initial = match &self.local {
			Some(local) => local.clone(),
			None => self.root.borrow().clone(),
		};
		PermissionStore { root: Rc::clone(&self.root), local: Some(initial) }
	}
}


// vim: ts=4
