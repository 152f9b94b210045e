//! Line diff used to show how a text file changed
//!
//! Shortest edit script over whole lines, using the linear space variant of
//! Myers' algorithm: find the middle snake of the edit graph, then solve
//! both halves recursively. Memory stays proportional to the input size.

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
	Same(&'a str),
	Removed(&'a str),
	Added(&'a str),
}

impl DiffLine<'_> {
	/// "  line", "- line" or "+ line", without line terminator
	pub fn annotated(&self) -> String {
		let (tag, text) = match self {
			DiffLine::Same(t) => ("  ", t),
			DiffLine::Removed(t) => ("- ", t),
			DiffLine::Added(t) => ("+ ", t),
		};
		format!("{}{}", tag, text.trim_end_matches(['\r', '\n']))
	}
}

pub fn diff_lines<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffLine<'a>> {
	let max_d = (old.len() + new.len() + 1) / 2 + 1;
	let mut forward = Frontier::new(max_d);
	let mut backward = Frontier::new(max_d);
	let mut result = Vec::with_capacity(old.len().max(new.len()));
	conquer(old, new, &mut forward, &mut backward, &mut result);
	result
}

/// Furthest reaching x per diagonal k, for -max_d <= k <= max_d
struct Frontier {
	offset: isize,
	v: Vec<isize>,
}

impl Frontier {
	fn new(max_d: usize) -> Self {
		Frontier { offset: max_d as isize + 1, v: vec![0; 2 * max_d + 3] }
	}
}

impl Index<isize> for Frontier {
	type Output = isize;

	fn index(&self, k: isize) -> &isize {
		&self.v[(k + self.offset) as usize]
	}
}

impl IndexMut<isize> for Frontier {
	fn index_mut(&mut self, k: isize) -> &mut isize {
		&mut self.v[(k + self.offset) as usize]
	}
}

/// Strip the common ends, then split at a middle snake and recurse on both halves
fn conquer<'a>(
	old: &[&'a str],
	new: &[&'a str],
	forward: &mut Frontier,
	backward: &mut Frontier,
	out: &mut Vec<DiffLine<'a>>,
) {
	let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
	out.extend(old[..prefix].iter().map(|l| DiffLine::Same(*l)));
	let (old, new) = (&old[prefix..], &new[prefix..]);

	let suffix = old.iter().rev().zip(new.iter().rev()).take_while(|(a, b)| a == b).count();
	let (old_mid, new_mid) = (&old[..old.len() - suffix], &new[..new.len() - suffix]);

	if old_mid.is_empty() {
		out.extend(new_mid.iter().map(|l| DiffLine::Added(*l)));
	} else if new_mid.is_empty() {
		out.extend(old_mid.iter().map(|l| DiffLine::Removed(*l)));
	} else if let Some((x, y)) = middle_snake(old_mid, new_mid, forward, backward) {
		conquer(&old_mid[..x], &new_mid[..y], forward, backward, out);
		conquer(&old_mid[x..], &new_mid[y..], forward, backward, out);
	} else {
		out.extend(old_mid.iter().map(|l| DiffLine::Removed(*l)));
		out.extend(new_mid.iter().map(|l| DiffLine::Added(*l)));
	}

	out.extend(old[old.len() - suffix..].iter().map(|l| DiffLine::Same(*l)));
}

/// A point on a shortest edit path splitting it in two halves of about
/// equal cost. Both sequences are non-empty and differ at both ends.
fn middle_snake(
	old: &[&str],
	new: &[&str],
	forward: &mut Frontier,
	backward: &mut Frontier,
) -> Option<(usize, usize)> {
	let n = old.len() as isize;
	let m = new.len() as isize;
	let delta = n - m;
	let odd = delta & 1 == 1;
	let max_d = (n + m + 1) / 2 + 1;
	forward[1] = 0;
	backward[1] = 0;

	for d in 0..max_d {
		let mut k = d;
		while k >= -d {
			let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
				forward[k + 1]
			} else {
				forward[k - 1] + 1
			};
			let mut y = x - k;
			let (x0, y0) = (x, y);
			while x >= 0 && y >= 0 && x < n && y < m && old[x as usize] == new[y as usize] {
				x += 1;
				y += 1;
			}
			forward[k] = x;
			let inside = x0 >= 0 && y0 >= 0 && x0 <= n && y0 <= m;
			if odd && inside && (k - delta).abs() < d && forward[k] + backward[delta - k] >= n {
				return Some((x0 as usize, y0 as usize));
			}
			k -= 2;
		}

		// Ascending here puts removals ahead of additions on ties
		let mut k = -d;
		while k <= d {
			let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
				backward[k + 1]
			} else {
				backward[k - 1] + 1
			};
			let mut y = x - k;
			while x >= 0
				&& y >= 0
				&& x < n
				&& y < m
				&& old[(n - x - 1) as usize] == new[(m - y - 1) as usize]
			{
				x += 1;
				y += 1;
			}
			backward[k] = x;
			let inside = x <= n && y <= m;
			if !odd && inside && (k - delta).abs() <= d && backward[k] + forward[delta - k] >= n {
				return Some(((n - x) as usize, (m - y) as usize));
			}
			k += 2;
		}
	}
	None
}


// vim: ts=4
