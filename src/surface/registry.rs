//! Surface Registry - Mount lifecycle and back-reference table.
//!
//! Manages the lifecycle of surfaces:
//! - Root ID ↔ surface bidirectional mapping
//! - Surface arena with a free pool for O(1) index reuse
//! - Explicit view → surface back-edge table, cleared on unmount
//! - ReactiveSet of mounted surfaces (deriveds react to mount/unmount)
//!
//! The back edge is a lookup table rather than a pointer held by the view:
//! clearing the entry on unmount is what makes the post-unmount contract
//! checkable - an event arriving for a view with no entry is dropped, not
//! routed.

use std::cell::RefCell;
use std::collections::HashMap;

use crossterm::event::KeyEvent;
use spark_signals::ReactiveSet;
use thiserror::Error;

use crate::input::backed::BufferedTextInput;
use crate::input::keys::apply_key;
use crate::input::text_state::TextStateView;
use crate::state::sequencer::is_stale;
use crate::surface::{Commit, Surface};

// =============================================================================
// Errors
// =============================================================================

/// Mounting failed. Fatal to the mount call, not to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountError {
    /// The description root is already bound to a live surface.
    #[error("root '{0}' is already mounted")]
    AlreadyMounted(String),
}

// =============================================================================
// Registry State
// =============================================================================

struct SurfaceEntry {
    root_id: String,
    view_id: usize,
}

thread_local! {
    /// Surface index → entry, for mounted surfaces only.
    static SURFACES: RefCell<HashMap<usize, SurfaceEntry>> = RefCell::new(HashMap::new());

    /// Description root ID → surface index.
    static ROOT_TO_SURFACE: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// View identity → surface index. The non-owning back edge; an entry
    /// exists exactly while the surface is mounted.
    static VIEW_TO_SURFACE: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());

    /// The mounted views themselves, keyed by view identity.
    /// Exclusively owned by their surface; mutated only through routing.
    static VIEWS: RefCell<HashMap<usize, TextStateView<BufferedTextInput>>> =
        RefCell::new(HashMap::new());

    /// Set of currently mounted surface indices.
    /// Using ReactiveSet so deriveds that iterate over this set
    /// automatically react when surfaces mount or unmount.
    static MOUNTED: RefCell<ReactiveSet<usize>> = RefCell::new(ReactiveSet::new());

    /// Pool of freed surface indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next surface index if the pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// View identity counter. View IDs are never reused - a late event
    /// addressed to a dead view must miss, not hit a recycled slot.
    static NEXT_VIEW_ID: RefCell<usize> = const { RefCell::new(0) };
}

fn allocate_index() -> usize {
    FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    })
}

fn allocate_view_id() -> usize {
    NEXT_VIEW_ID.with(|next| {
        let mut next = next.borrow_mut();
        let id = *next;
        *next += 1;
        id
    })
}

// =============================================================================
// Mount / Unmount
// =============================================================================

/// Mount a surface for a description root.
///
/// Allocates the native view subtree, records the view's back edge to the
/// new surface, and returns the handle. Fails if the root is already
/// mounted elsewhere; the existing surface is left untouched.
pub fn mount(root_id: &str) -> Result<Surface, MountError> {
    let taken = ROOT_TO_SURFACE.with(|map| map.borrow().contains_key(root_id));
    if taken {
        return Err(MountError::AlreadyMounted(root_id.to_string()));
    }

    let index = allocate_index();
    let view_id = allocate_view_id();

    VIEWS.with(|views| {
        views
            .borrow_mut()
            .insert(view_id, TextStateView::new(BufferedTextInput::new()));
    });
    VIEW_TO_SURFACE.with(|map| {
        map.borrow_mut().insert(view_id, index);
    });
    SURFACES.with(|map| {
        map.borrow_mut().insert(
            index,
            SurfaceEntry { root_id: root_id.to_string(), view_id },
        );
    });
    ROOT_TO_SURFACE.with(|map| {
        map.borrow_mut().insert(root_id.to_string(), index);
    });
    MOUNTED.with(|set| {
        set.borrow_mut().insert(index);
    });

    log::debug!("mounted surface {} for root '{}'", index, root_id);
    Ok(Surface::new(index))
}

/// Unmount a surface.
///
/// The back edge is cleared *before* the view is released, so an event
/// racing with teardown finds no route instead of a half-dead view.
/// Unmounting an already-unmounted surface is a no-op.
pub fn unmount(surface: Surface) {
    let entry = SURFACES.with(|map| map.borrow_mut().remove(&surface.index()));
    let Some(entry) = entry else { return };

    // Back edge first: from here on, nothing routes to the view.
    VIEW_TO_SURFACE.with(|map| {
        map.borrow_mut().remove(&entry.view_id);
    });

    VIEWS.with(|views| {
        views.borrow_mut().remove(&entry.view_id);
    });
    ROOT_TO_SURFACE.with(|map| {
        map.borrow_mut().remove(&entry.root_id);
    });
    MOUNTED.with(|set| {
        set.borrow_mut().remove(&surface.index());
    });
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(surface.index());
    });

    log::debug!("unmounted surface {} (root '{}')", surface.index(), entry.root_id);
}

// =============================================================================
// Lookups
// =============================================================================

/// Check if a surface is currently mounted.
///
/// Note: This creates a reactive dependency when called from a derived/effect.
pub fn is_mounted(surface: Surface) -> bool {
    MOUNTED.with(|set| set.borrow().contains(&surface.index()))
}

/// The description root a surface is bound to.
pub fn root_id(surface: Surface) -> Option<String> {
    SURFACES.with(|map| {
        map.borrow()
            .get(&surface.index())
            .map(|entry| entry.root_id.clone())
    })
}

/// The view mounted for a surface. Exclusive ownership: one live view per
/// live surface.
pub fn view_for(surface: Surface) -> Option<usize> {
    SURFACES.with(|map| {
        map.borrow()
            .get(&surface.index())
            .map(|entry| entry.view_id)
    })
}

/// The back edge: which surface a view belongs to. None once unmounted -
/// a view that resolves to None must not route events.
pub fn surface_for_view(view_id: usize) -> Option<Surface> {
    VIEW_TO_SURFACE.with(|map| map.borrow().get(&view_id).copied().map(Surface::new))
}

/// Get all currently mounted surfaces.
pub fn mounted_surfaces() -> Vec<Surface> {
    MOUNTED.with(|set| set.borrow().iter().map(|&index| Surface::new(index)).collect())
}

/// Count of mounted surfaces.
pub fn mounted_count() -> usize {
    MOUNTED.with(|set| set.borrow().len())
}

// =============================================================================
// Routing
// =============================================================================

/// Run `f` against the text input view of a mounted surface.
///
/// Returns None if the surface is unmounted - the caller's access is
/// silently dropped, matching the event contract.
///
/// The view is taken out of the registry for the duration of the call,
/// so callbacks running inside `f` may re-enter the registry (deliver
/// commits, unmount surfaces) without a double borrow. Re-entrant
/// access to the view itself finds nothing and is dropped.
pub fn with_view<R>(
    surface: Surface,
    f: impl FnOnce(&mut TextStateView<BufferedTextInput>) -> R,
) -> Option<R> {
    let view_id = view_for(surface)?;
    let mut view = VIEWS.with(|views| views.borrow_mut().remove(&view_id))?;
    let result = f(&mut view);

    // A callback may have unmounted the surface; reinserting the view
    // then would resurrect it past its back edge.
    let still_mounted = VIEW_TO_SURFACE.with(|map| map.borrow().contains_key(&view_id));
    if still_mounted {
        VIEWS.with(|views| {
            views.borrow_mut().insert(view_id, view);
        });
    }
    Some(result)
}

/// Route a remote commit to the surface mounted for its root.
///
/// Commits addressed to an unknown or unmounted root are dropped silently:
/// a commit racing with teardown is normal, not an error. The staleness
/// check itself happens inside the view.
pub fn deliver_commit(commit: Commit) {
    let surface = ROOT_TO_SURFACE.with(|map| map.borrow().get(&commit.root_id).copied());
    let Some(index) = surface else {
        log::trace!("dropping commit for unmounted root '{}'", commit.root_id);
        return;
    };

    let Commit { text, selection, event_count, size, .. } = commit;
    with_view(Surface::new(index), |view| {
        // Staleness covers the whole commit: a dropped commit must not
        // touch the frame either.
        if is_stale(event_count, view.most_recent_event_count()) {
            log::trace!(
                "dropping stale commit ({} < {})",
                event_count,
                view.most_recent_event_count()
            );
            return;
        }
        view.set_frame(size);
        view.apply_remote_update(text, selection, event_count);
    });
}

/// Route a native key event through a view's back edge.
///
/// Events for views whose back edge has been cleared (unmounted) are
/// dropped, not routed. Returns true if the view consumed the key.
pub fn deliver_key(view_id: usize, event: &KeyEvent) -> bool {
    let Some(surface) = surface_for_view(view_id) else {
        log::trace!("dropping key event for unmounted view {}", view_id);
        return false;
    };
    with_view(surface, |view| apply_key(view, event)).unwrap_or(false)
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all surface state (for testing).
pub fn reset_surfaces() {
    SURFACES.with(|map| map.borrow_mut().clear());
    ROOT_TO_SURFACE.with(|map| map.borrow_mut().clear());
    VIEW_TO_SURFACE.with(|map| map.borrow_mut().clear());
    VIEWS.with(|views| views.borrow_mut().clear());
    MOUNTED.with(|set| set.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    NEXT_VIEW_ID.with(|next| *next.borrow_mut() = 0);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Selection, Size};

    fn setup() {
        reset_surfaces();
    }

    fn commit(root: &str, text: &str, count: u64) -> Commit {
        Commit {
            root_id: root.to_string(),
            text: text.into(),
            selection: Selection::caret(text.chars().count()),
            event_count: count,
            size: Size::new(40, 1),
        }
    }

    #[test]
    fn test_mount_allocates_view_and_back_edge() {
        setup();

        let surface = mount("rootA").unwrap();
        assert!(is_mounted(surface));
        assert_eq!(root_id(surface).as_deref(), Some("rootA"));

        let view_id = view_for(surface).unwrap();
        assert_eq!(surface_for_view(view_id), Some(surface));
        assert_eq!(mounted_count(), 1);
    }

    #[test]
    fn test_duplicate_mount_fails_first_survives() {
        setup();

        let first = mount("rootA").unwrap();
        let err = mount("rootA").unwrap_err();
        assert_eq!(err, MountError::AlreadyMounted("rootA".to_string()));

        // First surface unaffected
        assert!(is_mounted(first));
        assert_eq!(mounted_count(), 1);
    }

    #[test]
    fn test_remount_after_unmount() {
        setup();

        let first = mount("rootA").unwrap();
        unmount(first);
        let second = mount("rootA").unwrap();
        assert!(is_mounted(second));
    }

    #[test]
    fn test_unmount_clears_back_edge() {
        setup();

        let surface = mount("rootA").unwrap();
        let view_id = view_for(surface).unwrap();

        unmount(surface);
        assert!(!is_mounted(surface));
        assert_eq!(surface_for_view(view_id), None);
        assert_eq!(view_for(surface), None);
    }

    #[test]
    fn test_double_unmount_is_noop() {
        setup();

        let surface = mount("rootA").unwrap();
        unmount(surface);
        unmount(surface);
        assert_eq!(mounted_count(), 0);
    }

    #[test]
    fn test_commit_routing() {
        setup();

        let surface = mount("rootA").unwrap();
        deliver_commit(commit("rootA", "hello", 1));

        let text = with_view(surface, |view| view.text().text().to_string()).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_commit_to_unknown_root_dropped() {
        setup();

        let surface = mount("rootA").unwrap();
        deliver_commit(commit("rootB", "stray", 1));

        let text = with_view(surface, |view| view.text().text().to_string()).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_commit_after_unmount_dropped() {
        setup();

        let surface = mount("rootA").unwrap();
        unmount(surface);

        // No panic, no effect
        deliver_commit(commit("rootA", "late", 9));
        assert_eq!(mounted_count(), 0);
    }

    #[test]
    fn test_key_after_unmount_dropped() {
        setup();

        use crossterm::event::{KeyCode, KeyModifiers};

        let surface = mount("rootA").unwrap();
        let view_id = view_for(surface).unwrap();
        unmount(surface);

        let event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty());
        assert!(!deliver_key(view_id, &event));
    }

    #[test]
    fn test_key_routes_through_back_edge() {
        setup();

        use crossterm::event::{KeyCode, KeyModifiers};

        let surface = mount("rootA").unwrap();
        let view_id = view_for(surface).unwrap();

        let event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty());
        assert!(deliver_key(view_id, &event));

        let text = with_view(surface, |view| view.text().text().to_string()).unwrap();
        assert_eq!(text, "a");
    }

    #[test]
    fn test_stale_commit_does_not_clobber_local_edit() {
        setup();

        use crossterm::event::{KeyCode, KeyModifiers};

        let surface = mount("rootA").unwrap();
        let view_id = view_for(surface).unwrap();
        deliver_commit(commit("rootA", "abc", 5));

        // User types 'd' - local counter becomes 6
        deliver_key(view_id, &KeyEvent::new(KeyCode::Char('d'), KeyModifiers::empty()));

        // Slow commit computed before the keystroke arrives late
        deliver_commit(commit("rootA", "xyz", 5));

        let (text, count) =
            with_view(surface, |view| {
                (view.text().text().to_string(), view.most_recent_event_count())
            })
            .unwrap();
        assert_eq!(text, "abcd");
        assert_eq!(count, 6);

        // Fresh commit that observed the keystroke applies
        deliver_commit(commit("rootA", "abcd!", 7));
        let text = with_view(surface, |view| view.text().text().to_string()).unwrap();
        assert_eq!(text, "abcd!");
    }

    #[test]
    fn test_stale_commit_leaves_frame_untouched() {
        setup();

        use crossterm::event::{KeyCode, KeyModifiers};

        let surface = mount("rootA").unwrap();
        let view_id = view_for(surface).unwrap();

        let narrow = Commit { size: Size::new(4, 1), ..commit("rootA", "abcd", 5) };
        deliver_commit(narrow);

        // Typing past the 4-cell frame scrolls
        deliver_key(view_id, &KeyEvent::new(KeyCode::Char('x'), KeyModifiers::empty()));
        let scroll = with_view(surface, |view| view.scroll_offset().x).unwrap();
        assert_eq!(scroll, 2);

        // Slow commit with a wider frame arrives late - dropped entirely,
        // geometry included
        deliver_commit(commit("rootA", "stale", 5));

        for _ in 0..8 {
            deliver_key(view_id, &KeyEvent::new(KeyCode::Char('x'), KeyModifiers::empty()));
        }
        let (text, scroll) = with_view(surface, |view| {
            (view.text().text().to_string(), view.scroll_offset().x)
        })
        .unwrap();
        assert_eq!(text, "abcdxxxxxxxxx");
        // Still scrolling against the 4-cell frame, not the stale 40
        assert_eq!(scroll, 10);
    }

    #[test]
    fn test_reentrant_callback_routes_without_panic() {
        setup();

        use crate::input::events::TextInputCallbacks;
        use crossterm::event::{KeyCode, KeyModifiers};
        use std::rc::Rc;

        let a = mount("rootA").unwrap();
        let b = mount("rootB").unwrap();
        let a_view = view_for(a).unwrap();

        // Editing surface A forwards the new text to surface B's root
        with_view(a, |view| {
            let mut callbacks = TextInputCallbacks::new();
            callbacks.on_change = Some(Rc::new(|text, count| {
                deliver_commit(Commit {
                    root_id: "rootB".to_string(),
                    text: text.into(),
                    selection: Selection::caret(text.chars().count()),
                    event_count: count,
                    size: Size::new(40, 1),
                });
            }));
            view.set_callbacks(callbacks);
        });

        deliver_key(a_view, &KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));

        let text_b = with_view(b, |view| view.text().text().to_string()).unwrap();
        assert_eq!(text_b, "a");
    }

    #[test]
    fn test_callback_unmounting_own_surface() {
        setup();

        use crate::input::events::TextInputCallbacks;
        use crossterm::event::{KeyCode, KeyModifiers};
        use std::rc::Rc;

        let surface = mount("rootA").unwrap();
        let view_id = view_for(surface).unwrap();

        with_view(surface, |view| {
            let mut callbacks = TextInputCallbacks::new();
            callbacks.on_change = Some(Rc::new(move |_, _| unmount(surface)));
            view.set_callbacks(callbacks);
        });

        deliver_key(view_id, &KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));

        // The view is gone with its surface, not resurrected after the call
        assert!(!is_mounted(surface));
        assert_eq!(surface_for_view(view_id), None);
        assert_eq!(view_for(surface), None);
    }

    #[test]
    fn test_view_ids_not_reused() {
        setup();

        let first = mount("rootA").unwrap();
        let first_view = view_for(first).unwrap();
        unmount(first);

        let second = mount("rootB").unwrap();
        let second_view = view_for(second).unwrap();

        assert_ne!(first_view, second_view);
        // A late event for the dead view still misses
        assert_eq!(surface_for_view(first_view), None);
    }

    #[test]
    fn test_two_surfaces_independent() {
        setup();

        let a = mount("rootA").unwrap();
        let b = mount("rootB").unwrap();

        deliver_commit(commit("rootA", "for a", 1));
        deliver_commit(commit("rootB", "for b", 1));

        let text_a = with_view(a, |view| view.text().text().to_string()).unwrap();
        let text_b = with_view(b, |view| view.text().text().to_string()).unwrap();
        assert_eq!(text_a, "for a");
        assert_eq!(text_b, "for b");
    }
}
